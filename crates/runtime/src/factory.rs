//! Memoized provider initialization.
//!
//! [`ProviderFactory`] is constructed once at startup and passed by reference
//! to whoever needs a provider. The first [`get`](ProviderFactory::get)
//! starts initialization; every caller arriving before it settles awaits the
//! same in-flight future. A failed initialization is evicted so the next call
//! starts over instead of replaying the failure.

use std::future::Future;
use std::sync::Arc;

use futures_util::FutureExt;
use futures_util::future::Shared;
use parking_lot::Mutex;
use tracing::{debug, warn};

use crate::error::{Error, Result};
use crate::provider::{BoxFuture, Provider};

type InitFn = Box<dyn Fn() -> BoxFuture<'static, Result<Arc<dyn Provider>>> + Send + Sync>;
type InitOutcome = std::result::Result<Arc<dyn Provider>, Arc<Error>>;
type PendingInit = Shared<BoxFuture<'static, InitOutcome>>;

/// Lazily initialized, shared provider.
pub struct ProviderFactory {
	init: InitFn,
	slot: Mutex<Option<PendingInit>>,
}

impl ProviderFactory {
	/// Creates a factory that runs `init` when a provider is first needed.
	pub fn new<F, Fut>(init: F) -> Self
	where
		F: Fn() -> Fut + Send + Sync + 'static,
		Fut: Future<Output = Result<Arc<dyn Provider>>> + Send + 'static,
	{
		Self {
			init: Box::new(move || -> BoxFuture<'static, Result<Arc<dyn Provider>>> { Box::pin(init()) }),
			slot: Mutex::new(None),
		}
	}

	/// Creates a factory that always yields `provider`.
	pub fn ready(provider: Arc<dyn Provider>) -> Self {
		let factory = Self::new({
			let provider = Arc::clone(&provider);
			move || {
				let provider = Arc::clone(&provider);
				async move { Ok(provider) }
			}
		});
		let resolved: BoxFuture<'static, InitOutcome> = Box::pin(async move { Ok(provider) });
		*factory.slot.lock() = Some(resolved.shared());
		factory
	}

	/// Returns the provider, initializing it if needed.
	///
	/// # Errors
	///
	/// Returns [`Error::Init`] wrapping the initialization failure. The failure
	/// is not cached; the next call initializes again.
	pub async fn get(&self) -> Result<Arc<dyn Provider>> {
		let pending = {
			let mut slot = self.slot.lock();
			match slot.as_ref() {
				Some(pending) => pending.clone(),
				None => {
					debug!(target = "tc.provider", "initializing provider");
					let fut: BoxFuture<'static, InitOutcome> = Box::pin((self.init)().map(|r| r.map_err(Arc::new)));
					let pending = fut.shared();
					*slot = Some(pending.clone());
					pending
				}
			}
		};

		match pending.clone().await {
			Ok(provider) => Ok(provider),
			Err(err) => {
				let mut slot = self.slot.lock();
				// A newer attempt may already occupy the slot; only evict our own.
				if slot.as_ref().is_some_and(|cached| cached.ptr_eq(&pending)) {
					warn!(target = "tc.provider", error = %err, "provider initialization failed; will retry on next use");
					*slot = None;
				}
				Err(Error::Init(err))
			}
		}
	}

	/// Whether an initialized provider is cached.
	pub fn is_ready(&self) -> bool {
		self.slot
			.lock()
			.as_ref()
			.and_then(|pending| pending.peek())
			.is_some_and(|outcome| outcome.is_ok())
	}

	/// Drops the cached provider; the next [`get`](Self::get) initializes again.
	pub fn reset(&self) {
		*self.slot.lock() = None;
	}

	/// Drops the cached provider if `err` shows its connection is gone.
	///
	/// Initialization failures are already evicted by [`get`](Self::get) and
	/// leave the slot alone. Returns whether the cache was cleared.
	pub fn discard_if_disconnected(&self, err: &Error) -> bool {
		if matches!(err, Error::Init(_)) || !err.is_disconnected() {
			return false;
		}
		warn!(target = "tc.provider", error = %err, "provider connection lost; reinitializing on next use");
		self.reset();
		true
	}
}

#[cfg(test)]
mod tests {
	use std::sync::atomic::{AtomicUsize, Ordering};
	use std::time::Duration;

	use super::*;
	use crate::provider::MemoryProvider;

	fn memory_provider() -> Arc<dyn Provider> {
		let (provider, _wallet) = MemoryProvider::new(Vec::new());
		Arc::new(provider)
	}

	#[tokio::test]
	async fn concurrent_callers_share_one_instance() {
		let calls = Arc::new(AtomicUsize::new(0));
		let factory = {
			let calls = Arc::clone(&calls);
			ProviderFactory::new(move || {
				let calls = Arc::clone(&calls);
				async move {
					calls.fetch_add(1, Ordering::SeqCst);
					tokio::time::sleep(Duration::from_millis(20)).await;
					Ok(memory_provider())
				}
			})
		};

		let (a, b) = tokio::join!(factory.get(), factory.get());
		let (a, b) = (a.unwrap(), b.unwrap());

		assert!(Arc::ptr_eq(&a, &b));
		assert_eq!(calls.load(Ordering::SeqCst), 1);
		assert!(factory.is_ready());

		let c = factory.get().await.unwrap();
		assert!(Arc::ptr_eq(&a, &c));
		assert_eq!(calls.load(Ordering::SeqCst), 1);
	}

	#[tokio::test]
	async fn failure_is_not_cached() {
		let calls = Arc::new(AtomicUsize::new(0));
		let factory = {
			let calls = Arc::clone(&calls);
			ProviderFactory::new(move || {
				let attempt = calls.fetch_add(1, Ordering::SeqCst);
				async move {
					if attempt == 0 {
						Err(Error::ConnectionFailed("relay down".into()))
					} else {
						Ok(memory_provider())
					}
				}
			})
		};

		let err = factory.get().await.err().unwrap();
		assert!(matches!(err, Error::Init(_)));
		assert!(err.to_string().contains("relay down"));
		assert!(!factory.is_ready());

		factory.get().await.unwrap();
		assert_eq!(calls.load(Ordering::SeqCst), 2);
		assert!(factory.is_ready());
	}

	#[tokio::test]
	async fn concurrent_callers_share_one_failure() {
		let calls = Arc::new(AtomicUsize::new(0));
		let factory = {
			let calls = Arc::clone(&calls);
			ProviderFactory::new(move || {
				let calls = Arc::clone(&calls);
				async move {
					calls.fetch_add(1, Ordering::SeqCst);
					tokio::time::sleep(Duration::from_millis(10)).await;
					Err::<Arc<dyn Provider>, _>(Error::LaunchFailed("no node".into()))
				}
			})
		};

		let (a, b) = tokio::join!(factory.get(), factory.get());
		assert!(a.is_err() && b.is_err());
		assert_eq!(calls.load(Ordering::SeqCst), 1);
	}

	#[tokio::test]
	async fn ready_and_reset() {
		let provider = memory_provider();
		let factory = ProviderFactory::ready(Arc::clone(&provider));
		assert!(factory.is_ready());
		assert!(Arc::ptr_eq(&factory.get().await.unwrap(), &provider));

		factory.reset();
		assert!(!factory.is_ready());
		assert!(Arc::ptr_eq(&factory.get().await.unwrap(), &provider));
	}

	#[tokio::test]
	async fn lost_connection_discards_provider() {
		let factory = ProviderFactory::ready(memory_provider());

		assert!(!factory.discard_if_disconnected(&Error::ProtocolError("bad frame".into())));
		assert!(factory.is_ready());

		assert!(factory.discard_if_disconnected(&Error::ChannelClosed));
		assert!(!factory.is_ready());
	}

	#[tokio::test]
	async fn init_failure_does_not_evict_newer_attempt() {
		let factory = ProviderFactory::ready(memory_provider());
		let stale = Error::Init(Arc::new(Error::TransportError("pipe closed".into())));

		assert!(!factory.discard_if_disconnected(&stale));
		assert!(factory.is_ready());
	}
}
