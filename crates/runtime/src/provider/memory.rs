use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use parking_lot::Mutex;
use serde_json::Value;
use tc_protocol::{CapabilityRequest, DisconnectRequest, RpcRequest, Session, SessionNamespace};
use tokio::sync::{broadcast, mpsc, oneshot};
use tokio::task::JoinHandle;

use super::{BoxFuture, Provider, ProviderEvent};
use crate::error::{Error, Result};
use crate::store::SessionStore;

const EVENT_CAPACITY: usize = 64;
const SESSION_TTL: Duration = Duration::from_secs(7 * 24 * 60 * 60);
/// Error code wallets use for a rejected proposal.
const USER_REJECTED: i64 = 5000;

/// Produces the wallet's answer to a remote procedure call.
pub type Responder = Arc<dyn Fn(&RpcRequest) -> Result<Value> + Send + Sync>;

struct Inner {
	sessions: Mutex<Vec<Session>>,
	store: Option<SessionStore>,
	events: broadcast::Sender<ProviderEvent>,
	proposals: mpsc::UnboundedSender<Proposal>,
	responder: Mutex<Responder>,
	requests: Mutex<Vec<RpcRequest>>,
	disconnects: Mutex<Vec<DisconnectRequest>>,
	disconnect_error: Mutex<Option<String>>,
	pairings: AtomicU64,
}

impl Inner {
	fn insert_session(&self, session: Session) -> Result<()> {
		let mut sessions = self.sessions.lock();
		sessions.retain(|s| s.topic != session.topic);
		sessions.push(session);
		self.persist(&sessions)
	}

	fn remove_session(&self, topic: &str) -> Result<bool> {
		let mut sessions = self.sessions.lock();
		let before = sessions.len();
		sessions.retain(|s| s.topic != topic);
		let removed = sessions.len() != before;
		if removed {
			self.persist(&sessions)?;
		}
		Ok(removed)
	}

	fn persist(&self, sessions: &[Session]) -> Result<()> {
		match &self.store {
			Some(store) => store.save(sessions),
			None => Ok(()),
		}
	}
}

/// In-process provider.
///
/// Pairing proposals are delivered to the paired [`WalletHandle`], which
/// plays the remote wallet. Requests are answered by a [`Responder`] that
/// echoes the call back by default.
pub struct MemoryProvider {
	inner: Arc<Inner>,
}

impl MemoryProvider {
	/// Creates a provider holding `sessions`, plus the wallet side of it.
	pub fn new(sessions: Vec<Session>) -> (Self, WalletHandle) {
		Self::build(sessions, None)
	}

	/// Creates a provider whose sessions are loaded from and saved to `store`.
	pub fn with_store(store: SessionStore) -> (Self, WalletHandle) {
		let sessions = store.load();
		Self::build(sessions, Some(store))
	}

	fn build(sessions: Vec<Session>, store: Option<SessionStore>) -> (Self, WalletHandle) {
		let (events, _) = broadcast::channel(EVENT_CAPACITY);
		let (proposals_tx, proposals_rx) = mpsc::unbounded_channel();
		let inner = Arc::new(Inner {
			sessions: Mutex::new(sessions),
			store,
			events,
			proposals: proposals_tx,
			responder: Mutex::new(Arc::new(echo)),
			requests: Mutex::new(Vec::new()),
			disconnects: Mutex::new(Vec::new()),
			disconnect_error: Mutex::new(None),
			pairings: AtomicU64::new(0),
		});
		let wallet = WalletHandle {
			inner: Arc::clone(&inner),
			proposals: proposals_rx,
		};
		(Self { inner }, wallet)
	}

	/// Replaces how requests are answered.
	pub fn set_responder(&self, responder: Responder) {
		*self.inner.responder.lock() = responder;
	}

	/// Makes every following disconnect fail with `message`.
	pub fn fail_disconnects(&self, message: impl Into<String>) {
		*self.inner.disconnect_error.lock() = Some(message.into());
	}

	/// Requests received so far.
	pub fn requests(&self) -> Vec<RpcRequest> {
		self.inner.requests.lock().clone()
	}

	/// Disconnects received so far, including failed ones.
	pub fn disconnects(&self) -> Vec<DisconnectRequest> {
		self.inner.disconnects.lock().clone()
	}

	/// Number of pairings started.
	pub fn pairings(&self) -> u64 {
		self.inner.pairings.load(Ordering::SeqCst)
	}
}

fn echo(request: &RpcRequest) -> Result<Value> {
	Ok(serde_json::json!({
		"method": request.request.method,
		"params": request.request.params,
	}))
}

impl Provider for MemoryProvider {
	fn sessions(&self) -> BoxFuture<'_, Result<Vec<Session>>> {
		Box::pin(async move { Ok(self.inner.sessions.lock().clone()) })
	}

	fn pair(&self, request: CapabilityRequest) -> BoxFuture<'static, Result<Option<Session>>> {
		let inner = Arc::clone(&self.inner);
		Box::pin(async move {
			let n = inner.pairings.fetch_add(1, Ordering::SeqCst);
			let topic = format!("loopback-{n}");
			let uri = format!("wc:{topic}@2?relay-protocol=irn&symKey=loopback");

			let (reply, answer) = oneshot::channel();
			let _ = inner.events.send(ProviderEvent::DisplayUri(uri.clone()));
			inner
				.proposals
				.send(Proposal {
					uri,
					topic,
					request,
					reply,
				})
				.map_err(|_| Error::ChannelClosed)?;

			let outcome = answer.await.map_err(|_| Error::ChannelClosed)??;
			if let Some(session) = &outcome {
				inner.insert_session(session.clone())?;
			}
			Ok(outcome)
		})
	}

	fn request(&self, request: RpcRequest) -> BoxFuture<'_, Result<Value>> {
		Box::pin(async move {
			self.inner.requests.lock().push(request.clone());
			let known = self.inner.sessions.lock().iter().any(|s| s.topic == request.topic);
			if !known {
				return Err(Error::Remote {
					code: None,
					message: format!("No matching key. session topic doesn't exist: {}", request.topic),
				});
			}
			let responder = Arc::clone(&self.inner.responder.lock());
			responder(&request)
		})
	}

	fn disconnect(&self, request: DisconnectRequest) -> BoxFuture<'_, Result<()>> {
		Box::pin(async move {
			self.inner.disconnects.lock().push(request.clone());
			if let Some(message) = self.inner.disconnect_error.lock().clone() {
				return Err(Error::Remote { code: None, message });
			}
			self.inner.remove_session(&request.topic)?;
			Ok(())
		})
	}

	fn events(&self) -> broadcast::Receiver<ProviderEvent> {
		self.inner.events.subscribe()
	}
}

/// A pending session proposal, as seen by the wallet.
pub struct Proposal {
	/// Pairing URI shown to the user.
	pub uri: String,
	/// Topic the settled session will carry.
	pub topic: String,
	pub request: CapabilityRequest,
	reply: oneshot::Sender<Result<Option<Session>>>,
}

impl Proposal {
	/// Settles with `session`. Returns false if the proposer stopped waiting.
	pub fn approve(self, session: Session) -> bool {
		self.reply.send(Ok(Some(session))).is_ok()
	}

	/// Settles with every required chain granted to each of `addresses`.
	pub fn approve_accounts<S: AsRef<str>>(self, addresses: &[S]) -> bool {
		let session = self.session_for(addresses);
		self.approve(session)
	}

	/// Builds the session [`approve_accounts`](Self::approve_accounts) would settle with.
	pub fn session_for<S: AsRef<str>>(&self, addresses: &[S]) -> Session {
		let namespaces = self
			.request
			.required_namespaces
			.iter()
			.map(|(name, ns)| {
				let accounts = ns
					.chains
					.iter()
					.flat_map(|chain| addresses.iter().map(move |a| format!("{chain}:{}", a.as_ref())))
					.collect();
				let granted = SessionNamespace {
					chains: Some(ns.chains.clone()),
					accounts,
					methods: ns.methods.clone(),
					events: ns.events.clone(),
				};
				(name.clone(), granted)
			})
			.collect();

		let now = SystemTime::now().duration_since(UNIX_EPOCH).unwrap_or_default();
		Session {
			topic: self.topic.clone(),
			namespaces,
			acknowledged: true,
			expiry: (now + SESSION_TTL).as_secs(),
			peer: None,
		}
	}

	/// Declines the proposal.
	pub fn reject(self, message: impl Into<String>) -> bool {
		let err = Error::Remote {
			code: Some(USER_REJECTED),
			message: message.into(),
		};
		self.reply.send(Err(err)).is_ok()
	}

	/// Finishes the pairing without producing a session.
	pub fn finish_without_session(self) -> bool {
		self.reply.send(Ok(None)).is_ok()
	}
}

/// The wallet side of a [`MemoryProvider`].
pub struct WalletHandle {
	inner: Arc<Inner>,
	proposals: mpsc::UnboundedReceiver<Proposal>,
}

impl WalletHandle {
	/// Waits for the next pairing proposal.
	pub async fn next_proposal(&mut self) -> Option<Proposal> {
		self.proposals.recv().await
	}

	/// Ends a session from the wallet side, notifying subscribers.
	pub fn delete_session(&self, topic: &str) -> Result<bool> {
		let removed = self.inner.remove_session(topic)?;
		let _ = self.inner.events.send(ProviderEvent::SessionDelete {
			topic: topic.to_string(),
		});
		Ok(removed)
	}

	/// Approves every proposal for `addresses` after `delay`, until the provider is gone.
	pub fn auto_approve(mut self, addresses: Vec<String>, delay: Duration) -> JoinHandle<()> {
		tokio::spawn(async move {
			while let Some(proposal) = self.next_proposal().await {
				tokio::time::sleep(delay).await;
				tracing::debug!(target = "tc.provider", topic = %proposal.topic, "loopback wallet approving");
				if !proposal.approve_accounts(&addresses) {
					tracing::debug!(target = "tc.provider", "proposal abandoned before approval");
				}
			}
		})
	}
}
