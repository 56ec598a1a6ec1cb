//! Where the pairing URI goes.
//!
//! A [`Modal`] shows the connection URI to the user (QR code, terminal text,
//! deep link) and reports when the user dismisses it. Programmatic
//! [`close`](Modal::close) does not count as a dismissal.

use std::sync::Arc;

use parking_lot::Mutex;
use tc_runtime::BoxFuture;
use tokio::sync::watch;

pub trait Modal: Send + Sync {
	/// Displays the pairing URI.
	fn open(&self, uri: &str);

	/// Hides the display after pairing settled.
	fn close(&self);

	/// Resolves once the user dismisses the display opened by the last
	/// [`open`](Self::open). Never resolves if that does not happen.
	fn closed(&self) -> BoxFuture<'static, ()>;
}

#[derive(Debug, Default)]
struct ModalLog {
	opened: Vec<String>,
	closes: usize,
}

/// Channel-backed modal whose dismissal is driven through a [`ModalHandle`].
pub struct ChannelModal {
	displayed: watch::Sender<Option<String>>,
	dismissed: watch::Sender<bool>,
	log: Arc<Mutex<ModalLog>>,
}

/// Observes and drives a [`ChannelModal`] from the user's side.
#[derive(Clone)]
pub struct ModalHandle {
	displayed: watch::Receiver<Option<String>>,
	dismissed: watch::Sender<bool>,
	log: Arc<Mutex<ModalLog>>,
}

impl ChannelModal {
	pub fn new() -> (Self, ModalHandle) {
		let (displayed, displayed_rx) = watch::channel(None);
		let (dismissed, _) = watch::channel(false);
		let log = Arc::new(Mutex::new(ModalLog::default()));
		let handle = ModalHandle {
			displayed: displayed_rx,
			dismissed: dismissed.clone(),
			log: Arc::clone(&log),
		};
		(
			Self {
				displayed,
				dismissed,
				log,
			},
			handle,
		)
	}
}

impl Modal for ChannelModal {
	fn open(&self, uri: &str) {
		self.log.lock().opened.push(uri.to_string());
		self.dismissed.send_replace(false);
		self.displayed.send_replace(Some(uri.to_string()));
	}

	fn close(&self) {
		self.log.lock().closes += 1;
		self.displayed.send_replace(None);
	}

	fn closed(&self) -> BoxFuture<'static, ()> {
		let mut dismissed = self.dismissed.subscribe();
		Box::pin(async move {
			if dismissed.wait_for(|d| *d).await.is_err() {
				std::future::pending::<()>().await;
			}
		})
	}
}

impl ModalHandle {
	/// Waits until a URI is on display and returns it.
	pub async fn wait_for_uri(&mut self) -> Option<String> {
		let shown = self.displayed.wait_for(Option::is_some).await.ok()?;
		shown.clone()
	}

	/// URI currently on display.
	pub fn displayed(&self) -> Option<String> {
		self.displayed.borrow().clone()
	}

	/// Simulates the user closing the modal.
	pub fn dismiss(&self) {
		self.dismissed.send_replace(true);
	}

	/// Every URI opened so far.
	pub fn opened(&self) -> Vec<String> {
		self.log.lock().opened.clone()
	}

	/// Number of programmatic closes.
	pub fn closes(&self) -> usize {
		self.log.lock().closes
	}
}

#[cfg(test)]
mod tests {
	use std::time::Duration;

	use super::*;

	#[tokio::test]
	async fn dismissal_resolves_closed() {
		let (modal, mut handle) = ChannelModal::new();
		modal.open("wc:a@2");
		assert_eq!(handle.wait_for_uri().await.as_deref(), Some("wc:a@2"));

		let closed = modal.closed();
		handle.dismiss();
		tokio::time::timeout(Duration::from_secs(1), closed).await.unwrap();
	}

	#[tokio::test]
	async fn programmatic_close_is_not_a_dismissal() {
		let (modal, handle) = ChannelModal::new();
		modal.open("wc:a@2");
		let closed = modal.closed();
		modal.close();

		assert!(tokio::time::timeout(Duration::from_millis(50), closed).await.is_err());
		assert_eq!(handle.displayed(), None);
		assert_eq!(handle.closes(), 1);
	}

	#[tokio::test]
	async fn reopening_clears_previous_dismissal() {
		let (modal, handle) = ChannelModal::new();
		modal.open("wc:a@2");
		handle.dismiss();
		modal.open("wc:b@2");

		assert!(tokio::time::timeout(Duration::from_millis(50), modal.closed()).await.is_err());
		assert_eq!(handle.opened(), vec!["wc:a@2".to_string(), "wc:b@2".to_string()]);
	}
}
