//! Session acquisition.
//!
//! [`Connector::connect`] reuses a stored session when one satisfies the
//! capability request. Otherwise it proposes a new pairing, hands the URI to a
//! [`Modal`], and races wallet approval against the user dismissing the modal.
//! Whichever settles first decides the outcome; the other is dropped.

use std::future::Future;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tc_protocol::{CapabilityRequest, ChainId, DisconnectRequest, Session};
use tc_runtime::{ProviderEvent, ProviderFactory};
use tokio::sync::broadcast::error::RecvError;
use tracing::{debug, info, warn};

use crate::config::ConnectConfig;
use crate::dispatcher::RequestDispatcher;
use crate::error::{ConnectError, Result};
use crate::locator::SessionLocator;
use crate::modal::Modal;

/// Where a [`Connector`] is in acquiring a session.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ConnectionState {
	#[default]
	Idle,
	/// Pairing proposed, URI not yet known.
	AwaitingUri,
	/// URI displayed, waiting on the wallet or the user.
	AwaitingApproval,
	Connected,
	/// The user dismissed the modal during the last attempt.
	Cancelled,
}

/// The session a connector currently holds.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActiveSession {
	pub topic: String,
	pub address: String,
	pub chain: ChainId,
	/// Taken from the provider store rather than a fresh pairing.
	#[serde(default, skip_serializing)]
	pub reused: bool,
}

/// First signal to settle while the modal is open.
#[derive(Debug)]
pub enum PairingEvent {
	Approved(tc_runtime::Result<Option<Session>>),
	ModalClosed,
}

/// Races pairing approval against the modal being dismissed.
///
/// Both futures are consumed; the one that loses is dropped.
pub async fn race_pairing<A, C>(approval: A, closed: C) -> PairingEvent
where
	A: Future<Output = tc_runtime::Result<Option<Session>>>,
	C: Future<Output = ()>,
{
	tokio::select! {
		outcome = approval => PairingEvent::Approved(outcome),
		() = closed => PairingEvent::ModalClosed,
	}
}

pub struct Connector<'a> {
	factory: &'a ProviderFactory,
	request: CapabilityRequest,
	chain: ChainId,
	state: ConnectionState,
	active: Option<ActiveSession>,
}

impl<'a> Connector<'a> {
	pub fn new(factory: &'a ProviderFactory, config: &ConnectConfig) -> Self {
		Self::with_request(factory, config.capability_request(), config.chain_id())
	}

	/// Connector for an arbitrary capability request; addresses are read for `chain`.
	pub fn with_request(factory: &'a ProviderFactory, request: CapabilityRequest, chain: ChainId) -> Self {
		Self {
			factory,
			request,
			chain,
			state: ConnectionState::Idle,
			active: None,
		}
	}

	pub fn state(&self) -> ConnectionState {
		self.state
	}

	pub fn session(&self) -> Option<&ActiveSession> {
		self.active.as_ref()
	}

	pub fn address(&self) -> Option<&str> {
		self.active.as_ref().map(|s| s.address.as_str())
	}

	pub fn topic(&self) -> Option<&str> {
		self.active.as_ref().map(|s| s.topic.as_str())
	}

	/// Adopts a session established earlier, e.g. by another process.
	pub fn restore(&mut self, session: ActiveSession) {
		self.active = Some(session);
		self.state = ConnectionState::Connected;
	}

	/// Acquires a session, reusing a stored one when possible.
	///
	/// # Errors
	///
	/// - [`ConnectError::Cancelled`] if the user dismissed the modal first
	/// - [`ConnectError::NoSession`] if pairing finished without a session
	/// - [`ConnectError::NoAddress`] if the session has no account on the chain
	/// - [`ConnectError::Provider`] for provider and relay failures
	pub async fn connect(&mut self, modal: &dyn Modal) -> Result<ActiveSession> {
		let result = self.acquire(modal).await;
		match &result {
			Ok(session) => {
				info!(target = "tc.connect", topic = %session.topic, address = %session.address, reused = session.reused, "connected");
				self.active = Some(session.clone());
				self.state = ConnectionState::Connected;
			}
			Err(ConnectError::Cancelled) => {
				debug!(target = "tc.connect", "pairing cancelled by user");
				self.state = ConnectionState::Cancelled;
			}
			Err(err) => {
				warn!(target = "tc.connect", error = %err, "connect failed");
				self.state = ConnectionState::Idle;
			}
		}
		result
	}

	async fn acquire(&mut self, modal: &dyn Modal) -> Result<ActiveSession> {
		let provider = self.factory.get().await.map_err(ConnectError::provider)?;

		let locator = SessionLocator::new(provider.clone());
		let found = locator.locate(&self.request).await.map_err(|err| self.provider_failure(err))?;
		if let Some(session) = found {
			return self.settle(&session, true);
		}

		// Subscribe before proposing so the URI event cannot be missed.
		let mut events = provider.events();
		self.state = ConnectionState::AwaitingUri;
		let mut approval = provider.pair(self.request.clone());

		let uri = loop {
			tokio::select! {
				outcome = &mut approval => {
					// Settled before any URI was shown; no modal involved.
					let session = outcome.map_err(|err| self.provider_failure(err))?.ok_or(ConnectError::NoSession)?;
					return self.settle(&session, false);
				}
				event = events.recv() => match event {
					Ok(ProviderEvent::DisplayUri(uri)) => break uri,
					Ok(_) => continue,
					Err(RecvError::Lagged(skipped)) => {
						debug!(target = "tc.connect", skipped, "provider events lagged");
						continue;
					}
					Err(RecvError::Closed) => {
						self.factory.reset();
						return Err(ConnectError::Provider("provider closed before producing a pairing uri".into()));
					}
				},
			}
		};
		drop(events);

		debug!(target = "tc.connect", %uri, "displaying pairing uri");
		modal.open(&uri);
		self.state = ConnectionState::AwaitingApproval;

		match race_pairing(approval, modal.closed()).await {
			PairingEvent::Approved(outcome) => {
				modal.close();
				let session = outcome.map_err(|err| self.provider_failure(err))?.ok_or(ConnectError::NoSession)?;
				self.settle(&session, false)
			}
			PairingEvent::ModalClosed => Err(ConnectError::Cancelled),
		}
	}

	/// Maps a provider failure, dropping the cached provider if its connection died.
	fn provider_failure(&self, err: tc_runtime::Error) -> ConnectError {
		self.factory.discard_if_disconnected(&err);
		ConnectError::provider(err)
	}

	fn settle(&self, session: &Session, reused: bool) -> Result<ActiveSession> {
		let address = session.address_for(&self.chain).ok_or_else(|| ConnectError::NoAddress {
			chain: self.chain.clone(),
		})?;
		Ok(ActiveSession {
			topic: session.topic.clone(),
			address,
			chain: self.chain.clone(),
			reused,
		})
	}

	/// Ends the session.
	///
	/// Local state is cleared unconditionally. An `Err` reports that the remote
	/// disconnect failed; the connector is idle either way.
	pub async fn disconnect(&mut self) -> Result<()> {
		let Some(active) = self.active.take() else {
			self.state = ConnectionState::Idle;
			return Ok(());
		};
		self.state = ConnectionState::Idle;

		let remote = async {
			let provider = self.factory.get().await.map_err(ConnectError::provider)?;
			provider
				.disconnect(DisconnectRequest::user_disconnected(&active.topic))
				.await
				.map_err(|err| self.provider_failure(err))
		};
		match remote.await {
			Ok(()) => {
				info!(target = "tc.connect", topic = %active.topic, "disconnected");
				Ok(())
			}
			Err(err) => {
				warn!(target = "tc.connect", topic = %active.topic, error = %err, "remote disconnect failed; local state cleared");
				Err(err)
			}
		}
	}

	/// Applies a provider event. Returns true if it ended the active session.
	pub fn handle_event(&mut self, event: &ProviderEvent) -> bool {
		match event {
			ProviderEvent::SessionDelete { topic } if self.topic() == Some(topic.as_str()) => {
				info!(target = "tc.connect", %topic, "session ended by wallet");
				self.active = None;
				self.state = ConnectionState::Idle;
				true
			}
			_ => false,
		}
	}

	fn dispatcher(&self) -> Result<(RequestDispatcher<'a>, &ActiveSession)> {
		let active = self.active.as_ref().ok_or(ConnectError::NotConnected)?;
		Ok((RequestDispatcher::new(self.factory), active))
	}

	/// Sends `method` over the active session and returns the raw result.
	pub async fn request(&self, method: &str, params: Value) -> Result<Value> {
		let (dispatcher, active) = self.dispatcher()?;
		dispatcher.request(&active.topic, &active.chain, method, params).await
	}

	/// Asks the wallet to sign `message` with the connected address.
	pub async fn sign_message(&self, message: &str) -> Result<Value> {
		let (dispatcher, active) = self.dispatcher()?;
		dispatcher.sign_message(active, message).await
	}

	/// Asks the wallet to sign `transaction` with the connected address.
	pub async fn sign_transaction(&self, transaction: Value) -> Result<Value> {
		let (dispatcher, active) = self.dispatcher()?;
		dispatcher.sign_transaction(active, transaction).await
	}
}
