//! The provider seam: everything session acquisition needs from a
//! wallet-connection SDK.
//!
//! [`BridgeProvider`] drives the real universal provider through the bridge
//! sidecar; [`MemoryProvider`] keeps sessions in process and hands pairing
//! proposals to a [`WalletHandle`] that plays the wallet.

mod bridge;
mod memory;

use std::future::Future;
use std::pin::Pin;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tc_protocol::{CapabilityRequest, DisconnectRequest, Metadata, RpcRequest, Session};
use tokio::sync::broadcast;

use crate::connection::Event;
use crate::error::Result;

pub use bridge::BridgeProvider;
pub use memory::{MemoryProvider, Proposal, Responder, WalletHandle};

/// Boxed `Send` future used across the provider seam.
pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

/// Notifications emitted by a provider.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProviderEvent {
	/// A pairing URI is ready to be shown to the user.
	DisplayUri(String),
	/// The wallet ended (or the relay expired) the session with this topic.
	SessionDelete { topic: String },
}

impl ProviderEvent {
	/// Maps a raw bridge event; unknown events yield `None`.
	pub fn from_event(event: &Event) -> Option<Self> {
		let field = |name: &str| event.params.get(name).and_then(Value::as_str).map(str::to_string);
		match event.event.as_str() {
			"display_uri" => field("uri").map(ProviderEvent::DisplayUri),
			"session_delete" | "session_expire" => field("topic").map(|topic| ProviderEvent::SessionDelete { topic }),
			_ => None,
		}
	}
}

/// Fixed provider configuration sent once at initialization.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProviderOptions {
	/// Relay WebSocket endpoint.
	pub relay_url: String,
	/// Cloud project identifier.
	pub project_id: String,
	/// Application identity shown to wallets.
	pub metadata: Metadata,
	/// Prefix isolating this application's persisted sessions.
	pub storage_namespace: String,
}

/// Wallet-connection provider.
///
/// Implementations own the relay connection and the session store; callers
/// only see sessions, pairing approvals and request results.
pub trait Provider: Send + Sync {
	/// Sessions currently held in the provider's store, oldest first.
	fn sessions(&self) -> BoxFuture<'_, Result<Vec<Session>>>;

	/// Proposes a new session.
	///
	/// A [`ProviderEvent::DisplayUri`] is emitted once the pairing URI is
	/// known. The returned future resolves when the wallet answers; `None`
	/// means the provider finished without producing a session. The future
	/// does not borrow the provider so it can be raced against other signals.
	fn pair(&self, request: CapabilityRequest) -> BoxFuture<'static, Result<Option<Session>>>;

	/// Sends a remote procedure call over a session and returns the raw result.
	fn request(&self, request: RpcRequest) -> BoxFuture<'_, Result<Value>>;

	/// Terminates a session.
	fn disconnect(&self, request: DisconnectRequest) -> BoxFuture<'_, Result<()>>;

	/// Subscribes to events emitted after this call.
	fn events(&self) -> broadcast::Receiver<ProviderEvent>;
}
