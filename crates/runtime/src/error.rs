//! Error types for the provider runtime.

use std::sync::Arc;

use thiserror::Error;

/// Result type alias for runtime operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in the provider runtime.
#[derive(Debug, Error)]
pub enum Error {
	/// Bridge script or Node.js executable was not found.
	#[error("Provider bridge not found: {0}. Set TC_BRIDGE_SCRIPT or pass --bridge-script")]
	BridgeNotFound(String),

	/// Failed to launch the bridge process.
	#[error("Failed to launch provider bridge: {0}. Check that Node.js is installed.")]
	LaunchFailed(String),

	/// Failed to establish a connection with the bridge.
	#[error("Failed to connect to provider bridge: {0}")]
	ConnectionFailed(String),

	/// Transport-level error (stdio or WebSocket).
	#[error("Transport error: {0}")]
	TransportError(String),

	/// Protocol-level error (malformed or unexpected JSON-RPC traffic).
	#[error("Protocol error: {0}")]
	ProtocolError(String),

	/// Error reported by the provider or the wallet behind it.
	#[error("{message}")]
	Remote {
		/// Provider error code, when one was sent
		code: Option<i64>,
		/// Human-readable error message
		message: String,
	},

	/// Provider initialization failed; shared by every caller awaiting it.
	#[error("Provider initialization failed: {0}")]
	Init(#[source] Arc<Error>),

	/// I/O error.
	#[error("I/O error: {0}")]
	Io(#[from] std::io::Error),

	/// JSON serialization/deserialization error.
	#[error("JSON error: {0}")]
	Json(#[from] serde_json::Error),

	/// Channel closed unexpectedly.
	#[error("Channel closed unexpectedly")]
	ChannelClosed,
}

impl Error {
	/// Returns the provider error code if this is a Remote error.
	pub fn remote_code(&self) -> Option<i64> {
		match self {
			Error::Remote { code, .. } => *code,
			Error::Init(inner) => inner.remote_code(),
			_ => None,
		}
	}

	/// Returns true if the bridge went away underneath the caller.
	pub fn is_disconnected(&self) -> bool {
		match self {
			Error::ChannelClosed | Error::TransportError(_) => true,
			Error::Init(inner) => inner.is_disconnected(),
			_ => false,
		}
	}
}
