use tc_protocol::ChainId;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, ConnectError>;

/// Fallback shown when a provider failure carries no message.
pub const GENERIC_FAILURE: &str = "Failed to connect";

#[derive(Debug, Error)]
pub enum ConnectError {
	/// The user closed the pairing display before the wallet approved.
	#[error("Connection cancelled by user")]
	Cancelled,

	/// Pairing finished without producing a session.
	#[error("No session")]
	NoSession,

	/// The session grants no account on the target chain.
	#[error("No address found")]
	NoAddress { chain: ChainId },

	/// An operation needed a connected session.
	#[error("Wallet not connected")]
	NotConnected,

	#[error("{0}")]
	Config(String),

	/// Provider, relay or bridge failure.
	#[error("{0}")]
	Provider(String),

	/// A request over an established session failed.
	#[error("{0}")]
	Request(String),
}

impl ConnectError {
	/// Wraps a runtime error as a provider failure.
	pub fn provider(err: tc_runtime::Error) -> Self {
		ConnectError::Provider(message_or_fallback(&err))
	}

	/// Wraps a runtime error as a request failure.
	pub fn request(err: tc_runtime::Error) -> Self {
		ConnectError::Request(message_or_fallback(&err))
	}

	/// True only for the typed cancellation raised when the modal is closed.
	///
	/// Provider messages are never inspected; a wallet-side rejection that
	/// happens to mention "closed" is still a failure.
	pub fn is_user_cancellation(&self) -> bool {
		matches!(self, ConnectError::Cancelled)
	}
}

fn message_or_fallback(err: &tc_runtime::Error) -> String {
	let message = err.to_string();
	if message.trim().is_empty() {
		GENERIC_FAILURE.to_string()
	} else {
		message
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn fixed_messages() {
		assert_eq!(ConnectError::NoSession.to_string(), "No session");
		assert_eq!(
			ConnectError::NoAddress {
				chain: ChainId::new("tron", "0x2b6653dc")
			}
			.to_string(),
			"No address found"
		);
	}

	#[test]
	fn empty_provider_message_falls_back() {
		let err = ConnectError::provider(tc_runtime::Error::Remote {
			code: None,
			message: String::new(),
		});
		assert_eq!(err.to_string(), GENERIC_FAILURE);
	}

	#[test]
	fn only_typed_cancellation_is_benign() {
		assert!(ConnectError::Cancelled.is_user_cancellation());
		let lookalike = ConnectError::provider(tc_runtime::Error::Remote {
			code: None,
			message: "Connection closed by relay".into(),
		});
		assert!(!lookalike.is_user_cancellation());
	}
}
