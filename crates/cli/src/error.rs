use thiserror::Error;

pub type Result<T> = std::result::Result<T, CliError>;

#[derive(Debug, Error)]
pub enum CliError {
	#[error(transparent)]
	Connect(#[from] tc::ConnectError),

	#[error(transparent)]
	Runtime(#[from] tc::runtime::Error),

	#[error("invalid transaction JSON: {0}")]
	InvalidTransaction(#[source] serde_json::Error),

	#[error(transparent)]
	Io(#[from] std::io::Error),

	#[error(transparent)]
	Json(#[from] serde_json::Error),

	#[error(transparent)]
	Anyhow(#[from] anyhow::Error),
}

impl CliError {
	pub fn is_user_cancellation(&self) -> bool {
		matches!(self, CliError::Connect(err) if err.is_user_cancellation())
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn cancellation_passes_through() {
		assert!(CliError::from(tc::ConnectError::Cancelled).is_user_cancellation());
		assert!(!CliError::from(tc::ConnectError::NoSession).is_user_cancellation());
	}

	#[test]
	fn connector_messages_are_kept() {
		let err = CliError::from(tc::ConnectError::NoAddress {
			chain: tc::protocol::tron::Network::Mainnet.chain_id(),
		});
		assert_eq!(err.to_string(), "No address found");
	}
}
