//! Application-level connection settings.

use tc_protocol::tron::Network;
use tc_protocol::{CapabilityRequest, ChainId, Metadata};
use tc_runtime::ProviderOptions;

use crate::error::{ConnectError, Result};

pub const DEFAULT_RELAY_URL: &str = "wss://relay.walletconnect.com";
pub const DEFAULT_STORAGE_NAMESPACE: &str = "tron-connect";

/// Settings fixed for the lifetime of a provider.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConnectConfig {
	pub relay_url: String,
	pub project_id: String,
	pub metadata: Metadata,
	pub storage_namespace: String,
	pub network: Network,
}

impl Default for ConnectConfig {
	fn default() -> Self {
		Self {
			relay_url: DEFAULT_RELAY_URL.to_string(),
			project_id: String::new(),
			metadata: default_metadata(),
			storage_namespace: DEFAULT_STORAGE_NAMESPACE.to_string(),
			network: Network::default(),
		}
	}
}

fn default_metadata() -> Metadata {
	Metadata::new("Example App", "Example App", "https://yourdapp-url.com").with_icon("https://yourdapp-url.com/icon.png")
}

impl ConnectConfig {
	pub fn new(project_id: impl Into<String>) -> Self {
		Self {
			project_id: project_id.into(),
			..Self::default()
		}
	}

	pub fn with_network(mut self, network: Network) -> Self {
		self.network = network;
		self
	}

	pub fn with_relay_url(mut self, relay_url: impl Into<String>) -> Self {
		self.relay_url = relay_url.into();
		self
	}

	/// Rejects settings no relay would accept.
	pub fn validate(&self) -> Result<()> {
		if self.project_id.trim().is_empty() {
			return Err(ConnectError::Config("Project ID is not defined".into()));
		}
		if !(self.relay_url.starts_with("wss://") || self.relay_url.starts_with("ws://")) {
			return Err(ConnectError::Config(format!(
				"relay url must be a websocket url: {}",
				self.relay_url
			)));
		}
		Ok(())
	}

	pub fn provider_options(&self) -> ProviderOptions {
		ProviderOptions {
			relay_url: self.relay_url.clone(),
			project_id: self.project_id.clone(),
			metadata: self.metadata.clone(),
			storage_namespace: self.storage_namespace.clone(),
		}
	}

	pub fn chain_id(&self) -> ChainId {
		self.network.chain_id()
	}

	pub fn capability_request(&self) -> CapabilityRequest {
		self.network.capability_request()
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn defaults() {
		let config = ConnectConfig::new("abc");
		assert_eq!(config.relay_url, DEFAULT_RELAY_URL);
		assert_eq!(config.network, Network::Mainnet);
		assert_eq!(config.metadata.name, "Example App");
		assert_eq!(config.chain_id().to_string(), "tron:0x2b6653dc");
		config.validate().unwrap();
	}

	#[test]
	fn missing_project_id_is_rejected() {
		let err = ConnectConfig::default().validate().unwrap_err();
		assert_eq!(err.to_string(), "Project ID is not defined");
	}

	#[test]
	fn relay_must_be_websocket() {
		let err = ConnectConfig::new("abc").with_relay_url("https://relay.example").validate().unwrap_err();
		assert!(matches!(err, ConnectError::Config(_)));
	}

	#[test]
	fn provider_options_carry_settings() {
		let options = ConnectConfig::new("abc").with_network(Network::Nile).provider_options();
		assert_eq!(options.project_id, "abc");
		assert_eq!(options.storage_namespace, DEFAULT_STORAGE_NAMESPACE);
	}
}
