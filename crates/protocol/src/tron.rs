//! Tron namespace constants.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::capability::{CapabilityRequest, NamespaceRequest};
use crate::chain::ChainId;

pub const NAMESPACE: &str = "tron";

pub const SIGN_TRANSACTION: &str = "tron_signTransaction";
pub const SIGN_MESSAGE: &str = "tron_signMessage";

/// Tron networks reachable over WalletConnect.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Network {
	#[default]
	Mainnet,
	Shasta,
	Nile,
}

impl Network {
	/// Genesis-derived chain reference.
	pub fn reference(self) -> &'static str {
		match self {
			Network::Mainnet => "0x2b6653dc",
			Network::Shasta => "0x94a9059e",
			Network::Nile => "0xcd8690dc",
		}
	}

	pub fn chain_id(self) -> ChainId {
		ChainId::new(NAMESPACE, self.reference())
	}

	/// Capabilities requested for signing on this network.
	pub fn capability_request(self) -> CapabilityRequest {
		CapabilityRequest::default().require(
			NAMESPACE,
			NamespaceRequest::new(vec![self.chain_id()]).with_methods([SIGN_TRANSACTION, SIGN_MESSAGE]),
		)
	}
}

impl fmt::Display for Network {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		let name = match self {
			Network::Mainnet => "Mainnet",
			Network::Shasta => "Shasta",
			Network::Nile => "Nile",
		};
		f.write_str(name)
	}
}
