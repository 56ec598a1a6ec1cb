use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use tc::protocol::tron::Network;

/// Tron network selectable from the command line
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, ValueEnum, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NetworkKind {
	/// Tron mainnet
	#[default]
	Mainnet,
	/// Shasta testnet
	Shasta,
	/// Nile testnet
	Nile,
}

impl From<NetworkKind> for Network {
	fn from(kind: NetworkKind) -> Self {
		match kind {
			NetworkKind::Mainnet => Network::Mainnet,
			NetworkKind::Shasta => Network::Shasta,
			NetworkKind::Nile => Network::Nile,
		}
	}
}

impl std::fmt::Display for NetworkKind {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		match self {
			NetworkKind::Mainnet => write!(f, "mainnet"),
			NetworkKind::Shasta => write!(f, "shasta"),
			NetworkKind::Nile => write!(f, "nile"),
		}
	}
}
