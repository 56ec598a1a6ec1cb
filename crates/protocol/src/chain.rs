//! CAIP-style chain and account identifiers.
//!
//! Chains are written `<namespace>:<reference>` (e.g. `tron:0x2b6653dc`) and
//! accounts extend that with the address: `<namespace>:<reference>:<address>`.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use thiserror::Error;

/// Failure to parse a chain or account identifier.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum IdError {
	#[error("invalid chain id '{0}': expected '<namespace>:<reference>'")]
	Chain(String),

	#[error("invalid account id '{0}': expected '<namespace>:<reference>:<address>'")]
	Account(String),
}

/// Chain identifier, e.g. `tron:0x2b6653dc`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ChainId {
	namespace: String,
	reference: String,
}

impl ChainId {
	/// Builds a chain id from its parts.
	pub fn new(namespace: impl Into<String>, reference: impl Into<String>) -> Self {
		Self {
			namespace: namespace.into(),
			reference: reference.into(),
		}
	}

	/// Chain family, e.g. `tron`.
	pub fn namespace(&self) -> &str {
		&self.namespace
	}

	/// Chain reference within the namespace, e.g. `0x2b6653dc`.
	pub fn reference(&self) -> &str {
		&self.reference
	}
}

impl fmt::Display for ChainId {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "{}:{}", self.namespace, self.reference)
	}
}

impl FromStr for ChainId {
	type Err = IdError;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		match s.split_once(':') {
			Some((ns, reference)) if !ns.is_empty() && !reference.is_empty() && !reference.contains(':') => {
				Ok(Self::new(ns, reference))
			}
			_ => Err(IdError::Chain(s.to_string())),
		}
	}
}

impl Serialize for ChainId {
	fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
		serializer.collect_str(self)
	}
}

impl<'de> Deserialize<'de> for ChainId {
	fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
		let raw = String::deserialize(deserializer)?;
		raw.parse().map_err(serde::de::Error::custom)
	}
}

/// Account identifier, e.g. `tron:0x2b6653dc:TXYZ...`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct AccountId {
	chain: ChainId,
	address: String,
}

impl AccountId {
	pub fn new(chain: ChainId, address: impl Into<String>) -> Self {
		Self {
			chain,
			address: address.into(),
		}
	}

	pub fn chain(&self) -> &ChainId {
		&self.chain
	}

	pub fn address(&self) -> &str {
		&self.address
	}
}

impl fmt::Display for AccountId {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "{}:{}", self.chain, self.address)
	}
}

impl FromStr for AccountId {
	type Err = IdError;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		let mut parts = s.splitn(3, ':');
		match (parts.next(), parts.next(), parts.next()) {
			(Some(ns), Some(reference), Some(address)) if !ns.is_empty() && !reference.is_empty() && !address.is_empty() => {
				Ok(Self::new(ChainId::new(ns, reference), address))
			}
			_ => Err(IdError::Account(s.to_string())),
		}
	}
}
