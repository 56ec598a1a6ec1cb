//! Established session payloads as reported by the provider.

use std::collections::BTreeMap;
use std::time::{SystemTime, UNIX_EPOCH};

use serde::{Deserialize, Serialize};

use crate::chain::{AccountId, ChainId};
use crate::metadata::Metadata;

/// Accounts, methods and events granted for one namespace of a session.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionNamespace {
	/// Explicit chain list; older wallets omit it and only report accounts.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub chains: Option<Vec<ChainId>>,
	/// Account ids of the form `<namespace>:<reference>:<address>`, in wallet order.
	#[serde(default)]
	pub accounts: Vec<String>,
	#[serde(default)]
	pub methods: Vec<String>,
	#[serde(default)]
	pub events: Vec<String>,
}

impl SessionNamespace {
	/// Chains granted in this namespace, derived from accounts when not listed.
	pub fn chains(&self) -> Vec<ChainId> {
		if let Some(chains) = &self.chains {
			return chains.clone();
		}
		let mut chains: Vec<ChainId> = Vec::new();
		for account in self.parsed_accounts() {
			if !chains.contains(account.chain()) {
				chains.push(account.chain().clone());
			}
		}
		chains
	}

	/// Accounts that parse as valid account ids; malformed entries are skipped.
	pub fn parsed_accounts(&self) -> impl Iterator<Item = AccountId> + '_ {
		self.accounts.iter().filter_map(|raw| raw.parse().ok())
	}
}

/// The remote party of a session.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Peer {
	#[serde(default)]
	pub public_key: String,
	#[serde(default)]
	pub metadata: Metadata,
}

/// Session handle issued by the relay, addressed by its topic.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
	pub topic: String,
	#[serde(default)]
	pub namespaces: BTreeMap<String, SessionNamespace>,
	/// Whether the wallet has acknowledged the session settlement.
	#[serde(default)]
	pub acknowledged: bool,
	/// Expiry as unix seconds.
	#[serde(default)]
	pub expiry: u64,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub peer: Option<Peer>,
}

impl Session {
	/// First account address on `chain`, in the order the wallet reported them.
	pub fn address_for(&self, chain: &ChainId) -> Option<String> {
		self.namespaces
			.get(chain.namespace())?
			.parsed_accounts()
			.find(|account| account.chain() == chain)
			.map(|account| account.address().to_string())
	}

	/// Whether the session expired at or before `now` (unix seconds).
	///
	/// An expiry of zero means the relay never reported one.
	pub fn is_expired_at(&self, now: u64) -> bool {
		self.expiry != 0 && self.expiry <= now
	}

	/// Whether the session has expired by the system clock.
	pub fn is_expired(&self) -> bool {
		let now = SystemTime::now().duration_since(UNIX_EPOCH).map(|d| d.as_secs()).unwrap_or_default();
		self.is_expired_at(now)
	}

	/// Peer display name, if the wallet sent metadata.
	pub fn peer_name(&self) -> Option<&str> {
		self.peer.as_ref().map(|p| p.metadata.name.as_str()).filter(|n| !n.is_empty())
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	fn tron_session(accounts: &[&str]) -> Session {
		let mut namespaces = BTreeMap::new();
		namespaces.insert(
			"tron".to_string(),
			SessionNamespace {
				accounts: accounts.iter().map(|a| a.to_string()).collect(),
				..SessionNamespace::default()
			},
		);
		Session {
			topic: "topic-1".into(),
			namespaces,
			acknowledged: true,
			..Session::default()
		}
	}

	#[test]
	fn extracts_address_for_chain() {
		let session = tron_session(&["tron:0x2b6653dc:TAbc123"]);
		let chain = ChainId::new("tron", "0x2b6653dc");
		assert_eq!(session.address_for(&chain).as_deref(), Some("TAbc123"));
	}

	#[test]
	fn address_lookup_ignores_other_chains_and_garbage() {
		let session = tron_session(&["garbage", "tron:0xcd8690dc:TNile", "tron:0x2b6653dc:TMain"]);
		assert_eq!(
			session.address_for(&ChainId::new("tron", "0x2b6653dc")).as_deref(),
			Some("TMain")
		);
		assert_eq!(session.address_for(&ChainId::new("tron", "0x94a9059e")), None);
		assert_eq!(session.address_for(&ChainId::new("eip155", "1")), None);
	}

	#[test]
	fn chains_fall_back_to_accounts() {
		let session = tron_session(&["tron:0x2b6653dc:TA", "tron:0x2b6653dc:TB", "tron:0xcd8690dc:TC"]);
		let chains = session.namespaces["tron"].chains();
		assert_eq!(
			chains,
			vec![ChainId::new("tron", "0x2b6653dc"), ChainId::new("tron", "0xcd8690dc")]
		);
	}

	#[test]
	fn expiry_zero_never_expires() {
		let mut session = tron_session(&[]);
		assert!(!session.is_expired_at(u64::MAX));

		session.expiry = 100;
		assert!(!session.is_expired_at(99));
		assert!(session.is_expired_at(100));
	}

	#[test]
	fn deserializes_provider_payload() {
		let session: Session = serde_json::from_value(serde_json::json!({
			"topic": "abc",
			"acknowledged": true,
			"expiry": 1700000000u64,
			"namespaces": {
				"tron": {
					"accounts": ["tron:0x2b6653dc:TAbc123"],
					"methods": ["tron_signMessage"],
					"events": []
				}
			},
			"peer": { "publicKey": "ff", "metadata": { "name": "TronLink", "description": "", "url": "" } }
		}))
		.unwrap();

		assert_eq!(session.topic, "abc");
		assert_eq!(session.peer_name(), Some("TronLink"));
		assert_eq!(session.namespaces["tron"].methods, vec!["tron_signMessage".to_string()]);
	}
}
