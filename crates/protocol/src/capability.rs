//! Capability requests sent when searching for or proposing a session.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::chain::ChainId;

/// Chains, methods and events requested for one namespace.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NamespaceRequest {
	/// Chain ids within the namespace.
	pub chains: Vec<ChainId>,
	/// Permitted remote procedure method names.
	pub methods: Vec<String>,
	/// Subscribed event names.
	#[serde(default)]
	pub events: Vec<String>,
}

impl NamespaceRequest {
	pub fn new(chains: Vec<ChainId>) -> Self {
		Self {
			chains,
			..Self::default()
		}
	}

	pub fn with_methods<I, S>(mut self, methods: I) -> Self
	where
		I: IntoIterator<Item = S>,
		S: Into<String>,
	{
		self.methods = methods.into_iter().map(Into::into).collect();
		self
	}

	pub fn with_events<I, S>(mut self, events: I) -> Self
	where
		I: IntoIterator<Item = S>,
		S: Into<String>,
	{
		self.events = events.into_iter().map(Into::into).collect();
		self
	}
}

/// Capability set used both for session lookup and for new pairings.
///
/// Keys are namespace names (`tron`, `eip155`, ...).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CapabilityRequest {
	#[serde(default)]
	pub required_namespaces: BTreeMap<String, NamespaceRequest>,
	#[serde(default)]
	pub optional_namespaces: BTreeMap<String, NamespaceRequest>,
}

impl CapabilityRequest {
	/// Adds a required namespace.
	pub fn require(mut self, namespace: impl Into<String>, request: NamespaceRequest) -> Self {
		self.required_namespaces.insert(namespace.into(), request);
		self
	}

	/// Adds an optional namespace.
	pub fn optional(mut self, namespace: impl Into<String>, request: NamespaceRequest) -> Self {
		self.optional_namespaces.insert(namespace.into(), request);
		self
	}
}
