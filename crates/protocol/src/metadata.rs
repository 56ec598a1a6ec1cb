//! Application identity advertised to wallets during pairing.

use serde::{Deserialize, Serialize};

/// Dapp or wallet metadata shown on the other side of a pairing.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Metadata {
	pub name: String,
	pub description: String,
	pub url: String,
	#[serde(default)]
	pub icons: Vec<String>,
}

impl Metadata {
	pub fn new(name: impl Into<String>, description: impl Into<String>, url: impl Into<String>) -> Self {
		Self {
			name: name.into(),
			description: description.into(),
			url: url.into(),
			icons: Vec::new(),
		}
	}

	pub fn with_icon(mut self, icon: impl Into<String>) -> Self {
		self.icons.push(icon.into());
		self
	}
}
