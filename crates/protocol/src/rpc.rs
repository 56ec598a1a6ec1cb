//! Requests issued against an established session.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::chain::ChainId;

/// Method name and method-specific parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RequestArguments {
	pub method: String,
	pub params: Value,
}

/// Remote procedure call routed to the wallet over a session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RpcRequest {
	pub chain_id: ChainId,
	pub topic: String,
	pub request: RequestArguments,
}

impl RpcRequest {
	pub fn new(topic: impl Into<String>, chain_id: ChainId, method: impl Into<String>, params: Value) -> Self {
		Self {
			chain_id,
			topic: topic.into(),
			request: RequestArguments {
				method: method.into(),
				params,
			},
		}
	}
}

/// Reason attached to a session termination.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Reason {
	pub code: i64,
	pub message: String,
}

impl Reason {
	/// Code used when the user asks to end the session.
	pub const USER_DISCONNECTED: i64 = 6000;

	pub fn user_disconnected() -> Self {
		Self {
			code: Self::USER_DISCONNECTED,
			message: "User disconnected.".to_string(),
		}
	}
}

/// Request to terminate a session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DisconnectRequest {
	pub topic: String,
	pub reason: Reason,
}

impl DisconnectRequest {
	pub fn user_disconnected(topic: impl Into<String>) -> Self {
		Self {
			topic: topic.into(),
			reason: Reason::user_disconnected(),
		}
	}
}
