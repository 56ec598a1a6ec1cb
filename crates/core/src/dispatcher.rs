//! Remote procedure calls over an established session.

use serde_json::{Value, json};
use tc_protocol::tron::{SIGN_MESSAGE, SIGN_TRANSACTION};
use tc_protocol::{ChainId, RpcRequest};
use tc_runtime::ProviderFactory;
use tracing::debug;

use crate::connector::ActiveSession;
use crate::error::{ConnectError, Result};

/// Forwards requests to the wallet and returns results untouched.
pub struct RequestDispatcher<'a> {
	factory: &'a ProviderFactory,
}

impl<'a> RequestDispatcher<'a> {
	pub fn new(factory: &'a ProviderFactory) -> Self {
		Self { factory }
	}

	/// Sends `method` with `params` to the session `topic` on `chain`.
	///
	/// # Errors
	///
	/// Returns [`ConnectError::Request`] carrying the wallet's or relay's message.
	pub async fn request(&self, topic: &str, chain: &ChainId, method: &str, params: Value) -> Result<Value> {
		let provider = self.factory.get().await.map_err(ConnectError::provider)?;
		debug!(target = "tc.request", %topic, %chain, %method, "dispatching");
		provider
			.request(RpcRequest::new(topic, chain.clone(), method, params))
			.await
			.map_err(|err| {
				self.factory.discard_if_disconnected(&err);
				ConnectError::request(err)
			})
	}

	pub async fn sign_message(&self, session: &ActiveSession, message: &str) -> Result<Value> {
		let params = json!({ "address": session.address, "message": message });
		self.request(&session.topic, &session.chain, SIGN_MESSAGE, params).await
	}

	pub async fn sign_transaction(&self, session: &ActiveSession, transaction: Value) -> Result<Value> {
		let params = json!({ "address": session.address, "transaction": transaction });
		self.request(&session.topic, &session.chain, SIGN_TRANSACTION, params).await
	}
}
