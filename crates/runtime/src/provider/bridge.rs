use std::path::Path;
use std::sync::Arc;

use serde_json::Value;
use tc_protocol::{CapabilityRequest, DisconnectRequest, RpcRequest, Session};
use tokio::sync::broadcast;
use tokio::sync::broadcast::error::RecvError;
use tokio::task::JoinHandle;

use super::{BoxFuture, Provider, ProviderEvent, ProviderOptions};
use crate::bridge::{BridgeProcess, get_bridge_executable};
use crate::connection::Connection;
use crate::error::Result;
use crate::transport::{PipeTransport, TransportParts, WebSocketTransport};

const EVENT_CAPACITY: usize = 64;

/// Provider backed by the bridge sidecar.
///
/// Owns the connection tasks and, when spawned locally, the bridge process;
/// all of them stop when the provider is dropped.
pub struct BridgeProvider {
	connection: Arc<Connection>,
	events: broadcast::Sender<ProviderEvent>,
	tasks: Vec<JoinHandle<()>>,
	_process: Option<BridgeProcess>,
}

impl BridgeProvider {
	/// Launches a local bridge (`node <script>`) and initializes the provider.
	pub async fn spawn(script: Option<&Path>, options: &ProviderOptions) -> Result<Self> {
		let (node, script) = get_bridge_executable(script)?;
		let mut process = BridgeProcess::launch(&node, &script).await?;
		let (stdin, stdout) = process.take_stdio()?;

		let (transport, message_rx) = PipeTransport::new(stdin, stdout);
		Self::start(transport.into_transport_parts(message_rx), Some(process), options).await
	}

	/// Connects to a bridge already listening at `url` and initializes the provider.
	pub async fn connect(url: &str, options: &ProviderOptions) -> Result<Self> {
		let (transport, message_rx) = WebSocketTransport::connect(url).await?;
		Self::start(transport.into_transport_parts(message_rx), None, options).await
	}

	/// Starts the connection over `parts` and sends `init`.
	pub async fn start(parts: TransportParts, process: Option<BridgeProcess>, options: &ProviderOptions) -> Result<Self> {
		let connection = Arc::new(Connection::new(parts));
		let (events, _) = broadcast::channel(EVENT_CAPACITY);

		let mut raw_events = connection.subscribe();
		let forward_tx = events.clone();
		let forward = tokio::spawn(async move {
			loop {
				match raw_events.recv().await {
					Ok(event) => {
						if let Some(event) = ProviderEvent::from_event(&event) {
							let _ = forward_tx.send(event);
						}
					}
					Err(RecvError::Lagged(skipped)) => {
						tracing::warn!(target = "tc.provider", skipped, "provider event subscriber lagged");
					}
					Err(RecvError::Closed) => break,
				}
			}
		});

		let runner = Arc::clone(&connection);
		let run = tokio::spawn(async move {
			if let Err(e) = runner.run().await {
				tracing::error!(target = "tc.provider", error = %e, "bridge connection stopped");
			}
		});

		// Dropping `provider` on failure stops the tasks and the process.
		let provider = Self {
			connection,
			events,
			tasks: vec![forward, run],
			_process: process,
		};

		tracing::debug!(
			target = "tc.provider",
			relay = %options.relay_url,
			namespace = %options.storage_namespace,
			"initializing bridge provider"
		);
		provider.connection.send_message("init", serde_json::to_value(options)?).await?;
		Ok(provider)
	}
}

impl Drop for BridgeProvider {
	fn drop(&mut self) {
		for task in &self.tasks {
			task.abort();
		}
	}
}

impl Provider for BridgeProvider {
	fn sessions(&self) -> BoxFuture<'_, Result<Vec<Session>>> {
		Box::pin(async move {
			let value = self.connection.send_message("sessions", Value::Object(Default::default())).await?;
			Ok(serde_json::from_value(value)?)
		})
	}

	fn pair(&self, request: CapabilityRequest) -> BoxFuture<'static, Result<Option<Session>>> {
		let connection = Arc::clone(&self.connection);
		Box::pin(async move {
			let value = connection.send_message("connect", serde_json::to_value(&request)?).await?;
			if value.is_null() {
				return Ok(None);
			}
			Ok(Some(serde_json::from_value(value)?))
		})
	}

	fn request(&self, request: RpcRequest) -> BoxFuture<'_, Result<Value>> {
		Box::pin(async move { self.connection.send_message("request", serde_json::to_value(&request)?).await })
	}

	fn disconnect(&self, request: DisconnectRequest) -> BoxFuture<'_, Result<()>> {
		Box::pin(async move {
			self.connection.send_message("disconnect", serde_json::to_value(&request)?).await?;
			Ok(())
		})
	}

	fn events(&self) -> broadcast::Receiver<ProviderEvent> {
		self.events.subscribe()
	}
}
