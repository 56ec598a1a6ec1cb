//! JSON-RPC connection to the provider bridge.
//!
//! Requests carry sequential ids and park a oneshot sender in a pending table
//! until the matching response arrives. Anything carrying an `event` field is
//! broadcast to subscribers; anything else is logged and ignored.
//!
//! Dropping a request future removes its pending entry, so a caller that
//! stops waiting (e.g. a pairing that lost a race) leaves nothing behind.

#[cfg(test)]
mod tests;

use std::collections::HashMap;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::sync::atomic::{AtomicU32, Ordering};
use std::task::{Context, Poll};

use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tokio::sync::{broadcast, mpsc, oneshot};
use tracing::{debug, error, warn};

use crate::error::{Error, Result};
use crate::transport::{Transport, TransportParts, TransportReceiver};

/// Slow subscribers lag once this many events are buffered.
const EVENT_CAPACITY: usize = 64;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Request {
	pub id: u32,
	pub method: String,
	pub params: Value,
}

/// Reply to a [`Request`]; `result` and `error` are mutually exclusive.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Response {
	pub id: u32,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub result: Option<Value>,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub error: Option<ErrorPayload>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorPayload {
	#[serde(skip_serializing_if = "Option::is_none")]
	pub code: Option<i64>,
	pub message: String,
}

impl From<ErrorPayload> for Error {
	fn from(payload: ErrorPayload) -> Self {
		Error::Remote {
			code: payload.code,
			message: payload.message,
		}
	}
}

/// Unsolicited notification, e.g. `display_uri` or `session_delete`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Event {
	pub event: String,
	#[serde(default)]
	pub params: Value,
}

/// Any frame the bridge may send.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Message {
	Response(Response),
	Event(Event),
	/// Frames from newer bridges this side does not understand.
	Unknown(Value),
}

type Pending = Arc<Mutex<HashMap<u32, oneshot::Sender<Result<Value>>>>>;

/// Removes the pending entry unless the reply was delivered.
struct PendingGuard {
	id: u32,
	pending: Pending,
	settled: bool,
}

impl Drop for PendingGuard {
	fn drop(&mut self) {
		if !self.settled && self.pending.lock().remove(&self.id).is_some() {
			debug!(target = "tc.connection", id = self.id, "request abandoned");
		}
	}
}

struct Reply {
	rx: oneshot::Receiver<Result<Value>>,
	guard: PendingGuard,
}

impl Future for Reply {
	type Output = Result<Value>;

	fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
		let outcome = std::task::ready!(Pin::new(&mut self.rx).poll(cx));
		self.guard.settled = true;
		Poll::Ready(outcome.unwrap_or(Err(Error::ChannelClosed)))
	}
}

/// Transport pieces consumed by the first [`Connection::run`].
struct Halves {
	sender: Box<dyn Transport>,
	receiver: Box<dyn TransportReceiver>,
	inbound: mpsc::UnboundedReceiver<Value>,
	outbound: mpsc::UnboundedReceiver<Value>,
}

pub struct Connection {
	next_id: AtomicU32,
	pending: Pending,
	outbound: mpsc::UnboundedSender<Value>,
	events: broadcast::Sender<Event>,
	halves: Mutex<Option<Halves>>,
}

impl Connection {
	pub fn new(parts: TransportParts) -> Self {
		let (outbound, outbound_rx) = mpsc::unbounded_channel();
		let (events, _) = broadcast::channel(EVENT_CAPACITY);
		Self {
			next_id: AtomicU32::new(0),
			pending: Arc::new(Mutex::new(HashMap::new())),
			outbound,
			events,
			halves: Mutex::new(Some(Halves {
				sender: parts.sender,
				receiver: parts.receiver,
				inbound: parts.message_rx,
				outbound: outbound_rx,
			})),
		}
	}

	/// Subscribes to events received after this call.
	pub fn subscribe(&self) -> broadcast::Receiver<Event> {
		self.events.subscribe()
	}

	fn next_id(&self) -> u32 {
		self.next_id.fetch_add(1, Ordering::SeqCst)
	}

	/// Sends `method` and waits for the correlated response.
	///
	/// Requests queued before [`run`](Self::run) starts are written once it does.
	pub async fn send_message(&self, method: &str, params: Value) -> Result<Value> {
		let id = self.next_id();
		let (tx, rx) = oneshot::channel();
		self.pending.lock().insert(id, tx);
		let guard = PendingGuard {
			id,
			pending: Arc::clone(&self.pending),
			settled: false,
		};

		let frame = serde_json::to_value(Request {
			id,
			method: method.to_string(),
			params,
		})?;
		debug!(target = "tc.connection", id, method, "request");
		self.outbound.send(frame).map_err(|_| Error::ChannelClosed)?;

		Reply { rx, guard }.await
	}

	/// Pumps frames until the transport closes, then fails every pending request
	/// with [`Error::ChannelClosed`]. Runs at most once.
	pub async fn run(self: &Arc<Self>) -> Result<()> {
		let Halves {
			mut sender,
			receiver,
			mut inbound,
			mut outbound,
		} = self
			.halves
			.lock()
			.take()
			.ok_or_else(|| Error::ProtocolError("connection is already running".to_string()))?;

		let reader = tokio::spawn(async move {
			if let Err(e) = receiver.run().await {
				error!(target = "tc.connection", error = %e, "bridge read failed");
			}
		});
		let writer = tokio::spawn(async move {
			while let Some(frame) = outbound.recv().await {
				if let Err(e) = sender.send(frame).await {
					error!(target = "tc.connection", error = %e, "bridge write failed");
					break;
				}
			}
		});

		while let Some(frame) = inbound.recv().await {
			let message = match serde_json::from_value::<Message>(frame) {
				Ok(message) => message,
				Err(e) => {
					warn!(target = "tc.connection", error = %e, "malformed frame");
					continue;
				}
			};
			if let Err(e) = self.dispatch(message) {
				warn!(target = "tc.connection", error = %e, "undeliverable frame");
			}
		}

		let orphaned: Vec<_> = self.pending.lock().drain().map(|(_, tx)| tx).collect();
		for tx in orphaned {
			let _ = tx.send(Err(Error::ChannelClosed));
		}

		let _ = reader.await;
		writer.abort();
		Ok(())
	}

	pub(crate) fn dispatch(&self, message: Message) -> Result<()> {
		match message {
			Message::Response(response) => {
				let tx = self.pending.lock().remove(&response.id).ok_or_else(|| {
					Error::ProtocolError(format!("response for unknown request id={}", response.id))
				})?;
				let outcome = match response.error {
					Some(payload) => Err(payload.into()),
					None => Ok(response.result.unwrap_or(Value::Null)),
				};
				let _ = tx.send(outcome);
			}
			Message::Event(event) => {
				debug!(target = "tc.connection", event = %event.event, "event");
				// Events nobody listens for are dropped.
				let _ = self.events.send(event);
			}
			Message::Unknown(value) => {
				debug!(target = "tc.connection", frame = %value, "ignoring unrecognized frame");
			}
		}
		Ok(())
	}
}
