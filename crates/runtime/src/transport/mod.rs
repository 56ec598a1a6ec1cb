//! Bidirectional JSON message transports to the provider bridge.
//!
//! Two framings are supported:
//!
//! - [`PipeTransport`]: stdio of a spawned bridge, each message prefixed with
//!   its byte length as a little-endian `u32`
//! - [`WebSocketTransport`]: a remote bridge, one JSON document per text frame
//!
//! Both split into a sender half (owned by the connection writer task) and a
//! receiver half whose `run` loop forwards parsed messages to an unbounded
//! channel consumed by [`Connection`](crate::Connection).

mod pipe;
mod websocket;


use std::future::Future;
use std::pin::Pin;

use serde_json::Value;
use tokio::sync::mpsc;

use crate::error::Result;

pub use pipe::{MAX_FRAME_LEN, PipeTransport, PipeTransportReceiver, PipeTransportSender};
pub use websocket::{WebSocketTransport, WebSocketTransportReceiver, WebSocketTransportSender};

/// Outbound half of a transport.
pub trait Transport: Send {
	/// Serializes and writes one message.
	fn send(&mut self, message: Value) -> Pin<Box<dyn Future<Output = Result<()>> + Send + '_>>;
}

/// Inbound half of a transport.
pub trait TransportReceiver: Send {
	/// Reads messages until EOF or error, forwarding each to the message channel.
	fn run(self: Box<Self>) -> Pin<Box<dyn Future<Output = Result<()>> + Send>>;
}

/// Both halves of a transport plus the channel the receiver feeds.
pub struct TransportParts {
	pub sender: Box<dyn Transport>,
	pub receiver: Box<dyn TransportReceiver>,
	pub message_rx: mpsc::UnboundedReceiver<Value>,
}
