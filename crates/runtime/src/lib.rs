//! Provider runtime - bridge lifecycle, connection, and provider factory
//!
//! This crate provides the infrastructure for talking to a wallet-connection
//! provider without implementing the relay protocol itself:
//!
//! - **Bridge management**: Locating and launching the provider sidecar
//! - **Transport**: Bidirectional communication over stdio pipes or WebSocket
//! - **Connection**: JSON-RPC request/response correlation and event fan-out
//! - **Providers**: The [`Provider`] seam plus bridge-backed and in-memory implementations
//! - **Factory**: Memoized, retry-on-failure provider initialization
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────┐
//! │ tron-connect │  Session locator, pairing race, dispatcher
//! └──────┬───────┘
//!        │ uses dyn Provider
//! ┌──────▼───────┐
//! │  tc-runtime  │  This crate
//! │  ┌────────┐  │
//! │  │Factory │  │  Shared in-flight initialization
//! │  └────────┘  │
//! │  ┌────────┐  │
//! │  │ Conn   │  │  JSON-RPC correlation
//! │  └────────┘  │
//! │  ┌────────┐  │
//! │  │ Trans  │  │  Pipe/WebSocket transport
//! │  └────────┘  │
//! │  ┌────────┐  │
//! │  │ Bridge │  │  Sidecar process management
//! │  └────────┘  │
//! └──────────────┘
//! ```

pub mod bridge;
pub mod connection;
pub mod error;
pub mod factory;
pub mod provider;
pub mod store;
pub mod transport;

pub use bridge::{BridgeProcess, get_bridge_executable};
pub use connection::{Connection, ErrorPayload, Event, Message, Request, Response};
pub use error::{Error, Result};
pub use factory::ProviderFactory;
pub use provider::{
	BoxFuture, BridgeProvider, MemoryProvider, Proposal, Provider, ProviderEvent, ProviderOptions, Responder,
	WalletHandle,
};
pub use store::SessionStore;
pub use transport::{
	PipeTransport, PipeTransportReceiver, PipeTransportSender, Transport, TransportParts, TransportReceiver,
	WebSocketTransport, WebSocketTransportReceiver, WebSocketTransportSender,
};
