//! Wire types for wallet session negotiation.
//!
//! This crate contains the serde-serializable shapes exchanged with a
//! WalletConnect-style universal provider: chain and account identifiers,
//! capability requests, session payloads, and the remote procedure and
//! disconnect requests issued against an established session.
//!
//! # Design Philosophy
//!
//! Types in this crate are:
//! - **Pure data**: parsing and lookup helpers only, no I/O
//! - **1:1 with the provider API**: field names match the JSON payloads
//! - **Chain-agnostic**: Tron specifics live in [`tron`] as constants
//!
//! Session acquisition logic is built on top of these types in `tron-connect`.

pub mod capability;
pub mod chain;
pub mod metadata;
pub mod rpc;
pub mod session;
pub mod tron;

pub use capability::*;
pub use chain::*;
pub use metadata::*;
pub use rpc::*;
pub use session::*;
