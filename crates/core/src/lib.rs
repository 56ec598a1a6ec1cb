//! Wallet session acquisition for Tron over WalletConnect.
//!
//! The crate sits on top of a [`Provider`](tc_runtime::Provider) and owns the
//! few pieces of coordination a dapp needs:
//!
//! - [`locator`]: pick a reusable, acknowledged session for a capability request
//! - [`connector`]: the `idle -> awaiting_uri -> awaiting_approval -> connected | cancelled`
//!   state machine, racing wallet approval against the user closing the modal
//! - [`dispatcher`]: forward signing requests over a session and return raw results
//! - [`modal`]: the display seam the connection URI is handed to
//!
//! ```ignore
//! let config = ConnectConfig::new("project-id");
//! let factory = ProviderFactory::new(move || { /* build provider */ });
//! let mut connector = Connector::new(&factory, &config);
//! let session = connector.connect(&modal).await?;
//! let signature = connector.sign_message("hello").await?;
//! ```

pub mod config;
pub mod connector;
pub mod dispatcher;
pub mod error;
pub mod format;
pub mod locator;
pub mod modal;

pub use config::ConnectConfig;
pub use connector::{ActiveSession, ConnectionState, Connector, PairingEvent, race_pairing};
pub use dispatcher::RequestDispatcher;
pub use error::{ConnectError, Result};
pub use format::format_address;
pub use locator::{SessionLocator, find_reusable_session, session_satisfies};
pub use modal::{ChannelModal, Modal, ModalHandle};

pub use tc_protocol as protocol;
pub use tc_runtime as runtime;
pub use tc_runtime::ProviderFactory;
