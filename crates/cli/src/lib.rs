//! `tc` command-line surface.

pub mod cli;
pub mod commands;
pub mod error;
pub mod logging;
pub mod modal;
pub mod provider;
pub mod state;
pub mod styles;
pub mod types;
