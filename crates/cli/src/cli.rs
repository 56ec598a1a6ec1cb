use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tc::config::DEFAULT_RELAY_URL;

use crate::styles::cli_styles;
use crate::types::NetworkKind;

/// Address the loopback wallet approves pairings for.
pub const DEFAULT_LOOPBACK_ADDRESS: &str = "TJRabPrwbZy45sbavfcjinPJC18kjpRTv8";

#[derive(Parser, Debug)]
#[command(name = "tc")]
#[command(about = "Connect a Tron wallet over WalletConnect and sign with it")]
#[command(version)]
#[command(styles = cli_styles())]
pub struct Cli {
	/// Increase verbosity (-v info, -vv debug)
	#[arg(short, long, global = true, action = clap::ArgAction::Count)]
	pub verbose: u8,

	/// Relay WebSocket endpoint
	#[arg(long, global = true, value_name = "URL", default_value = DEFAULT_RELAY_URL)]
	pub relay_url: String,

	/// WalletConnect cloud project id
	#[arg(long, global = true, env = "TC_PROJECT_ID", value_name = "ID")]
	pub project_id: Option<String>,

	/// Tron network to connect on
	#[arg(long, global = true, value_enum, default_value = "mainnet")]
	pub network: NetworkKind,

	/// Connect to a bridge already listening at this WebSocket URL
	#[arg(long, global = true, value_name = "URL", conflicts_with = "bridge_script")]
	pub bridge: Option<String>,

	/// Bridge script launched with node
	#[arg(long, global = true, env = "TC_BRIDGE_SCRIPT", value_name = "FILE")]
	pub bridge_script: Option<PathBuf>,

	/// Use an in-process provider with a simulated wallet
	#[arg(long, global = true)]
	pub loopback: bool,

	/// Address the simulated wallet approves with
	#[arg(long, global = true, value_name = "ADDRESS", default_value = DEFAULT_LOOPBACK_ADDRESS)]
	pub loopback_address: String,

	/// Directory for connection state (defaults to the user config dir)
	#[arg(long, global = true, env = "TC_STATE_DIR", value_name = "DIR")]
	pub state_dir: Option<PathBuf>,

	#[command(subcommand)]
	pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
	/// Acquire a wallet session, reusing a stored one when possible
	Connect {
		/// Stay attached and report when the wallet ends the session
		#[arg(long)]
		wait: bool,
	},

	/// End the current session
	Disconnect,

	/// Show the locally recorded connection
	Status,

	/// List sessions held by the provider
	Sessions,

	/// Ask the wallet to sign a message
	#[command(name = "sign-message")]
	SignMessage {
		message: String,
	},

	/// Ask the wallet to sign a transaction given as JSON
	#[command(name = "sign-transaction")]
	SignTransaction {
		#[arg(value_name = "JSON")]
		transaction: String,
	},
}
