//! End the current session.
//!
//! The recorded connection is cleared even when no provider can be built,
//! e.g. when the project id is missing in this shell.

use colored::Colorize;
use tc::{ActiveSession, Connector};

use super::CommandContext;
use crate::cli::Cli;
use crate::error::Result;
use crate::state::{StatePaths, clear_connection, load_connection};

pub async fn execute(cli: &Cli, paths: &StatePaths) -> Result<()> {
	let Some(session) = load_connection(paths)? else {
		println!("Not connected");
		return Ok(());
	};

	let remote = match CommandContext::from_cli(cli, paths.clone()) {
		Ok(ctx) => end_remote(&ctx, session).await,
		Err(err) => Err(err),
	};
	clear_connection(paths)?;

	if let Err(err) = remote {
		eprintln!("{} remote disconnect failed: {err}", "warning:".yellow().bold());
	}
	println!("{}", "Disconnected".green().bold());
	Ok(())
}

async fn end_remote(ctx: &CommandContext, session: ActiveSession) -> Result<()> {
	let mut connector = Connector::new(&ctx.factory, &ctx.config);
	connector.restore(session);
	connector.disconnect().await?;
	Ok(())
}
