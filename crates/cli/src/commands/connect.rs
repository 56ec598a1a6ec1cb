//! Acquire a wallet session.

use colored::Colorize;
use tc::{Connector, format_address};
use tokio::sync::broadcast::error::RecvError;
use tracing::debug;

use super::CommandContext;
use crate::error::{CliError, Result};
use crate::modal::TerminalModal;
use crate::state::{clear_connection, save_connection};

pub async fn execute(ctx: &CommandContext, wait: bool) -> Result<()> {
	let mut connector = Connector::new(&ctx.factory, &ctx.config);

	let session = match connector.connect(&TerminalModal).await {
		Ok(session) => session,
		Err(err) => {
			let err = CliError::from(err);
			if err.is_user_cancellation() {
				eprintln!("{}", "Connection cancelled".yellow());
				return Ok(());
			}
			return Err(err);
		}
	};

	save_connection(&ctx.paths, &session)?;
	let origin = if session.reused { "reused session" } else { "new session" };
	println!(
		"{} {} on {} ({origin})",
		"Connected".green().bold(),
		format_address(&session.address),
		ctx.config.network
	);
	println!("  {} {}", "topic".dimmed(), session.topic);

	if wait {
		watch(ctx, &mut connector).await?;
	}
	Ok(())
}

/// Stays attached until the wallet ends the session or the user detaches.
async fn watch(ctx: &CommandContext, connector: &mut Connector<'_>) -> Result<()> {
	let provider = ctx.factory.get().await?;
	let mut events = provider.events();
	eprintln!("{}", "Watching session (Ctrl-C to detach)".dimmed());

	loop {
		tokio::select! {
			event = events.recv() => match event {
				Ok(event) => {
					if connector.handle_event(&event) {
						clear_connection(&ctx.paths)?;
						println!("{}", "Session ended by wallet".yellow());
						return Ok(());
					}
				}
				Err(RecvError::Lagged(skipped)) => debug!(target = "tc.cli", skipped, "event watcher lagged"),
				Err(RecvError::Closed) => return Ok(()),
			},
			_ = tokio::signal::ctrl_c() => return Ok(()),
		}
	}
}
