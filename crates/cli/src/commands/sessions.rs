//! List sessions held by the provider.

use colored::Colorize;
use tc::{format_address, session_satisfies};

use super::CommandContext;
use crate::error::Result;

pub async fn execute(ctx: &CommandContext) -> Result<()> {
	let provider = ctx.factory.get().await?;
	let sessions = provider.sessions().await?;
	if sessions.is_empty() {
		println!("No sessions");
		return Ok(());
	}

	let chain = ctx.config.chain_id();
	let request = ctx.config.capability_request();
	for session in &sessions {
		let address = session
			.address_for(&chain)
			.map(|a| format_address(&a))
			.unwrap_or_else(|| "-".to_string());
		let status = if session_satisfies(session, &request) {
			"reusable".green()
		} else if session.is_expired() {
			"expired".dimmed()
		} else if session.acknowledged {
			"other capabilities".normal()
		} else {
			"unacknowledged".yellow()
		};
		let peer = session.peer_name().unwrap_or("unknown wallet");
		println!("{}  {address}  {status}  {peer}", session.topic);
	}
	Ok(())
}
