//! Terminal display for pairing URIs.

use colored::Colorize;
use tc::Modal;
use tc::runtime::BoxFuture;

/// Prints the pairing URI to stderr; Ctrl-C counts as closing it.
#[derive(Debug, Default)]
pub struct TerminalModal;

impl Modal for TerminalModal {
	fn open(&self, uri: &str) {
		eprintln!("{}", "Scan or paste this URI into your Tron wallet:".bold());
		eprintln!("  {}", uri.cyan());
		eprintln!("{}", "Waiting for approval (Ctrl-C to cancel)...".dimmed());
	}

	fn close(&self) {
		tracing::debug!(target = "tc.cli", "pairing display closed");
	}

	fn closed(&self) -> BoxFuture<'static, ()> {
		Box::pin(async {
			if let Err(err) = tokio::signal::ctrl_c().await {
				tracing::warn!(target = "tc.cli", error = %err, "cannot listen for Ctrl-C");
				std::future::pending::<()>().await;
			}
		})
	}
}
