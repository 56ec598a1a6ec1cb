//! Provider selection from command-line flags.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use tc::runtime::{BridgeProvider, MemoryProvider, Provider, ProviderOptions, SessionStore};
use tc::{ConnectConfig, ProviderFactory};
use tracing::debug;

use crate::cli::Cli;
use crate::error::Result;
use crate::state::StatePaths;

/// Project id used when the loopback provider runs without one.
const LOOPBACK_PROJECT_ID: &str = "loopback";
/// How long the simulated wallet takes to approve.
const LOOPBACK_APPROVAL_DELAY: Duration = Duration::from_millis(300);

/// Where the provider comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProviderSource {
	Loopback { address: String },
	BridgeUrl(String),
	BridgeScript(Option<PathBuf>),
}

impl ProviderSource {
	pub fn from_cli(cli: &Cli) -> Self {
		if cli.loopback {
			ProviderSource::Loopback {
				address: cli.loopback_address.clone(),
			}
		} else if let Some(url) = &cli.bridge {
			ProviderSource::BridgeUrl(url.clone())
		} else {
			ProviderSource::BridgeScript(cli.bridge_script.clone())
		}
	}
}

/// Builds the connection settings, validating them unless running loopback.
pub fn connect_config(cli: &Cli, source: &ProviderSource) -> Result<ConnectConfig> {
	let project_id = match (&cli.project_id, source) {
		(Some(id), _) => id.clone(),
		(None, ProviderSource::Loopback { .. }) => LOOPBACK_PROJECT_ID.to_string(),
		(None, _) => String::new(),
	};
	let config = ConnectConfig::new(project_id)
		.with_network(cli.network.into())
		.with_relay_url(cli.relay_url.clone());
	config.validate()?;
	Ok(config)
}

/// Creates the factory; nothing is started until the provider is first used.
pub fn build_factory(source: ProviderSource, options: ProviderOptions, paths: &StatePaths) -> ProviderFactory {
	debug!(target = "tc.cli", ?source, "provider source");
	match source {
		ProviderSource::Loopback { address } => {
			let store = SessionStore::new(paths.root(), &options.storage_namespace);
			ProviderFactory::new(move || {
				let store = store.clone();
				let address = address.clone();
				async move {
					let (provider, wallet) = MemoryProvider::with_store(store);
					wallet.auto_approve(vec![address], LOOPBACK_APPROVAL_DELAY);
					Ok(Arc::new(provider) as Arc<dyn Provider>)
				}
			})
		}
		ProviderSource::BridgeUrl(url) => ProviderFactory::new(move || {
			let url = url.clone();
			let options = options.clone();
			async move {
				let provider = BridgeProvider::connect(&url, &options).await?;
				Ok(Arc::new(provider) as Arc<dyn Provider>)
			}
		}),
		ProviderSource::BridgeScript(script) => ProviderFactory::new(move || {
			let script = script.clone();
			let options = options.clone();
			async move {
				let provider = BridgeProvider::spawn(script.as_deref(), &options).await?;
				Ok(Arc::new(provider) as Arc<dyn Provider>)
			}
		}),
	}
}

#[cfg(test)]
mod tests {
	use clap::Parser;

	use super::*;

	fn parse(args: &[&str]) -> Cli {
		Cli::try_parse_from(std::iter::once("tc").chain(args.iter().copied())).unwrap()
	}

	#[test]
	fn loopback_needs_no_project_id() {
		let cli = parse(&["--loopback", "status"]);
		let source = ProviderSource::from_cli(&cli);
		assert!(matches!(source, ProviderSource::Loopback { .. }));
		assert_eq!(connect_config(&cli, &source).unwrap().project_id, LOOPBACK_PROJECT_ID);
	}

	#[test]
	fn bridge_url_wins_over_script() {
		let cli = parse(&["--bridge", "ws://127.0.0.1:9000", "status"]);
		assert_eq!(
			ProviderSource::from_cli(&cli),
			ProviderSource::BridgeUrl("ws://127.0.0.1:9000".into())
		);
	}

	#[test]
	fn explicit_project_id_is_used() {
		let cli = parse(&["--project-id", "abc", "--network", "shasta", "status"]);
		let source = ProviderSource::from_cli(&cli);
		let config = connect_config(&cli, &source).unwrap();
		assert_eq!(config.project_id, "abc");
		assert_eq!(config.chain_id().to_string(), "tron:0x94a9059e");
	}

	#[tokio::test]
	async fn loopback_factory_persists_into_state_dir() {
		let dir = tempfile::tempdir().unwrap();
		let paths = StatePaths::new(Some(dir.path()));
		let cli = parse(&["--loopback", "status"]);
		let source = ProviderSource::from_cli(&cli);
		let options = connect_config(&cli, &source).unwrap().provider_options();

		let factory = build_factory(source, options, &paths);
		let provider = factory.get().await.unwrap();
		assert!(provider.sessions().await.unwrap().is_empty());
	}
}
