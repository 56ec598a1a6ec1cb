mod connect;
mod disconnect;
mod sessions;
mod sign;
mod status;

use tc::{ConnectConfig, ProviderFactory};

use crate::cli::{Cli, Commands};
use crate::error::Result;
use crate::provider::{ProviderSource, build_factory, connect_config};
use crate::state::StatePaths;

/// What every provider-backed command needs.
pub struct CommandContext {
	pub paths: StatePaths,
	pub config: ConnectConfig,
	pub factory: ProviderFactory,
}

impl CommandContext {
	pub fn from_cli(cli: &Cli, paths: StatePaths) -> Result<Self> {
		let source = ProviderSource::from_cli(cli);
		let config = connect_config(cli, &source)?;
		let factory = build_factory(source, config.provider_options(), &paths);
		Ok(Self { paths, config, factory })
	}
}

pub async fn dispatch(cli: Cli) -> Result<()> {
	let paths = StatePaths::new(cli.state_dir.as_deref());

	// Local state must stay readable and clearable without provider settings.
	match cli.command {
		Commands::Status => return status::execute(&paths),
		Commands::Disconnect => return disconnect::execute(&cli, &paths).await,
		_ => {}
	}

	let ctx = CommandContext::from_cli(&cli, paths)?;
	match cli.command {
		Commands::Connect { wait } => connect::execute(&ctx, wait).await,
		Commands::Sessions => sessions::execute(&ctx).await,
		Commands::SignMessage { message } => sign::message(&ctx, &message).await,
		Commands::SignTransaction { transaction } => sign::transaction(&ctx, &transaction).await,
		// Handled above.
		Commands::Status | Commands::Disconnect => Ok(()),
	}
}
