//! Signing requests over the recorded session.

use serde_json::Value;
use tc::{ConnectError, Connector};

use super::CommandContext;
use crate::error::{CliError, Result};
use crate::state::load_connection;

fn connector(ctx: &CommandContext) -> Result<Connector<'_>> {
	let session = load_connection(&ctx.paths)?.ok_or(ConnectError::NotConnected)?;
	let mut connector = Connector::new(&ctx.factory, &ctx.config);
	connector.restore(session);
	Ok(connector)
}

fn print_result(result: &Value) -> Result<()> {
	println!("{}", serde_json::to_string_pretty(result)?);
	Ok(())
}

pub async fn message(ctx: &CommandContext, message: &str) -> Result<()> {
	let result = connector(ctx)?.sign_message(message).await?;
	print_result(&result)
}

pub async fn transaction(ctx: &CommandContext, raw: &str) -> Result<()> {
	let transaction = parse_transaction(raw)?;
	let result = connector(ctx)?.sign_transaction(transaction).await?;
	print_result(&result)
}

fn parse_transaction(raw: &str) -> Result<Value> {
	match serde_json::from_str::<Value>(raw).map_err(CliError::InvalidTransaction)? {
		Value::Object(map) => Ok(Value::Object(map)),
		_ => Err(CliError::Anyhow(anyhow::anyhow!("transaction must be a JSON object"))),
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn transaction_must_be_an_object() {
		assert!(parse_transaction(r#"{"txID":"ab","raw_data_hex":"0a"}"#).is_ok());
		assert!(matches!(parse_transaction("{"), Err(CliError::InvalidTransaction(_))));
		assert!(parse_transaction("[1,2]").is_err());
	}
}
