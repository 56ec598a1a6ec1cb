//! End-to-end runs of `tc` against the in-process loopback wallet.

use std::path::Path;
use std::process::Command;

use serde_json::Value;
use tempfile::TempDir;

const ADDRESS: &str = "TJRabPrwbZy45sbavfcjinPJC18kjpRTv8";

fn run_tc(state: &Path, args: &[&str]) -> (bool, String, String) {
	run_tc_with(state, &["--loopback"], args)
}

fn run_tc_with(state: &Path, flags: &[&str], args: &[&str]) -> (bool, String, String) {
	let output = Command::new(env!("CARGO_BIN_EXE_tc"))
		.args(flags)
		.arg("--state-dir")
		.arg(state)
		.args(args)
		.env("NO_COLOR", "1")
		.env_remove("TC_PROJECT_ID")
		.env_remove("TC_BRIDGE_SCRIPT")
		.env_remove("TC_STATE_DIR")
		.env_remove("RUST_LOG")
		.output()
		.expect("failed to execute tc");

	(
		output.status.success(),
		String::from_utf8_lossy(&output.stdout).to_string(),
		String::from_utf8_lossy(&output.stderr).to_string(),
	)
}

#[test]
fn connect_pairs_then_reuses() {
	let state = TempDir::new().unwrap();

	let (ok, stdout, stderr) = run_tc(state.path(), &["connect"]);
	assert!(ok, "connect failed: {stderr}");
	assert!(stdout.contains("TJRabP...RTv8"), "stdout: {stdout}");
	assert!(stdout.contains("new session"), "stdout: {stdout}");
	assert!(stderr.contains("wc:"), "pairing uri not shown: {stderr}");

	let (ok, stdout, stderr) = run_tc(state.path(), &["connect"]);
	assert!(ok, "second connect failed: {stderr}");
	assert!(stdout.contains("reused session"), "stdout: {stdout}");
	assert!(!stderr.contains("wc:"), "modal opened for a reusable session: {stderr}");
}

#[test]
fn sign_message_round_trips_through_wallet() {
	let state = TempDir::new().unwrap();
	assert!(run_tc(state.path(), &["connect"]).0);

	let (ok, stdout, stderr) = run_tc(state.path(), &["sign-message", "hello tron"]);
	assert!(ok, "sign-message failed: {stderr}");
	let result: Value = serde_json::from_str(&stdout).expect("raw JSON result");
	assert_eq!(result["method"], "tron_signMessage");
	assert_eq!(result["params"]["message"], "hello tron");
	assert_eq!(result["params"]["address"], ADDRESS);
}

#[test]
fn sign_transaction_forwards_payload() {
	let state = TempDir::new().unwrap();
	assert!(run_tc(state.path(), &["connect"]).0);

	let (ok, stdout, stderr) = run_tc(state.path(), &["sign-transaction", r#"{"txID":"ab12"}"#]);
	assert!(ok, "sign-transaction failed: {stderr}");
	let result: Value = serde_json::from_str(&stdout).unwrap();
	assert_eq!(result["method"], "tron_signTransaction");
	assert_eq!(result["params"]["transaction"]["txID"], "ab12");
}

#[test]
fn signing_requires_connection() {
	let state = TempDir::new().unwrap();
	let (ok, _stdout, stderr) = run_tc(state.path(), &["sign-message", "hi"]);
	assert!(!ok);
	assert!(stderr.contains("Wallet not connected"), "stderr: {stderr}");
}

#[test]
fn disconnect_clears_status() {
	let state = TempDir::new().unwrap();
	assert!(run_tc(state.path(), &["connect"]).0);

	let (_, stdout, _) = run_tc(state.path(), &["status"]);
	assert!(stdout.contains(ADDRESS), "stdout: {stdout}");

	let (ok, stdout, stderr) = run_tc(state.path(), &["disconnect"]);
	assert!(ok, "disconnect failed: {stderr}");
	assert!(stdout.contains("Disconnected"));

	let (_, stdout, _) = run_tc(state.path(), &["status"]);
	assert!(stdout.contains("Not connected"), "stdout: {stdout}");

	let (_, stdout, _) = run_tc(state.path(), &["sessions"]);
	assert!(stdout.contains("No sessions"), "stdout: {stdout}");
}

#[test]
fn disconnect_clears_state_without_provider_settings() {
	let state = TempDir::new().unwrap();
	assert!(run_tc(state.path(), &["connect"]).0);

	// No --loopback and no project id: the provider cannot be built.
	let (ok, stdout, stderr) = run_tc_with(state.path(), &[], &["disconnect"]);
	assert!(ok, "disconnect failed: {stderr}");
	assert!(stdout.contains("Disconnected"), "stdout: {stdout}");
	assert!(stderr.contains("Project ID is not defined"), "stderr: {stderr}");

	let (_, stdout, _) = run_tc(state.path(), &["status"]);
	assert!(stdout.contains("Not connected"), "stdout: {stdout}");
}

#[test]
fn disconnect_without_connection_is_a_no_op() {
	let state = TempDir::new().unwrap();
	let (ok, stdout, _) = run_tc(state.path(), &["disconnect"]);
	assert!(ok);
	assert!(stdout.contains("Not connected"));
}

#[test]
fn sessions_marks_reusable_entries() {
	let state = TempDir::new().unwrap();
	assert!(run_tc(state.path(), &["connect"]).0);

	let (ok, stdout, _) = run_tc(state.path(), &["sessions"]);
	assert!(ok);
	assert!(stdout.contains("reusable"), "stdout: {stdout}");

	// A different network needs its own pairing.
	let (_, stdout, _) = run_tc(state.path(), &["--network", "nile", "sessions"]);
	assert!(stdout.contains("other capabilities"), "stdout: {stdout}");
}
