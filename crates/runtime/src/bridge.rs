//! Provider bridge process management
//!
//! The bridge is a small Node.js script hosting the WalletConnect universal
//! provider. It speaks length-prefixed JSON-RPC over stdio; this module
//! locates and launches it.

use std::path::{Path, PathBuf};
use std::process::Stdio;
use std::time::Duration;

use tokio::process::{Child, ChildStdin, ChildStdout, Command};
use tracing::debug;

use crate::error::{Error, Result};

/// Environment override for the bridge script path.
pub const BRIDGE_SCRIPT_ENV: &str = "TC_BRIDGE_SCRIPT";
/// Environment override for the Node.js executable.
pub const NODE_EXE_ENV: &str = "TC_NODE_EXE";

/// Locates the Node.js executable and bridge script.
///
/// The script comes from `script` when given, else from `TC_BRIDGE_SCRIPT`.
/// Node comes from `TC_NODE_EXE`, else from `PATH`.
///
/// Returns a tuple of (node_executable_path, script_path).
pub fn get_bridge_executable(script: Option<&Path>) -> Result<(PathBuf, PathBuf)> {
	let script = match script {
		Some(path) => path.to_path_buf(),
		None => std::env::var_os(BRIDGE_SCRIPT_ENV)
			.map(PathBuf::from)
			.ok_or_else(|| Error::BridgeNotFound("no bridge script configured".to_string()))?,
	};
	if !script.is_file() {
		return Err(Error::BridgeNotFound(format!("{} does not exist", script.display())));
	}

	let node = match std::env::var_os(NODE_EXE_ENV) {
		Some(path) => PathBuf::from(path),
		None => which::which("node").map_err(|e| Error::BridgeNotFound(format!("node executable: {e}")))?,
	};

	debug!(target = "tc.bridge", node = %node.display(), script = %script.display(), "resolved bridge");
	Ok((node, script))
}

/// Running bridge process.
///
/// The child is killed when this value is dropped.
#[derive(Debug)]
pub struct BridgeProcess {
	process: Child,
}

impl BridgeProcess {
	/// Spawns `node <script>` with piped stdio.
	///
	/// # Errors
	///
	/// Returns `Error::LaunchFailed` if the process fails to start or exits immediately.
	pub async fn launch(node: &Path, script: &Path) -> Result<Self> {
		let mut child = Command::new(node)
			.arg(script)
			.stdin(Stdio::piped())
			.stdout(Stdio::piped())
			.stderr(Stdio::inherit())
			.kill_on_drop(true)
			.spawn()
			.map_err(|e| Error::LaunchFailed(format!("Failed to spawn process: {e}")))?;

		tokio::time::sleep(Duration::from_millis(100)).await;

		match child.try_wait() {
			Ok(Some(status)) => Err(Error::LaunchFailed(format!(
				"Bridge process exited immediately with status: {status}"
			))),
			Ok(None) => Ok(Self { process: child }),
			Err(e) => Err(Error::LaunchFailed(format!("Failed to check process status: {e}"))),
		}
	}

	/// Takes the stdio pipes; only succeeds once.
	pub fn take_stdio(&mut self) -> Result<(ChildStdin, ChildStdout)> {
		let stdin = self.process.stdin.take();
		let stdout = self.process.stdout.take();
		match (stdin, stdout) {
			(Some(stdin), Some(stdout)) => Ok((stdin, stdout)),
			_ => Err(Error::LaunchFailed("bridge stdio already taken".to_string())),
		}
	}
}
