//! Connection state persisted between invocations.
//!
//! Layout under the state directory (default `~/.config/tron-connect/`):
//!
//! - `connection.json`: the active session's topic, address and chain
//! - `<namespace>.sessions.json`: the loopback provider's session store

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::Context;
use tc::ActiveSession;

use crate::error::Result;

const APP_DIR: &str = "tron-connect";
const CONNECTION_FILE: &str = "connection.json";

#[derive(Debug, Clone)]
pub struct StatePaths {
	root: PathBuf,
}

impl StatePaths {
	/// Uses `dir` when given, else the user config directory.
	pub fn new(dir: Option<&Path>) -> Self {
		let root = match dir {
			Some(dir) => dir.to_path_buf(),
			None => dirs::config_dir().unwrap_or_else(|| PathBuf::from(".")).join(APP_DIR),
		};
		Self { root }
	}

	pub fn root(&self) -> &Path {
		&self.root
	}

	pub fn connection_file(&self) -> PathBuf {
		self.root.join(CONNECTION_FILE)
	}
}

/// Loads the recorded connection, if any.
pub fn load_connection(paths: &StatePaths) -> Result<Option<ActiveSession>> {
	let path = paths.connection_file();
	if !path.exists() {
		return Ok(None);
	}
	let content = fs::read_to_string(&path).with_context(|| format!("reading {}", path.display()))?;
	let session = serde_json::from_str(&content).with_context(|| format!("parsing {}", path.display()))?;
	Ok(Some(session))
}

pub fn save_connection(paths: &StatePaths, session: &ActiveSession) -> Result<()> {
	fs::create_dir_all(paths.root())?;
	let path = paths.connection_file();
	fs::write(&path, serde_json::to_string_pretty(session)?).with_context(|| format!("writing {}", path.display()))?;
	Ok(())
}

/// Forgets the recorded connection. Missing state is not an error.
pub fn clear_connection(paths: &StatePaths) -> Result<()> {
	match fs::remove_file(paths.connection_file()) {
		Ok(()) => Ok(()),
		Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(()),
		Err(err) => Err(err.into()),
	}
}

#[cfg(test)]
mod tests {
	use tc::protocol::tron::Network;
	use tempfile::TempDir;

	use super::*;

	fn session() -> ActiveSession {
		ActiveSession {
			topic: "t1".into(),
			address: "TAbc123".into(),
			chain: Network::Shasta.chain_id(),
			reused: false,
		}
	}

	#[test]
	fn save_load_clear() {
		let dir = TempDir::new().unwrap();
		let paths = StatePaths::new(Some(dir.path().join("nested").as_path()));

		assert_eq!(load_connection(&paths).unwrap(), None);
		save_connection(&paths, &session()).unwrap();
		assert_eq!(load_connection(&paths).unwrap(), Some(session()));

		clear_connection(&paths).unwrap();
		assert_eq!(load_connection(&paths).unwrap(), None);
		clear_connection(&paths).unwrap();
	}

	#[test]
	fn file_shape_is_stable() {
		let dir = TempDir::new().unwrap();
		let paths = StatePaths::new(Some(dir.path()));
		save_connection(&paths, &session()).unwrap();

		let raw: serde_json::Value = serde_json::from_str(&fs::read_to_string(paths.connection_file()).unwrap()).unwrap();
		assert_eq!(raw["topic"], "t1");
		assert_eq!(raw["chain"], "tron:0x94a9059e");
		assert!(raw.get("reused").is_none());
	}

	#[test]
	fn corrupt_state_is_reported() {
		let dir = TempDir::new().unwrap();
		let paths = StatePaths::new(Some(dir.path()));
		fs::write(paths.connection_file(), "{").unwrap();
		let err = load_connection(&paths).unwrap_err();
		assert!(err.to_string().contains("parsing"));
	}
}
