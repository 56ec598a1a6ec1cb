//! File-backed session storage keyed by storage namespace.

use std::fs;
use std::path::{Path, PathBuf};

use tc_protocol::Session;

use crate::error::Result;

/// Persisted sessions for one storage namespace.
///
/// Sessions live in `<dir>/<namespace>.sessions.json`. A missing or
/// unreadable file is treated as an empty store.
#[derive(Debug, Clone)]
pub struct SessionStore {
	path: PathBuf,
}

impl SessionStore {
	pub fn new(dir: impl AsRef<Path>, namespace: &str) -> Self {
		let file = format!("{}.sessions.json", sanitize(namespace));
		Self {
			path: dir.as_ref().join(file),
		}
	}

	pub fn path(&self) -> &Path {
		&self.path
	}

	/// Loads sessions in insertion order.
	pub fn load(&self) -> Vec<Session> {
		let Ok(content) = fs::read_to_string(&self.path) else {
			return Vec::new();
		};
		match serde_json::from_str(&content) {
			Ok(sessions) => sessions,
			Err(err) => {
				tracing::warn!(
					target = "tc.store",
					path = %self.path.display(),
					error = %err,
					"ignoring unreadable session store"
				);
				Vec::new()
			}
		}
	}

	pub fn save(&self, sessions: &[Session]) -> Result<()> {
		if let Some(parent) = self.path.parent() {
			fs::create_dir_all(parent)?;
		}
		fs::write(&self.path, serde_json::to_string_pretty(sessions)?)?;
		Ok(())
	}
}

fn sanitize(namespace: &str) -> String {
	namespace
		.chars()
		.map(|c| if c.is_ascii_alphanumeric() || c == '-' || c == '_' { c } else { '_' })
		.collect()
}
