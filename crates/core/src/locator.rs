//! Reusable session lookup.

use std::sync::Arc;

use tc_protocol::{CapabilityRequest, Session};
use tc_runtime::Provider;
use tracing::debug;

/// Whether `session` is acknowledged, unexpired, and grants every required
/// chain, method and event of `request`.
pub fn session_satisfies(session: &Session, request: &CapabilityRequest) -> bool {
	if !session.acknowledged || session.is_expired() {
		return false;
	}
	request.required_namespaces.iter().all(|(name, required)| {
		let Some(granted) = session.namespaces.get(name) else {
			return false;
		};
		let chains = granted.chains();
		required.chains.iter().all(|chain| chains.contains(chain))
			&& required.methods.iter().all(|m| granted.methods.contains(m))
			&& required.events.iter().all(|e| granted.events.contains(e))
	})
}

/// Picks the most recent session satisfying `request`.
///
/// `sessions` is ordered oldest first, as providers return it.
pub fn find_reusable_session<'a>(sessions: &'a [Session], request: &CapabilityRequest) -> Option<&'a Session> {
	sessions.iter().rev().find(|session| session_satisfies(session, request))
}

/// Looks up reusable sessions through a provider.
pub struct SessionLocator {
	provider: Arc<dyn Provider>,
}

impl SessionLocator {
	pub fn new(provider: Arc<dyn Provider>) -> Self {
		Self { provider }
	}

	/// Returns a reusable session for `request`, or `None` when pairing is needed.
	///
	/// Provider errors are returned as-is so callers can tell a lost
	/// connection apart from other failures.
	pub async fn locate(&self, request: &CapabilityRequest) -> tc_runtime::Result<Option<Session>> {
		let sessions = self.provider.sessions().await?;
		let found = find_reusable_session(&sessions, request).cloned();
		debug!(
			target = "tc.locator",
			candidates = sessions.len(),
			found = found.as_ref().map(|s| s.topic.as_str()),
			"session lookup"
		);
		Ok(found)
	}
}
