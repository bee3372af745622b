//! Per-visitor authentication state.
//!
//! `Session` is the explicit value every workflow receives: it is either
//! anonymous or bound to exactly one doctor username. `SessionRegistry`
//! maps opaque bearer tokens to signed-in usernames so that HTTP visitors
//! can carry their session between requests. Only the SHA-256 of a token
//! is ever stored.

use std::collections::HashMap;
use std::time::{Duration, Instant};

use serde::Serialize;

/// Default idle timeout: 15 minutes.
pub const DEFAULT_IDLE_TIMEOUT_SECS: u64 = 900;

/// Authentication state of one visitor.
///
/// `current_user` is `Some` iff the visitor is authenticated, so the two
/// can never disagree.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Session {
    current_user: Option<String>,
}

impl Session {
    pub fn anonymous() -> Self {
        Self::default()
    }

    pub fn authenticated(username: impl Into<String>) -> Self {
        Self {
            current_user: Some(username.into()),
        }
    }

    pub fn is_authenticated(&self) -> bool {
        self.current_user.is_some()
    }

    pub fn current_user(&self) -> Option<&str> {
        self.current_user.as_deref()
    }

    pub(crate) fn sign_in(&mut self, username: &str) {
        self.current_user = Some(username.to_string());
    }

    /// Back to anonymous. Safe to call on an anonymous session.
    pub fn reset(&mut self) {
        self.current_user = None;
    }
}

// ═══════════════════════════════════════════════════════════
// Token registry
// ═══════════════════════════════════════════════════════════

/// Hash a bearer token string using SHA-256.
pub fn hash_token(token: &str) -> [u8; 32] {
    use sha2::{Digest, Sha256};
    let mut hasher = Sha256::new();
    hasher.update(token.as_bytes());
    hasher.finalize().into()
}

/// Generate a random bearer token (URL-safe base64, 32 bytes of entropy).
pub fn generate_token() -> String {
    use base64::Engine;
    let bytes: [u8; 32] = rand::random();
    base64::engine::general_purpose::URL_SAFE_NO_PAD.encode(bytes)
}

#[derive(Debug)]
struct SessionEntry {
    username: String,
    last_seen: Instant,
}

/// In-memory token → username map with idle expiry.
#[derive(Debug)]
pub struct SessionRegistry {
    entries: HashMap<[u8; 32], SessionEntry>,
    idle_timeout: Duration,
}

impl SessionRegistry {
    pub fn new(idle_timeout: Duration) -> Self {
        Self {
            entries: HashMap::new(),
            idle_timeout,
        }
    }

    /// Issue a fresh token for a verified username. Returns the plaintext
    /// token; it is not recoverable afterwards.
    pub fn issue(&mut self, username: &str) -> String {
        self.purge_expired();
        let token = generate_token();
        self.entries.insert(
            hash_token(&token),
            SessionEntry {
                username: username.to_string(),
                last_seen: Instant::now(),
            },
        );
        token
    }

    /// Resolve a token into a session, refreshing its idle timer.
    /// Unknown or expired tokens resolve to an anonymous session.
    pub fn resolve(&mut self, token_hash: &[u8; 32]) -> Session {
        let now = Instant::now();
        let expired = match self.entries.get_mut(token_hash) {
            Some(entry) if now.duration_since(entry.last_seen) < self.idle_timeout => {
                entry.last_seen = now;
                return Session::authenticated(entry.username.clone());
            }
            Some(_) => true,
            None => false,
        };
        if expired {
            self.entries.remove(token_hash);
        }
        Session::anonymous()
    }

    /// Forget a token. Returns whether it was known.
    pub fn revoke(&mut self, token_hash: &[u8; 32]) -> bool {
        self.entries.remove(token_hash).is_some()
    }

    pub fn active_count(&self) -> usize {
        self.entries.len()
    }

    fn purge_expired(&mut self) {
        let now = Instant::now();
        let timeout = self.idle_timeout;
        self.entries
            .retain(|_, entry| now.duration_since(entry.last_seen) < timeout);
    }
}

impl Default for SessionRegistry {
    fn default() -> Self {
        Self::new(Duration::from_secs(DEFAULT_IDLE_TIMEOUT_SECS))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn anonymous_session_has_no_user() {
        let session = Session::anonymous();
        assert!(!session.is_authenticated());
        assert_eq!(session.current_user(), None);
    }

    #[test]
    fn sign_in_and_reset() {
        let mut session = Session::anonymous();
        session.sign_in("alice");
        assert!(session.is_authenticated());
        assert_eq!(session.current_user(), Some("alice"));

        session.reset();
        assert_eq!(session, Session::anonymous());
        session.reset();
        assert!(!session.is_authenticated());
    }

    #[test]
    fn issued_token_resolves_to_user() {
        let mut registry = SessionRegistry::default();
        let token = registry.issue("alice");
        let session = registry.resolve(&hash_token(&token));
        assert_eq!(session.current_user(), Some("alice"));
    }

    #[test]
    fn unknown_token_is_anonymous() {
        let mut registry = SessionRegistry::default();
        registry.issue("alice");
        let session = registry.resolve(&hash_token("forged"));
        assert!(!session.is_authenticated());
    }

    #[test]
    fn revoked_token_is_anonymous() {
        let mut registry = SessionRegistry::default();
        let token = registry.issue("alice");
        let hash = hash_token(&token);
        assert!(registry.revoke(&hash));
        assert!(!registry.revoke(&hash));
        assert!(!registry.resolve(&hash).is_authenticated());
    }

    #[test]
    fn idle_session_expires() {
        let mut registry = SessionRegistry::new(Duration::ZERO);
        let token = registry.issue("alice");
        assert!(!registry.resolve(&hash_token(&token)).is_authenticated());
        assert_eq!(registry.active_count(), 0);
    }

    #[test]
    fn tokens_are_unique_per_login() {
        let mut registry = SessionRegistry::default();
        let a = registry.issue("alice");
        let b = registry.issue("alice");
        assert_ne!(a, b);
        assert_eq!(registry.active_count(), 2);
    }

    #[test]
    fn token_hash_is_deterministic() {
        assert_eq!(hash_token("abc"), hash_token("abc"));
        assert_ne!(hash_token("abc"), hash_token("abd"));
    }
}
