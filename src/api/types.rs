//! Shared types for the API layer.

use std::sync::Arc;

use crate::core_state::CoreState;
use crate::session::Session;

/// Shared context for all API routes and middleware.
#[derive(Clone)]
pub struct ApiContext {
    pub core: Arc<CoreState>,
}

impl ApiContext {
    pub fn new(core: Arc<CoreState>) -> Self {
        Self { core }
    }
}

/// Session of the current visitor, injected into request extensions by
/// the session middleware.
#[derive(Debug, Clone)]
pub struct VisitorSession {
    /// SHA-256 of the presented bearer token, if one was sent.
    pub token_hash: Option<[u8; 32]>,
    pub session: Session,
}
