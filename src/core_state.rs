//! Transport-agnostic application state.
//!
//! `CoreState` is built once at startup and shared (behind `Arc`) by every
//! request handler. It owns configuration, the password hasher, the token
//! registry and the analysis provider. It holds no open connection: each
//! unit of work opens its own, so concurrent writers are serialised by
//! SQLite itself.

use std::sync::{Arc, Mutex, MutexGuard};

use rusqlite::Connection;

use crate::analysis::{AnalysisProvider, ConstantResult};
use crate::config::AppConfig;
use crate::crypto::{CryptoError, PasswordHasher};
use crate::db::{self, DatabaseError};
use crate::session::SessionRegistry;

#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("State lock poisoned")]
    LockPoisoned,
    #[error("Database error: {0}")]
    Database(#[from] DatabaseError),
    #[error("Invalid password hashing parameters: {0}")]
    Crypto(#[from] CryptoError),
    #[error("Cannot create data directory: {0}")]
    Io(#[from] std::io::Error),
}

pub struct CoreState {
    config: AppConfig,
    hasher: PasswordHasher,
    /// Bearer token → signed-in doctor.
    sessions: Mutex<SessionRegistry>,
    analysis: Arc<dyn AnalysisProvider>,
}

impl CoreState {
    /// Prepare the data directory, migrate the database and set up the
    /// default (constant) analysis provider.
    pub fn new(config: AppConfig) -> Result<Self, CoreError> {
        if let Some(parent) = config.database_path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        drop(db::open_database(&config.database_path)?);

        let hasher = PasswordHasher::new(config.pbkdf2_iterations)?;
        let sessions = SessionRegistry::new(config.session_idle_timeout);

        tracing::info!(
            db = %config.database_path.display(),
            pbkdf2_iterations = hasher.iterations(),
            "Core state ready"
        );

        Ok(Self {
            config,
            hasher,
            sessions: Mutex::new(sessions),
            analysis: Arc::new(ConstantResult::default()),
        })
    }

    /// Replace the analysis provider.
    pub fn with_analysis(mut self, provider: Arc<dyn AnalysisProvider>) -> Self {
        self.analysis = provider;
        self
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    pub fn hasher(&self) -> &PasswordHasher {
        &self.hasher
    }

    pub fn analysis(&self) -> &dyn AnalysisProvider {
        self.analysis.as_ref()
    }

    /// Open a connection for one unit of work.
    pub fn open_db(&self) -> Result<Connection, DatabaseError> {
        db::connect_database(&self.config.database_path)
    }

    pub fn lock_sessions(&self) -> Result<MutexGuard<'_, SessionRegistry>, CoreError> {
        self.sessions.lock().map_err(|_| CoreError::LockPoisoned)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::CancerType;
    use crate::session::hash_token;

    #[test]
    fn new_creates_directory_and_schema() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("app.db");
        let core = CoreState::new(AppConfig::for_tests(path.clone())).unwrap();

        assert!(path.exists());
        let conn = core.open_db().unwrap();
        assert_eq!(db::count_tables(&conn).unwrap(), 3);
    }

    #[test]
    fn zero_iterations_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = AppConfig::for_tests(dir.path().join("app.db"));
        config.pbkdf2_iterations = 0;
        assert!(matches!(CoreState::new(config), Err(CoreError::Crypto(_))));
    }

    #[test]
    fn default_provider_is_constant() {
        let dir = tempfile::tempdir().unwrap();
        let core = CoreState::new(AppConfig::for_tests(dir.path().join("app.db"))).unwrap();
        assert_eq!(core.analysis().analyze(CancerType::Breast), "Tumor detected");
    }

    #[test]
    fn provider_can_be_replaced() {
        let dir = tempfile::tempdir().unwrap();
        let core = CoreState::new(AppConfig::for_tests(dir.path().join("app.db")))
            .unwrap()
            .with_analysis(Arc::new(ConstantResult::new("Benign")));
        assert_eq!(core.analysis().analyze(CancerType::Brain), "Benign");
    }

    #[test]
    fn sessions_are_shared_through_core() {
        let dir = tempfile::tempdir().unwrap();
        let core = CoreState::new(AppConfig::for_tests(dir.path().join("app.db"))).unwrap();
        let token = core.lock_sessions().unwrap().issue("alice");
        let session = core.lock_sessions().unwrap().resolve(&hash_token(&token));
        assert_eq!(session.current_user(), Some("alice"));
    }
}
