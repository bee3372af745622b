use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;

use crate::crypto::PBKDF2_ITERATIONS;
use crate::session::DEFAULT_IDLE_TIMEOUT_SECS;

/// Application-level constants
pub const APP_NAME: &str = "Tumor Detector";
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

pub const DATABASE_FILE: &str = "tumor_detector.db";
pub const DEFAULT_BIND: &str = "127.0.0.1:8501";
pub const DEFAULT_MAX_UPLOAD_BYTES: usize = 20 * 1024 * 1024;

/// Get the application data directory
/// ~/TumorDetector/ when a home directory exists, ./TumorDetector/ otherwise
pub fn app_data_dir() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("TumorDetector")
}

/// Default location of the SQLite database
pub fn database_path() -> PathBuf {
    app_data_dir().join(DATABASE_FILE)
}

/// Log filter used when `RUST_LOG` is unset
pub fn default_log_filter() -> String {
    "info,tumor_detector_lib=debug".to_string()
}

/// Resolved runtime configuration.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub bind_addr: SocketAddr,
    pub database_path: PathBuf,
    pub session_idle_timeout: Duration,
    pub pbkdf2_iterations: u32,
    pub max_upload_bytes: usize,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            bind_addr: SocketAddr::from(([127, 0, 0, 1], 8501)),
            database_path: database_path(),
            session_idle_timeout: Duration::from_secs(DEFAULT_IDLE_TIMEOUT_SECS),
            pbkdf2_iterations: PBKDF2_ITERATIONS,
            max_upload_bytes: DEFAULT_MAX_UPLOAD_BYTES,
        }
    }
}

impl AppConfig {
    /// Config for tests: throwaway database, cheap hashing.
    #[cfg(test)]
    pub(crate) fn for_tests(database_path: PathBuf) -> Self {
        Self {
            database_path,
            pbkdf2_iterations: 1_000,
            ..Self::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn database_lives_in_app_data_dir() {
        let db = database_path();
        assert!(db.starts_with(app_data_dir()));
        assert!(db.ends_with(DATABASE_FILE));
        assert!(app_data_dir().ends_with("TumorDetector"));
    }

    #[test]
    fn default_bind_matches_constant() {
        let config = AppConfig::default();
        assert_eq!(config.bind_addr.to_string(), DEFAULT_BIND);
    }

    #[test]
    fn defaults_are_production_strength() {
        let config = AppConfig::default();
        assert_eq!(config.pbkdf2_iterations, 600_000);
        assert_eq!(config.session_idle_timeout, Duration::from_secs(900));
        assert_eq!(config.max_upload_bytes, 20 * 1024 * 1024);
    }

    #[test]
    fn app_name_is_tumor_detector() {
        assert_eq!(APP_NAME, "Tumor Detector");
    }
}
