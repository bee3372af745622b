pub mod analysis;
pub mod api;
pub mod auth;
pub mod config;
pub mod core_state; // Transport-agnostic state
pub mod crypto;
pub mod db;
pub mod error;
pub mod history;
pub mod intake;
pub mod models;
pub mod session;

use std::sync::Arc;

use tracing_subscriber::EnvFilter;

use crate::config::AppConfig;
use crate::core_state::{CoreError, CoreState};

/// Install the global tracing subscriber.
///
/// `RUST_LOG` wins; otherwise `filter`, otherwise `config::default_log_filter()`.
pub fn init_tracing(filter: Option<&str>) {
    let fallback = filter
        .map(str::to_string)
        .unwrap_or_else(config::default_log_filter);
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(fallback)),
        )
        .try_init();
}

/// Build the shared state and start serving on `config.bind_addr`.
pub async fn start(config: AppConfig) -> Result<api::ApiServer, StartError> {
    tracing::info!("{} starting v{}", config::APP_NAME, config::APP_VERSION);

    let bind_addr = config.bind_addr;
    let core = tokio::task::spawn_blocking(move || CoreState::new(config))
        .await
        .map_err(|e| StartError::Task(e.to_string()))??;

    let server = api::start_server_on(Arc::new(core), bind_addr)
        .await
        .map_err(|source| StartError::Bind {
            addr: bind_addr,
            source,
        })?;
    Ok(server)
}

#[derive(Debug, thiserror::Error)]
pub enum StartError {
    #[error("Startup failed: {0}")]
    Core(#[from] CoreError),
    #[error("Cannot bind {addr}: {source}")]
    Bind {
        addr: std::net::SocketAddr,
        source: std::io::Error,
    },
    #[error("Startup task failed: {0}")]
    Task(String),
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::net::{Ipv4Addr, SocketAddr};

    #[tokio::test]
    async fn start_serves_on_ephemeral_port() {
        let tmp = tempfile::tempdir().unwrap();
        let mut config = AppConfig::for_tests(tmp.path().join("data").join("app.db"));
        config.bind_addr = SocketAddr::from((Ipv4Addr::LOCALHOST, 0));

        let server = start(config).await.unwrap();
        assert!(server.addr().port() > 0);
        assert!(tmp.path().join("data").join("app.db").exists());
        server.stop().await;
    }

    #[tokio::test]
    async fn start_rejects_invalid_hashing_config() {
        let tmp = tempfile::tempdir().unwrap();
        let mut config = AppConfig::for_tests(tmp.path().join("app.db"));
        config.bind_addr = SocketAddr::from((Ipv4Addr::LOCALHOST, 0));
        config.pbkdf2_iterations = 0;

        assert!(matches!(start(config).await, Err(StartError::Core(_))));
    }

    #[test]
    fn init_tracing_is_repeatable() {
        init_tracing(Some("warn"));
        init_tracing(None);
    }
}
