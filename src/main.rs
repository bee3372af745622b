//! Tumor Detector server.
//!
//! Usage:
//!     tumor-detector --bind 127.0.0.1:8501 --database ~/TumorDetector/tumor_detector.db

use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;
use tumor_detector_lib::config::{self, AppConfig};
use tumor_detector_lib::{crypto, session};

#[derive(Parser, Debug)]
#[command(name = "tumor-detector", version, about = "Clinical intake and patient history service")]
struct Args {
    /// HTTP listen address
    #[arg(long, env = "TUMOR_DETECTOR_BIND", default_value = config::DEFAULT_BIND)]
    bind: SocketAddr,

    /// SQLite database file (default: ~/TumorDetector/tumor_detector.db)
    #[arg(long, env = "TUMOR_DETECTOR_DB")]
    database: Option<PathBuf>,

    /// Idle seconds before a login token expires
    #[arg(long, env = "TUMOR_DETECTOR_SESSION_TIMEOUT", default_value_t = session::DEFAULT_IDLE_TIMEOUT_SECS)]
    session_timeout_secs: u64,

    /// PBKDF2-SHA256 rounds for new password hashes
    #[arg(long, env = "TUMOR_DETECTOR_PBKDF2_ITERATIONS", default_value_t = crypto::PBKDF2_ITERATIONS)]
    pbkdf2_iterations: u32,

    /// Largest accepted intake upload, in bytes
    #[arg(long, env = "TUMOR_DETECTOR_MAX_UPLOAD", default_value_t = config::DEFAULT_MAX_UPLOAD_BYTES)]
    max_upload_bytes: usize,

    /// Log filter used when RUST_LOG is unset
    #[arg(long, env = "TUMOR_DETECTOR_LOG")]
    log_filter: Option<String>,
}

impl Args {
    fn into_config(self) -> AppConfig {
        AppConfig {
            bind_addr: self.bind,
            database_path: self.database.unwrap_or_else(config::database_path),
            session_idle_timeout: Duration::from_secs(self.session_timeout_secs),
            pbkdf2_iterations: self.pbkdf2_iterations,
            max_upload_bytes: self.max_upload_bytes,
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    tumor_detector_lib::init_tracing(args.log_filter.as_deref());

    let config = args.into_config();
    tracing::info!("  Bind: {}", config.bind_addr);
    tracing::info!("  Database: {}", config.database_path.display());

    let server = tumor_detector_lib::start(config).await?;
    tracing::info!("Listening on http://{}", server.addr());

    tokio::signal::ctrl_c().await?;
    tracing::info!("Interrupt received, shutting down");
    server.stop().await;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_config() {
        let args = Args::try_parse_from(["tumor-detector"]).unwrap();
        assert_eq!(args.bind.to_string(), config::DEFAULT_BIND);
        assert_eq!(args.session_timeout_secs, 900);
        assert_eq!(args.pbkdf2_iterations, 600_000);

        let cfg = args.into_config();
        assert_eq!(cfg.database_path, config::database_path());
        assert_eq!(cfg.max_upload_bytes, config::DEFAULT_MAX_UPLOAD_BYTES);
    }

    #[test]
    fn flags_override_defaults() {
        let args = Args::try_parse_from([
            "tumor-detector",
            "--bind",
            "0.0.0.0:9000",
            "--database",
            "/tmp/td.db",
            "--session-timeout-secs",
            "60",
            "--pbkdf2-iterations",
            "10000",
        ])
        .unwrap();
        let config = args.into_config();

        assert_eq!(config.bind_addr.port(), 9000);
        assert_eq!(config.database_path, PathBuf::from("/tmp/td.db"));
        assert_eq!(config.session_idle_timeout, Duration::from_secs(60));
        assert_eq!(config.pbkdf2_iterations, 10_000);
    }

    #[test]
    fn bad_bind_address_is_rejected() {
        assert!(Args::try_parse_from(["tumor-detector", "--bind", "not-an-addr"]).is_err());
    }
}
