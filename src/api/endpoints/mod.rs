//! API endpoint handlers.
//!
//! Each module corresponds to one screen of the tool. Handlers run the
//! blocking workflows (SQLite, PBKDF2) on the blocking thread pool.

pub mod auth;
pub mod health;
pub mod history;
pub mod intake;

use crate::api::error::ApiError;

/// Run a blocking unit of work off the async executor.
pub(crate) async fn blocking<T, F>(work: F) -> Result<T, ApiError>
where
    F: FnOnce() -> Result<T, ApiError> + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(work)
        .await
        .map_err(|e| ApiError::Internal(format!("blocking task failed: {e}")))?
}
