//! Health check endpoint.

use axum::extract::State;
use axum::Json;
use serde::Serialize;

use super::blocking;
use crate::api::error::ApiError;
use crate::api::types::ApiContext;

#[derive(Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub app: &'static str,
    pub version: &'static str,
}

/// `GET /api/health` — liveness check, also verifies the store opens.
pub async fn check(State(ctx): State<ApiContext>) -> Result<Json<HealthResponse>, ApiError> {
    let core = ctx.core.clone();
    blocking(move || {
        core.open_db()?;
        Ok(())
    })
    .await?;

    Ok(Json(HealthResponse {
        status: "ok",
        app: crate::config::APP_NAME,
        version: crate::config::APP_VERSION,
    }))
}
