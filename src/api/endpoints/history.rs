//! Patient history endpoints.
//!
//! `GET /api/patients` — every stored record, oldest first
//! `GET /api/patients/export` — the same records as a CSV download

use axum::extract::State;
use axum::http::header;
use axum::response::{IntoResponse, Response};
use axum::{Extension, Json};
use serde::Serialize;

use super::blocking;
use crate::api::error::ApiError;
use crate::api::types::{ApiContext, VisitorSession};
use crate::history::{self, EXPORT_FILENAME};
use crate::models::PatientRecord;

#[derive(Serialize)]
pub struct HistoryResponse {
    pub count: usize,
    pub records: Vec<PatientRecord>,
}

/// `GET /api/patients`
pub async fn list(
    State(ctx): State<ApiContext>,
    Extension(visitor): Extension<VisitorSession>,
) -> Result<Json<HistoryResponse>, ApiError> {
    let core = ctx.core.clone();
    let records = blocking(move || {
        let conn = core.open_db()?;
        Ok(history::list_all(&conn, &visitor.session)?)
    })
    .await?;

    Ok(Json(HistoryResponse {
        count: records.len(),
        records,
    }))
}

/// `GET /api/patients/export`
///
/// An empty store still yields a header-only file; `X-Record-Count: 0`
/// tells the client there was nothing to export.
pub async fn export(
    State(ctx): State<ApiContext>,
    Extension(visitor): Extension<VisitorSession>,
) -> Result<Response, ApiError> {
    let core = ctx.core.clone();
    let export = blocking(move || {
        let conn = core.open_db()?;
        Ok(history::export_csv(&conn, &visitor.session)?)
    })
    .await?;

    let disposition = format!("attachment; filename=\"{EXPORT_FILENAME}\"");
    Ok((
        [
            (header::CONTENT_TYPE, "text/csv; charset=utf-8".to_string()),
            (header::CONTENT_DISPOSITION, disposition),
            (
                header::HeaderName::from_static("x-record-count"),
                export.rows.to_string(),
            ),
        ],
        export.body,
    )
        .into_response())
}
