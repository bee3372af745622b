//! Patient intake endpoint.
//!
//! `GET /api/intake` — list the intake screens, one per cancer category
//! `POST /api/intake/:cancer_type` — multipart form with the text fields of
//! `IntakeForm` plus an `image` part (PNG or JPEG)

use axum::extract::multipart::MultipartError;
use axum::extract::{Multipart, Path, State};
use axum::http::StatusCode;
use axum::{Extension, Json};
use serde::Serialize;

use super::blocking;
use crate::api::error::ApiError;
use crate::api::types::{ApiContext, VisitorSession};
use crate::intake::{self, ImageUpload, IntakeForm};
use crate::models::{CancerType, PatientRecord};

const ACCEPTED_IMAGE_TYPES: [&str; 2] = ["image/png", "image/jpeg"];

#[derive(Serialize)]
pub struct IntakeResponse {
    pub analysis: String,
    pub message: &'static str,
    pub record: PatientRecord,
}

/// An uploaded scan. Only its presence and type matter; the bytes are not kept.
struct ScanUpload {
    filename: String,
    content_type: Option<String>,
    len: usize,
}

impl ScanUpload {
    /// Type from the file extension, falling back to the part's declared type.
    fn mime(&self) -> Option<String> {
        mime_guess::from_path(&self.filename)
            .first()
            .map(|m| m.essence_str().to_string())
            .or_else(|| self.content_type.clone())
    }

    fn is_accepted_image(&self) -> bool {
        self.mime()
            .is_some_and(|m| ACCEPTED_IMAGE_TYPES.contains(&m.as_str()))
    }
}

/// `POST /api/intake/:cancer_type`
pub async fn submit(
    State(ctx): State<ApiContext>,
    Extension(visitor): Extension<VisitorSession>,
    Path(cancer_type): Path<String>,
    mut multipart: Multipart,
) -> Result<(StatusCode, Json<IntakeResponse>), ApiError> {
    // Anonymous visitors are turned away before the upload is read.
    if !visitor.session.is_authenticated() {
        return Err(ApiError::Unauthorized);
    }

    let mut form = IntakeForm {
        cancer_type,
        ..IntakeForm::default()
    };
    let mut scan: Option<ScanUpload> = None;

    let max_upload = ctx.core.config().max_upload_bytes;
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| upload_error(e, max_upload, "Malformed form data"))?
    {
        let name = field.name().unwrap_or("").to_string();
        if name == "image" {
            let filename = field.file_name().unwrap_or("").to_string();
            let content_type = field.content_type().map(str::to_string);
            let bytes = field
                .bytes()
                .await
                .map_err(|e| upload_error(e, max_upload, "Failed to read image"))?;
            scan = Some(ScanUpload {
                filename,
                content_type,
                len: bytes.len(),
            });
            continue;
        }

        let value = field
            .text()
            .await
            .map_err(|e| upload_error(e, max_upload, &format!("Failed to read field '{name}'")))?;
        match name.as_str() {
            "name" => form.name = value,
            "age" => form.age = value,
            "gender" => form.gender = value,
            "contact_number" => form.contact_number = value,
            "lab_number" => form.lab_number = value,
            "report_text" => form.report_text = value,
            _ => {}
        }
    }

    // Type problems are reported by the workflow together with every other
    // field error.
    let image = match scan.filter(|s| s.len > 0) {
        None => ImageUpload::Missing,
        Some(upload) if !upload.is_accepted_image() => ImageUpload::Unsupported,
        Some(upload) => {
            tracing::debug!(
                filename = %upload.filename,
                bytes = upload.len,
                "Scan received"
            );
            ImageUpload::Accepted
        }
    };

    let core = ctx.core.clone();
    let session = visitor.session;
    let record = blocking(move || {
        let conn = core.open_db()?;
        Ok(intake::submit(
            &conn,
            core.analysis(),
            &session,
            &form,
            image,
        )?)
    })
    .await?;

    Ok((
        StatusCode::CREATED,
        Json(IntakeResponse {
            analysis: record.analysis_result.clone(),
            message: "Patient report saved successfully!",
            record,
        }),
    ))
}

/// Oversized bodies get their own status; anything else is a malformed request.
fn upload_error(err: MultipartError, limit: usize, context: &str) -> ApiError {
    if err.status() == StatusCode::PAYLOAD_TOO_LARGE {
        ApiError::PayloadTooLarge(limit)
    } else {
        ApiError::BadRequest(format!("{context}: {err}"))
    }
}

#[derive(Serialize)]
pub struct IntakeScreen {
    pub cancer_type: CancerType,
    pub title: &'static str,
    pub path: String,
}

/// `GET /api/intake` — the available intake screens, one per category.
pub async fn screens() -> Json<Vec<IntakeScreen>> {
    Json(
        CancerType::ALL
            .iter()
            .map(|c| IntakeScreen {
                cancer_type: *c,
                title: c.screen_title(),
                path: format!("/api/intake/{}", c.as_str()),
            })
            .collect(),
    )
}
