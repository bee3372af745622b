//! API error types with structured JSON responses.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;

use crate::core_state::CoreError;
use crate::db::DatabaseError;
use crate::error::{FieldError, ServiceError, ValidationErrors};

/// Structured error response body.
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub error: ErrorDetail,
}

#[derive(Debug, Serialize)]
pub struct ErrorDetail {
    pub code: &'static str,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fields: Option<Vec<FieldError>>,
}

/// API-level errors with HTTP status mapping.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("Authentication required")]
    Unauthorized,
    #[error("Invalid credentials")]
    InvalidCredentials,
    #[error("Username taken: {0}")]
    UsernameTaken(String),
    #[error("Already logged in")]
    AlreadyAuthenticated,
    #[error("Validation failed: {0}")]
    Validation(ValidationErrors),
    #[error("Store unavailable: {0}")]
    StoreUnavailable(String),
    #[error("Invalid request: {0}")]
    BadRequest(String),
    #[error("Upload exceeds {0} bytes")]
    PayloadTooLarge(usize),
    #[error("Internal error: {0}")]
    Internal(String),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let mut fields = None;
        let (status, code, message) = match self {
            ApiError::Unauthorized => (
                StatusCode::UNAUTHORIZED,
                "AUTH_REQUIRED",
                "Please log in to access this page".to_string(),
            ),
            ApiError::InvalidCredentials => (
                StatusCode::UNAUTHORIZED,
                "INVALID_CREDENTIALS",
                "Invalid username or password".to_string(),
            ),
            ApiError::UsernameTaken(username) => (
                StatusCode::CONFLICT,
                "USERNAME_TAKEN",
                format!("Username '{username}' already exists. Choose another username."),
            ),
            ApiError::AlreadyAuthenticated => (
                StatusCode::CONFLICT,
                "ALREADY_AUTHENTICATED",
                "Log out before registering a new account".to_string(),
            ),
            ApiError::Validation(errors) => {
                let message = format!("Please provide all required details: {errors}");
                fields = Some(errors.errors().to_vec());
                (StatusCode::UNPROCESSABLE_ENTITY, "VALIDATION_FAILED", message)
            }
            ApiError::StoreUnavailable(detail) => {
                tracing::error!(detail = %detail, "Record store unavailable");
                (
                    StatusCode::SERVICE_UNAVAILABLE,
                    "STORE_UNAVAILABLE",
                    "The record store is unavailable, try again later".to_string(),
                )
            }
            ApiError::BadRequest(detail) => (StatusCode::BAD_REQUEST, "BAD_REQUEST", detail),
            ApiError::PayloadTooLarge(limit) => (
                StatusCode::PAYLOAD_TOO_LARGE,
                "PAYLOAD_TOO_LARGE",
                format!("Upload is larger than the {limit}-byte limit"),
            ),
            ApiError::Internal(detail) => {
                tracing::error!(detail = %detail, "API internal error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "INTERNAL",
                    "An internal error occurred".to_string(),
                )
            }
        };

        let body = ErrorBody {
            error: ErrorDetail {
                code,
                message,
                fields,
            },
        };
        (status, Json(body)).into_response()
    }
}

impl From<ServiceError> for ApiError {
    fn from(err: ServiceError) -> Self {
        match err {
            ServiceError::UsernameTaken(username) => ApiError::UsernameTaken(username),
            ServiceError::InvalidCredentials => ApiError::InvalidCredentials,
            ServiceError::NotAuthenticated => ApiError::Unauthorized,
            ServiceError::AlreadyAuthenticated => ApiError::AlreadyAuthenticated,
            ServiceError::Validation(errors) => ApiError::Validation(errors),
            ServiceError::StoreUnavailable(e) => ApiError::StoreUnavailable(e.to_string()),
            ServiceError::Credential(e) => ApiError::Internal(e.to_string()),
            ServiceError::Export(e) => ApiError::Internal(e.to_string()),
        }
    }
}

impl From<CoreError> for ApiError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::Database(e) => ApiError::StoreUnavailable(e.to_string()),
            other => ApiError::Internal(other.to_string()),
        }
    }
}

impl From<DatabaseError> for ApiError {
    fn from(err: DatabaseError) -> Self {
        ApiError::StoreUnavailable(err.to_string())
    }
}
