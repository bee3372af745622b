//! Register, login and logout endpoints.
//!
//! `POST /api/auth/register` — create a doctor account (logged-out visitors only)
//! `POST /api/auth/login` — verify credentials, issue a bearer token
//! `POST /api/auth/logout` — revoke the presented token

use axum::extract::State;
use axum::http::StatusCode;
use axum::{Extension, Json};
use serde::{Deserialize, Serialize};

use super::blocking;
use crate::api::error::ApiError;
use crate::api::types::{ApiContext, VisitorSession};
use crate::auth;

#[derive(Deserialize)]
pub struct CredentialsRequest {
    pub username: String,
    pub password: String,
}

#[derive(Serialize)]
pub struct RegisterResponse {
    pub username: String,
    pub message: &'static str,
}

#[derive(Serialize)]
pub struct LoginResponse {
    pub token: String,
    pub username: String,
    pub expires_after_idle_secs: u64,
}

#[derive(Serialize)]
pub struct LogoutResponse {
    pub status: &'static str,
}

/// `POST /api/auth/register`
pub async fn register(
    State(ctx): State<ApiContext>,
    Extension(visitor): Extension<VisitorSession>,
    Json(request): Json<CredentialsRequest>,
) -> Result<(StatusCode, Json<RegisterResponse>), ApiError> {
    let core = ctx.core.clone();
    let username = blocking(move || {
        let conn = core.open_db()?;
        auth::register(
            &conn,
            core.hasher(),
            &visitor.session,
            &request.username,
            &request.password,
        )?;
        Ok(request.username)
    })
    .await?;

    Ok((
        StatusCode::CREATED,
        Json(RegisterResponse {
            username,
            message: "Registration successful! You can now log in.",
        }),
    ))
}

/// `POST /api/auth/login`
///
/// On success the previous token of this visitor (if any) is revoked and a
/// fresh one is returned. On failure nothing about the visitor changes.
pub async fn login(
    State(ctx): State<ApiContext>,
    Extension(visitor): Extension<VisitorSession>,
    Json(request): Json<CredentialsRequest>,
) -> Result<Json<LoginResponse>, ApiError> {
    let core = ctx.core.clone();
    let mut session = visitor.session.clone();
    let session = blocking(move || {
        let conn = core.open_db()?;
        auth::login(
            &conn,
            core.hasher(),
            &mut session,
            &request.username,
            &request.password,
        )?;
        Ok(session)
    })
    .await?;

    let username = session
        .current_user()
        .ok_or(ApiError::Internal("login left session anonymous".into()))?
        .to_string();

    let token = {
        let mut sessions = ctx.core.lock_sessions()?;
        if let Some(old) = &visitor.token_hash {
            sessions.revoke(old);
        }
        sessions.issue(&username)
    };

    Ok(Json(LoginResponse {
        token,
        username,
        expires_after_idle_secs: ctx.core.config().session_idle_timeout.as_secs(),
    }))
}

/// `POST /api/auth/logout` — always succeeds.
pub async fn logout(
    State(ctx): State<ApiContext>,
    Extension(visitor): Extension<VisitorSession>,
) -> Result<Json<LogoutResponse>, ApiError> {
    let mut session = visitor.session;
    auth::logout(&mut session);

    if let Some(hash) = &visitor.token_hash {
        ctx.core.lock_sessions()?.revoke(hash);
    }

    Ok(Json(LogoutResponse {
        status: "logged_out",
    }))
}
