//! Bearer token → session resolution.
//!
//! Extracts `Authorization: Bearer <token>`, looks it up in the
//! `SessionRegistry` and injects a `VisitorSession` into request
//! extensions. Missing, unknown or expired tokens produce an anonymous
//! session; the workflows decide whether that is acceptable.

use axum::http::Request;
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};

use crate::api::error::ApiError;
use crate::api::types::{ApiContext, VisitorSession};
use crate::session::{hash_token, Session};

/// Resolve the visitor's session.
///
/// Accesses `ApiContext` from request extensions (injected by Extension layer).
pub async fn attach_session(req: Request<axum::body::Body>, next: Next) -> Response {
    match attach_session_inner(req, next).await {
        Ok(resp) => resp,
        Err(err) => err.into_response(),
    }
}

async fn attach_session_inner(
    mut req: Request<axum::body::Body>,
    next: Next,
) -> Result<Response, ApiError> {
    let ctx: ApiContext = req
        .extensions()
        .get::<ApiContext>()
        .cloned()
        .ok_or(ApiError::Internal("missing API context".into()))?;

    let token_hash = bearer_token(&req).map(hash_token);

    let session = match &token_hash {
        Some(hash) => {
            let mut sessions = ctx.core.lock_sessions()?;
            sessions.resolve(hash)
        }
        None => Session::anonymous(),
    }; // MutexGuard dropped here, before any .await

    req.extensions_mut()
        .insert(VisitorSession { token_hash, session });

    Ok(next.run(req).await)
}

fn bearer_token(req: &Request<axum::body::Body>) -> Option<&str> {
    req.headers()
        .get("Authorization")
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .map(str::trim)
        .filter(|t| !t.is_empty())
}
