//! Audit logging middleware.
//!
//! Logs every API request with a request id, method, path, visitor and
//! response status. Runs innermost (after the session middleware has
//! injected `VisitorSession`).

use std::time::Instant;

use axum::http::Request;
use axum::middleware::Next;
use axum::response::Response;
use uuid::Uuid;

use crate::api::types::VisitorSession;

pub async fn log_access(req: Request<axum::body::Body>, next: Next) -> Response {
    let request_id = Uuid::new_v4();
    let method = req.method().to_string();
    let path = req.uri().path().to_string();
    let visitor = req
        .extensions()
        .get::<VisitorSession>()
        .and_then(|v| v.session.current_user().map(str::to_string))
        .unwrap_or_else(|| "anonymous".to_string());

    let started = Instant::now();
    let response = next.run(req).await;

    tracing::info!(
        %request_id,
        method = %method,
        path = %path,
        visitor = %visitor,
        status = response.status().as_u16(),
        elapsed_ms = started.elapsed().as_millis() as u64,
        "API access"
    );

    response
}
