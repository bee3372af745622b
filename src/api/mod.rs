//! HTTP API for the intake service.
//!
//! Routes are nested under `/api/`. Every request passes through the same
//! middleware stack: Session → Audit → Handler. The session middleware never
//! rejects; it resolves the bearer token (if any) into an explicit `Session`
//! and the workflows decide what an anonymous visitor may do.

pub mod endpoints;
pub mod error;
pub mod middleware;
pub mod router;
pub mod server;
pub mod types;

pub use router::app_router;
pub use server::{start_server_on, ApiServer};
pub use types::{ApiContext, VisitorSession};
