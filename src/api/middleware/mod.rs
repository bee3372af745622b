//! API middleware stack.
//!
//! Execution order (outermost → innermost):
//! 1. Session resolver — bearer token → `VisitorSession`, never rejects
//! 2. Audit logger — logs after the session is known, has the username

pub mod audit;
pub mod session;
