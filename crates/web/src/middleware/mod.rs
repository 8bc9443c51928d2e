//! HTTP middleware and extractors.
//!
//! # Middleware Order (outermost first)
//!
//! 1. Sentry layers (capture errors, transactions)
//! 2. `TraceLayer` (request span with status and latency)
//! 3. Request ID (correlate logs, Sentry events and responses)
//!
//! Identity is resolved per handler through the [`auth::CurrentIdentity`]
//! extractor rather than a global guard: only some routes need it.

pub mod auth;
pub mod request_id;

pub use auth::{CurrentIdentity, bearer_token};
pub use request_id::{REQUEST_ID_HEADER, request_id_middleware};
