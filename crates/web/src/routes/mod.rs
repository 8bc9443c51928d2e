//! HTTP route handlers.
//!
//! # Route Structure
//!
//! ```text
//! GET  /health                 - Liveness check
//! GET  /health/ready           - Readiness check
//!
//! # API (JSON)
//! GET  /api/users              - List all accounts (privileged credential)
//! GET  /api/me/admin           - Admin status of the bearer token's identity
//! GET  /api/colors/{color}     - Text/badge/background styles for a hex color
//! ```

pub mod colors;
pub mod health;
pub mod me;
pub mod users;

use axum::{Router, routing::get};

use crate::state::AppState;

/// Build the complete application router (without state).
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/health", get(health::health))
        .route("/health/ready", get(health::readiness))
        .route("/api/users", get(users::list))
        .route("/api/me/admin", get(me::admin_status))
        .route("/api/colors/{color}", get(colors::palette))
}
