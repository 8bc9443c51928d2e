//! Direct `PostgreSQL` access for role lookups.
//!
//! Optional: only used when `ROLE_DATABASE_URL` is set. Otherwise role
//! records are read through the hosted data API.
//!
//! ## Tables
//!
//! - `user_roles` - one role record per identity (`user_id uuid`, `role text`)

pub mod user_roles;

use std::time::Duration;

use secrecy::ExposeSecret;
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;

pub use user_roles::{InvalidTableName, PgRoleStore};

/// Create a `PostgreSQL` connection pool with sensible defaults.
///
/// # Arguments
///
/// * `database_url` - `PostgreSQL` connection string (wrapped in `SecretString`)
///
/// # Errors
///
/// Returns `sqlx::Error` if the connection cannot be established.
pub async fn create_pool(database_url: &secrecy::SecretString) -> Result<PgPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(10)
        .min_connections(1)
        .acquire_timeout(Duration::from_secs(10))
        .connect(database_url.expose_secret())
        .await
}
