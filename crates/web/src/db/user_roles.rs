//! Role record repository backed by `PostgreSQL`.

use async_trait::async_trait;
use sqlx::PgPool;
use thiserror::Error;
use tracing::instrument;

use prodboard_core::{RoleLabel, UserId};

use crate::backend::{RoleLookupError, RoleStore};

/// The configured role table is not a plain (optionally schema-qualified)
/// identifier.
#[derive(Debug, Error)]
#[error("invalid role table name: {0}")]
pub struct InvalidTableName(pub String);

/// Role lookups straight from the role table.
#[derive(Debug, Clone)]
pub struct PgRoleStore {
    pool: PgPool,
    query: String,
}

impl PgRoleStore {
    /// Create a store reading from `table`.
    ///
    /// # Errors
    ///
    /// Returns `InvalidTableName` unless `table` is `name` or `schema.name`
    /// made of ASCII letters, digits and underscores.
    pub fn new(pool: PgPool, table: &str) -> Result<Self, InvalidTableName> {
        if !is_valid_table_name(table) {
            return Err(InvalidTableName(table.to_string()));
        }

        Ok(Self {
            pool,
            query: format!("SELECT role FROM {table} WHERE user_id = $1"),
        })
    }

    /// Get the connection pool.
    #[must_use]
    pub const fn pool(&self) -> &PgPool {
        &self.pool
    }
}

#[async_trait]
impl RoleStore for PgRoleStore {
    #[instrument(skip(self))]
    async fn role(&self, user_id: &UserId) -> Result<RoleLabel, RoleLookupError> {
        let role: Option<Option<RoleLabel>> = sqlx::query_scalar(&self.query)
            .bind(*user_id)
            .fetch_optional(&self.pool)
            .await?;

        // A NULL role is treated like a missing record.
        role.flatten().ok_or(RoleLookupError::NotFound)
    }
}

fn is_valid_table_name(table: &str) -> bool {
    let mut parts = table.split('.');
    let valid_part = |part: &str| {
        !part.is_empty()
            && !part.starts_with(|c: char| c.is_ascii_digit())
            && part.chars().all(|c| c.is_ascii_alphanumeric() || c == '_')
    };

    match (parts.next(), parts.next(), parts.next()) {
        (Some(name), None, None) => valid_part(name),
        (Some(schema), Some(name), None) => valid_part(schema) && valid_part(name),
        _ => false,
    }
}
