//! Narrow interfaces over the hosted auth/data service.
//!
//! Authorization logic only talks to these traits, so it runs unchanged
//! against the Supabase REST client, a direct `PostgreSQL` role table, or the
//! in-memory backends used in tests.
//!
//! Implementations must be thread-safe (`Send + Sync`): handlers call them
//! concurrently from many requests.

pub mod memory;

use std::sync::Arc;

use async_trait::async_trait;
use thiserror::Error;

use prodboard_core::{AccountRecord, RoleLabel, UserId, UserIdentity};

pub use memory::{MemoryDirectory, MemoryIdentityProvider, MemoryRoleStore};

/// Errors from an external backend call.
#[derive(Debug, Error)]
pub enum BackendError {
    /// HTTP request failed before a response arrived.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Upstream returned a non-success status.
    #[error("API error: {status} - {message}")]
    Api { status: u16, message: String },

    /// Upstream response could not be decoded.
    #[error("Parse error: {0}")]
    Parse(String),

    /// Backend is not reachable or refused the call.
    #[error("Unavailable: {0}")]
    Unavailable(String),
}

/// Errors from a role lookup.
///
/// `NotFound` is the expected "no role record" signal, not a failure.
#[derive(Debug, Error)]
pub enum RoleLookupError {
    /// No role record exists for the identity.
    #[error("no role record")]
    NotFound,

    /// The data API failed.
    #[error("upstream error: {0}")]
    Upstream(#[from] BackendError),

    /// The direct database query failed.
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
}

/// Resolves an end-user access token to the identity it was issued for.
#[async_trait]
pub trait IdentityProvider: Send + Sync {
    /// Look up the identity behind `access_token`.
    ///
    /// # Returns
    /// * `Ok(Some(identity))` - token is valid
    /// * `Ok(None)` - token is unknown, expired or revoked
    /// * `Err(BackendError)` - the auth service could not answer
    async fn identity(&self, access_token: &str) -> Result<Option<UserIdentity>, BackendError>;
}

/// Point lookup of the role record for one identity.
#[async_trait]
pub trait RoleStore: Send + Sync {
    /// Fetch the role label stored for `user_id`.
    async fn role(&self, user_id: &UserId) -> Result<RoleLabel, RoleLookupError>;
}

/// Privileged bulk listing of registered accounts.
#[async_trait]
pub trait AccountDirectory: Send + Sync {
    /// List every account in upstream order. Fails as a whole; no partial
    /// results.
    async fn list_accounts(&self) -> Result<Vec<AccountRecord>, BackendError>;
}

#[async_trait]
impl<T: IdentityProvider + ?Sized> IdentityProvider for Arc<T> {
    #[inline]
    async fn identity(&self, access_token: &str) -> Result<Option<UserIdentity>, BackendError> {
        (**self).identity(access_token).await
    }
}

#[async_trait]
impl<T: RoleStore + ?Sized> RoleStore for Arc<T> {
    #[inline]
    async fn role(&self, user_id: &UserId) -> Result<RoleLabel, RoleLookupError> {
        (**self).role(user_id).await
    }
}

#[async_trait]
impl<T: AccountDirectory + ?Sized> AccountDirectory for Arc<T> {
    #[inline]
    async fn list_accounts(&self) -> Result<Vec<AccountRecord>, BackendError> {
        (**self).list_accounts().await
    }
}
