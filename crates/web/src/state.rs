//! Application state shared across handlers.

use std::sync::Arc;

use crate::backend::{AccountDirectory, BackendError, IdentityProvider, RoleStore};
use crate::config::WebConfig;
use crate::db::{self, InvalidTableName, PgRoleStore};
use crate::supabase::SupabaseClient;

/// Error building application state from configuration.
#[derive(Debug, thiserror::Error)]
pub enum StateError {
    #[error("supabase client: {0}")]
    Supabase(#[from] BackendError),
    #[error("role database: {0}")]
    Database(#[from] sqlx::Error),
    #[error(transparent)]
    RoleTable(#[from] InvalidTableName),
}

/// Application state shared across all handlers.
///
/// This struct is cheaply cloneable via `Arc`. Backends are trait objects so
/// the same handlers run against the hosted service or in-memory fakes.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    identity: Arc<dyn IdentityProvider>,
    roles: Arc<dyn RoleStore>,
    directory: Arc<dyn AccountDirectory>,
}

impl AppState {
    /// Create application state from explicit backends.
    #[must_use]
    pub fn new(
        identity: Arc<dyn IdentityProvider>,
        roles: Arc<dyn RoleStore>,
        directory: Arc<dyn AccountDirectory>,
    ) -> Self {
        Self {
            inner: Arc::new(AppStateInner {
                identity,
                roles,
                directory,
            }),
        }
    }

    /// Create application state for the hosted service.
    ///
    /// Role lookups go straight to `PostgreSQL` when `ROLE_DATABASE_URL` is
    /// configured, and through the data API otherwise.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built, the role database
    /// is unreachable, or the role table name is invalid.
    pub async fn from_config(config: &WebConfig) -> Result<Self, StateError> {
        let supabase = Arc::new(SupabaseClient::new(&config.supabase)?);

        let roles: Arc<dyn RoleStore> = match &config.role_database_url {
            Some(url) => {
                let pool = db::create_pool(url).await?;
                tracing::info!("Role database pool created");
                Arc::new(PgRoleStore::new(pool, &config.supabase.roles_table)?)
            }
            None => supabase.clone(),
        };

        Ok(Self::new(supabase.clone(), roles, supabase))
    }

    /// Resolves end-user access tokens.
    #[must_use]
    pub fn identity(&self) -> &dyn IdentityProvider {
        self.inner.identity.as_ref()
    }

    /// Role record lookups.
    #[must_use]
    pub fn roles(&self) -> &dyn RoleStore {
        self.inner.roles.as_ref()
    }

    /// Shared handle to the role store, for long-lived trackers.
    #[must_use]
    pub fn roles_handle(&self) -> Arc<dyn RoleStore> {
        Arc::clone(&self.inner.roles)
    }

    /// Privileged account listing.
    #[must_use]
    pub fn directory(&self) -> &dyn AccountDirectory {
        self.inner.directory.as_ref()
    }
}
