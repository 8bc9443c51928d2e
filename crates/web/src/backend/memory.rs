//! In-memory backends.
//!
//! Suitable for tests and local development without a hosted project. The
//! role store can also simulate slow and failing lookups.

use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::RwLock;

use prodboard_core::{AccountRecord, RoleLabel, UserId, UserIdentity};

use super::{AccountDirectory, BackendError, IdentityProvider, RoleLookupError, RoleStore};

/// Role records held in a map.
#[derive(Debug, Default)]
pub struct MemoryRoleStore {
    roles: RwLock<HashMap<UserId, RoleLabel>>,
    failing: RwLock<HashSet<UserId>>,
    delays: RwLock<HashMap<UserId, Duration>>,
    lookups: AtomicUsize,
}

impl MemoryRoleStore {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a role record.
    #[must_use]
    pub fn with_role(mut self, user_id: UserId, role: impl Into<RoleLabel>) -> Self {
        self.roles.get_mut().insert(user_id, role.into());
        self
    }

    /// Make lookups for `user_id` fail with an upstream error.
    #[must_use]
    pub fn with_failure(mut self, user_id: UserId) -> Self {
        self.failing.get_mut().insert(user_id);
        self
    }

    /// Delay lookups for `user_id` before answering.
    #[must_use]
    pub fn with_delay(mut self, user_id: UserId, delay: Duration) -> Self {
        self.delays.get_mut().insert(user_id, delay);
        self
    }

    /// Insert or replace a role record.
    pub async fn set_role(&self, user_id: UserId, role: impl Into<RoleLabel>) {
        self.roles.write().await.insert(user_id, role.into());
    }

    /// Remove a role record.
    pub async fn remove_role(&self, user_id: &UserId) {
        self.roles.write().await.remove(user_id);
    }

    /// Number of lookups served so far.
    #[must_use]
    pub fn lookups(&self) -> usize {
        self.lookups.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl RoleStore for MemoryRoleStore {
    async fn role(&self, user_id: &UserId) -> Result<RoleLabel, RoleLookupError> {
        self.lookups.fetch_add(1, Ordering::SeqCst);

        let delay = self.delays.read().await.get(user_id).copied();
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }

        if self.failing.read().await.contains(user_id) {
            return Err(RoleLookupError::Upstream(BackendError::Unavailable(
                "role store offline".to_string(),
            )));
        }

        self.roles
            .read()
            .await
            .get(user_id)
            .cloned()
            .ok_or(RoleLookupError::NotFound)
    }
}

/// Access tokens mapped to identities.
#[derive(Debug, Default, Clone)]
pub struct MemoryIdentityProvider {
    sessions: HashMap<String, UserIdentity>,
}

impl MemoryIdentityProvider {
    /// Create a provider that knows no tokens.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a token for an identity.
    #[must_use]
    pub fn with_session(mut self, access_token: impl Into<String>, identity: UserIdentity) -> Self {
        self.sessions.insert(access_token.into(), identity);
        self
    }
}

#[async_trait]
impl IdentityProvider for MemoryIdentityProvider {
    async fn identity(&self, access_token: &str) -> Result<Option<UserIdentity>, BackendError> {
        Ok(self.sessions.get(access_token).cloned())
    }
}

/// A fixed account list, or a directory that always fails.
#[derive(Debug, Clone)]
pub struct MemoryDirectory {
    accounts: Result<Vec<AccountRecord>, String>,
}

impl MemoryDirectory {
    /// Directory returning `accounts` in order.
    #[must_use]
    pub const fn new(accounts: Vec<AccountRecord>) -> Self {
        Self {
            accounts: Ok(accounts),
        }
    }

    /// Directory whose every listing fails with `message`.
    #[must_use]
    pub fn failing(message: impl Into<String>) -> Self {
        Self {
            accounts: Err(message.into()),
        }
    }
}

#[async_trait]
impl AccountDirectory for MemoryDirectory {
    async fn list_accounts(&self) -> Result<Vec<AccountRecord>, BackendError> {
        self.accounts
            .clone()
            .map_err(BackendError::Unavailable)
    }
}
