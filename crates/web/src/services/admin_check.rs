//! Admin status resolution.
//!
//! [`check_admin`] answers once for a request. [`AdminStatusTracker`] keeps
//! the status of a changing identity (a signed-in session that switches
//! users) and guarantees that only the lookup for the most recent identity
//! is ever published.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use tokio::sync::watch;

use prodboard_core::{AdminStatus, UserId};

use crate::backend::{RoleLookupError, RoleStore};

/// Resolve the admin status for a possibly-absent identity.
///
/// No identity resolves to not-admin without touching the store. A missing
/// role record and any lookup failure also resolve to not-admin; failures
/// are logged, never returned.
pub async fn check_admin<S>(store: &S, identity: Option<&UserId>) -> AdminStatus
where
    S: RoleStore + ?Sized,
{
    match identity {
        Some(user_id) => lookup(store, user_id).await,
        None => AdminStatus::NOT_ADMIN,
    }
}

async fn lookup<S>(store: &S, user_id: &UserId) -> AdminStatus
where
    S: RoleStore + ?Sized,
{
    match store.role(user_id).await {
        Ok(role) => AdminStatus::resolved(&role),
        Err(RoleLookupError::NotFound) => AdminStatus::NOT_ADMIN,
        Err(e) => {
            tracing::error!(%user_id, error = %e, "Error checking admin status");
            AdminStatus::NOT_ADMIN
        }
    }
}

/// Admin status of the current identity, recomputed on every change.
///
/// Each [`set_identity`](Self::set_identity) starts a new generation. A
/// lookup publishes its result only if its generation is still current, so
/// a slow answer for a previous identity is discarded instead of
/// overwriting the answer for the new one.
///
/// Must be used from within a tokio runtime.
pub struct AdminStatusTracker {
    store: Arc<dyn RoleStore>,
    generation: Arc<AtomicU64>,
    status: Arc<watch::Sender<AdminStatus>>,
}

impl AdminStatusTracker {
    /// Create a tracker with no identity: `(false, false)`.
    #[must_use]
    pub fn new(store: Arc<dyn RoleStore>) -> Self {
        let (status, _) = watch::channel(AdminStatus::NOT_ADMIN);
        Self {
            store,
            generation: Arc::new(AtomicU64::new(0)),
            status: Arc::new(status),
        }
    }

    /// Switch to a new identity (or to none).
    ///
    /// `None` settles immediately. `Some` publishes a loading status and
    /// spawns exactly one lookup for that identity.
    pub fn set_identity(&self, identity: Option<UserId>) {
        let generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;

        let Some(user_id) = identity else {
            self.status.send_replace(AdminStatus::NOT_ADMIN);
            return;
        };

        self.status.send_replace(AdminStatus::LOADING);

        let store = Arc::clone(&self.store);
        let current = Arc::clone(&self.generation);
        let status = Arc::clone(&self.status);
        tokio::spawn(async move {
            let resolved = lookup(&*store, &user_id).await;

            // The generation check runs under the channel's write lock, so it
            // cannot interleave with a newer set_identity publishing.
            let applied = status.send_if_modified(|value| {
                if current.load(Ordering::SeqCst) == generation {
                    *value = resolved;
                    true
                } else {
                    false
                }
            });

            if !applied {
                tracing::debug!(%user_id, generation, "discarded stale admin status");
            }
        });
    }

    /// The latest published status.
    #[must_use]
    pub fn status(&self) -> AdminStatus {
        *self.status.borrow()
    }

    /// Receive every published status.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<AdminStatus> {
        self.status.subscribe()
    }

    /// Wait until the current identity's lookup has settled.
    pub async fn resolved(&self) -> AdminStatus {
        let mut receiver = self.status.subscribe();
        let settled = receiver.wait_for(|status| !status.loading).await.map(|s| *s);
        settled.unwrap_or_else(|_| *receiver.borrow())
    }
}

impl std::fmt::Debug for AdminStatusTracker {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AdminStatusTracker")
            .field("generation", &self.generation.load(Ordering::SeqCst))
            .field("status", &self.status())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::time::Duration;

    use uuid::Uuid;

    use super::*;
    use crate::backend::MemoryRoleStore;

    fn user() -> UserId {
        UserId::new(Uuid::new_v4())
    }

    const ADMIN: AdminStatus = AdminStatus {
        is_admin: true,
        loading: false,
    };

    #[tokio::test]
    async fn test_no_identity_skips_lookup() {
        let store = MemoryRoleStore::new();
        assert_eq!(check_admin(&store, None).await, AdminStatus::NOT_ADMIN);
        assert_eq!(store.lookups(), 0);
    }

    #[tokio::test]
    async fn test_role_labels() {
        let (admin, editor, nobody) = (user(), user(), user());
        let store = MemoryRoleStore::new()
            .with_role(admin, "admin")
            .with_role(editor, "editor");

        assert_eq!(check_admin(&store, Some(&admin)).await, ADMIN);
        assert_eq!(check_admin(&store, Some(&editor)).await, AdminStatus::NOT_ADMIN);
        assert_eq!(check_admin(&store, Some(&nobody)).await, AdminStatus::NOT_ADMIN);
        assert_eq!(store.lookups(), 3);
    }

    #[tokio::test]
    async fn test_lookup_failure_is_not_admin() {
        let id = user();
        let store = MemoryRoleStore::new().with_role(id, "admin").with_failure(id);
        assert_eq!(check_admin(&store, Some(&id)).await, AdminStatus::NOT_ADMIN);
    }

    #[tokio::test]
    async fn test_tracker_starts_settled() {
        let tracker = AdminStatusTracker::new(Arc::new(MemoryRoleStore::new()));
        assert_eq!(tracker.status(), AdminStatus::NOT_ADMIN);
        assert_eq!(tracker.resolved().await, AdminStatus::NOT_ADMIN);
    }

    #[tokio::test]
    async fn test_tracker_resolves_admin() {
        let id = user();
        let store = Arc::new(MemoryRoleStore::new().with_role(id, "admin"));
        let tracker = AdminStatusTracker::new(store.clone());

        tracker.set_identity(Some(id));
        assert_eq!(tracker.status(), AdminStatus::LOADING);
        assert_eq!(tracker.resolved().await, ADMIN);
        assert_eq!(store.lookups(), 1);
    }

    #[tokio::test]
    async fn test_tracker_clearing_identity_settles_immediately() {
        let id = user();
        let store = Arc::new(
            MemoryRoleStore::new()
                .with_role(id, "admin")
                .with_delay(id, Duration::from_millis(100)),
        );
        let tracker = AdminStatusTracker::new(store.clone());

        tracker.set_identity(Some(id));
        tracker.set_identity(None);
        assert_eq!(tracker.status(), AdminStatus::NOT_ADMIN);

        // The in-flight admin answer must not resurface.
        tokio::time::sleep(Duration::from_millis(250)).await;
        assert_eq!(tracker.status(), AdminStatus::NOT_ADMIN);
    }

    #[tokio::test]
    async fn test_tracker_last_identity_wins() {
        let (slow_admin, fast_editor) = (user(), user());
        let store = Arc::new(
            MemoryRoleStore::new()
                .with_role(slow_admin, "admin")
                .with_delay(slow_admin, Duration::from_millis(150))
                .with_role(fast_editor, "editor"),
        );
        let tracker = AdminStatusTracker::new(store.clone());

        tracker.set_identity(Some(slow_admin));
        tracker.set_identity(Some(fast_editor));
        assert_eq!(tracker.resolved().await, AdminStatus::NOT_ADMIN);

        // Let the slow lookup finish; its result is stale.
        tokio::time::sleep(Duration::from_millis(300)).await;
        assert_eq!(tracker.status(), AdminStatus::NOT_ADMIN);
        assert_eq!(store.lookups(), 2);
    }

    #[tokio::test]
    async fn test_tracker_reruns_lookup_for_same_identity() {
        let id = user();
        let store = Arc::new(MemoryRoleStore::new().with_role(id, "admin"));
        let tracker = AdminStatusTracker::new(store.clone());

        tracker.set_identity(Some(id));
        assert_eq!(tracker.resolved().await, ADMIN);

        store.set_role(id, "viewer").await;
        tracker.set_identity(Some(id));
        assert_eq!(tracker.resolved().await, AdminStatus::NOT_ADMIN);
        assert_eq!(store.lookups(), 2);
    }

    #[tokio::test]
    async fn test_tracker_subscribers_see_loading_then_result() {
        let id = user();
        let store = Arc::new(
            MemoryRoleStore::new()
                .with_role(id, "admin")
                .with_delay(id, Duration::from_millis(20)),
        );
        let tracker = AdminStatusTracker::new(store);
        let mut receiver = tracker.subscribe();

        tracker.set_identity(Some(id));
        receiver.changed().await.unwrap();
        assert_eq!(*receiver.borrow_and_update(), AdminStatus::LOADING);

        receiver.changed().await.unwrap();
        assert_eq!(*receiver.borrow_and_update(), ADMIN);
    }
}
