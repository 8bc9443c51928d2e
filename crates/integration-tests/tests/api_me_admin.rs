//! Integration tests for the caller's admin status and the status tracker.
//!
//! Run with: cargo test -p prodboard-integration-tests --test api_me_admin

#![allow(clippy::unwrap_used)]

use std::sync::Arc;
use std::time::Duration;

use axum::http::StatusCode;
use chrono::Utc;
use serde_json::json;

use prodboard_core::{AdminStatus, UserId, UserIdentity};
use prodboard_integration_tests::{get_request, send};
use prodboard_web::{
    AppState,
    backend::{MemoryDirectory, MemoryIdentityProvider, MemoryRoleStore},
    services::AdminStatusTracker,
};

const ADMIN_TOKEN: &str = "token-admin";
const EDITOR_TOKEN: &str = "token-editor";
const NEWCOMER_TOKEN: &str = "token-newcomer";
const FLAKY_TOKEN: &str = "token-flaky";

fn new_user_id() -> UserId {
    UserId::new(uuid::Uuid::new_v4())
}

fn identity(id: UserId) -> UserIdentity {
    UserIdentity {
        id,
        email: Some(format!("{id}@example.com")),
        full_name: None,
        created_at: Utc::now(),
    }
}

struct Fixture {
    state: AppState,
    roles: Arc<MemoryRoleStore>,
    admin: UserId,
}

fn fixture() -> Fixture {
    let admin = new_user_id();
    let editor = new_user_id();
    let newcomer = new_user_id();
    let flaky = new_user_id();

    let roles = Arc::new(
        MemoryRoleStore::new()
            .with_role(admin, "admin")
            .with_role(editor, "editor")
            .with_failure(flaky),
    );
    let sessions = MemoryIdentityProvider::new()
        .with_session(ADMIN_TOKEN, identity(admin))
        .with_session(EDITOR_TOKEN, identity(editor))
        .with_session(NEWCOMER_TOKEN, identity(newcomer))
        .with_session(FLAKY_TOKEN, identity(flaky));

    let state = AppState::new(
        Arc::new(sessions),
        roles.clone(),
        Arc::new(MemoryDirectory::new(Vec::new())),
    );

    Fixture {
        state,
        roles,
        admin,
    }
}

async fn admin_status(state: &AppState, token: Option<&str>) -> serde_json::Value {
    let (status, body) = send(
        prodboard_web::router(state.clone()),
        get_request("/api/me/admin", token),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    body
}

#[tokio::test]
async fn test_admin_role_is_admin() {
    let fx = fixture();
    assert_eq!(
        admin_status(&fx.state, Some(ADMIN_TOKEN)).await,
        json!({ "is_admin": true, "loading": false })
    );
}

#[tokio::test]
async fn test_other_role_is_not_admin() {
    let fx = fixture();
    assert_eq!(
        admin_status(&fx.state, Some(EDITOR_TOKEN)).await,
        json!({ "is_admin": false, "loading": false })
    );
}

#[tokio::test]
async fn test_missing_role_record_is_not_admin() {
    let fx = fixture();
    assert_eq!(
        admin_status(&fx.state, Some(NEWCOMER_TOKEN)).await,
        json!({ "is_admin": false, "loading": false })
    );
}

#[tokio::test]
async fn test_lookup_failure_is_not_admin() {
    let fx = fixture();
    assert_eq!(
        admin_status(&fx.state, Some(FLAKY_TOKEN)).await,
        json!({ "is_admin": false, "loading": false })
    );
}

#[tokio::test]
async fn test_anonymous_skips_lookup() {
    let fx = fixture();

    assert_eq!(
        admin_status(&fx.state, None).await,
        json!({ "is_admin": false, "loading": false })
    );
    assert_eq!(
        admin_status(&fx.state, Some("unknown-token")).await,
        json!({ "is_admin": false, "loading": false })
    );
    assert_eq!(fx.roles.lookups(), 0);
}

#[tokio::test]
async fn test_each_request_reads_current_role() {
    let fx = fixture();

    fx.roles.remove_role(&fx.admin).await;
    assert_eq!(
        admin_status(&fx.state, Some(ADMIN_TOKEN)).await["is_admin"],
        false
    );

    fx.roles.set_role(fx.admin, "admin").await;
    assert_eq!(
        admin_status(&fx.state, Some(ADMIN_TOKEN)).await["is_admin"],
        true
    );
    assert_eq!(fx.roles.lookups(), 2);
}

#[tokio::test]
async fn test_tracker_shares_state_role_store() {
    let fx = fixture();
    let tracker = AdminStatusTracker::new(fx.state.roles_handle());

    tracker.set_identity(Some(fx.admin));
    assert_eq!(tracker.status(), AdminStatus::LOADING);
    assert_eq!(tracker.resolved().await, AdminStatus::resolved(&"admin".into()));
    assert!(tracker.status().is_admin);
}

#[tokio::test]
async fn test_tracker_slow_stale_lookup_is_discarded() {
    let slow_admin = new_user_id();
    let viewer = new_user_id();
    let roles = Arc::new(
        MemoryRoleStore::new()
            .with_role(slow_admin, "admin")
            .with_delay(slow_admin, Duration::from_millis(100))
            .with_role(viewer, "viewer"),
    );
    let tracker = AdminStatusTracker::new(roles.clone());

    tracker.set_identity(Some(slow_admin));
    tracker.set_identity(Some(viewer));
    assert_eq!(tracker.resolved().await, AdminStatus::NOT_ADMIN);

    tokio::time::sleep(Duration::from_millis(200)).await;
    assert_eq!(tracker.status(), AdminStatus::NOT_ADMIN);
    assert_eq!(roles.lookups(), 2);
}
