//! Integration tests for the account listing.
//!
//! Run with: cargo test -p prodboard-integration-tests --test api_users

#![allow(clippy::unwrap_used, clippy::indexing_slicing)]

use std::sync::Arc;

use axum::http::StatusCode;
use serde_json::json;

use prodboard_core::AccountRecord;
use prodboard_integration_tests::{account_json, get_request, send};
use prodboard_web::{
    AppState,
    backend::{MemoryDirectory, MemoryIdentityProvider, MemoryRoleStore},
};

fn app(directory: MemoryDirectory) -> axum::Router {
    let state = AppState::new(
        Arc::new(MemoryIdentityProvider::new()),
        Arc::new(MemoryRoleStore::new()),
        Arc::new(directory),
    );
    prodboard_web::router(state)
}

fn record(value: serde_json::Value) -> AccountRecord {
    serde_json::from_value(value).unwrap()
}

#[tokio::test]
async fn test_lists_summaries_in_upstream_order() {
    let directory = MemoryDirectory::new(vec![
        record(account_json(
            "0b6d5a8e-1f2c-4c3d-9e8f-7a6b5c4d3e2f",
            Some("ana@example.com"),
            Some("Ana Ops"),
        )),
        record(account_json(
            "1c7e6b9f-2a3d-4d4e-8f9a-8b7c6d5e4f3a",
            Some("ben@example.com"),
            None,
        )),
    ]);

    let (status, body) = send(app(directory), get_request("/api/users", None)).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body,
        json!([
            {
                "id": "0b6d5a8e-1f2c-4c3d-9e8f-7a6b5c4d3e2f",
                "email": "ana@example.com",
                "full_name": "Ana Ops",
                "created_at": "2024-02-10T08:15:00.123456Z"
            },
            {
                "id": "1c7e6b9f-2a3d-4d4e-8f9a-8b7c6d5e4f3a",
                "email": "ben@example.com",
                "full_name": "ben@example.com",
                "created_at": "2024-02-10T08:15:00.123456Z"
            }
        ])
    );
}

#[tokio::test]
async fn test_account_without_name_or_email() {
    let directory = MemoryDirectory::new(vec![record(account_json(
        "2d8f7c0a-3b4e-4e5f-9a0b-9c8d7e6f5a4b",
        None,
        None,
    ))]);

    let (status, body) = send(app(directory), get_request("/api/users", None)).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body[0]["email"], "");
    assert_eq!(body[0]["full_name"], "Unknown User");
}

#[tokio::test]
async fn test_summaries_omit_other_fields() {
    let directory = MemoryDirectory::new(vec![record(account_json(
        "3e9a8d1b-4c5f-4f6a-8b1c-0d9e8f7a6b5c",
        Some("cy@example.com"),
        Some("Cy"),
    ))]);

    let (_, body) = send(app(directory), get_request("/api/users", None)).await;

    let keys: Vec<&str> = body[0]
        .as_object()
        .unwrap()
        .keys()
        .map(String::as_str)
        .collect();
    assert_eq!(keys.len(), 4);
    for key in ["id", "email", "full_name", "created_at"] {
        assert!(keys.contains(&key), "missing {key}");
    }
}

#[tokio::test]
async fn test_empty_directory() {
    let (status, body) = send(
        app(MemoryDirectory::new(Vec::new())),
        get_request("/api/users", None),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!([]));
}

#[tokio::test]
async fn test_listing_failure_is_generic_500() {
    let (status, body) = send(
        app(MemoryDirectory::failing("service key rejected: sk-live-123")),
        get_request("/api/users", None),
    )
    .await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body, json!({ "error": "Failed to fetch users" }));
}

#[tokio::test]
async fn test_response_carries_request_id() {
    let response = tower::ServiceExt::oneshot(
        app(MemoryDirectory::new(Vec::new())),
        get_request("/api/users", None),
    )
    .await
    .unwrap();

    assert!(response.headers().contains_key("x-request-id"));
}
