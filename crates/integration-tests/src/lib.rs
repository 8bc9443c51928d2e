//! Integration tests for Prodboard.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p prodboard-integration-tests
//! ```
//!
//! No hosted project is needed. Router tests use the in-memory backends;
//! client tests run [`FakeSupabase`], an in-process axum server speaking
//! the subset of the auth and data APIs the client uses.
//!
//! # Test Categories
//!
//! - `api_*` - Router tests through `tower::ServiceExt::oneshot`
//! - `supabase_client` - `SupabaseClient` against the fake upstream

#![allow(clippy::unwrap_used, clippy::missing_panics_doc)]

use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use axum::{
    Json, Router,
    body::Body,
    extract::{Path, Query, State},
    http::{HeaderMap, Request, StatusCode, header},
    response::{IntoResponse, Response},
    routing::get,
};
use secrecy::SecretString;
use serde_json::{Value, json};
use tower::ServiceExt;
use url::Url;

use prodboard_web::config::SupabaseConfig;

/// Public key accepted by the fake upstream.
pub const ANON_KEY: &str = "fake-anon-key";
/// Service key accepted by the fake upstream.
pub const SERVICE_KEY: &str = "fake-service-role-key";
/// Role table served by the fake upstream.
pub const ROLES_TABLE: &str = "user_roles";

/// Send one request through a router and decode the JSON body.
///
/// Non-JSON bodies decode as a JSON string.
pub async fn send(app: Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let body = serde_json::from_slice(&bytes)
        .unwrap_or_else(|_| Value::String(String::from_utf8_lossy(&bytes).into_owned()));
    (status, body)
}

/// GET request with an optional bearer token.
pub fn get_request(uri: &str, bearer: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder().uri(uri);
    if let Some(token) = bearer {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
    }
    builder.body(Body::empty()).unwrap()
}

/// An account JSON object shaped like the auth API's user object.
pub fn account_json(id: &str, email: Option<&str>, full_name: Option<&str>) -> Value {
    let metadata = full_name.map_or_else(|| json!({}), |name| json!({ "full_name": name }));
    json!({
        "id": id,
        "aud": "authenticated",
        "role": "authenticated",
        "email": email,
        "phone": "",
        "app_metadata": { "provider": "email" },
        "user_metadata": metadata,
        "created_at": "2024-02-10T08:15:00.123456Z",
        "updated_at": "2024-02-11T08:15:00Z"
    })
}

/// In-process stand-in for the hosted auth/data service.
#[derive(Debug, Default)]
pub struct FakeSupabase {
    /// Accounts returned by the admin listing, in order.
    pub accounts: Vec<Value>,
    /// Access token to account JSON.
    pub sessions: HashMap<String, Value>,
    /// User id (string) to role label.
    pub roles: HashMap<String, String>,
    /// User ids whose role lookup answers 503.
    pub failing_roles: HashSet<String>,
    /// Answer the admin listing with a 500.
    pub fail_listing: bool,
}

/// Handle to a spawned [`FakeSupabase`].
#[derive(Debug, Clone)]
pub struct RunningFake {
    /// Base URL of the fake project.
    pub url: Url,
    listing_requests: Arc<AtomicUsize>,
}

impl RunningFake {
    /// Number of admin listing pages requested so far.
    #[must_use]
    pub fn listing_requests(&self) -> usize {
        self.listing_requests.load(Ordering::SeqCst)
    }

    /// Client configuration pointing at this fake.
    #[must_use]
    pub fn config(&self, users_per_page: u32) -> SupabaseConfig {
        SupabaseConfig {
            url: self.url.clone(),
            anon_key: SecretString::from(ANON_KEY),
            service_role_key: SecretString::from(SERVICE_KEY),
            roles_table: ROLES_TABLE.to_string(),
            timeout: Duration::from_secs(5),
            users_per_page,
        }
    }
}

#[derive(Clone)]
struct FakeState {
    fake: Arc<FakeSupabase>,
    listing_requests: Arc<AtomicUsize>,
}

impl FakeSupabase {
    /// Serve this fake on an ephemeral local port.
    pub async fn spawn(self) -> RunningFake {
        let listing_requests = Arc::new(AtomicUsize::new(0));
        let state = FakeState {
            fake: Arc::new(self),
            listing_requests: Arc::clone(&listing_requests),
        };

        let app = Router::new()
            .route("/auth/v1/user", get(current_user))
            .route("/auth/v1/admin/users", get(admin_users))
            .route("/rest/v1/{table}", get(role_lookup))
            .with_state(state);

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        RunningFake {
            url: Url::parse(&format!("http://{addr}")).unwrap(),
            listing_requests,
        }
    }
}

fn header_str<'a>(headers: &'a HeaderMap, name: &str) -> Option<&'a str> {
    headers.get(name).and_then(|v| v.to_str().ok())
}

fn has_key(headers: &HeaderMap, key: &str) -> bool {
    header_str(headers, "apikey") == Some(key)
}

fn unauthorized() -> Response {
    (
        StatusCode::UNAUTHORIZED,
        Json(json!({ "code": 401, "msg": "invalid JWT" })),
    )
        .into_response()
}

async fn current_user(State(state): State<FakeState>, headers: HeaderMap) -> Response {
    if !has_key(&headers, ANON_KEY) {
        return unauthorized();
    }
    let token = header_str(&headers, "authorization").and_then(|v| v.strip_prefix("Bearer "));
    match token.and_then(|t| state.fake.sessions.get(t)) {
        Some(account) => Json(account.clone()).into_response(),
        None => unauthorized(),
    }
}

async fn admin_users(
    State(state): State<FakeState>,
    headers: HeaderMap,
    Query(query): Query<HashMap<String, String>>,
) -> Response {
    let bearer = format!("Bearer {SERVICE_KEY}");
    if !has_key(&headers, SERVICE_KEY) || header_str(&headers, "authorization") != Some(&bearer) {
        return unauthorized();
    }
    state.listing_requests.fetch_add(1, Ordering::SeqCst);

    if state.fake.fail_listing {
        return (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(json!({ "code": 500, "msg": "database connection refused" })),
        )
            .into_response();
    }

    let page: usize = query.get("page").and_then(|p| p.parse().ok()).unwrap_or(1);
    let per_page: usize = query
        .get("per_page")
        .and_then(|p| p.parse().ok())
        .unwrap_or(50);
    let users: Vec<Value> = state
        .fake
        .accounts
        .iter()
        .skip((page.max(1) - 1) * per_page)
        .take(per_page)
        .cloned()
        .collect();

    Json(json!({ "users": users, "aud": "authenticated" })).into_response()
}

async fn role_lookup(
    State(state): State<FakeState>,
    Path(table): Path<String>,
    headers: HeaderMap,
    Query(query): Query<HashMap<String, String>>,
) -> Response {
    if !has_key(&headers, SERVICE_KEY) {
        return unauthorized();
    }
    if table != ROLES_TABLE {
        return (
            StatusCode::NOT_FOUND,
            Json(json!({ "code": "42P01", "message": format!("relation \"public.{table}\" does not exist") })),
        )
            .into_response();
    }
    if header_str(&headers, "accept") != Some("application/vnd.pgrst.object+json")
        || query.get("select").map(String::as_str) != Some("role")
    {
        return (StatusCode::BAD_REQUEST, Json(json!({ "message": "unexpected query" })))
            .into_response();
    }

    let user_id = query
        .get("user_id")
        .and_then(|f| f.strip_prefix("eq."))
        .unwrap_or_default();

    if state.fake.failing_roles.contains(user_id) {
        return (
            StatusCode::SERVICE_UNAVAILABLE,
            Json(json!({ "message": "upstream database unavailable" })),
        )
            .into_response();
    }

    match state.fake.roles.get(user_id) {
        Some(role) => Json(json!({ "role": role })).into_response(),
        None => (
            StatusCode::NOT_ACCEPTABLE,
            Json(json!({
                "code": "PGRST116",
                "details": "The result contains 0 rows",
                "hint": null,
                "message": "JSON object requested, multiple (or no) rows returned"
            })),
        )
            .into_response(),
    }
}
