//! Client for the hosted auth/data service (Supabase-compatible).
//!
//! # Endpoints
//!
//! - `GET /auth/v1/user` - identity behind an end-user access token
//! - `GET /auth/v1/admin/users` - paged account listing (service key only)
//! - `GET /rest/v1/{table}` - role record lookup through the data API
//!
//! # Credentials
//!
//! The public key is sent with end-user requests. The service key bypasses
//! row-level security and is only used for server-side role lookups and the
//! account listing. Neither key is ever logged or returned to clients.

mod auth;
mod rest;

use std::sync::Arc;

use reqwest::header::HeaderValue;
use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;
use url::Url;

use crate::backend::BackendError;
use crate::config::SupabaseConfig;

/// Header carrying the project API key on every request.
const API_KEY_HEADER: &str = "apikey";

/// PostgREST error code for "zero rows where exactly one was requested".
pub const NO_ROWS_CODE: &str = "PGRST116";

/// Supabase API client.
///
/// Cheaply cloneable; all clones share one connection pool.
#[derive(Clone)]
pub struct SupabaseClient {
    inner: Arc<SupabaseClientInner>,
}

struct SupabaseClientInner {
    client: reqwest::Client,
    base_url: Url,
    anon_key: SecretString,
    service_role_key: SecretString,
    roles_table: String,
    users_per_page: u32,
}

/// Which project key a request is made with.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Credential {
    Anon,
    ServiceRole,
}

/// Error body shapes returned by the auth and data APIs.
#[derive(Debug, Default, Deserialize)]
struct ApiErrorBody {
    code: Option<serde_json::Value>,
    message: Option<String>,
    msg: Option<String>,
    error_description: Option<String>,
    error: Option<String>,
}

impl ApiErrorBody {
    fn code(&self) -> Option<String> {
        match self.code.as_ref()? {
            serde_json::Value::String(code) => Some(code.clone()),
            other => Some(other.to_string()),
        }
    }

    fn message(self) -> Option<String> {
        self.message
            .or(self.msg)
            .or(self.error_description)
            .or(self.error)
    }
}

/// A non-success upstream response, kept for classification.
#[derive(Debug)]
pub struct ApiFailure {
    pub status: u16,
    pub code: Option<String>,
    pub message: String,
}

impl From<ApiFailure> for BackendError {
    fn from(failure: ApiFailure) -> Self {
        Self::Api {
            status: failure.status,
            message: failure.message,
        }
    }
}

impl SupabaseClient {
    /// Create a new client from configuration.
    ///
    /// # Errors
    ///
    /// Returns error if the HTTP client fails to build.
    pub fn new(config: &SupabaseConfig) -> Result<Self, BackendError> {
        let client = reqwest::Client::builder()
            .timeout(config.timeout)
            .user_agent(concat!("prodboard-web/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self {
            inner: Arc::new(SupabaseClientInner {
                client,
                base_url: normalize_base_url(config.url.clone()),
                anon_key: config.anon_key.clone(),
                service_role_key: config.service_role_key.clone(),
                roles_table: config.roles_table.clone(),
                users_per_page: config.users_per_page,
            }),
        })
    }

    /// Project base URL (always ends with `/`).
    #[must_use]
    pub fn base_url(&self) -> &Url {
        &self.inner.base_url
    }

    /// Table holding role records.
    #[must_use]
    pub fn roles_table(&self) -> &str {
        &self.inner.roles_table
    }

    /// Page size used when walking the account listing.
    #[must_use]
    pub fn users_per_page(&self) -> u32 {
        self.inner.users_per_page
    }

    /// Resolve a path relative to the project base URL.
    fn endpoint(&self, path: &str) -> Result<Url, BackendError> {
        self.inner
            .base_url
            .join(path)
            .map_err(|e| BackendError::Parse(format!("invalid endpoint '{path}': {e}")))
    }

    /// Start a GET request authenticated with a project key.
    ///
    /// `bearer` overrides the `Authorization` token (used for end-user
    /// tokens); otherwise the project key itself is the bearer token.
    fn get(&self, url: Url, credential: Credential, bearer: Option<&str>) -> reqwest::RequestBuilder {
        let key = match credential {
            Credential::Anon => &self.inner.anon_key,
            Credential::ServiceRole => &self.inner.service_role_key,
        };
        let mut request = self.inner.client.get(url);
        if let Ok(value) = HeaderValue::from_str(key.expose_secret()) {
            request = request.header(API_KEY_HEADER, value);
        }
        request.bearer_auth(bearer.unwrap_or_else(|| key.expose_secret()))
    }

    /// Decode a success body, or classify the failure.
    async fn read_json<T: serde::de::DeserializeOwned>(
        response: reqwest::Response,
    ) -> Result<Result<T, ApiFailure>, BackendError> {
        let status = response.status();
        if status.is_success() {
            let body = response
                .json()
                .await
                .map_err(|e| BackendError::Parse(format!("Failed to parse response: {e}")))?;
            return Ok(Ok(body));
        }
        Ok(Err(Self::parse_failure(response).await))
    }

    /// Parse an error response from the auth or data API.
    async fn parse_failure(response: reqwest::Response) -> ApiFailure {
        let status = response.status().as_u16();
        let text = response
            .text()
            .await
            .unwrap_or_else(|_| "Unknown error".to_string());

        let body: ApiErrorBody = serde_json::from_str(&text).unwrap_or_default();
        let code = body.code();
        let message = body.message().unwrap_or(text);

        ApiFailure {
            status,
            code,
            message,
        }
    }
}

impl std::fmt::Debug for SupabaseClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SupabaseClient")
            .field("base_url", &self.inner.base_url.as_str())
            .field("roles_table", &self.inner.roles_table)
            .finish_non_exhaustive()
    }
}

/// Make relative joins append to the base path instead of replacing its last
/// segment.
fn normalize_base_url(mut url: Url) -> Url {
    if !url.path().ends_with('/') {
        let path = format!("{}/", url.path());
        url.set_path(&path);
    }
    url
}
