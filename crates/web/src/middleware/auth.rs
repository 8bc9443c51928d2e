//! Identity extractor for API handlers.
//!
//! Reads the end-user access token from `Authorization: Bearer <token>` and
//! resolves it through the configured [`IdentityProvider`].
//!
//! [`IdentityProvider`]: crate::backend::IdentityProvider

use axum::{
    extract::FromRequestParts,
    http::{HeaderMap, header::AUTHORIZATION, request::Parts},
};

use prodboard_core::UserIdentity;

use crate::state::AppState;

/// Extractor that optionally gets the current identity.
///
/// Never rejects: a missing, malformed, expired or unverifiable token all
/// yield `None`. Auth service failures are logged.
///
/// # Example
///
/// ```rust,ignore
/// async fn handler(CurrentIdentity(identity): CurrentIdentity) -> String {
///     match identity {
///         Some(user) => format!("Hello, {}!", user.id),
///         None => "Hello, guest!".to_string(),
///     }
/// }
/// ```
#[derive(Debug, Clone)]
pub struct CurrentIdentity(pub Option<UserIdentity>);

impl FromRequestParts<AppState> for CurrentIdentity {
    type Rejection = std::convert::Infallible;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let Some(token) = bearer_token(&parts.headers) else {
            return Ok(Self(None));
        };

        match state.identity().identity(token).await {
            Ok(identity) => Ok(Self(identity)),
            Err(e) => {
                tracing::error!(error = %e, "Failed to resolve access token");
                Ok(Self(None))
            }
        }
    }
}

/// The bearer token from the `Authorization` header, if any.
#[must_use]
pub fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    let value = headers.get(AUTHORIZATION)?.to_str().ok()?;
    let (scheme, token) = value.split_once(' ')?;
    let token = token.trim();
    (scheme.eq_ignore_ascii_case("bearer") && !token.is_empty()).then_some(token)
}
