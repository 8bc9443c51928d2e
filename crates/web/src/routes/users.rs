//! Admin user listing handler.

use axum::{Json, extract::State};
use tracing::instrument;

use prodboard_core::UserSummary;

use crate::{error::AppError, services::list_user_summaries, state::AppState};

/// Message returned to clients when the listing fails.
pub const FETCH_USERS_FAILED: &str = "Failed to fetch users";

/// `GET /api/users` - every registered account as a safe summary.
///
/// # Errors
///
/// Returns a 500 with a generic message if the upstream listing fails; the
/// cause is only logged.
#[instrument(skip(state))]
pub async fn list(State(state): State<AppState>) -> Result<Json<Vec<UserSummary>>, AppError> {
    let users = list_user_summaries(state.directory())
        .await
        .map_err(|e| AppError::upstream(FETCH_USERS_FAILED, e))?;

    tracing::debug!(count = users.len(), "listed users");
    Ok(Json(users))
}
