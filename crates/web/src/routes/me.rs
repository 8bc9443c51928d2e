//! Current user handlers.

use axum::{Json, extract::State};
use tracing::instrument;

use prodboard_core::AdminStatus;

use crate::{middleware::CurrentIdentity, services::check_admin, state::AppState};

/// `GET /api/me/admin` - admin status of the caller.
///
/// Anonymous callers, unknown roles and lookup failures all answer
/// `{"is_admin": false, "loading": false}`.
#[instrument(skip_all)]
pub async fn admin_status(
    State(state): State<AppState>,
    CurrentIdentity(identity): CurrentIdentity,
) -> Json<AdminStatus> {
    let user_id = identity.as_ref().map(|user| &user.id);
    Json(check_admin(state.roles(), user_id).await)
}
