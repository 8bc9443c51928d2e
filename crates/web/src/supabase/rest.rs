//! Data API: role record lookup.

use async_trait::async_trait;
use reqwest::header::ACCEPT;
use serde::Deserialize;
use tracing::instrument;

use prodboard_core::{RoleLabel, UserId};

use super::{Credential, NO_ROWS_CODE, SupabaseClient};
use crate::backend::{BackendError, RoleLookupError, RoleStore};

/// Ask the data API for a single object instead of an array. Zero rows is
/// then reported as a 406 with [`NO_ROWS_CODE`].
const SINGLE_OBJECT: &str = "application/vnd.pgrst.object+json";

#[derive(Debug, Deserialize)]
struct RoleRow {
    role: RoleLabel,
}

#[async_trait]
impl RoleStore for SupabaseClient {
    #[instrument(skip(self), fields(table = %self.roles_table()))]
    async fn role(&self, user_id: &UserId) -> Result<RoleLabel, RoleLookupError> {
        let url = self.endpoint(&format!("rest/v1/{}", self.roles_table()))?;
        let filter = format!("eq.{user_id}");
        let response = self
            .get(url, Credential::ServiceRole, None)
            .header(ACCEPT, SINGLE_OBJECT)
            .query(&[("select", "role"), ("user_id", filter.as_str())])
            .send()
            .await
            .map_err(BackendError::from)?;

        match Self::read_json::<RoleRow>(response).await? {
            Ok(row) => Ok(row.role),
            Err(failure) if failure.code.as_deref() == Some(NO_ROWS_CODE) => {
                Err(RoleLookupError::NotFound)
            }
            Err(failure) => Err(RoleLookupError::Upstream(failure.into())),
        }
    }
}
