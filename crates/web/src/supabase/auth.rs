//! Auth API: identity resolution and the privileged account listing.

use async_trait::async_trait;
use serde::Deserialize;
use tracing::instrument;

use prodboard_core::{AccountRecord, UserIdentity};

use super::{Credential, SupabaseClient};
use crate::backend::{AccountDirectory, BackendError, IdentityProvider};

/// One page of the admin account listing.
#[derive(Debug, Deserialize)]
struct AccountPage {
    #[serde(default)]
    users: Vec<AccountRecord>,
}

#[async_trait]
impl IdentityProvider for SupabaseClient {
    #[instrument(skip_all)]
    async fn identity(&self, access_token: &str) -> Result<Option<UserIdentity>, BackendError> {
        let url = self.endpoint("auth/v1/user")?;
        let response = self
            .get(url, Credential::Anon, Some(access_token))
            .send()
            .await?;

        match Self::read_json::<AccountRecord>(response).await? {
            Ok(record) => Ok(Some(record.into())),
            // Expired, revoked or malformed tokens mean "no identity".
            Err(failure) if matches!(failure.status, 401 | 403) => {
                tracing::debug!(status = failure.status, "access token rejected");
                Ok(None)
            }
            Err(failure) => Err(failure.into()),
        }
    }
}

#[async_trait]
impl AccountDirectory for SupabaseClient {
    #[instrument(skip(self), fields(per_page = self.users_per_page()))]
    async fn list_accounts(&self) -> Result<Vec<AccountRecord>, BackendError> {
        let per_page = self.users_per_page();
        let mut accounts = Vec::new();
        let mut page: u32 = 1;

        loop {
            let url = self.endpoint("auth/v1/admin/users")?;
            let response = self
                .get(url, Credential::ServiceRole, None)
                .query(&[("page", page), ("per_page", per_page)])
                .send()
                .await?;

            let batch = Self::read_json::<AccountPage>(response)
                .await?
                .map_err(BackendError::from)?
                .users;

            let fetched = batch.len();
            accounts.extend(batch);

            if fetched < per_page as usize {
                break;
            }
            page += 1;
        }

        tracing::debug!(count = accounts.len(), pages = page, "listed accounts");
        Ok(accounts)
    }
}
