//! Admin user listing.

use prodboard_core::UserSummary;

use crate::backend::{AccountDirectory, BackendError};

/// List every registered account as a [`UserSummary`], in directory order.
///
/// # Errors
///
/// Returns the directory error unchanged; no partial listing is produced.
pub async fn list_user_summaries<D>(directory: &D) -> Result<Vec<UserSummary>, BackendError>
where
    D: AccountDirectory + ?Sized,
{
    let accounts = directory.list_accounts().await?;
    Ok(accounts.iter().map(UserSummary::from).collect())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use chrono::{TimeZone, Utc};
    use uuid::Uuid;

    use prodboard_core::{AccountRecord, UNKNOWN_USER_NAME, UserId, UserMetadata};

    use super::*;
    use crate::backend::MemoryDirectory;

    fn account(email: Option<&str>, full_name: Option<&str>) -> AccountRecord {
        AccountRecord {
            id: UserId::new(Uuid::new_v4()),
            email: email.map(String::from),
            user_metadata: Some(UserMetadata {
                full_name: full_name.map(String::from),
            }),
            created_at: Utc.with_ymd_and_hms(2024, 5, 1, 9, 30, 0).unwrap(),
        }
    }

    #[tokio::test]
    async fn test_preserves_order_and_fallbacks() {
        let accounts = vec![
            account(Some("lead@example.com"), Some("Stage Lead")),
            account(Some("props@example.com"), None),
            account(None, None),
        ];
        let ids: Vec<UserId> = accounts.iter().map(|a| a.id).collect();
        let directory = MemoryDirectory::new(accounts);

        let summaries = list_user_summaries(&directory).await.unwrap();
        let names: Vec<&str> = summaries.iter().map(|s| s.full_name.as_str()).collect();
        assert_eq!(names, ["Stage Lead", "props@example.com", UNKNOWN_USER_NAME]);
        assert_eq!(summaries.iter().map(|s| s.id).collect::<Vec<_>>(), ids);
    }

    #[tokio::test]
    async fn test_failure_yields_no_results() {
        let directory = MemoryDirectory::failing("upstream down");
        assert!(list_user_summaries(&directory).await.is_err());
    }
}
