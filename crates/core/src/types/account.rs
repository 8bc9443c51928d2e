//! Account types read from the external auth service.
//!
//! The auth service owns these records. Prodboard only reads them and never
//! returns an [`AccountRecord`] to a client directly: the user listing
//! projects each record into a [`UserSummary`].

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::id::UserId;

/// Display name used when an account has neither a full name nor an email.
pub const UNKNOWN_USER_NAME: &str = "Unknown User";

/// Free-form profile metadata attached to an account.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserMetadata {
    #[serde(default)]
    pub full_name: Option<String>,
}

/// An account as returned by the auth service.
///
/// Unknown upstream fields are ignored. `email` and `user_metadata` may be
/// missing or `null`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccountRecord {
    pub id: UserId,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub user_metadata: Option<UserMetadata>,
    pub created_at: DateTime<Utc>,
}

impl AccountRecord {
    /// The profile full name, if set and non-empty.
    #[must_use]
    pub fn full_name(&self) -> Option<&str> {
        self.user_metadata
            .as_ref()
            .and_then(|m| m.full_name.as_deref())
            .filter(|name| !name.is_empty())
    }

    /// The email address, if set and non-empty.
    #[must_use]
    pub fn email(&self) -> Option<&str> {
        self.email.as_deref().filter(|email| !email.is_empty())
    }

    /// Name to show for this account: full name, then email, then
    /// [`UNKNOWN_USER_NAME`].
    #[must_use]
    pub fn display_name(&self) -> &str {
        self.full_name()
            .or_else(|| self.email())
            .unwrap_or(UNKNOWN_USER_NAME)
    }
}

/// The currently authenticated end user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserIdentity {
    pub id: UserId,
    pub email: Option<String>,
    pub full_name: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl From<AccountRecord> for UserIdentity {
    fn from(record: AccountRecord) -> Self {
        Self {
            id: record.id,
            email: record.email().map(String::from),
            full_name: record.full_name().map(String::from),
            created_at: record.created_at,
        }
    }
}

/// Safe projection of an account for the admin user listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserSummary {
    pub id: UserId,
    pub email: String,
    pub full_name: String,
    pub created_at: DateTime<Utc>,
}

impl From<&AccountRecord> for UserSummary {
    fn from(record: &AccountRecord) -> Self {
        Self {
            id: record.id,
            email: record.email.clone().unwrap_or_default(),
            full_name: record.display_name().to_owned(),
            created_at: record.created_at,
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn record(json: serde_json::Value) -> AccountRecord {
        serde_json::from_value(json).unwrap()
    }

    #[test]
    fn test_summary_prefers_full_name() {
        let account = record(serde_json::json!({
            "id": "6f1c2a4e-8d3b-4f7a-9e21-0c5d7b8a9f10",
            "email": "sam@example.com",
            "user_metadata": {"full_name": "Sam Stage"},
            "created_at": "2024-03-01T12:00:00Z",
            "aud": "authenticated"
        }));
        let summary = UserSummary::from(&account);
        assert_eq!(summary.full_name, "Sam Stage");
        assert_eq!(summary.email, "sam@example.com");
    }

    #[test]
    fn test_summary_falls_back_to_email() {
        let account = record(serde_json::json!({
            "id": "6f1c2a4e-8d3b-4f7a-9e21-0c5d7b8a9f10",
            "email": "sam@example.com",
            "user_metadata": {},
            "created_at": "2024-03-01T12:00:00Z"
        }));
        assert_eq!(UserSummary::from(&account).full_name, "sam@example.com");
    }

    #[test]
    fn test_summary_falls_back_to_unknown_user() {
        let account = record(serde_json::json!({
            "id": "6f1c2a4e-8d3b-4f7a-9e21-0c5d7b8a9f10",
            "email": null,
            "user_metadata": null,
            "created_at": "2024-03-01T12:00:00Z"
        }));
        let summary = UserSummary::from(&account);
        assert_eq!(summary.full_name, UNKNOWN_USER_NAME);
        assert_eq!(summary.email, "");
    }

    #[test]
    fn test_empty_strings_fall_through() {
        let account = record(serde_json::json!({
            "id": "6f1c2a4e-8d3b-4f7a-9e21-0c5d7b8a9f10",
            "email": "",
            "user_metadata": {"full_name": ""},
            "created_at": "2024-03-01T12:00:00Z"
        }));
        assert_eq!(account.display_name(), UNKNOWN_USER_NAME);
    }

    #[test]
    fn test_summary_json_shape() {
        let account = record(serde_json::json!({
            "id": "6f1c2a4e-8d3b-4f7a-9e21-0c5d7b8a9f10",
            "email": "sam@example.com",
            "created_at": "2024-03-01T12:00:00Z",
            "phone": "",
            "app_metadata": {"provider": "email"}
        }));
        let json = serde_json::to_value(UserSummary::from(&account)).unwrap();
        let keys: Vec<&str> = json.as_object().unwrap().keys().map(String::as_str).collect();
        assert_eq!(keys.len(), 4);
        for key in ["id", "email", "full_name", "created_at"] {
            assert!(keys.contains(&key), "missing {key}");
        }
    }

    #[test]
    fn test_identity_from_record() {
        let account = record(serde_json::json!({
            "id": "6f1c2a4e-8d3b-4f7a-9e21-0c5d7b8a9f10",
            "email": "",
            "user_metadata": {"full_name": "Sam Stage"},
            "created_at": "2024-03-01T12:00:00Z"
        }));
        let identity = UserIdentity::from(account);
        assert_eq!(identity.email, None);
        assert_eq!(identity.full_name.as_deref(), Some("Sam Stage"));
    }
}
