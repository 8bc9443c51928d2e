//! Newtype ID for identities issued by the external auth service.
//!
//! Identities are opaque UUIDs. Wrapping them keeps role lookups from being
//! keyed by an arbitrary string by accident.

use core::fmt;
use core::str::FromStr;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Errors that can occur when parsing a [`UserId`].
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum UserIdError {
    /// The input string is empty.
    #[error("user id cannot be empty")]
    Empty,
    /// The input is not a UUID.
    #[error("user id must be a UUID: {0}")]
    Invalid(String),
}

/// Identifier of an authenticated end user.
///
/// ```
/// use prodboard_core::UserId;
///
/// let id: UserId = "6f1c2a4e-8d3b-4f7a-9e21-0c5d7b8a9f10".parse().unwrap();
/// assert_eq!(id.to_string(), "6f1c2a4e-8d3b-4f7a-9e21-0c5d7b8a9f10");
///
/// assert!("".parse::<UserId>().is_err());
/// assert!("not-a-uuid".parse::<UserId>().is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
#[cfg_attr(feature = "postgres", derive(sqlx::Type))]
#[cfg_attr(feature = "postgres", sqlx(transparent))]
pub struct UserId(Uuid);

impl UserId {
    /// Wrap an existing UUID.
    #[must_use]
    pub const fn new(id: Uuid) -> Self {
        Self(id)
    }

    /// Get the underlying UUID.
    #[must_use]
    pub const fn as_uuid(&self) -> &Uuid {
        &self.0
    }

    /// Parse a `UserId` from a string.
    ///
    /// # Errors
    ///
    /// Returns an error if the input is empty or not a UUID.
    pub fn parse(s: &str) -> Result<Self, UserIdError> {
        if s.is_empty() {
            return Err(UserIdError::Empty);
        }
        Uuid::parse_str(s)
            .map(Self)
            .map_err(|e| UserIdError::Invalid(e.to_string()))
    }
}

impl FromStr for UserId {
    type Err = UserIdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<Uuid> for UserId {
    fn from(id: Uuid) -> Self {
        Self(id)
    }
}

impl From<UserId> for Uuid {
    fn from(id: UserId) -> Self {
        id.0
    }
}
