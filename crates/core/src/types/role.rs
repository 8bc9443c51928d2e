//! Role labels and the derived admin status.

use core::fmt;

use serde::{Deserialize, Serialize};

/// The only role label that grants admin status.
pub const ADMIN_ROLE: &str = "admin";

/// Free-form role label stored against an identity.
///
/// Labels are administered out-of-band and are not validated here. Only the
/// exact, case-sensitive value [`ADMIN_ROLE`] grants admin status.
///
/// ```
/// use prodboard_core::RoleLabel;
///
/// assert!(RoleLabel::new("admin").is_admin());
/// assert!(!RoleLabel::new("Admin").is_admin());
/// assert!(!RoleLabel::new("editor").is_admin());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
#[cfg_attr(feature = "postgres", derive(sqlx::Type))]
#[cfg_attr(feature = "postgres", sqlx(transparent))]
pub struct RoleLabel(String);

impl RoleLabel {
    /// Create a role label.
    #[must_use]
    pub fn new(label: impl Into<String>) -> Self {
        Self(label.into())
    }

    /// Returns the label as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Whether this label grants admin status.
    #[must_use]
    pub fn is_admin(&self) -> bool {
        self.0 == ADMIN_ROLE
    }
}

impl fmt::Display for RoleLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for RoleLabel {
    fn from(label: &str) -> Self {
        Self::new(label)
    }
}

impl From<String> for RoleLabel {
    fn from(label: String) -> Self {
        Self(label)
    }
}

/// Derived admin status for one identity.
///
/// Never persisted. `loading` is true only while a role lookup for the
/// current identity is in flight.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct AdminStatus {
    pub is_admin: bool,
    pub loading: bool,
}

impl AdminStatus {
    /// Settled status: not an admin.
    pub const NOT_ADMIN: Self = Self {
        is_admin: false,
        loading: false,
    };

    /// A lookup is in flight.
    pub const LOADING: Self = Self {
        is_admin: false,
        loading: true,
    };

    /// Settled status for a resolved role label.
    #[must_use]
    pub fn resolved(role: &RoleLabel) -> Self {
        Self {
            is_admin: role.is_admin(),
            loading: false,
        }
    }
}
