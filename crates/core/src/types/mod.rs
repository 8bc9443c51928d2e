//! Core types for Prodboard.
//!
//! This module provides type-safe wrappers for identities, role labels and
//! the account projections returned by the user listing.

pub mod account;
pub mod id;
pub mod role;

pub use account::{AccountRecord, UNKNOWN_USER_NAME, UserIdentity, UserMetadata, UserSummary};
pub use id::{UserId, UserIdError};
pub use role::{ADMIN_ROLE, AdminStatus, RoleLabel};
