//! Business logic services.
//!
//! # Services
//!
//! - `admin_check` - Admin status for an identity, one-shot or tracked
//! - `accounts` - Safe projection of the privileged account listing

pub mod accounts;
pub mod admin_check;

pub use accounts::list_user_summaries;
pub use admin_check::{AdminStatusTracker, check_admin};
