//! Prodboard Core - Shared types library.
//!
//! This crate provides the types and pure functions used by the Prodboard
//! server:
//! - `web` - HTTP API (admin checks, user listing)
//! - `integration-tests` - Router and client tests
//!
//! # Architecture
//!
//! The core crate contains only types and pure functions - no I/O, no
//! database access, no HTTP clients. This keeps it lightweight and allows it
//! to be used anywhere.
//!
//! # Modules
//!
//! - [`types`] - Identity, role and account types
//! - [`color`] - Hex color parsing and derived badge/background styles

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod color;
pub mod types;

pub use color::{BadgeStyle, Rgb};
pub use types::*;
