//! Stockroom Core - Shared types library.
//!
//! This crate provides common types used across all Stockroom components:
//! - `server` - The inventory HTTP backend
//! - `integration-tests` - Black-box HTTP tests
//!
//! # Architecture
//!
//! The core crate contains only types - no I/O, no database access, no HTTP
//! clients. This keeps it lightweight and allows it to be used anywhere.
//!
//! # Modules
//!
//! - [`types`] - Newtype wrappers for type-safe IDs, usernames, roles, and
//!   the role/capability authorization gate

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
