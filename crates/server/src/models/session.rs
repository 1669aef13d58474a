//! Session-related types.
//!
//! The session stores only a pointer to the identity, never the identity
//! itself: role and username are re-read from the database on every request
//! so that user edits and deletions take effect immediately.

use serde::{Deserialize, Serialize};

use stockroom_core::{UserId, Username};

/// Session-stored reference to the logged-in user.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CurrentUser {
    /// User's database ID - the lookup key for resolution.
    pub id: UserId,
    /// Username at login time, for log context only; the authoritative
    /// value comes from the per-request database read.
    pub username: Username,
}

/// Session keys for authentication data.
pub mod keys {
    /// Key for storing the current logged-in user.
    pub const CURRENT_USER: &str = "current_user";
}
