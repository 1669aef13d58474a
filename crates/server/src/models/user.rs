//! User account model.

use chrono::{DateTime, Utc};
use serde::Serialize;

use stockroom_core::{Role, UserId, Username};

/// A registered identity.
///
/// The password hash is deliberately not part of this struct: it lives only
/// in the repository layer and is never serialized or logged. Handlers that
/// need to verify a password go through the auth service instead.
#[derive(Debug, Clone, Serialize)]
pub struct User {
    /// Server-assigned, immutable ID.
    pub id: UserId,
    /// Unique, case-sensitive account name.
    pub username: Username,
    /// Trust class, `admin` or `client`.
    pub role: Role,
    /// Creation timestamp (UTC).
    pub created_at: DateTime<Utc>,
}
