//! Roles, capabilities, and the authorization gate.
//!
//! A [`Role`] is a closed enumeration: unknown values are rejected at the
//! boundary instead of being silently treated as a non-admin. The gate
//! itself is [`Role::allows`] - a pure function of (role, capability) that
//! performs no I/O and cannot fail except by answering "no".

use core::fmt;

use serde::{Deserialize, Serialize};

/// Errors that can occur when parsing a [`Role`].
#[derive(thiserror::Error, Debug, Clone)]
pub enum RoleError {
    /// The input is not a known role name.
    #[error("unknown role {0:?}, expected \"admin\" or \"client\"")]
    Unknown(String),
}

/// The trust class of an identity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// Full catalog and user management access.
    Admin,
    /// Read-only access to the public catalog.
    Client,
}

/// A named permission granted wholesale to a role.
///
/// There is no per-resource or owner-based refinement: a role either holds
/// a capability for the whole system or not at all.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Capability {
    /// Create, update, delete, and list user accounts.
    ManageUsers,
    /// Create, update, and delete catalog products.
    ManageProducts,
    /// Read the append-only audit trail.
    ViewAudit,
    /// Read inventory statistics.
    ViewStats,
}

impl Capability {
    /// All capabilities, for exhaustive policy tests.
    pub const ALL: [Self; 4] = [
        Self::ManageUsers,
        Self::ManageProducts,
        Self::ViewAudit,
        Self::ViewStats,
    ];
}

impl Role {
    /// Parse a `Role` from its wire representation.
    ///
    /// # Errors
    ///
    /// Returns [`RoleError::Unknown`] for anything other than `"admin"` or
    /// `"client"` - case-sensitive, matching the stored form.
    pub fn parse(s: &str) -> Result<Self, RoleError> {
        match s {
            "admin" => Ok(Self::Admin),
            "client" => Ok(Self::Client),
            other => Err(RoleError::Unknown(other.to_owned())),
        }
    }

    /// The wire/storage representation of the role.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Admin => "admin",
            Self::Client => "client",
        }
    }

    /// The authorization gate: does this role hold `capability`?
    ///
    /// `Admin` holds every capability; `Client` holds none of them.
    #[must_use]
    pub const fn allows(self, capability: Capability) -> bool {
        match self {
            Self::Admin => {
                // All four capabilities are admin-only today; the match is
                // kept exhaustive so a new capability forces a decision here.
                match capability {
                    Capability::ManageUsers
                    | Capability::ManageProducts
                    | Capability::ViewAudit
                    | Capability::ViewStats => true,
                }
            }
            Self::Client => false,
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Role {
    type Err = RoleError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}
