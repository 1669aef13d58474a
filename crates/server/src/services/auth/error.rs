//! Authentication service errors.

use thiserror::Error;

use stockroom_core::UsernameError;

use crate::db::RepositoryError;

/// Errors produced by the authentication service.
#[derive(Debug, Error)]
pub enum AuthError {
    /// Unknown username or wrong password - deliberately one variant, so no
    /// caller can distinguish the two causes.
    #[error("invalid username or password")]
    InvalidCredentials,

    /// The username is already registered.
    #[error("username already exists")]
    UserAlreadyExists,

    /// The username failed validation.
    #[error("invalid username: {0}")]
    InvalidUsername(#[from] UsernameError),

    /// The password doesn't meet requirements.
    #[error("weak password: {0}")]
    WeakPassword(String),

    /// Password hashing failed.
    #[error("password hashing failed")]
    PasswordHash,

    /// Database operation failed.
    #[error("repository error: {0}")]
    Repository(#[from] RepositoryError),
}
