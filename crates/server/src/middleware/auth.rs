//! Authentication middleware and extractors.
//!
//! [`RequireAuth`] resolves the session to an identity by re-reading the
//! user row on every request. Nothing about the identity is trusted from
//! the session itself: a deleted user's live session stops resolving
//! immediately, and role or username changes take effect on the very next
//! request.

use axum::{extract::FromRequestParts, http::request::Parts};
use tower_sessions::Session;

use stockroom_core::Capability;

use crate::db::users::UserRepository;
use crate::error::AppError;
use crate::models::{CurrentUser, User, session_keys};
use crate::state::AppState;

/// Extractor that requires an authenticated user.
///
/// Yields the *current* identity from the database, not the login-time
/// snapshot. Rejects with 401 when there is no session, the session holds
/// no user, or the referenced user no longer exists.
///
/// # Example
///
/// ```rust,ignore
/// async fn protected_handler(
///     RequireAuth(user): RequireAuth,
/// ) -> impl IntoResponse {
///     format!("Hello, {}!", user.username)
/// }
/// ```
pub struct RequireAuth(pub User);

impl FromRequestParts<AppState> for RequireAuth {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        // Get the session from extensions (set by SessionManagerLayer)
        let session = parts
            .extensions
            .get::<Session>()
            .ok_or_else(|| AppError::Unauthenticated("no session".to_string()))?;

        let current: CurrentUser = session
            .get(session_keys::CURRENT_USER)
            .await
            .ok()
            .flatten()
            .ok_or_else(|| AppError::Unauthenticated("not logged in".to_string()))?;

        // Fresh read: the session may outlive the identity it points at
        let user = UserRepository::new(state.pool())
            .get_by_id(current.id)
            .await?
            .ok_or_else(|| {
                tracing::warn!(user_id = %current.id, "session references deleted user");
                AppError::Unauthenticated("not logged in".to_string())
            })?;

        Ok(Self(user))
    }
}

/// Extractor that optionally resolves the current user.
///
/// Unlike `RequireAuth`, this does not reject the request when nobody is
/// logged in; anonymous requests yield `None`. A session pointing at a
/// deleted user also yields `None`.
pub struct OptionalAuth(pub Option<User>);

impl FromRequestParts<AppState> for OptionalAuth {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let Some(session) = parts.extensions.get::<Session>() else {
            return Ok(Self(None));
        };

        let Some(current) = session
            .get::<CurrentUser>(session_keys::CURRENT_USER)
            .await
            .ok()
            .flatten()
        else {
            return Ok(Self(None));
        };

        let user = UserRepository::new(state.pool())
            .get_by_id(current.id)
            .await?;

        Ok(Self(user))
    }
}

/// The authorization gate at the request boundary.
///
/// Call after `RequireAuth`, never instead of it: unauthenticated requests
/// must already have been rejected with 401 before a capability check can
/// answer 403.
///
/// # Errors
///
/// Returns `AppError::Forbidden` when the user's role does not hold the
/// capability.
pub fn require(user: &User, capability: Capability) -> Result<(), AppError> {
    if user.role.allows(capability) {
        Ok(())
    } else {
        tracing::warn!(
            username = %user.username,
            role = %user.role,
            ?capability,
            "capability denied"
        );
        Err(AppError::Forbidden(
            "administrator privileges required".to_string(),
        ))
    }
}

/// Helper to set the current user in the session (login).
///
/// # Errors
///
/// Returns an error if the session cannot be modified.
pub async fn set_current_user(
    session: &Session,
    user: &CurrentUser,
) -> Result<(), tower_sessions::session::Error> {
    session.insert(session_keys::CURRENT_USER, user).await
}

/// Helper to clear the session entirely (logout).
///
/// Deletes the server-side session record, so the client-held cookie stops
/// resolving even if it is replayed.
///
/// # Errors
///
/// Returns an error if the session cannot be modified.
pub async fn clear_current_user(session: &Session) -> Result<(), tower_sessions::session::Error> {
    session.flush().await
}
