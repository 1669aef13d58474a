//! User management route handlers.
//!
//! Registration is public and yields a `client`. Everything else - listing,
//! sparse updates, deletion - is gated on `ManageUsers`. User deletion is a
//! privileged action but deliberately not audit-logged; only catalog
//! destruction feeds the audit trail.

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
};
use serde::Deserialize;
use serde_json::json;

use stockroom_core::{Capability, Role, UserId, Username};

use crate::db::users::{UserPatch, UserRepository};
use crate::error::AppError;
use crate::middleware::{OptionalAuth, RequireAuth, require};
use crate::services::auth::{self, AuthService};
use crate::state::AppState;

/// Registration request body.
#[derive(Debug, Deserialize)]
pub struct CreateUserRequest {
    pub username: String,
    pub password: String,
    /// Defaults to `client`. Requesting `admin` requires an admin caller,
    /// except when no user exists yet (first-run bootstrap).
    pub role: Option<Role>,
}

/// Sparse user update body; absent fields keep their stored values.
#[derive(Debug, Deserialize)]
pub struct UpdateUserRequest {
    pub username: Option<String>,
    pub role: Option<Role>,
    pub password: Option<String>,
}

/// `POST /users` - register a new user.
pub async fn create(
    State(state): State<AppState>,
    OptionalAuth(actor): OptionalAuth,
    Json(req): Json<CreateUserRequest>,
) -> Result<impl IntoResponse, AppError> {
    let role = req.role.unwrap_or(Role::Client);
    let service = AuthService::new(state.pool());

    let caller_is_admin = actor.as_ref().is_some_and(|u| u.role == Role::Admin);

    let user = if role == Role::Admin && !caller_is_admin {
        // First-run bootstrap: the admin claim stands only if the insert
        // itself observes an empty user table, so two racing registrations
        // cannot both be minted as admins
        service
            .register_first_admin(&req.username, &req.password)
            .await?
            .ok_or_else(|| {
                AppError::Forbidden(
                    "only an administrator can create an administrator".to_string(),
                )
            })?
    } else {
        service.register(&req.username, &req.password, role).await?
    };

    tracing::info!(username = %user.username, role = %user.role, "user created");
    Ok((StatusCode::CREATED, Json(user)))
}

/// `GET /users` - list all users.
pub async fn list(
    State(state): State<AppState>,
    RequireAuth(actor): RequireAuth,
) -> Result<impl IntoResponse, AppError> {
    require(&actor, Capability::ManageUsers)?;

    let users = UserRepository::new(state.pool()).list().await?;
    Ok(Json(users))
}

/// `PUT /users/{id}` - sparse update of username, role, and/or password.
pub async fn update(
    State(state): State<AppState>,
    RequireAuth(actor): RequireAuth,
    Path(id): Path<i64>,
    Json(req): Json<UpdateUserRequest>,
) -> Result<impl IntoResponse, AppError> {
    require(&actor, Capability::ManageUsers)?;

    let username = req
        .username
        .as_deref()
        .map(Username::parse)
        .transpose()
        .map_err(|e| AppError::InvalidInput(e.to_string()))?;

    let password_hash = match req.password.as_deref() {
        Some(password) => {
            auth::validate_password(password)?;
            Some(auth::hash_password(password)?)
        }
        None => None,
    };

    let user = UserRepository::new(state.pool())
        .update(
            UserId::new(id),
            UserPatch {
                username,
                role: req.role,
                password_hash,
            },
        )
        .await?;

    tracing::info!(user_id = %user.id, performed_by = %actor.username, "user updated");
    Ok(Json(user))
}

/// `DELETE /users/{id}` - delete a user.
pub async fn delete(
    State(state): State<AppState>,
    RequireAuth(actor): RequireAuth,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, AppError> {
    require(&actor, Capability::ManageUsers)?;

    let user = UserRepository::new(state.pool())
        .delete(UserId::new(id))
        .await?
        .ok_or_else(|| AppError::NotFound(format!("user {id} not found")))?;

    tracing::info!(username = %user.username, performed_by = %actor.username, "user deleted");
    Ok(Json(
        json!({ "message": format!("User '{}' deleted", user.username) }),
    ))
}
