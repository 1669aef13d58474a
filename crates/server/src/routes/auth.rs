//! Authentication route handlers.
//!
//! Login failure deliberately has one shape: the response for an unknown
//! username and a wrong password is byte-identical, so the endpoint cannot
//! be used to probe which accounts exist.

use axum::{
    Json,
    extract::State,
    http::StatusCode,
    response::{Html, IntoResponse},
};
use serde::Deserialize;
use tower_sessions::Session;

use crate::error::AppError;
use crate::middleware::{clear_current_user, set_current_user};
use crate::models::CurrentUser;
use crate::services::auth::AuthService;
use crate::state::AppState;

/// Login form data.
#[derive(Debug, Deserialize)]
pub struct LoginForm {
    pub username: String,
    pub password: String,
}

/// Display the login page.
///
/// The one presentation concern this server keeps: a minimal form whose
/// failure mode never reveals whether a username exists.
pub async fn login_page() -> Html<&'static str> {
    Html(
        r#"<h2>Sign in</h2>
<form action="/auth/login" method="post">
    <input type="text" name="username" placeholder="Username" required><br>
    <input type="password" name="password" placeholder="Password" required><br>
    <button type="submit">Sign in</button>
</form>
"#,
    )
}

/// Handle login form submission.
///
/// On success, binds the session to the user and returns the identity.
///
/// # Errors
///
/// Returns 401 with a fixed message for any credential failure.
pub async fn login(
    State(state): State<AppState>,
    session: Session,
    axum::Form(form): axum::Form<LoginForm>,
) -> Result<impl IntoResponse, AppError> {
    let user = AuthService::new(state.pool())
        .login(&form.username, &form.password)
        .await
        .map_err(|e| {
            tracing::warn!("login failed");
            AppError::from(e)
        })?;

    set_current_user(
        &session,
        &CurrentUser {
            id: user.id,
            username: user.username.clone(),
        },
    )
    .await
    .map_err(|e| AppError::Internal(format!("failed to write session: {e}")))?;

    tracing::info!(username = %user.username, "login");
    Ok(Json(user))
}

/// Handle logout.
///
/// Destroys the server-side session record; replaying the old cookie
/// afterwards resolves to nothing.
pub async fn logout(session: Session) -> Result<impl IntoResponse, AppError> {
    clear_current_user(&session)
        .await
        .map_err(|e| AppError::Internal(format!("failed to clear session: {e}")))?;

    Ok(StatusCode::NO_CONTENT)
}
