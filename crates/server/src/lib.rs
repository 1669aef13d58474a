//! Stockroom server library.
//!
//! # Architecture
//!
//! - Axum handlers over a `SQLite` pool (sqlx)
//! - tower-sessions for opaque, server-side session tokens
//! - Argon2id password hashing
//!
//! The trust boundary runs through three layers on every sensitive request:
//! the session resolver ([`middleware::RequireAuth`], a fresh database read
//! per request), the role/capability gate ([`middleware::require`]), and -
//! for destructive mutations - the transactional audit append in the
//! repository layer.
//!
//! The binary lives in `main.rs`; this library exists so integration tests
//! can build the exact production router against their own database.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod config;
pub mod db;
pub mod error;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod services;
pub mod state;

use axum::extract::State;
use axum::http::StatusCode;
use axum::{Router, routing::get};
use tower_http::trace::TraceLayer;

pub use config::ServerConfig;
pub use state::AppState;

/// Build the application router, session layer included.
///
/// # Errors
///
/// Returns `sqlx::Error` if the session store cannot create its table.
pub async fn app(state: AppState) -> Result<Router, sqlx::Error> {
    let session_layer = middleware::create_session_layer(state.pool()).await?;

    Ok(Router::new()
        .route("/health", get(health))
        .route("/health/ready", get(readiness))
        .merge(routes::routes())
        .layer(session_layer)
        .layer(TraceLayer::new_for_http())
        .with_state(state))
}

/// Liveness health check endpoint.
///
/// Returns "ok" if the server is running. Does not check dependencies.
async fn health() -> &'static str {
    "ok"
}

/// Readiness health check endpoint.
///
/// Verifies database connectivity before returning OK.
/// Returns 503 Service Unavailable if the database is not reachable.
async fn readiness(State(state): State<AppState>) -> StatusCode {
    match sqlx::query("SELECT 1").fetch_one(state.pool()).await {
        Ok(_) => StatusCode::OK,
        Err(_) => StatusCode::SERVICE_UNAVAILABLE,
    }
}
