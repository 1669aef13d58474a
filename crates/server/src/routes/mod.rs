//! HTTP route handlers.
//!
//! # Route Structure
//!
//! ```text
//! GET  /health                 - Liveness check
//! GET  /health/ready           - Readiness check (verifies database)
//!
//! # Auth
//! GET  /auth/login             - Login form
//! POST /auth/login             - Login action (form fields: username, password)
//! POST /auth/logout            - Logout action
//!
//! # Users
//! POST /users                  - Register (role=admin needs an admin caller,
//!                                or an empty user table on first run)
//! GET  /users                  - List users (admin)
//! PUT  /users/{id}             - Sparse update (admin)
//! DELETE /users/{id}           - Delete user (admin, not audit-logged)
//!
//! # Products
//! GET  /products               - Product listing (public)
//! POST /products               - Create product (admin)
//! PUT  /products/{id}          - Sparse update (admin)
//! DELETE /products/{id}        - Delete product (admin; commits an audit
//!                                record in the same transaction)
//! GET  /products/{id}/owner    - Owner info for a product (public)
//!
//! # Audit
//! GET  /audit/history          - Deletion history, newest first (admin)
//!
//! # Stats
//! GET  /stats/user-products    - Per-user inventory statistics (admin)
//! GET  /stats/general          - System-wide statistics (admin)
//! ```

pub mod audit;
pub mod auth;
pub mod products;
pub mod stats;
pub mod users;

use axum::{
    Router,
    routing::{get, post, put},
};

use crate::state::AppState;

/// Create the auth routes router.
pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/login", get(auth::login_page).post(auth::login))
        .route("/logout", post(auth::logout))
}

/// Create the user routes router.
pub fn user_routes() -> Router<AppState> {
    Router::new()
        .route("/", post(users::create).get(users::list))
        .route("/{id}", put(users::update).delete(users::delete))
}

/// Create the product routes router.
pub fn product_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(products::list).post(products::create))
        .route("/{id}", put(products::update).delete(products::delete))
        .route("/{id}/owner", get(products::owner))
}

/// Create the audit routes router.
pub fn audit_routes() -> Router<AppState> {
    Router::new().route("/history", get(audit::history))
}

/// Create the stats routes router.
pub fn stats_routes() -> Router<AppState> {
    Router::new()
        .route("/user-products", get(stats::user_products))
        .route("/general", get(stats::general))
}

/// Compose all application routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .nest("/auth", auth_routes())
        .nest("/users", user_routes())
        .nest("/products", product_routes())
        .nest("/audit", audit_routes())
        .nest("/stats", stats_routes())
}
