//! Request middleware: session layer and authentication extractors.

pub mod auth;
pub mod session;

pub use auth::{OptionalAuth, RequireAuth, clear_current_user, require, set_current_user};
pub use session::create_session_layer;
