//! Business-logic services.

pub mod auth;
