//! Domain models.

pub mod audit;
pub mod product;
pub mod session;
pub mod user;

pub use audit::{AuditAction, AuditRecord};
pub use product::Product;
pub use session::{CurrentUser, keys as session_keys};
pub use user::User;
