//! Domain models for storefront.

pub mod session;
pub mod user;

pub use session::{CurrentUser, keys as session_keys};
pub use user::{NewUser, UserRecord};
