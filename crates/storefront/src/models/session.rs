//! Session-related types.
//!
//! Types stored in the session for authentication state.

use serde::{Deserialize, Serialize};

use herbal_glow_core::Username;

/// Session-stored user identity.
///
/// Minimal data stored in the session to identify the logged-in user.
/// Handlers receive it through the `RequireAuth` / `OptionalAuth` extractors.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CurrentUser {
    /// Username of the logged-in user.
    pub username: Username,
}

/// Session keys for authentication data.
pub mod keys {
    /// Key for storing the current logged-in user.
    pub const CURRENT_USER: &str = "current_user";
}
