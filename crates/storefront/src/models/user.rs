//! User domain types.
//!
//! These types represent validated domain objects separate from storage row types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use herbal_glow_core::{Email, Username};

/// A stored user (domain type).
///
/// Username and email are each unique across the credential store.
/// Records are created on signup and never updated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserRecord {
    /// Login name.
    pub username: Username,
    /// Contact email address.
    pub email: Email,
    /// Argon2 PHC string. Never the plaintext password.
    pub password_hash: String,
    /// When the user signed up.
    pub created_at: DateTime<Utc>,
}

/// A user about to be inserted.
///
/// The store assigns `created_at`.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub username: Username,
    pub email: Email,
    pub password_hash: String,
}

impl NewUser {
    /// Stamp the record with its creation time.
    #[must_use]
    pub fn into_record(self, created_at: DateTime<Utc>) -> UserRecord {
        UserRecord {
            username: self.username,
            email: self.email,
            password_hash: self.password_hash,
            created_at,
        }
    }
}
