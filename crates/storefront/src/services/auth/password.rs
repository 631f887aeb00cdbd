//! Password hashing with Argon2id.

use argon2::{
    Argon2,
    password_hash::{
        self, PasswordHash, PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng,
    },
};

/// Minimum password length in characters.
pub const MIN_PASSWORD_LENGTH: usize = 6;

/// Hash a password using Argon2id with a random salt.
///
/// # Errors
///
/// Returns `password_hash::Error` if hashing fails.
pub fn hash(password: &str) -> Result<String, password_hash::Error> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
}

/// Verify a password against a stored PHC hash string.
///
/// An unparseable hash never verifies.
#[must_use]
pub fn verify(password: &str, hash: &str) -> bool {
    let Ok(parsed_hash) = PasswordHash::new(hash) else {
        tracing::warn!("Stored password hash is not a valid PHC string");
        return false;
    };
    Argon2::default()
        .verify_password(password.as_bytes(), &parsed_hash)
        .is_ok()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_then_verify() {
        let hashed = hash("lavender").unwrap();
        assert!(hashed.starts_with("$argon2id$"));
        assert!(verify("lavender", &hashed));
        assert!(!verify("Lavender", &hashed));
    }

    #[test]
    fn test_hash_is_salted() {
        assert_ne!(hash("lavender").unwrap(), hash("lavender").unwrap());
    }

    #[test]
    fn test_plaintext_never_verifies() {
        assert!(!verify("lavender", "lavender"));
    }
}
