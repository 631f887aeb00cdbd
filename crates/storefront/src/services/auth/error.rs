//! Authentication error types.

use thiserror::Error;

use crate::db::RepositoryError;

/// Shown when a signup reuses a username or email.
const USER_EXISTS_MESSAGE: &str = "Username or email already exists!";

/// Shown when login fails for any reason the user can fix.
const INVALID_CREDENTIALS_MESSAGE: &str = "Invalid username or password!";

/// Client-correctable problems with a submitted form.
///
/// The `Display` text is the message shown to the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// A signup field was left empty.
    #[error("All fields are required!")]
    MissingFields,
    /// Username shorter than the minimum.
    #[error("Username must be at least 3 characters long!")]
    UsernameTooShort,
    /// Username longer than the maximum.
    #[error("Username must be at most 50 characters long!")]
    UsernameTooLong,
    /// Email not shaped like `local@domain.tld`.
    #[error("Please enter a valid email address!")]
    InvalidEmail,
    /// Password shorter than the minimum.
    #[error("Password must be at least 6 characters long!")]
    PasswordTooShort,
    /// Password and confirmation differ.
    #[error("Passwords do not match!")]
    PasswordMismatch,
    /// A login field was left empty.
    #[error("Please enter both username and password!")]
    MissingCredentials,
}

impl ValidationError {
    /// Every variant.
    pub const ALL: [Self; 7] = [
        Self::MissingFields,
        Self::UsernameTooShort,
        Self::UsernameTooLong,
        Self::InvalidEmail,
        Self::PasswordTooShort,
        Self::PasswordMismatch,
        Self::MissingCredentials,
    ];

    /// Stable code carried in redirect query strings.
    #[must_use]
    pub const fn code(self) -> &'static str {
        match self {
            Self::MissingFields => "missing_fields",
            Self::UsernameTooShort => "username_too_short",
            Self::UsernameTooLong => "username_too_long",
            Self::InvalidEmail => "invalid_email",
            Self::PasswordTooShort => "password_too_short",
            Self::PasswordMismatch => "password_mismatch",
            Self::MissingCredentials => "missing_credentials",
        }
    }

    /// Reverse of [`Self::code`].
    #[must_use]
    pub fn from_code(code: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|v| v.code() == code)
    }
}

/// Errors that can occur during authentication operations.
#[derive(Debug, Error)]
pub enum AuthError {
    /// Submitted form failed validation.
    #[error("validation failed: {0}")]
    Validation(#[from] ValidationError),

    /// Username or email already taken.
    #[error("user already exists")]
    UserAlreadyExists,

    /// Unknown username or wrong password.
    #[error("invalid credentials")]
    InvalidCredentials,

    /// Repository/database error.
    #[error("store error: {0}")]
    Repository(#[from] RepositoryError),

    /// Password hashing error.
    #[error("password hashing error")]
    PasswordHash,
}

impl AuthError {
    /// Redirect code for errors the user can fix, `None` for server faults.
    #[must_use]
    pub const fn code(&self) -> Option<&'static str> {
        match self {
            Self::Validation(v) => Some(v.code()),
            Self::UserAlreadyExists => Some("user_exists"),
            Self::InvalidCredentials => Some("invalid_credentials"),
            Self::Repository(_) | Self::PasswordHash => None,
        }
    }
}

/// User-facing message for a redirect code produced by [`AuthError::code`].
#[must_use]
pub fn message_for_code(code: &str) -> Option<String> {
    if let Some(v) = ValidationError::from_code(code) {
        return Some(v.to_string());
    }
    match code {
        "user_exists" => Some(USER_EXISTS_MESSAGE.to_owned()),
        "invalid_credentials" => Some(INVALID_CREDENTIALS_MESSAGE.to_owned()),
        _ => None,
    }
}
