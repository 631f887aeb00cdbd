//! Authentication service.
//!
//! Signup and login against any [`UserStore`]. Callers own the session;
//! this module only returns the authenticated record.

mod error;
pub mod password;

pub use error::{AuthError, ValidationError, message_for_code};

use herbal_glow_core::{Email, Username, UsernameError};

use crate::db::{RepositoryError, UserStore};
use crate::models::{NewUser, UserRecord};

use password::MIN_PASSWORD_LENGTH;

/// Raw signup form fields.
#[derive(Debug, Clone, Default)]
pub struct SignupInput {
    pub username: String,
    pub email: String,
    pub password: String,
    pub confirm_password: String,
}

/// Signup fields that passed validation.
#[derive(Debug, Clone)]
pub struct ValidSignup {
    pub username: Username,
    pub email: Email,
}

/// Validate signup fields in form order, stopping at the first failure.
///
/// Username and email are trimmed; passwords are taken as typed.
///
/// # Errors
///
/// Returns the first `ValidationError` encountered.
pub fn validate_signup(input: &SignupInput) -> Result<ValidSignup, ValidationError> {
    let username = input.username.trim();
    let email = input.email.trim();

    if username.is_empty()
        || email.is_empty()
        || input.password.is_empty()
        || input.confirm_password.is_empty()
    {
        return Err(ValidationError::MissingFields);
    }

    let username = Username::parse(username).map_err(|e| match e {
        UsernameError::TooLong { .. } => ValidationError::UsernameTooLong,
        UsernameError::Empty | UsernameError::TooShort { .. } => ValidationError::UsernameTooShort,
    })?;

    let email = Email::parse(email).map_err(|_| ValidationError::InvalidEmail)?;

    if input.password.chars().count() < MIN_PASSWORD_LENGTH {
        return Err(ValidationError::PasswordTooShort);
    }

    if input.password != input.confirm_password {
        return Err(ValidationError::PasswordMismatch);
    }

    Ok(ValidSignup { username, email })
}

/// Authentication service.
pub struct AuthService<'a, S> {
    users: &'a S,
}

impl<'a, S: UserStore> AuthService<'a, S> {
    /// Create a new authentication service.
    #[must_use]
    pub const fn new(users: &'a S) -> Self {
        Self { users }
    }

    /// Register a new user.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::Validation` if a field is invalid.
    /// Returns `AuthError::UserAlreadyExists` if the username or email is taken.
    /// Returns `AuthError::Repository` if the store fails.
    pub async fn signup(&self, input: &SignupInput) -> Result<UserRecord, AuthError> {
        let ValidSignup { username, email } = validate_signup(input)?;

        if self
            .users
            .find_by_username_or_email(&username, &email)
            .await?
            .is_some()
        {
            return Err(AuthError::UserAlreadyExists);
        }

        let password_hash = password::hash(&input.password).map_err(|e| {
            tracing::error!(error = %e, "Password hashing failed");
            AuthError::PasswordHash
        })?;

        // The store re-checks uniqueness; a racing signup lands here as Conflict
        let user = self
            .users
            .insert(NewUser {
                username,
                email,
                password_hash,
            })
            .await
            .map_err(|e| match e {
                RepositoryError::Conflict(_) => AuthError::UserAlreadyExists,
                other => AuthError::Repository(other),
            })?;

        tracing::info!(username = %user.username, "User signed up");
        Ok(user)
    }

    /// Log in with username and password.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::Validation` if either field is empty.
    /// Returns `AuthError::InvalidCredentials` if the user is unknown or the
    /// password is wrong.
    /// Returns `AuthError::Repository` if the store fails.
    pub async fn login(&self, username: &str, password: &str) -> Result<UserRecord, AuthError> {
        let username = username.trim();
        if username.is_empty() || password.is_empty() {
            return Err(ValidationError::MissingCredentials.into());
        }

        // A name that could never have signed up cannot match
        let Ok(username) = Username::parse(username) else {
            return Err(AuthError::InvalidCredentials);
        };

        let user = self
            .users
            .find_by_credentials(&username, password)
            .await?
            .ok_or(AuthError::InvalidCredentials)?;

        tracing::info!(username = %user.username, "User logged in");
        Ok(user)
    }
}
