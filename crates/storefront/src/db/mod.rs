//! Credential store for storefront users.
//!
//! Auth logic is written against the [`UserStore`] trait only. Two kinds of
//! backend implement it:
//!
//! - [`users::PgUserStore`] - `PostgreSQL` table `users`
//! - [`kv::KvUserStore`] - an ordered JSON list kept under one key of a
//!   key-value store ([`kv::FileKeyValue`] on disk, [`kv::MemoryKeyValue`] in memory)
//!
//! [`UserBackend`] picks one at startup from configuration.
//!
//! # Migrations
//!
//! Migrations are stored in `crates/storefront/migrations/` and run via:
//! ```bash
//! cargo run -p herbal-glow-cli -- migrate
//! ```

pub mod kv;
pub mod users;

use std::future::Future;
use std::time::Duration;

use secrecy::{ExposeSecret, SecretString};
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;
use thiserror::Error;

use herbal_glow_core::{Email, Username};

use crate::config::StoreBackendConfig;
use crate::models::{NewUser, UserRecord};
use crate::services::auth::password;

use kv::{FileKeyValue, KvUserStore, MemoryKeyValue};
use users::PgUserStore;

/// Connection attempts before a database is reported unavailable.
const CONNECT_ATTEMPTS: u32 = 3;

/// Errors from credential store operations.
#[derive(Debug, Error)]
pub enum RepositoryError {
    /// Database error from sqlx.
    #[error("database error: {0}")]
    Database(sqlx::Error),

    /// Reading or writing the local store failed.
    #[error("store i/o error: {0}")]
    Io(#[from] std::io::Error),

    /// Stored document could not be (de)serialized.
    #[error("store serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Data in the store is corrupted or invalid.
    #[error("data corruption: {0}")]
    DataCorruption(String),

    /// Constraint violation (e.g., username or email already taken).
    #[error("constraint violation: {0}")]
    Conflict(String),

    /// The backend cannot be reached.
    #[error("store unavailable: {0}")]
    Unavailable(String),
}

impl From<sqlx::Error> for RepositoryError {
    fn from(e: sqlx::Error) -> Self {
        match e {
            sqlx::Error::Database(ref db_err) if db_err.is_unique_violation() => {
                Self::Conflict("username or email already exists".to_owned())
            }
            sqlx::Error::PoolTimedOut
            | sqlx::Error::PoolClosed
            | sqlx::Error::Io(_)
            | sqlx::Error::Tls(_) => Self::Unavailable(e.to_string()),
            other => Self::Database(other),
        }
    }
}

/// Persistence contract for user records.
///
/// Implementations must keep username and email unique: [`insert`] checks
/// and writes atomically.
///
/// [`insert`]: UserStore::insert
pub trait UserStore: Send + Sync {
    /// Find a user whose username or email matches either argument.
    fn find_by_username_or_email(
        &self,
        username: &Username,
        email: &Email,
    ) -> impl Future<Output = Result<Option<UserRecord>, RepositoryError>> + Send;

    /// Find a user by exact username.
    fn find_by_username(
        &self,
        username: &Username,
    ) -> impl Future<Output = Result<Option<UserRecord>, RepositoryError>> + Send;

    /// Insert a new user.
    ///
    /// Returns `RepositoryError::Conflict` if the username or email is taken.
    fn insert(
        &self,
        user: NewUser,
    ) -> impl Future<Output = Result<UserRecord, RepositoryError>> + Send;

    /// All users, oldest first.
    fn list(&self) -> impl Future<Output = Result<Vec<UserRecord>, RepositoryError>> + Send;

    /// Check that the backend is reachable.
    fn ping(&self) -> impl Future<Output = Result<(), RepositoryError>> + Send;

    /// Find a user by username and verify their password.
    ///
    /// Returns `None` for an unknown user or a wrong password.
    fn find_by_credentials(
        &self,
        username: &Username,
        password: &str,
    ) -> impl Future<Output = Result<Option<UserRecord>, RepositoryError>> + Send {
        async move {
            let Some(user) = self.find_by_username(username).await? else {
                return Ok(None);
            };
            Ok(password::verify(password, &user.password_hash).then_some(user))
        }
    }
}

/// The configured credential store.
#[derive(Clone)]
pub enum UserBackend {
    Postgres(PgUserStore),
    File(KvUserStore<FileKeyValue>),
    Memory(KvUserStore<MemoryKeyValue>),
}

impl UserBackend {
    /// Open the backend described by configuration.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Unavailable` if `PostgreSQL` cannot be reached
    /// after retrying, or `RepositoryError::Io` if the users file cannot be
    /// opened.
    pub async fn open(config: &StoreBackendConfig) -> Result<Self, RepositoryError> {
        match config {
            StoreBackendConfig::Memory => Ok(Self::memory()),
            StoreBackendConfig::File { path } => {
                let kv = FileKeyValue::open(path).await?;
                Ok(Self::File(KvUserStore::new(kv)))
            }
            StoreBackendConfig::Postgres { database_url } => {
                let pool = create_pool(database_url).await?;
                Ok(Self::Postgres(PgUserStore::new(pool)))
            }
        }
    }

    /// An empty in-memory backend.
    #[must_use]
    pub fn memory() -> Self {
        Self::Memory(KvUserStore::new(MemoryKeyValue::default()))
    }

    /// The `PostgreSQL` pool, when that backend is in use.
    #[must_use]
    pub const fn pool(&self) -> Option<&PgPool> {
        match self {
            Self::Postgres(store) => Some(store.pool()),
            Self::File(_) | Self::Memory(_) => None,
        }
    }
}

impl UserStore for UserBackend {
    async fn find_by_username_or_email(
        &self,
        username: &Username,
        email: &Email,
    ) -> Result<Option<UserRecord>, RepositoryError> {
        match self {
            Self::Postgres(s) => s.find_by_username_or_email(username, email).await,
            Self::File(s) => s.find_by_username_or_email(username, email).await,
            Self::Memory(s) => s.find_by_username_or_email(username, email).await,
        }
    }

    async fn find_by_username(
        &self,
        username: &Username,
    ) -> Result<Option<UserRecord>, RepositoryError> {
        match self {
            Self::Postgres(s) => s.find_by_username(username).await,
            Self::File(s) => s.find_by_username(username).await,
            Self::Memory(s) => s.find_by_username(username).await,
        }
    }

    async fn insert(&self, user: NewUser) -> Result<UserRecord, RepositoryError> {
        match self {
            Self::Postgres(s) => s.insert(user).await,
            Self::File(s) => s.insert(user).await,
            Self::Memory(s) => s.insert(user).await,
        }
    }

    async fn list(&self) -> Result<Vec<UserRecord>, RepositoryError> {
        match self {
            Self::Postgres(s) => s.list().await,
            Self::File(s) => s.list().await,
            Self::Memory(s) => s.list().await,
        }
    }

    async fn ping(&self) -> Result<(), RepositoryError> {
        match self {
            Self::Postgres(s) => s.ping().await,
            Self::File(s) => s.ping().await,
            Self::Memory(s) => s.ping().await,
        }
    }
}

/// Create a `PostgreSQL` connection pool with sensible defaults.
///
/// Transient connection failures are retried with exponential backoff
/// (1s, 2s) before giving up.
///
/// # Arguments
///
/// * `database_url` - `PostgreSQL` connection string (wrapped in `SecretString`)
///
/// # Errors
///
/// Returns `RepositoryError::Unavailable` if no connection could be
/// established, or `RepositoryError::Database` for non-transient failures
/// such as bad credentials.
pub async fn create_pool(database_url: &SecretString) -> Result<PgPool, RepositoryError> {
    let mut attempt = 1;
    loop {
        let result = PgPoolOptions::new()
            .max_connections(10)
            .min_connections(1)
            .acquire_timeout(Duration::from_secs(10))
            .connect(database_url.expose_secret())
            .await
            .map_err(RepositoryError::from);

        match result {
            Ok(pool) => return Ok(pool),
            Err(RepositoryError::Unavailable(reason)) if attempt < CONNECT_ATTEMPTS => {
                let backoff = Duration::from_secs(2u64.pow(attempt - 1));
                tracing::warn!(
                    attempt,
                    reason = %reason,
                    "Database unreachable, retrying in {}s",
                    backoff.as_secs()
                );
                tokio::time::sleep(backoff).await;
                attempt += 1;
            }
            Err(RepositoryError::Unavailable(reason)) => {
                return Err(RepositoryError::Unavailable(format!(
                    "gave up after {CONNECT_ATTEMPTS} attempts: {reason}"
                )));
            }
            Err(other) => return Err(other),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pool_errors_classify_as_unavailable() {
        assert!(matches!(
            RepositoryError::from(sqlx::Error::PoolTimedOut),
            RepositoryError::Unavailable(_)
        ));
        let io = std::io::Error::new(std::io::ErrorKind::ConnectionRefused, "refused");
        assert!(matches!(
            RepositoryError::from(sqlx::Error::Io(io)),
            RepositoryError::Unavailable(_)
        ));
    }

    #[test]
    fn test_other_sqlx_errors_stay_database() {
        assert!(matches!(
            RepositoryError::from(sqlx::Error::RowNotFound),
            RepositoryError::Database(_)
        ));
    }
}
