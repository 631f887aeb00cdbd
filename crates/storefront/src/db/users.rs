//! `PostgreSQL` user repository.
//!
//! Queries go through `sqlx::query_as` against the `users` table created by
//! `migrations/20261014000001_create_users.sql`.

use chrono::{DateTime, Utc};
use sqlx::PgPool;

use herbal_glow_core::{Email, Username};

use super::{RepositoryError, UserStore};
use crate::models::{NewUser, UserRecord};

/// Raw `users` row.
#[derive(sqlx::FromRow)]
struct UserRow {
    username: String,
    email: String,
    password_hash: String,
    created_at: DateTime<Utc>,
}

impl TryFrom<UserRow> for UserRecord {
    type Error = RepositoryError;

    fn try_from(row: UserRow) -> Result<Self, Self::Error> {
        let username = Username::parse(&row.username).map_err(|e| {
            RepositoryError::DataCorruption(format!("invalid username in database: {e}"))
        })?;
        let email = Email::parse(&row.email).map_err(|e| {
            RepositoryError::DataCorruption(format!("invalid email in database: {e}"))
        })?;

        Ok(Self {
            username,
            email,
            password_hash: row.password_hash,
            created_at: row.created_at,
        })
    }
}

/// Repository for user database operations.
#[derive(Clone)]
pub struct PgUserStore {
    pool: PgPool,
}

impl PgUserStore {
    /// Create a new user repository.
    #[must_use]
    pub const fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// The underlying connection pool.
    #[must_use]
    pub const fn pool(&self) -> &PgPool {
        &self.pool
    }
}

impl UserStore for PgUserStore {
    async fn find_by_username_or_email(
        &self,
        username: &Username,
        email: &Email,
    ) -> Result<Option<UserRecord>, RepositoryError> {
        let row = sqlx::query_as::<_, UserRow>(
            r"
            SELECT username, email, password_hash, created_at
            FROM users
            WHERE username = $1 OR email = $2
            LIMIT 1
            ",
        )
        .bind(username.as_str())
        .bind(email.as_str())
        .fetch_optional(&self.pool)
        .await?;

        row.map(UserRecord::try_from).transpose()
    }

    async fn find_by_username(
        &self,
        username: &Username,
    ) -> Result<Option<UserRecord>, RepositoryError> {
        let row = sqlx::query_as::<_, UserRow>(
            r"
            SELECT username, email, password_hash, created_at
            FROM users
            WHERE username = $1
            ",
        )
        .bind(username.as_str())
        .fetch_optional(&self.pool)
        .await?;

        row.map(UserRecord::try_from).transpose()
    }

    async fn insert(&self, user: NewUser) -> Result<UserRecord, RepositoryError> {
        // Unique violations on either column surface as RepositoryError::Conflict
        let row = sqlx::query_as::<_, UserRow>(
            r"
            INSERT INTO users (username, email, password_hash)
            VALUES ($1, $2, $3)
            RETURNING username, email, password_hash, created_at
            ",
        )
        .bind(user.username.as_str())
        .bind(user.email.as_str())
        .bind(&user.password_hash)
        .fetch_one(&self.pool)
        .await?;

        UserRecord::try_from(row)
    }

    async fn list(&self) -> Result<Vec<UserRecord>, RepositoryError> {
        let rows = sqlx::query_as::<_, UserRow>(
            r"
            SELECT username, email, password_hash, created_at
            FROM users
            ORDER BY id
            ",
        )
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(UserRecord::try_from).collect()
    }

    async fn ping(&self) -> Result<(), RepositoryError> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }
}

// Run with `DATABASE_URL` pointing at a disposable database:
// `cargo test -p herbal-glow-storefront -- --ignored`
#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use super::*;

    fn new_user(username: &str, email: &str) -> NewUser {
        NewUser {
            username: Username::parse(username).unwrap(),
            email: Email::parse(email).unwrap(),
            password_hash: "$argon2id$placeholder".to_owned(),
        }
    }

    #[sqlx::test(migrations = "./migrations")]
    #[ignore = "requires DATABASE_URL"]
    async fn test_insert_then_find(pool: PgPool) {
        let store = PgUserStore::new(pool);
        let inserted = store
            .insert(new_user("rosie", "rosie@example.com"))
            .await
            .unwrap();
        assert_eq!(inserted.username.as_str(), "rosie");

        let found = store
            .find_by_username(&Username::parse("rosie").unwrap())
            .await
            .unwrap()
            .unwrap();
        assert_eq!(found, inserted);

        let by_email = store
            .find_by_username_or_email(
                &Username::parse("someone").unwrap(),
                &Email::parse("rosie@example.com").unwrap(),
            )
            .await
            .unwrap();
        assert!(by_email.is_some());
    }

    #[sqlx::test(migrations = "./migrations")]
    #[ignore = "requires DATABASE_URL"]
    async fn test_unique_violation_is_conflict(pool: PgPool) {
        let store = PgUserStore::new(pool);
        store
            .insert(new_user("rosie", "rosie@example.com"))
            .await
            .unwrap();

        let same_name = store.insert(new_user("rosie", "other@example.com")).await;
        assert!(matches!(same_name, Err(RepositoryError::Conflict(_))));

        let same_email = store.insert(new_user("other", "rosie@example.com")).await;
        assert!(matches!(same_email, Err(RepositoryError::Conflict(_))));

        assert_eq!(store.list().await.unwrap().len(), 1);
    }

    #[sqlx::test(migrations = "./migrations")]
    #[ignore = "requires DATABASE_URL"]
    async fn test_list_keeps_signup_order(pool: PgPool) {
        let store = PgUserStore::new(pool);
        for name in ["charlie", "alice", "bob"] {
            store
                .insert(new_user(name, &format!("{name}@example.com")))
                .await
                .unwrap();
        }
        store.ping().await.unwrap();

        let users = store.list().await.unwrap();
        assert_eq!(users.len(), 3);
        assert_eq!(users[0].username.as_str(), "charlie");
        assert_eq!(users[2].username.as_str(), "bob");
    }
}
