//! Key-value backed user store.
//!
//! Users live as one JSON array under the [`USERS_KEY`] key, in signup
//! order. The key-value layer only offers `get` and `set` of string values,
//! so every write replaces the whole list.

use std::collections::BTreeMap;
use std::collections::HashMap;
use std::future::Future;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use chrono::Utc;
use tokio::sync::{Mutex, RwLock};

use herbal_glow_core::{Email, Username};

use super::{RepositoryError, UserStore};
use crate::models::{NewUser, UserRecord};

/// Key under which the user list is stored.
pub const USERS_KEY: &str = "users";

/// Minimal string key-value persistence.
pub trait KeyValue: Send + Sync {
    /// Read a value.
    fn get(
        &self,
        key: &str,
    ) -> impl Future<Output = Result<Option<String>, RepositoryError>> + Send;

    /// Write a value, replacing any previous one.
    fn set(
        &self,
        key: &str,
        value: String,
    ) -> impl Future<Output = Result<(), RepositoryError>> + Send;
}

// =============================================================================
// Memory
// =============================================================================

/// Key-value store held in process memory.
#[derive(Clone, Default)]
pub struct MemoryKeyValue {
    entries: Arc<RwLock<HashMap<String, String>>>,
}

impl KeyValue for MemoryKeyValue {
    async fn get(&self, key: &str) -> Result<Option<String>, RepositoryError> {
        Ok(self.entries.read().await.get(key).cloned())
    }

    async fn set(&self, key: &str, value: String) -> Result<(), RepositoryError> {
        self.entries.write().await.insert(key.to_owned(), value);
        Ok(())
    }
}

// =============================================================================
// File
// =============================================================================

/// Key-value store persisted as a single JSON object on disk.
///
/// Writes go to a sibling temp file which is then renamed over the
/// original, so readers never see a half-written document.
#[derive(Clone)]
pub struct FileKeyValue {
    path: Arc<PathBuf>,
    write_lock: Arc<Mutex<()>>,
}

impl FileKeyValue {
    /// Open a store at `path`.
    ///
    /// The file itself is created on first write. An existing file must be
    /// a valid JSON object.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Io` if the parent directory cannot be
    /// created or the file cannot be read, and
    /// `RepositoryError::Serialization` if it is not a JSON object of strings.
    pub async fn open(path: impl AsRef<Path>) -> Result<Self, RepositoryError> {
        let path = path.as_ref().to_path_buf();
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent).await?;
        }

        let store = Self {
            path: Arc::new(path),
            write_lock: Arc::new(Mutex::new(())),
        };
        store.read_all().await?;
        Ok(store)
    }

    /// Write an empty document if none exists yet.
    ///
    /// Returns `true` if a file was created.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Io` if the file cannot be written.
    pub async fn create_if_missing(&self) -> Result<bool, RepositoryError> {
        let _guard = self.write_lock.lock().await;
        if tokio::fs::try_exists(self.path.as_path()).await? {
            return Ok(false);
        }
        self.write_all(&BTreeMap::new()).await?;
        Ok(true)
    }

    /// Location of the backing file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn read_all(&self) -> Result<BTreeMap<String, String>, RepositoryError> {
        match tokio::fs::read_to_string(self.path.as_path()).await {
            Ok(contents) if contents.trim().is_empty() => Ok(BTreeMap::new()),
            Ok(contents) => Ok(serde_json::from_str(&contents)?),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(BTreeMap::new()),
            Err(e) => Err(e.into()),
        }
    }

    async fn write_all(&self, entries: &BTreeMap<String, String>) -> Result<(), RepositoryError> {
        let contents = serde_json::to_vec_pretty(entries)?;
        let tmp = self.path.with_extension("json.tmp");
        tokio::fs::write(&tmp, contents).await?;
        tokio::fs::rename(&tmp, self.path.as_path()).await?;
        Ok(())
    }
}

impl KeyValue for FileKeyValue {
    async fn get(&self, key: &str) -> Result<Option<String>, RepositoryError> {
        Ok(self.read_all().await?.remove(key))
    }

    async fn set(&self, key: &str, value: String) -> Result<(), RepositoryError> {
        let _guard = self.write_lock.lock().await;
        let mut entries = self.read_all().await?;
        entries.insert(key.to_owned(), value);
        self.write_all(&entries).await
    }
}

// =============================================================================
// User store
// =============================================================================

/// [`UserStore`] over any [`KeyValue`] backend.
#[derive(Clone)]
pub struct KvUserStore<K> {
    kv: K,
    insert_lock: Arc<Mutex<()>>,
}

impl<K: KeyValue> KvUserStore<K> {
    /// Wrap a key-value store.
    #[must_use]
    pub fn new(kv: K) -> Self {
        Self {
            kv,
            insert_lock: Arc::new(Mutex::new(())),
        }
    }

    async fn load(&self) -> Result<Vec<UserRecord>, RepositoryError> {
        match self.kv.get(USERS_KEY).await? {
            Some(json) => Ok(serde_json::from_str(&json)?),
            None => Ok(Vec::new()),
        }
    }
}

impl<K: KeyValue> UserStore for KvUserStore<K> {
    async fn find_by_username_or_email(
        &self,
        username: &Username,
        email: &Email,
    ) -> Result<Option<UserRecord>, RepositoryError> {
        Ok(self
            .load()
            .await?
            .into_iter()
            .find(|u| &u.username == username || &u.email == email))
    }

    async fn find_by_username(
        &self,
        username: &Username,
    ) -> Result<Option<UserRecord>, RepositoryError> {
        Ok(self
            .load()
            .await?
            .into_iter()
            .find(|u| &u.username == username))
    }

    async fn insert(&self, user: NewUser) -> Result<UserRecord, RepositoryError> {
        // Held across read-check-write so two signups cannot both pass the check
        let _guard = self.insert_lock.lock().await;

        let mut users = self.load().await?;
        if users
            .iter()
            .any(|u| u.username == user.username || u.email == user.email)
        {
            return Err(RepositoryError::Conflict(
                "username or email already exists".to_owned(),
            ));
        }

        let record = user.into_record(Utc::now());
        users.push(record.clone());
        self.kv
            .set(USERS_KEY, serde_json::to_string(&users)?)
            .await?;

        Ok(record)
    }

    async fn list(&self) -> Result<Vec<UserRecord>, RepositoryError> {
        self.load().await
    }

    async fn ping(&self) -> Result<(), RepositoryError> {
        self.kv.get(USERS_KEY).await.map(|_| ())
    }
}

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

    fn temp_path() -> PathBuf {
        std::env::temp_dir()
            .join(format!("herbal-glow-{}", uuid::Uuid::new_v4()))
            .join("users.json")
    }

    #[tokio::test]
    async fn test_insert_then_find() {
        let store = KvUserStore::new(MemoryKeyValue::default());
        store.insert(new_user("rosie", "rosie@example.com")).await.unwrap();

        let found = store
            .find_by_username(&Username::parse("rosie").unwrap())
            .await
            .unwrap()
            .unwrap();
        assert_eq!(found.email.as_str(), "rosie@example.com");

        assert!(
            store
                .find_by_username(&Username::parse("nobody").unwrap())
                .await
                .unwrap()
                .is_none()
        );
    }

    #[tokio::test]
    async fn test_duplicate_username_or_email_is_conflict() {
        let store = KvUserStore::new(MemoryKeyValue::default());
        store.insert(new_user("rosie", "rosie@example.com")).await.unwrap();

        let same_name = store.insert(new_user("rosie", "other@example.com")).await;
        assert!(matches!(same_name, Err(RepositoryError::Conflict(_))));

        let same_email = store.insert(new_user("other", "rosie@example.com")).await;
        assert!(matches!(same_email, Err(RepositoryError::Conflict(_))));

        assert_eq!(store.list().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_find_by_username_or_email_matches_either() {
        let store = KvUserStore::new(MemoryKeyValue::default());
        store.insert(new_user("rosie", "rosie@example.com")).await.unwrap();

        let by_email = store
            .find_by_username_or_email(
                &Username::parse("someone").unwrap(),
                &Email::parse("rosie@example.com").unwrap(),
            )
            .await
            .unwrap();
        assert!(by_email.is_some());

        let neither = store
            .find_by_username_or_email(
                &Username::parse("someone").unwrap(),
                &Email::parse("someone@example.com").unwrap(),
            )
            .await
            .unwrap();
        assert!(neither.is_none());
    }

    #[tokio::test]
    async fn test_list_keeps_signup_order() {
        let store = KvUserStore::new(MemoryKeyValue::default());
        for name in ["charlie", "alice", "bob"] {
            store
                .insert(new_user(name, &format!("{name}@example.com")))
                .await
                .unwrap();
        }
        let names: Vec<String> = store
            .list()
            .await
            .unwrap()
            .into_iter()
            .map(|u| u.username.into_inner())
            .collect();
        assert_eq!(names, ["charlie", "alice", "bob"]);
    }

    #[tokio::test]
    async fn test_concurrent_inserts_keep_usernames_unique() {
        let store = KvUserStore::new(MemoryKeyValue::default());
        let mut handles = Vec::new();
        for i in 0..8 {
            let store = store.clone();
            handles.push(tokio::spawn(async move {
                store
                    .insert(new_user("racer", &format!("racer{i}@example.com")))
                    .await
            }));
        }

        let mut successes = 0;
        for handle in handles {
            if handle.await.unwrap().is_ok() {
                successes += 1;
            }
        }
        assert_eq!(successes, 1);
        assert_eq!(store.list().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_file_store_persists_across_reopen() {
        let path = temp_path();

        let store = KvUserStore::new(FileKeyValue::open(&path).await.unwrap());
        store.insert(new_user("rosie", "rosie@example.com")).await.unwrap();

        let reopened = KvUserStore::new(FileKeyValue::open(&path).await.unwrap());
        let users = reopened.list().await.unwrap();
        assert_eq!(users.len(), 1);
        assert_eq!(users[0].username.as_str(), "rosie");

        tokio::fs::remove_dir_all(path.parent().unwrap()).await.unwrap();
    }

    #[tokio::test]
    async fn test_file_store_create_if_missing() {
        let path = temp_path();
        let kv = FileKeyValue::open(&path).await.unwrap();

        assert!(kv.create_if_missing().await.unwrap());
        assert!(!kv.create_if_missing().await.unwrap());
        assert_eq!(kv.get(USERS_KEY).await.unwrap(), None);

        tokio::fs::remove_dir_all(path.parent().unwrap()).await.unwrap();
    }

    #[tokio::test]
    async fn test_file_store_rejects_corrupt_document() {
        let path = temp_path();
        tokio::fs::create_dir_all(path.parent().unwrap()).await.unwrap();
        tokio::fs::write(&path, "not json").await.unwrap();

        let result = FileKeyValue::open(&path).await;
        assert!(matches!(result, Err(RepositoryError::Serialization(_))));

        tokio::fs::remove_dir_all(path.parent().unwrap()).await.unwrap();
    }
}
