//! Durable key-value storage.
//!
//! The persistent cache only needs get/set/remove by string key. Three
//! backends are provided: one JSON file per key, a SQLite table, and an
//! in-process map.

use crate::error::StoreError;
use anyhow::anyhow;
use async_trait::async_trait;
use shared::Database;
use std::collections::HashMap;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use tracing::{debug, info};

/// Key-value storage capability
///
/// Missing keys read as `None`; removing a missing key succeeds.
#[async_trait]
pub trait KeyValueStore: Send + Sync {
    async fn get(&self, key: &str) -> Result<Option<String>, StoreError>;

    async fn set(&self, key: &str, value: &str) -> Result<(), StoreError>;

    async fn remove(&self, key: &str) -> Result<(), StoreError>;
}

/// One `<key>.json` file per key under a directory
#[derive(Debug, Clone)]
pub struct FileStore {
    /// Root cache directory
    cache_dir: PathBuf,
}

impl FileStore {
    /// Create a new file store, creating the directory if needed
    pub fn new(cache_dir: impl AsRef<Path>) -> Result<Self, StoreError> {
        let cache_dir = cache_dir.as_ref().to_path_buf();
        std::fs::create_dir_all(&cache_dir)?;
        info!(cache_dir = %cache_dir.display(), "Cache store initialized");
        Ok(Self { cache_dir })
    }

    /// Get the cache file path for a given key
    fn cache_path(&self, key: &str) -> PathBuf {
        // Sanitize key to create valid filename
        let safe_key = key.replace(['/', '\\', ':', '*', '?', '"', '<', '>', '|'], "_");

        self.cache_dir.join(format!("{}.json", safe_key))
    }
}

#[async_trait]
impl KeyValueStore for FileStore {
    async fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        let path = self.cache_path(key);
        match tokio::fs::read_to_string(&path).await {
            Ok(content) => {
                debug!(key = key, "Store hit");
                Ok(Some(content))
            }
            Err(e) if e.kind() == ErrorKind::NotFound => {
                debug!(key = key, "Store miss");
                Ok(None)
            }
            Err(e) => Err(e.into()),
        }
    }

    async fn set(&self, key: &str, value: &str) -> Result<(), StoreError> {
        let path = self.cache_path(key);

        // Write to a sibling file and rename so readers never see a torn payload
        let tmp = path.with_extension("json.tmp");
        tokio::fs::write(&tmp, value).await?;
        tokio::fs::rename(&tmp, &path).await?;

        debug!(key = key, path = %path.display(), bytes = value.len(), "Store write");
        Ok(())
    }

    async fn remove(&self, key: &str) -> Result<(), StoreError> {
        match tokio::fs::remove_file(self.cache_path(key)).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

/// Values kept in the `kv_store` table of a SQLite database
#[derive(Clone)]
pub struct SqliteStore {
    db: Arc<Mutex<Database>>,
}

impl SqliteStore {
    pub fn new(db: Database) -> Self {
        Self {
            db: Arc::new(Mutex::new(db)),
        }
    }

    /// Open (or create) the database file and wrap it
    pub fn open(path: impl AsRef<Path>) -> Result<Self, StoreError> {
        Ok(Self::new(Database::open(path)?))
    }

    async fn with_db<T, F>(&self, op: F) -> Result<T, StoreError>
    where
        T: Send + 'static,
        F: FnOnce(&Database) -> anyhow::Result<T> + Send + 'static,
    {
        let db = Arc::clone(&self.db);
        let result = tokio::task::spawn_blocking(move || {
            let guard = db
                .lock()
                .map_err(|_| anyhow!("cache database lock poisoned"))?;
            op(&guard)
        })
        .await?;
        Ok(result?)
    }
}

#[async_trait]
impl KeyValueStore for SqliteStore {
    async fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        let key = key.to_string();
        self.with_db(move |db| db.kv_get(&key)).await
    }

    async fn set(&self, key: &str, value: &str) -> Result<(), StoreError> {
        let key = key.to_string();
        let value = value.to_string();
        self.with_db(move |db| db.kv_set(&key, &value)).await
    }

    async fn remove(&self, key: &str) -> Result<(), StoreError> {
        let key = key.to_string();
        self.with_db(move |db| db.kv_remove(&key)).await
    }
}

/// In-process map; nothing survives the process
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: Mutex<HashMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn entries(&self) -> Result<std::sync::MutexGuard<'_, HashMap<String, String>>, StoreError> {
        self.entries
            .lock()
            .map_err(|_| StoreError::Database(anyhow!("memory store lock poisoned")))
    }
}

#[async_trait]
impl KeyValueStore for MemoryStore {
    async fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        Ok(self.entries()?.get(key).cloned())
    }

    async fn set(&self, key: &str, value: &str) -> Result<(), StoreError> {
        self.entries()?.insert(key.to_string(), value.to_string());
        Ok(())
    }

    async fn remove(&self, key: &str) -> Result<(), StoreError> {
        self.entries()?.remove(key);
        Ok(())
    }
}
