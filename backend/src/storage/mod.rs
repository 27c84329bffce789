//! Key-value storage for campaign records.
//!
//! Values are JSON strings stored under plain string keys. Two backends:
//!
//! - [`MemoryStore`] - process-local map, used by tests and ephemeral servers
//! - [`FileStore`] - one `<key>.json` file per key in a directory
//!
//! Writes are whole-value overwrites; there is no locking across a
//! read-modify-write sequence, so the last writer wins.

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::collections::HashMap;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tokio::sync::RwLock;

use crate::error::{StorageError, StorageResult};

/// Directory where the file store keeps its records (relative to current dir)
pub const DEFAULT_STORAGE_DIR: &str = ".influmatch/storage";

/// Asynchronous string key-value collaborator.
#[async_trait]
pub trait KeyValueStore: Send + Sync {
    /// Raw value under `key`, or `None` if absent.
    async fn get(&self, key: &str) -> StorageResult<Option<String>>;

    /// Overwrite the value under `key`.
    async fn set(&self, key: &str, value: &str) -> StorageResult<()>;

    /// Remove `key`. Removing a missing key succeeds.
    async fn remove(&self, key: &str) -> StorageResult<()>;

    /// Remove several keys, stopping at the first failure.
    async fn multi_remove(&self, keys: &[&str]) -> StorageResult<()> {
        for key in keys {
            self.remove(key).await?;
        }
        Ok(())
    }
}

/// Read and parse the JSON value under `key`.
pub async fn load_json<T, S>(store: &S, key: &str) -> StorageResult<Option<T>>
where
    T: DeserializeOwned,
    S: KeyValueStore + ?Sized,
{
    match store.get(key).await? {
        Some(raw) => Ok(Some(serde_json::from_str(&raw)?)),
        None => Ok(None),
    }
}

/// Serialize `value` and store it under `key`.
pub async fn save_json<T, S>(store: &S, key: &str, value: &T) -> StorageResult<()>
where
    T: Serialize + ?Sized,
    S: KeyValueStore + ?Sized,
{
    let raw = serde_json::to_string(value)?;
    store.set(key, &raw).await
}

// =============================================================================
// Memory Store
// =============================================================================

/// In-memory backend.
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: RwLock<HashMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl KeyValueStore for MemoryStore {
    async fn get(&self, key: &str) -> StorageResult<Option<String>> {
        Ok(self.entries.read().await.get(key).cloned())
    }

    async fn set(&self, key: &str, value: &str) -> StorageResult<()> {
        self.entries
            .write()
            .await
            .insert(key.to_string(), value.to_string());
        Ok(())
    }

    async fn remove(&self, key: &str) -> StorageResult<()> {
        self.entries.write().await.remove(key);
        Ok(())
    }
}

// =============================================================================
// File Store
// =============================================================================

/// Directory-backed store: each key lives in `<dir>/<key>.json`.
#[derive(Debug, Clone)]
pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    /// Store rooted at [`DEFAULT_STORAGE_DIR`].
    pub fn new() -> Self {
        Self::with_dir(DEFAULT_STORAGE_DIR)
    }

    /// Store rooted at a custom directory. The directory is created on first write.
    pub fn with_dir(dir: impl AsRef<Path>) -> Self {
        Self {
            dir: PathBuf::from(dir.as_ref()),
        }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path_for(&self, key: &str) -> StorageResult<PathBuf> {
        let valid = !key.is_empty()
            && key
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');
        if !valid {
            return Err(StorageError::InvalidKey(key.to_string()));
        }
        Ok(self.dir.join(format!("{}.json", key)))
    }
}

impl Default for FileStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl KeyValueStore for FileStore {
    async fn get(&self, key: &str) -> StorageResult<Option<String>> {
        let path = self.path_for(key)?;
        match tokio::fs::read_to_string(&path).await {
            Ok(content) => Ok(Some(content)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    async fn set(&self, key: &str, value: &str) -> StorageResult<()> {
        let path = self.path_for(key)?;
        tokio::fs::create_dir_all(&self.dir).await?;
        tokio::fs::write(&path, value).await?;
        Ok(())
    }

    async fn remove(&self, key: &str) -> StorageResult<()> {
        let path = self.path_for(key)?;
        match tokio::fs::remove_file(&path).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}
