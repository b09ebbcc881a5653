//! Keyed-slot persistence: one JSON document per string key, over a
//! pluggable backend.

use async_trait::async_trait;
use serde::{de::DeserializeOwned, Serialize};
use std::{
    collections::HashMap,
    path::PathBuf,
    sync::{Arc, Mutex},
};
use thiserror::Error;
use tokio::sync::watch;
use tracing::warn;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Storage I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Stored value could not be encoded or decoded: {0}")]
    Serde(#[from] serde_json::Error),
}

pub type StoreResult<T> = Result<T, StoreError>;

/// Raw string storage, one JSON document per string key.
#[async_trait]
pub trait StorageBackend: Send + Sync {
    async fn read(&self, key: &str) -> StoreResult<Option<String>>;
    async fn write(&self, key: &str, raw: &str) -> StoreResult<()>;
}

/// File-per-key backend under a base directory.
pub struct FileBackend {
    dir: PathBuf,
}

impl FileBackend {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    fn path(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{key}.json"))
    }
}

#[async_trait]
impl StorageBackend for FileBackend {
    async fn read(&self, key: &str) -> StoreResult<Option<String>> {
        match tokio::fs::read_to_string(self.path(key)).await {
            Ok(raw) => Ok(Some(raw)),
            Err(error) if error.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(error) => Err(error.into()),
        }
    }

    async fn write(&self, key: &str, raw: &str) -> StoreResult<()> {
        tokio::fs::create_dir_all(&self.dir).await?;
        tokio::fs::write(self.path(key), raw).await?;
        Ok(())
    }
}

/// In-memory backend for tests and environments without a writable disk.
#[derive(Default)]
pub struct MemoryBackend {
    entries: Mutex<HashMap<String, String>>,
}

impl MemoryBackend {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl StorageBackend for MemoryBackend {
    async fn read(&self, key: &str) -> StoreResult<Option<String>> {
        let entries = self.entries.lock().expect("backend state poisoned");
        Ok(entries.get(key).cloned())
    }

    async fn write(&self, key: &str, raw: &str) -> StoreResult<()> {
        let mut entries = self.entries.lock().expect("backend state poisoned");
        entries.insert(key.to_string(), raw.to_string());
        Ok(())
    }
}

/// A single typed value stored under one key.
///
/// Reads fail open: a missing, unreadable, or malformed entry yields the
/// caller-supplied default instead of an error. Writes that fail are logged
/// and swallowed; the in-memory value still updates, so the UI never blocks
/// on storage.
pub struct Slot<T> {
    backend: Arc<dyn StorageBackend>,
    key: String,
    default: T,
    tx: watch::Sender<T>,
}

impl<T> Slot<T>
where
    T: Clone + Serialize + DeserializeOwned + Send + Sync + 'static,
{
    pub fn new(backend: Arc<dyn StorageBackend>, key: impl Into<String>, default: T) -> Self {
        let (tx, _) = watch::channel(default.clone());
        Self {
            backend,
            key: key.into(),
            default,
            tx,
        }
    }

    /// Read the current value, or the default if the entry is missing or
    /// unusable.
    pub async fn load(&self) -> T {
        match self.backend.read(&self.key).await {
            Ok(Some(raw)) => match serde_json::from_str(&raw) {
                Ok(value) => value,
                Err(error) => {
                    warn!(key = %self.key, %error, "stored value is malformed, using default");
                    self.default.clone()
                }
            },
            Ok(None) => self.default.clone(),
            Err(error) => {
                warn!(key = %self.key, %error, "storage read failed, using default");
                self.default.clone()
            }
        }
    }

    /// Persist a value and publish it to subscribers. Persistence failures
    /// are logged, not returned.
    pub async fn save(&self, value: &T) {
        match serde_json::to_string(value) {
            Ok(raw) => {
                if let Err(error) = self.backend.write(&self.key, &raw).await {
                    warn!(key = %self.key, %error, "storage write failed, value not persisted");
                }
            }
            Err(error) => {
                warn!(key = %self.key, %error, "value could not be serialized, not persisted");
            }
        }
        self.tx.send_replace(value.clone());
    }

    /// Read-modify-write against the current snapshot, the
    /// function-of-previous-value form that avoids lost updates within one
    /// execution context. Cross-context writes are not coordinated.
    pub async fn update<F>(&self, f: F) -> T
    where
        F: FnOnce(T) -> T,
    {
        let value = f(self.load().await);
        self.save(&value).await;
        value
    }

    /// Observe the slot. Receivers see every save, update, and refresh.
    pub fn subscribe(&self) -> watch::Receiver<T> {
        self.tx.subscribe()
    }

    /// Reload from the backend and republish, for reacting to a change made
    /// by another context. Last write wins.
    pub async fn refresh(&self) -> T {
        let value = self.load().await;
        self.tx.send_replace(value.clone());
        value
    }
}
