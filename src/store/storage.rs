use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use thiserror::Error;

use super::PersistentState;

/// Fixed name of the persisted favorites record.
pub const STORAGE_NAME: &str = "news-storage";

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("failed to read '{path}': {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to write '{path}': {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to decode stored favorites: {0}")]
    Decode(#[from] serde_json::Error),
}

/// Durable home of the favorites slice. Nothing else is ever handed to it.
pub trait FavoritesStorage: Send + Sync {
    /// `Ok(None)` when nothing has been stored yet.
    fn load(&self) -> Result<Option<PersistentState>, StorageError>;

    fn save(&self, state: &PersistentState) -> Result<(), StorageError>;
}

/// One JSON file, `<dir>/news-storage.json`.
#[derive(Debug, Clone)]
pub struct JsonFileStorage {
    path: PathBuf,
}

impl JsonFileStorage {
    pub fn new(dir: impl AsRef<Path>) -> Self {
        Self {
            path: dir.as_ref().join(format!("{STORAGE_NAME}.json")),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl FavoritesStorage for JsonFileStorage {
    fn load(&self) -> Result<Option<PersistentState>, StorageError> {
        if !self.path.exists() {
            return Ok(None);
        }

        let content = fs::read_to_string(&self.path).map_err(|e| StorageError::Read {
            path: self.path.clone(),
            source: e,
        })?;

        Ok(Some(serde_json::from_str(&content)?))
    }

    fn save(&self, state: &PersistentState) -> Result<(), StorageError> {
        let write_err = |source| StorageError::Write {
            path: self.path.clone(),
            source,
        };

        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).map_err(write_err)?;
        }

        let json = serde_json::to_string(state)?;
        let tmp = self.path.with_extension("json.tmp");
        fs::write(&tmp, json).map_err(write_err)?;
        fs::rename(&tmp, &self.path).map_err(write_err)?;

        Ok(())
    }
}

/// Keeps the serialized record in memory. Clones share the same record, so a
/// store rebuilt over a clone sees what the previous one saved.
#[derive(Debug, Clone, Default)]
pub struct MemoryStorage {
    record: Arc<Mutex<Option<String>>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// The raw stored record, exactly as it would be written to disk.
    pub fn raw(&self) -> Option<String> {
        self.lock().clone()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Option<String>> {
        self.record.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl FavoritesStorage for MemoryStorage {
    fn load(&self) -> Result<Option<PersistentState>, StorageError> {
        match self.lock().as_deref() {
            Some(raw) => Ok(Some(serde_json::from_str(raw)?)),
            None => Ok(None),
        }
    }

    fn save(&self, state: &PersistentState) -> Result<(), StorageError> {
        let json = serde_json::to_string(state)?;
        *self.lock() = Some(json);
        Ok(())
    }
}
