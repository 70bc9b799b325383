use std::collections::HashMap;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use crate::errors::StorageError;
use crate::models::Workout;
use crate::store::WorkoutStore;

/// Fixed key the workout list is persisted under.
pub const STORAGE_KEY: &str = "workouts";

/// The opaque persistence medium: synchronous, string-keyed, string-valued,
/// no transactions. `get` on an unknown key is `None`, never an error.
pub trait BlobStore {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError>;
    fn set(&mut self, key: &str, value: String) -> Result<(), StorageError>;
    fn remove(&mut self, key: &str) -> Result<(), StorageError>;
}

impl<B: BlobStore + ?Sized> BlobStore for &mut B {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        (**self).get(key)
    }

    fn set(&mut self, key: &str, value: String) -> Result<(), StorageError> {
        (**self).set(key, value)
    }

    fn remove(&mut self, key: &str) -> Result<(), StorageError> {
        (**self).remove(key)
    }
}

/// HashMap-backed store for tests and ephemeral sessions.
#[derive(Debug, Default)]
pub struct MemoryBlobStore {
    entries: HashMap<String, String>,
}

impl MemoryBlobStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl BlobStore for MemoryBlobStore {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.entries.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: String) -> Result<(), StorageError> {
        self.entries.insert(key.to_string(), value);
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<(), StorageError> {
        self.entries.remove(key);
        Ok(())
    }
}

/// File-backed store: each key maps to `<dir>/<key>.json`.
#[derive(Debug)]
pub struct FileBlobStore {
    dir: PathBuf,
}

impl FileBlobStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    fn path_for(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{key}.json"))
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }
}

impl BlobStore for FileBlobStore {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        match fs::read_to_string(self.path_for(key)) {
            Ok(contents) => Ok(Some(contents)),
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(None),
            Err(err) => Err(err.into()),
        }
    }

    fn set(&mut self, key: &str, value: String) -> Result<(), StorageError> {
        fs::create_dir_all(&self.dir)?;
        fs::write(self.path_for(key), value)?;
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<(), StorageError> {
        match fs::remove_file(self.path_for(key)) {
            Ok(()) => Ok(()),
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(()),
            Err(err) => Err(err.into()),
        }
    }
}

/// Serializes the workout list into the blob store and reconstructs typed
/// variants on load. The `type` tag in each stored record drives which
/// variant is rebuilt; persisted derived values are trusted as-is.
#[derive(Debug)]
pub struct PersistenceBridge<B> {
    blob: B,
    key: String,
}

impl<B: BlobStore> PersistenceBridge<B> {
    pub fn new(blob: B) -> Self {
        Self::with_key(blob, STORAGE_KEY)
    }

    pub fn with_key(blob: B, key: impl Into<String>) -> Self {
        Self {
            blob,
            key: key.into(),
        }
    }

    pub fn save(&mut self, store: &WorkoutStore) -> Result<(), StorageError> {
        let json = serde_json::to_string(store.all()).map_err(StorageError::Serialize)?;
        self.blob.set(&self.key, json)?;
        log::info!("saved {} workouts under '{}'", store.len(), self.key);
        Ok(())
    }

    /// Absent blob is an empty history, not an error. A present blob that
    /// does not parse is `StorageError::Corrupt` with the failing JSON path.
    pub fn load(&self) -> Result<Vec<Workout>, StorageError> {
        let Some(raw) = self.blob.get(&self.key)? else {
            log::info!("no stored workouts under '{}'", self.key);
            return Ok(Vec::new());
        };

        let mut de = serde_json::Deserializer::from_str(&raw);
        let workouts: Vec<Workout> =
            serde_path_to_error::deserialize(&mut de).map_err(|err| StorageError::Corrupt {
                path: err.path().to_string(),
                source: err.into_inner(),
            })?;

        log::info!("loaded {} workouts from '{}'", workouts.len(), self.key);
        Ok(workouts)
    }

    /// Corruption policy for startup: a blob that cannot be parsed is logged
    /// and treated as no data rather than crashing the app.
    pub fn load_or_empty(&self) -> Vec<Workout> {
        match self.load() {
            Ok(workouts) => workouts,
            Err(err) => {
                log::warn!("discarding stored workouts: {err}");
                Vec::new()
            }
        }
    }

    pub fn clear(&mut self) -> Result<(), StorageError> {
        self.blob.remove(&self.key)
    }
}
