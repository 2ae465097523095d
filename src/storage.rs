use std::{
    collections::BTreeMap,
    fs,
    io::Write,
    path::{Path, PathBuf},
};

use tempfile::NamedTempFile;
use tracing::{debug, warn};

use crate::error::AppError;

/// Storage key holding the serialized user profile
pub const SESSION_STORAGE_KEY: &str = "mortydex-user-session";

/// Data directory created in the user's home directory
const DATA_DIR_NAME: &str = ".mortydex";
/// File holding every stored key
const STORAGE_FILE: &str = "storage.json";

/// Local string key-value storage
pub trait KeyValueStore {
    /// Returns the value stored under `key`, `None` when the key is unset
    fn get(&self, key: &str) -> Result<Option<String>, AppError>;
    /// Replaces the value stored under `key`
    fn set(&mut self, key: &str, value: &str) -> Result<(), AppError>;
    /// Removes `key`. Removing an unset key succeeds.
    fn remove(&mut self, key: &str) -> Result<(), AppError>;
}

impl<S: KeyValueStore + ?Sized> KeyValueStore for Box<S> {
    fn get(&self, key: &str) -> Result<Option<String>, AppError> {
        (**self).get(key)
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), AppError> {
        (**self).set(key, value)
    }

    fn remove(&mut self, key: &str) -> Result<(), AppError> {
        (**self).remove(key)
    }
}

/// Gets the default data directory in the user's home directory
pub fn get_global_data_dir() -> Result<PathBuf, AppError> {
    let home_dir: PathBuf = dirs::home_dir()
        .ok_or_else(|| AppError::Config("failed to find the home directory".to_string()))?;
    Ok(home_dir.join(DATA_DIR_NAME))
}

/// Key-value store persisted as one JSON object file
#[derive(Debug, Clone)]
pub struct FileStore {
    path: PathBuf,
}

impl FileStore {
    /// Creates a store backed by `storage.json` inside `data_dir`
    ///
    /// # Arguments
    /// * `data_dir` - Directory for the storage file, created on first write
    pub fn new(data_dir: impl AsRef<Path>) -> Self {
        Self {
            path: data_dir.as_ref().join(STORAGE_FILE),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Loads every entry from the storage file
    fn load_entries(&self) -> Result<BTreeMap<String, String>, AppError> {
        if !self.path.exists() {
            return Ok(BTreeMap::new());
        }

        let file_contents: String = fs::read_to_string(&self.path)?;
        if file_contents.trim().is_empty() {
            return Ok(BTreeMap::new());
        }

        Ok(serde_json::from_str(&file_contents)?)
    }

    /// Loads entries for a write. An unparsable file is replaced, since nothing in it can be read back.
    fn load_entries_for_write(&self) -> Result<BTreeMap<String, String>, AppError> {
        match self.load_entries() {
            Ok(entries) => Ok(entries),
            Err(AppError::SerdeJson(err)) => {
                warn!(path = %self.path.display(), error = %err, "discarding unreadable storage file");
                Ok(BTreeMap::new())
            }
            Err(err) => Err(err),
        }
    }

    /// Saves every entry to the storage file. The file is swapped in whole, never truncated in place.
    fn save_entries(&self, entries: &BTreeMap<String, String>) -> Result<(), AppError> {
        let parent: &Path = match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };
        fs::create_dir_all(parent)?;

        let json: String = serde_json::to_string_pretty(entries)?;
        let mut staged = NamedTempFile::new_in(parent)?;
        staged.write_all(json.as_bytes())?;
        staged.as_file().sync_all()?;
        staged.persist(&self.path).map_err(|err| AppError::Io(err.error))?;
        debug!(path = %self.path.display(), entries = entries.len(), "storage file written");
        Ok(())
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Result<Option<String>, AppError> {
        self.load_entries()
            .map(|mut entries| entries.remove(key))
            .map_err(|err| read_error(key, err))
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), AppError> {
        let mut entries = self.load_entries_for_write().map_err(|err| write_error(key, err))?;
        entries.insert(key.to_string(), value.to_string());
        self.save_entries(&entries).map_err(|err| write_error(key, err))
    }

    fn remove(&mut self, key: &str) -> Result<(), AppError> {
        let mut entries = self.load_entries_for_write().map_err(|err| write_error(key, err))?;
        if entries.remove(key).is_none() {
            return Ok(());
        }
        self.save_entries(&entries).map_err(|err| write_error(key, err))
    }
}

/// Key-value store that lives only as long as the process
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    entries: BTreeMap<String, String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>, AppError> {
        Ok(self.entries.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), AppError> {
        self.entries.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<(), AppError> {
        self.entries.remove(key);
        Ok(())
    }
}

fn read_error(key: &str, err: AppError) -> AppError {
    AppError::StorageRead {
        key: key.to_string(),
        reason: err.to_string(),
    }
}

fn write_error(key: &str, err: AppError) -> AppError {
    AppError::StorageWrite {
        key: key.to_string(),
        reason: err.to_string(),
    }
}
