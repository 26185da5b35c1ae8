//! Durable key-value slots for client-side state.
//!
//! A slot holds one text value that is read once and overwritten wholesale.
//! [`FileStorage`] keeps one file per slot; [`MemoryStorage`] is for tests
//! and for embedding the cart in a process that persists elsewhere.

use std::collections::HashMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("invalid slot key: {0:?}")]
    InvalidKey(String),

    #[error("I/O error on slot {key}: {source}")]
    Io {
        key: String,
        #[source]
        source: io::Error,
    },
}

pub trait SlotStorage {
    /// Read a slot. `Ok(None)` means the slot has never been written.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError`] if the slot exists but cannot be read.
    fn read(&self, key: &str) -> Result<Option<String>, StorageError>;

    /// Overwrite a slot.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError`] if the value cannot be stored.
    fn write(&mut self, key: &str, value: &str) -> Result<(), StorageError>;
}

// =============================================================================
// In-memory
// =============================================================================

#[derive(Debug, Clone, Default)]
pub struct MemoryStorage {
    slots: HashMap<String, String>,
}

impl MemoryStorage {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Pre-populate a slot, e.g. with data from a previous session.
    #[must_use]
    pub fn with_slot(mut self, key: &str, value: &str) -> Self {
        self.slots.insert(key.to_owned(), value.to_owned());
        self
    }

    #[must_use]
    pub fn get(&self, key: &str) -> Option<&str> {
        self.slots.get(key).map(String::as_str)
    }
}

impl SlotStorage for MemoryStorage {
    fn read(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.slots.get(key).cloned())
    }

    fn write(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        self.slots.insert(key.to_owned(), value.to_owned());
        Ok(())
    }
}

// =============================================================================
// Files
// =============================================================================

/// One `<key>.json` file per slot inside a directory.
///
/// Writes go to a temporary sibling first and are renamed into place, so a
/// crash mid-write leaves the previous value intact.
#[derive(Debug, Clone)]
pub struct FileStorage {
    dir: PathBuf,
}

impl FileStorage {
    /// The directory is created lazily on first write.
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    #[must_use]
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn slot_path(&self, key: &str) -> Result<PathBuf, StorageError> {
        let valid = !key.is_empty()
            && key
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');
        if !valid {
            return Err(StorageError::InvalidKey(key.to_owned()));
        }
        Ok(self.dir.join(format!("{key}.json")))
    }
}

impl SlotStorage for FileStorage {
    fn read(&self, key: &str) -> Result<Option<String>, StorageError> {
        let path = self.slot_path(key)?;
        match fs::read_to_string(&path) {
            Ok(text) => Ok(Some(text)),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(source) => Err(StorageError::Io {
                key: key.to_owned(),
                source,
            }),
        }
    }

    fn write(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        let path = self.slot_path(key)?;
        let io_err = |source| StorageError::Io {
            key: key.to_owned(),
            source,
        };

        fs::create_dir_all(&self.dir).map_err(io_err)?;
        let tmp = path.with_extension("json.tmp");
        fs::write(&tmp, value).map_err(io_err)?;
        fs::rename(&tmp, &path).map_err(io_err)?;
        Ok(())
    }
}
