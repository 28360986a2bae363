//! Durable key/value storage behind the session store
//!
//! The file backend keeps one `<key>.json` file per key under a storage
//! directory, the same way the portal front end keeps one entry per key in
//! browser storage.

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use crate::errors::{PortalError, Result};

/// Client-side storage abstraction
pub trait SessionStorage: Send + Sync {
    /// Stored value for `key`, `None` when absent
    fn read(&self, key: &str) -> Result<Option<String>>;

    fn write(&mut self, key: &str, value: &str) -> Result<()>;

    /// Removing an absent key is not an error
    fn remove(&mut self, key: &str) -> Result<()>;
}

/// File-backed storage, survives process restarts
#[derive(Debug, Clone)]
pub struct FileStorage {
    dir: PathBuf,
}

impl FileStorage {
    /// Open storage rooted at `dir`, creating it if needed
    pub fn open<P: AsRef<Path>>(dir: P) -> Result<Self> {
        let storage = FileStorage {
            dir: dir.as_ref().to_path_buf(),
        };
        storage.ensure_dir()?;

        Ok(storage)
    }

    /// Recreate the storage directory if it was wiped since `open`
    fn ensure_dir(&self) -> Result<()> {
        if self.dir.exists() {
            return Ok(());
        }

        fs::create_dir_all(&self.dir).map_err(|e| {
            PortalError::Storage(format!(
                "Failed to create storage directory {}: {}",
                self.dir.display(),
                e
            ))
        })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Path of the file holding `key`
    pub fn path_for(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{}.json", key))
    }
}

impl SessionStorage for FileStorage {
    fn read(&self, key: &str) -> Result<Option<String>> {
        let path = self.path_for(key);
        if !path.exists() {
            return Ok(None);
        }

        let content = fs::read_to_string(&path).map_err(|e| {
            PortalError::Storage(format!("Failed to read {}: {}", path.display(), e))
        })?;

        Ok(Some(content))
    }

    fn write(&mut self, key: &str, value: &str) -> Result<()> {
        let path = self.path_for(key);
        let tmp_path = self.dir.join(format!(".{}.json.tmp", key));
        self.ensure_dir()?;

        // Rename keeps readers from ever seeing a half-written value
        fs::write(&tmp_path, value).map_err(|e| {
            PortalError::Storage(format!("Failed to write {}: {}", tmp_path.display(), e))
        })?;
        fs::rename(&tmp_path, &path).map_err(|e| {
            PortalError::Storage(format!("Failed to replace {}: {}", path.display(), e))
        })?;

        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<()> {
        let path = self.path_for(key);
        if !path.exists() {
            return Ok(());
        }

        fs::remove_file(&path).map_err(|e| {
            PortalError::Storage(format!("Failed to remove {}: {}", path.display(), e))
        })
    }
}

/// In-process storage, lost when dropped
#[derive(Debug, Clone, Default)]
pub struct MemoryStorage {
    entries: HashMap<String, String>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        MemoryStorage::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl SessionStorage for MemoryStorage {
    fn read(&self, key: &str) -> Result<Option<String>> {
        Ok(self.entries.get(key).cloned())
    }

    fn write(&mut self, key: &str, value: &str) -> Result<()> {
        self.entries.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<()> {
        self.entries.remove(key);
        Ok(())
    }
}
