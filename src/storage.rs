//! Key-value slots that outlive a single command, one store per profile.

use std::collections::BTreeMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("slot store io error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("slot store at {path} is not a JSON object of strings: {source}")]
    Format {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("failed to encode slot value: {0}")]
    Encode(#[source] serde_json::Error),
}

/// String slots addressed by key. Values are opaque to the store.
pub trait SlotStore {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError>;
    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError>;
    fn remove(&mut self, key: &str) -> Result<(), StorageError>;
}

/// Slots that live as long as the process.
#[cfg(test)]
#[derive(Debug, Default)]
pub struct MemorySlotStore {
    slots: BTreeMap<String, String>,
}

#[cfg(test)]
impl MemorySlotStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[cfg(test)]
impl SlotStore for MemorySlotStore {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.slots.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        self.slots.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<(), StorageError> {
        self.slots.remove(key);
        Ok(())
    }
}

/// Slots persisted as a single JSON object in `<dir>/storage.json`.
///
/// Every call reads the file fresh, so two processes sharing a directory see
/// each other's writes; the last writer wins.
#[derive(Debug, Clone)]
pub struct FileSlotStore {
    path: PathBuf,
}

impl FileSlotStore {
    pub fn new(dir: &Path) -> Self {
        Self {
            path: dir.join("storage.json"),
        }
    }

    #[cfg(test)]
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn io_error(&self, source: io::Error) -> StorageError {
        StorageError::Io {
            path: self.path.clone(),
            source,
        }
    }

    fn read_all(&self) -> Result<BTreeMap<String, String>, StorageError> {
        let contents = match fs::read_to_string(&self.path) {
            Ok(contents) => contents,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(BTreeMap::new()),
            Err(e) => return Err(self.io_error(e)),
        };

        if contents.trim().is_empty() {
            return Ok(BTreeMap::new());
        }

        serde_json::from_str(&contents).map_err(|source| StorageError::Format {
            path: self.path.clone(),
            source,
        })
    }

    fn write_all(&self, slots: &BTreeMap<String, String>) -> Result<(), StorageError> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).map_err(|e| self.io_error(e))?;
        }

        let json = serde_json::to_string_pretty(slots).map_err(StorageError::Encode)?;
        fs::write(&self.path, json).map_err(|e| self.io_error(e))
    }
}

impl SlotStore for FileSlotStore {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.read_all()?.remove(key))
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        // An unreadable file is replaced rather than blocking every write.
        let mut slots = self.read_all().unwrap_or_else(|e| {
            tracing::warn!(error = %e, "discarding unreadable slot store");
            BTreeMap::new()
        });
        slots.insert(key.to_string(), value.to_string());
        self.write_all(&slots)
    }

    fn remove(&mut self, key: &str) -> Result<(), StorageError> {
        let mut slots = match self.read_all() {
            Ok(slots) => slots,
            Err(StorageError::Format { .. }) => BTreeMap::new(),
            Err(e) => return Err(e),
        };

        if slots.remove(key).is_some() || self.path.exists() {
            self.write_all(&slots)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn memory_store_overwrites_and_removes() {
        let mut store = MemorySlotStore::new();
        store.set("k", "one").unwrap();
        store.set("k", "two").unwrap();
        assert_eq!(store.get("k").unwrap().as_deref(), Some("two"));

        store.remove("k").unwrap();
        store.remove("k").unwrap();
        assert!(store.get("k").unwrap().is_none());
    }

    #[test]
    fn file_store_persists_across_instances() {
        let dir = tempfile::tempdir().unwrap();
        let mut writer = FileSlotStore::new(dir.path());
        writer.set("scholar_user", "{\"a\":1}").unwrap();
        writer.set("other", "x").unwrap();

        let reader = FileSlotStore::new(dir.path());
        assert_eq!(
            reader.get("scholar_user").unwrap().as_deref(),
            Some("{\"a\":1}")
        );
        assert_eq!(reader.get("other").unwrap().as_deref(), Some("x"));
    }

    #[test]
    fn missing_file_reads_as_empty() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = FileSlotStore::new(&dir.path().join("nested"));
        assert!(store.get("scholar_user").unwrap().is_none());
        store.remove("scholar_user").unwrap();
        assert!(!store.path().exists());
    }

    #[test]
    fn garbage_file_is_a_format_error_but_writable() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = FileSlotStore::new(dir.path());
        fs::write(store.path(), "not json").unwrap();

        assert!(matches!(
            store.get("scholar_user"),
            Err(StorageError::Format { .. })
        ));

        store.set("scholar_user", "v").unwrap();
        assert_eq!(store.get("scholar_user").unwrap().as_deref(), Some("v"));
    }
}
