//! JSON file-based storage backend.
//!
//! All keys live in one human-readable JSON document. Writes go to a temporary
//! file that is then renamed over the target, so a crash mid-write leaves the
//! previous document intact.

use crate::domain::error::{Result, VendorizerError};
use crate::storage::backend::Storage;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

const FORMAT_VERSION: u32 = 1;

/// On-disk container.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct StorageData {
    /// Version of the storage format for future migrations.
    version: u32,

    #[serde(default)]
    entries: BTreeMap<String, Value>,
}

impl Default for StorageData {
    fn default() -> Self {
        Self {
            version: FORMAT_VERSION,
            entries: BTreeMap::new(),
        }
    }
}

/// JSON file storage backend.
///
/// The whole document is held in memory and rewritten on every change.
///
/// # Thread Safety
///
/// This type is `Send` but not `Sync`. It's designed to be used from the single
/// worker thread.
///
/// # File Format
///
/// ```json
/// {
///   "version": 1,
///   "entries": {
///     "emailHistory": [ ... ]
///   }
/// }
/// ```
pub struct JsonStorage {
    file_path: PathBuf,
    data: StorageData,
    dirty: bool,
}

impl JsonStorage {
    /// Creates or opens a JSON storage file, creating parent directories.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - Parent directory creation fails
    /// - File exists but contains invalid JSON
    /// - File permissions prevent reading
    pub fn new(file_path: PathBuf) -> Result<Self> {
        tracing::debug!(path = ?file_path, "initializing JSON storage");

        if let Some(parent) = file_path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let data = if file_path.exists() {
            Self::load_from_file(&file_path)?
        } else {
            tracing::debug!("initializing new empty storage");
            StorageData::default()
        };

        tracing::debug!(key_count = data.entries.len(), "storage initialized");

        Ok(Self {
            file_path,
            data,
            dirty: false,
        })
    }

    /// Path of the backing file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.file_path
    }

    fn load_from_file(path: &Path) -> Result<StorageData> {
        let contents = std::fs::read_to_string(path)?;
        let data: StorageData = serde_json::from_str(&contents)
            .map_err(|e| VendorizerError::Storage(format!("failed to parse JSON: {e}")))?;

        if data.version > FORMAT_VERSION {
            return Err(VendorizerError::Storage(format!(
                "unsupported storage version {} (expected <= {FORMAT_VERSION})",
                data.version
            )));
        }

        tracing::debug!(version = data.version, keys = data.entries.len(), "loaded storage data");
        Ok(data)
    }

    fn save_to_file(&mut self) -> Result<()> {
        if !self.dirty {
            tracing::trace!("skipping save, no changes");
            return Ok(());
        }

        let json = serde_json::to_string_pretty(&self.data)
            .map_err(|e| VendorizerError::Storage(format!("failed to serialize JSON: {e}")))?;

        let tmp_path = self.file_path.with_extension("tmp");
        std::fs::write(&tmp_path, json)?;
        std::fs::rename(&tmp_path, &self.file_path)?;

        self.dirty = false;
        tracing::debug!(path = ?self.file_path, "storage saved");
        Ok(())
    }
}

impl Storage for JsonStorage {
    fn get(&self, key: &str) -> Result<Option<Value>> {
        let value = self.data.entries.get(key).cloned();
        tracing::debug!(key, found = value.is_some(), "storage get");
        Ok(value)
    }

    fn put(&mut self, key: &str, value: Value) -> Result<()> {
        let _span = tracing::debug_span!("json_put", key).entered();
        self.data.entries.insert(key.to_string(), value);
        self.dirty = true;
        self.save_to_file()
    }

    fn remove(&mut self, key: &str) -> Result<()> {
        let _span = tracing::debug_span!("json_remove", key).entered();
        if self.data.entries.remove(key).is_some() {
            self.dirty = true;
        }
        self.save_to_file()
    }
}

impl Drop for JsonStorage {
    fn drop(&mut self) {
        if self.dirty {
            tracing::debug!("saving dirty data on drop");
            if let Err(e) = self.save_to_file() {
                tracing::error!(error = %e, "failed to save on drop");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn values_survive_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("store.json");

        {
            let mut storage = JsonStorage::new(path.clone()).unwrap();
            storage.put("emailHistory", json!([{"id": 1}])).unwrap();
            storage.put("other", json!(true)).unwrap();
            storage.remove("other").unwrap();
        }

        let storage = JsonStorage::new(path.clone()).unwrap();
        assert_eq!(storage.get("emailHistory").unwrap(), Some(json!([{"id": 1}])));
        assert_eq!(storage.get("other").unwrap(), None);
        assert!(!path.with_extension("tmp").exists());
    }

    #[test]
    fn removing_missing_key_is_fine() {
        let dir = tempfile::tempdir().unwrap();
        let mut storage = JsonStorage::new(dir.path().join("s.json")).unwrap();
        assert!(storage.remove("nope").is_ok());
    }

    #[test]
    fn corrupt_file_is_storage_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("s.json");
        std::fs::write(&path, "{not json").unwrap();

        assert!(matches!(JsonStorage::new(path), Err(VendorizerError::Storage(_))));
    }

    #[test]
    fn newer_format_is_refused() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("s.json");
        std::fs::write(&path, r#"{"version": 99, "entries": {}}"#).unwrap();

        assert!(JsonStorage::new(path).is_err());
    }
}
