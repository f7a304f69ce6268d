//! Storage backend abstraction.
//!
//! This module defines the [`Storage`] trait: a small key-value store of JSON
//! values. The plugin persists exactly one key today (the email history), but the
//! worker only ever talks to this trait.

use crate::domain::error::Result;
use serde_json::Value;

/// Key-value persistence of JSON values.
///
/// # Implementations
///
/// - [`JsonStorage`](crate::storage::JsonStorage): One JSON file, atomic writes
///
/// # Examples
///
/// ```no_run
/// use vendorizer::storage::{Storage, JsonStorage};
/// use std::path::PathBuf;
///
/// let mut storage = JsonStorage::new(PathBuf::from("/tmp/vendorizer.json"))?;
/// storage.put("greeting", serde_json::json!("hello"))?;
/// assert!(storage.get("greeting")?.is_some());
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
pub trait Storage: Send {
    /// Reads the value at `key`; `Ok(None)` if absent.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend cannot be read.
    fn get(&self, key: &str) -> Result<Option<Value>>;

    /// Writes `value` at `key`, replacing any previous value.
    ///
    /// # Errors
    ///
    /// Returns an error if the write cannot be made durable.
    fn put(&mut self, key: &str, value: Value) -> Result<()>;

    /// Deletes `key`. Removing a missing key is not an error.
    ///
    /// # Errors
    ///
    /// Returns an error if the write cannot be made durable.
    fn remove(&mut self, key: &str) -> Result<()>;
}
