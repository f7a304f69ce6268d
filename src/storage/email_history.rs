//! Typed access to the persisted email history.
//!
//! The history is stored under one key as a JSON array, newest first. Reads are
//! lenient about order and length; writes always store at most
//! [`MAX_ENTRIES`](crate::notify::MAX_ENTRIES) entries.

use crate::domain::error::{Result, VendorizerError};
use crate::domain::EmailLogEntry;
use crate::notify::MAX_ENTRIES;
use crate::storage::backend::Storage;

/// Storage key of the email history.
pub const EMAIL_HISTORY_KEY: &str = "emailHistory";

/// Loads the persisted history, newest first and capped. Missing is empty.
///
/// # Errors
///
/// Returns [`VendorizerError::Storage`] if the stored value isn't an entry list.
pub fn load(storage: &dyn Storage) -> Result<Vec<EmailLogEntry>> {
    let Some(value) = storage.get(EMAIL_HISTORY_KEY)? else {
        return Ok(Vec::new());
    };

    let mut entries: Vec<EmailLogEntry> = serde_json::from_value(value)
        .map_err(|e| VendorizerError::Storage(format!("invalid email history: {e}")))?;
    entries.sort_by(|a, b| b.id.cmp(&a.id));
    entries.truncate(MAX_ENTRIES);

    tracing::debug!(count = entries.len(), "email history loaded");
    Ok(entries)
}

/// Rewrites the persisted history in full.
///
/// # Errors
///
/// Returns an error if serialization or the write fails.
pub fn save(storage: &mut dyn Storage, entries: &[EmailLogEntry]) -> Result<()> {
    let kept = &entries[..entries.len().min(MAX_ENTRIES)];
    let value = serde_json::to_value(kept)
        .map_err(|e| VendorizerError::Storage(format!("failed to serialize email history: {e}")))?;
    storage.put(EMAIL_HISTORY_KEY, value)?;

    tracing::debug!(count = kept.len(), "email history saved");
    Ok(())
}

/// Deletes the persisted history.
///
/// # Errors
///
/// Returns an error if the write fails.
pub fn clear(storage: &mut dyn Storage) -> Result<()> {
    storage.remove(EMAIL_HISTORY_KEY)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::EmailStatus;
    use crate::storage::JsonStorage;
    use chrono::DateTime;

    fn entry(id: i64) -> EmailLogEntry {
        EmailLogEntry {
            id,
            timestamp: DateTime::from_timestamp_millis(id).unwrap(),
            vendor_name: format!("Vendor {id}"),
            vendor_id: format!("V{id}"),
            status: EmailStatus::Success,
            message: "Email sent successfully".to_string(),
        }
    }

    #[test]
    fn save_then_load_caps_and_orders() {
        let dir = tempfile::tempdir().unwrap();
        let mut storage = JsonStorage::new(dir.path().join("s.json")).unwrap();
        let entries: Vec<EmailLogEntry> = (1..=60).rev().map(entry).collect();

        save(&mut storage, &entries).unwrap();
        let loaded = load(&storage).unwrap();

        assert_eq!(loaded.len(), MAX_ENTRIES);
        assert_eq!(loaded[0].id, 60);
        assert_eq!(loaded[MAX_ENTRIES - 1].id, 11);
    }

    #[test]
    fn missing_key_is_empty_and_clear_removes() {
        let dir = tempfile::tempdir().unwrap();
        let mut storage = JsonStorage::new(dir.path().join("s.json")).unwrap();
        assert!(load(&storage).unwrap().is_empty());

        save(&mut storage, &[entry(1)]).unwrap();
        clear(&mut storage).unwrap();
        assert!(load(&storage).unwrap().is_empty());
    }

    #[test]
    fn wrong_shape_is_reported() {
        let dir = tempfile::tempdir().unwrap();
        let mut storage = JsonStorage::new(dir.path().join("s.json")).unwrap();
        storage.put(EMAIL_HISTORY_KEY, serde_json::json!({"not": "a list"})).unwrap();

        assert!(matches!(load(&storage), Err(VendorizerError::Storage(_))));
    }
}
