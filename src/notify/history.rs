//! Email history.
//!
//! The log keeps the most recent [`MAX_ENTRIES`] entries, newest first. Entry
//! identifiers are millisecond timestamps forced to increase strictly, so two
//! entries written in the same millisecond stay distinct.

use crate::domain::{EmailLogEntry, EmailStatus};
use chrono::{DateTime, Utc};

/// Most entries the log retains.
pub const MAX_ENTRIES: usize = 50;

/// Write access to the email log, handed to the simulator per call.
pub trait LogWriter {
    /// Records a new entry at the head of the log and returns its identifier.
    ///
    /// The `id` field of `entry` is ignored and replaced.
    fn append(&mut self, entry: EmailLogEntry) -> i64;

    /// Sets the status and message of entry `id`.
    ///
    /// Returns `false` if the entry is no longer in the log.
    fn update(&mut self, id: i64, status: EmailStatus, message: &str) -> bool;
}

/// In-memory email history.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EmailLog {
    entries: Vec<EmailLogEntry>,
    last_id: i64,
    dirty: bool,
}

impl EmailLog {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Entries, newest first.
    #[must_use]
    pub fn entries(&self) -> &[EmailLogEntry] {
        &self.entries
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Counts entries by status.
    #[must_use]
    pub fn count(&self, status: EmailStatus) -> usize {
        self.entries.iter().filter(|entry| entry.status == status).count()
    }

    /// Merges entries loaded from storage under whatever this session has
    /// already written.
    ///
    /// Entries already present (same id) are kept as they are here. The result is
    /// sorted newest first and capped.
    pub fn merge_loaded(&mut self, loaded: Vec<EmailLogEntry>) {
        let _span = tracing::debug_span!(
            "merge_loaded",
            loaded = loaded.len(),
            existing = self.entries.len()
        )
        .entered();

        for entry in loaded {
            if !self.entries.iter().any(|existing| existing.id == entry.id) {
                self.entries.push(entry);
            }
        }
        self.entries.sort_by(|a, b| b.id.cmp(&a.id));
        self.entries.truncate(MAX_ENTRIES);
        self.last_id = self.entries.iter().map(|e| e.id).fold(self.last_id, i64::max);

        tracing::debug!(total = self.entries.len(), "email history merged");
    }

    /// Removes every entry.
    pub fn clear(&mut self) {
        tracing::debug!(cleared = self.entries.len(), "email history cleared");
        self.entries.clear();
        self.dirty = true;
    }

    /// Returns `true` if the log changed since the last [`take_dirty`](Self::take_dirty).
    #[must_use]
    pub const fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Reports and resets the dirty flag.
    pub fn take_dirty(&mut self) -> bool {
        std::mem::take(&mut self.dirty)
    }

    fn next_id(&mut self, at: DateTime<Utc>) -> i64 {
        let id = at.timestamp_millis().max(self.last_id + 1);
        self.last_id = id;
        id
    }
}

impl LogWriter for EmailLog {
    fn append(&mut self, mut entry: EmailLogEntry) -> i64 {
        entry.id = self.next_id(entry.timestamp);
        let id = entry.id;
        self.entries.insert(0, entry);
        if self.entries.len() > MAX_ENTRIES {
            let evicted = self.entries.len() - MAX_ENTRIES;
            self.entries.truncate(MAX_ENTRIES);
            tracing::debug!(evicted, "email history at capacity");
        }
        self.dirty = true;
        id
    }

    fn update(&mut self, id: i64, status: EmailStatus, message: &str) -> bool {
        let Some(entry) = self.entries.iter_mut().find(|entry| entry.id == id) else {
            return false;
        };
        entry.status = status;
        entry.message = message.to_string();
        self.dirty = true;
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(at_ms: i64, vendor: &str) -> EmailLogEntry {
        EmailLogEntry {
            id: 0,
            timestamp: DateTime::from_timestamp_millis(at_ms).unwrap(),
            vendor_name: vendor.to_string(),
            vendor_id: vendor.to_string(),
            status: EmailStatus::Pending,
            message: String::new(),
        }
    }

    #[test]
    fn fifty_first_append_evicts_oldest() {
        let mut log = EmailLog::new();
        for i in 0..=MAX_ENTRIES as i64 {
            log.append(entry(1_000 + i, &format!("V{i}")));
        }

        assert_eq!(log.len(), MAX_ENTRIES);
        assert_eq!(log.entries()[0].vendor_id, "V50");
        assert!(log.entries().iter().all(|e| e.vendor_id != "V0"));
        assert!(log.entries().windows(2).all(|w| w[0].id > w[1].id));
    }

    #[test]
    fn ids_stay_unique_within_one_millisecond() {
        let mut log = EmailLog::new();
        let a = log.append(entry(5_000, "A"));
        let b = log.append(entry(5_000, "B"));
        let c = log.append(entry(4_000, "C"));
        assert_eq!((a, b, c), (5_000, 5_001, 5_002));
    }

    #[test]
    fn update_changes_in_place() {
        let mut log = EmailLog::new();
        let id = log.append(entry(1, "A"));
        log.append(entry(2, "B"));
        let _ = log.take_dirty();

        assert!(log.update(id, EmailStatus::Success, "Email sent successfully"));
        assert!(log.is_dirty());
        assert_eq!(log.entries()[1].status, EmailStatus::Success);
        assert!(!log.update(999, EmailStatus::Failed, "gone"));
    }

    #[test]
    fn merge_keeps_session_entries_and_sorts() {
        let mut log = EmailLog::new();
        log.append(entry(10_000, "NEW"));

        let mut old = entry(0, "OLD");
        old.id = 500;
        log.merge_loaded(vec![old]);

        assert_eq!(log.len(), 2);
        assert_eq!(log.entries()[0].vendor_id, "NEW");
        assert_eq!(log.entries()[1].vendor_id, "OLD");
        assert_eq!(log.append(entry(0, "X")), 10_001);
    }

    #[test]
    fn clear_empties_and_marks_dirty() {
        let mut log = EmailLog::new();
        log.append(entry(1, "A"));
        let _ = log.take_dirty();
        log.clear();
        assert!(log.is_empty());
        assert!(log.take_dirty());
        assert!(!log.is_dirty());
    }
}
