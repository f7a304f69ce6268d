//! Email log entry model.
//!
//! Entries are what the notification simulator records about each send. The
//! serialized field names match the persisted `emailHistory` document so existing
//! logs load unchanged.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Vendor identifier recorded for bulk operations.
pub const BULK_VENDOR_ID: &str = "BULK";

/// Delivery state of a log entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EmailStatus {
    /// Send is in flight.
    Pending,
    /// Every recipient was reached.
    Success,
    /// Bulk send where some recipients failed.
    Partial,
    /// Nothing was delivered, or the operation raised an error.
    Failed,
}

impl EmailStatus {
    /// Label shown in the history panel.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Pending => "Pending",
            Self::Success => "Sent",
            Self::Partial => "Partial",
            Self::Failed => "Failed",
        }
    }

    /// Returns `true` once the entry will no longer change.
    #[must_use]
    pub const fn is_terminal(self) -> bool {
        !matches!(self, Self::Pending)
    }
}

/// One line of the email history.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EmailLogEntry {
    /// Monotonic millisecond timestamp; unique within a log.
    pub id: i64,
    pub timestamp: DateTime<Utc>,
    pub vendor_name: String,
    /// Vendor identifier, or [`BULK_VENDOR_ID`].
    pub vendor_id: String,
    pub status: EmailStatus,
    #[serde(default)]
    pub message: String,
}

impl EmailLogEntry {
    /// Returns `true` for aggregate bulk entries.
    #[must_use]
    pub fn is_bulk(&self) -> bool {
        self.vendor_id == BULK_VENDOR_ID
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deserializes_persisted_shape() {
        let raw = r#"{
            "id": 1717171717000,
            "timestamp": "2024-05-31T16:08:37Z",
            "vendorName": "Bulk Email (3 vendors)",
            "vendorId": "BULK",
            "status": "partial",
            "message": "Sent to 2 vendors, 1 failed"
        }"#;
        let entry: EmailLogEntry = serde_json::from_str(raw).unwrap();
        assert!(entry.is_bulk());
        assert_eq!(entry.status, EmailStatus::Partial);
        assert_eq!(entry.status.label(), "Partial");
    }

    #[test]
    fn only_pending_is_non_terminal() {
        assert!(!EmailStatus::Pending.is_terminal());
        assert!(EmailStatus::Success.is_terminal());
        assert!(EmailStatus::Partial.is_terminal());
        assert!(EmailStatus::Failed.is_terminal());
    }
}
