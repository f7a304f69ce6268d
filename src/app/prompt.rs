//! Yes/no confirmation prompts.
//!
//! Sends and history clearing only happen after explicit confirmation. The
//! prompt captures what it is about to act on, so the action uses exactly what
//! the user was shown even if the table changes underneath.

use crate::domain::Vendor;

/// Recipients listed by name in the bulk preview.
pub const BULK_PREVIEW_LIMIT: usize = 5;

/// An open confirmation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Prompt {
    /// Send one notification.
    SendEmail { vendor: Vendor },
    /// Send to every vendor in the filtered list.
    BulkEmail { recipients: Vec<Vendor> },
    /// Delete the whole email history.
    ClearHistory,
}

impl Prompt {
    #[must_use]
    pub const fn title(&self) -> &'static str {
        match self {
            Self::SendEmail { .. } => "Send Email",
            Self::BulkEmail { .. } => "Bulk Email Confirmation",
            Self::ClearHistory => "Clear Email History",
        }
    }

    /// Body lines shown under the title.
    #[must_use]
    pub fn lines(&self) -> Vec<String> {
        match self {
            Self::SendEmail { vendor } => vec![
                format!("Send email notification to {}?", vendor.short_label()),
                format!("{} - {}", vendor.category, vendor.location),
            ],
            Self::BulkEmail { recipients } => {
                let mut lines = vec![
                    format!("Send bulk emails to {} vendors?", recipients.len()),
                    String::new(),
                ];
                lines.extend(
                    recipients
                        .iter()
                        .take(BULK_PREVIEW_LIMIT)
                        .map(|vendor| format!("  {}", vendor.short_label())),
                );
                if recipients.len() > BULK_PREVIEW_LIMIT {
                    lines.push(format!(
                        "  ... and {} more vendors",
                        recipients.len() - BULK_PREVIEW_LIMIT
                    ));
                }
                lines
            }
            Self::ClearHistory => vec![
                "Clear all email history?".to_string(),
                "This action cannot be undone.".to_string(),
            ],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Category, Region, Status, VendorType};

    fn vendor(i: usize) -> Vendor {
        Vendor {
            id: format!("V{i}"),
            name: format!("Vendor {i}"),
            category: Category::Mechanical,
            location: "Vizag".to_string(),
            status: Status::Active,
            vendor_type: VendorType::Temp,
            region: Region::East,
            date: "2024-01-01".parse().unwrap(),
        }
    }

    #[test]
    fn bulk_preview_lists_five_then_summarises() {
        let prompt = Prompt::BulkEmail {
            recipients: (0..8).map(vendor).collect(),
        };
        let lines = prompt.lines();

        assert_eq!(lines[0], "Send bulk emails to 8 vendors?");
        assert_eq!(lines[2], "  Vendor 0 (V0)");
        assert_eq!(lines[6], "  Vendor 4 (V4)");
        assert_eq!(lines[7], "  ... and 3 more vendors");
        assert_eq!(lines.len(), 8);
    }

    #[test]
    fn short_bulk_has_no_overflow_line() {
        let prompt = Prompt::BulkEmail {
            recipients: (0..5).map(vendor).collect(),
        };
        assert!(!prompt.lines().iter().any(|l| l.contains("more vendors")));
    }
}
