//! Error types for the Vendorizer plugin.
//!
//! This module defines the centralized error type [`VendorizerError`] and a type alias
//! [`Result`] for error handling throughout the plugin. Field-level validation problems
//! are not errors in this sense; they are reported through
//! [`FieldErrors`](crate::catalog::editor::FieldErrors) so the form can display them.

use thiserror::Error;

/// The main error type for Vendorizer plugin operations.
///
/// Every failure is caught at the boundary of the operation that raised it and
/// turned into a notice (and, for deliveries, an email log entry). Nothing here
/// is allowed to take the view down.
///
/// # Examples
///
/// ```
/// use vendorizer::domain::VendorizerError;
///
/// fn lookup(code: &str) -> Result<(), VendorizerError> {
///     Err(VendorizerError::VendorNotFound(code.to_string()))
/// }
///
/// assert!(lookup("V-404").is_err());
/// ```
#[derive(Debug, Error)]
pub enum VendorizerError {
    /// Storage operation failed.
    ///
    /// Occurs when reading from or writing to the key-value backend fails, or when
    /// a persisted value cannot be decoded.
    #[error("Storage error: {0}")]
    Storage(String),

    /// Filesystem or I/O operation failed.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Theme parsing or application failed.
    #[error("Theme error: {0}")]
    Theme(String),

    /// Communication with the background worker failed.
    #[error("Worker communication error: {0}")]
    Worker(String),

    /// Configuration or seed data is invalid.
    #[error("Configuration error: {0}")]
    Config(String),

    /// Spreadsheet export failed.
    #[error("Export error: {0}")]
    Export(String),

    /// Two seed records share an identifier.
    #[error("Duplicate vendor identifier: {0}")]
    DuplicateVendor(String),

    /// No vendor carries the requested identifier.
    #[error("Vendor not found: {0}")]
    VendorNotFound(String),

    /// A single-vendor send is already in flight for this identifier.
    #[error("Email already sending to vendor {0}")]
    AlreadySending(String),

    /// A bulk send is already running.
    #[error("Bulk email already in progress")]
    BulkInProgress,

    /// Bulk send was requested with nothing to send to.
    #[error("No vendors to send emails to")]
    NoRecipients,

    /// The simulated transport raised an error.
    #[error("Delivery error: {0}")]
    Delivery(String),
}

impl From<csv::Error> for VendorizerError {
    fn from(err: csv::Error) -> Self {
        Self::Export(err.to_string())
    }
}

/// A specialized `Result` type for Vendorizer operations.
pub type Result<T> = std::result::Result<T, VendorizerError>;
