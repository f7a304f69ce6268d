//! Domain layer for the Vendorizer plugin.
//!
//! Core types with no dependency on Zellij APIs or storage:
//!
//! - [`error`]: Error type and result alias
//! - [`vendor`]: Vendor record and its categorical attributes
//! - [`criteria`]: Filter criteria for the vendor table
//! - [`email`]: Email log entries written by the notification simulator

pub mod criteria;
pub mod email;
pub mod error;
pub mod vendor;

pub use criteria::FilterCriteria;
pub use email::{EmailLogEntry, EmailStatus, BULK_VENDOR_ID};
pub use error::{Result, VendorizerError};
pub use vendor::{cycle_option, Category, Region, Status, Vendor, VendorType};
