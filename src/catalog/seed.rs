//! Seed data for the vendor store.
//!
//! The plugin ships with a bundled vendor list. A `vendors_file` option points
//! at a JSON file of the same shape to replace it.

use super::store::VendorStore;
use crate::domain::{Result, Vendor, VendorizerError};
use std::path::Path;

const BUNDLED_VENDORS: &str = include_str!("../../data/vendors.json");

/// Parses a JSON array of vendor records.
///
/// # Errors
///
/// Returns [`VendorizerError::Config`] when the document is not a vendor list and
/// [`VendorizerError::DuplicateVendor`] when two records share an identifier.
pub fn parse_vendors(raw: &str) -> Result<VendorStore> {
    let vendors: Vec<Vendor> = serde_json::from_str(raw)
        .map_err(|e| VendorizerError::Config(format!("Invalid vendor seed data: {e}")))?;
    VendorStore::new(vendors)
}

/// Loads the bundled vendor list.
///
/// # Errors
///
/// Only fails if the bundled document itself is malformed.
pub fn bundled() -> Result<VendorStore> {
    parse_vendors(BUNDLED_VENDORS)
}

/// Loads vendors from `path`.
///
/// # Errors
///
/// Returns an I/O error if the file can't be read, otherwise as [`parse_vendors`].
#[tracing::instrument(level = "debug", fields(path = %path.display()))]
pub fn from_file(path: &Path) -> Result<VendorStore> {
    let raw = std::fs::read_to_string(path)?;
    let store = parse_vendors(&raw)?;
    tracing::debug!(vendor_count = store.len(), "loaded vendor seed file");
    Ok(store)
}

/// Loads the override file when given, falling back to the bundled list if it
/// is missing or invalid.
#[must_use]
pub fn load(override_path: Option<&Path>) -> VendorStore {
    if let Some(path) = override_path {
        match from_file(path) {
            Ok(store) => return store,
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "falling back to bundled vendors");
            }
        }
    }
    bundled().unwrap_or_else(|e| {
        tracing::error!(error = %e, "bundled vendor list is invalid");
        VendorStore::default()
    })
}
