//! In-memory vendor store.
//!
//! Holds the full vendor list for the session. Records are seeded once, replaced
//! whole by the editor, and never deleted.

use crate::domain::error::{Result, VendorizerError};
use crate::domain::Vendor;
use std::collections::HashSet;

/// The session's vendor records in seed order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VendorStore {
    vendors: Vec<Vendor>,
}

impl VendorStore {
    /// Builds a store from seed records.
    ///
    /// # Errors
    ///
    /// Returns [`VendorizerError::DuplicateVendor`] if two records share an identifier.
    pub fn new(vendors: Vec<Vendor>) -> Result<Self> {
        let mut seen = HashSet::with_capacity(vendors.len());
        for vendor in &vendors {
            if !seen.insert(vendor.id.as_str()) {
                return Err(VendorizerError::DuplicateVendor(vendor.id.clone()));
            }
        }

        tracing::debug!(vendor_count = vendors.len(), "vendor store seeded");
        Ok(Self { vendors })
    }

    /// All records in seed order.
    #[must_use]
    pub fn all(&self) -> &[Vendor] {
        &self.vendors
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.vendors.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.vendors.is_empty()
    }

    /// Looks up a record by its exact identifier.
    #[must_use]
    pub fn get(&self, id: &str) -> Option<&Vendor> {
        self.vendors.iter().find(|vendor| vendor.id == id)
    }

    /// Replaces the record whose identifier matches `vendor.id`.
    ///
    /// Position in the list is preserved; no other record is touched.
    ///
    /// # Errors
    ///
    /// Returns [`VendorizerError::VendorNotFound`] if no record has that identifier.
    pub fn replace(&mut self, vendor: Vendor) -> Result<()> {
        let _span = tracing::debug_span!("store_replace", vendor_id = %vendor.id).entered();

        let slot = self
            .vendors
            .iter_mut()
            .find(|existing| existing.id == vendor.id)
            .ok_or_else(|| VendorizerError::VendorNotFound(vendor.id.clone()))?;

        *slot = vendor;
        tracing::debug!("vendor replaced");
        Ok(())
    }
}
