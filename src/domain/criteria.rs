//! Filter criteria for the vendor table.

use super::vendor::{Category, Region, Status, VendorType};
use chrono::NaiveDate;

/// What the user has asked the table to show.
///
/// Every field is optional; an empty query or a `None` means "unconstrained".
/// The default value is therefore the identity filter.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterCriteria {
    /// Free-text query, matched case-insensitively as a substring.
    pub query: String,
    pub category: Option<Category>,
    pub vendor_type: Option<VendorType>,
    pub status: Option<Status>,
    pub region: Option<Region>,
    /// Inclusive lower date bound.
    pub date_from: Option<NaiveDate>,
    /// Inclusive upper date bound.
    pub date_to: Option<NaiveDate>,
}

impl FilterCriteria {
    /// Returns `true` if no criterion constrains the list.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.query.is_empty() && !self.has_field_filters()
    }

    /// Returns `true` if any criterion other than the text query is set.
    ///
    /// Drives the visibility of the "clear filters" hint.
    #[must_use]
    pub const fn has_field_filters(&self) -> bool {
        self.category.is_some()
            || self.vendor_type.is_some()
            || self.status.is_some()
            || self.region.is_some()
            || self.date_from.is_some()
            || self.date_to.is_some()
    }

    /// Resets every criterion except the text query.
    pub fn clear_field_filters(&mut self) {
        *self = Self {
            query: std::mem::take(&mut self.query),
            ..Self::default()
        };
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clearing_field_filters_keeps_query() {
        let mut criteria = FilterCriteria {
            query: "acme".to_string(),
            category: Some(Category::Diesel),
            region: Some(Region::North),
            date_to: NaiveDate::from_ymd_opt(2024, 2, 1),
            ..FilterCriteria::default()
        };
        assert!(criteria.has_field_filters());

        criteria.clear_field_filters();

        assert_eq!(criteria.query, "acme");
        assert!(!criteria.has_field_filters());
        assert!(!criteria.is_empty());
    }
}
