//! Filter engine.
//!
//! A sequence of linear predicate passes over the vendor list. The output is always
//! an order-preserving subsequence of the input, and the default criteria return
//! the input unchanged.

use crate::domain::{FilterCriteria, Vendor};
use chrono::NaiveDate;

/// Applies `criteria` to `vendors`, returning the matching records in their
/// original order.
///
/// # Matching rules
///
/// - Text query: case-insensitive substring of name, identifier, category, or location
/// - Category, type, status, region: exact equality when set
/// - Date bounds: inclusive, compared as calendar dates
///
/// # Example
///
/// ```rust
/// use vendorizer::catalog::filter::apply_filter;
/// use vendorizer::domain::FilterCriteria;
///
/// let filtered = apply_filter(&[], &FilterCriteria::default());
/// assert!(filtered.is_empty());
/// ```
#[must_use]
pub fn apply_filter(vendors: &[Vendor], criteria: &FilterCriteria) -> Vec<Vendor> {
    let _span = tracing::debug_span!(
        "apply_filter",
        total_vendors = vendors.len(),
        query_len = criteria.query.len(),
        field_filters = criteria.has_field_filters()
    )
    .entered();

    let needle = criteria.query.to_lowercase();

    let filtered: Vec<Vendor> = vendors
        .iter()
        .filter(|vendor| needle.is_empty() || vendor.matches_text(&needle))
        .filter(|vendor| criteria.category.map_or(true, |c| vendor.category == c))
        .filter(|vendor| criteria.vendor_type.map_or(true, |t| vendor.vendor_type == t))
        .filter(|vendor| criteria.status.map_or(true, |s| vendor.status == s))
        .filter(|vendor| criteria.region.map_or(true, |r| vendor.region == r))
        .filter(|vendor| within_range(vendor.date, criteria.date_from, criteria.date_to))
        .cloned()
        .collect();

    tracing::debug!(filtered_count = filtered.len(), "vendor filter applied");
    filtered
}

/// Returns `true` if `date` lies in `[from, to]`; a missing bound is open.
#[must_use]
pub fn within_range(date: NaiveDate, from: Option<NaiveDate>, to: Option<NaiveDate>) -> bool {
    from.map_or(true, |from| date >= from) && to.map_or(true, |to| date <= to)
}
