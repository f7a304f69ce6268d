//! Fetch-by-code and fetch-by-date lookups over the filtered list.

use super::filter::within_range;
use crate::domain::Vendor;
use chrono::NaiveDate;
use fuzzy_matcher::skim::SkimMatcherV2;
use fuzzy_matcher::FuzzyMatcher;

/// Finds the vendor whose identifier equals `code`, ignoring case and
/// surrounding whitespace. Returns `None` for blank input.
#[must_use]
pub fn find_by_code<'a>(vendors: &'a [Vendor], code: &str) -> Option<&'a Vendor> {
    let code = code.trim();
    if code.is_empty() {
        return None;
    }
    vendors.iter().find(|vendor| vendor.id.eq_ignore_ascii_case(code))
}

/// Suggests the identifier that best fuzzy-matches `code`, for "did you mean"
/// hints after a failed lookup.
///
/// Ties keep the earlier vendor in list order.
#[must_use]
pub fn suggest_code<'a>(vendors: &'a [Vendor], code: &str) -> Option<&'a str> {
    let needle = code.trim().to_lowercase();
    if needle.is_empty() {
        return None;
    }

    let matcher = SkimMatcherV2::default();
    let mut best: Option<(i64, &str)> = None;
    for vendor in vendors {
        let Some(score) = matcher.fuzzy_match(&vendor.id.to_lowercase(), &needle) else {
            continue;
        };
        if best.map_or(true, |(top, _)| score > top) {
            best = Some((score, vendor.id.as_str()));
        }
    }
    best.map(|(_, id)| id)
}

/// Counts vendors dated within `[from, to]` inclusive.
#[must_use]
pub fn count_in_range(vendors: &[Vendor], from: NaiveDate, to: NaiveDate) -> usize {
    vendors
        .iter()
        .filter(|vendor| within_range(vendor.date, Some(from), Some(to)))
        .count()
}
