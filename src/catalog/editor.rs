//! Vendor editor.
//!
//! An edit session works on a [`VendorDraft`]: a string-typed copy of one vendor
//! that the form can leave in any state, including empty or out-of-range values.
//! Validation happens on submit. A valid draft replaces the stored record with the
//! same identifier; an invalid one is rejected with per-field messages and the
//! store is left untouched.
//!
//! # Example
//!
//! ```rust
//! use vendorizer::catalog::editor::{Field, VendorEditor, SubmitOutcome};
//! use vendorizer::catalog::VendorStore;
//! # use vendorizer::domain::*;
//! # let vendor = Vendor {
//! #     id: "V-1".into(), name: "Acme".into(), category: Category::Diesel,
//! #     location: "Goa".into(), status: Status::Active, vendor_type: VendorType::Temp,
//! #     region: Region::West, date: "2024-01-01".parse().unwrap(),
//! # };
//! let mut store = VendorStore::new(vec![vendor.clone()])?;
//! let mut editor = VendorEditor::open(&vendor);
//! editor.draft_mut().set(Field::Name, "");
//!
//! assert!(matches!(editor.submit(&mut store), SubmitOutcome::Invalid { .. }));
//! assert_eq!(store.all()[0], vendor);
//! # Ok::<(), vendorizer::VendorizerError>(())
//! ```

use super::store::VendorStore;
use crate::domain::{Category, Region, Status, Vendor, VendorType, VendorizerError};
use chrono::NaiveDate;
use std::collections::BTreeMap;
use std::fmt;

/// Date format accepted by the form.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// A form field. `Id` is shown but never editable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Field {
    Id,
    Name,
    Category,
    Location,
    Status,
    Type,
    Region,
    Date,
}

impl Field {
    /// Fields the user can change, in form order.
    pub const EDITABLE: [Self; 7] = [
        Self::Name,
        Self::Category,
        Self::Location,
        Self::Status,
        Self::Type,
        Self::Region,
        Self::Date,
    ];

    /// Every field in form order, including the read-only identifier.
    pub const ALL: [Self; 8] = [
        Self::Id,
        Self::Name,
        Self::Category,
        Self::Location,
        Self::Status,
        Self::Type,
        Self::Region,
        Self::Date,
    ];

    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Id => "Vendor ID",
            Self::Name => "Name",
            Self::Category => "Category",
            Self::Location => "Location",
            Self::Status => "Status",
            Self::Type => "Type",
            Self::Region => "Region",
            Self::Date => "Date",
        }
    }

    /// Allowed values for select-style fields, `None` for free text.
    #[must_use]
    pub fn choices(self) -> Option<Vec<&'static str>> {
        match self {
            Self::Category => Some(Category::ALL.iter().map(|v| v.label()).collect()),
            Self::Status => Some(Status::ALL.iter().map(|v| v.label()).collect()),
            Self::Type => Some(VendorType::ALL.iter().map(|v| v.label()).collect()),
            Self::Region => Some(Region::ALL.iter().map(|v| v.label()).collect()),
            Self::Id | Self::Name | Self::Location | Self::Date => None,
        }
    }

    /// Next editable field, wrapping.
    #[must_use]
    pub fn next(self) -> Self {
        let idx = Self::EDITABLE.iter().position(|f| *f == self).map_or(0, |i| i + 1);
        Self::EDITABLE[idx % Self::EDITABLE.len()]
    }

    /// Previous editable field, wrapping.
    #[must_use]
    pub fn prev(self) -> Self {
        let len = Self::EDITABLE.len();
        let idx = Self::EDITABLE.iter().position(|f| *f == self).unwrap_or(0);
        Self::EDITABLE[(idx + len - 1) % len]
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// String-typed working copy of a vendor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VendorDraft {
    id: String,
    name: String,
    category: String,
    location: String,
    status: String,
    vendor_type: String,
    region: String,
    date: String,
}

impl VendorDraft {
    /// Seeds a draft from an existing record.
    #[must_use]
    pub fn from_vendor(vendor: &Vendor) -> Self {
        Self {
            id: vendor.id.clone(),
            name: vendor.name.clone(),
            category: vendor.category.label().to_string(),
            location: vendor.location.clone(),
            status: vendor.status.label().to_string(),
            vendor_type: vendor.vendor_type.label().to_string(),
            region: vendor.region.label().to_string(),
            date: vendor.date.format(DATE_FORMAT).to_string(),
        }
    }

    /// Identifier of the record being edited.
    #[must_use]
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Current raw value of `field`.
    #[must_use]
    pub fn get(&self, field: Field) -> &str {
        match field {
            Field::Id => &self.id,
            Field::Name => &self.name,
            Field::Category => &self.category,
            Field::Location => &self.location,
            Field::Status => &self.status,
            Field::Type => &self.vendor_type,
            Field::Region => &self.region,
            Field::Date => &self.date,
        }
    }

    fn slot(&mut self, field: Field) -> Option<&mut String> {
        match field {
            Field::Id => None,
            Field::Name => Some(&mut self.name),
            Field::Category => Some(&mut self.category),
            Field::Location => Some(&mut self.location),
            Field::Status => Some(&mut self.status),
            Field::Type => Some(&mut self.vendor_type),
            Field::Region => Some(&mut self.region),
            Field::Date => Some(&mut self.date),
        }
    }

    /// Overwrites `field`. Writes to [`Field::Id`] are ignored.
    pub fn set(&mut self, field: Field, value: impl Into<String>) {
        if let Some(slot) = self.slot(field) {
            *slot = value.into();
        }
    }

    /// Appends a typed character to a text field.
    pub fn push_char(&mut self, field: Field, c: char) {
        if field.choices().is_some() {
            return;
        }
        if let Some(slot) = self.slot(field) {
            slot.push(c);
        }
    }

    /// Removes the last character of a text field, or clears a select field.
    pub fn pop_char(&mut self, field: Field) {
        let is_select = field.choices().is_some();
        if let Some(slot) = self.slot(field) {
            if is_select {
                slot.clear();
            } else {
                slot.pop();
            }
        }
    }

    /// Steps a select field through its choices, with the empty "Select …" option
    /// sitting between the last and first value.
    pub fn cycle(&mut self, field: Field, forward: bool) {
        let Some(choices) = field.choices() else {
            return;
        };
        let Some(slot) = self.slot(field) else {
            return;
        };

        let mut options: Vec<&str> = vec![""];
        options.extend(choices);
        let len = options.len();
        let current = options.iter().position(|o| *o == slot.as_str()).unwrap_or(0);
        let next = if forward {
            (current + 1) % len
        } else {
            (current + len - 1) % len
        };
        *slot = options[next].to_string();
    }

    /// Validates every editable field and builds the record.
    ///
    /// # Errors
    ///
    /// Returns the full set of field errors; never stops at the first one.
    pub fn validate(&self) -> Result<Vendor, FieldErrors> {
        let mut errors = FieldErrors::default();

        if self.name.trim().is_empty() {
            errors.insert(Field::Name, "Name is required");
        }
        if self.location.trim().is_empty() {
            errors.insert(Field::Location, "Location is required");
        }

        let category = parse_choice::<Category>(&self.category, Field::Category, &mut errors);
        let status = parse_choice::<Status>(&self.status, Field::Status, &mut errors);
        let vendor_type = parse_choice::<VendorType>(&self.vendor_type, Field::Type, &mut errors);
        let region = parse_choice::<Region>(&self.region, Field::Region, &mut errors);

        let date = if self.date.trim().is_empty() {
            errors.insert(Field::Date, "Date is required");
            None
        } else {
            NaiveDate::parse_from_str(self.date.trim(), DATE_FORMAT)
                .map_err(|_| errors.insert(Field::Date, "Date must be a calendar date (YYYY-MM-DD)"))
                .ok()
        };

        match (category, status, vendor_type, region, date) {
            (Some(category), Some(status), Some(vendor_type), Some(region), Some(date))
                if errors.is_empty() =>
            {
                Ok(Vendor {
                    id: self.id.clone(),
                    name: self.name.clone(),
                    category,
                    location: self.location.clone(),
                    status,
                    vendor_type,
                    region,
                    date,
                })
            }
            _ => Err(errors),
        }
    }
}

fn parse_choice<T: std::str::FromStr>(raw: &str, field: Field, errors: &mut FieldErrors) -> Option<T> {
    if raw.is_empty() {
        errors.insert(field, format!("{} is required", field.label()));
        return None;
    }
    raw.parse::<T>()
        .map_err(|_| {
            let allowed = field.choices().unwrap_or_default().join(", ");
            errors.insert(field, format!("{} must be one of {allowed}", field.label()));
        })
        .ok()
}

/// Per-field validation messages.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldErrors(BTreeMap<Field, String>);

impl FieldErrors {
    fn insert(&mut self, field: Field, message: impl Into<String>) {
        self.0.insert(field, message.into());
    }

    #[must_use]
    pub fn get(&self, field: Field) -> Option<&str> {
        self.0.get(&field).map(String::as_str)
    }

    /// Drops the message for `field`; called as soon as the user touches it.
    pub fn clear(&mut self, field: Field) {
        self.0.remove(&field);
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (Field, &str)> {
        self.0.iter().map(|(field, msg)| (*field, msg.as_str()))
    }
}

/// Result of [`VendorEditor::submit`].
#[derive(Debug)]
pub enum SubmitOutcome {
    /// The store now holds this record.
    Saved(Vendor),
    /// Validation failed; messages are on the editor.
    Invalid { error_count: usize },
    /// The draft was valid but the store refused it.
    Rejected(VendorizerError),
}

/// An open edit session for one vendor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VendorEditor {
    draft: VendorDraft,
    focus: Field,
    errors: FieldErrors,
}

impl VendorEditor {
    /// Opens the editor on `vendor` with focus on the first editable field.
    #[must_use]
    pub fn open(vendor: &Vendor) -> Self {
        tracing::debug!(vendor_id = %vendor.id, "opening vendor editor");
        Self {
            draft: VendorDraft::from_vendor(vendor),
            focus: Field::Name,
            errors: FieldErrors::default(),
        }
    }

    #[must_use]
    pub const fn draft(&self) -> &VendorDraft {
        &self.draft
    }

    pub fn draft_mut(&mut self) -> &mut VendorDraft {
        &mut self.draft
    }

    #[must_use]
    pub const fn focus(&self) -> Field {
        self.focus
    }

    #[must_use]
    pub const fn errors(&self) -> &FieldErrors {
        &self.errors
    }

    pub fn focus_next(&mut self) {
        self.focus = self.focus.next();
    }

    pub fn focus_prev(&mut self) {
        self.focus = self.focus.prev();
    }

    /// Types into the focused field.
    pub fn type_char(&mut self, c: char) {
        self.draft.push_char(self.focus, c);
        self.errors.clear(self.focus);
    }

    /// Deletes from the focused field.
    pub fn backspace(&mut self) {
        self.draft.pop_char(self.focus);
        self.errors.clear(self.focus);
    }

    /// Cycles the focused select field.
    pub fn cycle_focused(&mut self, forward: bool) {
        self.draft.cycle(self.focus, forward);
        self.errors.clear(self.focus);
    }

    /// Validates the draft and, if valid, writes it to `store`.
    pub fn submit(&mut self, store: &mut VendorStore) -> SubmitOutcome {
        let _span = tracing::debug_span!("editor_submit", vendor_id = %self.draft.id).entered();

        match self.draft.validate() {
            Ok(vendor) => match store.replace(vendor.clone()) {
                Ok(()) => {
                    self.errors = FieldErrors::default();
                    tracing::debug!("vendor update saved");
                    SubmitOutcome::Saved(vendor)
                }
                Err(e) => {
                    tracing::debug!(error = %e, "store rejected vendor update");
                    SubmitOutcome::Rejected(e)
                }
            },
            Err(errors) => {
                let error_count = errors.len();
                tracing::debug!(error_count, "vendor update failed validation");
                self.errors = errors;
                if let Some((first, _)) = self.errors.iter().next() {
                    self.focus = first;
                }
                SubmitOutcome::Invalid { error_count }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn vendor(id: &str) -> Vendor {
        Vendor {
            id: id.to_string(),
            name: "Sigma Diesel".to_string(),
            category: Category::Diesel,
            location: "Nagpur".to_string(),
            status: Status::Inactive,
            vendor_type: VendorType::Temp,
            region: Region::East,
            date: "2023-11-30".parse().unwrap(),
        }
    }

    #[test]
    fn untouched_draft_validates_to_original() {
        let original = vendor("V-9");
        assert_eq!(VendorDraft::from_vendor(&original).validate().unwrap(), original);
    }

    #[test]
    fn every_empty_field_is_reported() {
        let mut draft = VendorDraft::from_vendor(&vendor("V-9"));
        for field in Field::EDITABLE {
            draft.set(field, "");
        }
        let errors = draft.validate().unwrap_err();
        assert_eq!(errors.len(), Field::EDITABLE.len());
        assert_eq!(errors.get(Field::Name), Some("Name is required"));
        assert_eq!(errors.get(Field::Type), Some("Type is required"));
        assert_eq!(errors.get(Field::Id), None);
    }

    #[test]
    fn out_of_range_choice_is_rejected() {
        let mut draft = VendorDraft::from_vendor(&vendor("V-9"));
        draft.set(Field::Region, "Central");
        let errors = draft.validate().unwrap_err();
        assert_eq!(
            errors.get(Field::Region),
            Some("Region must be one of North, South, East, West")
        );
    }

    #[test]
    fn malformed_date_is_rejected() {
        let mut draft = VendorDraft::from_vendor(&vendor("V-9"));
        draft.set(Field::Date, "2023-13-01");
        assert!(draft.validate().unwrap_err().get(Field::Date).is_some());
    }

    #[test]
    fn identifier_cannot_be_changed() {
        let mut draft = VendorDraft::from_vendor(&vendor("V-9"));
        draft.set(Field::Id, "V-10");
        draft.push_char(Field::Id, 'x');
        assert_eq!(draft.id(), "V-9");
    }

    #[test]
    fn cycling_passes_through_empty_option() {
        let mut draft = VendorDraft::from_vendor(&vendor("V-9"));
        assert_eq!(draft.get(Field::Status), "Inactive");
        draft.cycle(Field::Status, true);
        assert_eq!(draft.get(Field::Status), "");
        draft.cycle(Field::Status, true);
        assert_eq!(draft.get(Field::Status), "Active");
        draft.cycle(Field::Status, false);
        assert_eq!(draft.get(Field::Status), "");
    }

    #[test]
    fn invalid_submit_leaves_store_and_focuses_first_error() {
        let original = vendor("V-9");
        let mut store = VendorStore::new(vec![original.clone()]).unwrap();
        let mut editor = VendorEditor::open(&original);
        editor.focus_next();
        editor.draft_mut().set(Field::Location, " ");

        let outcome = editor.submit(&mut store);

        assert!(matches!(outcome, SubmitOutcome::Invalid { error_count: 1 }));
        assert_eq!(store.all(), &[original]);
        assert_eq!(editor.focus(), Field::Location);
    }

    #[test]
    fn typing_clears_that_fields_error() {
        let original = vendor("V-9");
        let mut store = VendorStore::new(vec![original.clone()]).unwrap();
        let mut editor = VendorEditor::open(&original);
        editor.draft_mut().set(Field::Name, "");
        let _ = editor.submit(&mut store);
        assert!(editor.errors().get(Field::Name).is_some());

        editor.type_char('Z');

        assert!(editor.errors().get(Field::Name).is_none());
        assert_eq!(editor.draft().get(Field::Name), "Z");
    }

    #[test]
    fn valid_submit_replaces_only_matching_record() {
        let mut other = vendor("V-1");
        other.name = "Other".to_string();
        let target = vendor("V-9");
        let mut store = VendorStore::new(vec![other.clone(), target.clone()]).unwrap();

        let mut editor = VendorEditor::open(&target);
        editor.draft_mut().set(Field::Name, "Sigma Diesel Pvt");
        let outcome = editor.submit(&mut store);

        assert!(matches!(outcome, SubmitOutcome::Saved(ref v) if v.name == "Sigma Diesel Pvt"));
        assert_eq!(store.all()[0], other);
        assert_eq!(store.get("V-9").unwrap().name, "Sigma Diesel Pvt");
    }

    #[test]
    fn field_navigation_skips_identifier() {
        assert_eq!(Field::Date.next(), Field::Name);
        assert_eq!(Field::Name.prev(), Field::Date);
        assert!(!Field::EDITABLE.contains(&Field::Id));
    }
}
