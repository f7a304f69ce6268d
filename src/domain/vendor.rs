//! Vendor domain model.
//!
//! A [`Vendor`] is one row of the admin table. Its identifier is the correlation key
//! for edits, sends, and lookups and never changes after seeding. The categorical
//! attributes are closed enums so the filter engine and the editor can compare them
//! exactly.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Generates a closed, string-backed enum with `Display`, `FromStr`, and a fixed
/// `ALL` listing in declaration order.
///
/// The string form is the label shown in the UI and written to exports, so serde
/// uses the same spelling.
macro_rules! labelled_enum {
    (
        $(#[$meta:meta])*
        $name:ident { $($variant:ident => $label:literal),+ $(,)? }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        pub enum $name {
            $(
                #[serde(rename = $label)]
                $variant,
            )+
        }

        impl $name {
            /// Every variant, in display order.
            pub const ALL: &'static [Self] = &[$(Self::$variant),+];

            /// Returns the display label.
            #[must_use]
            pub const fn label(self) -> &'static str {
                match self {
                    $(Self::$variant => $label,)+
                }
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.label())
            }
        }

        impl FromStr for $name {
            type Err = String;

            fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
                match s {
                    $($label => Ok(Self::$variant),)+
                    other => Err(format!("unknown {}: {other:?}", stringify!($name))),
                }
            }
        }
    };
}

labelled_enum! {
    /// Trade category of a vendor.
    Category {
        Electrical => "Electrical",
        Mechanical => "Mechanical",
        Diesel => "Diesel",
    }
}

labelled_enum! {
    /// Whether a vendor is currently engaged.
    Status {
        Active => "Active",
        Inactive => "Inactive",
    }
}

labelled_enum! {
    /// Contract type: registered in SAP or a temporary vendor.
    VendorType {
        Sap => "SAP",
        Temp => "Temp",
    }
}

labelled_enum! {
    /// Sales region.
    Region {
        North => "North",
        South => "South",
        East => "East",
        West => "West",
    }
}

/// A vendor record.
///
/// Field order matches the export column order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Vendor {
    pub id: String,
    pub name: String,
    pub category: Category,
    pub location: String,
    pub status: Status,
    #[serde(rename = "type")]
    pub vendor_type: VendorType,
    pub region: Region,
    pub date: NaiveDate,
}

impl Vendor {
    /// Returns `true` if `needle` (already lowercased) occurs in the name, identifier,
    /// category, or location, ignoring case.
    #[must_use]
    pub fn matches_text(&self, needle: &str) -> bool {
        [
            self.name.as_str(),
            self.id.as_str(),
            self.category.label(),
            self.location.as_str(),
        ]
        .iter()
        .any(|field| field.to_lowercase().contains(needle))
    }

    /// Short "name (id)" form used in confirmation prompts.
    #[must_use]
    pub fn short_label(&self) -> String {
        format!("{} ({})", self.name, self.id)
    }
}

/// Steps through `Option<T>` over `all`: `None` → first → … → last → `None`.
///
/// Used by the filter bar and the editor to cycle a categorical value with a
/// single key, where `None` stands for "all" or "unset".
#[must_use]
pub fn cycle_option<T: Copy + PartialEq>(current: Option<T>, all: &[T], forward: bool) -> Option<T> {
    let position = current.and_then(|value| all.iter().position(|candidate| *candidate == value));
    match (position, forward) {
        (None, true) => all.first().copied(),
        (None, false) => all.last().copied(),
        (Some(idx), true) => all.get(idx + 1).copied(),
        (Some(0), false) => None,
        (Some(idx), false) => all.get(idx - 1).copied(),
    }
}
