//! Input and view mode state types for the application.
//!
//! The input mode decides how key presses are interpreted; the view decides
//! which panel fills the screen.
//!
//! ```text
//! Normal ──/──▶ Search ──Enter/Esc──▶ Normal
//!        ──d──▶ DateFilter
//!        ──g──▶ CodeLookup
//!        ──f──▶ DateLookup
//!        ──e──▶ Editing ──Enter (valid)/Esc──▶ Normal
//!        ──m/B/C──▶ Confirming ──y/n──▶ Normal
//! ```

/// Current input handling mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum InputMode {
    /// Navigation and single-key commands.
    #[default]
    Normal,

    /// Typing the free-text query; the table filters live.
    Search,

    /// Typing the date-range filter bounds.
    DateFilter,

    /// Typing a vendor code to look up.
    CodeLookup,

    /// Typing a date range to count vendors in.
    DateLookup,

    /// The vendor editor form has focus.
    Editing,

    /// A yes/no prompt is open; only confirm or decline are accepted.
    Confirming,
}

impl InputMode {
    /// Returns `true` for modes that capture printable characters as text.
    #[must_use]
    pub const fn captures_text(self) -> bool {
        matches!(
            self,
            Self::Search | Self::DateFilter | Self::CodeLookup | Self::DateLookup | Self::Editing
        )
    }
}

/// Which panel is shown.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum View {
    /// The vendor table.
    #[default]
    Vendors,

    /// The email history panel.
    History,
}

/// Which bound of a date range input has focus.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DateBound {
    #[default]
    From,
    To,
}

impl DateBound {
    #[must_use]
    pub const fn toggle(self) -> Self {
        match self {
            Self::From => Self::To,
            Self::To => Self::From,
        }
    }
}

/// Two-field text input for a date range.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DateRangeInput {
    pub from: String,
    pub to: String,
    pub focus: DateBound,
}

impl DateRangeInput {
    /// Pre-fills the input from existing bounds.
    #[must_use]
    pub fn from_bounds(from: Option<chrono::NaiveDate>, to: Option<chrono::NaiveDate>) -> Self {
        let fmt = |d: chrono::NaiveDate| d.format("%Y-%m-%d").to_string();
        Self {
            from: from.map(fmt).unwrap_or_default(),
            to: to.map(fmt).unwrap_or_default(),
            focus: DateBound::From,
        }
    }

    fn focused(&mut self) -> &mut String {
        match self.focus {
            DateBound::From => &mut self.from,
            DateBound::To => &mut self.to,
        }
    }

    pub fn push(&mut self, c: char) {
        if c.is_ascii_digit() || c == '-' {
            self.focused().push(c);
        }
    }

    pub fn pop(&mut self) {
        self.focused().pop();
    }

    /// Parses both bounds; blank is `None`.
    ///
    /// # Errors
    ///
    /// Returns the offending text if a non-blank bound isn't a `YYYY-MM-DD` date.
    pub fn parse(&self) -> Result<(Option<chrono::NaiveDate>, Option<chrono::NaiveDate>), String> {
        let parse_one = |raw: &str| -> Result<Option<chrono::NaiveDate>, String> {
            let raw = raw.trim();
            if raw.is_empty() {
                return Ok(None);
            }
            chrono::NaiveDate::parse_from_str(raw, "%Y-%m-%d")
                .map(Some)
                .map_err(|_| raw.to_string())
        };
        Ok((parse_one(&self.from)?, parse_one(&self.to)?))
    }
}
