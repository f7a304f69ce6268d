//! Theme management and ANSI escape sequence generation.
//!
//! Colors come from built-in Catppuccin palettes or a custom TOML file and are
//! turned into 24-bit ANSI escapes at render time.
//!
//! # Built-in Themes
//!
//! - `catppuccin-mocha`: Dark theme with warm tones (default)
//! - `catppuccin-latte`: Light theme with soft pastels
//! - `catppuccin-frappe`: Cool dark theme
//! - `catppuccin-macchiato`: Warm dark theme
//!
//! # TOML Format
//!
//! ```toml
//! name = "my-theme"
//!
//! [colors]
//! header_fg = "#cba6f7"
//! selection_fg = "#1e1e2e"
//! selection_bg = "#f5c2e7"
//! text_normal = "#cdd6f4"
//! text_dim = "#6c7086"
//! border = "#45475a"
//! input_border = "#f5c2e7"
//! match_highlight_fg = "#1e1e2e"
//! match_highlight_bg = "#f9e2af"
//! empty_state_fg = "#89b4fa"
//! success_fg = "#a6e3a1"
//! error_fg = "#f38ba8"
//! warning_fg = "#f9e2af"
//! info_fg = "#89dceb"
//! ```

use crate::app::NoticeLevel;
use crate::domain::{EmailStatus, VendorizerError};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Name of the theme used when none is configured.
pub const DEFAULT_THEME: &str = "catppuccin-mocha";

/// Color scheme configuration for UI rendering.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Theme {
    /// Human-readable theme name.
    pub name: String,
    /// Color palette for all UI elements.
    pub colors: ThemeColors,
}

/// Color definitions for all UI elements, as hex strings (e.g. `"#cdd6f4"`).
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ThemeColors {
    pub header_fg: String,
    /// Optional header background color.
    #[serde(default)]
    pub header_bg: Option<String>,

    pub selection_fg: String,
    pub selection_bg: String,

    pub text_normal: String,
    /// Footer, secondary info, and placeholders.
    pub text_dim: String,

    /// Separator lines.
    pub border: String,

    /// Frame of the active text input and of dialogs.
    pub input_border: String,
    /// Query match highlight foreground.
    pub match_highlight_fg: String,
    /// Query match highlight background.
    pub match_highlight_bg: String,

    pub empty_state_fg: String,

    /// Sent entries and success notices.
    pub success_fg: String,
    /// Failed entries, error notices, and field errors.
    pub error_fg: String,
    /// Pending and partial entries, the "Sending..." marker, and the progress bar.
    pub warning_fg: String,
    /// Informational notices.
    pub info_fg: String,
}

impl ThemeColors {
    /// Monochrome palette used only if a built-in theme fails to parse.
    fn plain() -> Self {
        let white = "#ffffff".to_string();
        let grey = "#808080".to_string();
        let black = "#000000".to_string();
        Self {
            header_fg: white.clone(),
            header_bg: None,
            selection_fg: black.clone(),
            selection_bg: white.clone(),
            text_normal: white.clone(),
            text_dim: grey.clone(),
            border: grey.clone(),
            input_border: white.clone(),
            match_highlight_fg: black,
            match_highlight_bg: grey,
            empty_state_fg: white.clone(),
            success_fg: white.clone(),
            error_fg: white.clone(),
            warning_fg: white.clone(),
            info_fg: white,
        }
    }

    /// Color for an email log status.
    #[must_use]
    pub fn status(&self, status: EmailStatus) -> &str {
        match status {
            EmailStatus::Success => &self.success_fg,
            EmailStatus::Failed => &self.error_fg,
            EmailStatus::Pending | EmailStatus::Partial => &self.warning_fg,
        }
    }

    /// Color for a notice level.
    #[must_use]
    pub fn notice(&self, level: NoticeLevel) -> &str {
        match level {
            NoticeLevel::Info => &self.info_fg,
            NoticeLevel::Success => &self.success_fg,
            NoticeLevel::Error => &self.error_fg,
        }
    }
}

impl Theme {
    /// Loads a built-in theme by name; `None` if the name is unknown.
    ///
    /// # Example
    ///
    /// ```rust
    /// use vendorizer::ui::Theme;
    ///
    /// let theme = Theme::from_name("catppuccin-latte").unwrap();
    /// assert_eq!(theme.name, "catppuccin-latte");
    /// assert!(Theme::from_name("solarized").is_none());
    /// ```
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        let toml_str = match name {
            "catppuccin-mocha" => include_str!("../../themes/catppuccin-mocha.toml"),
            "catppuccin-latte" => include_str!("../../themes/catppuccin-latte.toml"),
            "catppuccin-frappe" => include_str!("../../themes/catppuccin-frappe.toml"),
            "catppuccin-macchiato" => include_str!("../../themes/catppuccin-macchiato.toml"),
            _ => return None,
        };

        match toml::from_str(toml_str) {
            Ok(theme) => Some(theme),
            Err(e) => {
                tracing::error!(theme = name, error = %e, "built-in theme failed to parse");
                None
            }
        }
    }

    /// Loads a theme from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns [`VendorizerError::Theme`] if the file cannot be read or the TOML
    /// doesn't describe a complete palette.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, VendorizerError> {
        let contents = fs::read_to_string(path)
            .map_err(|e| VendorizerError::Theme(format!("failed to read theme file: {e}")))?;

        toml::from_str(&contents)
            .map_err(|e| VendorizerError::Theme(format!("failed to parse theme TOML: {e}")))
    }

    /// Parses `#rrggbb`; malformed input becomes white.
    fn hex_to_rgb(hex: &str) -> (u8, u8, u8) {
        let hex = hex.trim_start_matches('#').trim();

        if hex.len() != 6 || !hex.is_ascii() {
            return (255, 255, 255);
        }

        let r = u8::from_str_radix(&hex[0..2], 16).unwrap_or(255);
        let g = u8::from_str_radix(&hex[2..4], 16).unwrap_or(255);
        let b = u8::from_str_radix(&hex[4..6], 16).unwrap_or(255);

        (r, g, b)
    }

    /// ANSI 24-bit foreground escape for `hex`.
    #[must_use]
    pub fn fg(hex: &str) -> String {
        let (r, g, b) = Self::hex_to_rgb(hex);
        format!("\u{001b}[38;2;{r};{g};{b}m")
    }

    /// ANSI 24-bit background escape for `hex`.
    #[must_use]
    pub fn bg(hex: &str) -> String {
        let (r, g, b) = Self::hex_to_rgb(hex);
        format!("\u{001b}[48;2;{r};{g};{b}m")
    }

    #[must_use]
    pub const fn bold() -> &'static str {
        "\u{001b}[1m"
    }

    #[must_use]
    pub const fn dim() -> &'static str {
        "\u{001b}[2m"
    }

    /// Clears all styling.
    #[must_use]
    pub const fn reset() -> &'static str {
        "\u{001b}[0m"
    }
}

impl Default for Theme {
    /// Catppuccin Mocha, or a plain palette if it somehow fails to parse.
    fn default() -> Self {
        Self::from_name(DEFAULT_THEME).unwrap_or_else(|| Self {
            name: "plain".to_string(),
            colors: ThemeColors::plain(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn every_builtin_theme_parses() {
        for name in [
            "catppuccin-mocha",
            "catppuccin-latte",
            "catppuccin-frappe",
            "catppuccin-macchiato",
        ] {
            let theme = Theme::from_name(name).unwrap_or_else(|| panic!("{name} failed"));
            assert_eq!(theme.name, name);
        }
        assert_eq!(Theme::default().name, DEFAULT_THEME);
    }

    #[test]
    fn hex_conversion_tolerates_garbage() {
        assert_eq!(Theme::fg("#010203"), "\u{1b}[38;2;1;2;3m");
        assert_eq!(Theme::bg("nope"), "\u{1b}[48;2;255;255;255m");
        assert_eq!(Theme::fg("#zz0000"), "\u{1b}[38;2;255;0;0m");
    }

    #[test]
    fn custom_theme_file_loads_or_reports() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(include_str!("../../themes/catppuccin-latte.toml").as_bytes())
            .unwrap();
        assert_eq!(Theme::from_file(file.path()).unwrap().name, "catppuccin-latte");

        let mut broken = tempfile::NamedTempFile::new().unwrap();
        broken.write_all(b"name = \"half\"\n").unwrap();
        assert!(matches!(
            Theme::from_file(broken.path()),
            Err(VendorizerError::Theme(_))
        ));
    }
}
