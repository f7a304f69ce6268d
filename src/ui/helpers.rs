//! Shared rendering utilities and helpers.
//!
//! Cursor positioning, fixed-width cell fitting, and query match highlighting.
//! Widths are counted in characters, not bytes, so vendor names with non-ASCII
//! letters line up.

use crate::ui::theme::Theme;

/// Moves the cursor to `row`, `col` (both 1-indexed).
pub fn position_cursor(row: usize, col: usize) {
    print!("\u{1b}[{row};{col}H");
}

/// Truncates `text` to `width` characters (ending in `…` when cut) and pads
/// the rest with spaces.
///
/// ```rust
/// use vendorizer::ui::helpers::fit;
///
/// assert_eq!(fit("Acme", 6), "Acme  ");
/// assert_eq!(fit("Acme Power", 6), "Acme …");
/// ```
#[must_use]
pub fn fit(text: &str, width: usize) -> String {
    let len = text.chars().count();
    if len <= width {
        return format!("{text}{}", " ".repeat(width - len));
    }
    if width == 0 {
        return String::new();
    }
    let mut cut: String = text.chars().take(width - 1).collect();
    cut.push('…');
    cut
}

/// Prints `text` centered in `cols`, padded on both sides.
pub fn print_centered(text: &str, cols: usize) {
    let len = text.chars().count().min(cols);
    let padding = cols.saturating_sub(len) / 2;
    print!("{}", " ".repeat(padding));
    print!("{}", text.chars().take(cols).collect::<String>());
    print!("{}", " ".repeat(cols.saturating_sub(padding + len)));
}

/// Renders `text` with `ranges` in the match highlight colors.
///
/// Ranges are `(start, end)` character indices, end exclusive. Highlighting is
/// skipped on the selected row so it doesn't fight the selection background.
pub fn render_highlighted_text(
    text: &str,
    ranges: &[(usize, usize)],
    theme: &Theme,
    is_selected: bool,
) {
    if ranges.is_empty() || is_selected {
        print!("{text}");
        return;
    }

    let chars: Vec<char> = text.chars().collect();
    let mut current_pos = 0;

    for &(start, end) in ranges {
        let start = start.min(chars.len());
        let end = end.min(chars.len());
        if start > current_pos {
            let normal_section: String = chars[current_pos..start].iter().collect();
            print!("{normal_section}");
        }

        print!("{}", Theme::fg(&theme.colors.match_highlight_fg));
        print!("{}", Theme::bg(&theme.colors.match_highlight_bg));
        let highlighted_section: String = chars[start..end].iter().collect();
        print!("{highlighted_section}");
        print!("{}", Theme::reset());
        print!("{}", Theme::fg(&theme.colors.text_normal));

        current_pos = end;
    }

    if current_pos < chars.len() {
        let remaining: String = chars[current_pos..].iter().collect();
        print!("{remaining}");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fit_counts_characters() {
        assert_eq!(fit("Śrī Ram", 8), "Śrī Ram ");
        assert_eq!(fit("Śrī Ram Diesel", 5), "Śrī …");
        assert_eq!(fit("abc", 0), "");
    }
}
