//! Filter bar and single-line input renderers.
//!
//! The filter bar always shows the query and the field filters so the user can
//! see why rows are missing. While the query is being typed it is framed in
//! the input color and followed by a cursor block.

use crate::ui::helpers::{fit, position_cursor};
use crate::ui::theme::Theme;
use crate::ui::viewmodel::{FilterBarInfo, InputLineInfo};

const CURSOR: &str = "▏";

/// Renders the query and the filter chips on one line.
pub fn render_filter_bar(row: usize, bar: &FilterBarInfo, theme: &Theme, cols: usize) -> usize {
    let query = if bar.is_editing_query {
        format!(" / {}{CURSOR}", bar.query)
    } else if bar.query.is_empty() {
        " / search".to_string()
    } else {
        format!(" / {}", bar.query)
    };
    let mut rest = format!("  {}", bar.chips.join("  "));
    if bar.show_clear_hint {
        rest.push_str("  (x: clear)");
    }

    let query_len = query.chars().count().min(cols);

    position_cursor(row, 1);
    if bar.is_editing_query {
        print!("{}", Theme::bold());
        print!("{}", Theme::fg(&theme.colors.input_border));
    } else if bar.query.is_empty() {
        print!("{}", Theme::fg(&theme.colors.text_dim));
    } else {
        print!("{}", Theme::fg(&theme.colors.text_normal));
    }
    print!("{}", fit(&query, query_len));
    print!("{}", Theme::reset());

    print!("{}", Theme::fg(&theme.colors.text_dim));
    print!("{}", fit(&rest, cols.saturating_sub(query_len)));
    print!("{}", Theme::reset());
    row + 1
}

/// Renders an open code or date prompt.
pub fn render_input_line(row: usize, input: &InputLineInfo, theme: &Theme, cols: usize) -> usize {
    let label = format!(" {}: ", input.label);
    let label_len = label.chars().count().min(cols);

    position_cursor(row, 1);
    print!("{}", Theme::bold());
    print!("{}", Theme::fg(&theme.colors.input_border));
    print!("{}", fit(&label, label_len));
    print!("{}", Theme::reset());
    print!("{}", Theme::fg(&theme.colors.text_normal));
    print!(
        "{}",
        fit(&format!("{}{CURSOR}", input.text), cols.saturating_sub(label_len))
    );
    print!("{}", Theme::reset());
    row + 1
}
