//! Email history panel renderer.

use crate::ui::helpers::{fit, position_cursor};
use crate::ui::theme::Theme;
use crate::ui::viewmodel::HistoryView;

const TIME_WIDTH: usize = 19;
const VENDOR_WIDTH: usize = 30;
const STATUS_WIDTH: usize = 8;

/// Renders the count summary, headings, and one line per entry.
pub fn render_history(row: usize, history: &HistoryView, theme: &Theme, cols: usize) -> usize {
    position_cursor(row, 1);
    print!("{}", Theme::fg(&theme.colors.text_dim));
    print!("{}", fit(&format!(" Email History  {}", history.summary), cols));
    print!("{}", Theme::reset());

    if history.rows.is_empty() {
        position_cursor(row + 2, 1);
        print!("{}", Theme::fg(&theme.colors.empty_state_fg));
        print!("{}", fit("   No emails sent yet", cols));
        print!("{}", Theme::reset());
        return row + 3;
    }

    let message_width = cols.saturating_sub(TIME_WIDTH + VENDOR_WIDTH + STATUS_WIDTH + 5);
    let mut current_row = row + 1;
    for entry in &history.rows {
        position_cursor(current_row, 1);
        print!("{}", Theme::fg(&theme.colors.text_dim));
        print!(" {} ", fit(&entry.time, TIME_WIDTH));
        print!("{}", Theme::fg(&theme.colors.text_normal));
        print!("{} ", fit(&entry.vendor, VENDOR_WIDTH));
        print!("{}", Theme::fg(theme.colors.status(entry.status)));
        print!("{} ", fit(entry.status.label(), STATUS_WIDTH));
        print!("{}", Theme::fg(&theme.colors.text_dim));
        print!("{}", fit(&entry.message, message_width));
        print!("{}", Theme::reset());
        current_row += 1;
    }
    current_row
}
