//! Confirmation dialog renderer.
//!
//! Drawn last, as a framed box centered over whatever is underneath.

use crate::ui::helpers::{fit, position_cursor};
use crate::ui::theme::Theme;
use crate::ui::viewmodel::DialogInfo;

const MIN_WIDTH: usize = 40;

pub fn render_dialog(dialog: &DialogInfo, theme: &Theme, rows: usize, cols: usize) {
    let content_width = dialog
        .lines
        .iter()
        .map(|line| line.chars().count())
        .chain([dialog.title.chars().count(), dialog.hint.chars().count()])
        .max()
        .unwrap_or(0)
        .max(MIN_WIDTH)
        .min(cols.saturating_sub(6));
    let box_width = content_width + 4;
    let box_height = dialog.lines.len() + 5;
    let left = cols.saturating_sub(box_width) / 2 + 1;
    let top = rows.saturating_sub(box_height) / 2 + 1;

    let border = Theme::fg(&theme.colors.input_border);
    let line = |row: usize, text: &str, color: &str, bold: bool| {
        position_cursor(row, left);
        print!("{border}│ ");
        if bold {
            print!("{}", Theme::bold());
        }
        print!("{}{}", Theme::fg(color), fit(text, content_width));
        print!("{}{border} │{}", Theme::reset(), Theme::reset());
    };

    position_cursor(top, left);
    print!("{border}┌{}┐{}", "─".repeat(box_width - 2), Theme::reset());
    line(top + 1, &dialog.title, &theme.colors.header_fg, true);
    line(top + 2, "", &theme.colors.text_normal, false);
    for (offset, text) in dialog.lines.iter().enumerate() {
        line(top + 3 + offset, text, &theme.colors.text_normal, false);
    }
    let hint_row = top + 3 + dialog.lines.len();
    line(hint_row, &dialog.hint, &theme.colors.text_dim, false);
    position_cursor(hint_row + 1, left);
    print!("{border}└{}┘{}", "─".repeat(box_width - 2), Theme::reset());
}
