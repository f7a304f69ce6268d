//! Header component renderer.

use crate::ui::helpers::position_cursor;
use crate::ui::theme::Theme;
use crate::ui::viewmodel::HeaderInfo;

/// Renders the title on the left and the summary counts on the right.
///
/// Returns the next available row.
pub fn render_header(row: usize, header: &HeaderInfo, theme: &Theme, cols: usize) -> usize {
    let title = format!(" {}", header.title);
    let title_len = title.chars().count();
    let summary = format!("{} ", header.summary);
    let summary_len = summary.chars().count();

    position_cursor(row, 1);
    print!("{}", Theme::bold());
    print!("{}", Theme::fg(&theme.colors.header_fg));
    if let Some(bg) = &theme.colors.header_bg {
        print!("{}", Theme::bg(bg));
    }
    print!("{title}");

    if title_len + summary_len < cols {
        print!("{}", Theme::reset());
        if let Some(bg) = &theme.colors.header_bg {
            print!("{}", Theme::bg(bg));
        }
        print!("{}", Theme::fg(&theme.colors.text_dim));
        print!("{}", " ".repeat(cols - title_len - summary_len));
        print!("{summary}");
    } else {
        print!("{}", " ".repeat(cols.saturating_sub(title_len)));
    }

    print!("{}", Theme::reset());
    row + 1
}
