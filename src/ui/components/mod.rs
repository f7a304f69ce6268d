//! Composable UI component renderers.
//!
//! Each component prints one region of the screen at a given row and returns
//! the next free row.
//!
//! # Components
//!
//! - [`header`]: Title and summary counts
//! - [`filter_bar`]: Query, filter chips, and the code/date prompt line
//! - [`table`]: Vendor rows with the "Sending..." marker
//! - [`editor`]: Vendor edit form with field errors
//! - [`history`]: Email history panel
//! - [`empty`]: Message when no rows are visible
//! - [`status`]: Pager, bulk progress bar, and notice line
//! - [`dialog`]: Confirmation box overlay
//! - [`footer`]: Keybinding hints
//!
//! # Layout
//!
//! ```text
//! [blank line]
//! [Header]
//! [Border]
//! [Filter bar]
//! [Prompt line]          (code/date entry only)
//! [Body: table | editor | history | empty state]
//! [blank padding]
//! [Pager]
//! [Bulk progress]        (bulk run only)
//! [Notice]
//! [Border]
//! [Footer]
//! ```

mod dialog;
mod editor;
mod empty;
mod filter_bar;
mod footer;
mod header;
mod history;
mod status;
mod table;

use crate::ui::helpers::position_cursor;
use crate::ui::theme::Theme;
use crate::ui::viewmodel::{UIViewModel, ViewBody};

/// Renders a horizontal border line at `row` and returns the next row.
fn render_border(row: usize, color: &str, cols: usize) -> usize {
    position_cursor(row, 1);
    print!("{}", Theme::fg(color));
    print!("{}", "─".repeat(cols));
    print!("{}", Theme::reset());
    row + 1
}

/// Renders the whole screen.
pub fn render_layout(vm: &UIViewModel, theme: &Theme, rows: usize, cols: usize) {
    let mut current_row = 2;

    current_row = header::render_header(current_row, &vm.header, theme, cols);
    current_row = render_border(current_row, &theme.colors.border, cols);
    current_row = filter_bar::render_filter_bar(current_row, &vm.filter_bar, theme, cols);
    if let Some(input) = &vm.input_line {
        current_row = filter_bar::render_input_line(current_row, input, theme, cols);
    }

    match &vm.body {
        ViewBody::Table(items) => {
            current_row = table::render_table_headers(current_row, theme, cols);
            table::render_table_rows(current_row, items, theme, cols);
        }
        ViewBody::Editor(form) => {
            editor::render_editor(current_row, form, theme, cols);
        }
        ViewBody::History(panel) => {
            history::render_history(current_row, panel, theme, cols);
        }
        ViewBody::Empty(empty) => {
            empty::render_empty_state(current_row, empty, theme, cols);
        }
    }

    let footer_row = rows.saturating_sub(1);
    let border_row = footer_row.saturating_sub(1);
    let notice_row = border_row.saturating_sub(1);
    let mut pager_row = notice_row.saturating_sub(1);

    if let Some(progress) = &vm.progress {
        status::render_progress(pager_row, progress, theme, cols);
        pager_row = pager_row.saturating_sub(1);
    }
    if !matches!(vm.body, ViewBody::History(_)) {
        status::render_pager(pager_row, &vm.pager, theme, cols);
    }
    status::render_notice(notice_row, vm.notice.as_ref(), theme, cols);
    render_border(border_row, &theme.colors.border, cols);
    footer::render_footer(footer_row, &vm.footer, theme, cols);

    if let Some(dialog) = &vm.dialog {
        dialog::render_dialog(dialog, theme, rows, cols);
    }
}
