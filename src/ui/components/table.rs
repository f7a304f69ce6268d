//! Vendor table renderer.
//!
//! Eight record columns plus a marker column for rows with a send in flight.
//! The name column absorbs whatever width is left after the fixed columns.

use crate::ui::helpers::{self, fit, position_cursor};
use crate::ui::theme::Theme;
use crate::ui::viewmodel::DisplayRow;

const ID_WIDTH: usize = 9;
const CATEGORY_WIDTH: usize = 11;
const LOCATION_WIDTH: usize = 14;
const STATUS_WIDTH: usize = 9;
const TYPE_WIDTH: usize = 5;
const REGION_WIDTH: usize = 7;
const DATE_WIDTH: usize = 10;
const MARKER_WIDTH: usize = 10;
const FIXED_WIDTH: usize = ID_WIDTH
    + CATEGORY_WIDTH
    + LOCATION_WIDTH
    + STATUS_WIDTH
    + TYPE_WIDTH
    + REGION_WIDTH
    + DATE_WIDTH
    + MARKER_WIDTH
    + 9;

const SENDING: &str = "Sending...";

fn name_width(cols: usize) -> usize {
    cols.saturating_sub(FIXED_WIDTH).clamp(12, 32)
}

/// Renders the column headings.
pub fn render_table_headers(row: usize, theme: &Theme, cols: usize) -> usize {
    let line = format!(
        " {} {} {} {} {} {} {} {}",
        fit("ID", ID_WIDTH),
        fit("NAME", name_width(cols)),
        fit("CATEGORY", CATEGORY_WIDTH),
        fit("LOCATION", LOCATION_WIDTH),
        fit("STATUS", STATUS_WIDTH),
        fit("TYPE", TYPE_WIDTH),
        fit("REGION", REGION_WIDTH),
        fit("DATE", DATE_WIDTH),
    );

    position_cursor(row, 1);
    print!("{}", Theme::bold());
    print!("{}", Theme::fg(&theme.colors.header_fg));
    print!("{}", fit(&line, cols));
    print!("{}", Theme::reset());
    row + 1
}

/// Renders every row and returns the row after the last one.
pub fn render_table_rows(row: usize, items: &[DisplayRow], theme: &Theme, cols: usize) -> usize {
    let mut current_row = row;
    for item in items {
        current_row = render_table_row(current_row, item, theme, cols);
    }
    current_row
}

fn render_table_row(row: usize, item: &DisplayRow, theme: &Theme, cols: usize) -> usize {
    let restore = || {
        if item.is_selected {
            print!("{}", Theme::fg(&theme.colors.selection_fg));
            print!("{}", Theme::bg(&theme.colors.selection_bg));
        } else {
            print!("{}", Theme::fg(&theme.colors.text_normal));
        }
    };

    position_cursor(row, 1);
    restore();

    print!(" {} ", fit(&item.id, ID_WIDTH));
    helpers::render_highlighted_text(
        &fit(&item.name, name_width(cols)),
        &item.highlight_ranges,
        theme,
        item.is_selected,
    );
    restore();

    let rest = format!(
        " {} {} {} {} {} {} ",
        fit(&item.category, CATEGORY_WIDTH),
        fit(&item.location, LOCATION_WIDTH),
        fit(&item.status, STATUS_WIDTH),
        fit(&item.vendor_type, TYPE_WIDTH),
        fit(&item.region, REGION_WIDTH),
        fit(&item.date, DATE_WIDTH),
    );
    print!("{rest}");

    let used = 1 + ID_WIDTH + 1 + name_width(cols) + rest.chars().count();
    if item.is_sending {
        if !item.is_selected {
            print!("{}", Theme::fg(&theme.colors.warning_fg));
        }
        print!("{SENDING}");
        restore();
    }
    let marker = if item.is_sending { SENDING.len() } else { 0 };
    print!("{}", " ".repeat(cols.saturating_sub(used + marker)));

    print!("{}", Theme::reset());
    row + 1
}
