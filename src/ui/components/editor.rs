//! Vendor edit form renderer.
//!
//! One line per field: label, value, and the field's validation message if it
//! has one. Select fields show arrows to hint that ←/→ cycle them.

use crate::ui::helpers::{fit, position_cursor};
use crate::ui::theme::Theme;
use crate::ui::viewmodel::EditorView;

const LABEL_WIDTH: usize = 10;
const VALUE_WIDTH: usize = 30;

pub fn render_editor(row: usize, editor: &EditorView, theme: &Theme, cols: usize) -> usize {
    position_cursor(row, 1);
    print!("{}", Theme::bold());
    print!("{}", Theme::fg(&theme.colors.header_fg));
    print!("{}", fit(&format!(" Edit Vendor {}", editor.vendor_id), cols));
    print!("{}", Theme::reset());

    let mut current_row = row + 2;
    for field in &editor.fields {
        position_cursor(current_row, 1);

        let marker = if field.is_focused { "▸" } else { " " };
        print!("{}", Theme::fg(&theme.colors.text_dim));
        print!(" {marker} {} ", fit(&field.label, LABEL_WIDTH));
        print!("{}", Theme::reset());

        let value = if field.is_select {
            format!("‹ {} ›", field.value)
        } else if field.is_focused {
            format!("{}▏", field.value)
        } else {
            field.value.clone()
        };
        if field.is_focused {
            print!("{}", Theme::fg(&theme.colors.selection_fg));
            print!("{}", Theme::bg(&theme.colors.selection_bg));
        } else {
            print!("{}", Theme::fg(&theme.colors.text_normal));
        }
        print!("{}", fit(&value, VALUE_WIDTH));
        print!("{}", Theme::reset());

        let used = 4 + LABEL_WIDTH + VALUE_WIDTH;
        match &field.error {
            Some(error) => {
                print!("{}", Theme::fg(&theme.colors.error_fg));
                print!("{}", fit(&format!("  {error}"), cols.saturating_sub(used)));
                print!("{}", Theme::reset());
            }
            None => print!("{}", " ".repeat(cols.saturating_sub(used))),
        }
        current_row += 1;
    }
    current_row
}
