//! Pager, bulk progress, and notice line renderers.

use crate::ui::helpers::{fit, position_cursor};
use crate::ui::theme::Theme;
use crate::ui::viewmodel::{NoticeInfo, PagerInfo, ProgressInfo};

const BAR_WIDTH: usize = 30;

/// "Showing X to Y of Z entries" on the left, page and page size on the right.
pub fn render_pager(row: usize, pager: &PagerInfo, theme: &Theme, cols: usize) -> usize {
    let left = format!(" {}", pager.label);
    let right = format!("{}  ({} per page) ", pager.page, pager.page_size);
    let left_width = cols.saturating_sub(right.chars().count());

    position_cursor(row, 1);
    print!("{}", Theme::fg(&theme.colors.text_dim));
    print!("{}", fit(&left, left_width));
    print!("{}", fit(&right, cols.saturating_sub(left_width)));
    print!("{}", Theme::reset());
    row + 1
}

/// Renders `[█████░░░░░] 50% (5/10)`.
pub fn render_progress(row: usize, progress: &ProgressInfo, theme: &Theme, cols: usize) -> usize {
    let filled = BAR_WIDTH * progress.percent.min(100) / 100;

    position_cursor(row, 1);
    print!("{}", Theme::fg(&theme.colors.text_normal));
    print!(" Bulk email ");
    print!("{}", Theme::fg(&theme.colors.warning_fg));
    print!("[{}{}]", "█".repeat(filled), "░".repeat(BAR_WIDTH - filled));
    print!("{}", Theme::fg(&theme.colors.text_normal));
    let tail = format!(" {}% ({}/{})", progress.percent, progress.processed, progress.total);
    print!("{}", fit(&tail, cols.saturating_sub(BAR_WIDTH + 14)));
    print!("{}", Theme::reset());
    row + 1
}

pub fn render_notice(row: usize, notice: Option<&NoticeInfo>, theme: &Theme, cols: usize) -> usize {
    position_cursor(row, 1);
    match notice {
        Some(notice) => {
            print!("{}", Theme::fg(theme.colors.notice(notice.level)));
            print!("{}", fit(&format!(" {}", notice.text), cols));
        }
        None => print!("{}", " ".repeat(cols)),
    }
    print!("{}", Theme::reset());
    row + 1
}
