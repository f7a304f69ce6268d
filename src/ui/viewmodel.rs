//! View model types representing renderable UI state.
//!
//! View models are computed by `AppState::compute_viewmodel()` and consumed by
//! the renderer. They contain no business logic, only display-ready strings,
//! flags, and highlight ranges.

use crate::app::NoticeLevel;
use crate::domain::EmailStatus;

/// Complete UI view model for rendering.
#[derive(Debug, Clone)]
pub struct UIViewModel {
    pub header: HeaderInfo,

    /// Query and filter chips.
    pub filter_bar: FilterBarInfo,

    /// Single-line text prompt (code or date entry), when one is open.
    pub input_line: Option<InputLineInfo>,

    /// Main panel.
    pub body: ViewBody,

    pub pager: PagerInfo,

    /// Bulk send progress, while a bulk run is in flight.
    pub progress: Option<ProgressInfo>,

    /// Latest outcome announcement.
    pub notice: Option<NoticeInfo>,

    /// Open confirmation, drawn over everything else.
    pub dialog: Option<DialogInfo>,

    pub footer: FooterInfo,
}

/// What fills the space between the filter bar and the pager.
#[derive(Debug, Clone)]
pub enum ViewBody {
    Table(Vec<DisplayRow>),
    Editor(EditorView),
    History(HistoryView),
    Empty(EmptyState),
}

/// One vendor row of the table.
#[derive(Debug, Clone)]
pub struct DisplayRow {
    pub id: String,
    pub name: String,
    pub category: String,
    pub location: String,
    pub status: String,
    pub vendor_type: String,
    pub region: String,
    pub date: String,

    pub is_selected: bool,

    /// A single send to this vendor is in flight.
    pub is_sending: bool,

    /// Character ranges of `name` matching the query, `(start, end)` exclusive.
    pub highlight_ranges: Vec<(usize, usize)>,
}

#[derive(Debug, Clone)]
pub struct HeaderInfo {
    pub title: String,
    /// Right-aligned counts ("30 vendors | 2 sending").
    pub summary: String,
}

#[derive(Debug, Clone)]
pub struct FilterBarInfo {
    pub query: String,
    /// The query is being typed into.
    pub is_editing_query: bool,
    /// `"Label: value"` for each field filter.
    pub chips: Vec<String>,
    /// Any field filter is set, so clearing them would change something.
    pub show_clear_hint: bool,
}

#[derive(Debug, Clone)]
pub struct InputLineInfo {
    pub label: String,
    pub text: String,
}

/// Pagination status under the table.
#[derive(Debug, Clone)]
pub struct PagerInfo {
    /// "Showing X to Y of Z entries".
    pub label: String,
    /// "Page N of M".
    pub page: String,
    pub page_size: usize,
}

#[derive(Debug, Clone, Copy)]
pub struct ProgressInfo {
    pub processed: usize,
    pub total: usize,
    pub percent: usize,
}

#[derive(Debug, Clone)]
pub struct NoticeInfo {
    pub level: NoticeLevel,
    pub text: String,
}

#[derive(Debug, Clone)]
pub struct DialogInfo {
    pub title: String,
    pub lines: Vec<String>,
    pub hint: String,
}

/// The vendor edit form.
#[derive(Debug, Clone)]
pub struct EditorView {
    pub vendor_id: String,
    pub fields: Vec<EditorFieldView>,
}

#[derive(Debug, Clone)]
pub struct EditorFieldView {
    pub label: String,
    pub value: String,
    pub is_focused: bool,
    /// Value is chosen from a fixed list rather than typed.
    pub is_select: bool,
    pub error: Option<String>,
}

/// The email history panel.
#[derive(Debug, Clone)]
pub struct HistoryView {
    /// Per-status counts.
    pub summary: String,
    pub rows: Vec<HistoryRow>,
}

#[derive(Debug, Clone)]
pub struct HistoryRow {
    pub time: String,
    pub vendor: String,
    pub status: EmailStatus,
    pub message: String,
}

/// Shown in place of the table when no row is visible.
#[derive(Debug, Clone)]
pub struct EmptyState {
    pub message: String,
    pub subtitle: String,
}

#[derive(Debug, Clone)]
pub struct FooterInfo {
    /// Keybinding hints for the current mode.
    pub keybindings: String,
}
