//! Application state management and view model computation.
//!
//! This module defines [`AppState`], the central state container for the plugin.
//! It owns the vendor store, the filter criteria and their derived list, the
//! page cursor, the open editor or prompt, the notification simulator, and the
//! email log. It is the single source of truth for everything on screen.
//!
//! # Architecture
//!
//! Core data (the store, the log) is kept apart from derived state (the filtered
//! list, page and row cursors). Any change to the criteria or the store goes
//! through [`AppState::refresh_filter`], which re-derives the list and resets the
//! cursor to the first row of page 1.
//!
//! # Example
//!
//! ```rust
//! use vendorizer::app::AppState;
//! use vendorizer::catalog::seed;
//! use vendorizer::ui::Theme;
//!
//! let store = seed::bundled()?;
//! let state = AppState::new(store, Theme::default());
//! let viewmodel = state.compute_viewmodel(40, 120);
//! assert!(!viewmodel.pager.label.is_empty());
//! # Ok::<(), vendorizer::domain::VendorizerError>(())
//! ```

use super::modes::{DateRangeInput, InputMode, View};
use super::notice::Notice;
use super::prompt::Prompt;
use crate::catalog::{apply_filter, paginate, Page, PageSize, VendorEditor, VendorStore};
use crate::domain::{FilterCriteria, Vendor};
use crate::infrastructure::get_data_dir;
use crate::notify::{
    Clock, EmailLog, Notifier, NotifierConfig, SimulatedTransport, SystemClock,
};
use crate::ui::theme::Theme;
use crate::ui::viewmodel::{
    DialogInfo, DisplayRow, EditorFieldView, EditorView, EmptyState, FilterBarInfo,
    FooterInfo, HeaderInfo, HistoryRow, HistoryView, InputLineInfo, NoticeInfo, PagerInfo,
    ProgressInfo, UIViewModel, ViewBody,
};
use chrono::{DateTime, Utc};
use std::path::PathBuf;

/// Lines used by everything except table rows: blank, header, border, filter
/// bar, column headings, pager, status line, border, footer, trailing blank.
const CHROME_ROWS: usize = 10;

/// Central application state container.
///
/// Mutated only by [`handle_event`](super::handle_event). View models are
/// computed on demand from state snapshots.
#[derive(Debug)]
pub struct AppState {
    /// Every vendor, in seed order.
    pub store: VendorStore,

    /// What the table is filtered by.
    pub criteria: FilterCriteria,

    /// `store` after `criteria`, order preserved.
    pub filtered: Vec<Vendor>,

    /// 1-based page of `filtered` on screen.
    pub page: usize,

    pub page_size: PageSize,

    /// Zero-based row within the current page.
    pub selected_row: usize,

    pub input_mode: InputMode,

    pub view: View,

    /// Text typed into the code lookup prompt.
    pub input_buffer: String,

    /// Text typed into the date filter or date lookup prompt.
    pub date_input: DateRangeInput,

    /// Open edit session, present only in [`InputMode::Editing`].
    pub editor: Option<VendorEditor>,

    /// Open confirmation, present only in [`InputMode::Confirming`].
    pub prompt: Option<Prompt>,

    pub notifier: Notifier,

    pub email_log: EmailLog,

    /// `true` once the persisted history has been merged in (or explicitly
    /// cleared). Until then the log is not written back.
    pub log_loaded: bool,

    /// Latest announced outcome.
    pub notice: Option<Notice>,

    /// First visible entry of the history panel.
    pub history_offset: usize,

    /// Color scheme for UI rendering.
    pub theme: Theme,

    pub clock: Box<dyn Clock>,

    /// Directory CSV exports are written to.
    pub export_dir: PathBuf,

    /// Deadline the currently armed host timer was scheduled for.
    pub timer_armed_until: Option<DateTime<Utc>>,
}

impl AppState {
    /// Creates the state over `store` with default simulator settings, the
    /// system clock, and exports going to the plugin data directory.
    #[must_use]
    pub fn new(store: VendorStore, theme: Theme) -> Self {
        let config = NotifierConfig::default();
        let transport = SimulatedTransport::new(config.success_rate, rand_seed());
        let mut state = Self {
            store,
            criteria: FilterCriteria::default(),
            filtered: Vec::new(),
            page: 1,
            page_size: PageSize::default(),
            selected_row: 0,
            input_mode: InputMode::Normal,
            view: View::Vendors,
            input_buffer: String::new(),
            date_input: DateRangeInput::default(),
            editor: None,
            prompt: None,
            notifier: Notifier::new(config, Box::new(transport)),
            email_log: EmailLog::new(),
            log_loaded: false,
            notice: None,
            history_offset: 0,
            theme,
            clock: Box::new(SystemClock),
            export_dir: get_data_dir(),
            timer_armed_until: None,
        };
        state.refresh_filter();
        state
    }

    #[must_use]
    pub fn with_clock(mut self, clock: Box<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    #[must_use]
    pub fn with_notifier(mut self, notifier: Notifier) -> Self {
        self.notifier = notifier;
        self
    }

    #[must_use]
    pub fn with_export_dir(mut self, dir: PathBuf) -> Self {
        self.export_dir = dir;
        self
    }

    #[must_use]
    pub fn with_page_size(mut self, size: PageSize) -> Self {
        self.page_size = size;
        self.page = 1;
        self.selected_row = 0;
        self
    }

    /// Re-applies the criteria to the store and resets to the first row of page 1.
    pub fn refresh_filter(&mut self) {
        let _span = tracing::debug_span!(
            "refresh_filter",
            total = self.store.len(),
            query_len = self.criteria.query.len()
        )
        .entered();

        self.filtered = apply_filter(self.store.all(), &self.criteria);
        self.page = 1;
        self.selected_row = 0;

        tracing::debug!(filtered_count = self.filtered.len(), "filter applied");
    }

    /// The visible page.
    #[must_use]
    pub fn current_page(&self) -> Page<'_, Vendor> {
        paginate(&self.filtered, self.page, self.page_size)
    }

    /// The vendor under the cursor, if the page has any rows.
    #[must_use]
    pub fn selected_vendor(&self) -> Option<&Vendor> {
        self.current_page().items.get(self.selected_row)
    }

    /// Moves the cursor down one row, wrapping within the page.
    pub fn move_selection_down(&mut self) {
        let rows = self.current_page().items.len();
        if rows == 0 {
            return;
        }
        self.selected_row = (self.selected_row + 1) % rows;
    }

    /// Moves the cursor up one row, wrapping within the page.
    pub fn move_selection_up(&mut self) {
        let rows = self.current_page().items.len();
        if rows == 0 {
            return;
        }
        self.selected_row = if self.selected_row == 0 {
            rows - 1
        } else {
            self.selected_row - 1
        };
    }

    /// Advances one page. Returns `false` on the last page.
    pub fn next_page(&mut self) -> bool {
        if self.page >= self.current_page().total_pages {
            return false;
        }
        self.page += 1;
        self.selected_row = 0;
        true
    }

    /// Goes back one page. Returns `false` on page 1.
    pub fn prev_page(&mut self) -> bool {
        if self.page <= 1 {
            return false;
        }
        self.page -= 1;
        self.selected_row = 0;
        true
    }

    /// Switches to the next rows-per-page value and returns to page 1.
    pub fn cycle_page_size(&mut self) {
        self.page_size = self.page_size.next();
        self.page = 1;
        self.selected_row = 0;
    }

    /// Moves the cursor onto the filtered vendor with `id`.
    ///
    /// Returns `false` if the vendor isn't in the filtered list.
    pub fn select_vendor(&mut self, id: &str) -> bool {
        let Some(index) = self.filtered.iter().position(|vendor| vendor.id == id) else {
            return false;
        };
        let rows = self.page_size.rows();
        self.page = index / rows + 1;
        self.selected_row = index % rows;
        true
    }

    /// Replaces the current notice.
    pub fn announce(&mut self, notice: Notice) {
        tracing::debug!(level = ?notice.level, title = %notice.title, "notice");
        self.notice = Some(notice);
    }

    /// Returns the input mode to normal and drops any half-typed input.
    pub fn return_to_normal(&mut self) {
        self.input_mode = InputMode::Normal;
        self.input_buffer.clear();
        self.editor = None;
        self.prompt = None;
    }

    /// Computes a renderable UI view model from current state and terminal dimensions.
    ///
    /// The table is windowed to the rows left after the chrome, keeping the
    /// selected row visible. Text matches of the query in vendor names carry a
    /// highlight range.
    #[must_use]
    pub fn compute_viewmodel(&self, rows: usize, cols: usize) -> UIViewModel {
        let page = self.current_page();
        let mut available = rows.saturating_sub(CHROME_ROWS).max(1);
        if self.input_line().is_some() {
            available = available.saturating_sub(1).max(1);
        }
        if self.notifier.bulk_progress().is_some() {
            available = available.saturating_sub(1).max(1);
        }

        let body = match (self.view, &self.editor) {
            (_, Some(editor)) => ViewBody::Editor(editor_view(editor)),
            (View::History, None) => ViewBody::History(self.history_view(available)),
            (View::Vendors, None) if page.items.is_empty() => ViewBody::Empty(self.empty_state()),
            (View::Vendors, None) => {
                ViewBody::Table(self.table_rows(page.items, available))
            }
        };

        UIViewModel {
            header: HeaderInfo {
                title: "Vendorizer".to_string(),
                summary: self.header_summary(),
            },
            filter_bar: self.filter_bar(),
            input_line: self.input_line(),
            body,
            pager: PagerInfo {
                label: format!("Showing {} entries", page.range_label()),
                page: format!("Page {} of {}", page.number, page.total_pages),
                page_size: self.page_size.rows(),
            },
            progress: self.notifier.bulk_progress().map(|progress| ProgressInfo {
                processed: progress.processed,
                total: progress.total,
                percent: progress.percent(),
            }),
            notice: self.notice.as_ref().map(|notice| NoticeInfo {
                level: notice.level,
                text: format!("{}: {}", notice.title, notice.message),
            }),
            dialog: self.prompt.as_ref().map(|prompt| DialogInfo {
                title: prompt.title().to_string(),
                lines: prompt.lines(),
                hint: "y: confirm | n: cancel".to_string(),
            }),
            footer: FooterInfo {
                keybindings: self.keybindings(cols),
            },
        }
    }

    fn header_summary(&self) -> String {
        let mut summary = format!("{} vendors", self.store.len());
        let sending = self.notifier.in_flight_count();
        if sending > 0 {
            summary.push_str(&format!(" | {sending} sending"));
        }
        if !self.email_log.is_empty() {
            summary.push_str(&format!(" | {} logged", self.email_log.len()));
        }
        summary
    }

    fn filter_bar(&self) -> FilterBarInfo {
        fn or_all<T: ToString>(value: Option<T>) -> String {
            value.map_or_else(|| "All".to_string(), |v| v.to_string())
        }
        let date = |d: Option<chrono::NaiveDate>| {
            d.map_or_else(|| "…".to_string(), |d| d.format("%Y-%m-%d").to_string())
        };

        FilterBarInfo {
            query: self.criteria.query.clone(),
            is_editing_query: self.input_mode == InputMode::Search,
            chips: vec![
                ("Category", or_all(self.criteria.category)),
                ("Type", or_all(self.criteria.vendor_type)),
                ("Status", or_all(self.criteria.status)),
                ("Region", or_all(self.criteria.region)),
                (
                    "Date",
                    format!(
                        "{} ~ {}",
                        date(self.criteria.date_from),
                        date(self.criteria.date_to)
                    ),
                ),
            ]
            .into_iter()
            .map(|(label, value)| format!("{label}: {value}"))
            .collect(),
            show_clear_hint: self.criteria.has_field_filters(),
        }
    }

    fn input_line(&self) -> Option<InputLineInfo> {
        let range = |label: &str| {
            let marker = |bound| if self.date_input.focus == bound { "▸" } else { " " };
            InputLineInfo {
                label: label.to_string(),
                text: format!(
                    "{}From: {:<10}  {}To: {:<10}",
                    marker(super::modes::DateBound::From),
                    self.date_input.from,
                    marker(super::modes::DateBound::To),
                    self.date_input.to
                ),
            }
        };
        match self.input_mode {
            InputMode::CodeLookup => Some(InputLineInfo {
                label: "Fetch by code".to_string(),
                text: self.input_buffer.clone(),
            }),
            InputMode::DateFilter => Some(range("Filter dates")),
            InputMode::DateLookup => Some(range("Fetch by date")),
            _ => None,
        }
    }

    fn table_rows(&self, items: &[Vendor], available: usize) -> Vec<DisplayRow> {
        let (start, end) = window(items.len(), self.selected_row, available);
        let needle = self.criteria.query.to_lowercase();

        items[start..end]
            .iter()
            .enumerate()
            .map(|(offset, vendor)| DisplayRow {
                id: vendor.id.clone(),
                name: vendor.name.clone(),
                category: vendor.category.to_string(),
                location: vendor.location.clone(),
                status: vendor.status.to_string(),
                vendor_type: vendor.vendor_type.to_string(),
                region: vendor.region.to_string(),
                date: vendor.date.format("%Y-%m-%d").to_string(),
                is_selected: start + offset == self.selected_row,
                is_sending: self.notifier.is_sending(&vendor.id),
                highlight_ranges: match_range(&vendor.name, &needle).into_iter().collect(),
            })
            .collect()
    }

    fn history_view(&self, available: usize) -> HistoryView {
        use crate::domain::EmailStatus;

        let entries = self.email_log.entries();
        let start = self.history_offset.min(entries.len().saturating_sub(1));
        HistoryView {
            summary: format!(
                "Total: {} | Sent: {} | Partial: {} | Failed: {} | Pending: {}",
                entries.len(),
                self.email_log.count(EmailStatus::Success),
                self.email_log.count(EmailStatus::Partial),
                self.email_log.count(EmailStatus::Failed),
                self.email_log.count(EmailStatus::Pending),
            ),
            rows: entries
                .iter()
                .skip(start)
                .take(available.saturating_sub(1))
                .map(|entry| HistoryRow {
                    time: entry.timestamp.format("%Y-%m-%d %H:%M:%S").to_string(),
                    vendor: if entry.is_bulk() {
                        entry.vendor_name.clone()
                    } else {
                        format!("{} ({})", entry.vendor_name, entry.vendor_id)
                    },
                    status: entry.status,
                    message: entry.message.clone(),
                })
                .collect(),
        }
    }

    fn empty_state(&self) -> EmptyState {
        if self.store.is_empty() {
            EmptyState {
                message: "No vendors loaded".to_string(),
                subtitle: "Check the vendors_file setting".to_string(),
            }
        } else {
            EmptyState {
                message: "No vendors match the current filters".to_string(),
                subtitle: "Press / to edit the search or x to clear filters".to_string(),
            }
        }
    }

    fn keybindings(&self, cols: usize) -> String {
        let full = match (self.input_mode, self.view) {
            (InputMode::Search, _) => "type to filter | Enter: done | Esc: clear",
            (InputMode::DateFilter | InputMode::DateLookup, _) => {
                "YYYY-MM-DD | Tab: switch bound | Enter: apply | Esc: cancel"
            }
            (InputMode::CodeLookup, _) => "type a vendor code | Enter: fetch | Esc: cancel",
            (InputMode::Editing, _) => {
                "Tab/S-Tab: field | ←/→: choose | Enter: save | Esc: cancel"
            }
            (InputMode::Confirming, _) => "y: confirm | n: cancel",
            (InputMode::Normal, View::History) => "j/k: scroll | C: clear history | H/Esc: back | q: quit",
            (InputMode::Normal, View::Vendors) => {
                "j/k: move | h/l: page | /: search | c/t/s/r: filters | d: dates | x: clear | p: page size | e: edit | m: email | B: bulk | g/f: fetch | E: export | H: history | q: quit"
            }
        };
        if cols < 100 {
            match (self.input_mode, self.view) {
                (InputMode::Normal, View::Vendors) => {
                    "j/k | h/l | / | e: edit | m: email | B: bulk | E: export | H | q".to_string()
                }
                _ => full.to_string(),
            }
        } else {
            full.to_string()
        }
    }
}

fn editor_view(editor: &VendorEditor) -> EditorView {
    use crate::catalog::Field;

    EditorView {
        vendor_id: editor.draft().id().to_string(),
        fields: Field::EDITABLE
            .iter()
            .map(|&field| EditorFieldView {
                label: field.label().to_string(),
                value: editor.draft().get(field).to_string(),
                is_focused: editor.focus() == field,
                is_select: field.choices().is_some(),
                error: editor.errors().get(field).map(str::to_string),
            })
            .collect(),
    }
}

/// Window `[start, end)` of `len` rows, at most `height` tall, containing `selected`.
fn window(len: usize, selected: usize, height: usize) -> (usize, usize) {
    if len <= height {
        return (0, len);
    }
    let half = height / 2;
    let start = selected.saturating_sub(half).min(len - height);
    (start, start + height)
}

/// Character range of the first case-insensitive occurrence of `needle`.
fn match_range(text: &str, needle: &str) -> Option<(usize, usize)> {
    if needle.is_empty() {
        return None;
    }
    let haystack: Vec<char> = text.to_lowercase().chars().collect();
    let needle: Vec<char> = needle.chars().collect();
    if haystack.len() != text.chars().count() {
        return None;
    }
    haystack
        .windows(needle.len())
        .position(|candidate| candidate == needle.as_slice())
        .map(|start| (start, start + needle.len()))
}

fn rand_seed() -> u64 {
    u64::try_from(Utc::now().timestamp_nanos_opt().unwrap_or_default()).unwrap_or_default()
}
