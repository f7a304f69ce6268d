//! Event handling and state transition logic.
//!
//! This module implements the core event handler that processes user input,
//! timer expiries, and worker responses, translating them into state changes
//! and action sequences.
//!
//! # Architecture
//!
//! The handler follows a unidirectional data flow pattern:
//! 1. Events arrive from the plugin runtime or worker thread
//! 2. [`handle_event`] routes them by input mode
//! 3. State mutations occur via `AppState` methods and the catalog/notify layers
//! 4. Actions are collected and returned for execution
//!
//! After every event two bookkeeping passes run: a changed email log is
//! written back through the worker, and the host timer is re-armed for the
//! simulator's next deadline.
//!
//! Operation failures never escape as `Err`. They become notices here, and
//! delivery failures also become log entries inside the simulator.
//!
//! # Example
//!
//! ```rust
//! use vendorizer::app::{handle_event, AppState, Event};
//! use vendorizer::catalog::seed;
//! use vendorizer::ui::Theme;
//!
//! let mut state = AppState::new(seed::bundled()?, Theme::default());
//! let (render, actions) = handle_event(&mut state, &Event::KeyDown)?;
//! assert!(render);
//! assert!(actions.is_empty());
//! # Ok::<(), vendorizer::domain::VendorizerError>(())
//! ```

use super::modes::{DateRangeInput, InputMode, View};
use super::notice::Notice;
use super::prompt::Prompt;
use crate::app::{Action, AppState};
use crate::catalog::lookup::{count_in_range, find_by_code, suggest_code};
use crate::catalog::SubmitOutcome;
use crate::domain::error::Result;
use crate::domain::{cycle_option, Category, Region, Status, VendorType};
use crate::notify::SendOutcome;
use crate::worker::{WorkerMessage, WorkerResponse};

/// Events triggered by user input, the host timer, or worker responses.
///
/// Key events are semantic: `main.rs` maps raw keys to these according to the
/// current input mode, so the handler never sees key codes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    /// Moves the cursor down (history: scrolls down).
    KeyDown,
    /// Moves the cursor up (history: scrolls up).
    KeyUp,
    NextPage,
    PrevPage,
    /// Hides the plugin pane.
    CloseFocus,

    /// Starts editing the free-text query.
    SearchMode,
    /// Starts editing the date-range filter.
    DateFilterMode,
    /// Opens the fetch-by-code prompt.
    CodeLookupMode,
    /// Opens the fetch-by-date-range prompt.
    DateLookupMode,

    /// Printable character in a text-capturing mode.
    Char(char),
    Backspace,
    /// Enter: finish the current input.
    Submit,
    /// Leaves the current mode without applying; in normal mode dismisses the notice.
    Escape,
    /// Next form field or date bound.
    NextField,
    /// Previous form field or date bound.
    PrevField,
    /// Next choice of a select field.
    CycleForward,
    /// Previous choice of a select field.
    CycleBackward,

    CycleCategory,
    CycleType,
    CycleStatus,
    CycleRegion,
    /// Clears every filter except the text query.
    ClearFilters,
    CyclePageSize,

    /// Opens the editor on the selected vendor.
    EditSelected,
    /// Asks to email the selected vendor.
    SendEmail,
    /// Asks to email every filtered vendor.
    BulkEmail,
    /// Exports the filtered vendors to CSV.
    Export,
    /// Switches between the vendor table and the email history.
    ToggleHistory,
    /// Asks to clear the email history.
    ClearHistory,

    /// Answers yes to the open prompt.
    Confirm,
    /// Answers no to the open prompt.
    Decline,

    /// The host timer fired.
    Tick,

    /// The plugin finished loading. Requests the persisted email history.
    Started,

    /// Result of the plugin permission request.
    PermissionsResult {
        /// `true` if every requested permission was granted.
        granted: bool,
    },

    /// Wraps a response from the background worker thread.
    WorkerResponse(WorkerResponse),
}

/// Processes an event, mutates application state, and returns actions to execute.
///
/// Returns whether the view needs re-rendering and the actions to run, in order.
///
/// # Errors
///
/// Currently every failure is converted to a notice, so this only returns
/// `Ok`. The `Result` is kept so the runtime shim logs rather than panics if a
/// future branch propagates.
pub fn handle_event(state: &mut AppState, event: &Event) -> Result<(bool, Vec<Action>)> {
    let _span = tracing::debug_span!(
        "handle_event",
        event_type = ?event,
        mode = ?state.input_mode
    )
    .entered();

    let (render, mut actions) = dispatch(state, event);
    persist_log(state, &mut actions);
    arm_timer(state, &mut actions);

    Ok((render, actions))
}

fn dispatch(state: &mut AppState, event: &Event) -> (bool, Vec<Action>) {
    match event {
        Event::Tick => return on_tick(state),
        Event::Started => {
            tracing::debug!("loading email history");
            return (false, vec![Action::PostToWorker(WorkerMessage::load_email_log())]);
        }
        Event::PermissionsResult { granted } => return on_permissions(state, *granted),
        Event::WorkerResponse(response) => return on_worker_response(state, response),
        Event::CloseFocus => return (false, vec![Action::CloseFocus]),
        _ => {}
    }

    match state.input_mode {
        InputMode::Normal => match state.view {
            View::Vendors => on_normal(state, event),
            View::History => on_history(state, event),
        },
        InputMode::Search => (on_search(state, event), vec![]),
        InputMode::DateFilter | InputMode::DateLookup => (on_date_input(state, event), vec![]),
        InputMode::CodeLookup => (on_code_input(state, event), vec![]),
        InputMode::Editing => (on_editing(state, event), vec![]),
        InputMode::Confirming => on_confirming(state, event),
    }
}

#[allow(clippy::too_many_lines)]
fn on_normal(state: &mut AppState, event: &Event) -> (bool, Vec<Action>) {
    match event {
        Event::KeyDown => state.move_selection_down(),
        Event::KeyUp => state.move_selection_up(),
        Event::NextPage => return (state.next_page(), vec![]),
        Event::PrevPage => return (state.prev_page(), vec![]),
        Event::SearchMode => state.input_mode = InputMode::Search,
        Event::DateFilterMode => {
            state.date_input =
                DateRangeInput::from_bounds(state.criteria.date_from, state.criteria.date_to);
            state.input_mode = InputMode::DateFilter;
        }
        Event::CodeLookupMode => {
            state.input_buffer.clear();
            state.input_mode = InputMode::CodeLookup;
        }
        Event::DateLookupMode => {
            state.date_input = DateRangeInput::default();
            state.input_mode = InputMode::DateLookup;
        }
        Event::CycleCategory => {
            state.criteria.category = cycle_option(state.criteria.category, Category::ALL, true);
            state.refresh_filter();
        }
        Event::CycleType => {
            state.criteria.vendor_type =
                cycle_option(state.criteria.vendor_type, VendorType::ALL, true);
            state.refresh_filter();
        }
        Event::CycleStatus => {
            state.criteria.status = cycle_option(state.criteria.status, Status::ALL, true);
            state.refresh_filter();
        }
        Event::CycleRegion => {
            state.criteria.region = cycle_option(state.criteria.region, Region::ALL, true);
            state.refresh_filter();
        }
        Event::ClearFilters => {
            if !state.criteria.has_field_filters() {
                return (false, vec![]);
            }
            state.criteria.clear_field_filters();
            state.refresh_filter();
        }
        Event::CyclePageSize => state.cycle_page_size(),
        Event::EditSelected => open_editor(state),
        Event::SendEmail => ask_send(state),
        Event::BulkEmail => ask_bulk(state),
        Event::Export => return export(state),
        Event::ToggleHistory => {
            state.view = View::History;
            state.history_offset = 0;
        }
        Event::Escape => {
            if state.notice.take().is_none() {
                return (false, vec![]);
            }
        }
        _ => return (false, vec![]),
    }
    (true, vec![])
}

fn on_history(state: &mut AppState, event: &Event) -> (bool, Vec<Action>) {
    match event {
        Event::KeyDown => {
            if state.history_offset + 1 < state.email_log.len() {
                state.history_offset += 1;
            }
        }
        Event::KeyUp => state.history_offset = state.history_offset.saturating_sub(1),
        Event::ToggleHistory | Event::Escape => state.view = View::Vendors,
        Event::ClearHistory => {
            if state.email_log.is_empty() {
                state.announce(Notice::info("Email History", "No email history to clear"));
            } else {
                state.prompt = Some(Prompt::ClearHistory);
                state.input_mode = InputMode::Confirming;
            }
        }
        _ => return (false, vec![]),
    }
    (true, vec![])
}

fn on_search(state: &mut AppState, event: &Event) -> bool {
    match event {
        Event::Char(c) => {
            state.criteria.query.push(*c);
            state.refresh_filter();
        }
        Event::Backspace => {
            if state.criteria.query.pop().is_none() {
                return false;
            }
            state.refresh_filter();
        }
        Event::Submit => state.input_mode = InputMode::Normal,
        Event::Escape => {
            state.criteria.query.clear();
            state.refresh_filter();
            state.input_mode = InputMode::Normal;
        }
        _ => return false,
    }
    true
}

fn on_date_input(state: &mut AppState, event: &Event) -> bool {
    match event {
        Event::Char(c) => state.date_input.push(*c),
        Event::Backspace => state.date_input.pop(),
        Event::NextField | Event::PrevField => {
            state.date_input.focus = state.date_input.focus.toggle();
        }
        Event::Submit if state.input_mode == InputMode::DateFilter => apply_date_filter(state),
        Event::Submit => lookup_dates(state),
        Event::Escape => state.return_to_normal(),
        _ => return false,
    }
    true
}

fn on_code_input(state: &mut AppState, event: &Event) -> bool {
    match event {
        Event::Char(c) => state.input_buffer.push(*c),
        Event::Backspace => {
            state.input_buffer.pop();
        }
        Event::Submit => lookup_code(state),
        Event::Escape => state.return_to_normal(),
        _ => return false,
    }
    true
}

fn on_editing(state: &mut AppState, event: &Event) -> bool {
    if matches!(event, Event::Escape) {
        tracing::debug!("editor dismissed without saving");
        state.return_to_normal();
        return true;
    }
    if matches!(event, Event::Submit) {
        submit_editor(state);
        return true;
    }

    let Some(editor) = state.editor.as_mut() else {
        state.return_to_normal();
        return true;
    };
    match event {
        Event::Char(c) => editor.type_char(*c),
        Event::Backspace => editor.backspace(),
        Event::NextField => editor.focus_next(),
        Event::PrevField => editor.focus_prev(),
        Event::CycleForward => editor.cycle_focused(true),
        Event::CycleBackward => editor.cycle_focused(false),
        _ => return false,
    }
    true
}

fn on_confirming(state: &mut AppState, event: &Event) -> (bool, Vec<Action>) {
    match event {
        Event::Confirm => {
            let prompt = state.prompt.take();
            state.return_to_normal();
            match prompt {
                Some(prompt) => (true, confirmed(state, prompt)),
                None => (true, vec![]),
            }
        }
        Event::Decline | Event::Escape => {
            tracing::debug!(prompt = ?state.prompt.as_ref().map(Prompt::title), "prompt declined");
            state.return_to_normal();
            (true, vec![])
        }
        _ => (false, vec![]),
    }
}

fn open_editor(state: &mut AppState) {
    let Some(vendor) = state.selected_vendor().cloned() else {
        return;
    };
    if state.notifier.is_sending(&vendor.id) {
        state.announce(Notice::error(
            "Email In Progress",
            format!("{} cannot be edited while an email is sending", vendor.name),
        ));
        return;
    }
    state.editor = Some(crate::catalog::VendorEditor::open(&vendor));
    state.input_mode = InputMode::Editing;
}

fn submit_editor(state: &mut AppState) {
    let Some(editor) = state.editor.as_mut() else {
        state.return_to_normal();
        return;
    };

    match editor.submit(&mut state.store) {
        SubmitOutcome::Saved(vendor) => {
            tracing::info!(vendor_id = %vendor.id, "vendor updated");
            state.return_to_normal();
            state.refresh_filter();
            state.announce(Notice::success(
                "Success",
                format!("Vendor {} updated successfully", vendor.name),
            ));
        }
        SubmitOutcome::Invalid { error_count } => {
            state.announce(Notice::error(
                "Validation Error",
                format!("Please fix the errors in the form ({error_count})"),
            ));
        }
        SubmitOutcome::Rejected(e) => {
            tracing::warn!(error = %e, "vendor update rejected");
            state.return_to_normal();
            state.announce(Notice::error("Update Failed", e.to_string()));
        }
    }
}

fn ask_send(state: &mut AppState) {
    let Some(vendor) = state.selected_vendor().cloned() else {
        return;
    };
    if state.notifier.is_sending(&vendor.id) {
        state.announce(Notice::info(
            "Email In Progress",
            format!("Email to {} is already sending", vendor.name),
        ));
        return;
    }
    state.prompt = Some(Prompt::SendEmail { vendor });
    state.input_mode = InputMode::Confirming;
}

fn ask_bulk(state: &mut AppState) {
    if state.filtered.is_empty() {
        state.announce(Notice::error("No Vendors", "No vendors to send emails to"));
        return;
    }
    if state.notifier.bulk_progress().is_some() {
        state.announce(Notice::info("Bulk Email", "Bulk email already in progress"));
        return;
    }
    state.prompt = Some(Prompt::BulkEmail {
        recipients: state.filtered.clone(),
    });
    state.input_mode = InputMode::Confirming;
}

fn confirmed(state: &mut AppState, prompt: Prompt) -> Vec<Action> {
    let now = state.clock.now();
    match prompt {
        Prompt::SendEmail { vendor } => {
            match state.notifier.begin_send(&vendor, now, &mut state.email_log) {
                Ok(_) => state.announce(Notice::info(
                    "Sending Email",
                    format!("Sending email to {}...", vendor.name),
                )),
                Err(e) => state.announce(Notice::error("Email Error", e.to_string())),
            }
            vec![]
        }
        Prompt::BulkEmail { recipients } => {
            match state.notifier.begin_bulk(&recipients, now, &mut state.email_log) {
                Ok(_) => state.announce(Notice::info(
                    "Bulk Email",
                    format!("Sending emails to {} vendors...", recipients.len()),
                )),
                Err(e) => state.announce(Notice::error("Bulk Email Failed", e.to_string())),
            }
            vec![]
        }
        Prompt::ClearHistory => {
            state.email_log.clear();
            let _ = state.email_log.take_dirty();
            state.log_loaded = true;
            state.history_offset = 0;
            state.announce(Notice::success("Email History", "Email history cleared"));
            vec![Action::PostToWorker(WorkerMessage::clear_email_log())]
        }
    }
}

fn export(state: &mut AppState) -> (bool, Vec<Action>) {
    if state.filtered.is_empty() {
        state.announce(Notice::error("No Data", "No vendors to export"));
        return (true, vec![]);
    }
    let date = state.clock.now().date_naive();
    let dir = state.export_dir.to_string_lossy().into_owned();
    tracing::debug!(count = state.filtered.len(), %dir, "requesting export");
    (
        true,
        vec![Action::PostToWorker(WorkerMessage::export_vendors(
            state.filtered.clone(),
            dir,
            date,
        ))],
    )
}

fn apply_date_filter(state: &mut AppState) {
    match state.date_input.parse() {
        Ok((from, to)) => {
            state.criteria.date_from = from;
            state.criteria.date_to = to;
            state.return_to_normal();
            state.refresh_filter();
        }
        Err(bad) => state.announce(invalid_date(&bad)),
    }
}

fn lookup_code(state: &mut AppState) {
    let code = state.input_buffer.trim().to_string();
    if code.is_empty() {
        state.announce(Notice::error("Error", "Please enter a vendor code"));
        return;
    }

    if let Some(vendor) = find_by_code(&state.filtered, &code).cloned() {
        state.return_to_normal();
        state.select_vendor(&vendor.id);
        state.announce(Notice::success(
            "Vendor Found",
            format!("{} - {}", vendor.name, vendor.location),
        ));
        return;
    }

    let message = match suggest_code(&state.filtered, &code) {
        Some(suggestion) => format!("No vendor found with this code (did you mean {suggestion}?)"),
        None => "No vendor found with this code".to_string(),
    };
    tracing::debug!(%code, "vendor code not found");
    state.announce(Notice::error("Not Found", message));
}

fn lookup_dates(state: &mut AppState) {
    let (from, to) = match state.date_input.parse() {
        Ok(bounds) => bounds,
        Err(bad) => {
            state.announce(invalid_date(&bad));
            return;
        }
    };
    let (Some(from), Some(to)) = (from, to) else {
        state.announce(Notice::error("Error", "Please select both from and to dates"));
        return;
    };

    let count = count_in_range(&state.filtered, from, to);
    if count == 0 {
        state.announce(Notice::error("No Vendors", "No vendors found in the date range"));
        return;
    }
    state.return_to_normal();
    state.announce(Notice::success(
        "Vendors Found",
        format!("{count} vendors found in the date range"),
    ));
}

fn invalid_date(raw: &str) -> Notice {
    Notice::error("Invalid Date", format!("{raw} is not a YYYY-MM-DD date"))
}

fn on_tick(state: &mut AppState) -> (bool, Vec<Action>) {
    state.timer_armed_until = None;
    let now = state.clock.now();
    let had_bulk = state.notifier.bulk_progress().is_some();
    let outcomes = state.notifier.advance(now, &mut state.email_log);

    for outcome in &outcomes {
        state.announce(outcome_notice(outcome));
    }
    (!outcomes.is_empty() || had_bulk, vec![])
}

fn outcome_notice(outcome: &SendOutcome) -> Notice {
    match outcome {
        SendOutcome::Delivered { vendor } => Notice::success(
            "Email Sent Successfully",
            format!("Email notification sent to {}", vendor.short_label()),
        ),
        SendOutcome::Rejected { vendor } => Notice::error(
            "Email Failed",
            format!("Failed to send email to {}. Please try again.", vendor.name),
        ),
        SendOutcome::Errored { vendor, error } => Notice::error(
            "Email Error",
            format!("Error sending email to {}: {error}", vendor.name),
        ),
        SendOutcome::BulkCompleted { total, failed: 0, .. } => Notice::success(
            "Bulk Email Sent",
            format!("Successfully sent emails to all {total} vendors"),
        ),
        SendOutcome::BulkCompleted { succeeded, failed, .. } => Notice::info(
            "Bulk Email Partially Sent",
            format!("Sent to {succeeded} vendors, {failed} failed"),
        ),
        SendOutcome::BulkErrored { error, .. } => Notice::error(
            "Bulk Email Failed",
            format!("Error sending bulk emails: {error}"),
        ),
    }
}

fn on_permissions(state: &mut AppState, granted: bool) -> (bool, Vec<Action>) {
    if granted {
        tracing::debug!("permissions granted");
        return (false, vec![]);
    }
    tracing::warn!("permissions denied");
    state.announce(Notice::error(
        "Permissions Denied",
        "The pane cannot hide itself; close it from Zellij",
    ));
    (true, vec![])
}

fn on_worker_response(state: &mut AppState, response: &WorkerResponse) -> (bool, Vec<Action>) {
    match response {
        WorkerResponse::EmailLogLoaded { entries } => {
            if state.log_loaded {
                tracing::debug!(count = entries.len(), "ignoring stale email history load");
                return (false, vec![]);
            }
            state.email_log.merge_loaded(entries.clone());
            state.log_loaded = true;
            (true, vec![])
        }
        WorkerResponse::EmailLogLoadFailed { message } => {
            if state.log_loaded {
                return (false, vec![]);
            }
            // Later saves overwrite whatever could not be read.
            tracing::warn!(%message, "email history unreadable, starting empty");
            state.log_loaded = true;
            state.announce(Notice::error(
                "Email History Unavailable",
                format!("{message}. New entries replace the stored history."),
            ));
            (true, vec![])
        }
        WorkerResponse::EmailLogSaved { count } => {
            tracing::debug!(count, "email history saved");
            (false, vec![])
        }
        WorkerResponse::EmailLogCleared => {
            tracing::debug!("email history cleared in storage");
            (false, vec![])
        }
        WorkerResponse::VendorsExported { path, count } => {
            let file = std::path::Path::new(path)
                .file_name()
                .map_or_else(|| path.clone(), |name| name.to_string_lossy().into_owned());
            tracing::info!(%path, count, "vendors exported");
            state.announce(Notice::success(
                "Export Successful",
                format!("Exported {count} vendors to {file}"),
            ));
            (true, vec![])
        }
        WorkerResponse::Error { message } => {
            tracing::error!(%message, "worker reported error");
            state.announce(Notice::error("Background Task Failed", message.clone()));
            (true, vec![])
        }
    }
}

/// Writes the log back through the worker if it changed, once the persisted
/// copy has been merged in.
fn persist_log(state: &mut AppState, actions: &mut Vec<Action>) {
    if !state.log_loaded || !state.email_log.take_dirty() {
        return;
    }
    tracing::debug!(entries = state.email_log.len(), "persisting email history");
    actions.push(Action::PostToWorker(WorkerMessage::save_email_log(
        state.email_log.entries().to_vec(),
    )));
}

/// Schedules a host timer for the simulator's next deadline unless one at or
/// before it is already armed.
fn arm_timer(state: &mut AppState, actions: &mut Vec<Action>) {
    let Some(deadline) = state.notifier.next_deadline() else {
        return;
    };
    if state.timer_armed_until.is_some_and(|armed| armed <= deadline) {
        return;
    }
    let now = state.clock.now();
    let delay_ms = u64::try_from((deadline - now).num_milliseconds()).unwrap_or(0);
    state.timer_armed_until = Some(deadline);
    tracing::trace!(delay_ms, "arming timer");
    actions.push(Action::ScheduleTimer { delay_ms });
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::VendorStore;
    use crate::domain::{EmailStatus, Vendor};
    use crate::notify::{ManualClock, Notifier, NotifierConfig, SimulatedTransport};
    use crate::ui::Theme;
    use chrono::DateTime;

    fn store(n: usize) -> VendorStore {
        VendorStore::new(
            (1..=n)
                .map(|i| Vendor {
                    id: format!("V-{i:03}"),
                    name: format!("Vendor {i}"),
                    category: Category::Electrical,
                    location: "Pune".to_string(),
                    status: Status::Active,
                    vendor_type: VendorType::Sap,
                    region: Region::West,
                    date: "2024-03-01".parse().unwrap(),
                })
                .collect(),
        )
        .unwrap()
    }

    fn state(n: usize, success_rate: u8) -> (AppState, ManualClock) {
        let clock = ManualClock::new(DateTime::from_timestamp_millis(1_700_000_000_000).unwrap());
        let notifier = Notifier::new(
            NotifierConfig {
                success_rate,
                ..NotifierConfig::default()
            },
            Box::new(SimulatedTransport::new(success_rate, 7)),
        );
        let state = AppState::new(store(n), Theme::default())
            .with_clock(Box::new(clock.clone()))
            .with_notifier(notifier);
        (state, clock)
    }

    fn run(state: &mut AppState, events: &[Event]) -> Vec<Action> {
        events
            .iter()
            .flat_map(|event| handle_event(state, event).unwrap().1)
            .collect()
    }

    fn notice_message(state: &AppState) -> &str {
        state.notice.as_ref().map_or("", |n| n.message.as_str())
    }

    fn saves(actions: &[Action]) -> usize {
        actions
            .iter()
            .filter(|a| matches!(a, Action::PostToWorker(WorkerMessage::SaveEmailLog { .. })))
            .count()
    }

    #[test]
    fn empty_code_stays_in_lookup() {
        let (mut state, _) = state(3, 100);
        run(&mut state, &[Event::CodeLookupMode, Event::Char(' '), Event::Submit]);
        assert_eq!(state.input_mode, InputMode::CodeLookup);
        assert_eq!(notice_message(&state), "Please enter a vendor code");
    }

    #[test]
    fn code_lookup_selects_vendor() {
        let (mut state, _) = state(23, 100);
        let mut events = vec![Event::CodeLookupMode];
        events.extend("v-014".chars().map(Event::Char));
        events.push(Event::Submit);
        run(&mut state, &events);

        assert_eq!(state.input_mode, InputMode::Normal);
        assert_eq!(state.selected_vendor().unwrap().id, "V-014");
        assert_eq!(notice_message(&state), "Vendor 14 - Pune");
    }

    #[test]
    fn bulk_of_ten_at_ninety_percent_is_partial() {
        let (mut state, clock) = state(10, 90);
        let actions = run(&mut state, &[Event::BulkEmail, Event::Confirm]);
        assert_eq!(actions, vec![Action::ScheduleTimer { delay_ms: 100 }]);
        assert_eq!(state.email_log.entries()[0].status, EmailStatus::Pending);

        clock.advance_ms(450);
        run(&mut state, &[Event::Tick]);
        assert_eq!(state.notifier.bulk_progress().unwrap().processed, 4);

        clock.advance_ms(1_000);
        run(&mut state, &[Event::Tick]);
        assert!(state.notifier.is_idle());
        assert_eq!(notice_message(&state), "Sent to 9 vendors, 1 failed");
        assert_eq!(state.email_log.len(), 1);
        assert_eq!(state.email_log.entries()[0].status, EmailStatus::Partial);
    }

    #[test]
    fn rejected_send_blocks_edits_until_resolved() {
        let (mut state, clock) = state(3, 0);
        let actions = run(&mut state, &[Event::SendEmail, Event::Confirm]);
        assert_eq!(actions, vec![Action::ScheduleTimer { delay_ms: 2_000 }]);

        run(&mut state, &[Event::EditSelected]);
        assert_eq!(state.input_mode, InputMode::Normal);
        assert!(state.editor.is_none());

        run(&mut state, &[Event::SendEmail]);
        assert_eq!(notice_message(&state), "Email to Vendor 1 is already sending");

        clock.advance_ms(2_000);
        run(&mut state, &[Event::Tick]);
        assert_eq!(
            notice_message(&state),
            "Failed to send email to Vendor 1. Please try again."
        );
        assert_eq!(state.email_log.entries()[0].status, EmailStatus::Failed);
        assert!(!state.notifier.is_sending("V-001"));
    }

    #[test]
    fn invalid_edit_leaves_store_untouched() {
        let (mut state, _) = state(3, 100);
        let mut events = vec![Event::EditSelected];
        events.extend(std::iter::repeat(Event::Backspace).take("Vendor 1".len()));
        events.push(Event::Submit);
        run(&mut state, &events);

        assert_eq!(state.input_mode, InputMode::Editing);
        assert_eq!(
            notice_message(&state),
            "Please fix the errors in the form (1)"
        );
        assert_eq!(state.store.get("V-001").unwrap().name, "Vendor 1");

        run(&mut state, &[Event::Char('Z'), Event::Submit]);
        assert_eq!(state.input_mode, InputMode::Normal);
        assert_eq!(state.store.get("V-001").unwrap().name, "Z");
    }

    #[test]
    fn log_is_persisted_only_after_history_loads() {
        let (mut state, clock) = state(3, 100);
        let actions = run(&mut state, &[Event::Started]);
        assert_eq!(actions, vec![Action::PostToWorker(WorkerMessage::load_email_log())]);

        let actions = run(&mut state, &[Event::SendEmail, Event::Confirm]);
        assert_eq!(saves(&actions), 0);

        let actions = run(
            &mut state,
            &[Event::WorkerResponse(WorkerResponse::EmailLogLoaded { entries: vec![] })],
        );
        assert_eq!(saves(&actions), 1);

        clock.advance_ms(2_000);
        let actions = run(&mut state, &[Event::Tick]);
        assert_eq!(saves(&actions), 1);
        assert_eq!(state.email_log.entries()[0].status, EmailStatus::Success);
    }

    #[test]
    fn unreadable_history_still_lets_new_entries_persist() {
        let (mut state, clock) = state(3, 100);
        run(&mut state, &[Event::Started, Event::SendEmail, Event::Confirm]);

        let actions = run(
            &mut state,
            &[Event::WorkerResponse(WorkerResponse::EmailLogLoadFailed {
                message: "load email history: invalid email history".to_string(),
            })],
        );
        assert!(state.log_loaded);
        assert_eq!(saves(&actions), 1);
        assert!(notice_message(&state).starts_with("load email history: invalid email history."));

        clock.advance_ms(2_000);
        assert_eq!(saves(&run(&mut state, &[Event::Tick])), 1);

        // A late successful load no longer merges over the live log.
        run(
            &mut state,
            &[Event::WorkerResponse(WorkerResponse::EmailLogLoaded { entries: vec![] })],
        );
        assert_eq!(state.email_log.len(), 1);
    }

    #[test]
    fn permission_result_does_not_gate_history() {
        let (mut state, _) = state(3, 100);
        assert!(run(&mut state, &[Event::PermissionsResult { granted: true }]).is_empty());
        assert!(run(&mut state, &[Event::PermissionsResult { granted: false }]).is_empty());
        assert_eq!(state.notice.as_ref().map(|n| n.title.as_str()), Some("Permissions Denied"));
    }

    #[test]
    fn oversized_send_delay_arms_a_bounded_timer() {
        let clock = ManualClock::new(DateTime::from_timestamp_millis(1_700_000_000_000).unwrap());
        let notifier = Notifier::new(
            NotifierConfig {
                success_rate: 100,
                send_delay_ms: u64::MAX,
                bulk_item_delay_ms: u64::MAX,
            },
            Box::new(SimulatedTransport::new(100, 7)),
        );
        let mut state = AppState::new(store(3), Theme::default())
            .with_clock(Box::new(clock.clone()))
            .with_notifier(notifier);

        let actions = run(&mut state, &[Event::SendEmail, Event::Confirm]);
        assert!(actions.contains(&Action::ScheduleTimer {
            delay_ms: crate::notify::MAX_DELAY_MS
        }));

        clock.advance_ms(i64::try_from(crate::notify::MAX_DELAY_MS).unwrap());
        run(&mut state, &[Event::Tick]);
        assert_eq!(state.email_log.entries()[0].status, EmailStatus::Success);
    }

    #[test]
    fn stale_load_after_clear_is_ignored() {
        let (mut state, clock) = state(3, 100);
        run(&mut state, &[Event::SendEmail, Event::Confirm]);
        clock.advance_ms(2_000);
        run(&mut state, &[Event::Tick, Event::ToggleHistory, Event::ClearHistory]);
        assert_eq!(state.input_mode, InputMode::Confirming);

        let actions = run(&mut state, &[Event::Confirm]);
        assert_eq!(actions, vec![Action::PostToWorker(WorkerMessage::clear_email_log())]);
        assert!(state.email_log.is_empty());

        let old = state.email_log.clone();
        let (render, _) = handle_event(
            &mut state,
            &Event::WorkerResponse(WorkerResponse::EmailLogLoaded {
                entries: vec![crate::domain::EmailLogEntry {
                    id: 1,
                    timestamp: DateTime::from_timestamp_millis(1).unwrap(),
                    vendor_name: "Old".to_string(),
                    vendor_id: "V-OLD".to_string(),
                    status: EmailStatus::Success,
                    message: "Email sent successfully".to_string(),
                }],
            }),
        )
        .unwrap();
        assert!(!render);
        assert_eq!(state.email_log, old);
    }

    #[test]
    fn export_requires_rows() {
        let (mut state, _) = state(3, 100);
        let actions = run(&mut state, &[Event::Export]);
        assert!(matches!(
            actions.as_slice(),
            [Action::PostToWorker(WorkerMessage::ExportVendors { vendors, .. })] if vendors.len() == 3
        ));

        let mut events = vec![Event::SearchMode];
        events.extend("zzz".chars().map(Event::Char));
        events.extend([Event::Submit, Event::Export]);
        let actions = run(&mut state, &events);
        assert!(actions.is_empty());
        assert_eq!(notice_message(&state), "No vendors to export");
    }

    #[test]
    fn date_lookup_needs_both_bounds() {
        let (mut state, _) = state(3, 100);
        let mut events = vec![Event::DateLookupMode];
        events.extend("2024-01-01".chars().map(Event::Char));
        events.push(Event::Submit);
        run(&mut state, &events);
        assert_eq!(notice_message(&state), "Please select both from and to dates");

        let mut events = vec![Event::NextField];
        events.extend("2024-12-31".chars().map(Event::Char));
        events.push(Event::Submit);
        run(&mut state, &events);
        assert_eq!(state.input_mode, InputMode::Normal);
        assert_eq!(notice_message(&state), "3 vendors found in the date range");
    }

    #[test]
    fn armed_timer_is_not_rescheduled_for_later_deadline() {
        let (mut state, clock) = state(3, 100);
        let first = run(&mut state, &[Event::SendEmail, Event::Confirm]);
        assert_eq!(first.len(), 1);

        clock.advance_ms(500);
        let second = run(&mut state, &[Event::KeyDown, Event::SendEmail, Event::Confirm]);
        assert!(second.is_empty());
        assert_eq!(state.notifier.in_flight_count(), 2);
    }
}
