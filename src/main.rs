//! Zellij plugin wrapper and entry point.
//!
//! This module provides the thin integration layer between the Vendorizer library
//! and the Zellij plugin system. It implements the `ZellijPlugin` and
//! `ZellijWorker` traits to handle Zellij events and lifecycle.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────┐
//! │   Zellij Main Thread    │
//! │  ┌──────────────────┐   │
//! │  │  State (plugin)  │   │  ← UI state, event handling, send simulation
//! │  └──────────────────┘   │
//! │          │              │
//! │          │ IPC          │
//! │          ▼              │
//! │  ┌──────────────────┐   │
//! │  │ VendorizerWorker │   │  ← Email history storage, CSV export
//! │  │ (worker thread)  │   │
//! │  └──────────────────┘   │
//! └─────────────────────────┘
//! ```
//!
//! # Plugin Lifecycle
//!
//! 1. **Load**: Parse config, initialize tracing, create `AppState`
//! 2. **Subscribe**: Register for Key, `Timer`, `CustomMessage`, permission events
//! 3. **Start**: Ask the worker for the persisted email history
//! 4. **Update**: Handle events, delegate to library layer, run the returned actions
//! 5. **Timer**: Wake-ups requested by the library advance in-flight sends
//! 6. **Render**: Call library render function
//!
//! # Worker Communication
//!
//! Messages between plugin and worker use JSON serialization:
//!
//! - Plugin → Worker: [`WorkerMessage`] (`LoadEmailLog`, `SaveEmailLog`, `ExportVendors`, ...)
//! - Worker → Plugin: [`WorkerResponse`] (`EmailLogLoaded`, `VendorsExported`, error details)
//!
//! # Keybindings
//!
//! Vendor table:
//! - `j`/`Down`, `k`/`Up` (or `Ctrl+n`/`Ctrl+p`): Move selection
//! - `l`/`Right`, `h`/`Left`: Next/previous page
//! - `/`: Edit the search query
//! - `c`, `t`, `s`, `r`: Cycle category, type, status, region filter
//! - `d`: Edit the date-range filter
//! - `x`: Clear field filters
//! - `p`: Cycle page size
//! - `e`/`Enter`: Edit selected vendor
//! - `m`: Email selected vendor
//! - `B`: Email every filtered vendor
//! - `g`: Fetch vendor by code
//! - `f`: Fetch vendors by date range
//! - `E`: Export filtered vendors to CSV
//! - `H`: Email history
//! - `Esc`: Dismiss notice
//! - `q`: Close plugin
//!
//! Email history:
//! - `j`/`k`: Scroll
//! - `C`: Clear history
//! - `H`/`Esc`: Back to the table
//!
//! Text inputs (search, dates, code, editor):
//! - Characters are typed, `Backspace` deletes
//! - `Tab`/`Shift+Tab`: Next/previous field or date bound
//! - `Left`/`Right`: Cycle a select field in the editor
//! - `Enter`: Apply, `Esc`: Cancel
//!
//! Confirmation dialogs:
//! - `y`/`Enter`: Confirm
//! - `n`/`Esc`: Cancel

#![allow(clippy::multiple_crate_versions)]

use std::collections::BTreeMap;
use zellij_tile::prelude::*;
use zellij_tile::shim::post_message_to;

use vendorizer::worker::{VendorizerWorker, WorkerMessage, WorkerResponse};
use vendorizer::{handle_event, Action, Config, Event, InputMode, View};

// Register plugin and worker with Zellij
register_plugin!(State);
register_worker!(VendorizerWorker, vendorizer_worker, VENDORIZER_WORKER);

/// Plugin state wrapper.
///
/// Wraps the library's `AppState` with Zellij-specific concerns like worker
/// communication.
struct State {
    /// Core application state from library layer.
    app: vendorizer::AppState,

    /// Worker thread identifier for IPC messaging.
    worker_name: String,
}

impl Default for State {
    fn default() -> Self {
        let default_config = Config::default();
        Self {
            app: vendorizer::initialize(&default_config),
            worker_name: "vendorizer".to_string(),
        }
    }
}

impl ZellijPlugin for State {
    /// Initializes the plugin on load.
    ///
    /// Parses configuration, initializes application state, requests
    /// permissions, subscribes to events, and asks the worker for the email
    /// history.
    ///
    /// # Subscriptions
    ///
    /// - `Key`: Keyboard input
    /// - `Timer`: Wake-ups for simulated sends
    /// - `CustomMessage`: Worker responses
    /// - `PermissionRequestResult`: Permission grant
    fn load(&mut self, configuration: BTreeMap<String, String>) {
        let config = Config::from_zellij(&configuration);
        vendorizer::observability::init_tracing(&config);

        let span = tracing::debug_span!("plugin_load");
        let _guard = span.entered();

        tracing::debug!(
            page_size = config.page_size.rows(),
            vendors_file = ?config.vendors_file,
            "parsed configuration"
        );
        self.app = vendorizer::initialize(&config);

        tracing::debug!("requesting permissions");
        request_permission(&[
            PermissionType::ReadApplicationState,
            PermissionType::ChangeApplicationState,
        ]);

        subscribe(&[
            EventType::Key,
            EventType::Timer,
            EventType::CustomMessage,
            EventType::PermissionRequestResult,
        ]);

        // History lives in the worker's data directory and needs no grant.
        match handle_event(&mut self.app, &Event::Started) {
            Ok((_, actions)) => {
                for a in actions {
                    self.execute_action(&a);
                }
            }
            Err(e) => tracing::warn!(error = %e, "error starting plugin"),
        }

        tracing::debug!("plugin load complete");
    }

    /// Handles incoming Zellij events.
    ///
    /// Translates Zellij events to library events, delegates to `handle_event`,
    /// and executes resulting actions. Returns `true` if the UI should re-render.
    fn update(&mut self, event: zellij_tile::prelude::Event) -> bool {
        let event_name = Self::get_event_name(&event);
        let span = tracing::debug_span!("plugin_update_event", event_type = %event_name);
        let _guard = span.entered();

        let our_event = match event {
            zellij_tile::prelude::Event::Key(ref key) => match self.map_key_event(key) {
                Some(event) => event,
                None => return false,
            },
            zellij_tile::prelude::Event::Timer(_elapsed) => Event::Tick,
            zellij_tile::prelude::Event::CustomMessage(message, payload) => {
                match self.map_custom_message_event(&message, &payload) {
                    Some(event) => event,
                    None => return false,
                }
            }
            zellij_tile::prelude::Event::PermissionRequestResult(permissions) => {
                let granted = matches!(permissions, PermissionStatus::Granted);
                Event::PermissionsResult { granted }
            }
            _ => return false,
        };

        match handle_event(&mut self.app, &our_event) {
            Ok((should_render, actions)) => {
                tracing::debug!(
                    action_count = actions.len(),
                    should_render,
                    "event handled successfully"
                );
                for a in actions {
                    self.execute_action(&a);
                }
                should_render
            }
            Err(e) => {
                tracing::warn!(error = %e, "error handling event");
                false
            }
        }
    }

    /// Renders the plugin UI by delegating to the library's rendering layer.
    fn render(&mut self, rows: usize, cols: usize) {
        vendorizer::ui::render(&self.app, rows, cols);
    }
}

impl State {
    /// Gets a string name for a Zellij event for logging purposes.
    fn get_event_name(event: &zellij_tile::prelude::Event) -> String {
        match event {
            zellij_tile::prelude::Event::Key(key) => format!("Key({:?})", key.bare_key),
            zellij_tile::prelude::Event::Timer(_) => "Timer".to_string(),
            zellij_tile::prelude::Event::CustomMessage(msg, _) => format!("CustomMessage({msg})"),
            zellij_tile::prelude::Event::PermissionRequestResult(..) => {
                "PermissionRequestResult".to_string()
            }
            _ => "Other".to_string(),
        }
    }

    /// Maps keyboard events to application events for the current mode.
    fn map_key_event(&self, key: &KeyWithModifier) -> Option<Event> {
        tracing::debug!(bare_key = ?key.bare_key, mode = ?self.app.input_mode, "key event");

        match self.app.input_mode {
            InputMode::Normal => Self::map_normal_key(key, self.app.view),
            InputMode::Confirming => Self::map_confirm_key(key),
            InputMode::Search
            | InputMode::DateFilter
            | InputMode::CodeLookup
            | InputMode::DateLookup
            | InputMode::Editing => Self::map_text_key(key),
        }
    }

    fn map_normal_key(key: &KeyWithModifier, view: View) -> Option<Event> {
        if key.has_modifiers(&[KeyModifier::Ctrl]) {
            return match key.bare_key {
                BareKey::Char('n') => Some(Event::KeyDown),
                BareKey::Char('p') => Some(Event::KeyUp),
                _ => None,
            };
        }

        Some(match key.bare_key {
            BareKey::Down | BareKey::Char('j') => Event::KeyDown,
            BareKey::Up | BareKey::Char('k') => Event::KeyUp,
            BareKey::Esc => Event::Escape,
            BareKey::Char('q') => Event::CloseFocus,
            BareKey::Char('H') => Event::ToggleHistory,
            BareKey::Char('C') if view == View::History => Event::ClearHistory,
            _ if view == View::History => return None,

            BareKey::Right | BareKey::Char('l') => Event::NextPage,
            BareKey::Left | BareKey::Char('h') => Event::PrevPage,
            BareKey::Char('/') => Event::SearchMode,
            BareKey::Char('c') => Event::CycleCategory,
            BareKey::Char('t') => Event::CycleType,
            BareKey::Char('s') => Event::CycleStatus,
            BareKey::Char('r') => Event::CycleRegion,
            BareKey::Char('d') => Event::DateFilterMode,
            BareKey::Char('x') => Event::ClearFilters,
            BareKey::Char('p') => Event::CyclePageSize,
            BareKey::Enter | BareKey::Char('e') => Event::EditSelected,
            BareKey::Char('m') => Event::SendEmail,
            BareKey::Char('B') => Event::BulkEmail,
            BareKey::Char('g') => Event::CodeLookupMode,
            BareKey::Char('f') => Event::DateLookupMode,
            BareKey::Char('E') => Event::Export,
            _ => return None,
        })
    }

    fn map_text_key(key: &KeyWithModifier) -> Option<Event> {
        Some(match key.bare_key {
            BareKey::Tab if key.has_modifiers(&[KeyModifier::Shift]) => Event::PrevField,
            BareKey::Tab => Event::NextField,
            BareKey::Right => Event::CycleForward,
            BareKey::Left => Event::CycleBackward,
            BareKey::Enter => Event::Submit,
            BareKey::Esc => Event::Escape,
            BareKey::Backspace => Event::Backspace,
            BareKey::Char(c) if !key.has_modifiers(&[KeyModifier::Ctrl]) => Event::Char(c),
            _ => return None,
        })
    }

    fn map_confirm_key(key: &KeyWithModifier) -> Option<Event> {
        Some(match key.bare_key {
            BareKey::Char('y' | 'Y') | BareKey::Enter => Event::Confirm,
            BareKey::Char('n' | 'N') => Event::Decline,
            BareKey::Esc => Event::Escape,
            _ => return None,
        })
    }

    /// Maps custom message events to application events.
    fn map_custom_message_event(&self, message: &str, payload: &str) -> Option<Event> {
        tracing::debug!(message_name = %message, payload_len = payload.len(), "custom message event");

        if message == self.worker_name {
            match serde_json::from_str::<WorkerResponse>(payload) {
                Ok(response) => {
                    tracing::debug!(response = ?response, "worker response received");
                    Some(Event::WorkerResponse(response))
                }
                Err(e) => {
                    tracing::debug!(error = %e, "failed to deserialize worker response");
                    None
                }
            }
        } else {
            tracing::debug!(message_name = %message, "ignoring custom message with unknown name");
            None
        }
    }

    /// Posts a message to the worker thread as JSON.
    ///
    /// Serialization errors are logged, not propagated.
    fn post_worker_message(&self, message: &WorkerMessage) {
        match serde_json::to_string(&message) {
            Ok(payload) => {
                tracing::debug!(payload_len = payload.len(), "posting message to worker");
                post_message_to(PluginMessage {
                    worker_name: Some(self.worker_name.clone()),
                    name: self.worker_name.clone(),
                    payload,
                });
            }
            Err(e) => {
                tracing::warn!(error = %e, "failed to serialize worker message");
            }
        }
    }

    /// Executes an action returned from event handling.
    ///
    /// - `CloseFocus`: Hide the plugin pane
    /// - `PostToWorker`: Send IPC message to worker thread
    /// - `ScheduleTimer`: Ask Zellij for a `Timer` event after the delay
    #[tracing::instrument(level = "debug", skip(self))]
    fn execute_action(&self, action: &Action) {
        match action {
            Action::CloseFocus => {
                tracing::debug!("closing plugin focus");
                hide_self();
            }
            Action::PostToWorker(ref message) => {
                tracing::debug!(kind = message.kind(), "posting message to worker");
                self.post_worker_message(message);
            }
            Action::ScheduleTimer { delay_ms } => {
                #[allow(clippy::cast_precision_loss)]
                let secs = *delay_ms as f64 / 1000.0;
                set_timeout(secs);
            }
        }
    }
}
