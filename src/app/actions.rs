//! Actions representing side effects to be executed by the plugin runtime.
//!
//! The event handler never calls into Zellij itself. It returns a `Vec<Action>`
//! and the runtime shim in `main.rs` executes them in order.
//!
//! # Example
//!
//! ```rust
//! use vendorizer::app::Action;
//! use vendorizer::worker::WorkerMessage;
//!
//! let actions = vec![
//!     Action::PostToWorker(WorkerMessage::load_email_log()),
//!     Action::ScheduleTimer { delay_ms: 2_000 },
//! ];
//! assert_eq!(actions.len(), 2);
//! ```

use crate::worker::WorkerMessage;

/// Commands representing side effects to be executed by the plugin runtime.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    /// Hides the plugin pane.
    CloseFocus,

    /// Posts a message to the background worker thread.
    PostToWorker(WorkerMessage),

    /// Arms a one-shot timer; its expiry arrives as `Event::Tick`.
    ScheduleTimer {
        /// Milliseconds from now.
        delay_ms: u64,
    },
}
