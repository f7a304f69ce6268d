//! Application layer coordinating state, events, and actions.
//!
//! This module sits between the plugin runtime (`main.rs`) and the
//! catalog/notify/worker layers. It implements the event-driven architecture
//! that powers the interactive UI.
//!
//! # Architecture
//!
//! ```text
//! Key / Timer → Events → Event Handler → State Mutations → Actions → Side Effects
//!                            ↑                                   ↓
//!                            └──────── Worker Responses ─────────┘
//! ```
//!
//! # Modules
//!
//! - [`actions`]: Side effect commands emitted by the event handler
//! - [`handler`]: Event processing logic and state transition coordinator
//! - [`modes`]: Input and view mode types
//! - [`notice`]: The status-line outcome announcement
//! - [`prompt`]: Yes/no confirmations guarding sends and history clearing
//! - [`state`]: Central application state container and view model computation
//!
//! # Example
//!
//! ```rust
//! use vendorizer::app::{handle_event, AppState, Event, InputMode};
//! use vendorizer::catalog::seed;
//! use vendorizer::ui::Theme;
//!
//! let mut state = AppState::new(seed::bundled()?, Theme::default());
//! handle_event(&mut state, &Event::SearchMode)?;
//! assert_eq!(state.input_mode, InputMode::Search);
//! # Ok::<(), vendorizer::domain::VendorizerError>(())
//! ```

pub mod actions;
pub mod handler;
pub mod modes;
pub mod notice;
pub mod prompt;
pub mod state;

pub use actions::Action;
pub use handler::{handle_event, Event};
pub use modes::{DateBound, DateRangeInput, InputMode, View};
pub use notice::{Notice, NoticeLevel};
pub use prompt::Prompt;
pub use state::AppState;
