//! Storage layer for the persisted email history.
//!
//! A generic key-value [`Storage`] trait backed by one JSON file, plus typed
//! helpers for the one key the plugin writes.
//!
//! # Modules
//!
//! - `backend`: Storage trait abstraction for backend implementations
//! - `json`: JSON file-based storage implementation
//! - `email_history`: Load/save/clear of the `emailHistory` key

pub mod backend;
pub mod email_history;
pub mod json;

pub use backend::Storage;
pub use email_history::EMAIL_HISTORY_KEY;
pub use json::JsonStorage;
