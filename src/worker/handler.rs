//! Worker thread implementation for storage and export I/O.
//!
//! The plugin thread never touches the filesystem. It posts [`WorkerMessage`]s
//! here and folds the [`WorkerResponse`]s back into its state.

use crate::domain::error::{Result, VendorizerError};
use crate::export;
use crate::infrastructure::paths;
use crate::storage::{email_history, JsonStorage, Storage};
use crate::worker::{WorkerMessage, WorkerResponse};
use serde::{Deserialize, Serialize};
use std::path::Path;
use zellij_tile::prelude::{PluginMessage, ZellijWorker};
use zellij_tile::shim::post_message_to_plugin;

/// File holding the key-value store, inside the data directory.
pub const STORAGE_FILE: &str = "vendorizer.json";

/// Worker thread state.
///
/// Storage is opened lazily on the first message.
#[derive(Serialize, Deserialize, Default)]
pub struct VendorizerWorker {
    #[serde(skip)]
    storage: Option<Box<dyn Storage>>,
}

impl VendorizerWorker {
    /// Opens the default JSON store in the plugin data directory.
    ///
    /// # Errors
    ///
    /// Returns an error if the storage backend cannot be initialized.
    pub fn open_default() -> Result<Self> {
        let path = paths::get_data_dir().join(STORAGE_FILE);
        Ok(Self::with_storage(Box::new(JsonStorage::new(path)?)))
    }

    /// Creates a worker over an existing backend.
    #[must_use]
    pub fn with_storage(storage: Box<dyn Storage>) -> Self {
        Self {
            storage: Some(storage),
        }
    }

    fn get_storage(&mut self) -> Result<&mut Box<dyn Storage>> {
        self.storage
            .as_mut()
            .ok_or_else(|| VendorizerError::Worker("Storage not initialized".to_string()))
    }

    /// Logs the result of `operation` and maps it to a response.
    fn handle_result<T, F>(operation: &str, result: Result<T>, on_success: F) -> WorkerResponse
    where
        F: FnOnce(T) -> WorkerResponse,
    {
        match result {
            Ok(value) => {
                tracing::debug!(operation, "worker operation successful");
                on_success(value)
            }
            Err(e) => {
                tracing::warn!(operation, error = %e, "worker operation failed");
                WorkerResponse::Error {
                    message: format!("{operation}: {e}"),
                }
            }
        }
    }

    /// Reconnects worker spans to the plugin-side span that sent `message`.
    fn attach_parent_trace_context(message: &WorkerMessage) -> Option<opentelemetry::ContextGuard> {
        use opentelemetry::trace::{SpanContext, SpanId, TraceContextExt, TraceFlags, TraceId, TraceState};

        let trace_context = message.trace_context()?;
        let trace_id = TraceId::from_hex(&trace_context.trace_id).ok()?;
        let span_id = SpanId::from_hex(&trace_context.parent_span_id).ok()?;

        let span_context = SpanContext::new(
            trace_id,
            span_id,
            TraceFlags::SAMPLED,
            true,
            TraceState::default(),
        );

        Some(
            opentelemetry::Context::current()
                .with_remote_span_context(span_context)
                .attach(),
        )
    }

    /// Processes one request.
    pub fn handle_message(&mut self, message: WorkerMessage) -> WorkerResponse {
        let _context_guard = Self::attach_parent_trace_context(&message);
        let _span = tracing::debug_span!("worker_handle_message", kind = message.kind()).entered();

        match message {
            WorkerMessage::LoadEmailLog { .. } => {
                match Self::handle_result(
                    "load email history",
                    self.get_storage().and_then(|storage| email_history::load(storage.as_ref())),
                    |entries| WorkerResponse::EmailLogLoaded { entries },
                ) {
                    WorkerResponse::Error { message } => WorkerResponse::EmailLogLoadFailed { message },
                    response => response,
                }
            }

            WorkerMessage::SaveEmailLog { entries, .. } => Self::handle_result(
                "save email history",
                self.get_storage()
                    .and_then(|storage| email_history::save(storage.as_mut(), &entries)),
                |()| WorkerResponse::EmailLogSaved {
                    count: entries.len(),
                },
            ),

            WorkerMessage::ClearEmailLog { .. } => Self::handle_result(
                "clear email history",
                self.get_storage().and_then(|storage| email_history::clear(storage.as_mut())),
                |()| WorkerResponse::EmailLogCleared,
            ),

            WorkerMessage::ExportVendors {
                vendors, dir, date, ..
            } => Self::handle_result(
                "export vendors",
                export::export_to_dir(Path::new(&dir), &vendors, date),
                |path| WorkerResponse::VendorsExported {
                    path: path.display().to_string(),
                    count: vendors.len(),
                },
            ),
        }
    }

    /// Handles `message`, first opening storage with `open` if the message
    /// needs it and none is open yet. Exports never wait on storage.
    pub fn respond<F>(&mut self, message: WorkerMessage, open: F) -> WorkerResponse
    where
        F: FnOnce() -> Result<Self>,
    {
        if message.needs_storage() && self.storage.is_none() {
            match open() {
                Ok(worker) => self.storage = worker.storage,
                Err(e) => {
                    tracing::warn!(error = %e, kind = message.kind(), "failed to initialize storage");
                    let message_text = format!("Failed to initialize storage: {e}");
                    return match message {
                        WorkerMessage::LoadEmailLog { .. } => WorkerResponse::EmailLogLoadFailed {
                            message: message_text,
                        },
                        _ => WorkerResponse::Error {
                            message: message_text,
                        },
                    };
                }
            }
        }
        self.handle_message(message)
    }

    fn post(name: String, response: &WorkerResponse) {
        match serde_json::to_string(response) {
            Ok(payload) => post_message_to_plugin(PluginMessage {
                name,
                payload,
                worker_name: None,
            }),
            Err(e) => tracing::warn!(error = %e, "failed to serialize worker response"),
        }
    }
}

static WORKER_TRACING_INITIALIZED: std::sync::atomic::AtomicBool =
    std::sync::atomic::AtomicBool::new(false);

impl ZellijWorker<'_> for VendorizerWorker {
    fn on_message(&mut self, message: String, payload: String) {
        if !WORKER_TRACING_INITIALIZED.swap(true, std::sync::atomic::Ordering::Relaxed) {
            crate::observability::init_tracing(&crate::Config::default());
        }

        let worker_message: WorkerMessage = match serde_json::from_str(&payload) {
            Ok(msg) => msg,
            Err(e) => {
                tracing::warn!(error = %e, "failed to deserialize worker message");
                return;
            }
        };

        let response = self.respond(worker_message, Self::open_default);
        Self::post(message, &response);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{EmailLogEntry, EmailStatus};
    use chrono::{DateTime, NaiveDate};

    fn worker(dir: &Path) -> VendorizerWorker {
        let storage = JsonStorage::new(dir.join(STORAGE_FILE)).unwrap();
        VendorizerWorker::with_storage(Box::new(storage))
    }

    fn entry(id: i64) -> EmailLogEntry {
        EmailLogEntry {
            id,
            timestamp: DateTime::from_timestamp_millis(id).unwrap(),
            vendor_name: "Vendor".to_string(),
            vendor_id: "V".to_string(),
            status: EmailStatus::Failed,
            message: "Email delivery failed".to_string(),
        }
    }

    #[test]
    fn history_round_trips_through_worker() {
        let dir = tempfile::tempdir().unwrap();
        let mut w = worker(dir.path());

        let saved = w.handle_message(WorkerMessage::save_email_log(vec![entry(2), entry(1)]));
        assert_eq!(saved, WorkerResponse::EmailLogSaved { count: 2 });

        let loaded = w.handle_message(WorkerMessage::load_email_log());
        assert_eq!(
            loaded,
            WorkerResponse::EmailLogLoaded {
                entries: vec![entry(2), entry(1)]
            }
        );

        assert_eq!(
            w.handle_message(WorkerMessage::clear_email_log()),
            WorkerResponse::EmailLogCleared
        );
        assert_eq!(
            w.handle_message(WorkerMessage::load_email_log()),
            WorkerResponse::EmailLogLoaded { entries: vec![] }
        );
    }

    fn unopenable() -> Result<VendorizerWorker> {
        Err(VendorizerError::Storage("read-only filesystem".to_string()))
    }

    fn vendors() -> Vec<crate::domain::Vendor> {
        crate::catalog::seed::bundled().unwrap().all()[..3].to_vec()
    }

    #[test]
    fn uninitialized_storage_fails_the_load() {
        let mut w = VendorizerWorker::default();
        let response = w.handle_message(WorkerMessage::load_email_log());
        assert!(matches!(response, WorkerResponse::EmailLogLoadFailed { message } if message.starts_with("load email history")));
    }

    #[test]
    fn malformed_history_fails_the_load() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join(STORAGE_FILE), r#"{"version": 1, "entries": {"emailHistory": {"bad": 1}}}"#).unwrap();
        let mut w = worker(dir.path());

        let response = w.handle_message(WorkerMessage::load_email_log());
        assert!(matches!(response, WorkerResponse::EmailLogLoadFailed { .. }));

        // A save replaces the malformed value.
        w.handle_message(WorkerMessage::save_email_log(vec![entry(1)]));
        assert_eq!(
            w.handle_message(WorkerMessage::load_email_log()),
            WorkerResponse::EmailLogLoaded {
                entries: vec![entry(1)]
            }
        );
    }

    #[test]
    fn storage_open_failure_is_reported_per_message() {
        let mut w = VendorizerWorker::default();
        let load = w.respond(WorkerMessage::load_email_log(), unopenable);
        assert!(matches!(load, WorkerResponse::EmailLogLoadFailed { message } if message.contains("read-only filesystem")));

        let save = w.respond(WorkerMessage::save_email_log(vec![entry(1)]), unopenable);
        assert!(matches!(save, WorkerResponse::Error { .. }));
    }

    #[test]
    fn export_does_not_need_storage() {
        let dir = tempfile::tempdir().unwrap();
        let mut w = VendorizerWorker::default();
        let response = w.respond(
            WorkerMessage::export_vendors(
                vendors(),
                dir.path().display().to_string(),
                NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
            ),
            unopenable,
        );
        assert!(matches!(response, WorkerResponse::VendorsExported { count: 3, .. }));
    }

    #[test]
    fn empty_export_reports_error() {
        let dir = tempfile::tempdir().unwrap();
        let mut w = worker(dir.path());
        let response = w.handle_message(WorkerMessage::export_vendors(
            vec![],
            dir.path().display().to_string(),
            NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
        ));
        assert!(matches!(response, WorkerResponse::Error { .. }));
    }
}
