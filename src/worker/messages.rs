//! Worker thread message types for cross-thread communication.
//!
//! This module defines the request and response protocol between the plugin
//! thread and the background worker that owns storage and export I/O. Every
//! request carries the caller's trace context so worker spans join the trace
//! that triggered them.

use crate::domain::{EmailLogEntry, Vendor};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Distributed tracing context for cross-thread span propagation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TraceContext {
    /// OpenTelemetry trace ID as a hex string.
    pub trace_id: String,

    /// Parent span ID for linking spans across threads.
    pub parent_span_id: String,
}

impl TraceContext {
    /// Captures the trace and span IDs of the current tracing span.
    ///
    /// Returns `None` if the current span has no valid OpenTelemetry context,
    /// for example when tracing isn't initialized.
    #[must_use]
    pub fn from_current() -> Option<Self> {
        use opentelemetry::trace::TraceContextExt;
        use tracing_opentelemetry::OpenTelemetrySpanExt;

        let otel_context = tracing::Span::current().context();
        let span_ref = otel_context.span();
        let span_context = span_ref.span_context();

        if !span_context.is_valid() {
            tracing::trace!("no valid span context to propagate");
            return None;
        }

        Some(Self {
            trace_id: format!("{:032x}", span_context.trace_id()),
            parent_span_id: format!("{:016x}", span_context.span_id()),
        })
    }
}

/// Generates `WorkerMessage` constructors that attach the current trace context.
macro_rules! worker_message_builders {
    (
        $(
            $builder_name:ident($variant:ident { $($field:ident: $ty:ty),* $(,)? })
        ),* $(,)?
    ) => {
        impl WorkerMessage {
            $(
                #[doc = concat!("Create a ", stringify!($variant), " message with current trace context")]
                #[must_use]
                pub fn $builder_name($($field: $ty),*) -> Self {
                    Self::$variant {
                        $($field,)*
                        trace_context: TraceContext::from_current(),
                    }
                }
            )*
        }
    };
}

worker_message_builders! {
    load_email_log(LoadEmailLog {}),
    save_email_log(SaveEmailLog { entries: Vec<EmailLogEntry> }),
    clear_email_log(ClearEmailLog {}),
    export_vendors(ExportVendors { vendors: Vec<Vendor>, dir: String, date: NaiveDate }),
}

/// Requests from the plugin thread to the worker thread.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum WorkerMessage {
    /// Read the persisted email history.
    LoadEmailLog {
        #[serde(skip_serializing_if = "Option::is_none")]
        trace_context: Option<TraceContext>,
    },

    /// Replace the persisted email history.
    SaveEmailLog {
        /// Full log, newest first.
        entries: Vec<EmailLogEntry>,

        #[serde(skip_serializing_if = "Option::is_none")]
        trace_context: Option<TraceContext>,
    },

    /// Delete the persisted email history.
    ClearEmailLog {
        #[serde(skip_serializing_if = "Option::is_none")]
        trace_context: Option<TraceContext>,
    },

    /// Write a CSV export of `vendors` into `dir`.
    ExportVendors {
        vendors: Vec<Vendor>,

        /// Target directory.
        dir: String,

        /// Date used to name the file.
        date: NaiveDate,

        #[serde(skip_serializing_if = "Option::is_none")]
        trace_context: Option<TraceContext>,
    },
}

impl WorkerMessage {
    /// Trace context carried by any variant.
    #[must_use]
    pub const fn trace_context(&self) -> Option<&TraceContext> {
        match self {
            Self::LoadEmailLog { trace_context }
            | Self::SaveEmailLog { trace_context, .. }
            | Self::ClearEmailLog { trace_context }
            | Self::ExportVendors { trace_context, .. } => trace_context.as_ref(),
        }
    }

    /// Whether handling this message needs the key-value store.
    #[must_use]
    pub const fn needs_storage(&self) -> bool {
        !matches!(self, Self::ExportVendors { .. })
    }

    /// Short name for span fields.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::LoadEmailLog { .. } => "load_email_log",
            Self::SaveEmailLog { .. } => "save_email_log",
            Self::ClearEmailLog { .. } => "clear_email_log",
            Self::ExportVendors { .. } => "export_vendors",
        }
    }
}

/// Responses from the worker thread back to the plugin thread.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum WorkerResponse {
    /// The persisted history, newest first.
    EmailLogLoaded { entries: Vec<EmailLogEntry> },

    /// The persisted history could not be read: storage failed to open or
    /// the stored value is malformed.
    EmailLogLoadFailed { message: String },

    /// The history was written.
    EmailLogSaved { count: usize },

    /// The history was deleted.
    EmailLogCleared,

    /// An export file was written.
    VendorsExported {
        /// Full path of the written file.
        path: String,
        count: usize,
    },

    /// The operation failed.
    Error {
        /// Human-readable error message.
        message: String,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builders_skip_absent_trace_context() {
        let message = WorkerMessage::load_email_log();
        assert_eq!(message.trace_context(), None);

        let json = serde_json::to_string(&message).unwrap();
        assert_eq!(json, r#"{"LoadEmailLog":{}}"#);
    }

    #[test]
    fn export_message_survives_the_wire() {
        let message = WorkerMessage::export_vendors(
            vec![],
            "/tmp/out".to_string(),
            NaiveDate::from_ymd_opt(2024, 5, 6).unwrap(),
        );
        let json = serde_json::to_string(&message).unwrap();
        let back: WorkerMessage = serde_json::from_str(&json).unwrap();
        assert_eq!(back, message);
        assert_eq!(back.kind(), "export_vendors");
    }
}
