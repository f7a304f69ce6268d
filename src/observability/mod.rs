//! OpenTelemetry-based observability with file-based trace export.
//!
//! `tracing` spans from both the plugin and the worker thread are bridged into
//! OpenTelemetry and written as OTLP JSON, one document per line, to
//! `vendorizer-otlp.json` in the plugin data directory.
//!
//! ```text
//! tracing → tracing-opentelemetry → TracerProvider → FileSpanExporter → RotatingFile
//! ```
//!
//! The level filter comes from the `trace_level` plugin option and defaults to
//! `info`. It accepts any `EnvFilter` directive, e.g.
//! `vendorizer::notify=debug,info`.
//!
//! # Modules
//!
//! - [`exporter`]: `SpanExporter` writing to a file, and the provider built on it
//! - [`otlp`]: OTLP JSON encoding of span batches
//! - [`rotation`]: Size-capped file with numbered backups

mod exporter;
mod otlp;
mod rotation;

use crate::Config;
use opentelemetry::trace::TracerProvider as _;
use opentelemetry_sdk::resource::Resource;
use tracing_opentelemetry::OpenTelemetryLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

pub use rotation::RotatingFile;

/// `service.name` resource attribute and instrumentation scope.
pub const SERVICE_NAME: &str = "Vendorizer";

/// Trace file name inside the data directory.
pub const TRACE_FILE: &str = "vendorizer-otlp.json";

const DEFAULT_LEVEL: &str = "info";

/// Installs the global subscriber.
///
/// Silently does nothing if the data directory can't be created or a
/// subscriber is already installed, so calling it from both the plugin and the
/// worker is harmless.
///
/// ```rust,no_run
/// use vendorizer::observability::init_tracing;
/// use vendorizer::Config;
///
/// init_tracing(&Config::default());
/// tracing::debug!("tracing is now active");
/// ```
pub fn init_tracing(config: &Config) {
    let level = config.trace_level.as_deref().unwrap_or(DEFAULT_LEVEL);
    let filter = EnvFilter::try_new(level).unwrap_or_else(|_| EnvFilter::new(DEFAULT_LEVEL));

    let data_dir = crate::infrastructure::get_data_dir();
    if std::fs::create_dir_all(&data_dir).is_err() {
        return;
    }

    let resource = Resource::new(vec![opentelemetry::KeyValue::new(
        "service.name",
        SERVICE_NAME,
    )]);
    let provider = exporter::tracer_provider(data_dir.join(TRACE_FILE), resource);
    let otel_layer = OpenTelemetryLayer::new(provider.tracer(SERVICE_NAME));

    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(otel_layer)
        .try_init();
}
