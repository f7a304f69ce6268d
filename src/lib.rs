//! Vendorizer: a Zellij plugin for browsing and administering vendor records.
//!
//! Vendorizer is a single-screen admin tool that provides:
//! - A filterable, paginated vendor table (free text, category, type, status,
//!   region, date range)
//! - In-place editing of vendor records with per-field validation
//! - Simulated email notifications to one vendor or to every filtered vendor,
//!   with a persisted email history
//! - Lookup by vendor code or date range
//! - CSV export of the filtered list

#![allow(clippy::multiple_crate_versions)]

//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────┐
//! │  Zellij Plugin Shim (main.rs)                       │  ← Entry point
//! └─────────────────────────────────────────────────────┘
//!                        │
//! ┌─────────────────────────────────────────────────────┐
//! │  Application Layer (app/)                           │  ← State machine
//! │  - Event handling, prompts, notices                 │
//! │  - View model computation                           │
//! └─────────────────────────────────────────────────────┘
//!         │                    │                    │
//! ┌───────────────┐   ┌───────────────┐   ┌───────────────┐
//! │ Catalog       │   │ Notify        │   │ Worker        │
//! │ (catalog/)    │   │ (notify/)     │   │ (worker/)     │
//! │ - Store       │   │ - Simulator   │   │ - Storage I/O │
//! │ - Filter/page │   │ - Email log   │   │ - CSV export  │
//! │ - Editor      │   │ - Transport   │   │ - IPC bridge  │
//! └───────────────┘   └───────────────┘   └───────────────┘
//!         │                    │                    │
//! ┌─────────────────────────────────────────────────────┐
//! │  Domain, Storage, Export, Infrastructure            │
//! │  - Vendor, criteria, log entry, errors (domain/)    │
//! │  - Key-value JSON storage (storage/)                │
//! │  - CSV writer (export/)                             │
//! │  - Sandbox paths (infrastructure/)                  │
//! └─────────────────────────────────────────────────────┘
//!                        │
//! ┌─────────────────────────────────────────────────────┐
//! │  Observability (observability/)                     │
//! │  - OpenTelemetry tracing to a rotating OTLP file    │
//! └─────────────────────────────────────────────────────┘
//! ```
//!
//! # Modules
//!
//! - [`app`]: Application state machine with event/action model
//! - [`catalog`]: Vendor store, filter engine, paginator, editor, lookups, seed data
//! - [`notify`]: Notification simulator, email log, clock and transport seams
//! - [`domain`]: Core domain types and errors
//! - [`storage`]: Key-value persistence with a JSON file backend
//! - [`export`]: CSV export
//! - [`worker`]: Background worker for storage and export I/O
//! - [`infrastructure`]: Sandbox paths
//! - [`ui`]: Terminal rendering with theme support
//! - [`observability`]: OpenTelemetry tracing
//!
//! # Configuration
//!
//! ```kdl
//! pane {
//!     plugin location="file:/path/to/vendorizer.wasm" {
//!         theme "catppuccin-mocha"
//!         page_size "25"
//!         vendors_file "~/vendors.json"
//!         export_dir "~/Downloads"
//!         success_rate "90"
//!         trace_level "info"
//!     }
//! }
//! ```
//!
//! # Example
//!
//! ```rust
//! use vendorizer::{handle_event, initialize, Config, Event};
//!
//! let mut state = initialize(&Config::default());
//! for event in [Event::KeyDown, Event::NextPage, Event::CyclePageSize] {
//!     let (_render, _actions) = handle_event(&mut state, &event)?;
//! }
//! assert_eq!(state.page, 1);
//! # Ok::<(), vendorizer::VendorizerError>(())
//! ```

pub mod app;
pub mod catalog;
pub mod domain;
pub mod export;
pub mod infrastructure;
pub mod notify;
pub mod storage;
pub mod worker;

pub mod ui;

pub mod observability;

pub use app::{handle_event, Action, AppState, Event, InputMode, View};
pub use domain::{Result, Vendor, VendorizerError};
pub use ui::Theme;

use catalog::PageSize;
use notify::{Notifier, NotifierConfig, SimulatedTransport, MAX_DELAY_MS};
use std::collections::BTreeMap;

/// Plugin configuration parsed from Zellij's configuration map.
///
/// Every option is optional; unparsable values fall back to the default.
#[derive(Debug, Clone, Default)]
pub struct Config {
    /// Built-in theme name. Ignored if `theme_file` is set.
    pub theme_name: Option<String>,

    /// Path to a custom TOML theme file. See [`ui::theme`] for the format.
    pub theme_file: Option<String>,

    /// `EnvFilter` directive for traces. Default: `"info"`.
    pub trace_level: Option<String>,

    /// Initial rows per page: 10, 25, 50, or 100.
    pub page_size: PageSize,

    /// JSON vendor list replacing the bundled seed data.
    pub vendors_file: Option<String>,

    /// Directory for CSV exports. Default: the plugin data directory.
    pub export_dir: Option<String>,

    /// Send latency, bulk pacing, and success rate.
    pub notifier: NotifierConfig,

    /// Fixed seed for the simulated transport, for reproducible sessions.
    pub seed: Option<u64>,
}

impl Config {
    /// Parses configuration from Zellij's configuration map.
    ///
    /// ```rust
    /// use std::collections::BTreeMap;
    /// use vendorizer::Config;
    /// use vendorizer::catalog::PageSize;
    ///
    /// let mut map = BTreeMap::new();
    /// map.insert("page_size".to_string(), "25".to_string());
    /// map.insert("success_rate".to_string(), "250".to_string());
    /// map.insert("send_delay_ms".to_string(), "soon".to_string());
    /// map.insert("bulk_item_delay_ms".to_string(), u64::MAX.to_string());
    ///
    /// let config = Config::from_zellij(&map);
    /// assert_eq!(config.page_size, PageSize::TwentyFive);
    /// assert_eq!(config.notifier.success_rate, 100);
    /// assert_eq!(config.notifier.send_delay_ms, 2_000);
    /// assert_eq!(config.notifier.bulk_item_delay_ms, vendorizer::notify::MAX_DELAY_MS);
    /// ```
    #[must_use]
    pub fn from_zellij(config: &BTreeMap<String, String>) -> Self {
        fn parsed<T: std::str::FromStr>(map: &BTreeMap<String, String>, key: &str) -> Option<T> {
            map.get(key).and_then(|raw| raw.trim().parse().ok())
        }
        fn text(map: &BTreeMap<String, String>, key: &str) -> Option<String> {
            map.get(key)
                .map(|raw| raw.trim().to_string())
                .filter(|raw| !raw.is_empty())
        }

        let defaults = NotifierConfig::default();
        let notifier = NotifierConfig {
            send_delay_ms: parsed::<u64>(config, "send_delay_ms")
                .map_or(defaults.send_delay_ms, |ms| ms.min(MAX_DELAY_MS)),
            bulk_item_delay_ms: parsed::<u64>(config, "bulk_item_delay_ms")
                .map_or(defaults.bulk_item_delay_ms, |ms| ms.min(MAX_DELAY_MS)),
            success_rate: parsed::<u8>(config, "success_rate")
                .map_or(defaults.success_rate, |rate| rate.min(100)),
        };

        Self {
            theme_name: text(config, "theme"),
            theme_file: text(config, "theme_file"),
            trace_level: text(config, "trace_level"),
            page_size: parsed(config, "page_size")
                .and_then(PageSize::from_rows)
                .unwrap_or_default(),
            vendors_file: text(config, "vendors_file"),
            export_dir: text(config, "export_dir"),
            notifier,
            seed: parsed(config, "seed"),
        }
    }
}

/// Builds the initial application state from `config`.
///
/// Seed data, theme, and export directory problems are logged and replaced by
/// defaults; the plugin always starts.
pub fn initialize(config: &Config) -> AppState {
    let _span = tracing::debug_span!("initialize").entered();

    let theme = config.theme_file.as_ref().map_or_else(
        || {
            config.theme_name.as_ref().map_or_else(Theme::default, |theme_name| {
                Theme::from_name(theme_name).unwrap_or_else(|| {
                    tracing::debug!(%theme_name, "unknown theme, using default");
                    Theme::default()
                })
            })
        },
        |theme_file| {
            Theme::from_file(infrastructure::resolve_config_path(theme_file)).unwrap_or_else(|e| {
                tracing::warn!(%theme_file, error = %e, "failed to load theme file, using default");
                Theme::default()
            })
        },
    );

    let vendors_path = config
        .vendors_file
        .as_deref()
        .map(infrastructure::resolve_config_path);
    let store = catalog::seed::load(vendors_path.as_deref());

    let seed = config.seed.unwrap_or_else(|| {
        u64::try_from(chrono::Utc::now().timestamp_millis()).unwrap_or_default()
    });
    let transport = SimulatedTransport::new(config.notifier.success_rate, seed);
    let notifier = Notifier::new(config.notifier, Box::new(transport));

    let export_dir = config
        .export_dir
        .as_deref()
        .map_or_else(infrastructure::get_data_dir, infrastructure::resolve_config_path);

    tracing::info!(
        vendors = store.len(),
        theme = %theme.name,
        page_size = config.page_size.rows(),
        export_dir = %export_dir.display(),
        "vendorizer initialized"
    );

    AppState::new(store, theme)
        .with_page_size(config.page_size)
        .with_notifier(notifier)
        .with_export_dir(export_dir)
}
