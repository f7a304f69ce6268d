//! Vendor catalog: the in-memory store and the pure operations over it.
//!
//! Data flows one way through this layer:
//!
//! ```text
//! VendorStore → apply_filter → paginate → displayed rows
//!      ↑
//! VendorEditor (validated replace)
//! ```
//!
//! # Modules
//!
//! - `store`: The session's vendor records
//! - `filter`: Criteria matching, order-preserving
//! - `paginate`: Page slicing and "X to Y of Z" metadata
//! - `editor`: Draft editing and validation
//! - `lookup`: Fetch by code and by date range
//! - `seed`: Bundled and file-based seed data

pub mod editor;
pub mod filter;
pub mod lookup;
pub mod paginate;
pub mod seed;
pub mod store;

pub use editor::{Field, FieldErrors, SubmitOutcome, VendorDraft, VendorEditor};
pub use filter::apply_filter;
pub use paginate::{paginate, Page, PageSize};
pub use store::VendorStore;
