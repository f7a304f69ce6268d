//! Background worker thread for storage and export I/O.
//!
//! # Architecture
//!
//! - `messages`: Request/response protocol types with trace context propagation
//! - `handler`: Worker implementation and message processing logic

pub mod handler;
pub mod messages;

pub use handler::VendorizerWorker;
pub use messages::{TraceContext, WorkerMessage, WorkerResponse};
