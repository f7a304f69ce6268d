//! Simulated vendor email notifications.
//!
//! # Modules
//!
//! - `clock`: Time source for send deadlines
//! - `transport`: Delivery seam and the seeded random transport
//! - `history`: The capped, persisted email log
//! - `simulator`: Single and bulk send state machines

pub mod clock;
pub mod history;
pub mod simulator;
pub mod transport;

pub use clock::{Clock, ManualClock, SystemClock};
pub use history::{EmailLog, LogWriter, MAX_ENTRIES};
pub use simulator::{BulkProgress, Notifier, NotifierConfig, SendOutcome, MAX_DELAY_MS};
pub use transport::{Delivery, MailTransport, SimulatedTransport};
