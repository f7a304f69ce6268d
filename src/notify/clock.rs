//! Time source for the notification simulator.
//!
//! Simulated latency is expressed as absolute deadlines against a [`Clock`].
//! The plugin reads the wall clock; tests drive a [`ManualClock`] forward by hand.

use chrono::{DateTime, Utc};
use std::cell::Cell;
use std::fmt;
use std::rc::Rc;

/// Source of the current instant.
pub trait Clock: fmt::Debug {
    fn now(&self) -> DateTime<Utc>;
}

/// Wall-clock time.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// A clock that only moves when told to.
///
/// Clones share the same instant, so a test can keep one handle while the
/// application state owns another.
#[derive(Debug, Clone)]
pub struct ManualClock {
    millis: Rc<Cell<i64>>,
}

impl ManualClock {
    #[must_use]
    pub fn new(start: DateTime<Utc>) -> Self {
        Self {
            millis: Rc::new(Cell::new(start.timestamp_millis())),
        }
    }

    /// Moves time forward by `ms` milliseconds.
    pub fn advance_ms(&self, ms: i64) {
        self.millis.set(self.millis.get() + ms);
    }
}

impl Clock for ManualClock {
    fn now(&self) -> DateTime<Utc> {
        DateTime::from_timestamp_millis(self.millis.get()).unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    #[test]
    fn manual_clock_handles_share_time() {
        let start = DateTime::parse_from_rfc3339("2024-03-01T10:00:00Z").unwrap().with_timezone(&Utc);
        let clock = ManualClock::new(start);
        let handle = clock.clone();

        handle.advance_ms(2_500);

        assert_eq!(clock.now(), start + Duration::milliseconds(2_500));
    }
}
