//! Notification simulator.
//!
//! Each send moves through `Confirming → Sending → terminal`. Confirmation is the
//! caller's job; this module starts at `Sending`, writes the Pending log entry on
//! entry, and resolves it once the simulated latency has elapsed.
//!
//! Latency is modelled as absolute deadlines. The host calls [`Notifier::advance`]
//! whenever a timer fires, and every send whose deadline has passed is resolved in
//! deadline order. Single sends to different vendors overlap freely; a vendor
//! that is already in flight cannot be sent to again, and only one bulk run can
//! exist at a time.
//!
//! # Bulk arithmetic
//!
//! A bulk run hands each recipient to the transport one per item delay, then
//! reports `floor(total * rate / 100)` successes. The split is arithmetic, not
//! drawn per recipient. A transport error aborts the run and fails the entry.

use super::history::LogWriter;
use super::transport::{Delivery, MailTransport};
use crate::domain::{
    EmailLogEntry, EmailStatus, Result, Vendor, VendorizerError, BULK_VENDOR_ID,
};
use chrono::{DateTime, Duration, Utc};
use std::collections::BTreeMap;

const SINGLE_PENDING: &str = "Email sending in progress...";
const SINGLE_SENT: &str = "Email sent successfully";
const SINGLE_FAILED: &str = "Email delivery failed";
const BULK_PENDING: &str = "Bulk email sending in progress...";

/// Longest simulated latency, in milliseconds. Longer delays are cut to this.
pub const MAX_DELAY_MS: u64 = 60 * 60 * 1000;

/// Timing and outcome knobs for the simulator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NotifierConfig {
    /// Latency of a single send.
    pub send_delay_ms: u64,
    /// Delay between bulk recipients.
    pub bulk_item_delay_ms: u64,
    /// Percentage of a bulk run counted as delivered.
    pub success_rate: u8,
}

impl Default for NotifierConfig {
    fn default() -> Self {
        Self {
            send_delay_ms: 2_000,
            bulk_item_delay_ms: 100,
            success_rate: 90,
        }
    }
}

/// Resolved send, reported back to the view for a notice.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SendOutcome {
    Delivered { vendor: Vendor },
    Rejected { vendor: Vendor },
    Errored { vendor: Vendor, error: String },
    BulkCompleted { total: usize, succeeded: usize, failed: usize },
    BulkErrored { total: usize, error: String },
}

/// Snapshot of a running bulk send.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BulkProgress {
    pub processed: usize,
    pub total: usize,
}

impl BulkProgress {
    /// Whole percent processed, rounded down so 100 only shows at completion.
    #[must_use]
    pub const fn percent(&self) -> usize {
        if self.total == 0 {
            return 100;
        }
        self.processed * 100 / self.total
    }
}

#[derive(Debug, Clone)]
struct InFlight {
    vendor: Vendor,
    log_id: i64,
    due: DateTime<Utc>,
}

#[derive(Debug, Clone)]
struct BulkRun {
    recipients: Vec<Vendor>,
    processed: usize,
    log_id: i64,
    next_due: DateTime<Utc>,
}

impl BulkRun {
    fn label(&self) -> String {
        bulk_label(self.recipients.len())
    }
}

fn bulk_label(total: usize) -> String {
    format!("Bulk Email ({total} vendors)")
}

/// Bulk split for `total` recipients at `rate` percent.
#[must_use]
pub const fn bulk_split(total: usize, rate: u8) -> (usize, usize) {
    let rate = if rate > 100 { 100 } else { rate as usize };
    let succeeded = total * rate / 100;
    (succeeded, total - succeeded)
}

/// Drives simulated sends and writes their log entries.
#[derive(Debug)]
pub struct Notifier {
    config: NotifierConfig,
    transport: Box<dyn MailTransport>,
    in_flight: BTreeMap<String, InFlight>,
    bulk: Option<BulkRun>,
}

impl Notifier {
    #[must_use]
    pub fn new(config: NotifierConfig, transport: Box<dyn MailTransport>) -> Self {
        Self {
            config,
            transport,
            in_flight: BTreeMap::new(),
            bulk: None,
        }
    }

    #[must_use]
    pub const fn config(&self) -> &NotifierConfig {
        &self.config
    }

    /// Returns `true` while a single send to `vendor_id` is in flight.
    #[must_use]
    pub fn is_sending(&self, vendor_id: &str) -> bool {
        self.in_flight.contains_key(vendor_id)
    }

    /// Number of single sends in flight.
    #[must_use]
    pub fn in_flight_count(&self) -> usize {
        self.in_flight.len()
    }

    /// Progress of the running bulk send, if any.
    #[must_use]
    pub fn bulk_progress(&self) -> Option<BulkProgress> {
        self.bulk.as_ref().map(|run| BulkProgress {
            processed: run.processed,
            total: run.recipients.len(),
        })
    }

    /// Returns `true` when nothing is in flight.
    #[must_use]
    pub fn is_idle(&self) -> bool {
        self.in_flight.is_empty() && self.bulk.is_none()
    }

    /// Earliest pending deadline.
    #[must_use]
    pub fn next_deadline(&self) -> Option<DateTime<Utc>> {
        self.in_flight
            .values()
            .map(|send| send.due)
            .chain(self.bulk.as_ref().map(|run| run.next_due))
            .min()
    }

    /// Starts a single send and writes its Pending entry.
    ///
    /// Returns the instant at which the send resolves.
    ///
    /// # Errors
    ///
    /// [`VendorizerError::AlreadySending`] if `vendor` is already in flight.
    pub fn begin_send(
        &mut self,
        vendor: &Vendor,
        now: DateTime<Utc>,
        log: &mut dyn LogWriter,
    ) -> Result<DateTime<Utc>> {
        let _span = tracing::debug_span!("begin_send", vendor_id = %vendor.id).entered();

        if self.is_sending(&vendor.id) {
            return Err(VendorizerError::AlreadySending(vendor.id.clone()));
        }

        let log_id = log.append(EmailLogEntry {
            id: 0,
            timestamp: now,
            vendor_name: vendor.name.clone(),
            vendor_id: vendor.id.clone(),
            status: EmailStatus::Pending,
            message: SINGLE_PENDING.to_string(),
        });
        let due = after(now, self.config.send_delay_ms);
        self.in_flight.insert(
            vendor.id.clone(),
            InFlight {
                vendor: vendor.clone(),
                log_id,
                due,
            },
        );

        tracing::debug!(log_id, %due, "single send pending");
        Ok(due)
    }

    /// Starts a bulk send over `recipients` and writes the aggregate Pending entry.
    ///
    /// # Errors
    ///
    /// [`VendorizerError::BulkInProgress`] if a bulk run exists, or
    /// [`VendorizerError::NoRecipients`] for an empty list.
    pub fn begin_bulk(
        &mut self,
        recipients: &[Vendor],
        now: DateTime<Utc>,
        log: &mut dyn LogWriter,
    ) -> Result<DateTime<Utc>> {
        let _span = tracing::debug_span!("begin_bulk", total = recipients.len()).entered();

        if self.bulk.is_some() {
            return Err(VendorizerError::BulkInProgress);
        }
        if recipients.is_empty() {
            return Err(VendorizerError::NoRecipients);
        }

        let log_id = log.append(EmailLogEntry {
            id: 0,
            timestamp: now,
            vendor_name: bulk_label(recipients.len()),
            vendor_id: BULK_VENDOR_ID.to_string(),
            status: EmailStatus::Pending,
            message: BULK_PENDING.to_string(),
        });
        let next_due = after(now, self.config.bulk_item_delay_ms);
        self.bulk = Some(BulkRun {
            recipients: recipients.to_vec(),
            processed: 0,
            log_id,
            next_due,
        });

        tracing::debug!(log_id, "bulk send pending");
        Ok(next_due)
    }

    /// Resolves everything due at or before `now`.
    ///
    /// Outcomes are returned in the order they were resolved. Every resolved send
    /// has its log entry moved to a terminal status.
    pub fn advance(&mut self, now: DateTime<Utc>, log: &mut dyn LogWriter) -> Vec<SendOutcome> {
        let _span = tracing::debug_span!(
            "advance",
            in_flight = self.in_flight.len(),
            bulk = self.bulk.is_some()
        )
        .entered();

        let mut outcomes = Vec::new();

        let mut due: Vec<InFlight> = Vec::new();
        self.in_flight.retain(|_, send| {
            if send.due <= now {
                due.push(send.clone());
                false
            } else {
                true
            }
        });
        due.sort_by_key(|send| send.due);

        for send in due {
            outcomes.push(self.resolve_single(send, now, log));
        }

        if let Some(outcome) = self.advance_bulk(now, log) {
            outcomes.push(outcome);
        }

        outcomes
    }

    fn resolve_single(
        &mut self,
        send: InFlight,
        now: DateTime<Utc>,
        log: &mut dyn LogWriter,
    ) -> SendOutcome {
        let (status, message, outcome) = match self.transport.deliver(&send.vendor) {
            Ok(Delivery::Delivered) => (
                EmailStatus::Success,
                SINGLE_SENT.to_string(),
                SendOutcome::Delivered {
                    vendor: send.vendor.clone(),
                },
            ),
            Ok(Delivery::Rejected) => (
                EmailStatus::Failed,
                SINGLE_FAILED.to_string(),
                SendOutcome::Rejected {
                    vendor: send.vendor.clone(),
                },
            ),
            Err(e) => {
                tracing::warn!(vendor_id = %send.vendor.id, error = %e, "single send errored");
                (
                    EmailStatus::Failed,
                    format!("Error: {e}"),
                    SendOutcome::Errored {
                        vendor: send.vendor.clone(),
                        error: e.to_string(),
                    },
                )
            }
        };

        settle(
            log,
            send.log_id,
            now,
            &send.vendor.name,
            &send.vendor.id,
            status,
            &message,
        );
        tracing::debug!(vendor_id = %send.vendor.id, ?status, "single send resolved");
        outcome
    }

    fn advance_bulk(&mut self, now: DateTime<Utc>, log: &mut dyn LogWriter) -> Option<SendOutcome> {
        let step_ms = self.config.bulk_item_delay_ms;
        let run = self.bulk.as_mut()?;
        let total = run.recipients.len();

        while run.processed < total && run.next_due <= now {
            let recipient = &run.recipients[run.processed];
            if let Err(e) = self.transport.dispatch(recipient) {
                tracing::warn!(processed = run.processed, total, error = %e, "bulk send errored");
                let label = run.label();
                settle(
                    log,
                    run.log_id,
                    now,
                    &label,
                    BULK_VENDOR_ID,
                    EmailStatus::Failed,
                    &format!("Error: {e}"),
                );
                self.bulk = None;
                return Some(SendOutcome::BulkErrored {
                    total,
                    error: e.to_string(),
                });
            }
            run.processed += 1;
            if run.processed < total {
                run.next_due = after(run.next_due, step_ms);
            }
            tracing::trace!(processed = run.processed, total, "bulk progress");
        }

        if run.processed < total {
            return None;
        }

        let (succeeded, failed) = bulk_split(total, self.config.success_rate);
        let (status, message) = if failed == 0 {
            (
                EmailStatus::Success,
                format!("Successfully sent to all {total} vendors"),
            )
        } else {
            (
                EmailStatus::Partial,
                format!("Sent to {succeeded} vendors, {failed} failed"),
            )
        };
        let label = run.label();
        settle(log, run.log_id, now, &label, BULK_VENDOR_ID, status, &message);
        self.bulk = None;

        tracing::debug!(total, succeeded, failed, ?status, "bulk send completed");
        Some(SendOutcome::BulkCompleted {
            total,
            succeeded,
            failed,
        })
    }
}

/// Moves the Pending entry to its terminal status, re-recording it if the log
/// has already evicted it.
fn settle(
    log: &mut dyn LogWriter,
    log_id: i64,
    now: DateTime<Utc>,
    vendor_name: &str,
    vendor_id: &str,
    status: EmailStatus,
    message: &str,
) {
    if log.update(log_id, status, message) {
        return;
    }
    tracing::debug!(log_id, "pending entry evicted, recording result anew");
    log.append(EmailLogEntry {
        id: 0,
        timestamp: now,
        vendor_name: vendor_name.to_string(),
        vendor_id: vendor_id.to_string(),
        status,
        message: message.to_string(),
    });
}

/// `ms` saturated at [`MAX_DELAY_MS`].
#[allow(clippy::cast_possible_wrap)]
fn delay(ms: u64) -> Duration {
    let ms = ms.min(MAX_DELAY_MS);
    Duration::milliseconds(ms as i64)
}

/// Deadline `ms` after `at`. An instant past chrono's range resolves at `at`.
fn after(at: DateTime<Utc>, ms: u64) -> DateTime<Utc> {
    at.checked_add_signed(delay(ms)).unwrap_or_else(|| {
        tracing::warn!(%at, ms, "deadline out of range, resolving immediately");
        at
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Category, Region, Status, VendorType};
    use crate::notify::history::EmailLog;
    use std::collections::VecDeque;

    #[derive(Debug, Default)]
    struct Scripted {
        deliveries: VecDeque<Result<Delivery>>,
        fail_dispatch_at: Option<usize>,
        dispatched: usize,
    }

    impl MailTransport for Scripted {
        fn deliver(&mut self, _vendor: &Vendor) -> Result<Delivery> {
            self.deliveries.pop_front().unwrap_or(Ok(Delivery::Delivered))
        }

        fn dispatch(&mut self, _vendor: &Vendor) -> Result<()> {
            if self.fail_dispatch_at == Some(self.dispatched) {
                return Err(VendorizerError::Delivery("relay unavailable".to_string()));
            }
            self.dispatched += 1;
            Ok(())
        }
    }

    fn vendor(id: &str) -> Vendor {
        Vendor {
            id: id.to_string(),
            name: format!("Vendor {id}"),
            category: Category::Diesel,
            location: "Indore".to_string(),
            status: Status::Active,
            vendor_type: VendorType::Sap,
            region: Region::North,
            date: "2024-01-01".parse().unwrap(),
        }
    }

    fn t0() -> DateTime<Utc> {
        DateTime::from_timestamp_millis(1_700_000_000_000).unwrap()
    }

    fn ms(n: i64) -> Duration {
        Duration::milliseconds(n)
    }

    fn notifier(script: Scripted) -> Notifier {
        Notifier::new(NotifierConfig::default(), Box::new(script))
    }

    #[test]
    fn single_send_resolves_after_delay() {
        let mut log = EmailLog::new();
        let mut n = notifier(Scripted::default());
        let v = vendor("V1");

        let due = n.begin_send(&v, t0(), &mut log).unwrap();
        assert_eq!(due, t0() + ms(2_000));
        assert!(n.is_sending("V1"));
        assert_eq!(log.entries()[0].status, EmailStatus::Pending);
        assert_eq!(log.entries()[0].message, SINGLE_PENDING);

        assert!(n.advance(t0() + ms(1_999), &mut log).is_empty());
        let outcomes = n.advance(t0() + ms(2_000), &mut log);

        assert_eq!(outcomes, vec![SendOutcome::Delivered { vendor: v }]);
        assert!(!n.is_sending("V1"));
        assert_eq!(log.len(), 1);
        assert_eq!(log.entries()[0].status, EmailStatus::Success);
        assert_eq!(log.entries()[0].message, SINGLE_SENT);
    }

    #[test]
    fn oversized_delays_saturate_instead_of_overflowing() {
        let mut log = EmailLog::new();
        let config = NotifierConfig {
            send_delay_ms: u64::MAX,
            bulk_item_delay_ms: u64::MAX,
            ..NotifierConfig::default()
        };
        let mut n = Notifier::new(config, Box::new(Scripted::default()));

        let due = n.begin_send(&vendor("V1"), t0(), &mut log).unwrap();
        assert_eq!(due, t0() + ms(i64::try_from(MAX_DELAY_MS).unwrap()));

        let end = DateTime::<Utc>::MAX_UTC;
        let due = n.begin_bulk(&[vendor("V2"), vendor("V3")], end, &mut log).unwrap();
        assert_eq!(due, end);
        let outcomes = n.advance(end, &mut log);
        assert!(outcomes
            .iter()
            .any(|o| matches!(o, SendOutcome::BulkCompleted { total: 2, .. })));
    }

    #[test]
    fn resend_while_in_flight_is_refused() {
        let mut log = EmailLog::new();
        let mut n = notifier(Scripted::default());
        n.begin_send(&vendor("V1"), t0(), &mut log).unwrap();

        let err = n.begin_send(&vendor("V1"), t0() + ms(10), &mut log).unwrap_err();

        assert!(matches!(err, VendorizerError::AlreadySending(id) if id == "V1"));
        assert_eq!(log.len(), 1);
    }

    #[test]
    fn overlapping_sends_resolve_independently() {
        let mut log = EmailLog::new();
        let script = Scripted {
            deliveries: VecDeque::from([Ok(Delivery::Rejected), Ok(Delivery::Delivered)]),
            ..Scripted::default()
        };
        let mut n = notifier(script);
        n.begin_send(&vendor("A"), t0(), &mut log).unwrap();
        n.begin_send(&vendor("B"), t0() + ms(500), &mut log).unwrap();

        let first = n.advance(t0() + ms(2_000), &mut log);
        assert_eq!(first, vec![SendOutcome::Rejected { vendor: vendor("A") }]);
        assert!(n.is_sending("B"));

        let second = n.advance(t0() + ms(2_500), &mut log);
        assert_eq!(second, vec![SendOutcome::Delivered { vendor: vendor("B") }]);
        assert!(n.is_idle());

        let a = log.entries().iter().find(|e| e.vendor_id == "A").unwrap();
        assert_eq!((a.status, a.message.as_str()), (EmailStatus::Failed, SINGLE_FAILED));
    }

    #[test]
    fn transport_error_fails_single_send() {
        let mut log = EmailLog::new();
        let script = Scripted {
            deliveries: VecDeque::from([Err(VendorizerError::Delivery("smtp down".to_string()))]),
            ..Scripted::default()
        };
        let mut n = notifier(script);
        n.begin_send(&vendor("A"), t0(), &mut log).unwrap();

        let outcomes = n.advance(t0() + ms(5_000), &mut log);

        assert!(matches!(&outcomes[0], SendOutcome::Errored { error, .. } if error.contains("smtp down")));
        assert_eq!(log.entries()[0].message, "Error: Delivery error: smtp down");
        assert!(!n.is_sending("A"));
    }

    #[test]
    fn bulk_of_ten_is_partial() {
        let mut log = EmailLog::new();
        let mut n = notifier(Scripted::default());
        let recipients: Vec<Vendor> = (0..10).map(|i| vendor(&format!("V{i}"))).collect();

        n.begin_bulk(&recipients, t0(), &mut log).unwrap();
        assert_eq!(log.entries()[0].vendor_name, "Bulk Email (10 vendors)");
        assert_eq!(log.entries()[0].vendor_id, BULK_VENDOR_ID);

        assert!(n.advance(t0() + ms(550), &mut log).is_empty());
        let progress = n.bulk_progress().unwrap();
        assert_eq!(progress.processed, 5);
        assert_eq!(progress.percent(), 50);

        let outcomes = n.advance(t0() + ms(1_000), &mut log);

        assert_eq!(
            outcomes,
            vec![SendOutcome::BulkCompleted { total: 10, succeeded: 9, failed: 1 }]
        );
        assert!(n.bulk_progress().is_none());
        assert_eq!(log.len(), 1);
        assert_eq!(log.entries()[0].status, EmailStatus::Partial);
        assert_eq!(log.entries()[0].message, "Sent to 9 vendors, 1 failed");
    }

    #[test]
    fn bulk_progress_stays_below_hundred_until_done() {
        let mut log = EmailLog::new();
        let mut n = notifier(Scripted::default());
        let recipients: Vec<Vendor> = (0..3).map(|i| vendor(&format!("V{i}"))).collect();
        n.begin_bulk(&recipients, t0(), &mut log).unwrap();

        n.advance(t0() + ms(200), &mut log);

        assert_eq!(n.bulk_progress().unwrap().percent(), 66);
    }

    #[test]
    fn small_bulk_with_no_failures_is_success() {
        let mut log = EmailLog::new();
        let config = NotifierConfig { success_rate: 100, ..NotifierConfig::default() };
        let mut n = Notifier::new(config, Box::new(Scripted::default()));
        let recipients: Vec<Vendor> = (0..4).map(|i| vendor(&format!("V{i}"))).collect();
        n.begin_bulk(&recipients, t0(), &mut log).unwrap();

        n.advance(t0() + ms(10_000), &mut log);

        assert_eq!(log.entries()[0].status, EmailStatus::Success);
        assert_eq!(log.entries()[0].message, "Successfully sent to all 4 vendors");
    }

    #[test]
    fn bulk_error_fails_entry_and_resets() {
        let mut log = EmailLog::new();
        let script = Scripted {
            fail_dispatch_at: Some(2),
            ..Scripted::default()
        };
        let mut n = notifier(script);
        let recipients: Vec<Vendor> = (0..5).map(|i| vendor(&format!("V{i}"))).collect();
        n.begin_bulk(&recipients, t0(), &mut log).unwrap();

        let outcomes = n.advance(t0() + ms(10_000), &mut log);

        assert!(matches!(&outcomes[0], SendOutcome::BulkErrored { total: 5, .. }));
        assert!(n.bulk_progress().is_none());
        assert_eq!(log.entries()[0].status, EmailStatus::Failed);
        assert_eq!(log.entries()[0].message, "Error: Delivery error: relay unavailable");
        assert!(n.begin_bulk(&recipients, t0(), &mut log).is_ok());
    }

    #[test]
    fn second_bulk_and_empty_bulk_are_refused() {
        let mut log = EmailLog::new();
        let mut n = notifier(Scripted::default());
        assert!(matches!(
            n.begin_bulk(&[], t0(), &mut log),
            Err(VendorizerError::NoRecipients)
        ));
        n.begin_bulk(&[vendor("A")], t0(), &mut log).unwrap();
        assert!(matches!(
            n.begin_bulk(&[vendor("B")], t0(), &mut log),
            Err(VendorizerError::BulkInProgress)
        ));
    }

    #[test]
    fn evicted_pending_entry_is_recorded_again() {
        let mut log = EmailLog::new();
        let mut n = notifier(Scripted::default());
        n.begin_send(&vendor("A"), t0(), &mut log).unwrap();
        for i in 0..crate::notify::history::MAX_ENTRIES {
            n.begin_send(&vendor(&format!("F{i}")), t0() + ms(1), &mut log).unwrap();
        }
        assert!(log.entries().iter().all(|e| e.vendor_id != "A"));

        n.advance(t0() + ms(2_000), &mut log);

        assert_eq!(log.entries()[0].vendor_id, "A");
        assert_eq!(log.entries()[0].status, EmailStatus::Success);
    }

    #[test]
    fn next_deadline_is_earliest() {
        let mut log = EmailLog::new();
        let mut n = notifier(Scripted::default());
        assert!(n.next_deadline().is_none());
        n.begin_send(&vendor("A"), t0(), &mut log).unwrap();
        n.begin_bulk(&[vendor("B"), vendor("C")], t0(), &mut log).unwrap();
        assert_eq!(n.next_deadline(), Some(t0() + ms(100)));
    }

    #[test]
    fn split_matches_floor_arithmetic() {
        assert_eq!(bulk_split(10, 90), (9, 1));
        assert_eq!(bulk_split(23, 90), (20, 3));
        assert_eq!(bulk_split(1, 90), (0, 1));
        assert_eq!(bulk_split(7, 100), (7, 0));
        assert_eq!(bulk_split(7, 250), (7, 0));
    }
}
