//! Mail transport seam.
//!
//! No real mail leaves the plugin. [`SimulatedTransport`] draws each single-send
//! outcome from a seeded ChaCha stream so a fixed `seed` reproduces a session.

use crate::domain::{Result, Vendor};
use rand_chacha::rand_core::{RngCore, SeedableRng};
use rand_chacha::ChaCha8Rng;
use std::fmt;

/// Outcome of a single delivery attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Delivery {
    Delivered,
    Rejected,
}

/// Something that can deliver vendor notifications.
pub trait MailTransport: fmt::Debug {
    /// Delivers one notification after the send delay has elapsed.
    ///
    /// # Errors
    ///
    /// An error means the attempt itself broke, not that delivery was refused.
    fn deliver(&mut self, vendor: &Vendor) -> Result<Delivery>;

    /// Hands one recipient of a bulk run to the transport.
    ///
    /// # Errors
    ///
    /// Any error aborts the whole bulk run.
    fn dispatch(&mut self, vendor: &Vendor) -> Result<()>;
}

/// Randomized transport with a fixed success percentage.
#[derive(Debug, Clone)]
pub struct SimulatedTransport {
    rng: ChaCha8Rng,
    success_rate: u8,
}

impl SimulatedTransport {
    /// `success_rate` is a percentage and is capped at 100.
    #[must_use]
    pub fn new(success_rate: u8, seed: u64) -> Self {
        Self {
            rng: ChaCha8Rng::seed_from_u64(seed),
            success_rate: success_rate.min(100),
        }
    }
}

impl MailTransport for SimulatedTransport {
    fn deliver(&mut self, vendor: &Vendor) -> Result<Delivery> {
        let roll = self.rng.next_u32() % 100;
        let delivery = if roll < u32::from(self.success_rate) {
            Delivery::Delivered
        } else {
            Delivery::Rejected
        };
        tracing::debug!(vendor_id = %vendor.id, roll, ?delivery, "simulated delivery");
        Ok(delivery)
    }

    fn dispatch(&mut self, vendor: &Vendor) -> Result<()> {
        tracing::trace!(vendor_id = %vendor.id, "simulated bulk dispatch");
        Ok(())
    }
}
