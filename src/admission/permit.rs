//! # RAII permit for one unit of admission capacity.
//!
//! Scoped-acquisition discipline: holding a [`Permit`] *is* the reservation,
//! and dropping it *is* the release. This guarantees the 1:1 acquire/release
//! pairing on every exit path of the protected region, including panics and
//! failures of the protected operation.

use std::fmt;
use std::sync::Arc;

use super::gate::AdmissionGate;

/// One unit of reserved admission capacity.
///
/// Returned by [`Ticket::admitted`](super::Ticket::admitted) (or the
/// [`AdmissionGate::acquire`] shorthand). The slot is returned to the gate
/// when the permit is dropped, which admits the next queued claim (FIFO).
#[must_use = "dropping the permit immediately releases the slot"]
pub struct Permit {
    gate: Arc<AdmissionGate>,
}

impl Permit {
    pub(super) fn new(gate: Arc<AdmissionGate>) -> Self {
        Self { gate }
    }
}

impl Drop for Permit {
    fn drop(&mut self) {
        self.gate.release();
    }
}

impl fmt::Debug for Permit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Permit")
            .field("capacity", &self.gate.capacity())
            .field("in_flight", &self.gate.in_flight())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_drop_releases_exactly_once() {
        let gate = AdmissionGate::new(1);
        {
            let _permit = Arc::clone(&gate).acquire().await;
            assert_eq!(gate.in_flight(), 1);
        }
        assert_eq!(gate.in_flight(), 0);

        // Slot is reusable after release.
        let _again = Arc::clone(&gate).acquire().await;
        assert_eq!(gate.in_flight(), 1);
    }
}
