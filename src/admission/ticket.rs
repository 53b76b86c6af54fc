//! # Admission claim, fixed at enqueue time.
//!
//! A [`Ticket`] is the synchronous half of admission: creating it (via
//! [`AdmissionGate::enqueue`]) fixes the claim's FIFO position, and awaiting
//! [`Ticket::admitted`] suspends until the slot is granted. Splitting the two
//! lets callers claim in a deterministic order before handing the wait off to
//! a spawned task.

use std::fmt;
use std::sync::Arc;

use tokio::sync::oneshot;

use super::gate::AdmissionGate;
use super::permit::Permit;

enum TicketState {
    /// The slot was free at enqueue time and is already held.
    Granted,
    /// Queued behind earlier claims; the sender fires on slot transfer.
    Waiting(oneshot::Receiver<()>),
    /// Converted into a [`Permit`]; the slot is no longer this ticket's.
    Claimed,
}

/// A claimed admission position.
///
/// Created by [`AdmissionGate::enqueue`]. Dropping a ticket before
/// [`admitted`](Ticket::admitted) resolves gives the position back: a queued
/// claim is skipped at release time, and an already-granted slot is released.
#[must_use = "dropping an unawaited ticket gives its admission position back"]
pub struct Ticket {
    gate: Arc<AdmissionGate>,
    state: TicketState,
}

impl Ticket {
    pub(super) fn granted(gate: Arc<AdmissionGate>) -> Self {
        Self {
            gate,
            state: TicketState::Granted,
        }
    }

    pub(super) fn waiting(gate: Arc<AdmissionGate>, rx: oneshot::Receiver<()>) -> Self {
        Self {
            gate,
            state: TicketState::Waiting(rx),
        }
    }

    /// True if the slot was already held when the claim was made.
    pub fn is_granted(&self) -> bool {
        matches!(self.state, TicketState::Granted)
    }

    /// Waits until the claimed slot is granted and returns the [`Permit`].
    ///
    /// Resolves immediately for a granted ticket. Dropping the returned
    /// future keeps the ticket's drop semantics: the position or slot goes
    /// back to the gate.
    pub async fn admitted(mut self) -> Permit {
        if let TicketState::Waiting(rx) = &mut self.state {
            // The sender either fires on slot transfer or sits in gate state
            // for as long as the gate is alive, which our Arc guarantees.
            let _ = rx.await;
        }
        self.state = TicketState::Claimed;
        Permit::new(Arc::clone(&self.gate))
    }
}

impl Drop for Ticket {
    fn drop(&mut self) {
        match std::mem::replace(&mut self.state, TicketState::Claimed) {
            TicketState::Granted => self.gate.release(),
            TicketState::Waiting(mut rx) => {
                // Close first so a concurrent release cannot transfer the
                // slot into a receiver nobody will read.
                rx.close();
                if rx.try_recv().is_ok() {
                    self.gate.release();
                }
            }
            TicketState::Claimed => {}
        }
    }
}

impl fmt::Debug for Ticket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = match self.state {
            TicketState::Granted => "granted",
            TicketState::Waiting(_) => "waiting",
            TicketState::Claimed => "claimed",
        };
        f.debug_struct("Ticket").field("state", &state).finish()
    }
}
