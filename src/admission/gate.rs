//! # FIFO counting gate bounding concurrent execution.
//!
//! [`AdmissionGate`] is an explicit semaphore: it owns its capacity, the
//! in-flight count, and a FIFO queue of one-shot signalling channels for
//! waiters. It is constructed once per store and shared as an `Arc`, not
//! captured in a closure.
//!
//! Claiming a position and waiting for it are split operations:
//! [`AdmissionGate::enqueue`] is synchronous and fixes the admission order at
//! call time; awaiting the returned [`Ticket`] suspends until the slot is
//! granted.
//!
//! ## Architecture
//! ```text
//! enqueue() (sync):                  release() (Permit::drop):
//!   lock state                         lock state
//!   ├─ free slot & no waiters          ├─ pop front waiter
//!   │    in_flight += 1                │    send(()) ──► slot transfers
//!   │    ──► Ticket (granted)          │    (in_flight unchanged)
//!   └─ otherwise                       └─ no live waiter
//!        push oneshot::Sender               in_flight -= 1
//!        ──► Ticket (waiting)
//!
//! Ticket::admitted() (async):
//!   granted ──► Permit         waiting ──► await signal ──► Permit
//! ```
//!
//! ## Rules
//! - `0 <= in_flight <= capacity` at all times.
//! - Admission is strictly FIFO by `enqueue` order: a later claim never
//!   overtakes an earlier one, even when a slot frees up while both wait.
//! - A [`Ticket`] dropped before conversion gives its position, or its
//!   already-granted slot, back to the gate.
//! - No timeout and no cancellation of a granted permit; callers racing
//!   admission against an external timer must still release any permit they
//!   end up holding.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex, MutexGuard};

use tokio::sync::oneshot;

use super::permit::Permit;
use super::ticket::Ticket;

/// Mutable gate state behind the mutex.
struct GateState {
    /// Number of outstanding slots (granted tickets and held permits).
    in_flight: usize,
    /// Pending admission claims, front = oldest.
    waiters: VecDeque<oneshot::Sender<()>>,
}

/// Explicit FIFO counting gate.
///
/// Bounds the number of concurrently executing operations to a capacity that
/// is fixed at construction. Excess claims queue in [`enqueue`] order and are
/// granted as permits are released.
///
/// ### Properties
/// - **Fair**: strict FIFO admission in claim order across all callers.
/// - **Leak-proof pairing**: release happens in [`Permit::drop`] (or the drop
///   of an unconverted [`Ticket`]), so every claimed slot is returned exactly
///   once.
/// - **Unbounded queue**: there is no backpressure on enqueue; a long waiter
///   queue is a resource cost the embedder plans for, not a fault.
///
/// [`enqueue`]: AdmissionGate::enqueue
pub struct AdmissionGate {
    capacity: usize,
    state: Mutex<GateState>,
}

impl AdmissionGate {
    /// Creates a gate with the given capacity (clamped to a minimum of 1).
    ///
    /// Capacity 1 degenerates to a mutual-exclusion lock.
    pub fn new(capacity: usize) -> Arc<Self> {
        Arc::new(Self {
            capacity: capacity.max(1),
            state: Mutex::new(GateState {
                in_flight: 0,
                waiters: VecDeque::new(),
            }),
        })
    }

    /// Returns the fixed capacity.
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Returns the current number of outstanding slots.
    pub fn in_flight(&self) -> usize {
        self.lock_state().in_flight
    }

    /// Returns the current number of queued admission claims.
    pub fn queued(&self) -> usize {
        self.lock_state().waiters.len()
    }

    /// Claims an admission position, synchronously.
    ///
    /// The position in the FIFO order is fixed when this method returns:
    /// either the slot was free and the returned [`Ticket`] is already
    /// granted, or the claim is queued behind every earlier one. Await
    /// [`Ticket::admitted`] to turn the claim into a [`Permit`].
    pub fn enqueue(self: Arc<Self>) -> Ticket {
        let mut state = self.lock_state();
        // Queue even when a slot is technically free if others claimed
        // first; anything else would let late claims overtake.
        if state.waiters.is_empty() && state.in_flight < self.capacity {
            state.in_flight += 1;
            drop(state);
            return Ticket::granted(self);
        }
        let (tx, rx) = oneshot::channel();
        state.waiters.push_back(tx);
        drop(state);
        Ticket::waiting(self, rx)
    }

    /// Claims a position and waits for it in one step.
    ///
    /// Shorthand for `enqueue().admitted().await`; the FIFO position is
    /// fixed at the synchronous `enqueue` inside, before the first suspend.
    pub async fn acquire(self: Arc<Self>) -> Permit {
        self.enqueue().admitted().await
    }

    /// Returns one slot to the pool, admitting the next live waiter (FIFO).
    ///
    /// Called from [`Permit::drop`] and the drop of an unconverted
    /// [`Ticket`]; not part of the public API.
    pub(super) fn release(&self) {
        let mut state = self.lock_state();
        loop {
            match state.waiters.pop_front() {
                Some(tx) => {
                    // Slot transfers directly to the waiter; in_flight stays.
                    if tx.send(()).is_ok() {
                        return;
                    }
                    // Waiter abandoned its claim; try the next one.
                }
                None => {
                    state.in_flight -= 1;
                    return;
                }
            }
        }
    }

    /// Locks the gate state, recovering from poisoning.
    ///
    /// The critical sections only touch the counter and the queue, so state
    /// is consistent even if a holder panicked.
    fn lock_state(&self) -> MutexGuard<'_, GateState> {
        self.state.lock().unwrap_or_else(|e| e.into_inner())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    #[tokio::test]
    async fn test_capacity_is_clamped_to_one() {
        let gate = AdmissionGate::new(0);
        assert_eq!(gate.capacity(), 1);
    }

    #[tokio::test]
    async fn test_acquire_within_capacity_is_immediate() {
        let gate = AdmissionGate::new(2);
        let p1 = Arc::clone(&gate).acquire().await;
        let p2 = Arc::clone(&gate).acquire().await;
        assert_eq!(gate.in_flight(), 2);
        drop(p1);
        drop(p2);
        assert_eq!(gate.in_flight(), 0);
    }

    #[tokio::test]
    async fn test_enqueue_claims_position_synchronously() {
        let gate = AdmissionGate::new(1);
        let first = Arc::clone(&gate).enqueue();
        assert!(first.is_granted());

        let second = Arc::clone(&gate).enqueue();
        assert!(!second.is_granted());
        assert_eq!(gate.in_flight(), 1);
        assert_eq!(gate.queued(), 1);

        drop(first);
        let permit = second.admitted().await;
        assert_eq!(gate.in_flight(), 1);
        drop(permit);
        assert_eq!(gate.in_flight(), 0);
    }

    #[tokio::test]
    async fn test_bound_holds_under_contention() {
        let gate = AdmissionGate::new(3);
        let running = Arc::new(AtomicUsize::new(0));
        let peak = Arc::new(AtomicUsize::new(0));

        let mut handles = Vec::new();
        for _ in 0..12 {
            let gate = Arc::clone(&gate);
            let running = Arc::clone(&running);
            let peak = Arc::clone(&peak);
            handles.push(tokio::spawn(async move {
                let _permit = gate.acquire().await;
                let now = running.fetch_add(1, Ordering::SeqCst) + 1;
                peak.fetch_max(now, Ordering::SeqCst);
                tokio::time::sleep(Duration::from_millis(10)).await;
                running.fetch_sub(1, Ordering::SeqCst);
            }));
        }
        for h in handles {
            h.await.unwrap();
        }

        assert!(peak.load(Ordering::SeqCst) <= 3);
        assert_eq!(gate.in_flight(), 0);
        assert_eq!(gate.queued(), 0);
    }

    #[tokio::test]
    async fn test_fifo_admission_follows_claim_order() {
        let gate = AdmissionGate::new(1);
        let holder = Arc::clone(&gate).acquire().await;

        let tickets: Vec<Ticket> = (0..4).map(|_| Arc::clone(&gate).enqueue()).collect();
        let order = Arc::new(Mutex::new(Vec::new()));

        // Await the tickets from tasks spawned in reverse: admission still
        // follows the claim order, not the await order.
        let mut handles = Vec::new();
        for (i, ticket) in tickets.into_iter().enumerate().rev() {
            let order = Arc::clone(&order);
            handles.push(tokio::spawn(async move {
                let _permit = ticket.admitted().await;
                order.lock().unwrap().push(i);
            }));
        }

        drop(holder);
        for h in handles {
            h.await.unwrap();
        }
        assert_eq!(*order.lock().unwrap(), vec![0, 1, 2, 3]);
    }

    #[tokio::test]
    async fn test_release_transfers_slot_without_overshoot() {
        let gate = AdmissionGate::new(1);
        let first = Arc::clone(&gate).acquire().await;
        let waiting = Arc::clone(&gate).enqueue();
        assert_eq!(gate.in_flight(), 1);
        assert_eq!(gate.queued(), 1);

        // The slot moves to the waiter at release time, before it awaits.
        drop(first);
        assert_eq!(gate.in_flight(), 1);
        assert_eq!(gate.queued(), 0);

        let permit = waiting.admitted().await;
        assert_eq!(gate.in_flight(), 1);
        drop(permit);
        assert_eq!(gate.in_flight(), 0);
    }

    #[tokio::test]
    async fn test_abandoned_ticket_is_skipped() {
        let gate = AdmissionGate::new(1);
        let holder = Arc::clone(&gate).acquire().await;

        let dead = Arc::clone(&gate).enqueue();
        let live = Arc::clone(&gate).enqueue();
        drop(dead);

        drop(holder);
        let permit = live.admitted().await;
        assert_eq!(gate.in_flight(), 1);
        drop(permit);
        assert_eq!(gate.in_flight(), 0);
        assert_eq!(gate.queued(), 0);
    }

    #[tokio::test]
    async fn test_transferred_but_unclaimed_ticket_releases_on_drop() {
        let gate = AdmissionGate::new(1);
        let holder = Arc::clone(&gate).acquire().await;
        let waiting = Arc::clone(&gate).enqueue();

        // Releasing hands the slot to `waiting` even though it never awaits.
        drop(holder);
        assert_eq!(gate.in_flight(), 1);

        drop(waiting);
        assert_eq!(gate.in_flight(), 0);
        assert!(Arc::clone(&gate).enqueue().is_granted());
    }
}
