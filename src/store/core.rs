//! # Keyed operation store.
//!
//! [`OpStore`] holds, per string key, a registered operation and its most
//! recent result record, and composes triggers with the shared
//! [`AdmissionGate`] so that at most `max_concurrent` operations run at once.
//!
//! ## Trigger flow
//! ```text
//! trigger(key)
//!   ├─ lookup operations[key] ── absent ──► Err(NotFound), no mutation
//!   ├─ commit { is_loading: true, error: None }   (data retained)
//!   ├─ gate.enqueue() ──► Ticket      (admission position fixed here, so
//!   │                                  call order is admission order)
//!   └─ spawn admitted run:
//!        ├─ ticket.admitted().await ──► Permit
//!        ├─ op.call().await
//!        ├─ commit outcome if the key still holds the same operation,
//!        │    otherwise discard (ResultDiscarded event)
//!        └─ drop Permit ──► next queued trigger admitted
//! ```
//!
//! ## Rules
//! - Map mutations are serialized behind `RwLock`s held only for the
//!   read-modify-write, never across an await; `assign`/`get`/`remove`/
//!   `clear` never suspend.
//! - Lock order where both maps are touched: `operations` before `results`.
//! - Overlapping triggers on one key are not coalesced; the last completion
//!   wins the record.
//! - A completion whose operation is no longer the key's assigned operation
//!   (removed or overwritten mid-flight) is discarded, never resurrecting a
//!   removed key's record.
//! - Operation failures settle into the record; `trigger` itself only fails
//!   with [`StoreError::NotFound`].

use std::collections::HashMap;
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

use tokio::sync::broadcast;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

use crate::admission::{AdmissionGate, Ticket};
use crate::config::StoreConfig;
use crate::error::{OpFailure, StoreError};
use crate::events::{Event, EventKind};
use crate::ops::OpRef;
use crate::store::builder::StoreBuilder;
use crate::store::record::OpResult;

/// Shared store state.
struct Inner<T> {
    /// Registered operations by key.
    operations: RwLock<HashMap<String, OpRef<T>>>,
    /// Last committed record by key.
    results: RwLock<HashMap<String, OpResult<T>>>,
    /// Shared admission capacity across all keys.
    gate: Arc<AdmissionGate>,
    /// Broadcast channel for store events; publishing never blocks.
    events: broadcast::Sender<Event>,
    /// Stops the subscriber delivery workers, if any were wired.
    delivery_token: CancellationToken,
}

impl<T> Drop for Inner<T> {
    fn drop(&mut self) {
        // Last store handle gone: stop any delivery workers.
        self.delivery_token.cancel();
    }
}

/// Keyed, bounded-concurrency operation store.
///
/// Cheap to clone (internally `Arc`-backed); clones share the same maps,
/// gate, and event channel. Create one per logical session and pass it by reference
/// to whichever component needs it — there is no ambient/global lookup.
///
/// ### Example
/// ```
/// use keyops::{OpFailure, OpFn, OpStore, StoreConfig};
///
/// # #[tokio::main(flavor = "current_thread")]
/// # async fn main() -> Result<(), keyops::StoreError> {
/// let store: OpStore<u32> = OpStore::new(StoreConfig::default());
/// store.assign("answer", OpFn::arc(|| async { Ok::<_, OpFailure>(42) }));
///
/// let settled = store.trigger("answer")?;
/// let _ = settled.await;
///
/// assert_eq!(store.get("answer").data, Some(42));
/// # Ok(())
/// # }
/// ```
pub struct OpStore<T> {
    inner: Arc<Inner<T>>,
}

impl<T> Clone for OpStore<T> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<T> OpStore<T>
where
    T: Clone + Send + Sync + 'static,
{
    /// Creates a store with the given configuration and no subscribers.
    ///
    /// Does not spawn anything; usable outside a runtime until the first
    /// `trigger`.
    pub fn new(cfg: StoreConfig) -> Self {
        StoreBuilder::new(cfg).build()
    }

    /// Returns a builder for a store with subscriber fan-out.
    pub fn builder(cfg: StoreConfig) -> StoreBuilder<T> {
        StoreBuilder::new(cfg)
    }

    pub(super) fn from_parts(
        gate: Arc<AdmissionGate>,
        events: broadcast::Sender<Event>,
        delivery_token: CancellationToken,
    ) -> Self {
        Self {
            inner: Arc::new(Inner {
                operations: RwLock::new(HashMap::new()),
                results: RwLock::new(HashMap::new()),
                gate,
                events,
                delivery_token,
            }),
        }
    }

    // ---------------------------
    // Registration
    // ---------------------------

    /// Stores (or overwrites) the operation for `key`.
    ///
    /// Has no effect on any existing result record for the key. Overwriting
    /// does not cancel an in-flight run that captured the old operation, but
    /// that run's outcome will be discarded at commit time.
    pub fn assign(&self, key: impl Into<String>, op: OpRef<T>) {
        let key = key.into();
        self.write_ops().insert(key.clone(), op);
        self.publish(Event::new(EventKind::OpAssigned).with_key(key));
    }

    /// Deletes both the operation and the result record for `key`.
    ///
    /// Does not cancel an already-started run for the key; its completion
    /// will be discarded instead of resurrecting the removed record.
    pub fn remove(&self, key: &str) {
        let removed = {
            // Lock order: operations before results.
            let mut ops = self.write_ops();
            let mut results = self.write_results();
            let had_op = ops.remove(key).is_some();
            let had_result = results.remove(key).is_some();
            had_op || had_result
        };
        if removed {
            self.publish(Event::new(EventKind::OpRemoved).with_key(key));
        }
    }

    /// Wipes all result records, leaving registered operations intact.
    ///
    /// Asymmetric reset: callers can re-trigger existing operations after
    /// clearing stale results.
    pub fn clear(&self) {
        self.write_results().clear();
        self.publish(Event::new(EventKind::ResultsCleared));
    }

    // ---------------------------
    // Execution
    // ---------------------------

    /// Triggers the operation assigned to `key`.
    ///
    /// Synchronously: fails with [`StoreError::NotFound`] if the key has no
    /// assigned operation (no state mutation, no gate interaction);
    /// otherwise commits `{is_loading: true, error: None}` before returning,
    /// so a `get` immediately after this call observes the loading state.
    ///
    /// The admission position is also claimed before returning, so triggers
    /// issued in call order are admitted in call order, globally across
    /// keys. The run itself is spawned in the background: it waits for its
    /// slot, invokes the operation, commits the outcome into the record,
    /// and releases the slot before the returned handle resolves. Awaiting
    /// the handle is optional; dropping it detaches the run.
    ///
    /// Must be called from within a Tokio runtime.
    pub fn trigger(&self, key: &str) -> Result<JoinHandle<()>, StoreError> {
        let Some(op) = self.read_ops().get(key).cloned() else {
            self.publish(
                Event::new(EventKind::TriggerRejected)
                    .with_key(key)
                    .with_reason("op_not_found"),
            );
            return Err(StoreError::NotFound {
                key: key.to_string(),
            });
        };

        {
            let mut results = self.write_results();
            results.entry(key.to_string()).or_default().begin_loading();
        }
        // Claimed here, not in the spawned task: the admission order between
        // two triggers is their call order, not the scheduler's.
        let ticket = Arc::clone(&self.inner.gate).enqueue();
        self.publish(Event::new(EventKind::TriggerPending).with_key(key));

        let store = self.clone();
        let key = key.to_string();
        Ok(tokio::spawn(async move {
            store.run_admitted(key, op, ticket).await;
        }))
    }

    /// Admitted half of a trigger: wait on the ticket, execute, commit,
    /// release.
    async fn run_admitted(self, key: String, op: OpRef<T>, ticket: Ticket) {
        let permit = ticket.admitted().await;
        self.publish(Event::new(EventKind::OpStarted).with_key(key.as_str()));

        let outcome = op.call().await;
        self.commit(&key, &op, outcome);

        // Released after the record is committed, admitting the next waiter.
        drop(permit);
    }

    /// Commits a settled outcome, unless the run went stale mid-flight.
    ///
    /// A run is stale when the key no longer holds the exact operation the
    /// trigger captured (removed, or overwritten by a later `assign`). Stale
    /// outcomes are discarded; overlapping triggers of the *same* operation
    /// all pass the guard, so the last completion wins.
    fn commit(&self, key: &str, started: &OpRef<T>, outcome: Result<T, OpFailure>) {
        // Lock order: operations before results. Holding the operations lock
        // across the results write keeps `remove` from slipping in between
        // the freshness check and the commit.
        let ops = self.read_ops();
        let fresh = ops.get(key).is_some_and(|cur| Arc::ptr_eq(cur, started));
        if !fresh {
            drop(ops);
            let label = if outcome.is_ok() { "succeeded" } else { "failed" };
            self.publish(
                Event::new(EventKind::ResultDiscarded)
                    .with_key(key)
                    .with_reason(label),
            );
            return;
        }

        match outcome {
            Ok(value) => {
                self.write_results()
                    .insert(key.to_string(), OpResult::success(value));
                drop(ops);
                self.publish(Event::new(EventKind::OpSucceeded).with_key(key));
            }
            Err(error) => {
                let reason = error.message().to_string();
                self.write_results()
                    .insert(key.to_string(), OpResult::failure(error));
                drop(ops);
                self.publish(
                    Event::new(EventKind::OpFailed)
                        .with_key(key)
                        .with_reason(reason),
                );
            }
        }
    }

    // ---------------------------
    // Reads
    // ---------------------------

    /// Returns the current record for `key`, or the default record if the
    /// key has never been triggered.
    ///
    /// Pure read of the latest committed state; never suspends and never
    /// observes a partially-applied transition.
    pub fn get(&self, key: &str) -> OpResult<T> {
        self.read_results().get(key).cloned().unwrap_or_default()
    }

    /// True if a trigger for `key` has committed loading and not yet settled.
    pub fn is_loading(&self, key: &str) -> bool {
        self.read_results().get(key).is_some_and(|r| r.is_loading)
    }

    /// True if `key` has an assigned operation.
    pub fn contains(&self, key: &str) -> bool {
        self.read_ops().contains_key(key)
    }

    /// Returns the sorted list of assigned keys.
    pub fn keys(&self) -> Vec<String> {
        let ops = self.read_ops();
        let mut keys: Vec<String> = ops.keys().cloned().collect();
        keys.sort_unstable();
        keys
    }

    /// Number of assigned operations.
    pub fn len(&self) -> usize {
        self.read_ops().len()
    }

    /// True if no operations are assigned.
    pub fn is_empty(&self) -> bool {
        self.read_ops().is_empty()
    }

    /// Number of admission slots currently held (triggers whose position
    /// was granted, whether or not the operation has started).
    pub fn in_flight(&self) -> usize {
        self.inner.gate.in_flight()
    }

    /// Number of triggers queued for admission.
    pub fn queued(&self) -> usize {
        self.inner.gate.queued()
    }

    /// The fixed admission capacity.
    pub fn capacity(&self) -> usize {
        self.inner.gate.capacity()
    }

    // ---------------------------
    // Observability
    // ---------------------------

    /// Creates a receiver observing subsequent store events.
    pub fn subscribe(&self) -> broadcast::Receiver<Event> {
        self.inner.events.subscribe()
    }

    /// Stops the subscriber delivery workers, if any were wired at build
    /// time.
    ///
    /// Store methods keep working afterwards, and receivers from
    /// [`subscribe`](OpStore::subscribe) are unaffected. Also happens
    /// automatically when the last store handle is dropped.
    pub fn shutdown(&self) {
        self.inner.delivery_token.cancel();
    }

    fn publish(&self, ev: Event) {
        // Fire-and-forget; no receivers is fine.
        let _ = self.inner.events.send(ev);
    }

    // ---------------------------
    // Lock helpers
    // ---------------------------
    //
    // Guards are held only for the read-modify-write, never across an await.
    // Poisoning is recovered: critical sections leave the maps consistent
    // even if a holder panicked.

    fn read_ops(&self) -> RwLockReadGuard<'_, HashMap<String, OpRef<T>>> {
        self.inner
            .operations
            .read()
            .unwrap_or_else(|e| e.into_inner())
    }

    fn write_ops(&self) -> RwLockWriteGuard<'_, HashMap<String, OpRef<T>>> {
        self.inner
            .operations
            .write()
            .unwrap_or_else(|e| e.into_inner())
    }

    fn read_results(&self) -> RwLockReadGuard<'_, HashMap<String, OpResult<T>>> {
        self.inner.results.read().unwrap_or_else(|e| e.into_inner())
    }

    fn write_results(&self) -> RwLockWriteGuard<'_, HashMap<String, OpResult<T>>> {
        self.inner
            .results
            .write()
            .unwrap_or_else(|e| e.into_inner())
    }
}
