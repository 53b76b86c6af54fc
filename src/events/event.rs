//! # Events emitted by the operation store.
//!
//! The [`EventKind`] enum classifies event types across four categories:
//! - **Registration events**: assign/remove/clear of keys and results
//! - **Execution events**: trigger flow (pending, started, succeeded, failed)
//! - **Discard events**: stale completions dropped by the freshness guard
//! - **Delivery events**: subscriber lag and panic reports
//!
//! The [`Event`] struct carries metadata such as timestamps, the affected
//! key, and a human-readable reason.
//!
//! ## Ordering guarantees
//! Each event has a globally unique sequence number (`seq`) that increases
//! monotonically. Use `seq` to restore the exact order when events are
//! delivered out of order.
//!
//! ## Example
//! ```rust
//! use keyops::{Event, EventKind};
//!
//! let ev = Event::new(EventKind::OpFailed)
//!     .with_key("fetch-user")
//!     .with_reason("connection refused");
//!
//! assert_eq!(ev.kind, EventKind::OpFailed);
//! assert_eq!(ev.key.as_deref(), Some("fetch-user"));
//! assert_eq!(ev.reason.as_deref(), Some("connection refused"));
//! ```

use std::sync::atomic::{AtomicU64, Ordering as AtomicOrdering};
use std::sync::Arc;
use std::time::SystemTime;

/// Global sequence counter for event ordering.
static EVENT_SEQ: AtomicU64 = AtomicU64::new(0);

/// Classification of store events.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventKind {
    // === Registration events ===
    /// An operation was assigned (or overwritten) for a key.
    ///
    /// Sets: `key`, `at`, `seq`.
    OpAssigned,

    /// A key's operation and result were removed.
    ///
    /// Sets: `key`, `at`, `seq`.
    OpRemoved,

    /// All result records were cleared (operations kept).
    ///
    /// Sets: `at`, `seq`.
    ResultsCleared,

    // === Execution events ===
    /// `trigger` was called for a key with no assigned operation.
    ///
    /// Sets: `key`, `reason` (error label), `at`, `seq`.
    TriggerRejected,

    /// A trigger committed its loading record and is awaiting admission.
    ///
    /// Sets: `key`, `at`, `seq`.
    TriggerPending,

    /// An admitted operation started executing (permit held).
    ///
    /// Sets: `key`, `at`, `seq`.
    OpStarted,

    /// An operation completed successfully and its result was committed.
    ///
    /// Sets: `key`, `at`, `seq`.
    OpSucceeded,

    /// An operation failed and its error was committed.
    ///
    /// Sets: `key`, `reason` (failure message), `at`, `seq`.
    OpFailed,

    // === Discard events ===
    /// A completion was discarded because the key's assigned operation
    /// changed (removed or reassigned) while the run was in flight.
    ///
    /// Sets: `key`, `reason` (outcome label), `at`, `seq`.
    ResultDiscarded,

    // === Delivery events ===
    /// A subscriber fell behind the event ring and missed events.
    ///
    /// Sets: `reason` (subscriber name and skip count), `at`, `seq`.
    SubscriberLagged,

    /// A subscriber panicked while handling an event.
    ///
    /// Sets: `reason` (subscriber name), `at`, `seq`.
    SubscriberPanicked,
}

/// Store event with optional metadata.
///
/// - `seq`: monotonic global sequence for ordering
/// - `at`: wall-clock timestamp (for logs)
/// - other optional fields are set depending on the [`EventKind`]
#[derive(Debug, Clone)]
pub struct Event {
    /// Globally unique, monotonically increasing sequence number.
    pub seq: u64,
    /// Wall-clock timestamp.
    pub at: SystemTime,
    /// Event classification.
    pub kind: EventKind,
    /// Affected key, if applicable.
    pub key: Option<Arc<str>>,
    /// Human-readable reason (failure messages, discard causes, etc.).
    pub reason: Option<Arc<str>>,
}

impl Event {
    /// Creates a new event of the given kind with current timestamp and next
    /// sequence number.
    pub fn new(kind: EventKind) -> Self {
        Self {
            seq: EVENT_SEQ.fetch_add(1, AtomicOrdering::Relaxed),
            at: SystemTime::now(),
            kind,
            key: None,
            reason: None,
        }
    }

    /// Attaches the affected key.
    #[inline]
    pub fn with_key(mut self, key: impl Into<Arc<str>>) -> Self {
        self.key = Some(key.into());
        self
    }

    /// Attaches a human-readable reason.
    #[inline]
    pub fn with_reason(mut self, reason: impl Into<Arc<str>>) -> Self {
        self.reason = Some(reason.into());
        self
    }

    /// True for terminal execution events (`OpSucceeded` / `OpFailed`).
    #[inline]
    pub fn is_terminal(&self) -> bool {
        matches!(self.kind, EventKind::OpSucceeded | EventKind::OpFailed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_seq_is_monotonic() {
        let a = Event::new(EventKind::OpAssigned);
        let b = Event::new(EventKind::TriggerPending);
        let c = Event::new(EventKind::OpSucceeded);
        assert!(a.seq < b.seq);
        assert!(b.seq < c.seq);
    }

    #[test]
    fn test_builder_attachments() {
        let ev = Event::new(EventKind::ResultDiscarded)
            .with_key("k")
            .with_reason("stale");
        assert_eq!(ev.key.as_deref(), Some("k"));
        assert_eq!(ev.reason.as_deref(), Some("stale"));
        assert!(!ev.is_terminal());
        assert!(Event::new(EventKind::OpFailed).is_terminal());
    }
}
