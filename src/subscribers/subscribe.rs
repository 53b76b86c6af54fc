//! # Subscriber contract.
//!
//! A [`Subscribe`] implementor observes store events without polling. Each
//! subscriber runs on its own worker task holding its own broadcast
//! receiver, so a slow or panicking subscriber never blocks the store or its
//! peers. A subscriber that falls behind the event ring is lagged past, not
//! waited on.

use async_trait::async_trait;

use crate::events::{Event, EventKind};

/// Contract for store event subscribers.
///
/// Wire implementors through
/// [`StoreBuilder::with_subscriber`](crate::StoreBuilder::with_subscriber).
#[async_trait]
pub trait Subscribe: Send + Sync + 'static {
    /// Handles one event.
    ///
    /// Runs on the subscriber's own worker task and may await freely. A
    /// panic here is caught and surfaced as an
    /// [`EventKind::SubscriberPanicked`] event; the worker keeps going.
    async fn on_event(&self, event: &Event);

    /// Name used in delivery diagnostics (lag and panic reports).
    fn name(&self) -> &'static str {
        std::any::type_name::<Self>()
    }

    /// Pre-delivery filter; return `false` to skip the event entirely.
    ///
    /// Defaults to accepting every kind. Filtering here is cheaper than in
    /// [`on_event`](Subscribe::on_event): skipped events never cross into
    /// the handler.
    fn wants(&self, _kind: EventKind) -> bool {
        true
    }
}
