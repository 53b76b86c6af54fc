//! # Store construction and subscriber wiring.
//!
//! [`StoreBuilder`] assembles the admission gate, the broadcast event
//! channel, and the per-subscriber delivery workers before handing out the
//! [`OpStore`].
//!
//! ## Wiring
//! ```text
//! StoreBuilder::build()
//!   ├─ broadcast::channel(bus_capacity)
//!   ├─ AdmissionGate::new(max_concurrent)
//!   └─ per subscriber:
//!        events.subscribe() ──► delivery worker ──► sub.on_event(&Event)
//!        (workers stop on shutdown() or when the store is dropped)
//! ```

use std::marker::PhantomData;
use std::sync::Arc;

use tokio::sync::broadcast;
use tokio_util::sync::CancellationToken;

use crate::admission::AdmissionGate;
use crate::config::StoreConfig;
use crate::events::Event;
use crate::store::core::OpStore;
use crate::subscribers::{spawn_delivery_worker, Subscribe};

/// Builder for constructing an [`OpStore`] with optional subscribers.
pub struct StoreBuilder<T> {
    cfg: StoreConfig,
    subscribers: Vec<Arc<dyn Subscribe>>,
    _marker: PhantomData<fn() -> T>,
}

impl<T> StoreBuilder<T>
where
    T: Clone + Send + Sync + 'static,
{
    /// Creates a new builder with the given configuration.
    pub fn new(cfg: StoreConfig) -> Self {
        Self {
            cfg,
            subscribers: Vec::new(),
            _marker: PhantomData,
        }
    }

    /// Sets event subscribers for observability.
    ///
    /// Each subscriber is driven by its own delivery worker holding its own
    /// broadcast receiver; see [`Subscribe`] for the delivery contract.
    pub fn with_subscribers(mut self, subscribers: Vec<Arc<dyn Subscribe>>) -> Self {
        self.subscribers = subscribers;
        self
    }

    /// Adds a single subscriber.
    pub fn with_subscriber(mut self, subscriber: Arc<dyn Subscribe>) -> Self {
        self.subscribers.push(subscriber);
        self
    }

    /// Builds and returns the store.
    ///
    /// If subscribers were set, this spawns their delivery workers and
    /// therefore must be called within a Tokio runtime; without subscribers
    /// nothing is spawned.
    pub fn build(self) -> OpStore<T> {
        let (events, _) = broadcast::channel::<Event>(self.cfg.bus_capacity_clamped());
        let gate = AdmissionGate::new(self.cfg.max_concurrent_clamped());
        let token = CancellationToken::new();

        for subscriber in self.subscribers {
            let _ = spawn_delivery_worker(events.clone(), subscriber, token.clone());
        }

        OpStore::from_parts(gate, events, token)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    use async_trait::async_trait;

    use crate::error::OpFailure;
    use crate::ops::OpFn;

    struct Counter {
        seen: AtomicUsize,
    }

    #[async_trait]
    impl Subscribe for Counter {
        async fn on_event(&self, _event: &Event) {
            self.seen.fetch_add(1, Ordering::SeqCst);
        }

        fn name(&self) -> &'static str {
            "counter"
        }
    }

    #[tokio::test]
    async fn test_subscribers_observe_trigger_flow() {
        let counter = Arc::new(Counter {
            seen: AtomicUsize::new(0),
        });
        let store: OpStore<u32> = OpStore::builder(StoreConfig::default())
            .with_subscriber(Arc::clone(&counter) as Arc<dyn Subscribe>)
            .build();

        store.assign("k", OpFn::arc(|| async { Ok::<_, OpFailure>(1) }));
        store.trigger("k").unwrap().await.unwrap();

        // Delivery is asynchronous; poll until the events landed.
        // Assigned + pending + started + succeeded = 4.
        let deadline = tokio::time::Instant::now() + Duration::from_secs(1);
        while counter.seen.load(Ordering::SeqCst) < 4 {
            assert!(tokio::time::Instant::now() < deadline, "delivery timed out");
            tokio::task::yield_now().await;
        }

        store.shutdown();
    }
}
