//! # Per-subscriber delivery worker.
//!
//! Each subscriber gets its own task holding its own broadcast receiver:
//!
//! ```text
//! OpStore ── send(Event) ──► broadcast ring ──┬──► worker ── a.on_event
//!                                             ├──► worker ── b.on_event
//!                                             └──► worker ── c.on_event
//! ```
//!
//! ## Rules
//! - Delivery never blocks the store; a subscriber that falls behind the
//!   ring lags past the missed window and keeps going.
//! - Lag and panics are reported on the event channel itself
//!   ([`EventKind::SubscriberLagged`] / [`EventKind::SubscriberPanicked`]),
//!   not on a side channel.
//! - A panic while handling `SubscriberPanicked` is not re-reported; that
//!   would loop.
//! - Workers stop when the shutdown token fires. The store cancels it from
//!   `shutdown()` and when its last handle is dropped.

use std::panic::AssertUnwindSafe;
use std::sync::Arc;

use futures::FutureExt;
use tokio::sync::broadcast::{self, error::RecvError};
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

use crate::events::{Event, EventKind};

use super::Subscribe;

/// Spawns the delivery worker for one subscriber.
///
/// Subscribes before spawning, so no event published after this call is
/// missed.
pub(crate) fn spawn_delivery_worker(
    events: broadcast::Sender<Event>,
    subscriber: Arc<dyn Subscribe>,
    token: CancellationToken,
) -> JoinHandle<()> {
    let mut rx = events.subscribe();
    tokio::spawn(async move {
        loop {
            let event = tokio::select! {
                _ = token.cancelled() => break,
                msg = rx.recv() => match msg {
                    Ok(event) => event,
                    Err(RecvError::Closed) => break,
                    Err(RecvError::Lagged(skipped)) => {
                        let _ = events.send(
                            Event::new(EventKind::SubscriberLagged).with_reason(format!(
                                "{} skipped {skipped} events",
                                subscriber.name()
                            )),
                        );
                        continue;
                    }
                },
            };
            if !subscriber.wants(event.kind) {
                continue;
            }
            let handled = AssertUnwindSafe(subscriber.on_event(&event)).catch_unwind();
            if handled.await.is_err() && event.kind != EventKind::SubscriberPanicked {
                let _ = events.send(
                    Event::new(EventKind::SubscriberPanicked).with_reason(subscriber.name()),
                );
            }
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    use async_trait::async_trait;

    struct Tally(AtomicUsize);

    #[async_trait]
    impl Subscribe for Tally {
        async fn on_event(&self, _event: &Event) {
            self.0.fetch_add(1, Ordering::SeqCst);
        }

        fn name(&self) -> &'static str {
            "tally"
        }
    }

    async fn wait_for_count(tally: &Tally, want: usize) {
        let deadline = tokio::time::Instant::now() + Duration::from_secs(1);
        while tally.0.load(Ordering::SeqCst) < want {
            assert!(tokio::time::Instant::now() < deadline, "delivery timed out");
            tokio::task::yield_now().await;
        }
    }

    #[tokio::test]
    async fn test_every_subscriber_observes_every_event() {
        let (events, _keep) = broadcast::channel(16);
        let token = CancellationToken::new();
        let a = Arc::new(Tally(AtomicUsize::new(0)));
        let b = Arc::new(Tally(AtomicUsize::new(0)));
        let wa = spawn_delivery_worker(
            events.clone(),
            Arc::clone(&a) as Arc<dyn Subscribe>,
            token.clone(),
        );
        let wb = spawn_delivery_worker(
            events.clone(),
            Arc::clone(&b) as Arc<dyn Subscribe>,
            token.clone(),
        );

        events
            .send(Event::new(EventKind::OpAssigned).with_key("k"))
            .unwrap();
        events
            .send(Event::new(EventKind::OpRemoved).with_key("k"))
            .unwrap();

        wait_for_count(&a, 2).await;
        wait_for_count(&b, 2).await;

        token.cancel();
        wa.await.unwrap();
        wb.await.unwrap();
    }

    #[tokio::test]
    async fn test_subscriber_panic_is_isolated_and_reported() {
        struct Bomb;

        #[async_trait]
        impl Subscribe for Bomb {
            async fn on_event(&self, _event: &Event) {
                panic!("bomb");
            }

            fn name(&self) -> &'static str {
                "bomb"
            }
        }

        let (events, _keep) = broadcast::channel(16);
        let token = CancellationToken::new();
        let tally = Arc::new(Tally(AtomicUsize::new(0)));
        let _bomb = spawn_delivery_worker(events.clone(), Arc::new(Bomb), token.clone());
        let _tally_worker = spawn_delivery_worker(
            events.clone(),
            Arc::clone(&tally) as Arc<dyn Subscribe>,
            token.clone(),
        );
        let mut watch = events.subscribe();

        events.send(Event::new(EventKind::ResultsCleared)).unwrap();

        // The bomb's panic is reported as an event, which the healthy
        // subscriber also receives.
        wait_for_count(&tally, 2).await;
        let report = tokio::time::timeout(Duration::from_secs(1), async {
            loop {
                let ev = watch.recv().await.unwrap();
                if ev.kind == EventKind::SubscriberPanicked {
                    break ev;
                }
            }
        })
        .await
        .expect("panic report timed out");
        assert_eq!(report.reason.as_deref(), Some("bomb"));

        token.cancel();
    }

    #[tokio::test]
    async fn test_wants_filter_skips_events() {
        struct FailuresOnly(AtomicUsize);

        #[async_trait]
        impl Subscribe for FailuresOnly {
            async fn on_event(&self, _event: &Event) {
                self.0.fetch_add(1, Ordering::SeqCst);
            }

            fn name(&self) -> &'static str {
                "failures_only"
            }

            fn wants(&self, kind: EventKind) -> bool {
                kind == EventKind::OpFailed
            }
        }

        let (events, _keep) = broadcast::channel(16);
        let token = CancellationToken::new();
        let sub = Arc::new(FailuresOnly(AtomicUsize::new(0)));
        let _worker = spawn_delivery_worker(
            events.clone(),
            Arc::clone(&sub) as Arc<dyn Subscribe>,
            token.clone(),
        );

        events
            .send(Event::new(EventKind::OpSucceeded).with_key("k"))
            .unwrap();
        events
            .send(Event::new(EventKind::OpFailed).with_key("k"))
            .unwrap();
        events
            .send(Event::new(EventKind::OpSucceeded).with_key("k"))
            .unwrap();
        events
            .send(Event::new(EventKind::OpFailed).with_key("k"))
            .unwrap();

        let deadline = tokio::time::Instant::now() + Duration::from_secs(1);
        while sub.0.load(Ordering::SeqCst) < 2 {
            assert!(tokio::time::Instant::now() < deadline, "delivery timed out");
            tokio::task::yield_now().await;
        }
        for _ in 0..16 {
            tokio::task::yield_now().await;
        }
        assert_eq!(sub.0.load(Ordering::SeqCst), 2);

        token.cancel();
    }

    #[tokio::test]
    async fn test_worker_stops_on_cancellation() {
        let (events, _keep) = broadcast::channel(4);
        let token = CancellationToken::new();
        let worker = spawn_delivery_worker(
            events.clone(),
            Arc::new(Tally(AtomicUsize::new(0))),
            token.clone(),
        );

        token.cancel();
        worker.await.unwrap();
    }
}
