//! # Event subscribers for the operation store.
//!
//! [`Subscribe`] implementors observe store events without polling. Each
//! subscriber wired through [`StoreBuilder`](crate::StoreBuilder) is driven
//! by its own worker task with its own broadcast receiver:
//!
//! ```text
//! OpStore ── send(Event) ──► broadcast ring ──┬──► worker ── sub1.on_event
//!                                             └──► worker ── sub2.on_event
//! ```
//!
//! Slow subscribers lag past missed events rather than backpressure the
//! store; panics inside a handler are caught. Both conditions are reported
//! as events on the same channel (`SubscriberLagged`, `SubscriberPanicked`),
//! so they are observable exactly like any other store event.
//!
//! ## Implementing custom subscribers
//! ```no_run
//! use keyops::{Event, EventKind, Subscribe};
//! use async_trait::async_trait;
//!
//! struct FailureAlerts;
//!
//! #[async_trait]
//! impl Subscribe for FailureAlerts {
//!     async fn on_event(&self, _event: &Event) {
//!         // page someone...
//!     }
//!
//!     fn wants(&self, kind: EventKind) -> bool {
//!         kind == EventKind::OpFailed
//!     }
//! }
//! ```

mod subscribe;
mod worker;

#[cfg(feature = "logging")]
mod log;

pub use subscribe::Subscribe;
pub(crate) use worker::spawn_delivery_worker;

#[cfg(feature = "logging")]
pub use log::LogWriter;
