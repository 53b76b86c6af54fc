//! Store events.
//!
//! This module holds the event **data model**: [`EventKind`] classifies what
//! happened and [`Event`] carries its metadata (sequence number, timestamp,
//! affected key, reason).
//!
//! Delivery is not a type of its own: the store publishes on a
//! `tokio::sync::broadcast` channel it owns. Embedders take receivers via
//! [`OpStore::subscribe`](crate::OpStore::subscribe), and each
//! [`Subscribe`](crate::Subscribe) implementor wired at build time is driven
//! by a worker holding its own receiver.

mod event;

pub use event::{Event, EventKind};
