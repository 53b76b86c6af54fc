//! Keyed operation store: records, core, and construction.
//!
//! The store is the crate's public surface. The only entry points are
//! [`OpStore`] and [`StoreBuilder`]; [`OpResult`] is the per-key record the
//! embedder reads back.
//!
//! Internal modules:
//! - [`record`]: the per-key result record and its commit transitions;
//! - [`core`]: the keyed store (assign/trigger/get/remove/clear) composed
//!   with the admission gate;
//! - [`builder`]: construction and subscriber delivery wiring.

mod builder;
mod core;
mod record;

pub use builder::StoreBuilder;
pub use core::OpStore;
pub use record::OpResult;
