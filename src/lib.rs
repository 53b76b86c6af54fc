//! # keyops
//!
//! **keyops** is a keyed, bounded-concurrency operation store for Rust.
//!
//! Callers register named async operations, trigger them by key, and observe
//! per-key results (pending/success/failure) without managing their own
//! concurrency limits or result caching. The crate is designed as the core
//! behind a UI state-binding layer, but has no opinion about how the embedder
//! observes state: poll [`OpStore::get`], or subscribe to the event bus.
//!
//! ## Architecture
//! ### Overview
//! ```text
//!     ┌──────────────┐   ┌──────────────┐   ┌──────────────┐
//!     │   OpRef<T>   │   │   OpRef<T>   │   │   OpRef<T>   │
//!     │ (key "users")│   │ (key "feed") │   │ (key "sync") │
//!     └──────┬───────┘   └──────┬───────┘   └──────┬───────┘
//!            ▼                  ▼                  ▼
//! ┌───────────────────────────────────────────────────────────────┐
//! │  OpStore<T>                                                   │
//! │  - operations: key → OpRef<T>                                 │
//! │  - results:    key → OpResult<T> (data/error/is_loading)      │
//! │  - events (broadcast channel)                                 │
//! └──────┬──────────────────┬──────────────────┬──────────────────┘
//!        ▼                  ▼                  ▼
//!     trigger("users")   trigger("feed")    trigger("sync")
//!        │                  │                  │
//!        └──────────────────┼──────────────────┘
//!                           ▼
//!              ┌─────────────────────────┐
//!              │  AdmissionGate          │   capacity = max_concurrent
//!              │  in_flight / FIFO queue │   (shared across all keys)
//!              └─────────────────────────┘
//! ```
//!
//! ### Lifecycle
//! ```text
//! assign(key, op) ──► operations[key] = op
//!
//! trigger(key):
//!   ├─► absent? ──► Err(StoreError::NotFound)        (no mutation)
//!   ├─► results[key] ← { is_loading: true, error: None }
//!   ├─► gate.enqueue() ──► Ticket   (position fixed in call order)
//!   └─► spawned run:
//!         ├─► ticket.admitted().await     (FIFO, bounded by capacity)
//!         ├─► op.call().await
//!         ├─► still the assigned op? ──► commit success/failure
//!         │                       └──► otherwise discard (stale)
//!         └─► permit released ──► next queued trigger admitted
//!
//! get(key)    ──► latest committed OpResult<T> (or default)
//! remove(key) ──► drops operation + record   (in-flight run discards)
//! clear()     ──► drops all records, keeps operations
//! ```
//!
//! ## Features
//! | Area              | Description                                                  | Key types / traits                |
//! |-------------------|--------------------------------------------------------------|-----------------------------------|
//! | **Store API**     | Register, trigger, read, remove, clear keyed operations.     | [`OpStore`], [`OpResult`]         |
//! | **Admission**     | FIFO counting gate bounding concurrent execution.            | [`AdmissionGate`], [`Ticket`], [`Permit`] |
//! | **Operations**    | Define operations as functions or trait impls.               | [`Operation`], [`OpFn`], [`OpRef`]|
//! | **Subscriber API**| Hook into store events (logging, metrics, custom reactions). | [`Subscribe`], [`Event`], [`EventKind`] |
//! | **Errors**        | Typed misuse errors and operation failure values.            | [`StoreError`], [`OpFailure`]     |
//! | **Configuration** | Centralize store settings.                                   | [`StoreConfig`]                   |
//!
//! ## Optional features
//! - `logging`: exports a simple built-in [`LogWriter`] _(demo/reference only)_.
//!
//! ## Error channels
//! The only error `trigger` returns is [`StoreError::NotFound`] (caller
//! misuse). Operation failures settle as [`OpFailure`] inside the key's
//! [`OpResult`] and are observed via [`OpStore::get`] — they are never thrown
//! through `trigger`.
//!
//! ## Example
//! ```rust
//! use keyops::{OpFailure, OpFn, OpStore, StoreConfig};
//!
//! #[tokio::main(flavor = "current_thread")]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let mut cfg = StoreConfig::default();
//!     cfg.max_concurrent = 2;
//!
//!     let store: OpStore<String> = OpStore::new(cfg);
//!
//!     store.assign("greeting", OpFn::arc(|| async {
//!         Ok::<_, OpFailure>("hello".to_string())
//!     }));
//!
//!     // Loading state is committed before trigger returns.
//!     let settled = store.trigger("greeting")?;
//!     assert!(store.get("greeting").is_loading);
//!
//!     settled.await?;
//!     assert_eq!(store.get("greeting").data.as_deref(), Some("hello"));
//!     Ok(())
//! }
//! ```

mod admission;
mod config;
mod error;
mod events;
mod ops;
mod store;
mod subscribers;

// ---- Public re-exports ----

pub use admission::{AdmissionGate, Permit, Ticket};
pub use config::StoreConfig;
pub use error::{OpFailure, StoreError};
pub use events::{Event, EventKind};
pub use ops::{OpFn, OpRef, Operation};
pub use store::{OpResult, OpStore, StoreBuilder};
pub use subscribers::Subscribe;

// Optional: expose a simple built-in logger subscriber (demo/reference).
// Enable with: `--features logging`
#[cfg(feature = "logging")]
pub use subscribers::LogWriter;
