//! # Operation trait and shared handle type.
//!
//! An operation is a zero-argument unit of async work producing a `T` or an
//! [`OpFailure`]. It carries no arguments by contract; inputs are captured by
//! the implementor (use `Arc<...>` explicitly for shared state). The store
//! holds operations as [`OpRef`] and may invoke the same operation many
//! times, so `call` takes `&self`.
//!
//! There is no cancellation hook: once an operation is admitted and running,
//! the store never interrupts it.

use std::sync::Arc;

use async_trait::async_trait;

use crate::error::OpFailure;

/// # Asynchronous, zero-argument unit of work.
///
/// Implementors produce a fresh execution per [`call`](Operation::call).
/// Failures settle as [`OpFailure`] and are delivered through the key's
/// result record, not through `trigger`.
///
/// # Example
/// ```
/// use async_trait::async_trait;
/// use keyops::{OpFailure, Operation};
///
/// struct FetchAnswer;
///
/// #[async_trait]
/// impl Operation<u32> for FetchAnswer {
///     async fn call(&self) -> Result<u32, OpFailure> {
///         Ok(42)
///     }
/// }
/// ```
#[async_trait]
pub trait Operation<T>: Send + Sync + 'static
where
    T: Send + 'static,
{
    /// Executes the operation to completion.
    async fn call(&self) -> Result<T, OpFailure>;
}

/// Shared handle to an operation.
pub type OpRef<T> = Arc<dyn Operation<T>>;
