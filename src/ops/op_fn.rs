//! # Function-backed operation (`OpFn`)
//!
//! [`OpFn`] wraps a closure `F: Fn() -> Fut`, producing a fresh future per
//! call. This avoids shared mutable state; if the closure needs common state
//! across runs, capture an `Arc<...>` explicitly.
//!
//! ## Example
//! ```rust
//! use keyops::{OpFailure, OpFn, OpRef};
//!
//! let op: OpRef<u32> = OpFn::arc(|| async { Ok::<_, OpFailure>(7) });
//! ```

use std::future::Future;
use std::sync::Arc;

use async_trait::async_trait;

use crate::error::OpFailure;
use crate::ops::operation::{OpRef, Operation};

/// Function-backed operation implementation.
///
/// Wraps a closure that *creates* a new future per call.
#[derive(Debug)]
pub struct OpFn<F> {
    f: F,
}

impl<F> OpFn<F> {
    /// Creates a new function-backed operation.
    ///
    /// Prefer [`OpFn::arc`] when you immediately need an [`OpRef`].
    pub fn new(f: F) -> Self {
        Self { f }
    }

    /// Creates the operation and returns it as a shared handle.
    ///
    /// ## Example
    /// ```rust
    /// use keyops::{OpFailure, OpFn, OpRef};
    ///
    /// let op: OpRef<String> = OpFn::arc(|| async {
    ///     Ok::<_, OpFailure>("ready".to_string())
    /// });
    /// ```
    pub fn arc<T>(f: F) -> OpRef<T>
    where
        T: Send + 'static,
        Self: Operation<T>,
    {
        Arc::new(Self::new(f))
    }
}

#[async_trait]
impl<F, Fut, T> Operation<T> for OpFn<F>
where
    F: Fn() -> Fut + Send + Sync + 'static, // Fn, not FnMut
    Fut: Future<Output = Result<T, OpFailure>> + Send + 'static,
    T: Send + 'static,
{
    async fn call(&self) -> Result<T, OpFailure> {
        (self.f)().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_each_call_runs_a_fresh_future() {
        use std::sync::atomic::{AtomicUsize, Ordering};

        let counter = Arc::new(AtomicUsize::new(0));
        let c = Arc::clone(&counter);
        let op: OpRef<usize> = OpFn::arc(move || {
            let c = Arc::clone(&c);
            async move { Ok(c.fetch_add(1, Ordering::SeqCst)) }
        });

        assert_eq!(op.call().await.unwrap(), 0);
        assert_eq!(op.call().await.unwrap(), 1);
        assert_eq!(counter.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_failure_settles_as_op_failure() {
        let op: OpRef<u8> = OpFn::arc(|| async { Err(OpFailure::new("boom")) });
        assert_eq!(op.call().await.unwrap_err().message(), "boom");
    }
}
