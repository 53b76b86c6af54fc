//! Error types used by the operation store.
//!
//! This module defines two distinct failure channels:
//!
//! - [`StoreError`] — misuse errors surfaced synchronously by store methods
//!   (currently only [`StoreError::NotFound`] from `trigger`).
//! - [`OpFailure`] — the failure value an operation itself settles with.
//!   It is recorded into the key's [`OpResult`](crate::OpResult) and observed
//!   via `get`, never re-thrown through `trigger`.
//!
//! Keeping these channels split is a hard contract: the only error a caller
//! must handle around `trigger` is `NotFound`; everything the operation does
//! is delivered through state.

use thiserror::Error;

/// # Misuse errors raised synchronously by [`OpStore`](crate::OpStore) methods.
///
/// These indicate a contract violation by the caller, not a failed operation.
/// No store state is mutated when one of these is returned.
#[non_exhaustive]
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StoreError {
    /// `trigger` was called for a key with no assigned operation.
    #[error("no operation assigned for key {key:?}")]
    NotFound {
        /// The key that had no assigned operation.
        key: String,
    },
}

impl StoreError {
    /// Returns a short stable label (snake_case) for use in logs/metrics.
    ///
    /// # Example
    /// ```
    /// use keyops::StoreError;
    ///
    /// let err = StoreError::NotFound { key: "fetch".into() };
    /// assert_eq!(err.as_label(), "op_not_found");
    /// ```
    pub fn as_label(&self) -> &'static str {
        match self {
            StoreError::NotFound { .. } => "op_not_found",
        }
    }
}

/// # Failure value an operation settles with.
///
/// Produced by [`Operation::call`](crate::Operation::call) implementations and
/// stored verbatim in the key's result record. Cloneable so that repeated
/// `get` calls can hand out copies of the last committed outcome.
///
/// # Example
/// ```
/// use keyops::OpFailure;
///
/// let err = OpFailure::new("connection refused");
/// assert_eq!(err.message(), "connection refused");
/// assert_eq!(err.to_string(), "operation failed: connection refused");
/// ```
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("operation failed: {message}")]
pub struct OpFailure {
    message: String,
}

impl OpFailure {
    /// Creates a failure from any string-like message.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    /// Returns the underlying message.
    pub fn message(&self) -> &str {
        &self.message
    }
}

impl From<String> for OpFailure {
    fn from(message: String) -> Self {
        Self { message }
    }
}

impl From<&str> for OpFailure {
    fn from(message: &str) -> Self {
        Self {
            message: message.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_found_label_and_display() {
        let err = StoreError::NotFound { key: "k".into() };
        assert_eq!(err.as_label(), "op_not_found");
        assert_eq!(err.to_string(), "no operation assigned for key \"k\"");
    }

    #[test]
    fn test_op_failure_conversions() {
        let a = OpFailure::new("boom");
        let b: OpFailure = "boom".into();
        let c: OpFailure = String::from("boom").into();
        assert_eq!(a, b);
        assert_eq!(b, c);
    }
}
