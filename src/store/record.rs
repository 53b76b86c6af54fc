//! # Per-key result record.
//!
//! [`OpResult`] is the last known outcome (or in-progress status) for a key.
//! Records only change through whole-record commits inside the store, so a
//! reader never observes a half-applied transition (an `is_loading` flip with
//! a stale `error`, for instance).
//!
//! ## Record states
//! ```text
//! default      { data: None,    error: None,    is_loading: false }
//! loading      { data: <prior>, error: None,    is_loading: true  }
//! succeeded    { data: Some(v), error: None,    is_loading: false }
//! failed       { data: None,    error: Some(e), is_loading: false }
//! ```
//!
//! ## Rules
//! - Entering `loading` clears `error` in the same commit.
//! - `data` from a prior successful run is retained while loading, so the
//!   embedder can keep showing the previous value until the re-run settles.
//! - A settled record has exactly one of `data`/`error` present.

use crate::error::OpFailure;

/// The last known outcome (or in-progress status) for a key.
///
/// Returned by [`OpStore::get`](crate::OpStore::get); a key that was never
/// triggered yields [`OpResult::default`].
#[derive(Debug, Clone, PartialEq)]
pub struct OpResult<T> {
    /// Value of the most recent successful run, if any.
    pub data: Option<T>,
    /// Failure of the most recent run, if it failed.
    pub error: Option<OpFailure>,
    /// True from trigger commit until the run settles (or is discarded).
    pub is_loading: bool,
}

impl<T> OpResult<T> {
    /// Record for a successfully settled run.
    pub fn success(value: T) -> Self {
        Self {
            data: Some(value),
            error: None,
            is_loading: false,
        }
    }

    /// Record for a failed run.
    pub fn failure(error: OpFailure) -> Self {
        Self {
            data: None,
            error: Some(error),
            is_loading: false,
        }
    }

    /// True once the record holds a settled outcome (data or error).
    pub fn is_settled(&self) -> bool {
        !self.is_loading && (self.data.is_some() || self.error.is_some())
    }

    /// Transition into the loading state.
    ///
    /// Clears the error and raises the flag in one step; prior data is kept.
    pub(crate) fn begin_loading(&mut self) {
        self.is_loading = true;
        self.error = None;
    }
}

impl<T> Default for OpResult<T> {
    fn default() -> Self {
        Self {
            data: None,
            error: None,
            is_loading: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_record_is_all_absent() {
        let rec: OpResult<u32> = OpResult::default();
        assert_eq!(rec.data, None);
        assert_eq!(rec.error, None);
        assert!(!rec.is_loading);
        assert!(!rec.is_settled());
    }

    #[test]
    fn test_begin_loading_clears_error_keeps_data() {
        let mut rec = OpResult::success(5u32);
        rec.error = Some(OpFailure::new("older failure"));
        rec.begin_loading();
        assert!(rec.is_loading);
        assert_eq!(rec.error, None);
        assert_eq!(rec.data, Some(5));
    }

    #[test]
    fn test_settled_outcomes() {
        assert!(OpResult::success(1u8).is_settled());
        assert!(OpResult::<u8>::failure(OpFailure::new("e")).is_settled());

        let mut loading = OpResult::success(1u8);
        loading.begin_loading();
        assert!(!loading.is_settled());
    }
}
