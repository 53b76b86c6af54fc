//! # Operation abstractions.
//!
//! This module provides the core operation-related types:
//! - [`Operation`] — trait for implementing async, zero-argument operations
//! - [`OpFn`] — function-based operation implementation
//! - [`OpRef`] — shared reference to an operation (`Arc<dyn Operation<T>>`)

mod op_fn;
mod operation;

pub use op_fn::OpFn;
pub use operation::{OpRef, Operation};
