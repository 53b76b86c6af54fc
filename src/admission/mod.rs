//! # Admission control: FIFO counting gate.
//!
//! This module bounds how many operations run at once:
//! - [`AdmissionGate`] — explicit counting gate with a FIFO waiter queue
//! - [`Ticket`] — admission position, claimed synchronously at enqueue time
//! - [`Permit`] — RAII guard for a granted slot, releases on drop
//!
//! ## Rules
//! - At most `capacity` permits are outstanding at any instant.
//! - Positions are claimed synchronously by [`AdmissionGate::enqueue`] and
//!   honored strictly in claim order, never reordered by key or scheduler.
//! - Release is exactly-once by construction: dropping the [`Permit`] is the
//!   release, on every exit path of the protected region.

mod gate;
mod permit;
mod ticket;

pub use gate::AdmissionGate;
pub use permit::Permit;
pub use ticket::Ticket;
