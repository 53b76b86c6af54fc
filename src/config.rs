//! # Store configuration.
//!
//! Provides [`StoreConfig`], the centralized settings for an
//! [`OpStore`](crate::OpStore) instance.
//!
//! ## Sentinel handling
//! - `max_concurrent = 0` is clamped to 1 (the gate requires a positive
//!   capacity; capacity 1 degenerates to a mutual-exclusion lock).
//! - `bus_capacity` is clamped to a minimum of 1 at build time.
//!
//! Prefer the clamp accessors over reading fields directly to avoid
//! sprinkling sentinel checks across the codebase.

/// Configuration for an operation store.
///
/// Defines:
/// - **Concurrency limit**: how many operations may run simultaneously
/// - **Event system**: bus capacity for event delivery
///
/// ## Field semantics
/// - `max_concurrent`: admission gate capacity (min 1; clamped)
/// - `bus_capacity`: event broadcast ring buffer size (min 1; clamped)
#[derive(Clone, Debug)]
pub struct StoreConfig {
    /// Maximum number of operations running concurrently across all keys.
    ///
    /// Fixed for the lifetime of the store. Values below 1 are clamped to 1.
    pub max_concurrent: usize,

    /// Capacity of the event bus broadcast channel ring buffer.
    ///
    /// Slow subscribers that lag behind more than `bus_capacity` events will
    /// receive `Lagged` and skip older items.
    pub bus_capacity: usize,
}

impl StoreConfig {
    /// Returns the admission capacity clamped to a minimum of 1.
    #[inline]
    pub fn max_concurrent_clamped(&self) -> usize {
        self.max_concurrent.max(1)
    }

    /// Returns a bus capacity clamped to a minimum of 1.
    #[inline]
    pub fn bus_capacity_clamped(&self) -> usize {
        self.bus_capacity.max(1)
    }
}

impl Default for StoreConfig {
    /// Default configuration:
    ///
    /// - `max_concurrent = 5` (shared admission capacity)
    /// - `bus_capacity = 1024` (good baseline)
    fn default() -> Self {
        Self {
            max_concurrent: 5,
            bus_capacity: 1024,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let cfg = StoreConfig::default();
        assert_eq!(cfg.max_concurrent, 5);
        assert_eq!(cfg.bus_capacity, 1024);
    }

    #[test]
    fn test_clamps() {
        let cfg = StoreConfig {
            max_concurrent: 0,
            bus_capacity: 0,
        };
        assert_eq!(cfg.max_concurrent_clamped(), 1);
        assert_eq!(cfg.bus_capacity_clamped(), 1);
    }
}
