//! # Subject configuration.
//!
//! Provides [`SubjectConfig`], the settings a [`Subject`](crate::Subject) is built with.
//!
//! Config is used in two ways:
//! 1. **Validation**: `min`/`max` bound the state domain checked by `set_state`
//! 2. **Dispatch**: `max_pending` bounds re-entrant updates per dispatch cycle
//!
//! ## Sentinel values
//! - `max_pending = 0` → unlimited (a subscriber that always re-enters never terminates)
//! - `bus_capacity = 0` → clamped to 1

use std::ops::RangeInclusive;

/// Configuration for one subject.
///
/// ## Field semantics
/// - `min`/`max`: inclusive bounds of accepted values (default: whole `i64` range)
/// - `bus_capacity`: diagnostic bus ring buffer size (min 1)
/// - `max_pending`: re-entrant updates accepted per dispatch cycle (`0` = unlimited)
///
/// ## Notes
/// All fields are public. Prefer the helper accessors to avoid sprinkling
/// sentinel checks (`0`) across the codebase.
#[derive(Clone, Debug)]
pub struct SubjectConfig {
    /// Smallest accepted value (inclusive).
    pub min: i64,

    /// Largest accepted value (inclusive).
    pub max: i64,

    /// Capacity of the diagnostic bus created for the subject.
    ///
    /// Ignored when the builder is given an existing bus.
    pub bus_capacity: usize,

    /// Maximum number of re-entrant updates queued during one dispatch cycle.
    ///
    /// - `0` = unlimited
    /// - `n > 0` = the `n+1`-th queued update is dropped and reported as
    ///   `EventKind::PendingOverflow`
    pub max_pending: usize,
}

impl SubjectConfig {
    /// Returns the accepted value range.
    #[inline]
    pub fn bounds(&self) -> RangeInclusive<i64> {
        self.min..=self.max
    }

    /// Returns the pending limit as an `Option`.
    ///
    /// - `None` → unlimited
    /// - `Some(n)` → at most `n` queued updates per dispatch cycle
    #[inline]
    pub fn pending_limit(&self) -> Option<usize> {
        if self.max_pending == 0 {
            None
        } else {
            Some(self.max_pending)
        }
    }

    /// Returns a bus capacity clamped to a minimum of 1.
    #[inline]
    pub fn bus_capacity_clamped(&self) -> usize {
        self.bus_capacity.max(1)
    }
}

impl Default for SubjectConfig {
    /// Default configuration:
    ///
    /// - `min = i64::MIN`, `max = i64::MAX` (any integer)
    /// - `bus_capacity = 1024`
    /// - `max_pending = 64`
    fn default() -> Self {
        Self {
            min: i64::MIN,
            max: i64::MAX,
            bus_capacity: 1024,
            max_pending: 64,
        }
    }
}
