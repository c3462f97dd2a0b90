//! # Global runtime configuration.
//!
//! [`Config`] centralizes the knobs for the live control runtime:
//! shutdown grace, event-bus capacity, and the signal timing constants
//! shared by every controller the supervisor spawns.
//!
//! Batch aggregation has its own knob set ([`CycleRules`](crate::CycleRules));
//! the two sides default to the same constants but can diverge.

use std::time::Duration;

use crate::timing::SignalTiming;

/// Global configuration for the control runtime.
///
/// ## Field semantics
/// - `grace`: maximum wait for controllers to stop after a shutdown signal
///   (`0s` = no wait, report stuck immediately)
/// - `bus_capacity`: event bus ring buffer size (min 1; clamped by the bus)
/// - `timing`: green/yellow timing constants handed to every controller
#[derive(Clone, Debug)]
pub struct Config {
    /// Maximum time to wait for controllers to exit after cancellation.
    ///
    /// Exceeding it yields [`RuntimeError::GraceExceeded`](crate::RuntimeError)
    /// with the list of intersections that did not stop in time.
    pub grace: Duration,

    /// Capacity of the event bus broadcast ring buffer.
    ///
    /// Receivers that lag behind by more than this many events skip the
    /// oldest ones. Minimum value is 1 (enforced by the bus).
    pub bus_capacity: usize,

    /// Signal timing constants applied to every spawned controller.
    pub timing: SignalTiming,
}

impl Config {
    /// Bus capacity clamped to the minimum of 1.
    #[inline]
    pub fn bus_capacity_clamped(&self) -> usize {
        self.bus_capacity.max(1)
    }
}

impl Default for Config {
    /// Defaults: 30 s grace, 1024-event bus, default [`SignalTiming`].
    fn default() -> Self {
        Self {
            grace: Duration::from_secs(30),
            bus_capacity: 1024,
            timing: SignalTiming::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let cfg = Config::default();
        assert_eq!(cfg.grace, Duration::from_secs(30));
        assert_eq!(cfg.bus_capacity, 1024);
        assert_eq!(cfg.timing.max_green, 60);
    }

    #[test]
    fn test_bus_capacity_clamped() {
        let cfg = Config {
            bus_capacity: 0,
            ..Config::default()
        };
        assert_eq!(cfg.bus_capacity_clamped(), 1);
    }
}
