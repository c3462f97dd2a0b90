//! # Green-time calculation from vehicle counts.
//!
//! [`SignalTiming`] bundles the timing constants for one deployment and turns a
//! detected vehicle count into a green-phase duration:
//!
//! ```text
//! 0 vehicles        → min_green
//! n vehicles        → clamp(round(n × seconds_per_vehicle), min_green, max_green)
//! ```
//!
//! The calculation is pure and deterministic; there are no error conditions.
//! Counts arrive as `u32`, so negative inputs are unrepresentable.
//!
//! ## Example
//! ```rust
//! use signalvisor::SignalTiming;
//!
//! let timing = SignalTiming::default();
//! assert_eq!(timing.green_time(0), 5);   // empty lane gets the floor
//! assert_eq!(timing.green_time(10), 25); // 10 × 2.5s
//! assert_eq!(timing.green_time(99), 60); // capped
//! ```

use std::time::Duration;

/// Timing constants for one intersection deployment.
///
/// Shared by every controller at an intersection; cheap to copy.
///
/// ## Field semantics
/// - `seconds_per_vehicle`: green seconds granted per detected vehicle
/// - `min_green`: floor for every green phase, in seconds
/// - `max_green`: cap for every green phase, in seconds
/// - `yellow_buffer`: fixed yellow duration between green phases, in seconds
#[derive(Clone, Copy, Debug)]
pub struct SignalTiming {
    /// Green seconds granted per detected vehicle.
    pub seconds_per_vehicle: f64,
    /// Minimum green duration in seconds (fairness floor).
    pub min_green: u64,
    /// Maximum green duration in seconds.
    pub max_green: u64,
    /// Fixed yellow duration between phases, in seconds.
    pub yellow_buffer: u64,
}

impl Default for SignalTiming {
    /// Defaults: 2.5 s/vehicle, green within [5, 60] s, 5 s yellow.
    fn default() -> Self {
        Self {
            seconds_per_vehicle: 2.5,
            min_green: 5,
            max_green: 60,
            yellow_buffer: 5,
        }
    }
}

impl SignalTiming {
    /// Computes the green duration in seconds for a detected vehicle count.
    ///
    /// Zero vehicles gets `min_green`; anything else is
    /// `round(count × seconds_per_vehicle)` clamped to `[min_green, max_green]`.
    pub fn green_time(&self, vehicle_count: u32) -> u64 {
        if vehicle_count == 0 {
            return self.min_green;
        }
        let raw = (f64::from(vehicle_count) * self.seconds_per_vehicle).round() as u64;
        raw.clamp(self.min_green, self.max_green)
    }

    /// [`green_time`](Self::green_time) as a [`Duration`] for phase timers.
    pub fn green_duration(&self, vehicle_count: u32) -> Duration {
        Duration::from_secs(self.green_time(vehicle_count))
    }

    /// The fixed yellow buffer as a [`Duration`].
    pub fn yellow_duration(&self) -> Duration {
        Duration::from_secs(self.yellow_buffer)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zero_vehicles_gets_floor() {
        let timing = SignalTiming::default();
        assert_eq!(timing.green_time(0), 5);
    }

    #[test]
    fn test_small_count_clamped_to_floor() {
        let timing = SignalTiming::default();
        // 1 × 2.5 rounds to 3, below the 5s floor.
        assert_eq!(timing.green_time(1), 5);
    }

    #[test]
    fn test_proportional_region() {
        let timing = SignalTiming::default();
        assert_eq!(timing.green_time(4), 10);
        assert_eq!(timing.green_time(10), 25);
        assert_eq!(timing.green_time(24), 60);
    }

    #[test]
    fn test_large_count_capped() {
        let timing = SignalTiming::default();
        assert_eq!(timing.green_time(25), 60);
        assert_eq!(timing.green_time(1_000), 60);
    }

    #[test]
    fn test_monotonic_and_bounded() {
        let timing = SignalTiming::default();
        let mut prev = 0;
        for count in 0..200 {
            let secs = timing.green_time(count);
            assert!(secs >= timing.min_green, "count {count} below floor");
            assert!(secs <= timing.max_green, "count {count} above cap");
            assert!(secs >= prev, "green_time not monotonic at count {count}");
            prev = secs;
        }
    }

    #[test]
    fn test_durations_match_seconds() {
        let timing = SignalTiming::default();
        assert_eq!(timing.green_duration(10), Duration::from_secs(25));
        assert_eq!(timing.yellow_duration(), Duration::from_secs(5));
    }
}
