//! # Intersection topology: lanes and phases.
//!
//! A [`Lane`] pairs an ordinal name (`lane1..laneN`) with the opaque source
//! reference its [`VehicleCounter`](crate::VehicleCounter) queries. An
//! [`Intersection`] is an ordered, immutable list of at least two lanes; a
//! controller refuses to start on fewer, since a single lane has nothing to
//! cycle to.
//!
//! [`Phase`] is the controller's current state: exactly one phase is active
//! per intersection at any instant.

use std::sync::Arc;
use std::time::Duration;

use crate::error::ControlError;

/// One traffic approach at an intersection.
#[derive(Clone, Debug)]
pub struct Lane {
    /// Ordinal lane name (`lane1`, `lane2`, …).
    pub name: Arc<str>,
    /// Opaque detector source handed to the vehicle counter.
    pub source: Arc<str>,
}

impl Lane {
    pub fn new(name: impl Into<Arc<str>>, source: impl Into<Arc<str>>) -> Self {
        Self {
            name: name.into(),
            source: source.into(),
        }
    }
}

/// An ordered set of lanes cycling through signal phases together.
///
/// Lane order is fixed at construction; phase index arithmetic is always
/// modulo the lane count.
#[derive(Clone, Debug)]
pub struct Intersection {
    id: Arc<str>,
    name: Arc<str>,
    lanes: Vec<Lane>,
}

impl Intersection {
    /// Builds an intersection, refusing fewer than two lanes.
    pub fn new(
        id: impl Into<Arc<str>>,
        name: impl Into<Arc<str>>,
        lanes: Vec<Lane>,
    ) -> Result<Self, ControlError> {
        let id = id.into();
        if lanes.len() < 2 {
            return Err(ControlError::TooFewLanes {
                intersection: id.to_string(),
                lanes: lanes.len(),
            });
        }
        Ok(Self {
            id,
            name: name.into(),
            lanes,
        })
    }

    /// Signal serial identifier (e.g. `"3"`).
    pub fn id(&self) -> &Arc<str> {
        &self.id
    }

    /// Display name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The ordered lanes.
    pub fn lanes(&self) -> &[Lane] {
        &self.lanes
    }

    /// Lane at a phase index (callers keep indices in range).
    pub fn lane(&self, index: usize) -> &Lane {
        &self.lanes[index]
    }
}

/// The active phase of one intersection.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Phase {
    /// One lane holds right-of-way.
    Green {
        /// Index of the lane with right-of-way.
        lane: usize,
        /// Full green duration.
        duration: Duration,
        /// Time left when the phase was entered (equals `duration` at entry).
        remaining: Duration,
    },
    /// Transition buffer between two lanes.
    Yellow {
        /// Lane giving up right-of-way.
        from: usize,
        /// Lane about to receive it.
        to: usize,
        /// Fixed yellow duration.
        duration: Duration,
    },
}

impl Phase {
    /// A freshly entered green phase (remaining = duration).
    pub fn green(lane: usize, duration: Duration) -> Self {
        Phase::Green {
            lane,
            duration,
            remaining: duration,
        }
    }

    /// A freshly entered yellow phase.
    pub fn yellow(from: usize, to: usize, duration: Duration) -> Self {
        Phase::Yellow { from, to, duration }
    }

    /// How long this phase holds before the next transition.
    pub fn duration(&self) -> Duration {
        match *self {
            Phase::Green { duration, .. } | Phase::Yellow { duration, .. } => duration,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lanes(n: usize) -> Vec<Lane> {
        (1..=n)
            .map(|i| Lane::new(format!("lane{i}"), format!("cam/{i}")))
            .collect()
    }

    #[test]
    fn test_two_lanes_accepted() {
        let ix = Intersection::new("3", "MG Road", lanes(2)).unwrap();
        assert_eq!(ix.lanes().len(), 2);
        assert_eq!(ix.lane(1).name.as_ref(), "lane2");
    }

    #[test]
    fn test_single_lane_refused() {
        let err = Intersection::new("3", "MG Road", lanes(1)).unwrap_err();
        assert!(matches!(err, ControlError::TooFewLanes { lanes: 1, .. }));
    }

    #[test]
    fn test_phase_durations() {
        let g = Phase::green(0, Duration::from_secs(30));
        assert_eq!(g.duration(), Duration::from_secs(30));
        let y = Phase::yellow(0, 1, Duration::from_secs(5));
        assert_eq!(y.duration(), Duration::from_secs(5));
    }
}
