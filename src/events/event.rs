//! # Phase-transition events emitted by intersection controllers.
//!
//! A [`SignalEvent`] is created once per phase transition and never mutated
//! after emission. GREEN events carry the lane that received right-of-way and
//! its computed green time; YELLOW events additionally carry the lane that is
//! about to receive it.
//!
//! ## Ordering guarantees
//! Events from one intersection are strictly ordered by phase sequence (the
//! controller publishes them inline, before sleeping). No ordering is
//! guaranteed between events from different intersections.

use std::sync::Arc;

use chrono::{DateTime, Utc};

/// Classification of a phase transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PhaseKind {
    /// A lane received right-of-way.
    Green,
    /// Transition buffer between two lanes.
    Yellow,
}

/// One phase transition at one intersection.
///
/// Immutable once created; cheap to clone (shared strings).
#[derive(Clone, Debug)]
pub struct SignalEvent {
    /// Intersection (signal serial) this event belongs to.
    pub intersection: Arc<str>,
    /// GREEN or YELLOW.
    pub kind: PhaseKind,
    /// Lane holding right-of-way when the event was emitted.
    pub current_lane: Arc<str>,
    /// Lane receiving right-of-way next (YELLOW events only).
    pub next_lane: Option<Arc<str>>,
    /// Vehicle count the current green time was computed from.
    pub vehicle_count: u32,
    /// Phase duration in seconds (green time or yellow buffer).
    pub duration_secs: u64,
    /// Wall-clock emission time.
    pub at: DateTime<Utc>,
}

impl SignalEvent {
    /// Creates a GREEN event: `lane` holds right-of-way for `green_secs`.
    pub fn green(
        intersection: Arc<str>,
        lane: Arc<str>,
        vehicle_count: u32,
        green_secs: u64,
    ) -> Self {
        Self {
            intersection,
            kind: PhaseKind::Green,
            current_lane: lane,
            next_lane: None,
            vehicle_count,
            duration_secs: green_secs,
            at: Utc::now(),
        }
    }

    /// Creates a YELLOW event: transition from `lane` to `next` lasting `yellow_secs`.
    ///
    /// `vehicle_count` is the count of the lane that just finished its green.
    pub fn yellow(
        intersection: Arc<str>,
        lane: Arc<str>,
        next: Arc<str>,
        vehicle_count: u32,
        yellow_secs: u64,
    ) -> Self {
        Self {
            intersection,
            kind: PhaseKind::Yellow,
            current_lane: lane,
            next_lane: Some(next),
            vehicle_count,
            duration_secs: yellow_secs,
            at: Utc::now(),
        }
    }

    #[inline]
    pub fn is_green(&self) -> bool {
        matches!(self.kind, PhaseKind::Green)
    }

    #[inline]
    pub fn is_yellow(&self) -> bool {
        matches!(self.kind, PhaseKind::Yellow)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_green_has_no_next_lane() {
        let ev = SignalEvent::green("3".into(), "lane1".into(), 12, 30);
        assert!(ev.is_green());
        assert!(ev.next_lane.is_none());
        assert_eq!(ev.duration_secs, 30);
    }

    #[test]
    fn test_yellow_carries_both_lanes() {
        let ev = SignalEvent::yellow("3".into(), "lane1".into(), "lane2".into(), 12, 5);
        assert!(ev.is_yellow());
        assert_eq!(ev.next_lane.as_deref(), Some("lane2"));
        assert_eq!(ev.vehicle_count, 12);
    }
}
