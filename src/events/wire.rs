//! # Wire formats: phase lines and the broadcast envelope.
//!
//! Two JSON shapes cross process boundaries:
//!
//! **Phase lines** — line-delimited records, one per transition, as an
//! out-of-process controller writes them:
//! ```text
//! {"state":"GREEN","current_lane":"lane1","vehicle_count":12,"green_time":30,"remaining_time":30,"timestamp":"..."}
//! {"state":"YELLOW","current_lane":"lane1","next_lane":"lane2","vehicle_count":12,"yellow_time":5,"timestamp":"..."}
//! ```
//!
//! **Push envelope** — what the broadcast layer sends each subscriber:
//! ```text
//! {"type":"signal_update","signal_id":"3","data":<phase line>}
//! ```
//!
//! [`decode_line`] tolerates malformed input by returning `None`; a bad line
//! in a feed is dropped, never fatal.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::event::{PhaseKind, SignalEvent};

/// One phase transition in the line-delimited wire shape.
///
/// The intersection id is **not** part of a phase line: line streams are
/// per-intersection, and the feed that ingests them attaches the id.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "state")]
pub enum PhaseLine {
    /// A lane received right-of-way.
    #[serde(rename = "GREEN")]
    Green {
        current_lane: String,
        vehicle_count: u32,
        green_time: u64,
        remaining_time: u64,
        timestamp: DateTime<Utc>,
    },
    /// Transition buffer between two lanes.
    #[serde(rename = "YELLOW")]
    Yellow {
        current_lane: String,
        next_lane: String,
        vehicle_count: u32,
        yellow_time: u64,
        timestamp: DateTime<Utc>,
    },
}

impl PhaseLine {
    /// Attaches an intersection id, producing the in-process event.
    pub fn into_event(self, intersection: Arc<str>) -> SignalEvent {
        match self {
            PhaseLine::Green {
                current_lane,
                vehicle_count,
                green_time,
                timestamp,
                ..
            } => SignalEvent {
                intersection,
                kind: PhaseKind::Green,
                current_lane: current_lane.into(),
                next_lane: None,
                vehicle_count,
                duration_secs: green_time,
                at: timestamp,
            },
            PhaseLine::Yellow {
                current_lane,
                next_lane,
                vehicle_count,
                yellow_time,
                timestamp,
            } => SignalEvent {
                intersection,
                kind: PhaseKind::Yellow,
                current_lane: current_lane.into(),
                next_lane: Some(next_lane.into()),
                vehicle_count,
                duration_secs: yellow_time,
                at: timestamp,
            },
        }
    }
}

impl From<&SignalEvent> for PhaseLine {
    fn from(ev: &SignalEvent) -> Self {
        match ev.kind {
            PhaseKind::Green => PhaseLine::Green {
                current_lane: ev.current_lane.to_string(),
                vehicle_count: ev.vehicle_count,
                green_time: ev.duration_secs,
                // A freshly emitted green has its full time remaining.
                remaining_time: ev.duration_secs,
                timestamp: ev.at,
            },
            PhaseKind::Yellow => PhaseLine::Yellow {
                current_lane: ev.current_lane.to_string(),
                next_lane: ev
                    .next_lane
                    .as_deref()
                    .unwrap_or_default()
                    .to_string(),
                vehicle_count: ev.vehicle_count,
                yellow_time: ev.duration_secs,
                timestamp: ev.at,
            },
        }
    }
}

/// Decodes one phase line; malformed or empty lines yield `None`.
pub fn decode_line(line: &str) -> Option<PhaseLine> {
    let line = line.trim();
    if line.is_empty() {
        return None;
    }
    serde_json::from_str(line).ok()
}

/// Encodes an event as one phase line (no trailing newline).
pub fn encode_line(ev: &SignalEvent) -> serde_json::Result<String> {
    serde_json::to_string(&PhaseLine::from(ev))
}

/// The per-subscriber push message: `{"type":"signal_update",...}`.
#[derive(Debug, Serialize)]
pub struct SignalUpdate<'a> {
    #[serde(rename = "type")]
    kind: &'static str,
    /// Intersection the update belongs to.
    pub signal_id: &'a str,
    /// The phase transition payload.
    pub data: PhaseLine,
}

impl<'a> SignalUpdate<'a> {
    /// Wraps an event in the push envelope.
    pub fn new(ev: &'a SignalEvent) -> Self {
        Self {
            kind: "signal_update",
            signal_id: &ev.intersection,
            data: PhaseLine::from(ev),
        }
    }
}
