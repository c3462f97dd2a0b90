//! # Lane-demand snapshots.
//!
//! A [`LaneDemand`] is one intersection's batch measurement: per lane, the
//! vehicle count an external pass observed and the green seconds it computed.
//! Snapshots arrive as CSV:
//!
//! ```csv
//! Lane,Vehicle Count,Signal Time (s)
//! lane1.jpg,28,70
//! lane2.jpg,8,20
//! ```
//!
//! Lane names are normalized — lower-cased, image extensions stripped — so
//! `Lane1.JPG` and `lane1` address the same lane. Unparseable numbers degrade
//! to `0` per row rather than failing the snapshot.

use std::collections::BTreeMap;
use std::io::Read;
use std::path::Path;

use serde::Deserialize;

use crate::error::TableError;

/// The distinguished lane whose accumulated green time drives clearance.
pub const PRIMARY_LANE: &str = "lane1";

/// One lane's measured state in a snapshot.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct LaneMeasure {
    /// Vehicles observed by the measurement pass.
    pub vehicle_count: u32,
    /// Green seconds the pass computed for that count.
    pub green_secs: u64,
}

/// Per-lane demand snapshot for one intersection.
///
/// Lanes are stored sorted by name, which fixes the deterministic order the
/// clearance accounting serves them in.
#[derive(Clone, Debug, Default)]
pub struct LaneDemand {
    lanes: BTreeMap<String, LaneMeasure>,
}

impl LaneDemand {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets one lane's measurement (name is normalized).
    pub fn set(&mut self, lane: &str, vehicle_count: u32, green_secs: u64) {
        self.lanes.insert(
            normalize_lane(lane),
            LaneMeasure {
                vehicle_count,
                green_secs,
            },
        );
    }

    /// Measurement for a lane, if present.
    pub fn get(&self, lane: &str) -> Option<LaneMeasure> {
        self.lanes.get(&normalize_lane(lane)).copied()
    }

    /// Green seconds demanded by the primary lane (`0` if absent).
    pub fn primary(&self) -> u64 {
        self.lanes
            .get(PRIMARY_LANE)
            .map(|m| m.green_secs)
            .unwrap_or(0)
    }

    /// Every non-primary lane with its green seconds, ascending by name.
    pub fn others(&self) -> impl Iterator<Item = (&str, u64)> {
        self.lanes
            .iter()
            .filter(|(name, _)| name.as_str() != PRIMARY_LANE)
            .map(|(name, m)| (name.as_str(), m.green_secs))
    }

    pub fn len(&self) -> usize {
        self.lanes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lanes.is_empty()
    }

    /// Loads a snapshot from any `Read` source (tests pass an `io::Cursor`).
    pub fn from_reader<R: Read>(reader: R) -> Result<Self, TableError> {
        let mut csv_reader = csv::Reader::from_reader(reader);
        let mut demand = LaneDemand::new();
        for row in csv_reader.deserialize::<DemandRecord>() {
            let row = row.map_err(|e| TableError::Parse(e.to_string()))?;
            demand.set(
                &row.lane,
                parse_count(&row.vehicle_count),
                parse_secs(&row.signal_time),
            );
        }
        Ok(demand)
    }

    /// Loads a snapshot from a file path.
    pub fn from_path(path: &Path) -> Result<Self, TableError> {
        let file = std::fs::File::open(path)?;
        Self::from_reader(file)
    }
}

#[derive(Deserialize)]
struct DemandRecord {
    #[serde(rename = "Lane")]
    lane: String,
    #[serde(rename = "Vehicle Count")]
    vehicle_count: String,
    #[serde(rename = "Signal Time (s)")]
    signal_time: String,
}

/// Lower-cases and strips a trailing image extension.
fn normalize_lane(raw: &str) -> String {
    let lowered = raw.trim().to_ascii_lowercase();
    for ext in [".jpg", ".jpeg", ".png", ".bmp", ".webp"] {
        if let Some(stripped) = lowered.strip_suffix(ext) {
            return stripped.to_string();
        }
    }
    lowered
}

/// Seconds cell → whole seconds; garbage degrades to 0.
fn parse_secs(raw: &str) -> u64 {
    raw.trim()
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite() && *v > 0.0)
        .map(|v| v as u64)
        .unwrap_or(0)
}

/// Count cell → count; garbage degrades to 0.
fn parse_count(raw: &str) -> u32 {
    raw.trim().parse::<u32>().unwrap_or(0)
}
