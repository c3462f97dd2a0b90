//! # Batch outputs: audit summary CSV and the result document.
//!
//! Two artifacts per batch run:
//! - `lane1_summary.csv` — one row per evaluated intersection
//!   (`route`, `Crossing`, `Lane1 Total Time (s)`), for auditing.
//! - the result document — JSON the consuming frontend reads:
//!   `{"routes":[...], "fastest":{...}}`, with the fastest entry carrying
//!   integer minute/second views of the total and, on the best-effort tier,
//!   a `note` explaining the degraded pick.

use std::io::Write;

use serde_json::{json, Value};

use crate::error::TableError;
use crate::route::aggregate::{FastestPick, RouteReport, RouteResult, SummaryRow};

/// Writes the audit summary CSV to any `Write` sink.
pub fn write_summary<W: Write>(writer: W, rows: &[SummaryRow]) -> Result<(), TableError> {
    let mut csv_writer = csv::Writer::from_writer(writer);
    csv_writer
        .write_record(["route", "Crossing", "Lane1 Total Time (s)"])
        .map_err(|e| TableError::Parse(e.to_string()))?;
    for row in rows {
        csv_writer
            .write_record([
                row.route.as_str(),
                row.crossing.as_str(),
                &row.lane1_secs.to_string(),
            ])
            .map_err(|e| TableError::Parse(e.to_string()))?;
    }
    csv_writer.flush()?;
    Ok(())
}

/// Renders the full result document.
pub fn result_document(report: &RouteReport) -> Value {
    json!({
        "routes": report.results.iter().map(route_value).collect::<Vec<_>>(),
        "fastest": fastest_value(&report.fastest),
    })
}

/// Writes the result document as JSON to any `Write` sink.
pub fn write_document<W: Write>(writer: W, report: &RouteReport) -> Result<(), TableError> {
    serde_json::to_writer(writer, &result_document(report))
        .map_err(|e| TableError::Parse(e.to_string()))
}

fn route_value(result: &RouteResult) -> Value {
    json!({
        "route": result.name,
        "signals": result.signals,
        "signal_delays": result.signal_delays,
        "mapbox_time": result.travel_secs,
        "total_seconds": result.total_seconds,
    })
}

fn fastest_value(pick: &FastestPick) -> Value {
    match pick {
        FastestPick::Fastest(result) => picked_value(result, None),
        FastestPick::BestEffort(result) => picked_value(
            result,
            Some("No valid results with crossings; returning best available."),
        ),
        FastestPick::NoData => json!({
            "fastest_route": null,
            "message": "No routes found",
        }),
    }
}

fn picked_value(result: &RouteResult, note: Option<&str>) -> Value {
    let mut value = json!({
        "fastest_route": result.name,
        "signals": result.signals,
        "signal_delays": result.signal_delays,
        "mapbox_time": result.travel_secs,
        "total_seconds": result.total_seconds,
        "total_minutes": (result.total_seconds / 60.0) as u64,
        "total_seconds_only": result.total_seconds as u64,
    });
    if let Some(note) = note {
        value["note"] = Value::String(note.to_string());
    }
    value
}
