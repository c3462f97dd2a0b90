//! # signalvisor
//!
//! **Signalvisor** drives adaptive traffic-signal control at one or more
//! intersections and aggregates per-intersection delay into route-level
//! travel-time estimates.
//!
//! Vehicle detection is an injected capability ([`VehicleCounter`]) — the
//! control and aggregation core carries no dependency on any detection
//! technology.
//!
//! ## Architecture
//! ### Live path
//! ```text
//!     ┌───────────────┐   ┌───────────────┐   ┌───────────────┐
//!     │ Intersection  │   │ Intersection  │   │  EventFeed    │
//!     │ Controller #1 │   │ Controller #2 │   │ (external IO) │
//!     └──────┬────────┘   └──────┬────────┘   └──────┬────────┘
//!            │ GREEN/YELLOW      │                   │
//!            ▼                   ▼                   ▼
//! ┌───────────────────────────────────────────────────────────────────┐
//! │                      Bus (broadcast channel)                      │
//! └─────────────────────────────────┬─────────────────────────────────┘
//!                                   ▼
//!                       ┌────────────────────────┐
//!                       │  Supervisor listener   │
//!                       └───┬────────────────┬───┘
//!                           ▼                ▼
//!                     SubscriberSet     (per-sub queues)
//!                    ┌─────────┼─────────┐
//!                    ▼         ▼         ▼
//!                JsonWriter  LogWriter  <your Subscribe impl>
//! ```
//!
//! Each controller cycles its lanes through GREEN/YELLOW phases, sizing every
//! green from the lane's vehicle count ([`SignalTiming`]) and pre-scanning
//! the *next* lane during the current green so detection latency never
//! extends a phase. Controllers are cancellable tasks; the [`Supervisor`]
//! spawns them, handles OS termination signals, and shuts down within a
//! configurable grace period.
//!
//! ### Batch path
//! ```text
//! route table CSV ─► Route[] ──┐
//! lane demand CSVs ─► LaneDemand per crossing ──┤
//!                                               ▼
//!                          evaluate_routes(…, CycleRules)
//!                                               │
//!                                               ▼
//!                      RouteReport ─► summary CSV + result document
//! ```
//!
//! [`CycleRules::clearance_time`] converts a primary-lane green budget that
//! exceeds the single-phase cap into capped phases interleaved with every
//! other lane's turn; [`evaluate_routes`] sums those delays plus travel time
//! and picks the fastest route (ties to the first listed, with explicit
//! best-effort and no-data fallbacks).
//!
//! ## Example
//! ```rust
//! use std::sync::Arc;
//! use signalvisor::{
//!     Config, CounterFn, CounterRef, Intersection, Lane, Supervisor,
//! };
//!
//! #[tokio::main(flavor = "current_thread")]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let supervisor = Supervisor::new(Config::default());
//!
//!     // A fixed counter stands in for the real detector here.
//!     let counter: CounterRef = CounterFn::arc(|_source: String| async move {
//!         Ok::<_, signalvisor::DetectError>(4)
//!     });
//!
//!     let crossing = Intersection::new(
//!         "1",
//!         "MG Road",
//!         vec![Lane::new("lane1", "cam/1"), Lane::new("lane2", "cam/2")],
//!     )?;
//!     let controller = supervisor.controller(crossing, counter);
//!
//!     // supervisor.run(vec![controller]).await?;  // runs until SIGINT/SIGTERM
//!     # let _ = controller;
//!     Ok(())
//! }
//! ```
//!
//! ## Optional features
//! - `logging`: exports a simple built-in [`LogWriter`] _(demo/reference only)_.

mod config;
mod control;
mod detect;
mod error;
mod events;
mod route;
mod subscribers;
mod timing;

// ---- Public re-exports ----

pub use config::Config;
pub use control::{
    load_roster, load_roster_path, EventFeed, Intersection, IntersectionController, Lane, Phase,
    SignalSite, Supervisor,
};
pub use detect::{CounterFn, CounterRef, VehicleCounter};
pub use error::{ControlError, DeliveryError, DetectError, RuntimeError, TableError};
pub use events::{decode_line, encode_line, Bus, PhaseKind, PhaseLine, SignalEvent, SignalUpdate};
pub use route::{
    evaluate_routes, load_routes, load_routes_path, parse_distance_time, result_document,
    write_document, write_summary, CycleRules, FastestPick, LaneDemand, LaneMeasure, Route,
    RouteReport, RouteResult, SummaryRow, PRIMARY_LANE,
};
pub use subscribers::{JsonWriter, Subscribe, SubscriberId, SubscriberSet};
pub use timing::SignalTiming;

// Optional: expose a simple built-in logging subscriber (demo/reference).
// Enable with: `--features logging`
#[cfg(feature = "logging")]
pub use subscribers::LogWriter;
