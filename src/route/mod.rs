//! Batch aggregation: lane demand → clearance time → fastest route.
//!
//! ```text
//! route table CSV ──► Route[]                lane demand CSVs ──► LaneDemand
//!        │                                          │
//!        └────────► evaluate_routes(routes, demands, CycleRules) ◄─┘
//!                              │
//!                              ▼
//!              RouteReport { results, summary, fastest }
//!                    │                │
//!            lane1_summary.csv   result document (JSON)
//! ```
//!
//! Everything here is one-shot and synchronous; batch runs share no state
//! with live controllers.

mod aggregate;
mod cycle;
mod demand;
mod report;
mod table;

pub use aggregate::{evaluate_routes, FastestPick, RouteReport, RouteResult, SummaryRow};
pub use cycle::CycleRules;
pub use demand::{LaneDemand, LaneMeasure, PRIMARY_LANE};
pub use report::{result_document, write_document, write_summary};
pub use table::{load_routes, load_routes_path, parse_distance_time, Route};
