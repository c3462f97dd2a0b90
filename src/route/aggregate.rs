//! # Route aggregation: per-intersection delay plus travel time.
//!
//! For each candidate route, the aggregator walks its signals in order, runs
//! the clearance accounting on that intersection's demand snapshot, and sums
//! delays plus the base travel time. A signal with no snapshot is skipped
//! with a warning — one missing intersection never sinks the batch.
//!
//! ## Fastest selection (three tiers)
//! 1. Routes with at least one evaluated intersection or a nonzero total:
//!    strict minimum total, ties to the first-listed route.
//! 2. None qualify but results exist: the minimum over everything, marked
//!    best-effort.
//! 3. No routes at all: an explicit no-data outcome, not an error.

use std::collections::HashMap;

use crate::route::cycle::CycleRules;
use crate::route::demand::LaneDemand;
use crate::route::table::Route;

/// One evaluated route, read-only once computed.
#[derive(Clone, Debug, PartialEq)]
pub struct RouteResult {
    /// Route label.
    pub name: String,
    /// Signal serials in travel order (as listed, evaluated or not).
    pub signals: Vec<String>,
    /// Clearance seconds per *evaluated* intersection, in travel order.
    pub signal_delays: Vec<u64>,
    /// Base travel time in seconds.
    pub travel_secs: f64,
    /// Travel time plus all delays.
    pub total_seconds: f64,
}

/// One row of the audit summary (route × crossing × primary-lane seconds).
#[derive(Clone, Debug, PartialEq)]
pub struct SummaryRow {
    pub route: String,
    pub crossing: String,
    pub lane1_secs: u64,
}

/// The selected fastest route, by fallback tier.
#[derive(Clone, Debug, PartialEq)]
pub enum FastestPick {
    /// A route qualified under the validity filter.
    Fastest(RouteResult),
    /// Nothing qualified; this is the best of what exists.
    BestEffort(RouteResult),
    /// The route list was empty.
    NoData,
}

impl FastestPick {
    /// The picked result, if any tier produced one.
    pub fn result(&self) -> Option<&RouteResult> {
        match self {
            FastestPick::Fastest(r) | FastestPick::BestEffort(r) => Some(r),
            FastestPick::NoData => None,
        }
    }
}

/// Everything one batch run produces.
#[derive(Clone, Debug)]
pub struct RouteReport {
    /// Per-route results, in input order.
    pub results: Vec<RouteResult>,
    /// Audit rows, one per evaluated intersection.
    pub summary: Vec<SummaryRow>,
    /// The fastest-route selection.
    pub fastest: FastestPick,
}

/// Evaluates every route against the demand snapshots and picks the fastest.
///
/// `demands` is keyed by signal serial (e.g. `"3"`). Missing snapshots are
/// skipped per intersection with a diagnostic.
pub fn evaluate_routes(
    routes: &[Route],
    demands: &HashMap<String, LaneDemand>,
    rules: &CycleRules,
) -> RouteReport {
    let mut results = Vec::with_capacity(routes.len());
    let mut summary = Vec::new();

    for route in routes {
        let mut signal_delays = Vec::new();
        for serial in &route.signals {
            let Some(demand) = demands.get(serial) else {
                log::warn!(
                    "route {}: no demand snapshot for Crossing_{serial}, skipping",
                    route.name
                );
                continue;
            };
            let secs = rules.clearance_time(demand);
            signal_delays.push(secs);
            summary.push(SummaryRow {
                route: route.name.clone(),
                crossing: format!("Crossing_{serial}"),
                lane1_secs: secs,
            });
        }

        let delay_total: u64 = signal_delays.iter().sum();
        results.push(RouteResult {
            name: route.name.clone(),
            signals: route.signals.clone(),
            signal_delays,
            travel_secs: route.travel_secs,
            total_seconds: route.travel_secs + delay_total as f64,
        });
    }

    let fastest = pick_fastest(&results);
    RouteReport {
        results,
        summary,
        fastest,
    }
}

/// A route qualifies when something was actually measured on it.
fn qualifies(result: &RouteResult) -> bool {
    !result.signal_delays.is_empty() || result.total_seconds > 0.0
}

/// Strict minimum by total; earlier entries win ties.
fn min_by_total<'a, I>(results: I) -> Option<&'a RouteResult>
where
    I: Iterator<Item = &'a RouteResult>,
{
    results.fold(None, |best, candidate| match best {
        Some(current) if candidate.total_seconds < current.total_seconds => Some(candidate),
        Some(current) => Some(current),
        None => Some(candidate),
    })
}

fn pick_fastest(results: &[RouteResult]) -> FastestPick {
    if let Some(winner) = min_by_total(results.iter().filter(|r| qualifies(r))) {
        return FastestPick::Fastest(winner.clone());
    }
    match min_by_total(results.iter()) {
        Some(fallback) => FastestPick::BestEffort(fallback.clone()),
        None => FastestPick::NoData,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn route(name: &str, signals: &[&str], travel_secs: f64) -> Route {
        Route {
            name: name.into(),
            signals: signals.iter().map(|s| s.to_string()).collect(),
            travel_secs,
        }
    }

    fn demand(primary: u64, others: &[(&str, u64)]) -> LaneDemand {
        let mut d = LaneDemand::new();
        d.set("lane1", 0, primary);
        for (lane, secs) in others {
            d.set(lane, 0, *secs);
        }
        d
    }

    #[test]
    fn test_fastest_is_strict_minimum() {
        let routes = vec![route("Route A", &["1"], 260.0), route("Route B", &["2"], 210.0)];
        let mut demands = HashMap::new();
        demands.insert("1".to_string(), demand(40, &[]));
        demands.insert("2".to_string(), demand(40, &[]));

        let report = evaluate_routes(&routes, &demands, &CycleRules::default());
        assert_eq!(report.results[0].total_seconds, 300.0);
        assert_eq!(report.results[1].total_seconds, 250.0);
        match &report.fastest {
            FastestPick::Fastest(r) => assert_eq!(r.name, "Route B"),
            other => panic!("expected fastest pick, got {other:?}"),
        }
    }

    #[test]
    fn test_ties_resolve_to_first_listed() {
        let routes = vec![route("First", &["1"], 100.0), route("Second", &["1"], 100.0)];
        let mut demands = HashMap::new();
        demands.insert("1".to_string(), demand(30, &[]));

        let report = evaluate_routes(&routes, &demands, &CycleRules::default());
        match &report.fastest {
            FastestPick::Fastest(r) => assert_eq!(r.name, "First"),
            other => panic!("expected fastest pick, got {other:?}"),
        }
    }

    #[test]
    fn test_missing_snapshot_skipped_not_fatal() {
        let routes = vec![route("Route A", &["1", "9", "2"], 60.0)];
        let mut demands = HashMap::new();
        demands.insert("1".to_string(), demand(40, &[]));
        demands.insert("2".to_string(), demand(20, &[]));

        let report = evaluate_routes(&routes, &demands, &CycleRules::default());
        let result = &report.results[0];
        // Signal 9 contributed nothing, the other two did.
        assert_eq!(result.signal_delays, vec![40, 20]);
        assert_eq!(result.total_seconds, 120.0);
        assert_eq!(report.summary.len(), 2);
        assert_eq!(report.summary[0].crossing, "Crossing_1");
        assert_eq!(report.summary[1].crossing, "Crossing_2");
    }

    #[test]
    fn test_best_effort_tier_when_nothing_qualifies() {
        // No snapshots and zero travel time on every route: tier 2 applies.
        let routes = vec![route("Dead A", &["7"], 0.0), route("Dead B", &[], 0.0)];
        let demands = HashMap::new();

        let report = evaluate_routes(&routes, &demands, &CycleRules::default());
        match &report.fastest {
            FastestPick::BestEffort(r) => assert_eq!(r.name, "Dead A"),
            other => panic!("expected best-effort pick, got {other:?}"),
        }
    }

    #[test]
    fn test_empty_route_list_is_no_data() {
        let report = evaluate_routes(&[], &HashMap::new(), &CycleRules::default());
        assert_eq!(report.fastest, FastestPick::NoData);
        assert!(report.results.is_empty());
        assert!(report.summary.is_empty());
    }

    #[test]
    fn test_clearance_feeds_route_totals() {
        // Overflow case from the accounting rules: 70 primary with one
        // 20-second other lane costs 100 seconds at that crossing.
        let routes = vec![route("Route A", &["5"], 300.0)];
        let mut demands = HashMap::new();
        demands.insert("5".to_string(), demand(70, &[("lane2", 20)]));

        let report = evaluate_routes(&routes, &demands, &CycleRules::default());
        assert_eq!(report.results[0].signal_delays, vec![100]);
        assert_eq!(report.results[0].total_seconds, 400.0);
    }
}
