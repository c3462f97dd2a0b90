//! # Route-table loading.
//!
//! Candidate routes arrive as CSV:
//!
//! ```csv
//! route,signal_serial_numbers,distance_time
//! Route A,1;3;5,"4.2 km / 12 min"
//! Route B,2;4,"3.1 km / 8 min"
//! ```
//!
//! `signal_serial_numbers` is a `;`-separated list of signal serials in
//! travel order. `distance_time` is free text; the first `"<number> min"`
//! token becomes the base travel time (`minutes × 60`), anything else reads
//! as `0`.

use std::io::Read;
use std::path::Path;
use std::sync::OnceLock;

use regex::Regex;
use serde::Deserialize;

use crate::error::TableError;

/// One candidate route: ordered signals plus a base travel time.
#[derive(Clone, Debug, PartialEq)]
pub struct Route {
    /// Route label from the table.
    pub name: String,
    /// Signal serials in travel order.
    pub signals: Vec<String>,
    /// Base travel time in seconds (from the routing provider).
    pub travel_secs: f64,
}

#[derive(Deserialize)]
struct RouteRecord {
    route: String,
    signal_serial_numbers: String,
    distance_time: String,
}

/// Extracts seconds from a free-text `"<number> min"` fragment.
///
/// `"1.2 km / 8 min"` → `480.0`; no `min` token (or an unparseable number)
/// → `0.0`.
pub fn parse_distance_time(text: &str) -> f64 {
    static MINUTES: OnceLock<Regex> = OnceLock::new();
    let re = MINUTES.get_or_init(|| {
        Regex::new(r"([\d\.]+)\s*min").expect("minutes pattern is a valid literal")
    });
    re.captures(text)
        .and_then(|caps| caps.get(1))
        .and_then(|m| m.as_str().parse::<f64>().ok())
        .map(|minutes| minutes * 60.0)
        .unwrap_or(0.0)
}

/// Loads the route table from any `Read` source.
pub fn load_routes<R: Read>(reader: R) -> Result<Vec<Route>, TableError> {
    let mut csv_reader = csv::Reader::from_reader(reader);
    let mut routes = Vec::new();
    for row in csv_reader.deserialize::<RouteRecord>() {
        let row = row.map_err(|e| TableError::Parse(e.to_string()))?;
        routes.push(Route {
            name: trim_cell(&row.route),
            signals: row
                .signal_serial_numbers
                .split(';')
                .map(|s| trim_cell(s))
                .filter(|s| !s.is_empty())
                .collect(),
            travel_secs: parse_distance_time(&row.distance_time),
        });
    }
    Ok(routes)
}

/// Loads the route table from a file path.
pub fn load_routes_path(path: &Path) -> Result<Vec<Route>, TableError> {
    let file = std::fs::File::open(path)?;
    load_routes(file)
}

/// Strips whitespace and stray quoting some exporters leave in cells.
fn trim_cell(raw: &str) -> String {
    raw.trim().trim_matches('"').trim().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_distance_time_variants() {
        assert_eq!(parse_distance_time("1.2 km / 8 min"), 480.0);
        assert_eq!(parse_distance_time("12.5 min"), 750.0);
        assert_eq!(parse_distance_time("8min"), 480.0);
        assert_eq!(parse_distance_time("3.4 km"), 0.0);
        assert_eq!(parse_distance_time(""), 0.0);
    }

    #[test]
    fn test_route_table_loads_in_order() {
        let csv = "route,signal_serial_numbers,distance_time\n\
                   Route A,1;3;5,\"4.2 km / 12 min\"\n\
                   Route B,2;4,\"3.1 km / 8 min\"\n";
        let routes = load_routes(csv.as_bytes()).unwrap();
        assert_eq!(routes.len(), 2);
        assert_eq!(routes[0].name, "Route A");
        assert_eq!(routes[0].signals, vec!["1", "3", "5"]);
        assert_eq!(routes[0].travel_secs, 720.0);
        assert_eq!(routes[1].signals, vec!["2", "4"]);
        assert_eq!(routes[1].travel_secs, 480.0);
    }

    #[test]
    fn test_empty_signal_list_and_missing_minutes() {
        let csv = "route,signal_serial_numbers,distance_time\n\
                   Walk,,just around the corner\n";
        let routes = load_routes(csv.as_bytes()).unwrap();
        assert_eq!(routes[0].signals.len(), 0);
        assert_eq!(routes[0].travel_secs, 0.0);
    }

    #[test]
    fn test_semicolon_list_tolerates_spacing() {
        let csv = "route,signal_serial_numbers,distance_time\n\
                   R,\" 1 ; 2 ;; 3 \",5 min\n";
        let routes = load_routes(csv.as_bytes()).unwrap();
        assert_eq!(routes[0].signals, vec!["1", "2", "3"]);
    }
}
