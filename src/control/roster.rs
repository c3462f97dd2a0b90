//! # Signal roster loading.
//!
//! The roster CSV names every signal the runtime should drive:
//!
//! ```csv
//! SL_No,Name
//! 1,MG Road
//! 2,Park Street
//! ```
//!
//! Each row becomes a [`SignalSite`] with its conventional crossing folder
//! name (`Crossing_<serial>`), which batch runs use to locate that
//! intersection's lane-demand snapshot.

use std::io::Read;
use std::path::Path;

use serde::Deserialize;

use crate::error::TableError;

/// One signal from the roster.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SignalSite {
    /// Signal serial number (`SL_No`), kept as text.
    pub id: String,
    /// Display name.
    pub name: String,
    /// Conventional data folder name: `Crossing_<id>`.
    pub crossing: String,
}

#[derive(Deserialize)]
struct RosterRecord {
    #[serde(rename = "SL_No")]
    serial: String,
    #[serde(rename = "Name")]
    name: String,
}

/// Loads the roster from any `Read` source (tests pass an `io::Cursor`).
pub fn load_roster<R: Read>(reader: R) -> Result<Vec<SignalSite>, TableError> {
    let mut csv_reader = csv::Reader::from_reader(reader);
    let mut sites = Vec::new();
    for row in csv_reader.deserialize::<RosterRecord>() {
        let row = row.map_err(|e| TableError::Parse(e.to_string()))?;
        let id = row.serial.trim().to_string();
        if id.is_empty() {
            continue;
        }
        sites.push(SignalSite {
            crossing: format!("Crossing_{id}"),
            name: row.name.trim().to_string(),
            id,
        });
    }
    Ok(sites)
}

/// Loads the roster from a file path.
pub fn load_roster_path(path: &Path) -> Result<Vec<SignalSite>, TableError> {
    let file = std::fs::File::open(path)?;
    load_roster(file)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_roster_rows_become_sites() {
        let csv = "SL_No,Name\n1,MG Road\n2,Park Street\n";
        let sites = load_roster(csv.as_bytes()).unwrap();
        assert_eq!(sites.len(), 2);
        assert_eq!(
            sites[0],
            SignalSite {
                id: "1".into(),
                name: "MG Road".into(),
                crossing: "Crossing_1".into(),
            }
        );
        assert_eq!(sites[1].crossing, "Crossing_2");
    }

    #[test]
    fn test_blank_serials_skipped() {
        let csv = "SL_No,Name\n ,Ghost\n3,Real\n";
        let sites = load_roster(csv.as_bytes()).unwrap();
        assert_eq!(sites.len(), 1);
        assert_eq!(sites[0].id, "3");
    }

    #[test]
    fn test_missing_column_is_parse_error() {
        let csv = "SL_No\n1\n";
        assert!(matches!(
            load_roster(csv.as_bytes()),
            Err(TableError::Parse(_))
        ));
    }
}
