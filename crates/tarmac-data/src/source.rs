//! Historical flight data sources
//!
//! Training reads one row per completed flight from a historical store.
//! The store itself is a collaborator (typically a relational database
//! populated from carrier extracts); this module fixes only the query
//! boundary, as the [`HistoricalSource`] trait, and ships a CSV-backed
//! implementation for working directly from the raw extracts.
//!
//! Carrier CSV extracts are wider and messier than the canonical schema:
//! headers are upper-cased, clock fields arrive as floats, labels can be
//! blank, and cancelled flights are present with a `cancelled` marker.
//! [`CsvSource`] normalizes headers, ignores the extra columns, and applies
//! the label/cancellation filters before anything downstream sees a row.

use std::{fs::File, io::BufReader, path::PathBuf};

use serde::Deserialize;
use tracing::{info, warn};

use crate::record::FlightRecord;

/// Error reading from a historical source.
#[derive(Debug, derive_more::Display, derive_more::Error)]
pub enum SourceError {
    #[display("failed to open historical data file {path}: {source}")]
    Open {
        path: String,
        source: std::io::Error,
    },
    #[display("failed to read historical data from {path}: {source}")]
    Read { path: String, source: csv::Error },
}

/// A query boundary yielding one row per historical flight.
///
/// Implementations apply their own storage-level filtering (timeouts,
/// retries, pagination are their concern); the rows they return are
/// expected to be completed flights in the canonical schema.
pub trait HistoricalSource {
    /// Loads all available flight rows.
    fn load(&self) -> Result<Vec<FlightRecord>, SourceError>;
}

/// The shape a raw extract row deserializes into.
///
/// Numeric clock fields are floats in the extracts ("900.0"); labels and
/// the cancellation marker may be blank. Extra columns are ignored by the
/// deserializer.
#[derive(Debug, Deserialize)]
struct RawFlightRow {
    month: u8,
    day_of_week: u8,
    crs_dep_time: f64,
    crs_arr_time: f64,
    crs_elapsed_time: f64,
    distance: f64,
    unique_carrier: String,
    origin: String,
    dest: String,
    dep_time_blk: String,
    #[serde(default)]
    arr_del15: Option<f64>,
    #[serde(default)]
    cancelled: Option<f64>,
}

impl RawFlightRow {
    fn is_cancelled(&self) -> bool {
        self.cancelled.is_some_and(|v| v > 0.5)
    }

    #[expect(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    fn into_record(self) -> FlightRecord {
        let arr_del15 = match self.arr_del15 {
            Some(v) if v.abs() < 1e-9 => Some(0),
            Some(v) if (v - 1.0).abs() < 1e-9 => Some(1),
            _ => None,
        };
        FlightRecord {
            month: self.month,
            day_of_week: self.day_of_week,
            crs_dep_time: self.crs_dep_time as u16,
            crs_arr_time: self.crs_arr_time as u16,
            crs_elapsed_time: self.crs_elapsed_time as u16,
            distance: self.distance,
            unique_carrier: self.unique_carrier,
            origin: self.origin,
            dest: self.dest,
            dep_time_blk: self.dep_time_blk,
            arr_del15,
        }
    }
}

/// CSV-backed historical source.
///
/// # Examples
///
/// ```no_run
/// use tarmac_data::source::{CsvSource, HistoricalSource};
///
/// let source = CsvSource::new("data/flights.csv");
/// let flights = source.load()?;
/// println!("{} usable flights", flights.len());
/// # Ok::<(), tarmac_data::source::SourceError>(())
/// ```
#[derive(Debug, Clone)]
pub struct CsvSource {
    path: PathBuf,
    filter_cancelled: bool,
}

impl CsvSource {
    /// Creates a source reading from `path`, dropping cancelled flights.
    #[must_use]
    pub fn new<P>(path: P) -> Self
    where
        P: Into<PathBuf>,
    {
        Self {
            path: path.into(),
            filter_cancelled: true,
        }
    }

    /// Controls whether rows marked cancelled are dropped.
    ///
    /// Cancelled flights never have a meaningful arrival label, so the
    /// filter is on by default; extracts that were pre-filtered upstream
    /// can turn it off.
    #[must_use]
    pub fn filter_cancelled(mut self, filter: bool) -> Self {
        self.filter_cancelled = filter;
        self
    }
}

impl HistoricalSource for CsvSource {
    fn load(&self) -> Result<Vec<FlightRecord>, SourceError> {
        let path = self.path.display().to_string();
        let file = File::open(&self.path).map_err(|source| SourceError::Open {
            path: path.clone(),
            source,
        })?;

        let mut reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .from_reader(BufReader::new(file));

        // Extract headers are upper-cased; normalize once so the row type
        // can deserialize by canonical name.
        let headers = reader
            .headers()
            .map_err(|source| SourceError::Read {
                path: path.clone(),
                source,
            })?
            .iter()
            .map(str::to_lowercase)
            .collect::<csv::StringRecord>();

        let mut records = Vec::new();
        let mut malformed = 0usize;
        let mut cancelled = 0usize;
        let mut unlabeled = 0usize;

        for row in reader.into_records() {
            let row = row.map_err(|source| SourceError::Read {
                path: path.clone(),
                source,
            })?;
            let Ok(raw) = row.deserialize::<RawFlightRow>(Some(&headers)) else {
                malformed += 1;
                continue;
            };
            if self.filter_cancelled && raw.is_cancelled() {
                cancelled += 1;
                continue;
            }
            let record = raw.into_record();
            if !record.is_labeled() {
                unlabeled += 1;
                continue;
            }
            records.push(record);
        }

        if malformed > 0 {
            warn!(path, malformed, "dropped rows that failed to parse");
        }
        info!(
            path,
            loaded = records.len(),
            cancelled,
            unlabeled,
            "historical data loaded"
        );
        Ok(records)
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write as _;

    use super::*;

    fn write_csv(contents: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file
    }

    const HEADER: &str = "MONTH,DAY_OF_WEEK,CRS_DEP_TIME,CRS_ARR_TIME,CRS_ELAPSED_TIME,DISTANCE,UNIQUE_CARRIER,ORIGIN,DEST,DEP_TIME_BLK,ARR_DEL15,CANCELLED\n";

    #[test]
    fn loads_labeled_rows_with_uppercase_headers() {
        let file = write_csv(&format!(
            "{HEADER}3,2,900.0,1100.0,120.0,500.0,AA,JFK,LAX,0900-0959,1.0,0.0\n"
        ));
        let records = CsvSource::new(file.path()).load().unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].crs_dep_time, 900);
        assert_eq!(records[0].arr_del15, Some(1));
    }

    #[test]
    fn drops_cancelled_and_unlabeled_rows() {
        let file = write_csv(&format!(
            "{HEADER}\
             3,2,900.0,1100.0,120.0,500.0,AA,JFK,LAX,0900-0959,1.0,1.0\n\
             4,5,1000.0,1200.0,120.0,600.0,DL,ATL,ORD,1000-1059,,0.0\n\
             5,6,1100.0,1300.0,120.0,700.0,UA,SFO,SEA,1100-1159,0.0,0.0\n"
        ));
        let records = CsvSource::new(file.path()).load().unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].unique_carrier, "UA");
    }

    #[test]
    fn cancelled_filter_can_be_disabled() {
        let file = write_csv(&format!(
            "{HEADER}3,2,900.0,1100.0,120.0,500.0,AA,JFK,LAX,0900-0959,1.0,1.0\n"
        ));
        let records = CsvSource::new(file.path())
            .filter_cancelled(false)
            .load()
            .unwrap();
        assert_eq!(records.len(), 1);
    }

    #[test]
    fn extra_columns_are_ignored() {
        let file = write_csv(
            "YEAR,MONTH,DAY_OF_WEEK,CRS_DEP_TIME,CRS_ARR_TIME,CRS_ELAPSED_TIME,DISTANCE,\
             UNIQUE_CARRIER,ORIGIN,DEST,DEP_TIME_BLK,ARR_DEL15,CANCELLED,DIVERTED\n\
             2019,3,2,900.0,1100.0,120.0,500.0,AA,JFK,LAX,0900-0959,0.0,0.0,0.0\n",
        );
        let records = CsvSource::new(file.path()).load().unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].month, 3);
    }

    #[test]
    fn missing_file_reports_open_error() {
        let err = CsvSource::new("/nonexistent/flights.csv").load().unwrap_err();
        assert!(matches!(err, SourceError::Open { .. }));
    }
}
