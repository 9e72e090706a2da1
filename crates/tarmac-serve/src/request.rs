//! Prediction request and response types

use serde::{Deserialize, Serialize};
use tarmac_data::record::FlightRecord;

/// A single flight to score: exactly the ten feature fields, no label.
///
/// Unknown fields are rejected at deserialization so a caller that sends a
/// label (or a typo) hears about it instead of being silently ignored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PredictionRequest {
    pub month: u8,
    pub day_of_week: u8,
    pub crs_dep_time: u16,
    pub crs_arr_time: u16,
    pub crs_elapsed_time: u16,
    pub distance: f64,
    pub unique_carrier: String,
    pub origin: String,
    pub dest: String,
    pub dep_time_blk: String,
}

impl PredictionRequest {
    /// Wraps the request as an unlabeled flight record.
    #[must_use]
    pub fn to_record(&self) -> FlightRecord {
        FlightRecord {
            month: self.month,
            day_of_week: self.day_of_week,
            crs_dep_time: self.crs_dep_time,
            crs_arr_time: self.crs_arr_time,
            crs_elapsed_time: self.crs_elapsed_time,
            distance: self.distance,
            unique_carrier: self.unique_carrier.clone(),
            origin: self.origin.clone(),
            dest: self.dest.clone(),
            dep_time_blk: self.dep_time_blk.clone(),
            arr_del15: None,
        }
    }
}

/// The scored result returned to the caller.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PredictionResponse {
    /// The model's binary decision: 1 predicts a delay over 15 minutes.
    pub prediction: u8,
    /// Positive-class probability, rounded to 4 decimals for reporting.
    pub delay_probability: f64,
}
