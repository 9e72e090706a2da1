//! Columnar view over flight records
//!
//! The feature encoder works on named columns rather than on structs so
//! that the same fit/transform path serves full training sets and one-row
//! inference requests. [`Frame`] is that view: a small column-oriented
//! table with numeric and categorical columns, built from
//! [`FlightRecord`]s.
//!
//! The label column is present only when every source record carries a
//! label; a frame built from inference requests has exactly the ten feature
//! columns.

use std::collections::BTreeMap;

use crate::{record::FlightRecord, schema};

/// A single named column.
#[derive(Debug, Clone, PartialEq)]
pub enum Column {
    /// Floating-point values, one per row.
    Numeric(Vec<f64>),
    /// String categories, one per row.
    Categorical(Vec<String>),
}

impl Column {
    /// Number of rows in the column.
    #[must_use]
    pub fn len(&self) -> usize {
        match self {
            Column::Numeric(values) => values.len(),
            Column::Categorical(values) => values.len(),
        }
    }

    /// Whether the column has no rows.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// A column-oriented table of flight data.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Frame {
    rows: usize,
    columns: BTreeMap<String, Column>,
}

impl Frame {
    /// Builds a frame from flight records.
    ///
    /// Produces the ten canonical feature columns, plus the label column
    /// when every record is labeled. Mixed labeled/unlabeled input drops
    /// the label column entirely; callers that need labels filter their
    /// records first (the sampler already does).
    ///
    /// # Examples
    ///
    /// ```
    /// # use tarmac_data::frame::Frame;
    /// let frame = Frame::from_records(&[]);
    /// assert!(frame.is_empty());
    /// ```
    #[must_use]
    pub fn from_records(records: &[FlightRecord]) -> Self {
        let mut columns = BTreeMap::new();

        columns.insert(
            "month".to_string(),
            Column::Numeric(records.iter().map(|r| f64::from(r.month)).collect()),
        );
        columns.insert(
            "day_of_week".to_string(),
            Column::Numeric(records.iter().map(|r| f64::from(r.day_of_week)).collect()),
        );
        columns.insert(
            "crs_dep_time".to_string(),
            Column::Numeric(records.iter().map(|r| f64::from(r.crs_dep_time)).collect()),
        );
        columns.insert(
            "crs_arr_time".to_string(),
            Column::Numeric(records.iter().map(|r| f64::from(r.crs_arr_time)).collect()),
        );
        columns.insert(
            "crs_elapsed_time".to_string(),
            Column::Numeric(
                records
                    .iter()
                    .map(|r| f64::from(r.crs_elapsed_time))
                    .collect(),
            ),
        );
        columns.insert(
            "distance".to_string(),
            Column::Numeric(records.iter().map(|r| r.distance).collect()),
        );
        columns.insert(
            "unique_carrier".to_string(),
            Column::Categorical(records.iter().map(|r| r.unique_carrier.clone()).collect()),
        );
        columns.insert(
            "origin".to_string(),
            Column::Categorical(records.iter().map(|r| r.origin.clone()).collect()),
        );
        columns.insert(
            "dest".to_string(),
            Column::Categorical(records.iter().map(|r| r.dest.clone()).collect()),
        );
        columns.insert(
            "dep_time_blk".to_string(),
            Column::Categorical(records.iter().map(|r| r.dep_time_blk.clone()).collect()),
        );

        if !records.is_empty() && records.iter().all(FlightRecord::is_labeled) {
            columns.insert(
                schema::LABEL_COLUMN.to_string(),
                Column::Numeric(
                    records
                        .iter()
                        .map(|r| f64::from(r.label().unwrap()))
                        .collect(),
                ),
            );
        }

        Self {
            rows: records.len(),
            columns,
        }
    }

    /// Builds a one-row frame from a single record.
    ///
    /// This is the inference path: the encoder transforms the resulting
    /// frame with its frozen state and the output matrix has exactly the
    /// training column layout.
    #[must_use]
    pub fn from_record(record: &FlightRecord) -> Self {
        Self::from_records(std::slice::from_ref(record))
    }

    /// Number of rows.
    #[must_use]
    pub fn len(&self) -> usize {
        self.rows
    }

    /// Whether the frame has no rows.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rows == 0
    }

    /// Looks up a column by name.
    #[must_use]
    pub fn column(&self, name: &str) -> Option<&Column> {
        self.columns.get(name)
    }

    /// Looks up a numeric column by name.
    ///
    /// Returns `None` when the column is absent or categorical.
    #[must_use]
    pub fn numeric(&self, name: &str) -> Option<&[f64]> {
        match self.columns.get(name) {
            Some(Column::Numeric(values)) => Some(values),
            _ => None,
        }
    }

    /// Looks up a categorical column by name.
    ///
    /// Returns `None` when the column is absent or numeric.
    #[must_use]
    pub fn categorical(&self, name: &str) -> Option<&[String]> {
        match self.columns.get(name) {
            Some(Column::Categorical(values)) => Some(values),
            _ => None,
        }
    }

    /// Names of all columns present, in sorted order.
    pub fn column_names(&self) -> impl Iterator<Item = &str> {
        self.columns.keys().map(String::as_str)
    }
}
