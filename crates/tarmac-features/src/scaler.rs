//! Numeric column standardization

use serde::{Deserialize, Serialize};
use tarmac_stats::descriptive::DescriptiveStats;

/// Frozen standardization statistics for one numeric column.
///
/// Computed once at fit time; [`transform`](ColumnScaler::transform) never
/// updates them. A column with zero spread (all values equal) scales every
/// value to 0.0 instead of dividing by zero.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColumnScaler {
    /// Fit-time mean of the column.
    pub mean: f64,
    /// Fit-time population standard deviation of the column.
    pub std_dev: f64,
}

impl ColumnScaler {
    /// Computes scaler statistics from the fit-time values.
    ///
    /// Returns `None` for an empty column.
    #[must_use]
    pub fn fit(values: &[f64]) -> Option<Self> {
        let stats = DescriptiveStats::new(values.iter().copied())?;
        Some(Self {
            mean: stats.mean,
            std_dev: stats.std_dev,
        })
    }

    /// Standardizes one value against the frozen statistics.
    ///
    /// # Examples
    ///
    /// ```
    /// # use tarmac_features::scaler::ColumnScaler;
    /// let scaler = ColumnScaler::fit(&[2.0, 4.0, 6.0]).unwrap();
    /// assert_eq!(scaler.transform(4.0), 0.0);
    /// assert!(scaler.transform(6.0) > 0.0);
    /// ```
    #[must_use]
    pub fn transform(&self, value: f64) -> f64 {
        if self.std_dev == 0.0 {
            0.0
        } else {
            (value - self.mean) / self.std_dev
        }
    }
}
