/// Descriptive statistics summarizing a numeric column.
///
/// Contains the measures of central tendency and dispersion that the feature
/// scaler freezes at fit time.
#[derive(Debug, Clone, PartialEq)]
pub struct DescriptiveStats {
    /// The minimum value in the column.
    pub min: f64,
    /// The maximum value in the column.
    pub max: f64,
    /// The arithmetic mean of the column.
    pub mean: f64,
    /// The population variance of the column.
    pub variance: f64,
    /// The population standard deviation of the column.
    pub std_dev: f64,
}

impl DescriptiveStats {
    /// Computes descriptive statistics over a sequence of values.
    ///
    /// # Arguments
    ///
    /// * `values` - An iterator over `f64` values
    ///
    /// # Returns
    ///
    /// * `Some(DescriptiveStats)` - if the sequence contains at least one value
    /// * `None` - if the sequence is empty
    ///
    /// # Examples
    ///
    /// ```
    /// # use tarmac_stats::descriptive::DescriptiveStats;
    /// let stats = DescriptiveStats::new([2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0]).unwrap();
    /// assert_eq!(stats.mean, 5.0);
    /// assert_eq!(stats.std_dev, 2.0);
    /// assert_eq!(stats.min, 2.0);
    /// assert_eq!(stats.max, 9.0);
    /// ```
    #[expect(clippy::cast_precision_loss)]
    #[must_use]
    pub fn new<I>(values: I) -> Option<Self>
    where
        I: IntoIterator<Item = f64>,
    {
        let values = values.into_iter().collect::<Vec<_>>();
        if values.is_empty() {
            return None;
        }

        let min = values.iter().copied().min_by(f64::total_cmp)?;
        let max = values.iter().copied().max_by(f64::total_cmp)?;
        let n = values.len() as f64;
        let mean = values.iter().copied().sum::<f64>() / n;
        let variance = values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / n;
        let std_dev = variance.sqrt();

        Some(Self {
            min,
            max,
            mean,
            variance,
            std_dev,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_input_yields_none() {
        assert_eq!(DescriptiveStats::new([]), None);
    }

    #[test]
    fn single_value_has_zero_spread() {
        let stats = DescriptiveStats::new([3.5]).unwrap();
        assert_eq!(stats.mean, 3.5);
        assert_eq!(stats.variance, 0.0);
        assert_eq!(stats.std_dev, 0.0);
        assert_eq!(stats.min, 3.5);
        assert_eq!(stats.max, 3.5);
    }

    #[test]
    fn constant_column_has_zero_std_dev() {
        let stats = DescriptiveStats::new([7.0; 100]).unwrap();
        assert_eq!(stats.mean, 7.0);
        assert_eq!(stats.std_dev, 0.0);
    }
}
