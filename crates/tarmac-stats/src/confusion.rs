/// Binary confusion matrix.
///
/// Counts are accumulated with the convention that label `1` is the positive
/// class (flight delayed more than 15 minutes).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ConfusionMatrix {
    /// Positive rows predicted positive.
    pub true_positives: u64,
    /// Negative rows predicted positive.
    pub false_positives: u64,
    /// Negative rows predicted negative.
    pub true_negatives: u64,
    /// Positive rows predicted negative.
    pub false_negatives: u64,
}

impl ConfusionMatrix {
    /// Accumulates a confusion matrix from paired actual/predicted labels.
    ///
    /// # Arguments
    ///
    /// * `actual` - Ground-truth labels, each 0 or 1
    /// * `predicted` - Model decisions, each 0 or 1, same length as `actual`
    ///
    /// # Panics
    ///
    /// Panics if the slices have different lengths.
    ///
    /// # Examples
    ///
    /// ```
    /// # use tarmac_stats::confusion::ConfusionMatrix;
    /// let cm = ConfusionMatrix::from_labels(&[1, 1, 0, 0], &[1, 0, 0, 1]);
    /// assert_eq!(cm.true_positives, 1);
    /// assert_eq!(cm.false_negatives, 1);
    /// assert_eq!(cm.true_negatives, 1);
    /// assert_eq!(cm.false_positives, 1);
    /// ```
    #[must_use]
    pub fn from_labels(actual: &[u8], predicted: &[u8]) -> Self {
        assert_eq!(
            actual.len(),
            predicted.len(),
            "label slices must have equal length"
        );

        let mut matrix = Self::default();
        for (&a, &p) in actual.iter().zip(predicted) {
            match (a, p) {
                (1, 1) => matrix.true_positives += 1,
                (0, 1) => matrix.false_positives += 1,
                (0, 0) => matrix.true_negatives += 1,
                _ => matrix.false_negatives += 1,
            }
        }
        matrix
    }

    /// Total number of observations.
    #[must_use]
    pub fn total(&self) -> u64 {
        self.true_positives + self.false_positives + self.true_negatives + self.false_negatives
    }

    /// Number of rows whose ground-truth label is positive.
    #[must_use]
    pub fn positive_support(&self) -> u64 {
        self.true_positives + self.false_negatives
    }

    /// Number of rows whose ground-truth label is negative.
    #[must_use]
    pub fn negative_support(&self) -> u64 {
        self.true_negatives + self.false_positives
    }

    /// The matrix with the positive and negative classes swapped.
    ///
    /// Used to compute per-class metrics for the negative (on-time) class in
    /// the classification report.
    #[must_use]
    pub fn inverted(&self) -> Self {
        Self {
            true_positives: self.true_negatives,
            false_positives: self.false_negatives,
            true_negatives: self.true_positives,
            false_negatives: self.false_positives,
        }
    }
}
