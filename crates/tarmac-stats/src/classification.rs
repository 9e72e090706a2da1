//! Binary classification metrics computed from a confusion matrix
//!
//! Metrics follow the usual conventions for imbalanced binary problems:
//! precision, recall and F1 are reported for the positive (delayed) class,
//! and degenerate denominators yield 0.0 rather than NaN so that a trivial
//! classifier scores poorly instead of poisoning downstream comparisons.

use std::fmt::Write as _;

use crate::confusion::ConfusionMatrix;

/// Held-out evaluation metrics for a binary classifier.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ClassificationMetrics {
    /// Fraction of all rows classified correctly.
    pub accuracy: f64,
    /// Positive-class precision: TP / (TP + FP).
    pub precision: f64,
    /// Positive-class recall: TP / (TP + FN).
    pub recall: f64,
    /// Harmonic mean of precision and recall.
    pub f1: f64,
}

impl ClassificationMetrics {
    /// Computes the metric set from a confusion matrix.
    ///
    /// # Examples
    ///
    /// ```
    /// # use tarmac_stats::classification::ClassificationMetrics;
    /// # use tarmac_stats::confusion::ConfusionMatrix;
    /// let cm = ConfusionMatrix {
    ///     true_positives: 8,
    ///     false_positives: 2,
    ///     true_negatives: 85,
    ///     false_negatives: 5,
    /// };
    /// let metrics = ClassificationMetrics::from_confusion(&cm);
    /// assert_eq!(metrics.accuracy, 0.93);
    /// assert_eq!(metrics.precision, 0.8);
    /// ```
    #[expect(clippy::cast_precision_loss)]
    #[must_use]
    pub fn from_confusion(matrix: &ConfusionMatrix) -> Self {
        let total = matrix.total();
        let accuracy = if total == 0 {
            0.0
        } else {
            (matrix.true_positives + matrix.true_negatives) as f64 / total as f64
        };
        let precision = ratio(
            matrix.true_positives,
            matrix.true_positives + matrix.false_positives,
        );
        let recall = ratio(
            matrix.true_positives,
            matrix.true_positives + matrix.false_negatives,
        );
        let f1 = if precision + recall == 0.0 {
            0.0
        } else {
            2.0 * precision * recall / (precision + recall)
        };

        Self {
            accuracy,
            precision,
            recall,
            f1,
        }
    }

    /// Computes the metric set directly from paired labels.
    #[must_use]
    pub fn from_labels(actual: &[u8], predicted: &[u8]) -> Self {
        Self::from_confusion(&ConfusionMatrix::from_labels(actual, predicted))
    }
}

#[expect(clippy::cast_precision_loss)]
fn ratio(numerator: u64, denominator: u64) -> f64 {
    if denominator == 0 {
        0.0
    } else {
        numerator as f64 / denominator as f64
    }
}

/// Renders a per-class text report in the familiar tabular layout.
///
/// One row per class (`on-time` is label 0, `delayed` is label 1) with
/// precision, recall, F1 and support, followed by overall accuracy. Values
/// are printed with three decimal digits.
///
/// # Examples
///
/// ```
/// # use tarmac_stats::classification::classification_report;
/// # use tarmac_stats::confusion::ConfusionMatrix;
/// let cm = ConfusionMatrix {
///     true_positives: 8,
///     false_positives: 2,
///     true_negatives: 85,
///     false_negatives: 5,
/// };
/// let report = classification_report(&cm);
/// assert!(report.contains("delayed"));
/// assert!(report.contains("accuracy"));
/// ```
#[must_use]
pub fn classification_report(matrix: &ConfusionMatrix) -> String {
    let positive = ClassificationMetrics::from_confusion(matrix);
    let negative = ClassificationMetrics::from_confusion(&matrix.inverted());

    let mut report = String::new();
    let _ = writeln!(
        report,
        "{:>12} {:>10} {:>8} {:>9} {:>9}",
        "", "precision", "recall", "f1-score", "support"
    );
    let _ = writeln!(report);
    let _ = writeln!(
        report,
        "{:>12} {:>10.3} {:>8.3} {:>9.3} {:>9}",
        "on-time",
        negative.precision,
        negative.recall,
        negative.f1,
        matrix.negative_support()
    );
    let _ = writeln!(
        report,
        "{:>12} {:>10.3} {:>8.3} {:>9.3} {:>9}",
        "delayed",
        positive.precision,
        positive.recall,
        positive.f1,
        matrix.positive_support()
    );
    let _ = writeln!(report);
    let _ = writeln!(
        report,
        "{:>12} {:>10} {:>8} {:>9.3} {:>9}",
        "accuracy",
        "",
        "",
        positive.accuracy,
        matrix.total()
    );
    report
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn perfect_classifier_scores_one() {
        let metrics = ClassificationMetrics::from_labels(&[1, 0, 1, 0], &[1, 0, 1, 0]);
        assert_eq!(metrics.accuracy, 1.0);
        assert_eq!(metrics.precision, 1.0);
        assert_eq!(metrics.recall, 1.0);
        assert_eq!(metrics.f1, 1.0);
    }

    #[test]
    fn all_negative_predictions_have_zero_f1() {
        // A trivial "never delayed" classifier on imbalanced data.
        let actual = [1, 0, 0, 0, 0, 0, 0, 0, 0, 0];
        let predicted = [0; 10];
        let metrics = ClassificationMetrics::from_labels(&actual, &predicted);
        assert_eq!(metrics.accuracy, 0.9);
        assert_eq!(metrics.precision, 0.0);
        assert_eq!(metrics.recall, 0.0);
        assert_eq!(metrics.f1, 0.0);
    }

    #[test]
    fn known_matrix_matches_hand_computation() {
        let cm = ConfusionMatrix {
            true_positives: 30,
            false_positives: 10,
            true_negatives: 50,
            false_negatives: 10,
        };
        let metrics = ClassificationMetrics::from_confusion(&cm);
        assert!((metrics.accuracy - 0.8).abs() < 1e-12);
        assert!((metrics.precision - 0.75).abs() < 1e-12);
        assert!((metrics.recall - 0.75).abs() < 1e-12);
        assert!((metrics.f1 - 0.75).abs() < 1e-12);
    }

    #[test]
    fn report_contains_both_class_rows() {
        let cm = ConfusionMatrix {
            true_positives: 1,
            false_positives: 2,
            true_negatives: 3,
            false_negatives: 4,
        };
        let report = classification_report(&cm);
        assert!(report.contains("on-time"));
        assert!(report.contains("delayed"));
        assert!(report.contains("accuracy"));
        // Supports reflect ground-truth counts.
        assert!(report.contains('5')); // positive support: 1 + 4
    }
}
