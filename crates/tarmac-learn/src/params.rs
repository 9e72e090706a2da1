//! Hyperparameters and their documented defaults
//!
//! A [`Hyperparameters`] value carries only the knobs the operator set;
//! everything left `None` resolves to the family's documented default at
//! fit time. This keeps CLI flags, search-trial candidates and persisted
//! run descriptions in one shape.

use serde::{Deserialize, Serialize};

/// Default number of trees for the ensemble families.
pub const DEFAULT_N_ESTIMATORS: usize = 100;

/// Default tree depth for the random forest.
pub const DEFAULT_FOREST_MAX_DEPTH: usize = 10;

/// Default tree depth for gradient boosting (shallow trees boost better).
pub const DEFAULT_BOOSTING_MAX_DEPTH: usize = 3;

/// Default shrinkage for gradient boosting.
pub const DEFAULT_LEARNING_RATE: f64 = 0.1;

/// Default inverse regularization strength for logistic regression.
pub const DEFAULT_C: f64 = 1.0;

/// Default iteration cap for logistic regression.
pub const DEFAULT_MAX_ITER: usize = 1000;

/// Default seed for every stochastic fitting step.
pub const DEFAULT_SEED: u64 = 42;

/// How training examples are reweighted against class imbalance.
///
/// Delayed flights are a small minority of all rows; with uniform weights a
/// classifier can reach high accuracy by never predicting a delay. Balanced
/// weighting scales each class inversely to its frequency so the minority
/// class carries equal total weight.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ClassWeight {
    /// Every sample weighs 1.
    Uniform,
    /// Per-class weight `n_samples / (2 * n_class)`.
    #[default]
    Balanced,
}

/// Operator-supplied hyperparameters; unset fields use family defaults.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Hyperparameters {
    /// Ensemble size (forest and boosting). Default 100.
    pub n_estimators: Option<usize>,
    /// Maximum tree depth. Default 10 for the forest, 3 for boosting.
    pub max_depth: Option<usize>,
    /// Boosting shrinkage. Default 0.1.
    pub learning_rate: Option<f64>,
    /// Inverse regularization strength for logistic regression. Default 1.0.
    pub c: Option<f64>,
    /// Gradient-descent iteration cap for logistic regression. Default 1000.
    pub max_iter: Option<usize>,
    /// Class reweighting mode. Default balanced.
    pub class_weight: Option<ClassWeight>,
    /// Seed for bootstrap and feature subsampling. Default 42.
    pub seed: Option<u64>,
}

impl Hyperparameters {
    #[must_use]
    pub fn n_estimators(&self) -> usize {
        self.n_estimators.unwrap_or(DEFAULT_N_ESTIMATORS)
    }

    /// Tree depth with a per-family default: forests grow deep, boosting
    /// stays shallow.
    #[must_use]
    pub fn max_depth_or(&self, family_default: usize) -> usize {
        self.max_depth.unwrap_or(family_default)
    }

    #[must_use]
    pub fn learning_rate(&self) -> f64 {
        self.learning_rate.unwrap_or(DEFAULT_LEARNING_RATE)
    }

    #[must_use]
    pub fn c(&self) -> f64 {
        self.c.unwrap_or(DEFAULT_C)
    }

    #[must_use]
    pub fn max_iter(&self) -> usize {
        self.max_iter.unwrap_or(DEFAULT_MAX_ITER)
    }

    #[must_use]
    pub fn class_weight(&self) -> ClassWeight {
        self.class_weight.unwrap_or_default()
    }

    #[must_use]
    pub fn seed(&self) -> u64 {
        self.seed.unwrap_or(DEFAULT_SEED)
    }
}

/// Per-sample weights for a label vector under a reweighting mode.
///
/// Balanced weights follow the usual `n / (k * n_c)` formula with `k = 2`
/// classes, so each class contributes the same total weight. A class absent
/// from `labels` simply never produces a weight.
#[expect(clippy::cast_precision_loss)]
#[must_use]
pub fn sample_weights(labels: &[u8], mode: ClassWeight) -> Vec<f64> {
    match mode {
        ClassWeight::Uniform => vec![1.0; labels.len()],
        ClassWeight::Balanced => {
            let positives = labels.iter().filter(|&&y| y == 1).count();
            let negatives = labels.len() - positives;
            let total = labels.len() as f64;
            let positive_weight = if positives == 0 {
                0.0
            } else {
                total / (2.0 * positives as f64)
            };
            let negative_weight = if negatives == 0 {
                0.0
            } else {
                total / (2.0 * negatives as f64)
            };
            labels
                .iter()
                .map(|&y| if y == 1 { positive_weight } else { negative_weight })
                .collect()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unset_fields_resolve_to_defaults() {
        let params = Hyperparameters::default();
        assert_eq!(params.n_estimators(), DEFAULT_N_ESTIMATORS);
        assert_eq!(params.max_depth_or(DEFAULT_FOREST_MAX_DEPTH), 10);
        assert_eq!(params.max_depth_or(DEFAULT_BOOSTING_MAX_DEPTH), 3);
        assert_eq!(params.learning_rate(), DEFAULT_LEARNING_RATE);
        assert_eq!(params.c(), DEFAULT_C);
        assert_eq!(params.max_iter(), DEFAULT_MAX_ITER);
        assert_eq!(params.class_weight(), ClassWeight::Balanced);
        assert_eq!(params.seed(), DEFAULT_SEED);
    }

    #[test]
    fn set_fields_override_defaults() {
        let params = Hyperparameters {
            n_estimators: Some(25),
            max_depth: Some(4),
            ..Hyperparameters::default()
        };
        assert_eq!(params.n_estimators(), 25);
        assert_eq!(params.max_depth_or(DEFAULT_FOREST_MAX_DEPTH), 4);
    }

    #[test]
    fn balanced_weights_equalize_class_totals() {
        let labels = [1, 0, 0, 0, 0, 0, 0, 0, 0, 0];
        let weights = sample_weights(&labels, ClassWeight::Balanced);
        let positive_total: f64 = weights
            .iter()
            .zip(&labels)
            .filter(|&(_, &y)| y == 1)
            .map(|(w, _)| w)
            .sum();
        let negative_total: f64 = weights
            .iter()
            .zip(&labels)
            .filter(|&(_, &y)| y == 0)
            .map(|(w, _)| w)
            .sum();
        assert!((positive_total - negative_total).abs() < 1e-12);
        assert!((positive_total - 5.0).abs() < 1e-12);
    }

    #[test]
    fn uniform_weights_are_all_one() {
        let weights = sample_weights(&[0, 1, 0], ClassWeight::Uniform);
        assert_eq!(weights, vec![1.0, 1.0, 1.0]);
    }

    #[test]
    fn partial_json_deserializes_with_defaults() {
        let params: Hyperparameters = serde_json::from_str(r#"{"n_estimators": 50}"#).unwrap();
        assert_eq!(params.n_estimators(), 50);
        assert_eq!(params.max_iter(), DEFAULT_MAX_ITER);
    }
}
