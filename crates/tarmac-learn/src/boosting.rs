//! Gradient-boosted trees on the logistic loss

use ndarray::{Array1, Array2};
use rand::SeedableRng as _;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use crate::{
    params::{DEFAULT_BOOSTING_MAX_DEPTH, Hyperparameters, sample_weights},
    tree::{Criterion, GrowInput, TreeNode, TreeParams, grow_tree},
};

/// Floor/ceiling for probabilities inside the boosting loop.
const PROBABILITY_CLAMP: f64 = 1e-6;

/// Gradient boosting for binary classification.
///
/// Stagewise additive modelling on the logistic loss: the score starts at
/// the weighted log-odds of the positive class, and each round fits a
/// shallow squared-error tree to the residuals `y - p`, with leaf values
/// set by the Newton step `sum(w * r) / sum(w * p * (1 - p))` and shrunk by
/// the learning rate. Sample weights carry class reweighting into both the
/// residuals and the leaf updates.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GradientBoostingClassifier {
    initial_score: f64,
    learning_rate: f64,
    trees: Vec<TreeNode>,
}

fn sigmoid(z: f64) -> f64 {
    1.0 / (1.0 + (-z).exp())
}

impl GradientBoostingClassifier {
    /// Fits the ensemble.
    ///
    /// # Panics
    ///
    /// Panics if `x` has zero rows; the trainer's empty-dataset check runs
    /// first.
    #[must_use]
    pub fn fit(x: &Array2<f64>, y: &[u8], params: &Hyperparameters) -> Self {
        assert!(x.nrows() > 0, "cannot fit boosted trees on zero rows");
        let weights = sample_weights(y, params.class_weight());
        let weight_total: f64 = weights.iter().sum();
        let positive_weight: f64 = weights
            .iter()
            .zip(y)
            .filter(|&(_, &label)| label == 1)
            .map(|(w, _)| w)
            .sum();

        let prior = (positive_weight / weight_total)
            .clamp(PROBABILITY_CLAMP, 1.0 - PROBABILITY_CLAMP);
        let initial_score = (prior / (1.0 - prior)).ln();
        let learning_rate = params.learning_rate();

        let n = x.nrows();
        let tree_params = TreeParams::new(params.max_depth_or(DEFAULT_BOOSTING_MAX_DEPTH));
        let indices: Vec<usize> = (0..n).collect();
        let mut rng = Pcg32::seed_from_u64(params.seed());

        let mut scores = vec![initial_score; n];
        let mut trees = Vec::with_capacity(params.n_estimators());

        for _ in 0..params.n_estimators() {
            let mut residuals = vec![0.0; n];
            let mut numer = vec![0.0; n];
            let mut denom = vec![0.0; n];
            for i in 0..n {
                let p = sigmoid(scores[i]).clamp(PROBABILITY_CLAMP, 1.0 - PROBABILITY_CLAMP);
                residuals[i] = f64::from(y[i]) - p;
                numer[i] = weights[i] * residuals[i];
                denom[i] = weights[i] * p * (1.0 - p);
            }

            let input = GrowInput {
                x,
                targets: &residuals,
                weights: &weights,
                leaf_numer: &numer,
                leaf_denom: &denom,
                criterion: Criterion::SquaredError,
            };
            let tree = grow_tree(&input, &indices, &tree_params, &mut rng);

            for (i, row) in x.rows().into_iter().enumerate() {
                scores[i] += learning_rate * tree.predict(row);
            }
            trees.push(tree);
        }

        Self {
            initial_score,
            learning_rate,
            trees,
        }
    }

    /// Positive-class probabilities.
    #[must_use]
    pub fn predict_proba(&self, x: &Array2<f64>) -> Array1<f64> {
        Array1::from_iter(x.rows().into_iter().map(|row| {
            let score = self.initial_score
                + self.learning_rate
                    * self
                        .trees
                        .iter()
                        .map(|tree| tree.predict(row))
                        .sum::<f64>();
            sigmoid(score)
        }))
    }

    /// Hard decisions at the model's 0.5 probability threshold.
    #[must_use]
    pub fn predict(&self, x: &Array2<f64>) -> Array1<u8> {
        self.predict_proba(x).mapv(|p| u8::from(p >= 0.5))
    }

    /// Ensemble size.
    #[must_use]
    pub fn n_trees(&self) -> usize {
        self.trees.len()
    }
}

#[cfg(test)]
mod tests {
    use ndarray::array;

    use super::*;

    fn xor_like() -> (Array2<f64>, Vec<u8>) {
        // Not linearly separable; trees handle it.
        let x = array![
            [0.0, 0.0],
            [0.2, 0.1],
            [1.0, 1.0],
            [0.9, 1.1],
            [0.0, 1.0],
            [0.1, 0.9],
            [1.0, 0.0],
            [1.1, 0.2],
        ];
        let y = vec![0, 0, 0, 0, 1, 1, 1, 1];
        (x, y)
    }

    fn small_params() -> Hyperparameters {
        Hyperparameters {
            n_estimators: Some(50),
            ..Hyperparameters::default()
        }
    }

    #[test]
    fn learns_a_nonlinear_problem() {
        let (x, y) = xor_like();
        let model = GradientBoostingClassifier::fit(&x, &y, &small_params());
        assert_eq!(model.predict(&x).to_vec(), y);
        assert_eq!(model.n_trees(), 50);
    }

    #[test]
    fn probabilities_stay_in_unit_interval() {
        let (x, y) = xor_like();
        let model = GradientBoostingClassifier::fit(&x, &y, &small_params());
        for p in model.predict_proba(&x) {
            assert!((0.0..=1.0).contains(&p), "probability {p} out of range");
        }
    }

    #[test]
    fn fitting_is_deterministic() {
        let (x, y) = xor_like();
        let a = GradientBoostingClassifier::fit(&x, &y, &small_params());
        let b = GradientBoostingClassifier::fit(&x, &y, &small_params());
        assert_eq!(a, b);
    }

    #[test]
    fn single_class_input_predicts_that_class() {
        let x = array![[0.0], [1.0], [2.0]];
        let y = vec![1, 1, 1];
        let model = GradientBoostingClassifier::fit(&x, &y, &small_params());
        for p in model.predict_proba(&x) {
            assert!(p > 0.9);
        }
    }

    #[test]
    fn more_rounds_fit_the_training_data_tighter() {
        let (x, y) = xor_like();
        let short = GradientBoostingClassifier::fit(
            &x,
            &y,
            &Hyperparameters {
                n_estimators: Some(5),
                ..Hyperparameters::default()
            },
        );
        let long = GradientBoostingClassifier::fit(&x, &y, &small_params());
        let log_loss = |model: &GradientBoostingClassifier| {
            model
                .predict_proba(&x)
                .iter()
                .zip(&y)
                .map(|(p, &label)| {
                    let p = p.clamp(1e-12, 1.0 - 1e-12);
                    if label == 1 { -p.ln() } else { -(1.0 - p).ln() }
                })
                .sum::<f64>()
        };
        assert!(log_loss(&long) < log_loss(&short));
    }
}
