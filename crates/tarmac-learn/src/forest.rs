//! Random forest classifier

use ndarray::{Array1, Array2};
use rand::{Rng, SeedableRng as _};
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use crate::{
    params::{DEFAULT_FOREST_MAX_DEPTH, Hyperparameters, sample_weights},
    tree::{Criterion, GrowInput, TreeNode, TreeParams, grow_tree},
};

/// Bagged decision trees with per-split feature subsampling.
///
/// Each tree fits a bootstrap draw of the training rows and considers
/// `sqrt(n_features)` random features per split. Probabilities average the
/// trees' leaf estimates; the hard decision is a majority vote of the
/// trees' own decisions, which is the forest's decision rule rather than a
/// threshold on the averaged probability.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RandomForestClassifier {
    trees: Vec<TreeNode>,
}

impl RandomForestClassifier {
    /// Fits the forest.
    ///
    /// # Panics
    ///
    /// Panics if `x` has zero rows; the trainer guards with its
    /// empty-dataset check before ever reaching a fit.
    #[expect(clippy::cast_possible_truncation, clippy::cast_sign_loss, clippy::cast_precision_loss)]
    #[must_use]
    pub fn fit(x: &Array2<f64>, y: &[u8], params: &Hyperparameters) -> Self {
        assert!(x.nrows() > 0, "cannot fit a forest on zero rows");
        let weights = sample_weights(y, params.class_weight());
        let targets: Vec<f64> = y.iter().map(|&v| f64::from(v)).collect();
        let numer: Vec<f64> = weights.iter().zip(&targets).map(|(w, t)| w * t).collect();

        let n = x.nrows();
        let feature_subsample = ((x.ncols() as f64).sqrt().round() as usize).max(1);
        let tree_params = TreeParams {
            feature_subsample: Some(feature_subsample),
            ..TreeParams::new(params.max_depth_or(DEFAULT_FOREST_MAX_DEPTH))
        };
        let input = GrowInput {
            x,
            targets: &targets,
            weights: &weights,
            leaf_numer: &numer,
            leaf_denom: &weights,
            criterion: Criterion::Gini,
        };

        let mut rng = Pcg32::seed_from_u64(params.seed());
        let trees = (0..params.n_estimators())
            .map(|_| {
                let bootstrap: Vec<usize> = (0..n).map(|_| rng.random_range(0..n)).collect();
                grow_tree(&input, &bootstrap, &tree_params, &mut rng)
            })
            .collect();

        Self { trees }
    }

    /// Mean positive-class probability across trees.
    #[expect(clippy::cast_precision_loss)]
    #[must_use]
    pub fn predict_proba(&self, x: &Array2<f64>) -> Array1<f64> {
        let n_trees = self.trees.len() as f64;
        Array1::from_iter(x.rows().into_iter().map(|row| {
            let sum: f64 = self.trees.iter().map(|tree| tree.predict(row)).sum();
            sum / n_trees
        }))
    }

    /// Majority vote of the trees' own decisions.
    #[must_use]
    pub fn predict(&self, x: &Array2<f64>) -> Array1<u8> {
        Array1::from_iter(x.rows().into_iter().map(|row| {
            let votes = self
                .trees
                .iter()
                .filter(|tree| tree.predict(row) >= 0.5)
                .count();
            u8::from(votes * 2 >= self.trees.len())
        }))
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

    fn separable() -> (Array2<f64>, Vec<u8>) {
        let x = array![
            [0.0, 5.0],
            [1.0, 4.0],
            [2.0, 6.0],
            [0.5, 5.5],
            [10.0, -5.0],
            [11.0, -4.0],
            [12.0, -6.0],
            [10.5, -5.5],
        ];
        let y = vec![0, 0, 0, 0, 1, 1, 1, 1];
        (x, y)
    }

    fn small_params() -> Hyperparameters {
        Hyperparameters {
            n_estimators: Some(25),
            max_depth: Some(4),
            ..Hyperparameters::default()
        }
    }

    #[test]
    fn learns_a_separable_problem() {
        let (x, y) = separable();
        let forest = RandomForestClassifier::fit(&x, &y, &small_params());
        assert_eq!(forest.n_trees(), 25);
        assert_eq!(forest.predict(&x).to_vec(), y);
    }

    #[test]
    fn probabilities_stay_in_unit_interval() {
        let (x, y) = separable();
        let forest = RandomForestClassifier::fit(&x, &y, &small_params());
        for p in forest.predict_proba(&x) {
            assert!((0.0..=1.0).contains(&p), "probability {p} out of range");
        }
    }

    #[test]
    fn same_seed_fits_identical_forests() {
        let (x, y) = separable();
        let a = RandomForestClassifier::fit(&x, &y, &small_params());
        let b = RandomForestClassifier::fit(&x, &y, &small_params());
        assert_eq!(a, b);
    }

    #[test]
    fn serde_round_trip_preserves_predictions() {
        let (x, y) = separable();
        let forest = RandomForestClassifier::fit(&x, &y, &small_params());
        let json = serde_json::to_string(&forest).unwrap();
        let restored: RandomForestClassifier = serde_json::from_str(&json).unwrap();
        assert_eq!(restored.predict_proba(&x), forest.predict_proba(&x));
    }
}
