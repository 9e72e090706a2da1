//! L2-regularized logistic regression

use ndarray::{Array1, Array2};
use serde::{Deserialize, Serialize};

use crate::params::{Hyperparameters, sample_weights};

/// Gradient-descent step size. The encoder standardizes every numeric
/// column, so a fixed step converges without a line search.
const STEP_SIZE: f64 = 0.1;

/// Stop once the gradient norm falls below this.
const TOLERANCE: f64 = 1e-6;

/// Logistic regression fit by full-batch gradient descent.
///
/// The loss is class-weighted log-loss plus an L2 penalty of `1 / C` on the
/// coefficients (not the intercept), so larger `C` means weaker
/// regularization.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LogisticRegressionClassifier {
    coefficients: Vec<f64>,
    intercept: f64,
}

fn sigmoid(z: f64) -> f64 {
    1.0 / (1.0 + (-z).exp())
}

impl LogisticRegressionClassifier {
    /// Fits the model.
    ///
    /// # Panics
    ///
    /// Panics if `x` has zero rows; the trainer's empty-dataset check runs
    /// first.
    #[must_use]
    pub fn fit(x: &Array2<f64>, y: &[u8], params: &Hyperparameters) -> Self {
        assert!(x.nrows() > 0, "cannot fit logistic regression on zero rows");
        let weights = sample_weights(y, params.class_weight());
        let weight_total: f64 = weights.iter().sum();
        let penalty = 1.0 / params.c();

        let n_features = x.ncols();
        let mut coefficients = vec![0.0; n_features];
        let mut intercept = 0.0;

        for _ in 0..params.max_iter() {
            let mut gradient = vec![0.0; n_features];
            let mut intercept_gradient = 0.0;

            for (i, row) in x.rows().into_iter().enumerate() {
                let z = intercept
                    + row
                        .iter()
                        .zip(&coefficients)
                        .map(|(v, c)| v * c)
                        .sum::<f64>();
                let error = weights[i] * (sigmoid(z) - f64::from(y[i]));
                for (g, v) in gradient.iter_mut().zip(row) {
                    *g += error * v;
                }
                intercept_gradient += error;
            }

            let mut norm = 0.0;
            for (g, c) in gradient.iter_mut().zip(&coefficients) {
                *g = *g / weight_total + penalty * c / weight_total;
                norm += *g * *g;
            }
            intercept_gradient /= weight_total;
            norm += intercept_gradient * intercept_gradient;

            for (c, g) in coefficients.iter_mut().zip(&gradient) {
                *c -= STEP_SIZE * g;
            }
            intercept -= STEP_SIZE * intercept_gradient;

            if norm.sqrt() < TOLERANCE {
                break;
            }
        }

        Self {
            coefficients,
            intercept,
        }
    }

    /// Positive-class probabilities.
    #[must_use]
    pub fn predict_proba(&self, x: &Array2<f64>) -> Array1<f64> {
        Array1::from_iter(x.rows().into_iter().map(|row| {
            let z = self.intercept
                + row
                    .iter()
                    .zip(&self.coefficients)
                    .map(|(v, c)| v * c)
                    .sum::<f64>();
            sigmoid(z)
        }))
    }

    /// Hard decisions at the model's 0.5 probability threshold.
    #[must_use]
    pub fn predict(&self, x: &Array2<f64>) -> Array1<u8> {
        self.predict_proba(x).mapv(|p| u8::from(p >= 0.5))
    }
}
