//! Classifier construction and dispatch

use ndarray::{Array1, Array2};
use serde::{Deserialize, Serialize};

use crate::{
    boosting::GradientBoostingClassifier, family::ModelFamily, forest::RandomForestClassifier,
    logistic::LogisticRegressionClassifier, params::Hyperparameters,
};

/// A classifier that has been configured but not yet fit.
///
/// Produced by the factory; holds the resolved family and the operator's
/// hyperparameters until the trainer has a matrix to fit on.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UntrainedClassifier {
    family: ModelFamily,
    params: Hyperparameters,
}

impl UntrainedClassifier {
    /// Bundles a family with its hyperparameters.
    #[must_use]
    pub fn new(family: ModelFamily, params: Hyperparameters) -> Self {
        Self { family, params }
    }

    /// The configured family.
    #[must_use]
    pub fn family(&self) -> ModelFamily {
        self.family
    }

    /// The configured hyperparameters.
    #[must_use]
    pub fn params(&self) -> &Hyperparameters {
        &self.params
    }

    /// Fits the configured family on an encoded matrix.
    #[must_use]
    pub fn fit(&self, x: &Array2<f64>, y: &[u8]) -> TrainedClassifier {
        match self.family {
            ModelFamily::RandomForest => {
                TrainedClassifier::RandomForest(RandomForestClassifier::fit(x, y, &self.params))
            }
            ModelFamily::LogisticRegression => TrainedClassifier::LogisticRegression(
                LogisticRegressionClassifier::fit(x, y, &self.params),
            ),
            ModelFamily::GradientBoosting => TrainedClassifier::GradientBoosting(
                GradientBoostingClassifier::fit(x, y, &self.params),
            ),
        }
    }
}

/// A fitted binary classifier of any supported family.
///
/// The learned parameters are opaque outside this crate; callers score
/// matrices through [`predict`](TrainedClassifier::predict) and
/// [`predict_proba`](TrainedClassifier::predict_proba). The hard decision
/// is each model's own rule — callers must not recompute it from the
/// probabilities.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "family", rename_all = "snake_case")]
pub enum TrainedClassifier {
    RandomForest(RandomForestClassifier),
    LogisticRegression(LogisticRegressionClassifier),
    GradientBoosting(GradientBoostingClassifier),
}

impl TrainedClassifier {
    /// The family this model belongs to.
    #[must_use]
    pub fn family(&self) -> ModelFamily {
        match self {
            TrainedClassifier::RandomForest(_) => ModelFamily::RandomForest,
            TrainedClassifier::LogisticRegression(_) => ModelFamily::LogisticRegression,
            TrainedClassifier::GradientBoosting(_) => ModelFamily::GradientBoosting,
        }
    }

    /// Positive-class probabilities, one per matrix row.
    #[must_use]
    pub fn predict_proba(&self, x: &Array2<f64>) -> Array1<f64> {
        match self {
            TrainedClassifier::RandomForest(model) => model.predict_proba(x),
            TrainedClassifier::LogisticRegression(model) => model.predict_proba(x),
            TrainedClassifier::GradientBoosting(model) => model.predict_proba(x),
        }
    }

    /// Hard decisions, one per matrix row.
    #[must_use]
    pub fn predict(&self, x: &Array2<f64>) -> Array1<u8> {
        match self {
            TrainedClassifier::RandomForest(model) => model.predict(x),
            TrainedClassifier::LogisticRegression(model) => model.predict(x),
            TrainedClassifier::GradientBoosting(model) => model.predict(x),
        }
    }
}
