//! Random hyperparameter search
//!
//! Each trial samples a candidate from the search space, runs the trainer
//! end to end, and records the held-out F1. Trials share nothing: every
//! one re-samples the data and re-fits its own encoder, so no candidate's
//! score leaks state from another. That repeats sampling work on purpose.
//!
//! After the trials the winner is trained once more, so the artifact left
//! in the store is the best candidate's pair rather than whichever trial
//! happened to run last.

use rand::{Rng, SeedableRng as _};
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};
use tarmac_data::record::FlightRecord;
use tarmac_learn::{family::ModelFamily, params::Hyperparameters};
use tracing::info;

use crate::{
    artifact::ArtifactStore,
    trainer::{RunMetrics, TrainError, TrainerConfig, train},
};

/// Inclusive integer range to draw a knob from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct IntDomain {
    pub low: usize,
    pub high: usize,
}

/// Inclusive continuous range to draw a knob from, optionally on a log
/// scale (for knobs like regularization strength that span magnitudes).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FloatDomain {
    pub low: f64,
    pub high: f64,
    pub log_scale: bool,
}

impl IntDomain {
    fn sample(self, rng: &mut Pcg32) -> usize {
        rng.random_range(self.low..=self.high)
    }
}

impl FloatDomain {
    fn sample(self, rng: &mut Pcg32) -> f64 {
        if self.log_scale {
            let (low, high) = (self.low.ln(), self.high.ln());
            rng.random_range(low..=high).exp()
        } else {
            rng.random_range(self.low..=self.high)
        }
    }
}

/// The knobs a search may vary; unset knobs keep their defaults.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchSpace {
    pub n_estimators: Option<IntDomain>,
    pub max_depth: Option<IntDomain>,
    pub learning_rate: Option<FloatDomain>,
    pub c: Option<FloatDomain>,
}

impl SearchSpace {
    /// A reasonable space for each family's influential knobs.
    #[must_use]
    pub fn for_family(family: ModelFamily) -> Self {
        match family {
            ModelFamily::RandomForest => Self {
                n_estimators: Some(IntDomain { low: 50, high: 300 }),
                max_depth: Some(IntDomain { low: 4, high: 16 }),
                ..Self::default()
            },
            ModelFamily::LogisticRegression => Self {
                c: Some(FloatDomain {
                    low: 0.01,
                    high: 100.0,
                    log_scale: true,
                }),
                ..Self::default()
            },
            ModelFamily::GradientBoosting => Self {
                n_estimators: Some(IntDomain { low: 50, high: 300 }),
                max_depth: Some(IntDomain { low: 2, high: 6 }),
                learning_rate: Some(FloatDomain {
                    low: 0.01,
                    high: 0.3,
                    log_scale: true,
                }),
                ..Self::default()
            },
        }
    }

    fn sample(&self, rng: &mut Pcg32) -> Hyperparameters {
        Hyperparameters {
            n_estimators: self.n_estimators.map(|d| d.sample(rng)),
            max_depth: self.max_depth.map(|d| d.sample(rng)),
            learning_rate: self.learning_rate.map(|d| d.sample(rng)),
            c: self.c.map(|d| d.sample(rng)),
            ..Hyperparameters::default()
        }
    }
}

/// One completed trial.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrialOutcome {
    pub trial: usize,
    pub params: Hyperparameters,
    pub metrics: RunMetrics,
}

/// Result of a whole search.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchOutcome {
    /// The winning trial (highest held-out F1).
    pub best: TrialOutcome,
    /// Every trial, in execution order.
    pub trials: Vec<TrialOutcome>,
}

/// Runs `n_trials` independent trainer invocations and keeps the best by
/// held-out F1.
///
/// The store ends up holding the winner's artifact pair: the best
/// candidate is re-trained once after the trials, overwriting whatever the
/// intermediate trials persisted.
///
/// # Errors
///
/// Propagates the first [`TrainError`] any trial raises; an unknown family
/// key fails on the first trial before data is read.
///
/// # Panics
///
/// Panics if `n_trials` is zero.
pub fn search(
    records: &[FlightRecord],
    family_key: &str,
    space: &SearchSpace,
    n_trials: usize,
    config: &TrainerConfig,
    store: &dyn ArtifactStore,
) -> Result<SearchOutcome, TrainError> {
    let mut rng = Pcg32::seed_from_u64(config.seed);
    let mut trials = Vec::with_capacity(n_trials);

    for trial in 0..n_trials {
        let params = space.sample(&mut rng);
        let run = train(records, family_key, params.clone(), config, store)?;
        info!(trial, f1 = run.metrics.f1, "search trial complete");
        trials.push(TrialOutcome {
            trial,
            params,
            metrics: run.metrics,
        });
    }

    let best = trials
        .iter()
        .max_by(|a, b| a.metrics.f1.total_cmp(&b.metrics.f1))
        .cloned()
        .expect("search requires at least one trial");

    // Leave the winner, not the last trial, in the store.
    train(records, family_key, best.params.clone(), config, store)?;
    info!(
        best_trial = best.trial,
        f1 = best.metrics.f1,
        "search complete; best candidate re-trained"
    );

    Ok(SearchOutcome { best, trials })
}
