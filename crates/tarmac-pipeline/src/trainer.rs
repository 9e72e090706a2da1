//! End-to-end training runs
//!
//! One invocation of [`train`] is the whole pipeline: resolve the model
//! family (an unknown key fails before any data is touched), draw the
//! stratified sample, fit the feature encoding, split train/test, fit the
//! classifier, score the held-out partition, and persist the model/encoder
//! pair as one artifact. Metrics are computed on held-out rows only —
//! training rows never appear in a reported number.
//!
//! All randomness (sample, split, bootstrap) derives from the seed in
//! [`TrainerConfig`], so a run over the same historical data reproduces
//! exactly.

use chrono::Utc;
use serde::{Deserialize, Serialize};
use tarmac_data::{
    frame::Frame,
    record::FlightRecord,
    sample::{self, StratifiedSampler},
};
use tarmac_features::encoder::{EncodeError, EncoderSpec, FittedEncoder};
use tarmac_learn::{
    factory, family::UnsupportedModelFamily, params::Hyperparameters,
};
use tarmac_stats::{
    classification::{ClassificationMetrics, classification_report},
    confusion::ConfusionMatrix,
};
use tracing::info;

use crate::{
    artifact::{ArtifactError, ArtifactPair, ArtifactStore},
    split::{self, stratified_split},
};

/// Error from a training run.
///
/// Component errors pass through unchanged; nothing here masks or retries.
#[derive(Debug, derive_more::Display, derive_more::Error)]
pub enum TrainError {
    /// The family key was rejected by the factory.
    #[display("{_0}")]
    UnsupportedModelFamily(UnsupportedModelFamily),
    /// No rows survived filtering and sampling.
    #[display("empty dataset: no rows survived filtering and sampling")]
    EmptyDataset,
    /// The encoder rejected the sampled frame.
    #[display("{_0}")]
    Encode(EncodeError),
    /// The artifact pair could not be persisted.
    #[display("{_0}")]
    Artifact(ArtifactError),
}

impl From<UnsupportedModelFamily> for TrainError {
    fn from(err: UnsupportedModelFamily) -> Self {
        TrainError::UnsupportedModelFamily(err)
    }
}

impl From<EncodeError> for TrainError {
    fn from(err: EncodeError) -> Self {
        TrainError::Encode(err)
    }
}

impl From<ArtifactError> for TrainError {
    fn from(err: ArtifactError) -> Self {
        TrainError::Artifact(err)
    }
}

/// Run-level configuration shared by every family.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrainerConfig {
    /// Fraction of the historical data sampled for the run.
    pub sample_fraction: f64,
    /// Fraction of the sample held out for evaluation.
    pub test_fraction: f64,
    /// Seed for sampling, splitting and model fitting.
    pub seed: u64,
}

impl Default for TrainerConfig {
    fn default() -> Self {
        Self {
            sample_fraction: sample::DEFAULT_FRACTION,
            test_fraction: split::DEFAULT_TEST_FRACTION,
            seed: sample::DEFAULT_SEED,
        }
    }
}

/// Held-out metrics of a run, in serializable form.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RunMetrics {
    pub accuracy: f64,
    pub precision: f64,
    pub recall: f64,
    pub f1: f64,
}

impl From<ClassificationMetrics> for RunMetrics {
    fn from(metrics: ClassificationMetrics) -> Self {
        Self {
            accuracy: metrics.accuracy,
            precision: metrics.precision,
            recall: metrics.recall,
            f1: metrics.f1,
        }
    }
}

/// Everything a completed training run produced.
#[derive(Debug)]
pub struct TrainingRun {
    /// The persisted model/encoder pair.
    pub artifact: ArtifactPair,
    /// Held-out metrics.
    pub metrics: RunMetrics,
    /// Per-class text report over the held-out partition.
    pub report: String,
    /// Whether the sample kept the stratification guarantee.
    pub stratified_sample: bool,
    /// Rows in the training partition.
    pub train_rows: usize,
    /// Rows in the held-out partition.
    pub test_rows: usize,
}

/// Runs the full training pipeline for one model family.
///
/// # Errors
///
/// [`TrainError::UnsupportedModelFamily`] for an unknown family key
/// (raised before the historical data is read),
/// [`TrainError::EmptyDataset`] when nothing survives sampling,
/// [`TrainError::Encode`] for schema mismatches, and
/// [`TrainError::Artifact`] when persistence fails.
pub fn train(
    records: &[FlightRecord],
    family_key: &str,
    params: Hyperparameters,
    config: &TrainerConfig,
    store: &dyn ArtifactStore,
) -> Result<TrainingRun, TrainError> {
    // Configuration errors must surface before any data is touched.
    let untrained = factory::create(family_key, params)?;
    let family = untrained.family();

    let sampler = StratifiedSampler::new(config.sample_fraction).with_seed(config.seed);
    let outcome = sampler.sample(records);
    if outcome.records.is_empty() {
        return Err(TrainError::EmptyDataset);
    }
    info!(
        family = %family,
        rows = outcome.records.len(),
        stratified = outcome.stratified,
        "training sample drawn"
    );

    let frame = Frame::from_records(&outcome.records);
    let fit = FittedEncoder::fit(&frame, EncoderSpec::default())?;

    let split = stratified_split(
        &fit.matrix,
        &fit.labels.to_vec(),
        config.test_fraction,
        config.seed,
    );
    let model = untrained.fit(&split.train_x, &split.train_y);

    let predicted = model.predict(&split.test_x).to_vec();
    let confusion = ConfusionMatrix::from_labels(&split.test_y, &predicted);
    let metrics = RunMetrics::from(ClassificationMetrics::from_confusion(&confusion));
    let report = classification_report(&confusion);
    info!(
        family = %family,
        accuracy = metrics.accuracy,
        f1 = metrics.f1,
        "held-out evaluation complete"
    );

    let artifact = ArtifactPair {
        family,
        trained_at: Utc::now(),
        hyperparameters: untrained.params().clone(),
        metrics,
        encoder: fit.encoder,
        model,
    };
    store.save(&artifact)?;

    Ok(TrainingRun {
        artifact,
        metrics,
        report,
        stratified_sample: outcome.stratified,
        train_rows: split.train_y.len(),
        test_rows: split.test_y.len(),
    })
}

#[cfg(test)]
pub(crate) mod tests {
    use tarmac_learn::family::ModelFamily;

    use super::*;
    use crate::artifact::FsArtifactStore;

    /// Labeled records where long flights run late; enough signal for any
    /// family to beat chance, enough rows to survive a 50% sample.
    pub(crate) fn synthetic_records(n: usize) -> Vec<FlightRecord> {
        (0..n)
            .map(|i| {
                let late = i % 5 == 0;
                let base_distance = if late { 2200.0 } else { 400.0 };
                FlightRecord {
                    month: (i % 12 + 1).try_into().unwrap(),
                    day_of_week: (i % 7 + 1).try_into().unwrap(),
                    crs_dep_time: if late { 1900 } else { 800 },
                    crs_arr_time: if late { 2300 } else { 1000 },
                    crs_elapsed_time: if late { 240 } else { 120 },
                    distance: base_distance + (i % 17) as f64,
                    unique_carrier: ["AA", "DL", "UA", "WN"][i % 4].to_string(),
                    origin: ["JFK", "ATL", "ORD"][i % 3].to_string(),
                    dest: ["LAX", "SFO", "SEA"][(i + 1) % 3].to_string(),
                    dep_time_blk: if late { "1900-1959" } else { "0800-0859" }.to_string(),
                    arr_del15: Some(u8::from(late)),
                }
            })
            .collect()
    }

    fn fast_params() -> Hyperparameters {
        Hyperparameters {
            n_estimators: Some(10),
            max_iter: Some(200),
            ..Hyperparameters::default()
        }
    }

    fn config() -> TrainerConfig {
        TrainerConfig {
            sample_fraction: 0.5,
            ..TrainerConfig::default()
        }
    }

    #[test]
    fn trains_and_persists_an_artifact_pair() {
        let dir = tempfile::tempdir().unwrap();
        let store = FsArtifactStore::new(dir.path());
        let records = synthetic_records(400);

        let run = train(&records, "random_forest", fast_params(), &config(), &store).unwrap();
        assert!(run.stratified_sample);
        assert_eq!(run.train_rows + run.test_rows, 200);
        assert!(run.metrics.accuracy > 0.6, "accuracy {}", run.metrics.accuracy);
        assert!(run.report.contains("delayed"));

        // The persisted pair matches what the run returned.
        let loaded = store.load(ModelFamily::RandomForest).unwrap();
        assert_eq!(loaded.encoder, run.artifact.encoder);
        assert_eq!(loaded.model, run.artifact.model);
    }

    #[test]
    fn unknown_family_fails_before_touching_data() {
        let dir = tempfile::tempdir().unwrap();
        let store = FsArtifactStore::new(dir.path());

        // An empty dataset would fail later; the factory must reject the
        // key before the data is even looked at.
        let err = train(&[], "unsupported_x", Hyperparameters::default(), &config(), &store)
            .unwrap_err();
        assert!(matches!(err, TrainError::UnsupportedModelFamily(_)));
    }

    #[test]
    fn empty_dataset_fails_the_run() {
        let dir = tempfile::tempdir().unwrap();
        let store = FsArtifactStore::new(dir.path());

        let err = train(&[], "random_forest", Hyperparameters::default(), &config(), &store)
            .unwrap_err();
        assert!(matches!(err, TrainError::EmptyDataset));
        assert!(store.load(ModelFamily::RandomForest).is_err());
    }

    #[test]
    fn unlabeled_rows_alone_are_an_empty_dataset() {
        let dir = tempfile::tempdir().unwrap();
        let store = FsArtifactStore::new(dir.path());
        let mut records = synthetic_records(10);
        for record in &mut records {
            record.arr_del15 = None;
        }

        let err = train(&records, "random_forest", Hyperparameters::default(), &config(), &store)
            .unwrap_err();
        assert!(matches!(err, TrainError::EmptyDataset));
    }

    #[test]
    fn every_family_trains_on_the_same_data() {
        let dir = tempfile::tempdir().unwrap();
        let store = FsArtifactStore::new(dir.path());
        let records = synthetic_records(400);

        for family in ModelFamily::ALL {
            let run = train(&records, family.key(), fast_params(), &config(), &store).unwrap();
            assert_eq!(run.artifact.family, family);
            assert!(store.load(family).is_ok());
        }
    }

    #[test]
    fn reruns_are_reproducible_apart_from_the_timestamp() {
        let dir = tempfile::tempdir().unwrap();
        let store = FsArtifactStore::new(dir.path());
        let records = synthetic_records(300);

        let first = train(&records, "logistic_regression", fast_params(), &config(), &store)
            .unwrap();
        let second = train(&records, "logistic_regression", fast_params(), &config(), &store)
            .unwrap();
        assert_eq!(first.artifact.model, second.artifact.model);
        assert_eq!(first.artifact.encoder, second.artifact.encoder);
        assert_eq!(first.metrics, second.metrics);
    }
}
