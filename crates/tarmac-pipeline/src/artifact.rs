//! Artifact pairs and their store
//!
//! A trained model is only usable with the encoder state it was fit
//! beside: the matrix width, column order and category codes all come from
//! that one fit. [`ArtifactPair`] makes the pairing structural — the two
//! halves are constructed, persisted and loaded as a single unit, keyed by
//! model family — so no artifact shuffle can pair a model with a foreign
//! encoder.
//!
//! The store keeps exactly one pair per family ("latest wins"); a new
//! training run for a family atomically replaces its predecessor.

use std::{
    fs::{self, File},
    io::{BufReader, BufWriter},
    path::PathBuf,
};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tarmac_features::encoder::FittedEncoder;
use tarmac_learn::{
    family::ModelFamily,
    model::TrainedClassifier,
    params::Hyperparameters,
};
use tracing::info;

use crate::trainer::RunMetrics;

/// A trained model and the encoder state it was fit beside, as one unit of
/// deployment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ArtifactPair {
    /// The family key; also the store key.
    pub family: ModelFamily,
    /// When the pair was produced.
    pub trained_at: DateTime<Utc>,
    /// The hyperparameters the run was configured with.
    pub hyperparameters: Hyperparameters,
    /// Held-out metrics of the run that produced the pair.
    pub metrics: RunMetrics,
    /// The frozen feature encoding.
    pub encoder: FittedEncoder,
    /// The fitted classifier.
    pub model: TrainedClassifier,
}

/// Error talking to an artifact store.
#[derive(Debug, derive_more::Display, derive_more::Error)]
pub enum ArtifactError {
    #[display("no artifact stored for family '{family}' at {path}")]
    Missing { family: ModelFamily, path: String },
    #[display("failed to read artifact {path}: {source}")]
    Read {
        path: String,
        source: std::io::Error,
    },
    #[display("failed to write artifact {path}: {source}")]
    Write {
        path: String,
        source: std::io::Error,
    },
    #[display("failed to decode artifact {path}: {source}")]
    Decode {
        path: String,
        source: serde_json::Error,
    },
    #[display("failed to encode artifact for family '{family}': {source}")]
    Encode {
        family: ModelFamily,
        source: serde_json::Error,
    },
}

/// Key-value persistence for artifact pairs, keyed by model family.
///
/// The trainer writes; the inference adapter reads at startup.
pub trait ArtifactStore {
    /// Persists a pair, replacing any previous pair for the same family.
    fn save(&self, pair: &ArtifactPair) -> Result<(), ArtifactError>;

    /// Loads the current pair for a family.
    fn load(&self, family: ModelFamily) -> Result<ArtifactPair, ArtifactError>;
}

/// Filesystem store: one JSON document per family under a base directory.
#[derive(Debug, Clone)]
pub struct FsArtifactStore {
    dir: PathBuf,
}

impl FsArtifactStore {
    /// Creates a store rooted at `dir`. The directory is created on first
    /// save.
    #[must_use]
    pub fn new<P>(dir: P) -> Self
    where
        P: Into<PathBuf>,
    {
        Self { dir: dir.into() }
    }

    fn pair_path(&self, family: ModelFamily) -> PathBuf {
        self.dir.join(format!("{family}.json"))
    }
}

impl ArtifactStore for FsArtifactStore {
    fn save(&self, pair: &ArtifactPair) -> Result<(), ArtifactError> {
        let path = self.pair_path(pair.family);
        let display_path = path.display().to_string();

        fs::create_dir_all(&self.dir).map_err(|source| ArtifactError::Write {
            path: display_path.clone(),
            source,
        })?;

        // Write the new pair beside the old one, then swap in a single
        // rename, so a concurrent load sees the old pair or the new pair.
        let staging = path.with_extension("json.tmp");
        let file = File::create(&staging).map_err(|source| ArtifactError::Write {
            path: display_path.clone(),
            source,
        })?;
        serde_json::to_writer(BufWriter::new(file), pair).map_err(|source| {
            ArtifactError::Encode {
                family: pair.family,
                source,
            }
        })?;
        fs::rename(&staging, &path).map_err(|source| ArtifactError::Write {
            path: display_path.clone(),
            source,
        })?;

        info!(family = %pair.family, path = display_path, "artifact pair saved");
        Ok(())
    }

    fn load(&self, family: ModelFamily) -> Result<ArtifactPair, ArtifactError> {
        let path = self.pair_path(family);
        let display = path.display().to_string();

        if !path.exists() {
            return Err(ArtifactError::Missing {
                family,
                path: display,
            });
        }
        let file = File::open(&path).map_err(|source| ArtifactError::Read {
            path: display.clone(),
            source,
        })?;
        serde_json::from_reader(BufReader::new(file)).map_err(|source| ArtifactError::Decode {
            path: display,
            source,
        })
    }
}

#[cfg(test)]
mod tests {
    use tarmac_data::frame::Frame;
    use tarmac_data::record::FlightRecord;
    use tarmac_features::encoder::{EncoderSpec, FittedEncoder};
    use tarmac_learn::model::UntrainedClassifier;

    use super::*;

    fn record(distance: f64, label: u8) -> FlightRecord {
        FlightRecord {
            month: 3,
            day_of_week: 2,
            crs_dep_time: 900,
            crs_arr_time: 1100,
            crs_elapsed_time: 120,
            distance,
            unique_carrier: "AA".to_string(),
            origin: "JFK".to_string(),
            dest: "LAX".to_string(),
            dep_time_blk: "0900-0959".to_string(),
            arr_del15: Some(label),
        }
    }

    fn sample_pair() -> ArtifactPair {
        let records: Vec<FlightRecord> = (0..20)
            .map(|i| record(100.0 + f64::from(i) * 50.0, u8::from(i % 4 == 0)))
            .collect();
        let frame = Frame::from_records(&records);
        let fit = FittedEncoder::fit(&frame, EncoderSpec::default()).unwrap();
        let params = Hyperparameters {
            n_estimators: Some(5),
            ..Hyperparameters::default()
        };
        let model = UntrainedClassifier::new(ModelFamily::RandomForest, params.clone())
            .fit(&fit.matrix, &fit.labels.to_vec());
        ArtifactPair {
            family: ModelFamily::RandomForest,
            trained_at: Utc::now(),
            hyperparameters: params,
            metrics: RunMetrics {
                accuracy: 0.9,
                precision: 0.5,
                recall: 0.5,
                f1: 0.5,
            },
            encoder: fit.encoder,
            model,
        }
    }

    #[test]
    fn save_then_load_round_trips() {
        let dir = tempfile::tempdir().unwrap();
        let store = FsArtifactStore::new(dir.path());
        let pair = sample_pair();

        store.save(&pair).unwrap();
        let loaded = store.load(ModelFamily::RandomForest).unwrap();
        assert_eq!(loaded, pair);
    }

    #[test]
    fn save_overwrites_previous_pair_for_the_family() {
        let dir = tempfile::tempdir().unwrap();
        let store = FsArtifactStore::new(dir.path());

        let first = sample_pair();
        store.save(&first).unwrap();

        let mut second = sample_pair();
        second.metrics.f1 = 0.9;
        store.save(&second).unwrap();

        let loaded = store.load(ModelFamily::RandomForest).unwrap();
        assert_eq!(loaded.metrics.f1, 0.9);
    }

    #[test]
    fn missing_family_reports_missing() {
        let dir = tempfile::tempdir().unwrap();
        let store = FsArtifactStore::new(dir.path());
        let err = store.load(ModelFamily::GradientBoosting).unwrap_err();
        assert!(matches!(err, ArtifactError::Missing { .. }));
    }

    #[test]
    fn corrupt_artifact_reports_decode() {
        let dir = tempfile::tempdir().unwrap();
        let store = FsArtifactStore::new(dir.path());
        std::fs::create_dir_all(dir.path()).unwrap();
        std::fs::write(dir.path().join("random_forest.json"), b"not json").unwrap();
        let err = store.load(ModelFamily::RandomForest).unwrap_err();
        assert!(matches!(err, ArtifactError::Decode { .. }));
    }
}
