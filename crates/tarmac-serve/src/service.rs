//! The prediction service

use std::sync::Arc;

use parking_lot::RwLock;
use tarmac_data::frame::Frame;
use tarmac_features::encoder::EncodeError;
use tarmac_learn::family::ModelFamily;
use tarmac_pipeline::artifact::{ArtifactError, ArtifactPair, ArtifactStore};
use tracing::{error, info};

use crate::request::{PredictionRequest, PredictionResponse};

/// Decimal digits reported to callers.
const PROBABILITY_DECIMALS: i32 = 4;

/// Error scoring a prediction request.
#[derive(Debug, derive_more::Display, derive_more::Error)]
pub enum ServeError {
    /// No valid artifact pair is loaded; the service is degraded.
    #[display("model unavailable for family '{family}': {reason}")]
    ModelUnavailable { family: ModelFamily, reason: String },
    /// The request could not be encoded (propagated unchanged).
    #[display("{_0}")]
    Encode(EncodeError),
}

impl From<EncodeError> for ServeError {
    fn from(err: EncodeError) -> Self {
        ServeError::Encode(err)
    }
}

/// Process-wide inference state for one model family.
///
/// Constructed at process start, handed out behind an `Arc`, and consulted
/// by every prediction call. The artifact slot is empty when loading
/// failed; predictions then fail fast until a successful
/// [`reload`](PredictionService::reload).
#[derive(Debug)]
pub struct PredictionService {
    family: ModelFamily,
    slot: RwLock<Option<Arc<ArtifactPair>>>,
}

impl PredictionService {
    /// Creates the service by loading the family's pair from the store.
    ///
    /// A load failure does not abort startup: the service comes up
    /// degraded (health reports not-ready) and the failure is logged.
    #[must_use]
    pub fn load_from(store: &dyn ArtifactStore, family: ModelFamily) -> Self {
        let slot = match store.load(family) {
            Ok(pair) => {
                info!(family = %family, "artifact pair loaded");
                Some(Arc::new(pair))
            }
            Err(err) => {
                error!(family = %family, error = %err, "artifact pair failed to load; serving degraded");
                None
            }
        };
        Self {
            family,
            slot: RwLock::new(slot),
        }
    }

    /// The health signal: whether a valid pair is currently loaded.
    #[must_use]
    pub fn is_ready(&self) -> bool {
        self.slot.read().is_some()
    }

    /// The family this service scores.
    #[must_use]
    pub fn family(&self) -> ModelFamily {
        self.family
    }

    /// Replaces the loaded pair with the store's current one.
    ///
    /// The swap is a single `Arc` replacement: a prediction in flight
    /// keeps the pair it already cloned, and every later call sees the new
    /// pair whole. On failure the previous pair (if any) stays in place.
    ///
    /// # Errors
    ///
    /// Propagates the store's [`ArtifactError`] unchanged.
    pub fn reload(&self, store: &dyn ArtifactStore) -> Result<(), ArtifactError> {
        let pair = Arc::new(store.load(self.family)?);
        *self.slot.write() = Some(pair);
        info!(family = %self.family, "artifact pair reloaded");
        Ok(())
    }

    /// Scores one flight.
    ///
    /// The request is wrapped as a one-row frame and transformed through
    /// the loaded encoder exactly as training left it — never re-fit — so
    /// the model sees its training-time column layout. The reported label
    /// is the model's own decision; the probability is the positive-class
    /// estimate rounded to 4 decimals.
    ///
    /// # Errors
    ///
    /// [`ServeError::ModelUnavailable`] while degraded;
    /// [`ServeError::Encode`] if the request cannot be encoded.
    pub fn predict(&self, request: &PredictionRequest) -> Result<PredictionResponse, ServeError> {
        let Some(pair) = self.slot.read().clone() else {
            return Err(ServeError::ModelUnavailable {
                family: self.family,
                reason: "no artifact pair loaded".to_string(),
            });
        };

        let frame = Frame::from_record(&request.to_record());
        let matrix = pair.encoder.transform(&frame)?;
        let prediction = pair.model.predict(&matrix)[0];
        let probability = pair.model.predict_proba(&matrix)[0];

        Ok(PredictionResponse {
            prediction,
            delay_probability: round_probability(probability),
        })
    }
}

fn round_probability(p: f64) -> f64 {
    let scale = f64::from(10i32.pow(PROBABILITY_DECIMALS.unsigned_abs()));
    (p * scale).round() / scale
}

#[cfg(test)]
mod tests {
    use chrono::Utc;
    use tarmac_data::record::FlightRecord;
    use tarmac_features::encoder::{EncoderSpec, FittedEncoder};
    use tarmac_learn::{
        model::UntrainedClassifier,
        params::Hyperparameters,
    };
    use tarmac_pipeline::{artifact::FsArtifactStore, trainer::RunMetrics};

    use super::*;

    fn record(i: usize, label: u8) -> FlightRecord {
        FlightRecord {
            month: (i % 12 + 1).try_into().unwrap(),
            day_of_week: (i % 7 + 1).try_into().unwrap(),
            crs_dep_time: if label == 1 { 1900 } else { 800 },
            crs_arr_time: if label == 1 { 2300 } else { 1000 },
            crs_elapsed_time: 120,
            distance: 300.0 + (i as f64) * 25.0,
            unique_carrier: ["AA", "DL", "UA"][i % 3].to_string(),
            origin: ["JFK", "ATL"][i % 2].to_string(),
            dest: ["LAX", "SFO"][(i + 1) % 2].to_string(),
            dep_time_blk: if label == 1 { "1900-1959" } else { "0800-0859" }.to_string(),
            arr_del15: Some(label),
        }
    }

    fn trained_pair() -> ArtifactPair {
        let records: Vec<FlightRecord> =
            (0..60).map(|i| record(i, u8::from(i % 3 == 0))).collect();
        let frame = Frame::from_records(&records);
        let fit = FittedEncoder::fit(&frame, EncoderSpec::default()).unwrap();
        let params = Hyperparameters {
            n_estimators: Some(10),
            ..Hyperparameters::default()
        };
        let model = UntrainedClassifier::new(ModelFamily::GradientBoosting, params.clone())
            .fit(&fit.matrix, &fit.labels.to_vec());
        ArtifactPair {
            family: ModelFamily::GradientBoosting,
            trained_at: Utc::now(),
            hyperparameters: params,
            metrics: RunMetrics {
                accuracy: 1.0,
                precision: 1.0,
                recall: 1.0,
                f1: 1.0,
            },
            encoder: fit.encoder,
            model,
        }
    }

    fn request() -> PredictionRequest {
        PredictionRequest {
            month: 3,
            day_of_week: 2,
            crs_dep_time: 900,
            crs_arr_time: 1100,
            crs_elapsed_time: 120,
            distance: 500.0,
            unique_carrier: "AA".to_string(),
            origin: "JFK".to_string(),
            dest: "LAX".to_string(),
            dep_time_blk: "0900-0959".to_string(),
        }
    }

    fn ready_service(dir: &std::path::Path) -> PredictionService {
        let store = FsArtifactStore::new(dir);
        store.save(&trained_pair()).unwrap();
        PredictionService::load_from(&store, ModelFamily::GradientBoosting)
    }

    #[test]
    fn scores_a_well_formed_request() {
        let dir = tempfile::tempdir().unwrap();
        let service = ready_service(dir.path());
        assert!(service.is_ready());

        let response = service.predict(&request()).unwrap();
        assert!(response.prediction == 0 || response.prediction == 1);
        assert!((0.0..=1.0).contains(&response.delay_probability));
    }

    #[test]
    fn probability_is_rounded_to_four_decimals() {
        let dir = tempfile::tempdir().unwrap();
        let service = ready_service(dir.path());
        let response = service.predict(&request()).unwrap();
        let scaled = response.delay_probability * 10_000.0;
        assert!((scaled - scaled.round()).abs() < 1e-9);
    }

    #[test]
    fn unseen_carrier_still_scores() {
        let dir = tempfile::tempdir().unwrap();
        let service = ready_service(dir.path());
        let mut unusual = request();
        unusual.unique_carrier = "ZZ".to_string();
        unusual.origin = "XNA".to_string();

        let response = service.predict(&unusual).unwrap();
        assert!((0.0..=1.0).contains(&response.delay_probability));
    }

    #[test]
    fn degraded_service_fails_fast() {
        let dir = tempfile::tempdir().unwrap();
        let store = FsArtifactStore::new(dir.path());
        let service = PredictionService::load_from(&store, ModelFamily::RandomForest);

        assert!(!service.is_ready());
        let err = service.predict(&request()).unwrap_err();
        assert!(matches!(err, ServeError::ModelUnavailable { .. }));
    }

    #[test]
    fn reload_brings_a_degraded_service_up() {
        let dir = tempfile::tempdir().unwrap();
        let store = FsArtifactStore::new(dir.path());
        let service = PredictionService::load_from(&store, ModelFamily::GradientBoosting);
        assert!(!service.is_ready());

        store.save(&trained_pair()).unwrap();
        service.reload(&store).unwrap();
        assert!(service.is_ready());
        assert!(service.predict(&request()).is_ok());
    }

    #[test]
    fn persisted_and_in_memory_pairs_predict_identically() {
        let dir = tempfile::tempdir().unwrap();
        let pair = trained_pair();
        let store = FsArtifactStore::new(dir.path());
        store.save(&pair).unwrap();
        let service = PredictionService::load_from(&store, ModelFamily::GradientBoosting);

        // Score the same request directly against the in-memory pair.
        let frame = Frame::from_record(&request().to_record());
        let matrix = pair.encoder.transform(&frame).unwrap();
        let direct_label = pair.model.predict(&matrix)[0];
        let direct_probability = pair.model.predict_proba(&matrix)[0];

        let response = service.predict(&request()).unwrap();
        assert_eq!(response.prediction, direct_label);
        assert!((response.delay_probability - round_probability(direct_probability)).abs() < 1e-12);
    }
}
