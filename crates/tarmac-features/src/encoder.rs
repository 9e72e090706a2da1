//! Fit/transform feature encoding
//!
//! [`FittedEncoder`] turns a [`Frame`] of flight data into the fixed-width
//! numeric matrix the classifiers consume. The column layout is frozen at
//! fit time: scaled numeric columns first (in spec order), then one one-hot
//! block per categorical column (categories in sorted order). `transform`
//! reuses that layout for any later input, including a one-row frame built
//! from a live prediction request, so matrix width and column order are
//! identical between training and inference by construction.
//!
//! Fit is defined as "compute statistics, then transform through them",
//! which makes the matrix returned by [`FittedEncoder::fit`] equal to a
//! subsequent [`FittedEncoder::transform`] over the same rows.

use std::collections::BTreeSet;

use ndarray::{Array1, Array2};
use serde::{Deserialize, Serialize};
use tarmac_data::{frame::Frame, schema};
use tracing::warn;

use crate::{scaler::ColumnScaler, vocabulary::CategoryVocabulary};

/// Error raised when an input frame does not match the encoder's columns.
#[derive(Debug, derive_more::Display, derive_more::Error)]
pub enum EncodeError {
    /// A required column is absent (or has the wrong type) in the input.
    #[display("schema mismatch: required column '{column}' is missing from the input")]
    SchemaMismatch { column: String },
    /// Fit was attempted over zero rows.
    #[display("cannot fit an encoder on an empty frame")]
    EmptyFit,
}

/// The column roles an encoder is fit over.
///
/// Defaults to the canonical flight schema. The column spec is stored
/// inside the fitted state so an artifact is self-describing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EncoderSpec {
    /// Columns passed through standardization, in output order.
    pub numeric: Vec<String>,
    /// Columns passed through one-hot encoding, in output-block order.
    pub categorical: Vec<String>,
    /// The label column extracted at fit time.
    pub label: String,
}

impl Default for EncoderSpec {
    fn default() -> Self {
        Self {
            numeric: schema::NUMERIC_COLUMNS.map(String::from).to_vec(),
            categorical: schema::CATEGORICAL_COLUMNS.map(String::from).to_vec(),
            label: schema::LABEL_COLUMN.to_string(),
        }
    }
}

/// Everything [`FittedEncoder::fit`] produces in one pass.
#[derive(Debug)]
pub struct FitOutput {
    /// The encoded training matrix, one row per input row.
    pub matrix: Array2<f64>,
    /// The binary label vector aligned with the matrix rows.
    pub labels: Array1<u8>,
    /// The frozen encoder state.
    pub encoder: FittedEncoder,
}

/// The frozen state of a fitted feature encoding.
///
/// Immutable after fit; persisted and versioned together with the model
/// trained on its output.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FittedEncoder {
    spec: EncoderSpec,
    scalers: Vec<ColumnScaler>,
    vocabularies: Vec<CategoryVocabulary>,
}

impl FittedEncoder {
    /// Fits the encoding over a labeled frame and encodes it.
    ///
    /// # Errors
    ///
    /// [`EncodeError::SchemaMismatch`] when any spec column (features or
    /// label) is absent; [`EncodeError::EmptyFit`] over zero rows.
    pub fn fit(frame: &Frame, spec: EncoderSpec) -> Result<FitOutput, EncodeError> {
        if frame.is_empty() {
            return Err(EncodeError::EmptyFit);
        }

        let mut scalers = Vec::with_capacity(spec.numeric.len());
        for column in &spec.numeric {
            let values = frame
                .numeric(column)
                .ok_or_else(|| EncodeError::SchemaMismatch {
                    column: column.clone(),
                })?;
            // Non-empty frame, so fit cannot fail here.
            scalers.push(ColumnScaler::fit(values).ok_or(EncodeError::EmptyFit)?);
        }

        let mut vocabularies = Vec::with_capacity(spec.categorical.len());
        for column in &spec.categorical {
            let values = frame
                .categorical(column)
                .ok_or_else(|| EncodeError::SchemaMismatch {
                    column: column.clone(),
                })?;
            vocabularies.push(CategoryVocabulary::fit(values));
        }

        let label_values = frame
            .numeric(&spec.label)
            .ok_or_else(|| EncodeError::SchemaMismatch {
                column: spec.label.clone(),
            })?;
        #[expect(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
        let labels = Array1::from_iter(label_values.iter().map(|&v| v as u8));

        let encoder = Self {
            spec,
            scalers,
            vocabularies,
        };
        let matrix = encoder.transform(frame)?;

        Ok(FitOutput {
            matrix,
            labels,
            encoder,
        })
    }

    /// Encodes a frame through the frozen state.
    ///
    /// Never mutates the state and never re-fits. Works for any row count,
    /// including the one-row frame of a live prediction request. A category
    /// value absent from the fit-time vocabulary encodes as an all-zero
    /// block in its column range and is logged once per distinct value as a
    /// drift signal.
    ///
    /// # Errors
    ///
    /// [`EncodeError::SchemaMismatch`] when a feature column is absent.
    /// The label column is not required.
    pub fn transform(&self, frame: &Frame) -> Result<Array2<f64>, EncodeError> {
        let rows = frame.len();
        let mut matrix = Array2::zeros((rows, self.width()));

        for (j, (column, scaler)) in self.spec.numeric.iter().zip(&self.scalers).enumerate() {
            let values = frame
                .numeric(column)
                .ok_or_else(|| EncodeError::SchemaMismatch {
                    column: column.clone(),
                })?;
            for (i, &value) in values.iter().enumerate() {
                matrix[[i, j]] = scaler.transform(value);
            }
        }

        let mut offset = self.spec.numeric.len();
        for (column, vocabulary) in self.spec.categorical.iter().zip(&self.vocabularies) {
            let values = frame
                .categorical(column)
                .ok_or_else(|| EncodeError::SchemaMismatch {
                    column: column.clone(),
                })?;
            let mut unseen = BTreeSet::new();
            for (i, value) in values.iter().enumerate() {
                match vocabulary.code(value) {
                    Some(code) => matrix[[i, offset + code]] = 1.0,
                    None => {
                        // Zero block; the matrix row stays aligned.
                        unseen.insert(value.as_str());
                    }
                }
            }
            for value in unseen {
                warn!(column, value, "category not seen at fit time; encoded as zero block");
            }
            offset += vocabulary.len();
        }

        Ok(matrix)
    }

    /// Width of the encoded matrix: numeric columns plus the sum of all
    /// vocabulary sizes.
    #[must_use]
    pub fn width(&self) -> usize {
        self.spec.numeric.len()
            + self
                .vocabularies
                .iter()
                .map(CategoryVocabulary::len)
                .sum::<usize>()
    }

    /// Human-readable names for every output column, in matrix order.
    #[must_use]
    pub fn feature_names(&self) -> Vec<String> {
        let mut names = self.spec.numeric.clone();
        for (column, vocabulary) in self.spec.categorical.iter().zip(&self.vocabularies) {
            for category in vocabulary.categories() {
                names.push(format!("{column}={category}"));
            }
        }
        names
    }

    /// The column spec the encoder was fit with.
    #[must_use]
    pub fn spec(&self) -> &EncoderSpec {
        &self.spec
    }
}
