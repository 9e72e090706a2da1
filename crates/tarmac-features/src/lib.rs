//! Feature encoding for flight delay prediction
//!
//! This crate is the single source of truth for how a flight record becomes
//! model input. The transformation is fit once per training run and frozen:
//!
//! 1. **Scaling** ([`scaler::ColumnScaler`]): each numeric column is
//!    standardized with mean and standard deviation computed at fit time
//! 2. **Vocabulary encoding** ([`vocabulary::CategoryVocabulary`]): each
//!    categorical column is one-hot encoded against the sorted set of
//!    categories observed at fit time
//! 3. **Assembly** ([`encoder::FittedEncoder`]): scaled numerics followed by
//!    one-hot blocks, in a column order that never changes after fit
//!
//! Every record scored later — evaluation rows or a single live inference
//! request — goes through [`encoder::FittedEncoder::transform`] with this
//! frozen state, so the matrix a model sees at inference has exactly the
//! width and column order it was trained on. A category value never seen at
//! fit time encodes as an all-zero block and is logged for drift
//! monitoring; it is not an error.
//!
//! The fitted state serializes with serde and is persisted next to the
//! model it was fit for; the two travel as one artifact.

pub mod encoder;
pub mod scaler;
pub mod vocabulary;
