//! Statistical primitives for the delay-prediction pipeline
//!
//! This crate provides the measurement side of the system: descriptive
//! statistics consumed by the feature scaler, and binary classification
//! metrics computed on held-out predictions.
//!
//! # Modules
//!
//! - [`descriptive`]: Central tendency and dispersion of a numeric column
//! - [`confusion`]: Binary confusion matrix from label/prediction pairs
//! - [`classification`]: Accuracy, precision, recall, F1 and a text report
//!
//! The crate is intentionally dependency-free so that every downstream crate
//! (encoder, trainer, evaluation CLI) can use it without pulling anything
//! else in.

pub mod classification;
pub mod confusion;
pub mod descriptive;
