//! Binary classifiers for flight delay prediction
//!
//! This crate implements the closed set of model families the trainer can
//! fit, hand-built on `ndarray` matrices:
//!
//! - [`forest::RandomForestClassifier`]: bagged decision trees with
//!   per-split feature subsampling
//! - [`logistic::LogisticRegressionClassifier`]: L2-regularized logistic
//!   regression fit by gradient descent
//! - [`boosting::GradientBoostingClassifier`]: gradient-boosted regression
//!   trees on the logistic loss
//!
//! # Construction
//!
//! Models are constructed through the factory ([`factory::create`]) from a
//! family key and a [`params::Hyperparameters`] set; unknown keys fail with
//! [`family::UnsupportedModelFamily`] before any data is touched. Every
//! family supports class reweighting — delay labels are heavily imbalanced,
//! so `balanced` weighting is the default rather than an option bolted on
//! later.
//!
//! # Determinism
//!
//! All stochastic steps (bootstrap draws, feature subsampling) run on a
//! seeded PCG generator taken from the hyperparameters, so a fit over the
//! same matrix reproduces exactly.
//!
//! Trained models serialize with serde; the learned parameters are opaque
//! to every other crate, which interact only through
//! [`model::TrainedClassifier::predict`] and
//! [`model::TrainedClassifier::predict_proba`].

pub mod boosting;
pub mod factory;
pub mod family;
pub mod forest;
pub mod logistic;
pub mod model;
pub mod params;
pub mod tree;
