//! Inference service for flight delay prediction
//!
//! [`service::PredictionService`] owns the loaded artifact pair for one
//! model family and scores single prediction requests against it. The pair
//! is loaded once at process start; if loading fails the service runs
//! degraded, failing every prediction fast with a model-unavailable error
//! instead of guessing. The routing layer gates request acceptance on
//! [`service::PredictionService::is_ready`].
//!
//! The loaded pair is shared, read-only state: `transform` and `predict`
//! never mutate it, so unbounded concurrent predictions need no
//! coordination. The only mutation — swapping in a newly trained pair —
//! replaces one `Arc` behind a lock, so an in-flight prediction holds
//! either the old pair or the new pair, never a model from one run and an
//! encoder from another.

pub mod request;
pub mod service;
