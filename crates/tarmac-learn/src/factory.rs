//! Model factory
//!
//! The single place a family key string becomes a configured classifier.
//! Validation happens here, at training-setup time: an unrecognized key is
//! an error before any historical data is read, and no default family is
//! ever substituted.

use crate::{
    family::{ModelFamily, UnsupportedModelFamily},
    model::UntrainedClassifier,
    params::Hyperparameters,
};

/// Builds an untrained classifier from a family key and hyperparameters.
///
/// # Errors
///
/// [`UnsupportedModelFamily`] for any key outside
/// [`ModelFamily::ALL`].
///
/// # Examples
///
/// ```
/// # use tarmac_learn::factory;
/// # use tarmac_learn::params::Hyperparameters;
/// let model = factory::create("random_forest", Hyperparameters::default()).unwrap();
/// assert!(factory::create("unsupported_x", Hyperparameters::default()).is_err());
/// ```
pub fn create(
    family_key: &str,
    params: Hyperparameters,
) -> Result<UntrainedClassifier, UnsupportedModelFamily> {
    let family: ModelFamily = family_key.parse()?;
    Ok(UntrainedClassifier::new(family, params))
}
