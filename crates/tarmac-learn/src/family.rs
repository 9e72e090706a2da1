//! Model family identifiers

use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

/// The closed set of supported classifier families.
///
/// Family keys are the snake_case strings used on the CLI and as artifact
/// store keys: `random_forest`, `logistic_regression`, `gradient_boosting`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ModelFamily {
    /// Bagged decision trees.
    RandomForest,
    /// L2-regularized logistic regression.
    LogisticRegression,
    /// Gradient-boosted trees on the logistic loss.
    GradientBoosting,
}

impl ModelFamily {
    /// Every supported family, in training-comparison order.
    pub const ALL: [ModelFamily; 3] = [
        ModelFamily::RandomForest,
        ModelFamily::LogisticRegression,
        ModelFamily::GradientBoosting,
    ];

    /// The family's stable string key.
    #[must_use]
    pub fn key(self) -> &'static str {
        match self {
            ModelFamily::RandomForest => "random_forest",
            ModelFamily::LogisticRegression => "logistic_regression",
            ModelFamily::GradientBoosting => "gradient_boosting",
        }
    }
}

impl fmt::Display for ModelFamily {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

/// Error for a family key outside the supported set.
///
/// Configuration mistakes fail here, before any data is read; the factory
/// never substitutes a default family for an unrecognized key.
#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display, derive_more::Error)]
#[display("unsupported model family '{family}'")]
pub struct UnsupportedModelFamily {
    /// The key that failed to parse.
    pub family: String,
}

impl FromStr for ModelFamily {
    type Err = UnsupportedModelFamily;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|family| family.key() == s)
            .ok_or_else(|| UnsupportedModelFamily {
                family: s.to_string(),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keys_round_trip_through_from_str() {
        for family in ModelFamily::ALL {
            assert_eq!(family.key().parse::<ModelFamily>(), Ok(family));
            assert_eq!(family.to_string(), family.key());
        }
    }

    #[test]
    fn unknown_key_is_rejected() {
        let err = "unsupported_x".parse::<ModelFamily>().unwrap_err();
        assert_eq!(err.family, "unsupported_x");
        assert!(err.to_string().contains("unsupported_x"));
    }

    #[test]
    fn svm_is_not_a_family() {
        // The historical third family; replaced by gradient boosting.
        assert!("svm".parse::<ModelFamily>().is_err());
    }
}
