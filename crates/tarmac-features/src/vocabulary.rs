//! Categorical vocabularies

use serde::{Deserialize, Serialize};

/// Frozen category vocabulary for one categorical column.
///
/// Categories are stored sorted and deduplicated, so the one-hot code of a
/// category is its binary-search position. Sorting makes the column layout
/// deterministic: two fits over the same data produce identical code maps
/// regardless of row order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryVocabulary {
    categories: Vec<String>,
}

impl CategoryVocabulary {
    /// Builds the vocabulary from fit-time values.
    #[must_use]
    pub fn fit(values: &[String]) -> Self {
        let mut categories: Vec<String> = values.to_vec();
        categories.sort_unstable();
        categories.dedup();
        Self { categories }
    }

    /// The one-hot code of `value`, or `None` for a category never seen at
    /// fit time.
    ///
    /// # Examples
    ///
    /// ```
    /// # use tarmac_features::vocabulary::CategoryVocabulary;
    /// let vocab = CategoryVocabulary::fit(&["DL".into(), "AA".into(), "DL".into()]);
    /// assert_eq!(vocab.code("AA"), Some(0));
    /// assert_eq!(vocab.code("DL"), Some(1));
    /// assert_eq!(vocab.code("ZZ"), None);
    /// ```
    #[must_use]
    pub fn code(&self, value: &str) -> Option<usize> {
        self.categories
            .binary_search_by(|c| c.as_str().cmp(value))
            .ok()
    }

    /// Number of distinct categories (the width of the one-hot block).
    #[must_use]
    pub fn len(&self) -> usize {
        self.categories.len()
    }

    /// Whether the vocabulary is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.categories.is_empty()
    }

    /// The categories in code order.
    #[must_use]
    pub fn categories(&self) -> &[String] {
        &self.categories
    }
}
