//! Stratified train/test partitioning
//!
//! The held-out partition is the only place metrics are computed, so the
//! split must mirror the sampler's guarantees: label-stratified, seeded,
//! and reproducible. Stratification at this granularity keeps the test
//! partition's class balance close to the training partition's even on
//! small samples.

use ndarray::{Array2, Axis};
use rand::{SeedableRng as _, seq::SliceRandom as _};
use rand_pcg::Pcg32;

/// Fraction of rows held out for evaluation.
pub const DEFAULT_TEST_FRACTION: f64 = 0.2;

/// Partitioned training data.
#[derive(Debug, Clone)]
pub struct Split {
    pub train_x: Array2<f64>,
    pub train_y: Vec<u8>,
    pub test_x: Array2<f64>,
    pub test_y: Vec<u8>,
}

/// Splits an encoded matrix into train/test partitions, stratified on the
/// label.
///
/// Per class, a seeded shuffle sends `test_fraction` of the rows (rounded)
/// to the test partition and the rest to training. Row order within each
/// partition follows the original matrix order, so repeated calls with the
/// same seed are identical.
///
/// # Panics
///
/// Panics if `x` and `y` disagree on row count.
#[expect(clippy::cast_precision_loss, clippy::cast_possible_truncation, clippy::cast_sign_loss)]
#[must_use]
pub fn stratified_split(x: &Array2<f64>, y: &[u8], test_fraction: f64, seed: u64) -> Split {
    assert_eq!(x.nrows(), y.len(), "matrix and labels must align");

    let mut rng = Pcg32::seed_from_u64(seed);
    let mut test_indices = Vec::new();

    for class in [0u8, 1u8] {
        let mut class_indices: Vec<usize> = y
            .iter()
            .enumerate()
            .filter(|&(_, &label)| label == class)
            .map(|(i, _)| i)
            .collect();
        class_indices.shuffle(&mut rng);
        let take = ((class_indices.len() as f64 * test_fraction).round() as usize)
            .min(class_indices.len());
        test_indices.extend(class_indices.into_iter().take(take));
    }
    test_indices.sort_unstable();

    let mut in_test = vec![false; y.len()];
    for &i in &test_indices {
        in_test[i] = true;
    }
    let train_indices: Vec<usize> = (0..y.len()).filter(|&i| !in_test[i]).collect();

    Split {
        train_x: x.select(Axis(0), &train_indices),
        train_y: train_indices.iter().map(|&i| y[i]).collect(),
        test_x: x.select(Axis(0), &test_indices),
        test_y: test_indices.iter().map(|&i| y[i]).collect(),
    }
}
