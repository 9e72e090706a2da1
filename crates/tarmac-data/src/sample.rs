//! Stratified training-sample selection
//!
//! Every training run starts from a subset of the historical store rather
//! than the full table. The subset must keep the delay label's class
//! balance, because the downstream split and metrics assume the sample
//! looks like the population.
//!
//! Stratification has a failure mode on heavily imbalanced data: when the
//! minority class is rare enough, a small stratified subset would contain
//! so few minority rows that its per-class counts are dominated by noise.
//! Below [`StratifiedSampler::min_stratify_ratio`] the sampler therefore
//! falls back to a plain random draw and flags the outcome, so callers can
//! surface that the stratification guarantee does not hold for the run.
//!
//! Sampling is deterministic: the same seed over the same input yields the
//! same subset, which is what makes training runs reproducible end to end.

use rand::SeedableRng as _;
use rand_pcg::Pcg32;
use tracing::warn;

use crate::record::FlightRecord;

/// Default fraction of the historical data drawn per training run.
pub const DEFAULT_FRACTION: f64 = 0.1;

/// Minority-class ratio under which stratification is abandoned.
pub const DEFAULT_MIN_STRATIFY_RATIO: f64 = 0.05;

/// Default sampling seed.
pub const DEFAULT_SEED: u64 = 42;

/// Class-stratified, seeded subset draw over labeled flight records.
#[derive(Debug, Clone)]
pub struct StratifiedSampler {
    /// Target fraction of the input to keep, in (0, 1].
    pub fraction: f64,
    /// Seed for the deterministic draw.
    pub seed: u64,
    /// Minority-class ratio below which plain random sampling is used.
    pub min_stratify_ratio: f64,
}

/// The subset a sampler run produced.
#[derive(Debug, Clone)]
pub struct SampleOutcome {
    /// The selected records, in their original input order.
    pub records: Vec<FlightRecord>,
    /// Whether the per-class proportion guarantee holds for this subset.
    pub stratified: bool,
}

impl StratifiedSampler {
    /// Creates a sampler with the given fraction and the default seed and
    /// rarity threshold.
    #[must_use]
    pub fn new(fraction: f64) -> Self {
        Self {
            fraction,
            seed: DEFAULT_SEED,
            min_stratify_ratio: DEFAULT_MIN_STRATIFY_RATIO,
        }
    }

    /// Replaces the sampling seed.
    #[must_use]
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Draws the subset.
    ///
    /// Rows without a usable label are excluded before anything is
    /// counted. If the minority class falls under the rarity threshold the
    /// draw is plain random and the outcome is flagged; otherwise each
    /// class contributes its proportional share, so the subset's class
    /// balance matches the source within sampling tolerance.
    ///
    /// Either way the subset size is `fraction * usable_rows`, rounded.
    #[must_use]
    pub fn sample(&self, records: &[FlightRecord]) -> SampleOutcome {
        let labeled: Vec<&FlightRecord> = records.iter().filter(|r| r.is_labeled()).collect();
        if labeled.is_empty() {
            return SampleOutcome {
                records: Vec::new(),
                stratified: false,
            };
        }

        let positives = labeled.iter().filter(|r| r.label() == Some(1)).count();
        let negatives = labeled.len() - positives;
        #[expect(clippy::cast_precision_loss)]
        let minority_ratio = positives.min(negatives) as f64 / labeled.len() as f64;

        let mut rng = Pcg32::seed_from_u64(self.seed);
        let stratified = minority_ratio >= self.min_stratify_ratio;

        let mut selected = if stratified {
            let mut indices = Vec::new();
            for class in [0u8, 1u8] {
                let class_indices: Vec<usize> = labeled
                    .iter()
                    .enumerate()
                    .filter(|(_, r)| r.label() == Some(class))
                    .map(|(i, _)| i)
                    .collect();
                let take = self.scaled_count(class_indices.len());
                let draw = rand::seq::index::sample(&mut rng, class_indices.len(), take);
                indices.extend(draw.iter().map(|i| class_indices[i]));
            }
            indices
        } else {
            warn!(
                minority_ratio,
                threshold = self.min_stratify_ratio,
                "minority class too rare; falling back to plain random sampling"
            );
            let take = self.scaled_count(labeled.len());
            rand::seq::index::sample(&mut rng, labeled.len(), take).into_vec()
        };

        selected.sort_unstable();
        SampleOutcome {
            records: selected.into_iter().map(|i| labeled[i].clone()).collect(),
            stratified,
        }
    }

    #[expect(clippy::cast_precision_loss, clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    fn scaled_count(&self, available: usize) -> usize {
        ((available as f64 * self.fraction).round() as usize).min(available)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::test_support::jfk_lax;

    #[expect(clippy::cast_precision_loss)]
    fn records_with_balance(positives: usize, negatives: usize) -> Vec<FlightRecord> {
        let mut records = Vec::with_capacity(positives + negatives);
        for i in 0..positives {
            let mut record = jfk_lax(Some(1));
            record.distance = 100.0 + i as f64;
            records.push(record);
        }
        for i in 0..negatives {
            let mut record = jfk_lax(Some(0));
            record.distance = 5000.0 + i as f64;
            records.push(record);
        }
        records
    }

    #[test]
    fn preserves_class_proportions_above_threshold() {
        // 1000 rows at 90/10; a 10% draw should come back near 90/10.
        let records = records_with_balance(100, 900);
        let outcome = StratifiedSampler::new(0.1).sample(&records);

        assert!(outcome.stratified);
        let len = outcome.records.len();
        assert!((95..=105).contains(&len), "unexpected subset size {len}");

        let positives = outcome
            .records
            .iter()
            .filter(|r| r.label() == Some(1))
            .count();
        #[expect(clippy::cast_precision_loss)]
        let positive_ratio = positives as f64 / len as f64;
        assert!(
            (positive_ratio - 0.1).abs() <= 0.01,
            "positive ratio {positive_ratio} drifted from 0.1"
        );
    }

    #[test]
    fn falls_back_to_plain_sampling_below_threshold() {
        // 2% minority is under the 5% threshold.
        let records = records_with_balance(20, 980);
        let outcome = StratifiedSampler::new(0.1).sample(&records);

        assert!(!outcome.stratified);
        let len = outcome.records.len();
        assert!((95..=105).contains(&len), "unexpected subset size {len}");
    }

    #[test]
    fn same_seed_reproduces_the_subset() {
        let records = records_with_balance(200, 800);
        let sampler = StratifiedSampler::new(0.2);
        let first = sampler.sample(&records);
        let second = sampler.sample(&records);
        assert_eq!(first.records, second.records);
    }

    #[test]
    fn different_seeds_differ() {
        let records = records_with_balance(200, 800);
        let first = StratifiedSampler::new(0.2).with_seed(1).sample(&records);
        let second = StratifiedSampler::new(0.2).with_seed(2).sample(&records);
        assert_eq!(first.records.len(), second.records.len());
        assert_ne!(first.records, second.records);
    }

    #[test]
    fn unlabeled_rows_are_excluded_before_sampling() {
        let mut records = records_with_balance(50, 50);
        for _ in 0..100 {
            records.push(jfk_lax(None));
        }
        let outcome = StratifiedSampler::new(1.0).sample(&records);
        assert_eq!(outcome.records.len(), 100);
        assert!(outcome.records.iter().all(FlightRecord::is_labeled));
    }

    #[test]
    fn empty_input_yields_empty_outcome() {
        let outcome = StratifiedSampler::new(0.5).sample(&[]);
        assert!(outcome.records.is_empty());
        assert!(!outcome.stratified);
    }
}
