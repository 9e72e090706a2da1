//! Weighted decision trees
//!
//! One recursive CART grower serves both ensemble families. The split
//! criterion and the leaf estimate are decoupled:
//!
//! - The **criterion** scores candidate splits from weighted prefix sums of
//!   the target. Gini impurity (binary targets) and squared error
//!   (continuous targets) reduce to the same three running sums, so a
//!   single scan handles both.
//! - The **leaf estimate** is `sum(numerator) / sum(denominator)` over the
//!   samples that reach the leaf. A classification tree passes
//!   `weight * label / weight` and gets the weighted positive fraction; a
//!   boosted tree passes the Newton step for the logistic loss
//!   (`weight * residual / weight * p * (1 - p)`).
//!
//! Sample weights flow through both sides, which is how class reweighting
//! reaches individual splits.

use ndarray::{Array2, ArrayView1};
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

/// A fitted tree node.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum TreeNode {
    /// Terminal node carrying its estimate.
    Leaf { value: f64 },
    /// Binary split: rows with `feature <= threshold` go left.
    Split {
        feature: usize,
        threshold: f64,
        left: Box<TreeNode>,
        right: Box<TreeNode>,
    },
}

impl TreeNode {
    /// Evaluates the tree for one encoded row.
    #[must_use]
    pub fn predict(&self, row: ArrayView1<'_, f64>) -> f64 {
        let mut node = self;
        loop {
            match node {
                TreeNode::Leaf { value } => return *value,
                TreeNode::Split {
                    feature,
                    threshold,
                    left,
                    right,
                } => {
                    node = if row[*feature] <= *threshold {
                        left
                    } else {
                        right
                    };
                }
            }
        }
    }

    /// Number of leaves, mostly useful in tests.
    #[must_use]
    pub fn leaf_count(&self) -> usize {
        match self {
            TreeNode::Leaf { .. } => 1,
            TreeNode::Split { left, right, .. } => left.leaf_count() + right.leaf_count(),
        }
    }
}

/// Split-scoring criterion.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Criterion {
    /// Weighted gini impurity over binary targets.
    Gini,
    /// Weighted squared error over continuous targets.
    SquaredError,
}

impl Criterion {
    /// Impurity contribution of a node, scaled by its total weight.
    ///
    /// For squared error this is the weighted SSE around the node mean; for
    /// gini over binary targets it is `W * gini` expressed through the same
    /// sums (`wt2` is unused there since `t^2 == t`).
    fn node_impurity(self, w: f64, wt: f64, wt2: f64) -> f64 {
        if w <= 0.0 {
            return 0.0;
        }
        match self {
            Criterion::SquaredError => wt2 - wt * wt / w,
            Criterion::Gini => w - (wt * wt + (w - wt) * (w - wt)) / w,
        }
    }
}

/// Structural limits for a single tree.
#[derive(Debug, Clone)]
pub(crate) struct TreeParams {
    pub max_depth: usize,
    pub min_samples_split: usize,
    pub min_samples_leaf: usize,
    /// Number of features considered per split; `None` means all.
    pub feature_subsample: Option<usize>,
}

impl TreeParams {
    pub(crate) fn new(max_depth: usize) -> Self {
        Self {
            max_depth,
            min_samples_split: 2,
            min_samples_leaf: 1,
            feature_subsample: None,
        }
    }
}

/// Everything the grower reads per sample.
pub(crate) struct GrowInput<'a> {
    pub x: &'a Array2<f64>,
    /// Criterion targets (labels as 0/1 floats, or boosting residuals).
    pub targets: &'a [f64],
    pub weights: &'a [f64],
    /// Leaf-estimate numerator per sample.
    pub leaf_numer: &'a [f64],
    /// Leaf-estimate denominator per sample.
    pub leaf_denom: &'a [f64],
    pub criterion: Criterion,
}

/// Grows a tree over the given sample indices.
///
/// Indices may repeat (bootstrap draws); repeated indices simply contribute
/// their weight more than once.
pub(crate) fn grow_tree(
    input: &GrowInput<'_>,
    indices: &[usize],
    params: &TreeParams,
    rng: &mut Pcg32,
) -> TreeNode {
    grow(input, indices, params, 0, rng)
}

fn grow(
    input: &GrowInput<'_>,
    indices: &[usize],
    params: &TreeParams,
    depth: usize,
    rng: &mut Pcg32,
) -> TreeNode {
    let leaf = TreeNode::Leaf {
        value: leaf_value(input, indices),
    };
    if depth >= params.max_depth || indices.len() < params.min_samples_split {
        return leaf;
    }

    let Some((feature, threshold)) = best_split(input, indices, params, rng) else {
        return leaf;
    };

    let (left, right): (Vec<usize>, Vec<usize>) = indices
        .iter()
        .copied()
        .partition(|&i| input.x[[i, feature]] <= threshold);

    TreeNode::Split {
        feature,
        threshold,
        left: Box::new(grow(input, &left, params, depth + 1, rng)),
        right: Box::new(grow(input, &right, params, depth + 1, rng)),
    }
}

fn leaf_value(input: &GrowInput<'_>, indices: &[usize]) -> f64 {
    let numer: f64 = indices.iter().map(|&i| input.leaf_numer[i]).sum();
    let denom: f64 = indices.iter().map(|&i| input.leaf_denom[i]).sum();
    if denom.abs() < 1e-12 { 0.0 } else { numer / denom }
}

fn best_split(
    input: &GrowInput<'_>,
    indices: &[usize],
    params: &TreeParams,
    rng: &mut Pcg32,
) -> Option<(usize, f64)> {
    let n_features = input.x.ncols();
    let candidates: Vec<usize> = match params.feature_subsample {
        Some(k) if k < n_features => rand::seq::index::sample(rng, n_features, k).into_vec(),
        _ => (0..n_features).collect(),
    };

    let total_w: f64 = indices.iter().map(|&i| input.weights[i]).sum();
    let total_wt: f64 = indices
        .iter()
        .map(|&i| input.weights[i] * input.targets[i])
        .sum();
    let total_wt2: f64 = indices
        .iter()
        .map(|&i| input.weights[i] * input.targets[i] * input.targets[i])
        .sum();
    let parent_impurity = input.criterion.node_impurity(total_w, total_wt, total_wt2);
    if parent_impurity <= 1e-12 {
        return None;
    }

    let mut sorted = indices.to_vec();
    let mut best: Option<(f64, usize, f64)> = None;

    for feature in candidates {
        sorted.sort_unstable_by(|&a, &b| {
            input.x[[a, feature]].total_cmp(&input.x[[b, feature]])
        });

        let mut left_w = 0.0;
        let mut left_wt = 0.0;
        let mut left_wt2 = 0.0;

        for (pos, &i) in sorted.iter().enumerate() {
            let w = input.weights[i];
            let t = input.targets[i];
            left_w += w;
            left_wt += w * t;
            left_wt2 += w * t * t;

            let split_at = pos + 1;
            if split_at < params.min_samples_leaf
                || sorted.len() - split_at < params.min_samples_leaf
                || split_at == sorted.len()
            {
                continue;
            }
            let here = input.x[[i, feature]];
            let next = input.x[[sorted[split_at], feature]];
            if next <= here {
                // No boundary between equal values.
                continue;
            }

            let impurity = input.criterion.node_impurity(left_w, left_wt, left_wt2)
                + input.criterion.node_impurity(
                    total_w - left_w,
                    total_wt - left_wt,
                    total_wt2 - left_wt2,
                );
            let improvement = parent_impurity - impurity;
            if improvement > 1e-12
                && best.is_none_or(|(best_improvement, _, _)| improvement > best_improvement)
            {
                best = Some((improvement, feature, f64::midpoint(here, next)));
            }
        }
    }

    best.map(|(_, feature, threshold)| (feature, threshold))
}
