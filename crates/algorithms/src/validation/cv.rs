//! Cross-validation splitters for spatial data
//!
//! - `shuffle_splits`: repeated train/test splits (random or block)
//! - `block_k_fold`: k folds made of whole spatial blocks

use rand::seq::SliceRandom;
use serde::{Deserialize, Serialize};

use geosplit_core::{Error, Observations, Result};

use super::blocks::{block_labels, validate_spacing};
use super::seeded_rng;
use super::split::{train_test_split, SplitParams, SplitResult};

/// Repeat [`train_test_split`] `n_splits` times.
///
/// When `params.random_seed` is set, split `i` is seeded with `seed + i`
/// so the whole sequence is reproducible.
pub fn shuffle_splits(
    observations: &Observations,
    params: SplitParams,
    n_splits: usize,
) -> Result<Vec<SplitResult>> {
    if n_splits == 0 {
        return Err(Error::invalid("n_splits", n_splits, "at least one split is required"));
    }
    params.validate(observations.len())?;

    (0..n_splits)
        .map(|i| {
            let split_params = SplitParams {
                random_seed: params.random_seed.map(|s| s.wrapping_add(i as u64)),
                ..params
            };
            train_test_split(observations, split_params)
        })
        .collect()
}

/// Parameters for block k-fold cross-validation
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BlockKFoldParams {
    /// Block side length, in coordinate units (required)
    pub spacing: Option<f64>,
    /// Number of folds (default: 5)
    pub n_splits: usize,
    /// Shuffle blocks before distributing them (default: false).
    /// Only changes which of several equally sized blocks lands in which fold.
    pub shuffle: bool,
    /// Seed used when `shuffle` is set
    pub random_seed: Option<u64>,
}

impl Default for BlockKFoldParams {
    fn default() -> Self {
        Self {
            spacing: None,
            n_splits: 5,
            shuffle: false,
            random_seed: None,
        }
    }
}

/// One cross-validation fold
#[derive(Debug, Clone, PartialEq)]
pub struct Fold {
    pub fold_idx: usize,
    /// Ascending
    pub train_indices: Vec<usize>,
    /// Ascending
    pub test_indices: Vec<usize>,
}

impl Fold {
    pub fn train(&self, observations: &Observations) -> Observations {
        observations.select(&self.train_indices)
    }

    pub fn test(&self, observations: &Observations) -> Observations {
        observations.select(&self.test_indices)
    }
}

/// K-fold cross-validation over spatial blocks.
///
/// Blocks are handed out largest first, each to the fold currently holding
/// the fewest observations, which keeps fold sizes close. Every observation
/// appears in exactly one test fold and no block is ever split.
pub fn block_k_fold(observations: &Observations, params: BlockKFoldParams) -> Result<Vec<Fold>> {
    let n_splits = params.n_splits;
    if n_splits < 2 {
        return Err(Error::invalid("n_splits", n_splits, "block k-fold needs at least 2 folds"));
    }
    let spacing = params.spacing.ok_or_else(|| {
        Error::invalid("spacing", "None", "block k-fold requires a block spacing")
    })?;
    validate_spacing(spacing)?;
    if observations.len() < n_splits {
        return Err(Error::invalid(
            "n_samples",
            observations.len(),
            format!("need at least {} observations for {} folds", n_splits, n_splits),
        ));
    }

    let labels = block_labels(observations, spacing)?;
    let n_blocks = labels.n_blocks();
    if n_blocks < n_splits {
        return Err(Error::invalid(
            "n_splits",
            n_splits,
            format!("only {} non-empty blocks, reduce n_splits or spacing", n_blocks),
        ));
    }

    let mut order: Vec<usize> = (0..n_blocks).collect();
    if params.shuffle {
        order.shuffle(&mut seeded_rng(params.random_seed));
    }
    // Stable, so shuffling only reorders blocks of equal size
    order.sort_by_key(|&b| std::cmp::Reverse(labels.members(b).len()));

    let mut fold_of_block = vec![0; n_blocks];
    let mut fold_sizes = vec![0usize; n_splits];
    for &block in &order {
        let fold = fold_sizes
            .iter()
            .enumerate()
            .min_by_key(|&(i, &size)| (size, i))
            .map(|(i, _)| i)
            .unwrap_or(0);
        fold_of_block[block] = fold;
        fold_sizes[fold] += labels.members(block).len();
    }

    let folds: Vec<Fold> = (0..n_splits)
        .map(|fold_idx| {
            let (test_indices, train_indices): (Vec<usize>, Vec<usize>) = (0..observations.len())
                .partition(|&i| fold_of_block[labels.assignment()[i]] == fold_idx);
            Fold {
                fold_idx,
                train_indices,
                test_indices,
            }
        })
        .collect();

    tracing::debug!(
        n_samples = observations.len(),
        n_blocks,
        n_splits,
        ?fold_sizes,
        "block k-fold"
    );

    Ok(folds)
}
