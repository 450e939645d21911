//! Model validation for scattered spatial data
//!
//! Tools for holding data out of a gridder's fit so its predictions can be
//! scored against observations it has never seen:
//! - **blocks**: regular block grids and per-observation block labels
//! - **split**: single train/test split (random or block shuffle)
//! - **cv**: repeated shuffle splits and block k-fold

pub mod blocks;
pub mod cv;
pub mod split;

pub use blocks::{block_labels, label_with_grid, BlockGrid, BlockLabels, CellId};
pub use cv::{block_k_fold, shuffle_splits, BlockKFoldParams, Fold};
pub use split::{
    train_test_split, train_test_split_with_rng, SplitMethod, SplitParams, SplitResult,
    TrainTestSplit,
};

use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

/// Generator for one split: seeded when a seed is given, otherwise from OS entropy.
pub(crate) fn seeded_rng(seed: Option<u64>) -> ChaCha8Rng {
    match seed {
        Some(seed) => ChaCha8Rng::seed_from_u64(seed),
        None => ChaCha8Rng::from_entropy(),
    }
}
