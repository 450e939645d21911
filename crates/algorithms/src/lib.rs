//! # geosplit Algorithms
//!
//! Train/test splitting of scattered spatial observations for evaluating
//! gridders (spatial interpolation models).
//!
//! ## Available Algorithm Categories
//!
//! - **validation**: block grids, random and block-shuffled train/test
//!   splits, repeated shuffle splits, block k-fold

pub mod validation;

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::validation::{
        block_k_fold, block_labels, shuffle_splits, train_test_split,
        train_test_split_with_rng, BlockGrid, BlockKFoldParams, BlockLabels, CellId, Fold,
        SplitMethod, SplitParams, SplitResult, TrainTestSplit,
    };
    pub use geosplit_core::prelude::*;
}
