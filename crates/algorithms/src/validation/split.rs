//! Train/test splitting of scattered observations
//!
//! Two strategies are available:
//! - **Random**: individual records are shuffled and the tail of the
//!   shuffled order becomes the test set.
//! - **Block**: records are grouped into square spatial blocks and whole
//!   blocks are shuffled into the test set, so neighbouring records never
//!   end up on opposite sides of the split.
//!
//! Random splits of spatially autocorrelated data leak information between
//! the training and testing sets and give optimistic scores. Block splits
//! avoid that at the cost of only approximately honouring `test_size`.

use std::fmt;
use std::str::FromStr;

use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};

use geosplit_core::{Algorithm, Error, Observations, Result};

use super::blocks::{block_labels, validate_spacing, BlockLabels};
use super::seeded_rng;

/// Splitting strategy
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SplitMethod {
    /// Shuffle individual records
    #[default]
    Random,
    /// Shuffle spatial blocks of records
    Block,
}

impl fmt::Display for SplitMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SplitMethod::Random => write!(f, "random"),
            SplitMethod::Block => write!(f, "block"),
        }
    }
}

impl FromStr for SplitMethod {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "random" | "shuffle" => Ok(SplitMethod::Random),
            "block" | "blocked" => Ok(SplitMethod::Block),
            _ => Err(Error::invalid(
                "method",
                s,
                "unknown split method, use 'random' or 'block'",
            )),
        }
    }
}

/// Parameters for train/test splitting
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SplitParams {
    /// Splitting strategy (default: random)
    pub method: SplitMethod,
    /// Fraction of records (random) or target fraction of records
    /// (block) reserved for testing. Must lie in (0, 1). Default: 0.25.
    pub test_size: f64,
    /// Block side length, in coordinate units. Required by the block method.
    pub spacing: Option<f64>,
    /// Seed for the shuffle. `None` draws a fresh seed from the OS.
    pub random_seed: Option<u64>,
}

impl Default for SplitParams {
    fn default() -> Self {
        Self {
            method: SplitMethod::Random,
            test_size: 0.25,
            spacing: None,
            random_seed: None,
        }
    }
}

impl SplitParams {
    /// Block split with the given spacing and default test size
    pub fn block(spacing: f64) -> Self {
        Self {
            method: SplitMethod::Block,
            spacing: Some(spacing),
            ..Default::default()
        }
    }

    pub fn with_test_size(mut self, test_size: f64) -> Self {
        self.test_size = test_size;
        self
    }

    pub fn with_random_seed(mut self, seed: u64) -> Self {
        self.random_seed = Some(seed);
        self
    }

    /// Check the parameters against a data set of `n_samples` records.
    pub fn validate(&self, n_samples: usize) -> Result<()> {
        if n_samples < 2 {
            return Err(Error::invalid(
                "n_samples",
                n_samples,
                "at least 2 observations are required to split",
            ));
        }
        if !(self.test_size > 0.0 && self.test_size < 1.0) {
            return Err(Error::invalid(
                "test_size",
                self.test_size,
                "test fraction must lie strictly between 0 and 1",
            ));
        }
        if self.method == SplitMethod::Block {
            match self.spacing {
                Some(spacing) => validate_spacing(spacing)?,
                None => {
                    return Err(Error::invalid(
                        "spacing",
                        "None",
                        "the block method requires a block spacing",
                    ))
                }
            }
        }
        Ok(())
    }
}

/// Result of a train/test split
#[derive(Debug, Clone)]
pub struct SplitResult {
    /// Indices of training records, ascending
    pub train_indices: Vec<usize>,
    /// Indices of testing records, ascending
    pub test_indices: Vec<usize>,
    /// Training records
    pub train: Observations,
    /// Testing records
    pub test: Observations,
    /// Block assignment used by the block method
    pub blocks: Option<BlockLabels>,
}

impl SplitResult {
    fn from_indices(
        observations: &Observations,
        mut train_indices: Vec<usize>,
        mut test_indices: Vec<usize>,
        blocks: Option<BlockLabels>,
    ) -> Self {
        train_indices.sort_unstable();
        test_indices.sort_unstable();
        Self {
            train: observations.select(&train_indices),
            test: observations.select(&test_indices),
            train_indices,
            test_indices,
            blocks,
        }
    }

    pub fn n_train(&self) -> usize {
        self.train_indices.len()
    }

    pub fn n_test(&self) -> usize {
        self.test_indices.len()
    }

    /// Realized fraction of records in the test set
    pub fn test_fraction(&self) -> f64 {
        let total = self.n_train() + self.n_test();
        if total == 0 {
            return 0.0;
        }
        self.n_test() as f64 / total as f64
    }
}

/// Split observations into training and testing sets.
///
/// # Arguments
/// * `observations` - Records to split (at least 2)
/// * `params` - Strategy, test fraction, block spacing and seed
///
/// # Returns
/// Disjoint train/test subsets whose union is the input.
///
/// # Example
///
/// ```ignore
/// let split = train_test_split(&obs, SplitParams::block(1.0).with_random_seed(0))?;
/// println!("{} train / {} test", split.n_train(), split.n_test());
/// ```
pub fn train_test_split(observations: &Observations, params: SplitParams) -> Result<SplitResult> {
    params.validate(observations.len())?;
    split_validated(observations, &params, seeded_rng(params.random_seed))
}

/// Split observations using a caller-supplied random generator.
///
/// `params.random_seed` is ignored; the generator is consumed by the call.
pub fn train_test_split_with_rng<R: Rng>(
    observations: &Observations,
    params: SplitParams,
    rng: R,
) -> Result<SplitResult> {
    params.validate(observations.len())?;
    split_validated(observations, &params, rng)
}

fn split_validated<R: Rng>(
    observations: &Observations,
    params: &SplitParams,
    mut rng: R,
) -> Result<SplitResult> {
    let n = observations.len();
    let target = test_count(params.test_size, n);

    let result = match (params.method, params.spacing) {
        (SplitMethod::Block, Some(spacing)) => {
            let labels = block_labels(observations, spacing)?;
            if labels.n_blocks() < 2 {
                return Err(Error::invalid(
                    "spacing",
                    spacing,
                    "spacing is too large: all observations fall in a single block",
                ));
            }
            let (train, test) = shuffle_blocks(&labels, target, &mut rng);
            SplitResult::from_indices(observations, train, test, Some(labels))
        }
        _ => {
            let mut indices: Vec<usize> = (0..n).collect();
            indices.shuffle(&mut rng);
            let test = indices.split_off(n - target);
            SplitResult::from_indices(observations, indices, test, None)
        }
    };

    tracing::debug!(
        method = %params.method,
        n_samples = n,
        n_train = result.n_train(),
        n_test = result.n_test(),
        n_blocks = result.blocks.as_ref().map_or(0, BlockLabels::n_blocks),
        "train/test split"
    );

    Ok(result)
}

/// Number of test records: `round(test_size * n)`, keeping at least one
/// record on each side. Halves round away from zero.
pub(crate) fn test_count(test_size: f64, n: usize) -> usize {
    let count = (test_size * n as f64).round() as usize;
    count.clamp(1, n.saturating_sub(1).max(1))
}

/// Move shuffled blocks into the test set until it holds at least
/// `target` records. The last block in shuffled order always stays in
/// training.
fn shuffle_blocks<R: Rng>(labels: &BlockLabels, target: usize, rng: &mut R) -> (Vec<usize>, Vec<usize>) {
    let n_blocks = labels.n_blocks();
    let mut order: Vec<usize> = (0..n_blocks).collect();
    order.shuffle(rng);

    let mut in_test = vec![false; n_blocks];
    let mut n_test = 0;
    for &block in &order[..n_blocks - 1] {
        if n_test >= target {
            break;
        }
        in_test[block] = true;
        n_test += labels.members(block).len();
    }

    let mut train = Vec::new();
    let mut test = Vec::with_capacity(n_test);
    for (i, &block) in labels.assignment().iter().enumerate() {
        if in_test[block] {
            test.push(i);
        } else {
            train.push(i);
        }
    }
    (train, test)
}

/// [`train_test_split`] behind the [`Algorithm`] trait.
#[derive(Debug, Clone, Copy, Default)]
pub struct TrainTestSplit;

impl Algorithm for TrainTestSplit {
    type Input = Observations;
    type Output = SplitResult;
    type Params = SplitParams;
    type Error = Error;

    fn name(&self) -> &'static str {
        "train_test_split"
    }

    fn description(&self) -> &'static str {
        "Split observations into training and testing sets by random or block shuffling"
    }

    fn execute(&self, input: Observations, params: SplitParams) -> Result<SplitResult> {
        train_test_split(&input, params)
    }
}
