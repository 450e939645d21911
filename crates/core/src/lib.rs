//! # geosplit Core
//!
//! Core types and traits for splitting scattered spatial data.
//!
//! This crate provides:
//! - `Observations`: coordinate-tagged data columns
//! - `Region`: axis-aligned bounding boxes
//! - `Error`: the single error taxonomy shared by all algorithms
//! - Algorithm trait for a consistent API

pub mod error;
pub mod observations;
pub mod region;

pub use error::{Error, Result};
pub use observations::Observations;
pub use region::Region;

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::error::{Error, Result};
    pub use crate::observations::Observations;
    pub use crate::region::Region;
    pub use crate::Algorithm;
}

/// Core trait for all algorithms in geosplit.
///
/// Algorithms are pure functions that transform input data according to parameters.
pub trait Algorithm {
    /// Input type for the algorithm
    type Input;
    /// Output type for the algorithm
    type Output;
    /// Parameters controlling algorithm behavior
    type Params: Default;
    /// Error type for algorithm execution
    type Error: std::error::Error;

    /// Returns the algorithm name
    fn name(&self) -> &'static str;

    /// Returns a description of what the algorithm does
    fn description(&self) -> &'static str;

    /// Execute the algorithm
    fn execute(&self, input: Self::Input, params: Self::Params) -> std::result::Result<Self::Output, Self::Error>;

    /// Execute with default parameters
    fn execute_default(&self, input: Self::Input) -> std::result::Result<Self::Output, Self::Error> {
        self.execute(input, Self::Params::default())
    }
}
