//! Error types for geosplit

use std::fmt::Display;

use thiserror::Error;

/// Main error type for geosplit operations.
///
/// Every precondition failure (bad fractions, bad spacing, mismatched
/// column lengths, unknown method names, too few observations) is reported
/// as [`Error::InvalidParameter`] before any partitioning work happens.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum Error {
    #[error("Invalid parameter: {name} = {value} ({reason})")]
    InvalidParameter {
        name: &'static str,
        value: String,
        reason: String,
    },
}

impl Error {
    /// Shorthand for building an [`Error::InvalidParameter`].
    pub fn invalid(name: &'static str, value: impl Display, reason: impl Into<String>) -> Self {
        Error::InvalidParameter {
            name,
            value: value.to_string(),
            reason: reason.into(),
        }
    }

    /// Name of the offending parameter
    pub fn parameter(&self) -> &'static str {
        match self {
            Error::InvalidParameter { name, .. } => name,
        }
    }
}

/// Result type alias for geosplit operations
pub type Result<T> = std::result::Result<T, Error>;
