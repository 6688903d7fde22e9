/*!
 * Error types for the annosub application.
 *
 * This module contains custom error types for the different layers of the
 * application, using the thiserror crate for ergonomic error definitions.
 */

use thiserror::Error;

/// Errors that can occur while resolving overlapping intervals
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ResolveError {
    /// An input interval with `start >= end`, rejected before resolution
    #[error("Invalid interval at position {index}: start {start_ms}ms >= end {end_ms}ms")]
    InvalidInterval {
        /// Position of the interval in the input batch
        index: usize,
        /// Start time in ms
        start_ms: u64,
        /// End time in ms
        end_ms: u64,
    },

    /// The fixpoint loop performed more splits than the configured bound
    #[error("Interval resolution did not terminate within {limit} splits")]
    NonTermination {
        /// Maximum number of splits allowed
        limit: usize,
    },
}

/// Errors that can occur while reading interval batches
#[derive(Error, Debug)]
pub enum InputError {
    /// A timestamp string that could not be parsed
    #[error("Invalid timestamp format: {0}")]
    InvalidTimestamp(String),

    /// A timestamp with out-of-range minute or second fields
    #[error("Invalid time components in timestamp: {0}")]
    InvalidTimeComponents(String),

    /// The batch document could not be decoded
    #[error("Failed to parse interval batch: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Main application error type that wraps all other errors
#[derive(Error, Debug)]
pub enum AppError {
    /// Error from a file operation
    #[error("File error: {0}")]
    File(String),

    /// Error from reading an interval batch
    #[error("Input error: {0}")]
    Input(#[from] InputError),

    /// Error from interval resolution
    #[error("Resolve error: {0}")]
    Resolve(#[from] ResolveError),

    /// Any other error
    #[error("Unknown error: {0}")]
    Unknown(String),
}

impl From<anyhow::Error> for AppError {
    fn from(error: anyhow::Error) -> Self {
        Self::Unknown(error.to_string())
    }
}

impl From<std::io::Error> for AppError {
    fn from(error: std::io::Error) -> Self {
        Self::File(error.to_string())
    }
}
