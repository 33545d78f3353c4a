//! Walk error types

use thiserror::Error;

/// Errors that can occur while setting up a directory walk
#[derive(Error, Debug)]
pub enum WalkError {
    /// Name pattern is not a valid regular expression
    #[error("Invalid name pattern: {0}")]
    InvalidPattern(#[from] regex::Error),
}

/// Result type for walk operations
pub type WalkResult<T> = Result<T, WalkError>;
