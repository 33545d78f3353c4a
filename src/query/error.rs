//! Query error types
//!
//! Resolution itself never fails; these cover building a query from user input.

use thiserror::Error;

/// Errors that can occur while building a query
#[derive(Error, Debug)]
pub enum QueryError {
    /// Time argument is neither a unix timestamp nor a supported date
    #[error("Invalid time: {0}")]
    InvalidTime(String),
}

/// Result type for query operations
pub type QueryResult<T> = Result<T, QueryError>;
