//! Runner error types
//!
//! Store and query problems become per-group outcomes; only failures to set
//! up discovery or to write output stop a run.

use thiserror::Error;

/// Errors that abort a run
#[derive(Error, Debug)]
pub enum RunError {
    /// Writing output failed
    #[error("Output error: {0}")]
    Output(#[from] std::io::Error),

    /// Discovery could not be set up
    #[error("Walk error: {0}")]
    Walk(#[from] crate::walk::WalkError),
}

/// Result type for runner operations
pub type RunResult<T> = Result<T, RunError>;
