//! Stats store error types
//!
//! Defines all errors that can occur while opening a store or reading metric data.

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur in the stats store layer
#[derive(Error, Debug)]
pub enum StorageError {
    /// I/O operation failed
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization/deserialization failed
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// Path does not hold a stats database marker
    #[error("Stats database not found: {0:?}")]
    StoreNotFound(PathBuf),

    /// Requested group does not exist in the store
    #[error("Group not found: '{0}'")]
    GroupNotFound(String),

    /// Requested metric does not exist in the group
    #[error("Metric not found: '{0}'")]
    MetricNotFound(String),

    /// Metric directory has a missing or unreadable descriptor
    #[error("Invalid metric descriptor {path:?}: {reason}")]
    InvalidDescriptor { path: PathBuf, reason: String },

    /// Data segment could not be interpreted
    #[error("Corrupt data: {0}")]
    Corruption(String),

    /// Store layout could not be scanned
    #[error("Walk error: {0}")]
    Walk(#[from] crate::walk::WalkError),
}

impl From<serde_json::Error> for StorageError {
    fn from(err: serde_json::Error) -> Self {
        StorageError::Serialization(err.to_string())
    }
}

/// Result type alias for storage operations
pub type StorageResult<T> = Result<T, StorageError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = StorageError::MetricNotFound("p1".to_string());
        assert_eq!(err.to_string(), "Metric not found: 'p1'");

        let err = StorageError::GroupNotFound("node1".to_string());
        assert_eq!(err.to_string(), "Group not found: 'node1'");
    }

    #[test]
    fn test_io_error_conversion() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let storage_err: StorageError = io_err.into();
        assert!(matches!(storage_err, StorageError::Io(_)));
    }

    #[test]
    fn test_json_error_conversion() {
        let json_err = serde_json::from_str::<u64>("nope").unwrap_err();
        let storage_err: StorageError = json_err.into();
        assert!(matches!(storage_err, StorageError::Serialization(_)));
    }
}
