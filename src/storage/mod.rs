//! Stats Store Access
//!
//! This module provides read access to filesystem stats stores:
//!
//! - **types**: Metadata tree, metric info, segment summaries, data points
//! - **store**: The `StatsAccessor` seam and the JSON directory store
//! - **error**: Error types
//!
//! # Read Path
//!
//! ```text
//! open(path, group) → load_metrics → MetricMetadataTree
//!                   → fetch_range(metric, from, to) → [DataPoint]
//! ```
//!
//! # Example
//!
//! ```rust,no_run
//! use stats_list::storage::{JsonStatsStore, StatsAccessor};
//! use std::path::Path;
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let store = JsonStatsStore::new()?;
//!     let handle = store.open(Path::new("/var/stats"), Some("node1"))?;
//!     let tree = store.load_metrics(&handle)?;
//!
//!     for (variable, metrics) in tree.iter() {
//!         println!("{}: {} metrics", variable, metrics.len());
//!     }
//!     Ok(())
//! }
//! ```

pub mod error;
pub mod store;
pub mod types;

pub use error::{StorageError, StorageResult};
pub use store::{JsonStatsStore, MetricDescriptor, StatsAccessor, StoreHandle, StoreInfo};
pub use types::{
    format_timestamp, DataPoint, DataSegmentSummary, Limits, MetricInfo, MetricMetadataTree,
    Timestamp, VariableMetrics, KNOWN_UNITS, MAX_TIMESTAMP, MIN_TIMESTAMP,
};
