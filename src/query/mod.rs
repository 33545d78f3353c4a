//! Query Resolution
//!
//! Turns a partial query into either a concrete metric + time range or the
//! guidance needed to complete it:
//!
//! - **spec**: `QuerySpec`, the immutable query, and time argument parsing
//! - **resolver**: the decision procedure and its `ResolutionOutcome`
//! - **error**: Error types
//!
//! # Example
//!
//! ```rust
//! use stats_list::query::{resolve, QuerySpec, ResolutionOutcome};
//! use stats_list::storage::{MetricInfo, MetricMetadataTree};
//!
//! let tree = MetricMetadataTree::new()
//!     .with_metric("cpu", "p1", MetricInfo::new("1", "SEC", "average").segment(100, 200));
//!
//! let outcome = resolve(&tree, &QuerySpec::new().variable("cpu"));
//! assert!(matches!(outcome, ResolutionOutcome::NeedsMetricOrUnits { .. }));
//! ```

mod error;
mod resolver;
mod spec;

pub use error::{QueryError, QueryResult};
pub use resolver::{resolve, MetricLimits, ResolutionOutcome, VariableLimits};
pub use spec::{parse_time, QuerySpec};
