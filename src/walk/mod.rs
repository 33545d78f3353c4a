//! Directory discovery
//!
//! - **walker**: generic regex-driven directory tree scan
//! - **locator**: stats databases, groups and metrics built on the walker
//! - **error**: Error types

pub mod error;
pub mod locator;
pub mod walker;

pub use error::{WalkError, WalkResult};
pub use locator::{MetricLocation, StoreLocator, DATABASE_MARKER, METRIC_DESCRIPTOR};
pub use walker::{MatchKind, TreeWalker, WalkControl, WalkMatch, WalkSummary};
