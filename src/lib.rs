//! # stats-list
//!
//! Inspect filesystem time-series stats stores. A store holds groups, groups
//! hold metrics, and every metric records one variable at some units (SEC,
//! MIN, HOUR, ...) over time.
//!
//! A query names as much as the user knows: variable, metric, units, time
//! range. When something is missing the tool prints the valid choices for it,
//! so adding one flag at a time converges on a fully resolved query.
//!
//! ## Modules
//!
//! - [`walk`]: Directory tree scanning and store discovery
//! - [`storage`]: Store access and metric metadata
//! - [`query`]: Query specification and resolution
//! - [`runner`]: Single-shot and recursive runs, and their output
//! - [`config`]: Configuration file and environment
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use stats_list::query::QuerySpec;
//! use stats_list::runner::{Presenter, QueryRunner, RunOptions};
//! use stats_list::storage::JsonStatsStore;
//! use std::path::Path;
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let store = JsonStatsStore::new()?;
//!     let mut runner = QueryRunner::new(&store, Presenter::stdio(), RunOptions::default())?;
//!
//!     let spec = QuerySpec::new().variable("cpu").units("SEC").from(1_700_000_000);
//!     let status = runner.run_single(Path::new("/var/stats"), Some("node1"), None, &spec)?;
//!
//!     std::process::exit(status.code());
//! }
//! ```

pub mod config;
pub mod query;
pub mod runner;
pub mod storage;
pub mod walk;

// Re-export top-level types for convenience
pub use config::{Config, ConfigError, ConfigLoad, LoggingConfig, StatsConfig};

pub use query::{parse_time, resolve, QueryError, QuerySpec, ResolutionOutcome};

pub use runner::{
    ExitStatus, GroupOutcome, Presenter, QueryRunner, RecursiveReport, RunError, RunOptions,
};

pub use storage::{
    JsonStatsStore, MetricInfo, MetricMetadataTree, StatsAccessor, StorageError, StorageResult,
};

pub use walk::{StoreLocator, TreeWalker, WalkControl, WalkMatch};
