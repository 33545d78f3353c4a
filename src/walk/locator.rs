//! Store Locator - discovery of stats databases, groups and metrics
//!
//! Layout of a stats database:
//!
//! ```text
//! <store>/__simple_stats__.json            database marker
//! <store>/<group>/<metric>/__metric__.json metric descriptor
//! ```

use crate::walk::error::WalkResult;
use crate::walk::walker::{MatchKind, TreeWalker};
use regex::Regex;
use std::path::{Path, PathBuf};

/// File marking the root of a stats database
pub const DATABASE_MARKER: &str = "__simple_stats__.json";

/// File describing a metric, inside the metric's directory
pub const METRIC_DESCRIPTOR: &str = "__metric__.json";

/// Descriptors found deeper than this level sit below a group directory
const GROUP_LEVEL_THRESHOLD: usize = 2;

/// A metric found below a store
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MetricLocation {
    /// Group directory name, when the metric sits inside one
    pub group: Option<String>,
    /// Metric directory name
    pub metric: String,
    /// Metric directory
    pub path: PathBuf,
}

/// Finds database roots, groups and metrics on disk
#[derive(Debug, Clone)]
pub struct StoreLocator {
    database_pattern: Regex,
    descriptor_pattern: Regex,
    any_name: Regex,
}

impl StoreLocator {
    pub fn new() -> WalkResult<Self> {
        Ok(Self {
            database_pattern: exact_name(DATABASE_MARKER)?,
            descriptor_pattern: exact_name(METRIC_DESCRIPTOR)?,
            any_name: Regex::new(".*")?,
        })
    }

    /// Check if a directory holds a database marker
    pub fn is_database(path: &Path) -> bool {
        path.join(DATABASE_MARKER).is_file()
    }

    /// Check if a metric directory holds a descriptor
    pub fn has_descriptor(metric_dir: &Path) -> bool {
        metric_dir.join(METRIC_DESCRIPTOR).is_file()
    }

    /// Every database root below `root`, in traversal order
    pub fn find_databases(&self, root: &Path) -> Vec<PathBuf> {
        TreeWalker::with_regex(root, self.database_pattern.clone())
            .matches()
            .into_iter()
            .map(|m| m.directory)
            .collect()
    }

    /// Every metric with a descriptor below `store`
    ///
    /// The metric name is the descriptor's directory; the group is the
    /// directory above it when the descriptor is deep enough to have one.
    pub fn find_metrics(&self, store: &Path) -> Vec<MetricLocation> {
        TreeWalker::with_regex(store, self.descriptor_pattern.clone())
            .matches()
            .into_iter()
            .filter_map(|m| {
                let metric = dir_name(&m.directory)?;
                let group = if m.level > GROUP_LEVEL_THRESHOLD {
                    m.directory.parent().and_then(dir_name)
                } else {
                    None
                };
                Some(MetricLocation {
                    group,
                    metric,
                    path: m.directory,
                })
            })
            .collect()
    }

    /// Group directories directly below `store`
    pub fn find_groups(&self, store: &Path) -> Vec<String> {
        self.subdirectories(store)
    }

    /// Metric directories directly below a group directory
    pub fn find_group_metrics(&self, group_dir: &Path) -> Vec<String> {
        self.subdirectories(group_dir)
    }

    fn subdirectories(&self, dir: &Path) -> Vec<String> {
        TreeWalker::with_regex(dir, self.any_name.clone())
            .recursive(false)
            .kind(MatchKind::Directories)
            .matches()
            .into_iter()
            .map(|m| m.name)
            .collect()
    }
}

fn exact_name(name: &str) -> WalkResult<Regex> {
    Ok(Regex::new(&format!("^{}$", regex::escape(name)))?)
}

fn dir_name(path: &Path) -> Option<String> {
    path.file_name().map(|n| n.to_string_lossy().into_owned())
}
