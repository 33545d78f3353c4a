//! Stats store access
//!
//! [`StatsAccessor`] is the seam between the query layer and whatever keeps
//! the recorded stats. [`JsonStatsStore`] reads the plain JSON layout:
//!
//! ```text
//! <store>/__simple_stats__.json                 {"name": ..., "description": ...}
//! <store>/<group>/<metric>/__metric__.json      {"variable", "period", "units", "compute"}
//! <store>/<group>/<metric>/data/<segment>.json  [{"t": 100, "v": 1.5}, ...]
//! ```
//!
//! Segment files are read in name order and hold ascending timestamps.

use crate::storage::error::{StorageError, StorageResult};
use crate::storage::types::{
    DataPoint, DataSegmentSummary, Limits, MetricInfo, MetricMetadataTree, Timestamp,
};
use crate::walk::{StoreLocator, TreeWalker, DATABASE_MARKER, METRIC_DESCRIPTOR};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Directory holding a metric's segment files
const DATA_DIR: &str = "data";

/// Access to a stats store
///
/// A handle is scoped to one (path, group); dropping it closes the store.
pub trait StatsAccessor {
    type Handle;

    /// Open the store at `path`, positioned on `group` when one is given
    fn open(&self, path: &Path, group: Option<&str>) -> StorageResult<Self::Handle>;

    /// Load the metadata tree of every metric under the handle
    fn load_metrics(&self, handle: &Self::Handle) -> StorageResult<MetricMetadataTree>;

    /// Recorded points of a metric with `from <= t <= to`, in time order
    fn fetch_range(
        &self,
        handle: &Self::Handle,
        metric: &str,
        from: Timestamp,
        to: Timestamp,
    ) -> StorageResult<Vec<DataPoint>>;
}

/// Contents of the database marker file
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct StoreInfo {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
}

/// Contents of a metric descriptor file
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MetricDescriptor {
    pub variable: String,
    #[serde(default)]
    pub period: String,
    pub units: String,
    #[serde(default)]
    pub compute: String,
}

/// An open (store, group) of a [`JsonStatsStore`]
#[derive(Debug, Clone, Serialize)]
pub struct StoreHandle {
    /// Store root
    pub path: PathBuf,
    /// Group the handle is positioned on
    pub group: Option<String>,
    /// Directory holding the metric directories
    pub metrics_dir: PathBuf,
    /// Marker contents, when the store root carries one
    pub info: Option<StoreInfo>,
}

/// [`StatsAccessor`] over the JSON directory layout
#[derive(Debug, Clone)]
pub struct JsonStatsStore {
    locator: StoreLocator,
}

impl JsonStatsStore {
    pub fn new() -> StorageResult<Self> {
        Ok(Self {
            locator: StoreLocator::new()?,
        })
    }

    /// Read and parse a metric descriptor
    pub fn read_descriptor(metric_dir: &Path) -> StorageResult<MetricDescriptor> {
        let path = metric_dir.join(METRIC_DESCRIPTOR);
        let content =
            std::fs::read_to_string(&path).map_err(|e| StorageError::InvalidDescriptor {
                path: path.clone(),
                reason: e.to_string(),
            })?;
        serde_json::from_str(&content).map_err(|e| StorageError::InvalidDescriptor {
            path,
            reason: e.to_string(),
        })
    }

    /// Marker contents of a store
    ///
    /// The marker's presence is what makes a store; an empty or unparsable
    /// marker only loses the informational fields.
    fn read_info(store: &Path) -> Option<StoreInfo> {
        let marker = store.join(DATABASE_MARKER);
        if !marker.is_file() {
            return None;
        }
        let parsed = std::fs::read_to_string(&marker)
            .map_err(StorageError::from)
            .and_then(|content| Ok(serde_json::from_str::<StoreInfo>(&content)?));
        match parsed {
            Ok(info) => Some(info),
            Err(e) => {
                tracing::debug!(path = ?marker, error = %e, "Ignoring unreadable database marker");
                None
            }
        }
    }

    /// Segment files of a metric, in name order
    fn segment_files(metric_dir: &Path) -> StorageResult<Vec<PathBuf>> {
        let data_dir = metric_dir.join(DATA_DIR);
        if !data_dir.is_dir() {
            return Ok(Vec::new());
        }
        let files = TreeWalker::new(data_dir, r".*\.json")?
            .recursive(false)
            .matches()
            .into_iter()
            .map(|m| m.full_path)
            .collect();
        Ok(files)
    }

    fn read_segment(path: &Path) -> StorageResult<Vec<DataPoint>> {
        let content = std::fs::read_to_string(path)?;
        let points: Vec<DataPoint> = serde_json::from_str(&content)?;
        if points.windows(2).any(|w| w[0].t > w[1].t) {
            return Err(StorageError::Corruption(format!(
                "Segment {:?} is not in time order",
                path
            )));
        }
        Ok(points)
    }

    /// Summaries of the non-empty segments of a metric
    fn segment_summaries(metric_dir: &Path) -> StorageResult<Vec<DataSegmentSummary>> {
        let mut summaries = Vec::new();
        for file in Self::segment_files(metric_dir)? {
            let points = Self::read_segment(&file)?;
            if let (Some(first), Some(last)) = (points.first(), points.last()) {
                summaries.push(DataSegmentSummary::new(first.t, last.t));
            }
        }
        Ok(summaries)
    }
}

impl StatsAccessor for JsonStatsStore {
    type Handle = StoreHandle;

    fn open(&self, path: &Path, group: Option<&str>) -> StorageResult<StoreHandle> {
        if !path.is_dir() {
            return Err(StorageError::StoreNotFound(path.to_path_buf()));
        }

        let metrics_dir = match group {
            Some(group) => {
                let dir = path.join(group);
                if !dir.is_dir() {
                    return Err(StorageError::GroupNotFound(group.to_string()));
                }
                dir
            }
            None => path.to_path_buf(),
        };

        let info = Self::read_info(path);

        tracing::debug!(path = ?path, group = ?group, "Opened stats store");

        Ok(StoreHandle {
            path: path.to_path_buf(),
            group: group.map(str::to_string),
            metrics_dir,
            info,
        })
    }

    fn load_metrics(&self, handle: &StoreHandle) -> StorageResult<MetricMetadataTree> {
        let mut tree = MetricMetadataTree::new();

        for metric_id in self.locator.find_group_metrics(&handle.metrics_dir) {
            let metric_dir = handle.metrics_dir.join(&metric_id);
            let descriptor = Self::read_descriptor(&metric_dir)?;

            let mut info =
                MetricInfo::new(descriptor.period, descriptor.units, descriptor.compute);
            info.data = Self::segment_summaries(&metric_dir)?;

            tree.insert(descriptor.variable, metric_id, info);
        }

        tracing::debug!(
            path = ?handle.metrics_dir,
            variables = tree.len(),
            metrics = tree.metric_count(),
            "Loaded metric metadata"
        );

        Ok(tree)
    }

    fn fetch_range(
        &self,
        handle: &StoreHandle,
        metric: &str,
        from: Timestamp,
        to: Timestamp,
    ) -> StorageResult<Vec<DataPoint>> {
        let metric_dir = handle.metrics_dir.join(metric);
        if !StoreLocator::has_descriptor(&metric_dir) {
            return Err(StorageError::MetricNotFound(metric.to_string()));
        }

        let range = Limits::new(from, to);
        let mut points = Vec::new();
        for file in Self::segment_files(&metric_dir)? {
            let segment = Self::read_segment(&file)?;
            points.extend(segment.into_iter().filter(|p| range.contains(p.t)));
        }

        tracing::debug!(metric, from, to, points = points.len(), "Fetched range");
        Ok(points)
    }
}
