//! Core data types for stats stores
//!
//! This module defines the types the store hands to the query layer:
//! - `MetricMetadataTree`: variable → metric-id → `MetricInfo`
//! - `MetricInfo`: period, units, compute function and recorded segments
//! - `DataSegmentSummary` and `Limits`: recorded time spans
//! - `DataPoint`: a single recorded sample

use chrono::DateTime;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Unix timestamp in seconds
pub type Timestamp = u64;

/// Earliest timestamp a range query may start at
pub const MIN_TIMESTAMP: Timestamp = 1;

/// Open-ended upper bound for range queries
pub const MAX_TIMESTAMP: Timestamp = u64::MAX;

/// Units accepted by stats stores, from finest to coarsest granularity
pub const KNOWN_UNITS: &[&str] = &[
    "SEC", "MIN", "HOUR", "MDAY", "MON", "YEAR", "WDAY", "YDAY", "CENT",
];

/// A single recorded sample
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct DataPoint {
    /// Timestamp of the sample
    pub t: Timestamp,
    /// Recorded value
    pub v: f64,
}

impl DataPoint {
    pub fn new(t: Timestamp, v: f64) -> Self {
        Self { t, v }
    }
}

/// Bounds of one contiguous recorded span of a metric
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct DataSegmentSummary {
    pub from: Timestamp,
    pub to: Timestamp,
}

impl DataSegmentSummary {
    pub fn new(from: Timestamp, to: Timestamp) -> Self {
        Self { from, to }
    }
}

/// Earliest and latest recorded timestamps of a metric
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
pub struct Limits {
    pub from: Timestamp,
    pub to: Timestamp,
}

impl Limits {
    pub fn new(from: Timestamp, to: Timestamp) -> Self {
        Self { from, to }
    }

    /// Check if a timestamp falls within these limits (inclusive on both ends)
    pub fn contains(&self, timestamp: Timestamp) -> bool {
        timestamp >= self.from && timestamp <= self.to
    }
}

/// Metadata of one metric recording a variable
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct MetricInfo {
    /// Sampling period as declared by the descriptor
    pub period: String,
    /// Granularity (SEC, MIN, HOUR, ...)
    pub units: String,
    /// Name of the compute function applied when recording
    pub compute: String,
    /// Recorded spans, oldest first
    pub data: Vec<DataSegmentSummary>,
}

impl MetricInfo {
    pub fn new(
        period: impl Into<String>,
        units: impl Into<String>,
        compute: impl Into<String>,
    ) -> Self {
        Self {
            period: period.into(),
            units: units.into(),
            compute: compute.into(),
            data: Vec::new(),
        }
    }

    /// Builder: append a recorded span
    pub fn segment(mut self, from: Timestamp, to: Timestamp) -> Self {
        self.data.push(DataSegmentSummary::new(from, to));
        self
    }

    /// First segment's `from` and last segment's `to`, if anything was recorded
    pub fn limits(&self) -> Option<Limits> {
        let first = self.data.first()?;
        let last = self.data.last()?;
        Some(Limits::new(first.from, last.to))
    }
}

/// Metrics of a single variable, keyed by metric id
pub type VariableMetrics = BTreeMap<String, MetricInfo>;

/// In-memory metadata of one (store, group): variable → metric-id → info
///
/// Keys are kept sorted so every listing derived from the tree is stable.
#[derive(Debug, Clone, Default, Serialize, PartialEq)]
#[serde(transparent)]
pub struct MetricMetadataTree {
    variables: BTreeMap<String, VariableMetrics>,
}

impl MetricMetadataTree {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a metric under a variable, replacing any metric with the same id
    pub fn insert(
        &mut self,
        variable: impl Into<String>,
        metric_id: impl Into<String>,
        info: MetricInfo,
    ) {
        self.variables
            .entry(variable.into())
            .or_default()
            .insert(metric_id.into(), info);
    }

    /// Builder form of [`insert`](Self::insert)
    pub fn with_metric(
        mut self,
        variable: impl Into<String>,
        metric_id: impl Into<String>,
        info: MetricInfo,
    ) -> Self {
        self.insert(variable, metric_id, info);
        self
    }

    /// Get the metrics recording a variable
    pub fn variable(&self, name: &str) -> Option<&VariableMetrics> {
        self.variables.get(name)
    }

    /// Names of all variables
    pub fn variable_names(&self) -> Vec<String> {
        self.variables.keys().cloned().collect()
    }

    /// Iterate over variables and their metrics
    pub fn iter(&self) -> impl Iterator<Item = (&String, &VariableMetrics)> {
        self.variables.iter()
    }

    pub fn len(&self) -> usize {
        self.variables.len()
    }

    pub fn is_empty(&self) -> bool {
        self.variables.is_empty()
    }

    /// Total number of metrics across all variables
    pub fn metric_count(&self) -> usize {
        self.variables.values().map(|m| m.len()).sum()
    }
}

/// Render a timestamp as an RFC 3339 UTC date, falling back to the raw number
pub fn format_timestamp(timestamp: Timestamp) -> String {
    i64::try_from(timestamp)
        .ok()
        .and_then(|secs| DateTime::from_timestamp(secs, 0))
        .map(|dt| dt.format("%Y-%m-%dT%H:%M:%SZ").to_string())
        .unwrap_or_else(|| timestamp.to_string())
}
