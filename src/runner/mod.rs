//! Query Runners
//!
//! Drive discovery, store access and resolution for one target or for every
//! group below a root:
//!
//! - **single**: one (path, group, metric) with structural checks
//! - **recursive**: every group of every database below a root
//! - **presenter**: all printed output
//! - **error**: Error types
//!
//! # Flow per group
//!
//! ```text
//! open(path, group) → load_metrics → resolve → Resolved: fetch_range → print data
//!                                            → otherwise: print guidance
//! ```
//!
//! The store handle and metadata tree of a group are dropped before the next
//! group is opened, whatever the outcome.

mod error;
mod presenter;
mod recursive;
mod single;

pub use error::{RunError, RunResult};
pub use presenter::Presenter;
pub use recursive::{GroupReport, RecursiveReport};

use crate::query::{resolve, QuerySpec, ResolutionOutcome};
use crate::storage::{StatsAccessor, Timestamp};
use crate::walk::StoreLocator;
use serde::Serialize;
use std::io::Write;
use std::path::Path;

/// Process exit status of a run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ExitStatus {
    /// Query resolved and printed (or limits listed)
    Success,
    /// Guidance printed, more input needed
    Guidance,
    /// Path, group or metric not present, or the store failed
    NotFound,
}

impl ExitStatus {
    pub fn code(&self) -> i32 {
        match self {
            ExitStatus::Success => 0,
            ExitStatus::Guidance => 1,
            ExitStatus::NotFound => 2,
        }
    }
}

/// Run-wide switches
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunOptions {
    /// Open path/group directly, without database or group checks
    pub raw: bool,
    /// Print the store handle and metadata tree before resolving
    pub verbose: bool,
}

/// What happened to one group
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum GroupOutcome {
    /// Query resolved and its data printed
    Data {
        metric: String,
        from: Timestamp,
        to: Timestamp,
        points: usize,
    },
    /// Guidance printed (including limit listings)
    Guidance { outcome: ResolutionOutcome },
    /// Store could not be opened, loaded or read
    Failed { error: String },
}

impl GroupOutcome {
    /// Exit status this outcome maps to
    pub fn status(&self) -> ExitStatus {
        match self {
            GroupOutcome::Data { .. } => ExitStatus::Success,
            GroupOutcome::Guidance {
                outcome: ResolutionOutcome::LimitsOnly { .. },
            } => ExitStatus::Success,
            GroupOutcome::Guidance { .. } => ExitStatus::Guidance,
            GroupOutcome::Failed { .. } => ExitStatus::NotFound,
        }
    }
}

/// Runs queries against stats stores and prints the results
pub struct QueryRunner<'a, A: StatsAccessor, O: Write, E: Write> {
    accessor: &'a A,
    locator: StoreLocator,
    presenter: Presenter<O, E>,
    options: RunOptions,
}

impl<'a, A, O, E> QueryRunner<'a, A, O, E>
where
    A: StatsAccessor,
    A::Handle: Serialize,
    O: Write,
    E: Write,
{
    pub fn new(
        accessor: &'a A,
        presenter: Presenter<O, E>,
        options: RunOptions,
    ) -> RunResult<Self> {
        Ok(Self {
            accessor,
            locator: StoreLocator::new()?,
            presenter,
            options,
        })
    }

    /// Give back the presenter, with everything printed so far
    pub fn into_presenter(self) -> Presenter<O, E> {
        self.presenter
    }

    /// Open one (path, group), resolve `spec` against it and print the result
    fn query_group(
        &mut self,
        path: &Path,
        group: Option<&str>,
        spec: &QuerySpec,
    ) -> RunResult<GroupOutcome> {
        let handle = match self.accessor.open(path, group) {
            Ok(handle) => handle,
            Err(e) => return self.group_failed(path, group, e.to_string()),
        };
        if self.options.verbose {
            self.presenter.json(&handle)?;
        }

        let tree = match self.accessor.load_metrics(&handle) {
            Ok(tree) => tree,
            Err(e) => return self.group_failed(path, group, e.to_string()),
        };
        if self.options.verbose {
            self.presenter.json(&tree)?;
        }

        let outcome = resolve(&tree, spec);
        tracing::debug!(path = ?path, group = ?group, outcome = outcome.kind(), "Resolved query");

        match outcome {
            ResolutionOutcome::Resolved { metric, from, to } => {
                let points = match self.accessor.fetch_range(&handle, &metric, from, to) {
                    Ok(points) => points,
                    Err(e) => return self.group_failed(path, group, e.to_string()),
                };
                self.presenter.data(&points)?;
                Ok(GroupOutcome::Data {
                    metric,
                    from,
                    to,
                    points: points.len(),
                })
            }
            outcome => {
                self.presenter.outcome(&outcome)?;
                Ok(GroupOutcome::Guidance { outcome })
            }
        }
    }

    fn group_failed(
        &mut self,
        path: &Path,
        group: Option<&str>,
        error: String,
    ) -> RunResult<GroupOutcome> {
        tracing::warn!(path = ?path, group = ?group, error = %error, "Stats group failed");
        self.presenter.error(&format!(
            "Can't open stats {}/{}: {}",
            path.display(),
            group.unwrap_or(""),
            error
        ))?;
        Ok(GroupOutcome::Failed { error })
    }
}
