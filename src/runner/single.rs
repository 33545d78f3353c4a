//! Single-shot query against one database path

use crate::query::QuerySpec;
use crate::runner::error::RunResult;
use crate::runner::{ExitStatus, QueryRunner};
use crate::storage::{StatsAccessor, StorageError};
use crate::walk::StoreLocator;
use serde::Serialize;
use std::io::Write;
use std::path::Path;

impl<'a, A, O, E> QueryRunner<'a, A, O, E>
where
    A: StatsAccessor,
    A::Handle: Serialize,
    O: Write,
    E: Write,
{
    /// Query one database, checking that the path, group and metric exist
    ///
    /// A missing piece is reported with the choices available at that level.
    /// A pinned `metric` fills the query's metric when the query has none.
    pub fn run_single(
        &mut self,
        path: &Path,
        group: Option<&str>,
        metric: Option<&str>,
        spec: &QuerySpec,
    ) -> RunResult<ExitStatus> {
        let spec = spec.with_default_metric(metric);

        if self.options.raw {
            return Ok(self.query_group(path, group, &spec)?.status());
        }

        if !StoreLocator::is_database(path) {
            return self.report_missing_database(path);
        }

        let group = match group.filter(|g| !g.is_empty()) {
            Some(group) => group,
            None => {
                let groups = self.locator.find_groups(path);
                self.presenter.groups(&groups)?;
                return Ok(ExitStatus::Guidance);
            }
        };

        let group_dir = path.join(group);
        if !group_dir.is_dir() {
            self.presenter
                .error(&StorageError::GroupNotFound(group.to_string()).to_string())?;
            let groups = self.locator.find_groups(path);
            self.presenter.groups(&groups)?;
            return Ok(ExitStatus::NotFound);
        }

        if let Some(metric) = metric.filter(|m| !m.is_empty()) {
            if !StoreLocator::has_descriptor(&group_dir.join(metric)) {
                self.presenter
                    .error(&StorageError::MetricNotFound(metric.to_string()).to_string())?;
                return Ok(ExitStatus::NotFound);
            }
        }

        Ok(self.query_group(path, Some(group), &spec)?.status())
    }

    fn report_missing_database(&mut self, path: &Path) -> RunResult<ExitStatus> {
        if !path.is_dir() {
            self.presenter
                .error(&format!("Path not found: '{}'", path.display()))?;
            return Ok(ExitStatus::NotFound);
        }

        self.presenter.error("What Stats Database?")?;
        for store in self.locator.find_databases(path) {
            let metrics = self.locator.find_metrics(&store);
            self.presenter.database(&store, &metrics)?;
        }
        Ok(ExitStatus::NotFound)
    }
}
