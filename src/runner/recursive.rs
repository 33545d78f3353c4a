//! Recursive query over every group below a root
//!
//! Databases are visited in traversal order and groups in name order, so an
//! unchanged tree always produces the same report. A group that fails is
//! recorded and the run moves on.

use crate::query::QuerySpec;
use crate::runner::error::RunResult;
use crate::runner::{ExitStatus, GroupOutcome, QueryRunner};
use crate::storage::{StatsAccessor, StorageError};
use serde::Serialize;
use std::io::Write;
use std::path::{Path, PathBuf};

/// Outcome of one group in a recursive run
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GroupReport {
    pub store: PathBuf,
    pub group: String,
    pub outcome: GroupOutcome,
}

/// Aggregate result of a recursive run
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RecursiveReport {
    pub status: ExitStatus,
    pub databases: usize,
    pub groups: Vec<GroupReport>,
    /// Groups whose query resolved and printed data
    pub resolved: usize,
    /// Groups that printed guidance or limits
    pub guidance: usize,
    /// Groups that could not be opened, loaded or read
    pub failed: usize,
}

impl RecursiveReport {
    fn new(status: ExitStatus) -> Self {
        Self {
            status,
            databases: 0,
            groups: Vec::new(),
            resolved: 0,
            guidance: 0,
            failed: 0,
        }
    }

    fn record(&mut self, store: &Path, group: &str, outcome: GroupOutcome) {
        match outcome {
            GroupOutcome::Data { .. } => self.resolved += 1,
            GroupOutcome::Guidance { .. } => self.guidance += 1,
            GroupOutcome::Failed { .. } => self.failed += 1,
        }
        self.groups.push(GroupReport {
            store: store.to_path_buf(),
            group: group.to_string(),
            outcome,
        });
    }
}

impl<'a, A, O, E> QueryRunner<'a, A, O, E>
where
    A: StatsAccessor,
    A::Handle: Serialize,
    O: Write,
    E: Write,
{
    /// Apply `spec` to every group of every database below `root`
    ///
    /// With `group` set, only that group of each database is queried; a
    /// database without it records a failure for that group.
    pub fn run_recursive(
        &mut self,
        root: &Path,
        group: Option<&str>,
        spec: &QuerySpec,
    ) -> RunResult<RecursiveReport> {
        if !root.is_dir() {
            self.presenter
                .error(&format!("Path not found: '{}'", root.display()))?;
            return Ok(RecursiveReport::new(ExitStatus::NotFound));
        }

        let mut report = RecursiveReport::new(ExitStatus::Success);
        let pinned = group.filter(|g| !g.is_empty());

        for store in self.locator.find_databases(root) {
            report.databases += 1;
            let groups = self.locator.find_groups(&store);

            let targets: Vec<String> = match pinned {
                Some(pinned) => vec![pinned.to_string()],
                None => groups.clone(),
            };

            for target in targets {
                self.presenter.group_header(&store, &target)?;

                let outcome = if groups.contains(&target) {
                    self.query_group(&store, Some(target.as_str()), spec)?
                } else {
                    let error = StorageError::GroupNotFound(target.clone()).to_string();
                    self.group_failed(&store, Some(target.as_str()), error)?
                };
                report.record(&store, &target, outcome);
            }
        }

        tracing::info!(
            root = ?root,
            databases = report.databases,
            groups = report.groups.len(),
            resolved = report.resolved,
            guidance = report.guidance,
            failed = report.failed,
            "Recursive listing complete"
        );

        Ok(report)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::query::ResolutionOutcome;
    use crate::runner::test_support::{database, metric, text, write};
    use crate::runner::{Presenter, RunOptions};
    use crate::storage::JsonStatsStore;
    use crate::walk::METRIC_DESCRIPTOR;
    use tempfile::tempdir;

    fn run(root: &Path, group: Option<&str>, spec: &QuerySpec) -> (RecursiveReport, String, String) {
        let store = JsonStatsStore::new().unwrap();
        let presenter = Presenter::new(Vec::new(), Vec::new());
        let mut runner = QueryRunner::new(&store, presenter, RunOptions::default()).unwrap();
        let report = runner.run_recursive(root, group, spec).unwrap();
        let (out, err) = runner.into_presenter().into_parts();
        (report, text(out), text(err))
    }

    /// Two databases: `a` with groups g1, g2 (g2 broken), `b` with g1, g3 (g3 broken)
    fn create_tree(root: &Path) {
        let a = root.join("a");
        database(&a);
        metric(&a.join("g1"), "p1", "cpu", "SEC", 100, 200);
        metric(&a.join("g2"), "p1", "cpu", "SEC", 100, 200);
        write(&a.join("g2/broken").join(METRIC_DESCRIPTOR), "{oops");

        let b = root.join("nested/b");
        database(&b);
        metric(&b.join("g1"), "p1", "cpu", "SEC", 300, 400);
        std::fs::create_dir_all(b.join("g3/no_descriptor")).unwrap();
    }

    #[test]
    fn test_counts_valid_and_broken_groups() {
        let dir = tempdir().unwrap();
        create_tree(dir.path());

        let (report, _, err) = run(dir.path(), None, &QuerySpec::new().variable("cpu"));

        assert_eq!(report.status, ExitStatus::Success);
        assert_eq!(report.databases, 2);
        assert_eq!(report.groups.len(), 4);
        assert_eq!(report.guidance, 2);
        assert_eq!(report.failed, 2);
        assert_eq!(report.resolved, 0);
        assert_eq!(err.matches("Can't open stats ").count(), 2);
    }

    #[test]
    fn test_discovery_order_is_stable() {
        let dir = tempdir().unwrap();
        create_tree(dir.path());

        let (first, out_first, _) = run(dir.path(), None, &QuerySpec::new());
        let (second, out_second, _) = run(dir.path(), None, &QuerySpec::new());

        let order: Vec<(PathBuf, String)> = first
            .groups
            .iter()
            .map(|g| (g.store.clone(), g.group.clone()))
            .collect();
        assert_eq!(
            order,
            vec![
                (dir.path().join("a"), "g1".to_string()),
                (dir.path().join("a"), "g2".to_string()),
                (dir.path().join("nested/b"), "g1".to_string()),
                (dir.path().join("nested/b"), "g3".to_string()),
            ]
        );
        assert_eq!(first, second);
        assert_eq!(out_first, out_second);
    }

    #[test]
    fn test_resolved_groups_print_data() {
        let dir = tempdir().unwrap();
        create_tree(dir.path());

        let spec = QuerySpec::new().variable("cpu").metric("p1").from(150);
        let (report, out, _) = run(dir.path(), Some("g1"), &spec);

        assert_eq!(report.groups.len(), 2);
        assert_eq!(report.resolved, 2);
        assert_eq!(
            report.groups[0].outcome,
            GroupOutcome::Data {
                metric: "p1".into(),
                from: 150,
                to: u64::MAX,
                points: 1
            }
        );
        assert_eq!(
            report.groups[1].outcome,
            GroupOutcome::Data {
                metric: "p1".into(),
                from: 150,
                to: u64::MAX,
                points: 2
            }
        );
        assert!(out.contains("/a/g1\n"));
        assert!(out.contains("/nested/b/g1\n"));
    }

    #[test]
    fn test_pinned_group_missing_in_a_database() {
        let dir = tempdir().unwrap();
        create_tree(dir.path());

        let (report, _, err) = run(dir.path(), Some("g3"), &QuerySpec::new());

        assert_eq!(report.groups.len(), 2);
        assert_eq!(report.failed, 2);
        assert!(err.contains("Group not found: 'g3'"));
    }

    #[test]
    fn test_guidance_outcome_recorded() {
        let dir = tempdir().unwrap();
        create_tree(dir.path());

        let (report, out, _) = run(dir.path(), Some("g1"), &QuerySpec::new());

        assert_eq!(
            report.groups[0].outcome,
            GroupOutcome::Guidance {
                outcome: ResolutionOutcome::NeedsVariable {
                    available: vec!["cpu".into()]
                }
            }
        );
        assert_eq!(out.matches("What Variable?").count(), 2);
    }

    #[test]
    fn test_empty_marker_groups_still_resolve() {
        let dir = tempdir().unwrap();
        create_tree(dir.path());
        write(&dir.path().join("a").join(crate::walk::DATABASE_MARKER), "");

        let (report, _, err) = run(dir.path(), Some("g1"), &QuerySpec::new().variable("cpu"));

        assert_eq!(report.databases, 2);
        assert_eq!(report.failed, 0);
        assert_eq!(report.guidance, 2);
        assert!(err.is_empty());
    }

    #[test]
    fn test_invalid_root() {
        let dir = tempdir().unwrap();
        let (report, out, err) = run(&dir.path().join("missing"), None, &QuerySpec::new());

        assert_eq!(report.status, ExitStatus::NotFound);
        assert!(report.groups.is_empty());
        assert!(out.is_empty());
        assert!(err.starts_with("Path not found"));
    }

    #[test]
    fn test_empty_root_succeeds() {
        let dir = tempdir().unwrap();
        let (report, _, _) = run(dir.path(), None, &QuerySpec::new());

        assert_eq!(report.status, ExitStatus::Success);
        assert_eq!(report.databases, 0);
    }
}
