//! Query Resolver
//!
//! Matches a [`QuerySpec`] against the metadata tree of one group and decides
//! either the exact metric and range to fetch, or which piece of information
//! is missing together with the valid choices for it.
//!
//! # Decision Order
//!
//! ```text
//! show_limits → variable given? → variable known? → units match? →
//! metric given? → metric known? → range given? → Resolved
//! ```
//!
//! Each step assumes every earlier step succeeded, so the order is fixed.

use crate::query::spec::QuerySpec;
use crate::storage::{
    Limits, MetricInfo, MetricMetadataTree, Timestamp, VariableMetrics, MAX_TIMESTAMP,
    MIN_TIMESTAMP,
};
use serde::Serialize;

/// Recorded limits of one metric
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MetricLimits {
    pub metric: String,
    pub units: String,
    /// `None` when the metric has no recorded data
    pub limits: Option<Limits>,
}

/// Recorded limits of every metric of one variable
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct VariableLimits {
    pub variable: String,
    pub metrics: Vec<MetricLimits>,
}

/// Terminal result of resolving a query against a metadata tree
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum ResolutionOutcome {
    /// Fully specified: fetch `metric` over `[from, to]`
    Resolved {
        metric: String,
        from: Timestamp,
        to: Timestamp,
    },
    /// No variable given
    NeedsVariable { available: Vec<String> },
    /// Neither metric nor units given
    NeedsMetricOrUnits {
        metrics: Vec<String>,
        units: Vec<String>,
    },
    /// Metric given but not recorded for the variable
    MetricNotFound { name: String, metrics: Vec<String> },
    /// Metric fixed but no range given
    NeedsRange {
        metric: String,
        limits: Option<Limits>,
    },
    /// Variable given but not present
    VariableNotFound { name: String, available: Vec<String> },
    /// Units given but no metric of the variable records them
    UnitsNotFound { name: String, available: Vec<String> },
    /// Limits requested instead of data
    LimitsOnly { variables: Vec<VariableLimits> },
}

impl ResolutionOutcome {
    /// Short name of the outcome, for logs and reports
    pub fn kind(&self) -> &'static str {
        match self {
            ResolutionOutcome::Resolved { .. } => "resolved",
            ResolutionOutcome::NeedsVariable { .. } => "needs_variable",
            ResolutionOutcome::NeedsMetricOrUnits { .. } => "needs_metric_or_units",
            ResolutionOutcome::MetricNotFound { .. } => "metric_not_found",
            ResolutionOutcome::NeedsRange { .. } => "needs_range",
            ResolutionOutcome::VariableNotFound { .. } => "variable_not_found",
            ResolutionOutcome::UnitsNotFound { .. } => "units_not_found",
            ResolutionOutcome::LimitsOnly { .. } => "limits_only",
        }
    }
}

/// Resolve `spec` against `tree`
///
/// Pure: the same tree and spec always give the same outcome.
pub fn resolve(tree: &MetricMetadataTree, spec: &QuerySpec) -> ResolutionOutcome {
    if spec.show_limits {
        return ResolutionOutcome::LimitsOnly {
            variables: all_limits(tree),
        };
    }

    let variable = match spec.variable_name() {
        Some(v) => v,
        None => {
            return ResolutionOutcome::NeedsVariable {
                available: tree.variable_names(),
            }
        }
    };

    let metrics = match tree.variable(variable) {
        Some(m) => m,
        None => {
            return ResolutionOutcome::VariableNotFound {
                name: variable.to_string(),
                available: tree.variable_names(),
            }
        }
    };

    let (metric_id, info) = match spec.units_name() {
        Some(units) => match metrics.iter().find(|(_, info)| info.units == units) {
            Some(found) => found,
            None => {
                return ResolutionOutcome::UnitsNotFound {
                    name: units.to_string(),
                    available: units_of(metrics),
                }
            }
        },
        None => match spec.metric_name() {
            None => {
                return ResolutionOutcome::NeedsMetricOrUnits {
                    metrics: metrics.keys().cloned().collect(),
                    units: units_of(metrics),
                }
            }
            Some(name) => match metrics.get_key_value(name) {
                Some(found) => found,
                None => {
                    return ResolutionOutcome::MetricNotFound {
                        name: name.to_string(),
                        metrics: metrics.keys().cloned().collect(),
                    }
                }
            },
        },
    };

    resolve_range(metric_id, info, spec)
}

fn resolve_range(metric_id: &str, info: &MetricInfo, spec: &QuerySpec) -> ResolutionOutcome {
    let (from, to) = (spec.from_time(), spec.to_time());
    if from.is_none() && to.is_none() {
        return ResolutionOutcome::NeedsRange {
            metric: metric_id.to_string(),
            limits: info.limits(),
        };
    }

    ResolutionOutcome::Resolved {
        metric: metric_id.to_string(),
        from: from.unwrap_or(MIN_TIMESTAMP),
        to: to.unwrap_or(MAX_TIMESTAMP),
    }
}

/// Units of a variable's metrics in metric order, without repeats
fn units_of(metrics: &VariableMetrics) -> Vec<String> {
    let mut units: Vec<String> = Vec::new();
    for info in metrics.values() {
        if !units.contains(&info.units) {
            units.push(info.units.clone());
        }
    }
    units
}

fn all_limits(tree: &MetricMetadataTree) -> Vec<VariableLimits> {
    tree.iter()
        .map(|(variable, metrics)| VariableLimits {
            variable: variable.clone(),
            metrics: metrics
                .iter()
                .map(|(metric, info)| MetricLimits {
                    metric: metric.clone(),
                    units: info.units.clone(),
                    limits: info.limits(),
                })
                .collect(),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cpu_tree() -> MetricMetadataTree {
        MetricMetadataTree::new()
            .with_metric(
                "cpu",
                "p1",
                MetricInfo::new("1", "SEC", "average").segment(100, 150).segment(160, 200),
            )
            .with_metric("disk", "d1", MetricInfo::new("60", "MIN", "sum").segment(10, 20))
    }

    fn multi_units_tree() -> MetricMetadataTree {
        MetricMetadataTree::new()
            .with_metric("cpu", "p_sec", MetricInfo::new("1", "SEC", "average").segment(1, 2))
            .with_metric("cpu", "p_min", MetricInfo::new("60", "MIN", "average").segment(3, 4))
            .with_metric("cpu", "p_sec2", MetricInfo::new("1", "SEC", "max").segment(5, 6))
    }

    #[test]
    fn test_needs_variable() {
        let outcome = resolve(&cpu_tree(), &QuerySpec::new());
        assert_eq!(
            outcome,
            ResolutionOutcome::NeedsVariable {
                available: vec!["cpu".into(), "disk".into()]
            }
        );
    }

    #[test]
    fn test_variable_not_found() {
        let outcome = resolve(&cpu_tree(), &QuerySpec::new().variable("mem"));
        assert_eq!(
            outcome,
            ResolutionOutcome::VariableNotFound {
                name: "mem".into(),
                available: vec!["cpu".into(), "disk".into()]
            }
        );
    }

    #[test]
    fn test_needs_metric_or_units() {
        let outcome = resolve(&cpu_tree(), &QuerySpec::new().variable("cpu"));
        assert_eq!(
            outcome,
            ResolutionOutcome::NeedsMetricOrUnits {
                metrics: vec!["p1".into()],
                units: vec!["SEC".into()]
            }
        );
    }

    #[test]
    fn test_needs_metric_or_units_lists_each_once() {
        let outcome = resolve(&multi_units_tree(), &QuerySpec::new().variable("cpu"));
        assert_eq!(
            outcome,
            ResolutionOutcome::NeedsMetricOrUnits {
                metrics: vec!["p_min".into(), "p_sec".into(), "p_sec2".into()],
                units: vec!["MIN".into(), "SEC".into()]
            }
        );
    }

    #[test]
    fn test_units_select_metric() {
        let spec = QuerySpec::new().variable("cpu").units("SEC");
        assert_eq!(
            resolve(&cpu_tree(), &spec),
            ResolutionOutcome::NeedsRange {
                metric: "p1".into(),
                limits: Some(Limits::new(100, 200))
            }
        );

        // First metric in id order wins
        let spec = QuerySpec::new().variable("cpu").units("SEC").from(2);
        assert_eq!(
            resolve(&multi_units_tree(), &spec),
            ResolutionOutcome::Resolved {
                metric: "p_sec".into(),
                from: 2,
                to: MAX_TIMESTAMP
            }
        );
    }

    #[test]
    fn test_units_take_precedence_over_metric() {
        let spec = QuerySpec::new()
            .variable("cpu")
            .metric("p_sec2")
            .units("MIN")
            .from(1)
            .to(9);
        assert_eq!(
            resolve(&multi_units_tree(), &spec),
            ResolutionOutcome::Resolved {
                metric: "p_min".into(),
                from: 1,
                to: 9
            }
        );
    }

    #[test]
    fn test_units_not_found_is_case_sensitive() {
        let spec = QuerySpec::new().variable("cpu").units("sec");
        assert_eq!(
            resolve(&cpu_tree(), &spec),
            ResolutionOutcome::UnitsNotFound {
                name: "sec".into(),
                available: vec!["SEC".into()]
            }
        );
    }

    #[test]
    fn test_metric_not_found() {
        let spec = QuerySpec::new().variable("cpu").metric("p9");
        assert_eq!(
            resolve(&cpu_tree(), &spec),
            ResolutionOutcome::MetricNotFound {
                name: "p9".into(),
                metrics: vec!["p1".into()]
            }
        );
    }

    #[test]
    fn test_resolved_open_ended() {
        let spec = QuerySpec::new().variable("cpu").metric("p1").from(150);
        assert_eq!(
            resolve(&cpu_tree(), &spec),
            ResolutionOutcome::Resolved {
                metric: "p1".into(),
                from: 150,
                to: MAX_TIMESTAMP
            }
        );
    }

    #[test]
    fn test_resolved_defaults_from() {
        let spec = QuerySpec::new().variable("cpu").metric("p1").to(180);
        assert_eq!(
            resolve(&cpu_tree(), &spec),
            ResolutionOutcome::Resolved {
                metric: "p1".into(),
                from: MIN_TIMESTAMP,
                to: 180
            }
        );
    }

    #[test]
    fn test_resolved_echoes_range() {
        let tree = cpu_tree();
        for (from, to) in [(100, 200), (120, 130), (160, 160)] {
            let spec = QuerySpec::new().variable("cpu").metric("p1").from(from).to(to);
            assert_eq!(
                resolve(&tree, &spec),
                ResolutionOutcome::Resolved {
                    metric: "p1".into(),
                    from,
                    to
                }
            );
        }
    }

    #[test]
    fn test_needs_range_without_data() {
        let tree = MetricMetadataTree::new().with_metric("cpu", "p1", MetricInfo::new("1", "SEC", "average"));
        let spec = QuerySpec::new().variable("cpu").metric("p1");
        assert_eq!(
            resolve(&tree, &spec),
            ResolutionOutcome::NeedsRange {
                metric: "p1".into(),
                limits: None
            }
        );
    }

    #[test]
    fn test_show_limits_ignores_other_fields() {
        let tree = cpu_tree();
        let plain = resolve(&tree, &QuerySpec::new().show_limits(true));
        let noisy = resolve(
            &tree,
            &QuerySpec::new()
                .show_limits(true)
                .variable("mem")
                .metric("zz")
                .units("YEAR")
                .from(5),
        );

        assert_eq!(plain, noisy);
        match plain {
            ResolutionOutcome::LimitsOnly { variables } => {
                assert_eq!(variables.len(), 2);
                assert_eq!(variables[0].variable, "cpu");
                assert_eq!(
                    variables[0].metrics,
                    vec![MetricLimits {
                        metric: "p1".into(),
                        units: "SEC".into(),
                        limits: Some(Limits::new(100, 200))
                    }]
                );
                assert_eq!(variables[1].metrics[0].limits, Some(Limits::new(10, 20)));
            }
            other => panic!("unexpected outcome {:?}", other),
        }
    }

    #[test]
    fn test_resolve_is_deterministic() {
        let tree = multi_units_tree();
        let specs = [
            QuerySpec::new(),
            QuerySpec::new().variable("cpu"),
            QuerySpec::new().variable("cpu").units("SEC"),
            QuerySpec::new().variable("cpu").metric("p_min").from(3),
        ];
        for spec in &specs {
            assert_eq!(resolve(&tree, spec), resolve(&tree.clone(), &spec.clone()));
        }
    }

    #[test]
    fn test_every_variable_lists_its_metrics() {
        let tree = cpu_tree();
        for (variable, metrics) in tree.iter() {
            match resolve(&tree, &QuerySpec::new().variable(variable.as_str())) {
                ResolutionOutcome::NeedsMetricOrUnits { metrics: listed, .. } => {
                    assert_eq!(listed, metrics.keys().cloned().collect::<Vec<_>>());
                }
                other => panic!("unexpected outcome {:?}", other),
            }
        }
    }

    #[test]
    fn test_outcome_serialization() {
        let outcome = ResolutionOutcome::NeedsVariable {
            available: vec!["cpu".into()],
        };
        let json = serde_json::to_value(&outcome).unwrap();
        assert_eq!(json["outcome"], "needs_variable");
        assert_eq!(outcome.kind(), "needs_variable");
    }
}
