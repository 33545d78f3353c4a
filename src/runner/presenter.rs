//! Presenter - everything the tool prints
//!
//! Guidance listings and data go to `out`; structural problems (missing
//! paths, groups, metrics, stores that fail to open) go to `err`.

use crate::query::{ResolutionOutcome, VariableLimits};
use crate::storage::{format_timestamp, DataPoint, Limits};
use crate::walk::MetricLocation;
use serde::Serialize;
use std::io::{self, Write};
use std::path::Path;

const INDENT_HEADER: &str = "    ";
const INDENT_ITEM: &str = "        ";

/// Writes guidance, listings and results
#[derive(Debug)]
pub struct Presenter<O: Write, E: Write> {
    out: O,
    err: E,
}

impl Presenter<io::Stdout, io::Stderr> {
    /// Presenter over the process's stdout and stderr
    pub fn stdio() -> Self {
        Self::new(io::stdout(), io::stderr())
    }
}

impl<O: Write, E: Write> Presenter<O, E> {
    pub fn new(out: O, err: E) -> Self {
        Self { out, err }
    }

    /// Give back the underlying writers
    pub fn into_parts(self) -> (O, E) {
        (self.out, self.err)
    }

    /// Print the guidance for a non-resolved outcome
    ///
    /// `Resolved` outcomes print nothing here; their data goes through
    /// [`data`](Self::data).
    pub fn outcome(&mut self, outcome: &ResolutionOutcome) -> io::Result<()> {
        match outcome {
            ResolutionOutcome::Resolved { .. } => Ok(()),
            ResolutionOutcome::NeedsVariable { available } => {
                writeln!(self.out, "What Variable?")?;
                self.list("Available Variables", available)
            }
            ResolutionOutcome::VariableNotFound { name, available } => {
                writeln!(self.out, "Variable \"{}\" not found", name)?;
                self.list("Available Variables", available)
            }
            ResolutionOutcome::UnitsNotFound { available, .. } => {
                writeln!(self.out, "What Units?")?;
                self.list("Available Units", available)
            }
            ResolutionOutcome::NeedsMetricOrUnits { metrics, units } => {
                writeln!(self.out, "What Metric or Units?")?;
                self.list("Available Metrics", metrics)?;
                self.list("Available Units", units)
            }
            ResolutionOutcome::MetricNotFound { metrics, .. } => {
                writeln!(self.out, "What Metric?")?;
                self.list("Available Metrics", metrics)
            }
            ResolutionOutcome::NeedsRange { limits, .. } => {
                writeln!(self.out, "What Range?")?;
                writeln!(self.out, "{}Available Limits:", INDENT_HEADER)?;
                self.limits(limits.as_ref())
            }
            ResolutionOutcome::LimitsOnly { variables } => self.all_limits(variables),
        }
    }

    fn list(&mut self, title: &str, items: &[String]) -> io::Result<()> {
        writeln!(self.out, "{}{}:", INDENT_HEADER, title)?;
        for item in items {
            writeln!(self.out, "{}{}", INDENT_ITEM, item)?;
        }
        Ok(())
    }

    fn limits(&mut self, limits: Option<&Limits>) -> io::Result<()> {
        if let Some(limits) = limits {
            writeln!(self.out, "{}From {}", INDENT_ITEM, format_timestamp(limits.from))?;
            writeln!(self.out, "{}To   {}", INDENT_ITEM, format_timestamp(limits.to))?;
        }
        Ok(())
    }

    fn all_limits(&mut self, variables: &[VariableLimits]) -> io::Result<()> {
        for variable in variables {
            writeln!(self.out, "   Variable: {}", variable.variable)?;
            for metric in &variable.metrics {
                writeln!(self.out, "   Metric: {}, Units: {}", metric.metric, metric.units)?;
                self.limits(metric.limits.as_ref())?;
            }
        }
        Ok(())
    }

    /// Print the points of a resolved query
    pub fn data(&mut self, points: &[DataPoint]) -> io::Result<()> {
        self.json(&points)
    }

    /// Pretty-print any serializable value
    pub fn json<T: Serialize + ?Sized>(&mut self, value: &T) -> io::Result<()> {
        serde_json::to_writer_pretty(&mut self.out, value)?;
        writeln!(self.out)
    }

    /// Header printed before each group of a recursive run
    pub fn group_header(&mut self, store: &Path, group: &str) -> io::Result<()> {
        writeln!(self.out, "==> {}/{}", store.display(), group)
    }

    /// Prompt for a group with the groups a store holds
    pub fn groups(&mut self, groups: &[String]) -> io::Result<()> {
        writeln!(self.out, "What Group?")?;
        self.list("Available Groups", groups)
    }

    /// One database and its metrics, as found below a path
    pub fn database(&mut self, store: &Path, metrics: &[MetricLocation]) -> io::Result<()> {
        writeln!(self.out, "Stats database ==> '{}'", store.display())?;
        for location in metrics {
            if let Some(group) = &location.group {
                writeln!(self.out, "  Group  ==> '{}'", group)?;
            }
            writeln!(self.out, "  Metric ==> '{}'", location.metric)?;
        }
        writeln!(self.out)
    }

    /// Structural problem report
    pub fn error(&mut self, message: &str) -> io::Result<()> {
        writeln!(self.err, "{}", message)
    }
}
