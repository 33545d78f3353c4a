//! Query specification
//!
//! A [`QuerySpec`] is built once from user input and shared read-only by
//! every resolution it drives. Unset fields are wildcards.

use crate::query::error::{QueryError, QueryResult};
use crate::storage::Timestamp;
use chrono::{DateTime, NaiveDate, NaiveDateTime};

/// A partially or fully specified stats query
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QuerySpec {
    /// Range start (inclusive)
    pub from: Option<Timestamp>,
    /// Range end (inclusive)
    pub to: Option<Timestamp>,
    pub variable: Option<String>,
    pub metric: Option<String>,
    pub units: Option<String>,
    /// List the recorded limits of every metric instead of querying
    pub show_limits: bool,
}

impl QuerySpec {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from(mut self, from: Timestamp) -> Self {
        self.from = Some(from);
        self
    }

    pub fn to(mut self, to: Timestamp) -> Self {
        self.to = Some(to);
        self
    }

    pub fn variable(mut self, variable: impl Into<String>) -> Self {
        self.variable = Some(variable.into());
        self
    }

    pub fn metric(mut self, metric: impl Into<String>) -> Self {
        self.metric = Some(metric.into());
        self
    }

    pub fn units(mut self, units: impl Into<String>) -> Self {
        self.units = Some(units.into());
        self
    }

    pub fn show_limits(mut self, show: bool) -> Self {
        self.show_limits = show;
        self
    }

    /// Requested variable, ignoring empty strings
    pub fn variable_name(&self) -> Option<&str> {
        non_empty(&self.variable)
    }

    /// Requested metric, ignoring empty strings
    pub fn metric_name(&self) -> Option<&str> {
        non_empty(&self.metric)
    }

    /// Requested units, ignoring empty strings
    pub fn units_name(&self) -> Option<&str> {
        non_empty(&self.units)
    }

    /// Range start; timestamp 0 counts as unset
    pub fn from_time(&self) -> Option<Timestamp> {
        self.from.filter(|t| *t != 0)
    }

    /// Range end; timestamp 0 counts as unset
    pub fn to_time(&self) -> Option<Timestamp> {
        self.to.filter(|t| *t != 0)
    }

    /// Copy of this spec with `metric` filled in when it is not set
    pub fn with_default_metric(&self, metric: Option<&str>) -> QuerySpec {
        let mut spec = self.clone();
        if spec.metric_name().is_none() {
            spec.metric = metric.map(str::to_string);
        }
        spec
    }
}

fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|s| !s.is_empty())
}

/// Parse a time argument into a unix timestamp (seconds)
///
/// All-digit input is taken as a timestamp. Otherwise RFC 3339 and the
/// `%Y-%m-%dT%H:%M:%S`, `%Y-%m-%d %H:%M:%S` and `%Y-%m-%d` forms are
/// accepted, the last three read as UTC.
pub fn parse_time(input: &str) -> QueryResult<Timestamp> {
    let s = input.trim();
    if s.is_empty() {
        return Err(QueryError::InvalidTime(input.to_string()));
    }

    if s.bytes().all(|b| b.is_ascii_digit()) {
        return s
            .parse::<Timestamp>()
            .map_err(|_| QueryError::InvalidTime(input.to_string()));
    }

    let seconds = if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        dt.timestamp()
    } else if let Ok(dt) = NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S") {
        dt.and_utc().timestamp()
    } else if let Ok(dt) = NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S") {
        dt.and_utc().timestamp()
    } else if let Some(dt) = NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
    {
        dt.and_utc().timestamp()
    } else {
        return Err(QueryError::InvalidTime(input.to_string()));
    };

    Timestamp::try_from(seconds).map_err(|_| QueryError::InvalidTime(input.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder() {
        let spec = QuerySpec::new().variable("cpu").units("SEC").from(150);

        assert_eq!(spec.variable_name(), Some("cpu"));
        assert_eq!(spec.units_name(), Some("SEC"));
        assert_eq!(spec.metric_name(), None);
        assert_eq!(spec.from_time(), Some(150));
        assert_eq!(spec.to_time(), None);
        assert!(!spec.show_limits);
    }

    #[test]
    fn test_empty_values_are_unset() {
        let spec = QuerySpec::new().variable("").metric("").from(0).to(0);

        assert_eq!(spec.variable_name(), None);
        assert_eq!(spec.metric_name(), None);
        assert_eq!(spec.from_time(), None);
        assert_eq!(spec.to_time(), None);
    }

    #[test]
    fn test_default_metric() {
        let spec = QuerySpec::new().variable("cpu");
        assert_eq!(spec.with_default_metric(Some("p1")).metric_name(), Some("p1"));

        let spec = spec.metric("p2");
        assert_eq!(spec.with_default_metric(Some("p1")).metric_name(), Some("p2"));
    }

    #[test]
    fn test_parse_time_numeric() {
        assert_eq!(parse_time("150").unwrap(), 150);
        assert_eq!(parse_time(" 1700000000 ").unwrap(), 1_700_000_000);
    }

    #[test]
    fn test_parse_time_dates() {
        assert_eq!(parse_time("1970-01-02").unwrap(), 86_400);
        assert_eq!(parse_time("1970-01-01T00:01:40").unwrap(), 100);
        assert_eq!(parse_time("1970-01-01 00:01:40").unwrap(), 100);
        assert_eq!(parse_time("1970-01-01T01:01:40+01:00").unwrap(), 100);
    }

    #[test]
    fn test_parse_time_invalid() {
        assert!(parse_time("").is_err());
        assert!(parse_time("yesterday-ish").is_err());
        assert!(parse_time("1969-12-31").is_err());
    }
}
