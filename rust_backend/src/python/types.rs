use chrono::{DateTime, Utc};
use pyo3::prelude::*;

use crate::core::domain::{Interval, TrendDirection, TrendMethod};
use crate::error::{TrendError, TrendResult};
use crate::io::export::format_timestamp;

/// A detected trend interval as seen from Python.
#[pyclass(module = "trendscope", get_all)]
#[derive(Debug, Clone, PartialEq)]
pub struct TrendInterval {
    /// Method id, e.g. `"ols_slope"`
    pub method: String,
    /// `"increasing"` or `"decreasing"`
    pub direction: String,
    /// Window start in epoch milliseconds
    pub start_ms: i64,
    /// Window end in epoch milliseconds
    pub end_ms: i64,
    pub score: f64,
    pub start_iso: String,
    pub end_iso: String,
}

#[pymethods]
impl TrendInterval {
    fn __repr__(&self) -> String {
        format!(
            "TrendInterval(method={}, direction={}, start={}, end={}, score={:.6})",
            self.method, self.direction, self.start_iso, self.end_iso, self.score
        )
    }
}

impl From<&Interval> for TrendInterval {
    fn from(interval: &Interval) -> Self {
        TrendInterval {
            method: interval.method.as_str().to_string(),
            direction: interval.direction.as_str().to_string(),
            start_ms: interval.start.timestamp_millis(),
            end_ms: interval.end.timestamp_millis(),
            score: interval.score,
            start_iso: format_timestamp(&interval.start),
            end_iso: format_timestamp(&interval.end),
        }
    }
}

impl TryFrom<&TrendInterval> for Interval {
    type Error = TrendError;

    fn try_from(value: &TrendInterval) -> TrendResult<Self> {
        Ok(Interval {
            method: value.method.parse::<TrendMethod>()?,
            direction: value.direction.parse::<TrendDirection>()?,
            start: millis_to_datetime(value.start_ms)?,
            end: millis_to_datetime(value.end_ms)?,
            score: value.score,
        })
    }
}

pub(crate) fn millis_to_datetime(ms: i64) -> TrendResult<DateTime<Utc>> {
    DateTime::<Utc>::from_timestamp_millis(ms).ok_or(TrendError::InvalidTimestamp(ms))
}
