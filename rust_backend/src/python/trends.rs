use pyo3::prelude::*;

use crate::core::domain::{Interval, TimeSeries, TrendDirection, TrendMethod};
use crate::error::{TrendError, TrendResult};
use crate::io::export::intervals_to_csv_string;
use crate::python::types::{millis_to_datetime, TrendInterval};
use crate::services::trends::{self, AnalysisRequest};
use crate::time::WindowSpec;

fn build_series(timestamps_ms: &[i64], values: &[Option<f64>]) -> TrendResult<TimeSeries> {
    if timestamps_ms.len() != values.len() {
        return Err(TrendError::InvalidConfiguration(format!(
            "Got {} timestamps but {} values",
            timestamps_ms.len(),
            values.len()
        )));
    }

    let points = timestamps_ms
        .iter()
        .zip(values)
        .map(|(&ms, &value)| millis_to_datetime(ms).map(|ts| (ts, value)))
        .collect::<TrendResult<Vec<_>>>()?;

    TimeSeries::new(points)
}

/// Detect the strongest trend intervals.
///
/// Args:
///     timestamps_ms: Sample times as epoch milliseconds, non-decreasing
///     values: Sample values; None or NaN marks a missing sample
///     window: Window size, e.g. "5min", "30s", or "20" for a sample count
///     methods: Method ids or labels, e.g. ["ols_slope", "Kendall's tau"]
///     direction: "increasing" or "decreasing"
///     top_k: Number of intervals per method
///
/// Returns:
///     list[TrendInterval], grouped by method in request order
#[pyfunction]
#[pyo3(signature = (timestamps_ms, values, window, methods, direction="decreasing", top_k=1))]
pub fn detect_trend_intervals(
    timestamps_ms: Vec<i64>,
    values: Vec<Option<f64>>,
    window: &str,
    methods: Vec<String>,
    direction: &str,
    top_k: usize,
) -> PyResult<Vec<TrendInterval>> {
    let series = build_series(&timestamps_ms, &values)?;
    let methods = methods
        .iter()
        .map(|m| m.parse::<TrendMethod>())
        .collect::<TrendResult<Vec<_>>>()?;
    let request = AnalysisRequest::new(
        methods,
        window.parse::<WindowSpec>()?,
        direction.parse::<TrendDirection>()?,
        top_k,
    );

    let report = trends::detect_trends(&series, &request)?;
    Ok(report.intervals().iter().map(TrendInterval::from).collect())
}

/// Rolling score series of a single method.
///
/// Returns:
///     list[tuple[int, float | None]]: (window end in epoch ms, score)
#[pyfunction]
pub fn rolling_trend_scores(
    timestamps_ms: Vec<i64>,
    values: Vec<Option<f64>>,
    window: &str,
    method: &str,
) -> PyResult<Vec<(i64, Option<f64>)>> {
    let series = build_series(&timestamps_ms, &values)?;
    let scores = trends::rolling_scores(
        &series,
        window.parse::<WindowSpec>()?,
        method.parse::<TrendMethod>()?,
    )?;

    Ok(scores
        .points
        .iter()
        .map(|p| (p.end.timestamp_millis(), p.score.value()))
        .collect())
}

/// Render intervals as CSV text with columns method,direction,start,end,slope.
#[pyfunction]
pub fn intervals_to_csv(intervals: Vec<PyRef<'_, TrendInterval>>) -> PyResult<String> {
    let intervals = intervals
        .iter()
        .map(|i| Interval::try_from(&**i))
        .collect::<TrendResult<Vec<_>>>()?;
    Ok(intervals_to_csv_string(&intervals)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_series_rejects_length_mismatch() {
        let result = build_series(&[0, 1000], &[Some(1.0)]);
        assert!(matches!(result, Err(TrendError::InvalidConfiguration(_))));
    }

    #[test]
    fn test_build_series_keeps_missing_values() {
        let series = build_series(&[0, 1000, 2000], &[Some(1.0), None, Some(f64::NAN)]).unwrap();
        assert_eq!(series.len(), 3);
        assert_eq!(series.missing_count(), 2);
    }

    #[test]
    fn test_build_series_rejects_unordered() {
        let result = build_series(&[2000, 1000], &[Some(1.0), Some(2.0)]);
        assert!(matches!(result, Err(TrendError::UnorderedTimestamps { .. })));
    }
}
