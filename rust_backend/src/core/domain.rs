//! Domain models for time series, trend scores and detected intervals.
//!
//! This module provides the value types that flow through the trend pipeline:
//! the input [`TimeSeries`], the per-window [`Score`], ranked score points and
//! the materialized [`Interval`] records handed to rendering and export.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::{TrendError, TrendResult};

/// An ordered scalar series indexed by UTC timestamps.
///
/// Values are optional: `None` marks a missing sample. Non-finite inputs
/// (NaN, infinities) are stored as missing, so no NaN ever reaches the
/// scoring arithmetic.
///
/// Timestamps must be non-decreasing. Duplicate timestamps are accepted and
/// handled downstream as degenerate windows.
///
/// # Examples
///
/// ```
/// use chrono::{TimeZone, Utc};
/// use trendscope::core::domain::TimeSeries;
///
/// let t0 = Utc.with_ymd_and_hms(2024, 5, 1, 8, 0, 0).unwrap();
/// let series = TimeSeries::new(vec![
///     (t0, Some(61.0)),
///     (t0 + chrono::TimeDelta::seconds(5), None),
/// ])
/// .unwrap();
///
/// assert_eq!(series.len(), 2);
/// assert_eq!(series.missing_count(), 1);
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TimeSeries {
    timestamps: Vec<DateTime<Utc>>,
    values: Vec<Option<f64>>,
}

impl TimeSeries {
    /// Builds a series from `(timestamp, value)` pairs already in time order.
    ///
    /// Returns [`TrendError::UnorderedTimestamps`] at the first timestamp that
    /// is earlier than its predecessor.
    pub fn new(points: Vec<(DateTime<Utc>, Option<f64>)>) -> TrendResult<Self> {
        let mut timestamps = Vec::with_capacity(points.len());
        let mut values = Vec::with_capacity(points.len());

        for (index, (ts, value)) in points.into_iter().enumerate() {
            if let Some(prev) = timestamps.last() {
                if ts < *prev {
                    return Err(TrendError::UnorderedTimestamps { index });
                }
            }
            timestamps.push(ts);
            values.push(value.filter(|v| v.is_finite()));
        }

        Ok(Self { timestamps, values })
    }

    /// Builds a series from pairs in arbitrary order.
    ///
    /// Points are sorted stably by timestamp, so samples sharing a timestamp
    /// keep their input order.
    pub fn from_unsorted(mut points: Vec<(DateTime<Utc>, Option<f64>)>) -> Self {
        points.sort_by_key(|(ts, _)| *ts);
        let (timestamps, values) = points
            .into_iter()
            .map(|(ts, v)| (ts, v.filter(|x| x.is_finite())))
            .unzip();
        Self { timestamps, values }
    }

    pub fn len(&self) -> usize {
        self.timestamps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.timestamps.is_empty()
    }

    pub fn timestamps(&self) -> &[DateTime<Utc>] {
        &self.timestamps
    }

    pub fn values(&self) -> &[Option<f64>] {
        &self.values
    }

    /// Number of samples with a missing value.
    pub fn missing_count(&self) -> usize {
        self.values.iter().filter(|v| v.is_none()).count()
    }

    /// Iterates over `(timestamp, value)` pairs in time order.
    pub fn iter(&self) -> impl Iterator<Item = (DateTime<Utc>, Option<f64>)> + '_ {
        self.timestamps
            .iter()
            .copied()
            .zip(self.values.iter().copied())
    }
}

/// Trend score of one window.
///
/// `Undefined` is an explicit variant rather than a NaN sentinel: a window
/// with missing values or a degenerate time axis scores `Undefined` and is
/// dropped before ranking.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum Score {
    Defined(f64),
    Undefined,
}

impl Score {
    /// Wraps a computed value, mapping NaN and infinities to `Undefined`.
    pub fn from_value(value: f64) -> Self {
        if value.is_finite() {
            Score::Defined(value)
        } else {
            Score::Undefined
        }
    }

    pub fn value(&self) -> Option<f64> {
        match self {
            Score::Defined(v) => Some(*v),
            Score::Undefined => None,
        }
    }

    pub fn is_defined(&self) -> bool {
        matches!(self, Score::Defined(_))
    }
}

/// One entry of a rolling score series, aligned to the window end.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScorePoint {
    /// Timestamp of the last sample in the window
    pub end: DateTime<Utc>,
    /// Timestamp of the first sample in the window
    pub first: DateTime<Utc>,
    pub score: Score,
}

/// A score point whose score is known to be defined.
///
/// This is the input of ranking; undefined points never get this far.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RankedScore {
    pub end: DateTime<Utc>,
    pub first: DateTime<Utc>,
    pub score: f64,
}

impl ScorePoint {
    pub fn ranked(&self) -> Option<RankedScore> {
        self.score.value().map(|score| RankedScore {
            end: self.end,
            first: self.first,
            score,
        })
    }
}

/// Trend-estimation method.
///
/// Stable ids (`ols_slope`, `linreg_slope`, `kendall_tau`) are used in
/// configuration files, exports and the Python binding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TrendMethod {
    OlsSlope,
    LinregSlope,
    KendallTau,
}

impl TrendMethod {
    pub const ALL: [TrendMethod; 3] = [
        TrendMethod::OlsSlope,
        TrendMethod::LinregSlope,
        TrendMethod::KendallTau,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            TrendMethod::OlsSlope => "ols_slope",
            TrendMethod::LinregSlope => "linreg_slope",
            TrendMethod::KendallTau => "kendall_tau",
        }
    }

    /// Human-readable name shown in method pickers and chart legends.
    pub fn label(&self) -> &'static str {
        match self {
            TrendMethod::OlsSlope => "OLS slope",
            TrendMethod::LinregSlope => "LinearRegression slope",
            TrendMethod::KendallTau => "Kendall's tau",
        }
    }
}

impl fmt::Display for TrendMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TrendMethod {
    type Err = TrendError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        // Streamlit pickers send "Kendall’s tau" with a typographic apostrophe
        let needle = s.trim().replace('\u{2019}', "'");
        TrendMethod::ALL
            .into_iter()
            .find(|m| m.as_str().eq_ignore_ascii_case(&needle) || m.label() == needle)
            .ok_or_else(|| {
                TrendError::InvalidConfiguration(format!(
                    "Invalid method: {}. Must be 'ols_slope', 'linreg_slope', or 'kendall_tau'",
                    s
                ))
            })
    }
}

/// Which end of the score distribution counts as "strongest".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TrendDirection {
    /// Largest scores first
    Increasing,
    /// Smallest scores first
    Decreasing,
}

impl TrendDirection {
    pub fn as_str(&self) -> &'static str {
        match self {
            TrendDirection::Increasing => "increasing",
            TrendDirection::Decreasing => "decreasing",
        }
    }

    /// Capitalized form written to the `direction` export column.
    pub fn label(&self) -> &'static str {
        match self {
            TrendDirection::Increasing => "Increasing",
            TrendDirection::Decreasing => "Decreasing",
        }
    }
}

impl fmt::Display for TrendDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for TrendDirection {
    type Err = TrendError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lowered = s.trim().to_ascii_lowercase();
        let word = lowered.strip_suffix(" trend").unwrap_or(&lowered);
        match word {
            "increasing" => Ok(TrendDirection::Increasing),
            "decreasing" => Ok(TrendDirection::Decreasing),
            _ => Err(TrendError::InvalidConfiguration(format!(
                "Invalid direction: {}. Must be 'increasing' or 'decreasing'",
                s
            ))),
        }
    }
}

/// A detected trend interval.
///
/// Created once by the materializer and shared unchanged by rendering and
/// export, so both always show the same boundaries.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Interval {
    pub method: TrendMethod,
    pub direction: TrendDirection,
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
    pub score: f64,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeDelta, TimeZone};

    fn t(secs: i64) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap() + TimeDelta::seconds(secs)
    }

    #[test]
    fn test_new_rejects_unordered_timestamps() {
        let result = TimeSeries::new(vec![(t(0), Some(1.0)), (t(2), Some(2.0)), (t(1), Some(3.0))]);
        assert!(matches!(
            result,
            Err(TrendError::UnorderedTimestamps { index: 2 })
        ));
    }

    #[test]
    fn test_new_accepts_duplicate_timestamps() {
        let series = TimeSeries::new(vec![(t(0), Some(1.0)), (t(0), Some(2.0))]).unwrap();
        assert_eq!(series.len(), 2);
    }

    #[test]
    fn test_non_finite_values_become_missing() {
        let series = TimeSeries::new(vec![
            (t(0), Some(f64::NAN)),
            (t(1), Some(f64::INFINITY)),
            (t(2), Some(4.0)),
        ])
        .unwrap();
        assert_eq!(series.values(), &[None, None, Some(4.0)]);
        assert_eq!(series.missing_count(), 2);
    }

    #[test]
    fn test_from_unsorted_is_stable() {
        let series = TimeSeries::from_unsorted(vec![
            (t(5), Some(3.0)),
            (t(1), Some(1.0)),
            (t(5), Some(4.0)),
            (t(2), Some(2.0)),
        ]);
        assert_eq!(series.timestamps(), &[t(1), t(2), t(5), t(5)]);
        assert_eq!(series.values(), &[Some(1.0), Some(2.0), Some(3.0), Some(4.0)]);
    }

    #[test]
    fn test_score_from_value() {
        assert_eq!(Score::from_value(0.5), Score::Defined(0.5));
        assert_eq!(Score::from_value(f64::NAN), Score::Undefined);
        assert_eq!(Score::from_value(f64::NEG_INFINITY), Score::Undefined);
        assert_eq!(Score::Undefined.value(), None);
    }

    #[test]
    fn test_method_parsing() {
        assert_eq!("ols_slope".parse::<TrendMethod>().unwrap(), TrendMethod::OlsSlope);
        assert_eq!("KENDALL_TAU".parse::<TrendMethod>().unwrap(), TrendMethod::KendallTau);
        assert_eq!(
            "LinearRegression slope".parse::<TrendMethod>().unwrap(),
            TrendMethod::LinregSlope
        );
        assert!("spearman".parse::<TrendMethod>().is_err());
    }

    #[test]
    fn test_kendall_label_accepts_both_apostrophes() {
        assert_eq!("Kendall's tau".parse::<TrendMethod>().unwrap(), TrendMethod::KendallTau);
        assert_eq!(
            "Kendall\u{2019}s tau".parse::<TrendMethod>().unwrap(),
            TrendMethod::KendallTau
        );
    }

    #[test]
    fn test_method_serde_ids() {
        let json = serde_json::to_string(&TrendMethod::LinregSlope).unwrap();
        assert_eq!(json, "\"linreg_slope\"");
    }

    #[test]
    fn test_direction_parsing() {
        assert_eq!(
            "increasing".parse::<TrendDirection>().unwrap(),
            TrendDirection::Increasing
        );
        assert_eq!(
            "Decreasing trend".parse::<TrendDirection>().unwrap(),
            TrendDirection::Decreasing
        );
        assert!("sideways".parse::<TrendDirection>().is_err());
        assert_eq!(TrendDirection::Decreasing.to_string(), "Decreasing");
    }
}
