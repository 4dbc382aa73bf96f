//! Rolling trend detection over timestamped series.
//!
//! Scores every trailing window of a series with one or more trend
//! estimators (OLS slope, least-squares slope, Kendall's tau-b), keeps the
//! strongest K windows per method and turns them into intervals that can be
//! rendered or exported as CSV.
//!
//! # Example
//!
//! ```
//! use chrono::{TimeDelta, TimeZone, Utc};
//! use trendscope::{detect_trends, AnalysisRequest, TimeSeries, TrendDirection, TrendMethod};
//!
//! let t0 = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
//! let values = [5.0, 4.0, 3.0, 3.5, 4.0, 4.5];
//! let series = TimeSeries::new(
//!     values
//!         .iter()
//!         .enumerate()
//!         .map(|(i, v)| (t0 + TimeDelta::minutes(i as i64), Some(*v)))
//!         .collect(),
//! )
//! .unwrap();
//!
//! let request = AnalysisRequest::new(
//!     vec![TrendMethod::OlsSlope],
//!     "3min".parse().unwrap(),
//!     TrendDirection::Decreasing,
//!     1,
//! );
//! let report = detect_trends(&series, &request).unwrap();
//! assert_eq!(report.intervals().len(), 1);
//! ```

pub mod algorithms;
pub mod config;
pub mod core;
pub mod error;
pub mod io;
pub mod services;
pub mod time;

#[cfg(feature = "python")]
pub mod python;

pub use crate::config::AnalysisConfig;
pub use crate::core::{Interval, Score, ScorePoint, TimeSeries, TrendDirection, TrendMethod};
pub use crate::error::{TrendError, TrendResult};
pub use crate::io::{intervals_to_csv_string, write_intervals_csv, write_intervals_csv_file};
pub use crate::services::{detect_trends, rolling_scores, AnalysisRequest, TrendReport};
pub use crate::time::WindowSpec;

#[cfg(feature = "python")]
use pyo3::prelude::*;

/// Trendscope Python extension module.
#[cfg(feature = "python")]
#[pymodule]
fn trendscope(m: &Bound<'_, PyModule>) -> PyResult<()> {
    m.add_class::<python::TrendInterval>()?;
    m.add_function(wrap_pyfunction!(python::detect_trend_intervals, m)?)?;
    m.add_function(wrap_pyfunction!(python::rolling_trend_scores, m)?)?;
    m.add_function(wrap_pyfunction!(python::intervals_to_csv, m)?)?;
    Ok(())
}
