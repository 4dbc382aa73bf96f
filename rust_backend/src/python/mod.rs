//! Python bindings for the trend engine.
//!
//! Compiled only with the `python` feature. The Streamlit front end hands
//! over timestamps as epoch milliseconds together with the raw values and gets
//! back plain [`TrendInterval`] objects, ready for charting or CSV download.
//!
//! # Python API
//!
//! ```python
//! import trendscope
//! intervals = trendscope.detect_trend_intervals(
//!     ts_ms, values, "5min", ["ols_slope", "kendall_tau"], "decreasing", 3
//! )
//! csv_text = trendscope.intervals_to_csv(intervals)
//! ```
//!
//! Every [`TrendError`](crate::error::TrendError) surfaces as `ValueError`.

pub mod trends;
pub mod types;

pub use trends::{detect_trend_intervals, intervals_to_csv, rolling_trend_scores};
pub use types::TrendInterval;

use pyo3::exceptions::PyValueError;
use pyo3::PyErr;

use crate::error::TrendError;

impl From<TrendError> for PyErr {
    fn from(err: TrendError) -> Self {
        PyValueError::new_err(err.to_string())
    }
}
