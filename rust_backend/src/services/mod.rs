//! Service layer for trend analysis.
//!
//! This module sits between the pure algorithms and the outer surfaces
//! (configuration, export, Python bindings). It validates requests, runs the
//! rolling pipeline once per method and assembles the report.

pub mod checksum;
pub mod trends;

pub use checksum::{calculate_checksum, series_checksum};
pub use trends::{
    detect_trends, rolling_scores, AnalysisRequest, MethodIntervals, ScoreSeries, TrendReport,
};
