//! Core domain models for trend detection.
//!
//! This module defines the fundamental data structures used throughout the
//! crate: the input time series, per-window scores, and detected intervals.

pub mod domain;

pub use domain::{
    Interval, RankedScore, Score, ScorePoint, TimeSeries, TrendDirection, TrendMethod,
};
