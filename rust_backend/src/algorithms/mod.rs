//! Rolling trend-estimation algorithms.
//!
//! The trend pipeline is split into independent stages, each a pure function
//! of its inputs:
//!
//! - [`rolling`]: lazy generation of trailing windows over a series
//! - [`estimators`]: the scoring strategies (OLS slope, regression slope, Kendall's tau)
//! - [`selection`]: top-K ranking of defined scores
//! - [`materialize`]: conversion of ranked window ends into intervals
//!
//! # Example
//!
//! ```
//! use chrono::{TimeDelta, TimeZone, Utc};
//! use trendscope::algorithms::{estimator_for, score_window, RollingWindows};
//! use trendscope::core::domain::{Score, TimeSeries, TrendMethod};
//! use trendscope::time::WindowSpec;
//!
//! let t0 = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
//! let series = TimeSeries::new(
//!     (0..4).map(|i| (t0 + TimeDelta::seconds(i), Some(i as f64 + 1.0))).collect(),
//! )
//! .unwrap();
//!
//! let spec = WindowSpec::Duration(TimeDelta::seconds(3));
//! let estimator = estimator_for(TrendMethod::OlsSlope);
//! let last = RollingWindows::new(&series, spec).last().unwrap();
//! assert_eq!(score_window(estimator, &last), Score::Defined(1.0));
//! ```

pub mod estimators;
pub mod materialize;
pub mod rolling;
pub mod selection;


pub use estimators::{
    estimator_for, kendall_tau_b, score_window, KendallTauEstimator, LinregSlopeEstimator,
    OlsSlopeEstimator, TrendEstimator,
};
pub use materialize::materialize;
pub use rolling::{RollingWindows, Window};
pub use selection::select_top_k;
