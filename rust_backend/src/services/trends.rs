use serde::{Deserialize, Serialize};
use std::collections::HashSet;

use crate::algorithms::{estimator_for, materialize, score_window, select_top_k, RollingWindows};
use crate::core::domain::{
    Interval, RankedScore, ScorePoint, TimeSeries, TrendDirection, TrendMethod,
};
use crate::error::{TrendError, TrendResult};
use crate::io::export;
use crate::services::checksum::{calculate_checksum, series_checksum};
use crate::time::WindowSpec;

/// Parameters of one trend analysis.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisRequest {
    pub methods: Vec<TrendMethod>,
    pub window: WindowSpec,
    pub direction: TrendDirection,
    pub top_k: usize,
}

impl AnalysisRequest {
    pub fn new(
        methods: Vec<TrendMethod>,
        window: WindowSpec,
        direction: TrendDirection,
        top_k: usize,
    ) -> Self {
        Self {
            methods,
            window,
            direction,
            top_k,
        }
    }

    /// Check the request before any computation runs.
    pub fn validate(&self) -> TrendResult<()> {
        self.window.validate()?;

        if self.methods.is_empty() {
            return Err(TrendError::InvalidConfiguration(
                "at least one method must be selected".to_string(),
            ));
        }

        let mut seen = HashSet::new();
        if let Some(dup) = self.methods.iter().find(|m| !seen.insert(**m)) {
            return Err(TrendError::InvalidConfiguration(format!(
                "method '{}' selected more than once",
                dup
            )));
        }

        if self.top_k == 0 {
            return Err(TrendError::InvalidConfiguration(
                "top_k must be a positive integer".to_string(),
            ));
        }

        Ok(())
    }

    /// Stable key for caller-side memoization of `detect_trends(series, self)`.
    pub fn cache_key(&self, series: &TimeSeries) -> String {
        let methods: Vec<&str> = self.methods.iter().map(|m| m.as_str()).collect();
        calculate_checksum(&format!(
            "{}|{}|{}|{}|{}",
            series_checksum(series),
            methods.join(","),
            self.window,
            self.direction.as_str(),
            self.top_k
        ))
    }
}

/// Rolling scores of one method over a series, one point per emitted window.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoreSeries {
    pub method: TrendMethod,
    pub window: WindowSpec,
    pub points: Vec<ScorePoint>,
}

impl ScoreSeries {
    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Points with a defined score, in chronological order.
    pub fn defined(&self) -> Vec<RankedScore> {
        self.points.iter().filter_map(ScorePoint::ranked).collect()
    }
}

/// Intervals detected by one method, most extreme first.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MethodIntervals {
    pub method: TrendMethod,
    pub intervals: Vec<Interval>,
}

/// Result of a trend analysis, grouped by method in request order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrendReport {
    pub window: WindowSpec,
    pub direction: TrendDirection,
    pub top_k: usize,
    pub results: Vec<MethodIntervals>,
}

impl TrendReport {
    /// All intervals, grouped by method in request order.
    pub fn intervals(&self) -> Vec<Interval> {
        self.results
            .iter()
            .flat_map(|r| r.intervals.iter().cloned())
            .collect()
    }

    pub fn for_method(&self, method: TrendMethod) -> Option<&[Interval]> {
        self.results
            .iter()
            .find(|r| r.method == method)
            .map(|r| r.intervals.as_slice())
    }

    pub fn is_empty(&self) -> bool {
        self.results.iter().all(|r| r.intervals.is_empty())
    }

    /// JSON form consumed by the chart layer.
    pub fn to_json(&self) -> TrendResult<String> {
        Ok(serde_json::to_string(self)?)
    }

    /// CSV rows for download, identical boundaries to [`TrendReport::to_json`].
    pub fn to_csv_string(&self) -> TrendResult<String> {
        export::intervals_to_csv_string(&self.intervals())
    }
}

/// Compute the rolling score series of `method` over `series`.
///
/// Positions whose trailing window holds fewer than two non-missing samples are
/// absent from the result; windows that exist but cannot be scored carry
/// [`Score::Undefined`](crate::core::domain::Score::Undefined).
pub fn rolling_scores(
    series: &TimeSeries,
    window: WindowSpec,
    method: TrendMethod,
) -> TrendResult<ScoreSeries> {
    window.validate()?;

    let estimator = estimator_for(method);
    let points: Vec<ScorePoint> = RollingWindows::new(series, window)
        .map(|w| ScorePoint {
            end: w.end,
            first: w.first(),
            score: score_window(estimator, &w),
        })
        .collect();

    log::debug!(
        "{}: {} windows over {} samples, {} scored",
        method,
        points.len(),
        series.len(),
        points.iter().filter(|p| p.score.is_defined()).count()
    );

    Ok(ScoreSeries {
        method,
        window,
        points,
    })
}

/// Detect the strongest trend intervals for every requested method.
///
/// Each method runs its own pass: rolling scores, undefined scores dropped,
/// top-K selection, materialization. Calls share no state.
pub fn detect_trends(series: &TimeSeries, request: &AnalysisRequest) -> TrendResult<TrendReport> {
    request.validate()?;

    let mut results = Vec::with_capacity(request.methods.len());
    for &method in &request.methods {
        let scores = rolling_scores(series, request.window, method)?;
        let top = select_top_k(&scores.defined(), request.top_k, request.direction);
        let intervals = materialize(&top, request.window, method, request.direction);
        results.push(MethodIntervals { method, intervals });
    }

    let report = TrendReport {
        window: request.window,
        direction: request.direction,
        top_k: request.top_k,
        results,
    };

    if report.is_empty() {
        log::warn!(
            "No {} trend intervals found over {} samples (window={})",
            request.direction.as_str(),
            series.len(),
            request.window
        );
    } else {
        log::info!(
            "Detected {} {} trend intervals across {} methods (window={})",
            report.intervals().len(),
            request.direction.as_str(),
            report.results.len(),
            request.window
        );
    }

    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::domain::Score;
    use chrono::{DateTime, TimeDelta, TimeZone, Utc};

    fn t(secs: i64) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 7, 19, 3, 0, 0).unwrap() + TimeDelta::seconds(secs)
    }

    fn ramp_then_drop() -> TimeSeries {
        let values = [1.0, 2.0, 3.0, 4.0, 5.0, 3.0, 1.0, 0.0, 0.5, 1.0];
        TimeSeries::new(
            values
                .iter()
                .enumerate()
                .map(|(i, v)| (t(i as i64 * 10), Some(*v)))
                .collect(),
        )
        .unwrap()
    }

    fn request(methods: Vec<TrendMethod>, direction: TrendDirection, top_k: usize) -> AnalysisRequest {
        AnalysisRequest::new(
            methods,
            WindowSpec::Duration(TimeDelta::seconds(30)),
            direction,
            top_k,
        )
    }

    #[test]
    fn test_validate_rejects_empty_methods() {
        let req = request(vec![], TrendDirection::Increasing, 1);
        assert!(matches!(req.validate(), Err(TrendError::InvalidConfiguration(_))));
    }

    #[test]
    fn test_validate_rejects_zero_top_k_and_duplicates() {
        let req = request(vec![TrendMethod::OlsSlope], TrendDirection::Increasing, 0);
        assert!(req.validate().is_err());

        let req = request(
            vec![TrendMethod::OlsSlope, TrendMethod::OlsSlope],
            TrendDirection::Increasing,
            1,
        );
        assert!(req.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_bad_window() {
        let mut req = request(vec![TrendMethod::KendallTau], TrendDirection::Decreasing, 1);
        req.window = WindowSpec::Duration(TimeDelta::zero());
        assert!(matches!(
            detect_trends(&ramp_then_drop(), &req),
            Err(TrendError::InvalidWindow(_))
        ));
    }

    #[test]
    fn test_rolling_scores_align_to_window_end() {
        let series = ramp_then_drop();
        let scores = rolling_scores(
            &series,
            WindowSpec::Duration(TimeDelta::seconds(30)),
            TrendMethod::OlsSlope,
        )
        .unwrap();

        // First sample has no partner inside its window
        assert_eq!(scores.len(), series.len() - 1);
        assert_eq!(scores.points[0].end, t(10));
        assert_eq!(scores.points[0].first, t(0));
        assert_eq!(scores.points[0].score, Score::Defined(0.1));
    }

    #[test]
    fn test_detect_decreasing_finds_the_drop() {
        let report = detect_trends(
            &ramp_then_drop(),
            &request(vec![TrendMethod::OlsSlope], TrendDirection::Decreasing, 1),
        )
        .unwrap();

        let intervals = report.for_method(TrendMethod::OlsSlope).unwrap();
        assert_eq!(intervals.len(), 1);
        // Window (30s, 60s] holds 5.0, 3.0, 1.0
        assert_eq!(intervals[0].end, t(60));
        assert_eq!(intervals[0].start, t(30));
        assert!(intervals[0].score < 0.0);
    }

    #[test]
    fn test_detect_keeps_method_order() {
        let methods = vec![TrendMethod::KendallTau, TrendMethod::OlsSlope];
        let report = detect_trends(
            &ramp_then_drop(),
            &request(methods.clone(), TrendDirection::Increasing, 2),
        )
        .unwrap();

        let order: Vec<_> = report.results.iter().map(|r| r.method).collect();
        assert_eq!(order, methods);
        assert_eq!(report.intervals().len(), 4);
    }

    #[test]
    fn test_all_missing_series_gives_empty_report() {
        let series = TimeSeries::new((0..5).map(|i| (t(i), None)).collect()).unwrap();
        let report = detect_trends(
            &series,
            &request(vec![TrendMethod::LinregSlope], TrendDirection::Increasing, 3),
        )
        .unwrap();
        assert!(report.is_empty());
    }

    #[test]
    fn test_cache_key_tracks_parameters() {
        let series = ramp_then_drop();
        let a = request(vec![TrendMethod::OlsSlope], TrendDirection::Increasing, 1);
        let mut b = a.clone();
        b.top_k = 2;
        assert_eq!(a.cache_key(&series), a.clone().cache_key(&series));
        assert_ne!(a.cache_key(&series), b.cache_key(&series));
    }

    #[test]
    fn test_report_json_shape() {
        let report = detect_trends(
            &ramp_then_drop(),
            &request(vec![TrendMethod::KendallTau], TrendDirection::Increasing, 1),
        )
        .unwrap();
        let json: serde_json::Value = serde_json::from_str(&report.to_json().unwrap()).unwrap();

        assert_eq!(json["window"], "30s");
        assert_eq!(json["direction"], "increasing");
        assert_eq!(json["results"][0]["method"], "kendall_tau");
        assert_eq!(json["results"][0]["intervals"][0]["score"], 1.0);
    }
}
