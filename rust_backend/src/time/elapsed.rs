use chrono::{DateTime, TimeDelta, Utc};

/// Convert window timestamps to elapsed seconds since the first one.
///
/// The first element is always `0.0` and the sequence is non-decreasing for
/// non-decreasing input. Gaps keep their real length, so a slope fitted on
/// the result is in value-per-second regardless of sampling irregularity.
///
/// Returns an empty vector for empty input.
///
/// # Example
/// ```
/// use chrono::{TimeDelta, TimeZone, Utc};
/// use trendscope::time::elapsed_seconds;
///
/// let t0 = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
/// let ts = [t0, t0 + TimeDelta::milliseconds(1500), t0 + TimeDelta::seconds(4)];
/// assert_eq!(elapsed_seconds(&ts), vec![0.0, 1.5, 4.0]);
/// ```
pub fn elapsed_seconds(timestamps: &[DateTime<Utc>]) -> Vec<f64> {
    let Some(first) = timestamps.first() else {
        return Vec::new();
    };

    timestamps
        .iter()
        .map(|ts| delta_seconds(*ts - *first))
        .collect()
}

/// Seconds in a time delta, at nanosecond resolution when it fits in i64.
pub fn delta_seconds(delta: TimeDelta) -> f64 {
    match delta.num_nanoseconds() {
        Some(ns) => ns as f64 / 1e9,
        // Beyond ~292 years; millisecond resolution is plenty there
        None => delta.num_milliseconds() as f64 / 1e3,
    }
}
