//! Conversion of ranked window ends into interval records.
//!
//! Rendering and export both consume the output of [`materialize`], so the
//! interval boundaries are computed exactly once per analysis.

use crate::core::domain::{Interval, RankedScore, TrendDirection, TrendMethod};
use crate::time::WindowSpec;

/// Build interval records for selected window ends.
///
/// For duration windows `start = end - duration`. Count windows have no fixed
/// span, so their start is the first sample actually inside the window.
pub fn materialize(
    selected: &[RankedScore],
    window: WindowSpec,
    method: TrendMethod,
    direction: TrendDirection,
) -> Vec<Interval> {
    selected
        .iter()
        .map(|point| Interval {
            method,
            direction,
            start: interval_start(point, window),
            end: point.end,
            score: point.score,
        })
        .collect()
}

fn interval_start(point: &RankedScore, window: WindowSpec) -> chrono::DateTime<chrono::Utc> {
    match window {
        WindowSpec::Duration(span) => point.end.checked_sub_signed(span).unwrap_or(point.first),
        WindowSpec::Count(_) => point.first,
    }
}
