//! Top-K ranking of rolling trend scores.

use std::cmp::Ordering;

use crate::core::domain::{RankedScore, TrendDirection};

/// Pick the `k` most extreme scores for `direction`.
///
/// Increasing ranks the largest scores first, Decreasing the smallest. Equal
/// scores keep chronological order (earliest window end first). With fewer
/// than `k` candidates every candidate is returned; nothing is padded.
///
/// # Arguments
/// * `scores` - Defined scores, normally in chronological order
/// * `k` - Maximum number of entries to return
/// * `direction` - Which tail of the distribution to take
pub fn select_top_k(
    scores: &[RankedScore],
    k: usize,
    direction: TrendDirection,
) -> Vec<RankedScore> {
    if k == 0 || scores.is_empty() {
        return Vec::new();
    }

    let mut ranked = scores.to_vec();
    ranked.sort_by(|a, b| {
        let by_score = match direction {
            TrendDirection::Increasing => b.score.partial_cmp(&a.score),
            TrendDirection::Decreasing => a.score.partial_cmp(&b.score),
        }
        .unwrap_or(Ordering::Equal);
        by_score.then_with(|| a.end.cmp(&b.end))
    });
    ranked.truncate(k);
    ranked
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{DateTime, TimeDelta, TimeZone, Utc};

    fn t(secs: i64) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 2, 29, 23, 59, 0).unwrap() + TimeDelta::seconds(secs)
    }

    fn ranked(scores: &[f64]) -> Vec<RankedScore> {
        scores
            .iter()
            .enumerate()
            .map(|(i, score)| RankedScore {
                end: t(i as i64),
                first: t(i as i64 - 1),
                score: *score,
            })
            .collect()
    }

    #[test]
    fn test_decreasing_ties_break_chronologically() {
        let scores = ranked(&[-3.0, -1.0, 0.5, -3.0]);
        let top = select_top_k(&scores, 2, TrendDirection::Decreasing);

        assert_eq!(top.len(), 2);
        assert_eq!(top[0].end, t(0));
        assert_eq!(top[1].end, t(3));
    }

    #[test]
    fn test_increasing_takes_largest_first() {
        let scores = ranked(&[0.2, 0.9, -0.4, 0.9, 0.5]);
        let top = select_top_k(&scores, 3, TrendDirection::Increasing);

        let ends: Vec<_> = top.iter().map(|s| s.end).collect();
        assert_eq!(ends, vec![t(1), t(3), t(4)]);
    }

    #[test]
    fn test_ties_break_chronologically_even_if_input_is_not() {
        let mut scores = ranked(&[1.0, 1.0, 1.0]);
        scores.reverse();
        let top = select_top_k(&scores, 3, TrendDirection::Increasing);
        let ends: Vec<_> = top.iter().map(|s| s.end).collect();
        assert_eq!(ends, vec![t(0), t(1), t(2)]);
    }

    #[test]
    fn test_fewer_candidates_than_k() {
        let scores = ranked(&[0.3, -0.1]);
        assert_eq!(select_top_k(&scores, 10, TrendDirection::Increasing).len(), 2);
    }

    #[test]
    fn test_zero_k_or_empty_input() {
        assert!(select_top_k(&ranked(&[1.0]), 0, TrendDirection::Increasing).is_empty());
        assert!(select_top_k(&[], 5, TrendDirection::Decreasing).is_empty());
    }
}
