//! Trend-scoring strategies.
//!
//! Every strategy sees the same feature vector, elapsed seconds on the x-axis
//! and sample values on the y-axis, and returns a [`Score`]. Guards shared by
//! all strategies (missing values, fewer than two samples) live in
//! [`score_window`]; each estimator only handles its own degeneracies.

use std::cmp::Ordering;

use crate::algorithms::rolling::Window;
use crate::core::domain::{Score, TrendMethod};

/// A trend-scoring strategy over one window.
pub trait TrendEstimator: Send + Sync {
    fn method(&self) -> TrendMethod;

    /// Score a window given elapsed seconds and complete values.
    ///
    /// Both slices have the same length (≥ 2) and `elapsed` is non-decreasing
    /// starting at `0.0`.
    fn estimate(&self, elapsed: &[f64], values: &[f64]) -> Score;
}

/// Ordinary least squares on the design matrix `[1, t]`, solved through the
/// 2×2 normal equations on mean-shifted data. Returns the slope in
/// value-per-second.
#[derive(Debug, Clone, Copy, Default)]
pub struct OlsSlopeEstimator;

/// Least-squares slope from centred data: `Σ(t-t̄)(y-ȳ) / Σ(t-t̄)²`.
///
/// Same estimator as [`OlsSlopeEstimator`], reached through a different solver.
#[derive(Debug, Clone, Copy, Default)]
pub struct LinregSlopeEstimator;

/// Kendall's tau-b rank correlation between elapsed time and value.
#[derive(Debug, Clone, Copy, Default)]
pub struct KendallTauEstimator;

static OLS: OlsSlopeEstimator = OlsSlopeEstimator;
static LINREG: LinregSlopeEstimator = LinregSlopeEstimator;
static KENDALL: KendallTauEstimator = KendallTauEstimator;

/// Strategy implementing `method`.
pub fn estimator_for(method: TrendMethod) -> &'static dyn TrendEstimator {
    match method {
        TrendMethod::OlsSlope => &OLS,
        TrendMethod::LinregSlope => &LINREG,
        TrendMethod::KendallTau => &KENDALL,
    }
}

/// Score one window with `estimator`.
///
/// Returns `Undefined` if any value in the window is missing or the window has
/// fewer than two samples.
pub fn score_window(estimator: &dyn TrendEstimator, window: &Window<'_>) -> Score {
    if window.len() < 2 {
        return Score::Undefined;
    }
    let Some(values) = window.complete_values() else {
        return Score::Undefined;
    };
    let elapsed = window.elapsed_seconds();
    estimator.estimate(&elapsed, &values)
}

/// Zero elapsed span means fewer than two distinct times.
fn has_time_spread(elapsed: &[f64]) -> bool {
    match (elapsed.first(), elapsed.last()) {
        (Some(first), Some(last)) => last - first > 0.0,
        _ => false,
    }
}

fn is_constant(values: &[f64]) -> bool {
    values.windows(2).all(|w| w[0] == w[1])
}

fn regression_inputs_ok(elapsed: &[f64], values: &[f64]) -> bool {
    elapsed.len() == values.len() && elapsed.len() >= 2 && has_time_spread(elapsed)
}

impl TrendEstimator for OlsSlopeEstimator {
    fn method(&self) -> TrendMethod {
        TrendMethod::OlsSlope
    }

    fn estimate(&self, elapsed: &[f64], values: &[f64]) -> Score {
        if !regression_inputs_ok(elapsed, values) {
            return Score::Undefined;
        }
        if is_constant(values) {
            return Score::Defined(0.0);
        }

        let n = elapsed.len() as f64;
        // Shift both axes to their means before forming `X'X` so that a large
        // baseline or a long time axis does not cancel in the determinant
        let mean_t = elapsed.iter().sum::<f64>() / n;
        let mean_y = values.iter().sum::<f64>() / n;

        let (mut sum_t, mut sum_y, mut sum_tt, mut sum_ty) = (0.0, 0.0, 0.0, 0.0);
        for (t, y) in elapsed.iter().zip(values) {
            let t = t - mean_t;
            let y = y - mean_y;
            sum_t += t;
            sum_y += y;
            sum_tt += t * t;
            sum_ty += t * y;
        }

        let det = n * sum_tt - sum_t * sum_t;
        if det <= 0.0 || !det.is_finite() {
            return Score::Undefined;
        }

        Score::from_value((n * sum_ty - sum_t * sum_y) / det)
    }
}

impl TrendEstimator for LinregSlopeEstimator {
    fn method(&self) -> TrendMethod {
        TrendMethod::LinregSlope
    }

    fn estimate(&self, elapsed: &[f64], values: &[f64]) -> Score {
        if !regression_inputs_ok(elapsed, values) {
            return Score::Undefined;
        }
        if is_constant(values) {
            return Score::Defined(0.0);
        }

        let n = elapsed.len() as f64;
        let mean_t = elapsed.iter().sum::<f64>() / n;
        let mean_y = values.iter().sum::<f64>() / n;

        let (sxy, sxx) = elapsed
            .iter()
            .zip(values)
            .fold((0.0, 0.0), |(sxy, sxx), (t, y)| {
                let dt = t - mean_t;
                (sxy + dt * (y - mean_y), sxx + dt * dt)
            });

        if sxx <= 0.0 || !sxx.is_finite() {
            return Score::Undefined;
        }

        Score::from_value(sxy / sxx)
    }
}

impl TrendEstimator for KendallTauEstimator {
    fn method(&self) -> TrendMethod {
        TrendMethod::KendallTau
    }

    fn estimate(&self, elapsed: &[f64], values: &[f64]) -> Score {
        if elapsed.len() != values.len() || elapsed.len() < 2 {
            return Score::Undefined;
        }
        kendall_tau_b(elapsed, values)
    }
}

/// Kendall's tau-b with the standard tie correction.
///
/// `(C - D) / sqrt((n0 - n1) (n0 - n2))` where `n0` is the number of pairs and
/// `n1`/`n2` count pairs tied in `x`/in `y`. When every pair is tied on one
/// side (a constant window, or one shared timestamp) the denominator vanishes
/// and the score is `Undefined`.
///
/// Uses Knight's O(n log n) algorithm: sort by `(x, y)`, count the tie runs,
/// then count discordant pairs as the swaps of a merge sort on `y`.
pub fn kendall_tau_b(x: &[f64], y: &[f64]) -> Score {
    let n = x.len().min(y.len());
    if n < 2 {
        return Score::Undefined;
    }

    let mut order: Vec<usize> = (0..n).collect();
    order.sort_unstable_by(|&a, &b| cmp_f64(x[a], x[b]).then_with(|| cmp_f64(y[a], y[b])));

    // Runs of equal x, and of equal (x, y) inside them
    let (mut tied_x, mut tied_xy) = (0u64, 0u64);
    let (mut run_x, mut run_xy) = (1u64, 1u64);
    for pair in order.windows(2) {
        let (a, b) = (pair[0], pair[1]);
        if cmp_f64(x[a], x[b]) == Ordering::Equal {
            run_x += 1;
            if cmp_f64(y[a], y[b]) == Ordering::Equal {
                run_xy += 1;
            } else {
                tied_xy += pair_count(run_xy);
                run_xy = 1;
            }
        } else {
            tied_x += pair_count(run_x);
            tied_xy += pair_count(run_xy);
            run_x = 1;
            run_xy = 1;
        }
    }
    tied_x += pair_count(run_x);
    tied_xy += pair_count(run_xy);

    let mut ys: Vec<f64> = order.iter().map(|&i| y[i]).collect();
    let mut buffer = vec![0.0; n];
    let discordant = sort_counting_swaps(&mut ys, &mut buffer);
    let tied_y = sorted_tie_pairs(&ys);

    let total = pair_count(n as u64);
    let concordant_minus_discordant =
        total as i64 - tied_x as i64 - tied_y as i64 + tied_xy as i64 - 2 * discordant as i64;

    let denom = ((total - tied_x) as f64 * (total - tied_y) as f64).sqrt();
    if denom == 0.0 {
        return Score::Undefined;
    }

    let tau = concordant_minus_discordant as f64 / denom;
    Score::from_value(tau.clamp(-1.0, 1.0))
}

fn cmp_f64(a: f64, b: f64) -> Ordering {
    a.partial_cmp(&b).unwrap_or(Ordering::Equal)
}

fn pair_count(k: u64) -> u64 {
    k * k.saturating_sub(1) / 2
}

/// Pairs of equal values in an ascending slice.
fn sorted_tie_pairs(sorted: &[f64]) -> u64 {
    let mut ties = 0;
    let mut run = 1u64;
    for pair in sorted.windows(2) {
        if cmp_f64(pair[0], pair[1]) == Ordering::Equal {
            run += 1;
        } else {
            ties += pair_count(run);
            run = 1;
        }
    }
    ties + pair_count(run)
}

/// Merge sort `values` ascending, returning the number of strictly inverted
/// pairs it had. `buffer` must be at least as long as `values`.
fn sort_counting_swaps(values: &mut [f64], buffer: &mut [f64]) -> u64 {
    let n = values.len();
    if n < 2 {
        return 0;
    }

    let mid = n / 2;
    let (left, right) = values.split_at_mut(mid);
    let mut swaps = sort_counting_swaps(left, buffer) + sort_counting_swaps(right, buffer);

    let (mut i, mut j) = (0, 0);
    for slot in buffer[..n].iter_mut() {
        if j == right.len() || (i < left.len() && cmp_f64(right[j], left[i]) != Ordering::Less) {
            *slot = left[i];
            i += 1;
        } else {
            *slot = right[j];
            swaps += (left.len() - i) as u64;
            j += 1;
        }
    }

    values.copy_from_slice(&buffer[..n]);
    swaps
}
