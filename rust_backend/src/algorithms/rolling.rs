//! Trailing-window generation over an irregular time series.
//!
//! [`RollingWindows`] is the first stage of the trend pipeline. It walks the
//! series once and yields, for every position whose trailing window holds at
//! least two non-missing samples, a borrowed [`Window`] ending there. Positions
//! with fewer usable samples yield nothing, so downstream stages never see
//! placeholders for them.
//!
//! The iterator is single-pass and owns no state shared with other passes;
//! each scoring strategy builds its own.

use chrono::{DateTime, Utc};

use crate::core::domain::TimeSeries;
use crate::time::{elapsed_seconds, WindowSpec};

/// Minimum non-missing samples for a window to be emitted
pub const MIN_WINDOW_SAMPLES: usize = 2;

/// A contiguous slice of a series ending at `end`.
#[derive(Debug, Clone, Copy)]
pub struct Window<'a> {
    pub end: DateTime<Utc>,
    pub timestamps: &'a [DateTime<Utc>],
    pub values: &'a [Option<f64>],
}

impl<'a> Window<'a> {
    pub fn len(&self) -> usize {
        self.timestamps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.timestamps.is_empty()
    }

    /// Timestamp of the earliest sample in the window.
    pub fn first(&self) -> DateTime<Utc> {
        self.timestamps.first().copied().unwrap_or(self.end)
    }

    pub fn has_missing(&self) -> bool {
        self.values.iter().any(|v| v.is_none())
    }

    /// All values, or `None` if any sample is missing.
    ///
    /// Missing samples are never imputed.
    pub fn complete_values(&self) -> Option<Vec<f64>> {
        self.values.iter().copied().collect()
    }

    pub fn elapsed_seconds(&self) -> Vec<f64> {
        elapsed_seconds(self.timestamps)
    }
}

/// Lazy iterator over the trailing windows of a series.
///
/// # Example
/// ```
/// use chrono::{TimeDelta, TimeZone, Utc};
/// use trendscope::algorithms::rolling::RollingWindows;
/// use trendscope::core::domain::TimeSeries;
/// use trendscope::time::WindowSpec;
///
/// let t0 = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
/// let series = TimeSeries::new(
///     (0..4).map(|i| (t0 + TimeDelta::seconds(i), Some(i as f64))).collect(),
/// )
/// .unwrap();
///
/// let spec = WindowSpec::Duration(TimeDelta::seconds(3));
/// let sizes: Vec<usize> = RollingWindows::new(&series, spec).map(|w| w.len()).collect();
/// assert_eq!(sizes, vec![2, 3, 3]);
/// ```
#[derive(Debug)]
pub struct RollingWindows<'a> {
    timestamps: &'a [DateTime<Utc>],
    values: &'a [Option<f64>],
    spec: WindowSpec,
    /// Index of the next window end
    next_end: usize,
    /// Index of the first sample of the current window
    start: usize,
    /// Non-missing samples in `start..next_end`
    present: usize,
}

impl<'a> RollingWindows<'a> {
    pub fn new(series: &'a TimeSeries, spec: WindowSpec) -> Self {
        Self {
            timestamps: series.timestamps(),
            values: series.values(),
            spec,
            next_end: 0,
            start: 0,
            present: 0,
        }
    }

    fn drop_front(&mut self) {
        if self.values[self.start].is_some() {
            self.present -= 1;
        }
        self.start += 1;
    }

    /// Advance `start` so that `start..=end` is the trailing window at `end`.
    fn shrink_to(&mut self, end: usize) {
        match self.spec {
            WindowSpec::Duration(span) => {
                // Closed on the right, open on the left: (t_end - span, t_end]
                let Some(lower) = self.timestamps[end].checked_sub_signed(span) else {
                    return;
                };
                while self.start < end && self.timestamps[self.start] <= lower {
                    self.drop_front();
                }
            }
            WindowSpec::Count(size) => {
                let size = size.max(1);
                while end + 1 - self.start > size {
                    self.drop_front();
                }
            }
        }
    }
}

impl<'a> Iterator for RollingWindows<'a> {
    type Item = Window<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        while self.next_end < self.timestamps.len() {
            let end = self.next_end;
            self.next_end += 1;

            if self.values[end].is_some() {
                self.present += 1;
            }
            self.shrink_to(end);

            if self.present >= MIN_WINDOW_SAMPLES {
                return Some(Window {
                    end: self.timestamps[end],
                    timestamps: &self.timestamps[self.start..=end],
                    values: &self.values[self.start..=end],
                });
            }
        }
        None
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (0, Some(self.timestamps.len() - self.next_end))
    }
}
