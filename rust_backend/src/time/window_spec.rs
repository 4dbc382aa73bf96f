use chrono::TimeDelta;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

use crate::error::{TrendError, TrendResult};

const NS_PER_US: i64 = 1_000;
const NS_PER_MS: i64 = 1_000_000;
const NS_PER_SEC: i64 = 1_000_000_000;
const NS_PER_MIN: i64 = 60 * NS_PER_SEC;
const NS_PER_HOUR: i64 = 60 * NS_PER_MIN;
const NS_PER_DAY: i64 = 24 * NS_PER_HOUR;

/// Display units, largest first
const DISPLAY_UNITS: &[(&str, i64)] = &[
    ("d", NS_PER_DAY),
    ("h", NS_PER_HOUR),
    ("min", NS_PER_MIN),
    ("s", NS_PER_SEC),
    ("ms", NS_PER_MS),
    ("us", NS_PER_US),
    ("ns", 1),
];

/// Shape of the trailing window used for rolling trend estimation.
///
/// - `Duration(d)`: every sample with timestamp in `(end - d, end]`
/// - `Count(n)`: the last `n` samples up to and including `end`
///
/// The string form follows the offset aliases the front end already uses:
/// `"5min"`, `"30s"`, `"1.5h"`, `"250ms"`, `"1d"`. A bare integer such as
/// `"20"` is a sample-count window.
///
/// # Example
/// ```
/// use chrono::TimeDelta;
/// use trendscope::time::WindowSpec;
///
/// let spec: WindowSpec = "5min".parse().unwrap();
/// assert_eq!(spec, WindowSpec::Duration(TimeDelta::minutes(5)));
/// assert_eq!(spec.to_string(), "5min");
/// assert!("0s".parse::<WindowSpec>().is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WindowSpec {
    Duration(TimeDelta),
    Count(usize),
}

impl WindowSpec {
    /// Time-based window; rejects zero and negative spans.
    pub fn duration(span: TimeDelta) -> TrendResult<Self> {
        let spec = WindowSpec::Duration(span);
        spec.validate()?;
        Ok(spec)
    }

    /// Sample-count window; rejects zero.
    pub fn count(samples: usize) -> TrendResult<Self> {
        let spec = WindowSpec::Count(samples);
        spec.validate()?;
        Ok(spec)
    }

    /// Check that the window spans a positive extent.
    pub fn validate(&self) -> TrendResult<()> {
        match self {
            WindowSpec::Duration(d) if *d <= TimeDelta::zero() => Err(TrendError::InvalidWindow(
                format!("window duration must be positive, got {}", d),
            )),
            WindowSpec::Count(0) => Err(TrendError::InvalidWindow(
                "window must contain at least one sample".to_string(),
            )),
            _ => Ok(()),
        }
    }

    pub fn as_duration(&self) -> Option<TimeDelta> {
        match self {
            WindowSpec::Duration(d) => Some(*d),
            WindowSpec::Count(_) => None,
        }
    }
}

fn unit_nanos(unit: &str) -> Option<i64> {
    let ns = match unit {
        "ns" => 1,
        "us" | "µs" => NS_PER_US,
        "ms" => NS_PER_MS,
        "s" | "sec" | "secs" | "second" | "seconds" => NS_PER_SEC,
        "t" | "min" | "mins" | "minute" | "minutes" => NS_PER_MIN,
        "h" | "hr" | "hrs" | "hour" | "hours" => NS_PER_HOUR,
        "d" | "day" | "days" => NS_PER_DAY,
        _ => return None,
    };
    Some(ns)
}

impl FromStr for WindowSpec {
    type Err = TrendError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let text = s.trim();
        if text.is_empty() {
            return Err(TrendError::InvalidWindow("empty window".to_string()));
        }

        if let Ok(samples) = text.parse::<i64>() {
            if samples <= 0 {
                return Err(TrendError::InvalidWindow(format!(
                    "window must be positive, got '{}'",
                    s
                )));
            }
            return WindowSpec::count(samples as usize);
        }

        let split = text
            .find(|c: char| c.is_alphabetic())
            .ok_or_else(|| TrendError::InvalidWindow(format!("missing unit in '{}'", s)))?;
        let (number, unit) = text.split_at(split);

        let amount: f64 = number
            .trim()
            .parse()
            .map_err(|_| TrendError::InvalidWindow(format!("invalid amount in '{}'", s)))?;
        let unit_ns = unit_nanos(&unit.trim().to_lowercase())
            .ok_or_else(|| TrendError::InvalidWindow(format!("unknown unit in '{}'", s)))?;

        let total_ns = (amount * unit_ns as f64).round();
        if !total_ns.is_finite() || total_ns <= 0.0 {
            return Err(TrendError::InvalidWindow(format!(
                "window must be positive, got '{}'",
                s
            )));
        }
        if total_ns >= i64::MAX as f64 {
            return Err(TrendError::InvalidWindow(format!("window too large: '{}'", s)));
        }

        WindowSpec::duration(TimeDelta::nanoseconds(total_ns as i64))
    }
}

impl fmt::Display for WindowSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WindowSpec::Count(n) => write!(f, "{}", n),
            WindowSpec::Duration(d) => match d.num_nanoseconds() {
                Some(ns) => {
                    for (unit, size) in DISPLAY_UNITS {
                        if ns % size == 0 {
                            return write!(f, "{}{}", ns / size, unit);
                        }
                    }
                    write!(f, "{}ns", ns)
                }
                None => write!(f, "{}s", d.num_seconds()),
            },
        }
    }
}

impl Serialize for WindowSpec {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for WindowSpec {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        use serde::de::Error;

        let text = String::deserialize(deserializer)?;
        text.parse().map_err(D::Error::custom)
    }
}
