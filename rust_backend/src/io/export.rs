use chrono::{DateTime, SecondsFormat, Utc};
use serde::Serialize;
use std::fs::File;
use std::io::Write;
use std::path::Path;

use crate::core::domain::Interval;
use crate::error::{TrendError, TrendResult};

/// Column names of the interval export, in order.
///
/// `slope` keeps its name for every method, including Kendall's tau where it
/// holds a rank correlation.
pub const CSV_HEADER: [&str; 5] = ["method", "direction", "start", "end", "slope"];

/// One exported row.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct IntervalRow {
    pub method: String,
    pub direction: String,
    pub start: String,
    pub end: String,
    pub slope: f64,
}

impl From<&Interval> for IntervalRow {
    fn from(interval: &Interval) -> Self {
        IntervalRow {
            method: interval.method.as_str().to_string(),
            direction: interval.direction.label().to_string(),
            start: format_timestamp(&interval.start),
            end: format_timestamp(&interval.end),
            slope: interval.score,
        }
    }
}

/// RFC 3339 in UTC with a `Z` suffix; sub-second digits only when present.
pub fn format_timestamp(ts: &DateTime<Utc>) -> String {
    ts.to_rfc3339_opts(SecondsFormat::AutoSi, true)
}

/// Write intervals as CSV, header first, one row per interval.
///
/// The header is written even when there are no intervals.
pub fn write_intervals_csv<W: Write>(intervals: &[Interval], writer: W) -> TrendResult<()> {
    let mut wtr = csv::WriterBuilder::new()
        .has_headers(false)
        .from_writer(writer);

    wtr.write_record(CSV_HEADER)?;
    for interval in intervals {
        wtr.serialize(IntervalRow::from(interval))?;
    }
    wtr.flush()
        .map_err(|e| TrendError::Export(format!("Failed to flush CSV output: {}", e)))?;
    Ok(())
}

/// Render intervals as an in-memory CSV document.
pub fn intervals_to_csv_string(intervals: &[Interval]) -> TrendResult<String> {
    let mut buffer = Vec::new();
    write_intervals_csv(intervals, &mut buffer)?;
    String::from_utf8(buffer).map_err(|e| TrendError::Export(e.to_string()))
}

/// Write intervals to a CSV file, replacing any existing file.
pub fn write_intervals_csv_file(intervals: &[Interval], path: &Path) -> TrendResult<()> {
    let file = File::create(path).map_err(|e| {
        TrendError::Export(format!("Failed to create {}: {}", path.display(), e))
    })?;
    write_intervals_csv(intervals, file)?;
    log::info!("Wrote {} intervals to {}", intervals.len(), path.display());
    Ok(())
}
