//! Error types for trend analysis.

/// Result type for trend analysis operations
pub type TrendResult<T> = Result<T, TrendError>;

/// Error type for trend analysis operations.
///
/// Degenerate windows are never errors: they score as
/// [`Score::Undefined`](crate::core::domain::Score) and are dropped before
/// ranking. Only caller-side faults end up here.
#[derive(Debug, thiserror::Error)]
pub enum TrendError {
    #[error("Invalid window: {0}")]
    InvalidWindow(String),

    #[error("Configuration error: {0}")]
    InvalidConfiguration(String),

    #[error("Timestamps out of order at index {index}")]
    UnorderedTimestamps { index: usize },

    #[error("Timestamp out of range: {0} ms")]
    InvalidTimestamp(i64),

    #[error("Export error: {0}")]
    Export(String),
}

impl From<csv::Error> for TrendError {
    fn from(e: csv::Error) -> Self {
        TrendError::Export(e.to_string())
    }
}

impl From<serde_json::Error> for TrendError {
    fn from(e: serde_json::Error) -> Self {
        TrendError::Export(e.to_string())
    }
}
