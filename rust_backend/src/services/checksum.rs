//! Checksums used as memoization keys by callers.
//!
//! The analysis core never caches anything. Front ends that re-run analyses on
//! every parameter change can key their own caches on these digests.

use sha2::{Digest, Sha256};

use crate::core::domain::TimeSeries;

const MISSING_MARKER: u8 = 0x00;
const PRESENT_MARKER: u8 = 0x01;

/// Calculate the SHA-256 checksum of arbitrary text content.
///
/// # Returns
/// Hexadecimal string representation of the SHA-256 hash.
pub fn calculate_checksum(content: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(content.as_bytes());
    hex::encode(hasher.finalize())
}

/// Calculate the SHA-256 checksum of a series.
///
/// Covers every timestamp (seconds plus sub-second nanoseconds) and every value
/// bit pattern. Missing samples hash differently from any present value.
pub fn series_checksum(series: &TimeSeries) -> String {
    let mut hasher = Sha256::new();
    hasher.update((series.len() as u64).to_le_bytes());
    for (ts, value) in series.iter() {
        hasher.update(ts.timestamp().to_le_bytes());
        hasher.update(ts.timestamp_subsec_nanos().to_le_bytes());
        match value {
            Some(v) => {
                hasher.update([PRESENT_MARKER]);
                hasher.update(v.to_bits().to_le_bytes());
            }
            None => hasher.update([MISSING_MARKER]),
        }
    }
    hex::encode(hasher.finalize())
}
