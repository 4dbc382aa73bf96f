//! Export of detected intervals.
//!
//! The export schema is fixed: `method, direction, start, end, slope`, one row
//! per interval, timestamps in RFC 3339.
//!
//! # Example
//!
//! ```
//! use trendscope::io::intervals_to_csv_string;
//!
//! let csv = intervals_to_csv_string(&[]).unwrap();
//! assert_eq!(csv, "method,direction,start,end,slope\n");
//! ```

pub mod export;

pub use export::{
    format_timestamp, intervals_to_csv_string, write_intervals_csv, write_intervals_csv_file,
    IntervalRow, CSV_HEADER,
};
