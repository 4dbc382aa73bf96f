//! Time handling for rolling windows.
//!
//! - [`elapsed`]: timestamp normalization to elapsed seconds within a window
//! - [`window_spec`]: window shapes and their string form (`"5min"`, `"30s"`, `"20"`)

pub mod elapsed;
pub mod window_spec;

pub use elapsed::{delta_seconds, elapsed_seconds};
pub use window_spec::WindowSpec;
