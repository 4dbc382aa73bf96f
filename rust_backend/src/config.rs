//! Analysis configuration file support.
//!
//! This module reads default analysis parameters from a TOML file:
//!
//! ```toml
//! [analysis]
//! window = "5min"
//! methods = ["ols_slope", "kendall_tau"]
//! direction = "decreasing"
//! top_k = 3
//!
//! [export]
//! filename = "trend_intervals.csv"
//! ```
//!
//! Every field is optional; omitted fields take the defaults of the front end
//! (5 minute window, decreasing trends, one interval, no methods selected).

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::core::domain::{TrendDirection, TrendMethod};
use crate::error::{TrendError, TrendResult};
use crate::services::trends::AnalysisRequest;
use crate::time::WindowSpec;

/// Analysis configuration from file.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AnalysisConfig {
    #[serde(default)]
    pub analysis: AnalysisSettings,
    #[serde(default)]
    pub export: ExportSettings,
}

/// Trend detection settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisSettings {
    /// Window in string form, e.g. `"5min"` or `"20"` for a sample count
    #[serde(default = "default_window")]
    pub window: String,
    #[serde(default)]
    pub methods: Vec<TrendMethod>,
    #[serde(default = "default_direction")]
    pub direction: TrendDirection,
    #[serde(default = "default_top_k")]
    pub top_k: usize,
}

/// Export settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExportSettings {
    #[serde(default = "default_filename")]
    pub filename: String,
}

fn default_window() -> String {
    "5min".to_string()
}

fn default_direction() -> TrendDirection {
    TrendDirection::Decreasing
}

fn default_top_k() -> usize {
    1
}

fn default_filename() -> String {
    "trend_intervals.csv".to_string()
}

impl Default for AnalysisSettings {
    fn default() -> Self {
        Self {
            window: default_window(),
            methods: Vec::new(),
            direction: default_direction(),
            top_k: default_top_k(),
        }
    }
}

impl Default for ExportSettings {
    fn default() -> Self {
        Self {
            filename: default_filename(),
        }
    }
}

impl AnalysisConfig {
    /// Load configuration from a TOML file.
    ///
    /// # Arguments
    /// * `path` - Path to the configuration file
    ///
    /// # Returns
    /// * `Ok(AnalysisConfig)` if successful
    /// * `Err(TrendError)` if the file cannot be read or parsed
    pub fn from_file<P: AsRef<Path>>(path: P) -> TrendResult<Self> {
        let content = fs::read_to_string(path.as_ref()).map_err(|e| {
            TrendError::InvalidConfiguration(format!(
                "Failed to read config file {}: {}",
                path.as_ref().display(),
                e
            ))
        })?;

        Self::from_toml_str(&content)
    }

    /// Parse configuration from TOML text.
    ///
    /// Errors name the offending field, e.g. `analysis.methods[1]`.
    pub fn from_toml_str(content: &str) -> TrendResult<Self> {
        let deserializer = toml::Deserializer::new(content);
        serde_path_to_error::deserialize(deserializer).map_err(|e| {
            TrendError::InvalidConfiguration(format!(
                "Failed to parse config at '{}': {}",
                e.path(),
                e.inner().message()
            ))
        })
    }

    /// Load configuration from the default location.
    ///
    /// Searches for `trendscope.toml` in:
    /// 1. Current directory
    /// 2. `rust_backend/` directory
    /// 3. Parent directory
    pub fn from_default_location() -> TrendResult<Self> {
        let search_paths = [
            PathBuf::from("trendscope.toml"),
            PathBuf::from("rust_backend/trendscope.toml"),
            PathBuf::from("../trendscope.toml"),
        ];

        for path in search_paths {
            if path.exists() {
                log::debug!("Loading analysis config from {}", path.display());
                return Self::from_file(&path);
            }
        }

        Err(TrendError::InvalidConfiguration(
            "No trendscope.toml found in standard locations".to_string(),
        ))
    }

    /// Build and validate the analysis request described by this config.
    pub fn to_request(&self) -> TrendResult<AnalysisRequest> {
        let window: WindowSpec = self.analysis.window.parse()?;
        let request = AnalysisRequest::new(
            self.analysis.methods.clone(),
            window,
            self.analysis.direction,
            self.analysis.top_k,
        );
        request.validate()?;
        Ok(request)
    }

    /// Export destination, relative to `dir`.
    pub fn export_path(&self, dir: &Path) -> PathBuf {
        dir.join(&self.export.filename)
    }
}
