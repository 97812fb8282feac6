//! Configuration data model and validation

use crate::logging::LogFormat;
use crate::types::{AppError, Result};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Main application configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Root directories searched for result files
    #[serde(default)]
    pub dirs: Vec<PathBuf>,

    /// Directory name a result file must sit under to be included
    #[serde(default = "default_subdir")]
    pub subdir: String,

    /// Where chart images are written
    #[serde(default = "default_output_dir")]
    pub output_dir: PathBuf,

    /// Resolver words to split series by; empty disables resolver keys
    #[serde(default)]
    pub resolvers: Vec<String>,

    /// Render charts even when a protocol category has no data
    #[serde(default)]
    pub allow_partial: bool,

    /// Also write one single-series chart per protocol
    #[serde(default)]
    pub per_protocol: bool,

    /// Write PNG charts at all
    #[serde(default = "default_render_charts")]
    pub render_charts: bool,

    /// Y tick step for single-series charts
    #[serde(default = "default_bar_step")]
    pub bar_step: f64,

    /// Chart image width in pixels
    #[serde(default = "default_chart_width")]
    pub chart_width: u32,

    /// Chart image height in pixels
    #[serde(default = "default_chart_height")]
    pub chart_height: u32,

    /// X axis description shared by all charts
    #[serde(default = "default_x_label")]
    pub x_label: String,

    /// Optional path for a JSON export of the aggregated summary
    #[serde(default)]
    pub summary_json: Option<PathBuf>,

    /// Enable colored terminal output
    #[serde(default = "default_enable_color")]
    pub enable_color: bool,

    /// Enable verbose output
    #[serde(default)]
    pub verbose: bool,

    /// Enable debug output
    #[serde(default)]
    pub debug: bool,

    /// Log line format
    #[serde(default)]
    pub log_format: LogFormat,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            dirs: Vec::new(),
            subdir: default_subdir(),
            output_dir: default_output_dir(),
            resolvers: Vec::new(),
            allow_partial: false,
            per_protocol: false,
            render_charts: default_render_charts(),
            bar_step: default_bar_step(),
            chart_width: default_chart_width(),
            chart_height: default_chart_height(),
            x_label: default_x_label(),
            summary_json: None,
            enable_color: default_enable_color(),
            verbose: false,
            debug: false,
            log_format: LogFormat::default(),
        }
    }
}

impl Config {
    /// Create a new configuration with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Validate the configuration and return any errors
    pub fn validate(&self) -> Result<()> {
        if self.dirs.is_empty() {
            return Err(AppError::config("At least one input directory is required"));
        }

        for dir in &self.dirs {
            if dir.as_os_str().is_empty() {
                return Err(AppError::config("Input directory cannot be empty"));
            }
        }

        if self.subdir.is_empty() {
            return Err(AppError::config("Subdirectory name cannot be empty"));
        }

        if self.subdir.contains(['/', '\\']) || self.subdir == "." || self.subdir == ".." {
            return Err(AppError::config(format!(
                "Subdirectory must be a single directory name, got '{}'",
                self.subdir
            )));
        }

        for resolver in &self.resolvers {
            if resolver.trim().is_empty() {
                return Err(AppError::config("Resolver entries cannot be empty"));
            }
        }

        if !self.bar_step.is_finite() || self.bar_step <= 0.0 {
            return Err(AppError::config("Bar step must be a positive number"));
        }

        if self.chart_width < 200 || self.chart_height < 150 {
            return Err(AppError::config(format!(
                "Chart size {}x{} is too small (minimum 200x150)",
                self.chart_width, self.chart_height
            )));
        }

        Ok(())
    }

    /// Merge environment variables into this configuration
    pub fn merge_from_env(&mut self) -> Result<()> {
        self.merge_from_vars(|key| std::env::var(key).ok())
    }

    /// Merge `RTTPLOT_*` settings looked up through `lookup`
    pub fn merge_from_vars<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(subdir) = lookup("RTTPLOT_SUBDIR") {
            self.subdir = subdir.trim().to_string();
        }

        if let Some(output_dir) = lookup("RTTPLOT_OUTPUT_DIR") {
            self.output_dir = PathBuf::from(output_dir.trim());
        }

        if let Some(resolvers) = lookup("RTTPLOT_RESOLVERS") {
            self.resolvers = split_list(&resolvers);
        }

        if let Some(bar_step) = lookup("RTTPLOT_BAR_STEP") {
            self.bar_step = bar_step.trim().parse()
                .map_err(|e| AppError::config(format!("Invalid RTTPLOT_BAR_STEP value '{}': {}", bar_step, e)))?;
        }

        if let Some(allow_partial) = lookup("RTTPLOT_ALLOW_PARTIAL") {
            self.allow_partial = allow_partial.trim().parse()
                .map_err(|e| AppError::config(format!("Invalid RTTPLOT_ALLOW_PARTIAL value '{}': {}", allow_partial, e)))?;
        }

        if let Some(enable_color) = lookup("RTTPLOT_ENABLE_COLOR") {
            self.enable_color = enable_color.trim().parse()
                .map_err(|e| AppError::config(format!("Invalid RTTPLOT_ENABLE_COLOR value '{}': {}", enable_color, e)))?;
        }

        Ok(())
    }
}

/// Split a comma-separated setting, dropping blank entries
pub fn split_list(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect()
}

fn default_subdir() -> String {
    crate::defaults::DEFAULT_SUBDIR.to_string()
}

fn default_output_dir() -> PathBuf {
    PathBuf::from(crate::defaults::DEFAULT_OUTPUT_DIR)
}

fn default_render_charts() -> bool {
    true
}

fn default_bar_step() -> f64 {
    crate::defaults::DEFAULT_BAR_STEP
}

fn default_chart_width() -> u32 {
    crate::defaults::DEFAULT_CHART_SIZE.0
}

fn default_chart_height() -> u32 {
    crate::defaults::DEFAULT_CHART_SIZE.1
}

fn default_x_label() -> String {
    crate::defaults::DEFAULT_X_LABEL.to_string()
}

fn default_enable_color() -> bool {
    crate::defaults::DEFAULT_ENABLE_COLOR
}
