//! Environment variable handling and .env file management

use crate::error::{AppError, Result};
use std::path::Path;

/// Env file read from the working directory
pub const ENV_FILE: &str = ".env";

/// Environment variable configuration manager
pub struct EnvManager;

impl EnvManager {
    /// Load .env from the current directory if it exists
    pub fn load_env_file(debug: bool) -> Result<()> {
        Self::load_env_file_from(Path::new(ENV_FILE), debug)
    }

    /// Load a specific env file if it exists; variables already set win
    pub fn load_env_file_from(path: &Path, debug: bool) -> Result<()> {
        if path.exists() {
            dotenv::from_path(path)
                .map_err(|e| AppError::config(format!("Failed to load {}: {}", path.display(), e)))?;

            if debug {
                eprintln!("Loaded configuration from {}", path.display());
            }
        } else if debug {
            eprintln!("No {} file found, using defaults and CLI arguments", path.display());
        }

        Ok(())
    }

    /// Create example .env file content
    pub fn create_example_env_content() -> String {
        r#"# DNS RTT Plotter Configuration
#
# Values here are defaults; command-line arguments override them.

# Directory name result files must sit under
# RTTPLOT_SUBDIR=tests

# Where chart images are written
# RTTPLOT_OUTPUT_DIR=charts

# Resolver words to split series by (comma-separated)
# RTTPLOT_RESOLVERS=1.1.1.1,8.8.8.8,9.9.9.9

# Y tick step of single-series charts
# RTTPLOT_BAR_STEP=10

# Render charts even when a protocol has no results (true/false)
# RTTPLOT_ALLOW_PARTIAL=false

# Enable colored output (true/false)
# RTTPLOT_ENABLE_COLOR=true
"#
        .to_string()
    }

    /// Validate environment variable format before parsing
    pub fn validate_env_var(key: &str, value: &str) -> Result<()> {
        match key {
            "RTTPLOT_SUBDIR" => {
                let value = value.trim();
                if value.is_empty() || value.contains(['/', '\\']) {
                    return Err(AppError::config(format!(
                        "RTTPLOT_SUBDIR must be a single directory name, got '{}'",
                        value
                    )));
                }
            }
            "RTTPLOT_OUTPUT_DIR" => {
                if value.trim().is_empty() {
                    return Err(AppError::config("RTTPLOT_OUTPUT_DIR cannot be empty"));
                }
            }
            "RTTPLOT_RESOLVERS" => {
                if value.split(',').any(|r| r.trim().contains(char::is_whitespace)) {
                    return Err(AppError::config(format!(
                        "RTTPLOT_RESOLVERS entries cannot contain spaces: '{}'",
                        value
                    )));
                }
            }
            "RTTPLOT_BAR_STEP" => {
                let step: f64 = value.trim().parse().map_err(|e| {
                    AppError::config(format!("Invalid RTTPLOT_BAR_STEP value '{}': {}", value, e))
                })?;
                if !step.is_finite() || step <= 0.0 {
                    return Err(AppError::config(format!(
                        "RTTPLOT_BAR_STEP must be positive, got: {}",
                        step
                    )));
                }
            }
            "RTTPLOT_ALLOW_PARTIAL" | "RTTPLOT_ENABLE_COLOR" => {
                value.trim().parse::<bool>().map_err(|e| {
                    AppError::config(format!("Invalid {} value '{}': {}", key, value, e))
                })?;
            }
            _ => {
                // Unknown environment variable, ignore
            }
        }

        Ok(())
    }

    /// Get list of all supported environment variables with descriptions
    pub fn get_supported_env_vars() -> Vec<(&'static str, &'static str, &'static str)> {
        vec![
            ("RTTPLOT_SUBDIR", "Directory name result files must sit under", "tests"),
            ("RTTPLOT_OUTPUT_DIR", "Directory chart images are written to", "charts"),
            ("RTTPLOT_RESOLVERS", "Comma-separated resolver words to split series by", "1.1.1.1,8.8.8.8"),
            ("RTTPLOT_BAR_STEP", "Y tick step of single-series charts", "10"),
            ("RTTPLOT_ALLOW_PARTIAL", "Chart protocols with missing results as gaps", "false"),
            ("RTTPLOT_ENABLE_COLOR", "Enable colored output", "true"),
        ]
    }

    /// Display environment variable help
    pub fn display_env_help() -> String {
        let mut help = String::new();
        help.push_str("Supported Environment Variables:\n\n");

        for (var, description, example) in Self::get_supported_env_vars() {
            help.push_str(&format!("  {:<22} {}\n", var, description));
            help.push_str(&format!("  {:<22} Example: {}\n\n", "", example));
        }

        help.push_str("Configuration Priority (highest to lowest):\n");
        help.push_str("  1. Command-line arguments\n");
        help.push_str("  2. Environment variables\n");
        help.push_str("  3. .env file values\n");
        help.push_str("  4. Default values\n");

        help
    }

    /// Validate all currently set environment variables
    pub fn validate_current_env() -> Vec<String> {
        Self::get_supported_env_vars()
            .into_iter()
            .filter_map(|(var_name, _, _)| {
                let value = std::env::var(var_name).ok()?;
                Self::validate_env_var(var_name, &value)
                    .err()
                    .map(|e| format!("Warning: {}", e))
            })
            .collect()
    }

    /// Validate the `KEY=value` lines of an env file without loading it
    pub fn check_env_file(path: &Path) -> Result<Option<Vec<String>>> {
        if !path.exists() {
            return Ok(None);
        }

        let content = std::fs::read_to_string(path)
            .map_err(|e| AppError::config(format!("Failed to read {}: {}", path.display(), e)))?;

        let warnings = content
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty() && !line.starts_with('#'))
            .filter_map(|line| {
                let (key, value) = line.split_once('=')?;
                Self::validate_env_var(key.trim(), value.trim())
                    .err()
                    .map(|e| format!("Line '{}': {}", line, e))
            })
            .collect();

        Ok(Some(warnings))
    }
}
