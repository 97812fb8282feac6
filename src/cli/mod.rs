//! Command-line interface module with topic help

pub mod help;

pub use help::HelpSystem;

use crate::logging::LogFormat;
use clap::{ArgAction, Parser};
use std::path::PathBuf;

/// DNS RTT Plotter - charts UDP vs DNS-over-HTTPS benchmark results
#[derive(Parser, Debug, Clone)]
#[command(name = "rttplot")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Root directories searched for result files
    #[arg(
        short = 'd',
        long = "dirs",
        value_name = "DIRS",
        num_args = 1..,
        action = ArgAction::Append,
        required_unless_present = "help_topic"
    )]
    pub dirs: Vec<PathBuf>,

    /// Directory name result files must sit under [default: tests]
    #[arg(long, value_name = "NAME")]
    pub subdir: Option<String>,

    /// Directory chart images are written to [default: .]
    #[arg(short = 'o', long, value_name = "DIR")]
    pub output_dir: Option<PathBuf>,

    /// Resolver words to split series by (comma-separated)
    #[arg(long, value_name = "LIST", value_delimiter = ',')]
    pub resolvers: Vec<String>,

    /// Chart protocols that have no results as gaps instead of failing
    #[arg(long)]
    pub allow_partial: bool,

    /// Also write one chart per protocol
    #[arg(long)]
    pub per_protocol: bool,

    /// Y tick step for single-protocol charts [default: 10]
    #[arg(long, value_name = "N", value_parser = parse_bar_step)]
    pub bar_step: Option<f64>,

    /// Chart size in pixels, e.g. 1280x720
    #[arg(long, value_name = "WxH", value_parser = parse_chart_size)]
    pub chart_size: Option<(u32, u32)>,

    /// X axis description for all charts
    #[arg(long, value_name = "TEXT")]
    pub x_label: Option<String>,

    /// Skip chart rendering and only report statistics
    #[arg(long)]
    pub no_charts: bool,

    /// Write the aggregated statistics as JSON
    #[arg(long, value_name = "PATH")]
    pub summary_json: Option<PathBuf>,

    /// Force colored output
    #[arg(long)]
    pub color: bool,

    /// Disable colored output
    #[arg(long)]
    pub no_color: bool,

    /// Enable verbose output
    #[arg(long)]
    pub verbose: bool,

    /// Enable debug output
    #[arg(long)]
    pub debug: bool,

    /// Log line format (console, json, compact)
    #[arg(long, value_name = "FORMAT", value_parser = parse_log_format)]
    pub log_format: Option<LogFormat>,

    /// Show help for a specific topic (input, charts, config, examples)
    #[arg(long, value_name = "TOPIC")]
    pub help_topic: Option<String>,
}

impl Cli {
    /// Validate CLI arguments for conflicts and requirements
    pub fn validate(&self) -> Result<(), String> {
        if self.color && self.no_color {
            return Err("Cannot specify both --color and --no-color".to_string());
        }

        if self.help_topic.is_none() && self.dirs.is_empty() {
            return Err("Must specify at least one input directory via --dirs".to_string());
        }

        if self.no_charts && self.per_protocol {
            return Err("--per-protocol has no effect together with --no-charts".to_string());
        }

        Ok(())
    }

    /// Check if help should be displayed for a specific topic
    pub fn should_show_topic_help(&self) -> bool {
        self.help_topic.is_some()
    }

    /// Check if colors should be enabled
    pub fn use_colors(&self) -> bool {
        if self.color {
            true
        } else if self.no_color {
            false
        } else {
            supports_color()
        }
    }

    /// Display help for the specified topic or main help
    pub fn display_help(&self) -> String {
        let help_system = HelpSystem::new();
        let use_colors = self.use_colors();

        match &self.help_topic {
            Some(topic) => help_system.display_topic_help(topic, use_colors).unwrap_or_else(|| {
                format!(
                    "Unknown help topic: '{}'\n\nAvailable topics: {}\n\n{}",
                    topic,
                    HelpSystem::topics().join(", "),
                    help_system.display_main_help(use_colors)
                )
            }),
            None => help_system.display_main_help(use_colors),
        }
    }
}

/// Parse a positive, finite tick step
fn parse_bar_step(s: &str) -> Result<f64, String> {
    let step: f64 = s.parse().map_err(|_| format!("Invalid bar step: {}", s))?;
    if !step.is_finite() || step <= 0.0 {
        return Err("Bar step must be greater than 0".to_string());
    }
    Ok(step)
}

/// Parse `WIDTHxHEIGHT`
fn parse_chart_size(s: &str) -> Result<(u32, u32), String> {
    let (width, height) = s
        .split_once(['x', 'X'])
        .ok_or_else(|| format!("Invalid chart size '{}', expected WIDTHxHEIGHT", s))?;
    let width = width
        .trim()
        .parse::<u32>()
        .map_err(|_| format!("Invalid chart width: {}", width))?;
    let height = height
        .trim()
        .parse::<u32>()
        .map_err(|_| format!("Invalid chart height: {}", height))?;
    Ok((width, height))
}

fn parse_log_format(s: &str) -> Result<LogFormat, String> {
    s.parse::<LogFormat>().map_err(|e| e.to_string())
}

/// Check if the terminal supports color output
fn supports_color() -> bool {
    if let Ok(term) = std::env::var("TERM") {
        if term == "dumb" {
            return false;
        }
    }

    if std::env::var("NO_COLOR").is_ok() {
        return false;
    }

    if std::env::var("FORCE_COLOR").is_ok() {
        return true;
    }

    #[cfg(target_os = "windows")]
    {
        if std::env::var("ANSICON").is_ok() || std::env::var("ConEmuANSI").is_ok() {
            return true;
        }
    }

    cfg!(unix)
}
