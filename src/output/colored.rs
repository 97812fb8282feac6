//! Colored formatter implementation with terminal color support

use super::formatter::{
    fmt_error, summary_rows, FormattingOptions, OutputFormatter, PlainFormatter, TableFormat,
};
use crate::{
    error::Result,
    stats::{MergedSeries, SeriesStats},
    types::ChartOutput,
};
use colored::*;
use std::fmt::Write as _;

/// Latency classification for color coding
#[derive(Debug, Clone, PartialEq)]
pub enum LatencyLevel {
    Excellent, // < 20ms
    Good,      // 20-50ms
    Fair,      // 50-150ms
    Poor,      // >= 150ms
}

impl LatencyLevel {
    /// Determine level from a round-trip time in milliseconds
    pub fn from_rtt(rtt_ms: f64) -> Self {
        if rtt_ms < 20.0 {
            Self::Excellent
        } else if rtt_ms < 50.0 {
            Self::Good
        } else if rtt_ms < 150.0 {
            Self::Fair
        } else {
            Self::Poor
        }
    }

    pub fn color(&self) -> Color {
        match self {
            Self::Excellent => Color::Green,
            Self::Good => Color::Cyan,
            Self::Fair => Color::Yellow,
            Self::Poor => Color::Red,
        }
    }
}

/// Color scheme configuration
#[derive(Debug, Clone)]
pub struct ColorScheme {
    pub header: Color,
    pub success: Color,
    pub warning: Color,
    pub muted: Color,
    pub border: Color,
}

impl Default for ColorScheme {
    fn default() -> Self {
        Self {
            header: Color::Blue,
            success: Color::Green,
            warning: Color::Yellow,
            muted: Color::BrightBlack,
            border: Color::BrightBlack,
        }
    }
}

/// Column holding the mean in the summary table
const MEAN_COLUMN: usize = 3;

/// Colored formatter implementation
pub struct ColoredFormatter {
    plain_formatter: PlainFormatter,
    options: FormattingOptions,
    color_scheme: ColorScheme,
}

impl ColoredFormatter {
    /// Create a new colored formatter with options
    pub fn new(options: FormattingOptions) -> Self {
        Self::with_color_scheme(options, ColorScheme::default())
    }

    /// Create a colored formatter with custom color scheme
    pub fn with_color_scheme(options: FormattingOptions, color_scheme: ColorScheme) -> Self {
        let plain_formatter = PlainFormatter::new(options.clone());
        Self {
            plain_formatter,
            options,
            color_scheme,
        }
    }

    /// Apply color to text if colors are enabled
    fn colorize(&self, text: &str, color: Color) -> ColoredString {
        if self.options.enable_color {
            text.color(color)
        } else {
            text.normal()
        }
    }

    /// Color a padded mean cell by the value it holds
    fn style_cell(&self, column: usize, cell: String) -> String {
        if !self.options.enable_color {
            return cell;
        }
        if column == MEAN_COLUMN {
            let value = cell.trim().trim_end_matches("ms").parse::<f64>().unwrap_or(0.0);
            return cell.color(LatencyLevel::from_rtt(value).color()).to_string();
        }
        if column == 0 {
            return cell.bold().to_string();
        }
        cell
    }
}

impl OutputFormatter for ColoredFormatter {
    fn format_header(&self, title: &str) -> Result<String> {
        if !self.options.enable_color {
            return self.plain_formatter.format_header(title);
        }
        let border = "=".repeat(title.len() + 4);
        Ok(format!(
            "{}\n  {}  \n{}",
            self.colorize(&border, self.color_scheme.border),
            title.bold().color(self.color_scheme.header),
            self.colorize(&border, self.color_scheme.border)
        ))
    }

    fn format_summary_table(&self, stats: &MergedSeries<SeriesStats>) -> Result<String> {
        let rows = summary_rows(stats);
        if rows.is_empty() {
            return Ok(self
                .colorize("No RTT values to summarize.", self.color_scheme.muted)
                .to_string());
        }
        let table = TableFormat::summary(self.options.table_borders);
        Ok(table.render(&rows, |column, cell| self.style_cell(column, cell)))
    }

    fn format_charts(&self, charts: &[ChartOutput]) -> Result<String> {
        if !self.options.enable_color {
            return self.plain_formatter.format_charts(charts);
        }
        let mut output = String::new();
        if charts.is_empty() {
            write!(output, "{}", self.colorize("No charts written.", self.color_scheme.muted))
                .map_err(fmt_error)?;
            return Ok(output);
        }
        writeln!(output, "{}", "Charts:".bold().color(self.color_scheme.header)).map_err(fmt_error)?;
        let lines: Vec<String> = charts
            .iter()
            .map(|chart| {
                format!(
                    "  {} {:<10} {} {}",
                    self.colorize("✓", self.color_scheme.success),
                    chart.kind.to_string(),
                    chart.path.display(),
                    self.colorize(&format!("({} bars)", chart.bars), self.color_scheme.muted)
                )
            })
            .collect();
        output.push_str(&lines.join("\n"));
        Ok(output)
    }

    fn format_warning(&self, warning: &str) -> Result<String> {
        Ok(format!("{} {}", self.colorize("WARNING:", self.color_scheme.warning).bold(), warning))
    }

    fn format_success(&self, message: &str) -> Result<String> {
        Ok(format!("{} {}", self.colorize("✓", self.color_scheme.success), message))
    }
}
