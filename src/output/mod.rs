//! Output formatting and display system
//!
//! This module renders the aggregated statistics as a terminal table
//! (colored or plain) and exports them as a JSON run summary.

mod colored;
mod formatter;
mod summary;

pub use colored::{ColorScheme, ColoredFormatter, LatencyLevel};
pub use formatter::{
    align_text, format_ms, summary_rows, Alignment, Column, FormattingOptions, OutputFormatter,
    PlainFormatter, RowData, TableFormat,
};
pub use summary::{RunSummary, SeriesSummary};

use crate::{
    error::Result,
    stats::{MergedSeries, SeriesStats},
    types::ChartOutput,
};

/// Output formatting factory for creating appropriate formatters
pub struct OutputFormatterFactory;

impl OutputFormatterFactory {
    /// Create a formatter based on color support and preferences
    pub fn create_formatter(enable_color: bool) -> Box<dyn OutputFormatter> {
        let options = FormattingOptions {
            enable_color,
            table_borders: true,
        };

        if enable_color {
            Box::new(ColoredFormatter::new(options))
        } else {
            Box::new(PlainFormatter::new(options))
        }
    }

    /// Create a plain text formatter for scripts/logs
    pub fn create_plain_formatter() -> Box<dyn OutputFormatter> {
        Self::create_formatter(false)
    }
}

/// Main output coordinator that handles all result display
pub struct OutputCoordinator {
    formatter: Box<dyn OutputFormatter>,
}

impl OutputCoordinator {
    /// Create a new output coordinator with the specified formatter
    pub fn new(formatter: Box<dyn OutputFormatter>) -> Self {
        Self { formatter }
    }

    /// Full report: header, statistics table and written charts
    pub fn display_report(
        &self,
        title: &str,
        stats: &MergedSeries<SeriesStats>,
        charts: Option<&[ChartOutput]>,
    ) -> Result<String> {
        let mut output = String::new();

        output.push_str(&self.formatter.format_header(title)?);
        output.push_str("\n\n");

        output.push_str(&self.formatter.format_summary_table(stats)?);

        if let Some(charts) = charts {
            output.push_str("\n\n");
            output.push_str(&self.formatter.format_charts(charts)?);
        }

        Ok(output)
    }

    pub fn display_warning(&self, warning: &str) -> Result<String> {
        self.formatter.format_warning(warning)
    }

    pub fn display_success(&self, message: &str) -> Result<String> {
        self.formatter.format_success(message)
    }
}
