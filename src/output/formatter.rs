//! Core formatting traits and implementations
//!
//! This module defines the output formatting interface and provides
//! a plain text implementation with table formatting capabilities.

use crate::{
    error::{AppError, Result},
    models::TestId,
    stats::{MergedSeries, SeriesStats},
    types::ChartOutput,
};
use std::fmt::Write as _;

/// Main trait for output formatting
pub trait OutputFormatter {
    /// Format a header section
    fn format_header(&self, title: &str) -> Result<String>;

    /// Format per-series, per-test statistics as a table
    fn format_summary_table(&self, stats: &MergedSeries<SeriesStats>) -> Result<String>;

    /// Format the list of written charts
    fn format_charts(&self, charts: &[ChartOutput]) -> Result<String>;

    /// Format warning messages
    fn format_warning(&self, warning: &str) -> Result<String>;

    /// Format success messages
    fn format_success(&self, message: &str) -> Result<String>;
}

/// Configuration options for formatting
#[derive(Debug, Clone)]
pub struct FormattingOptions {
    /// Enable colored output
    pub enable_color: bool,
    /// Show table borders
    pub table_borders: bool,
}

impl Default for FormattingOptions {
    fn default() -> Self {
        Self {
            enable_color: true,
            table_borders: true,
        }
    }
}

/// Table formatting configuration
#[derive(Debug, Clone)]
pub struct TableFormat {
    /// Column definitions
    pub columns: Vec<Column>,
    /// Show borders around table
    pub show_borders: bool,
}

/// Column definition for table formatting
#[derive(Debug, Clone)]
pub struct Column {
    /// Column header
    pub header: String,
    /// Column alignment
    pub alignment: Alignment,
    /// Minimum width
    pub min_width: usize,
}

impl Column {
    pub fn left(header: &str) -> Self {
        Self { header: header.to_string(), alignment: Alignment::Left, min_width: 0 }
    }

    pub fn right(header: &str) -> Self {
        Self { header: header.to_string(), alignment: Alignment::Right, min_width: 0 }
    }
}

/// Text alignment options
#[derive(Debug, Clone)]
pub enum Alignment {
    Left,
    Right,
    Center,
}

/// Row data for table formatting
pub type RowData = Vec<String>;

impl TableFormat {
    /// Layout of the statistics table
    pub fn summary(show_borders: bool) -> Self {
        Self {
            columns: vec![
                Column::left("Series"),
                Column::left("Test"),
                Column::right("Count"),
                Column::right("Mean"),
                Column::right("Median"),
                Column::right("P95"),
                Column::right("Min"),
                Column::right("Max"),
            ],
            show_borders,
        }
    }

    /// Widest cell (or header) per column
    pub fn column_widths(&self, rows: &[RowData]) -> Vec<usize> {
        self.columns
            .iter()
            .enumerate()
            .map(|(idx, column)| {
                rows.iter()
                    .filter_map(|row| row.get(idx))
                    .map(|cell| cell.chars().count())
                    .fold(column.min_width.max(column.header.chars().count()), usize::max)
            })
            .collect()
    }

    /// Horizontal border line
    pub fn border(&self, widths: &[usize]) -> String {
        let mut border = String::from("+");
        for &width in widths {
            border.push_str(&"-".repeat(width + 2));
            border.push('+');
        }
        border
    }

    /// One row; `style` may decorate each padded cell by column index
    pub fn row<F>(&self, cells: &[String], widths: &[usize], style: F) -> String
    where
        F: Fn(usize, String) -> String,
    {
        let mut row = String::new();
        if self.show_borders {
            row.push('|');
        }
        for (idx, (cell, &width)) in cells.iter().zip(widths.iter()).enumerate() {
            let alignment = self
                .columns
                .get(idx)
                .map(|c| &c.alignment)
                .unwrap_or(&Alignment::Left);
            let padded = style(idx, align_text(cell, width, alignment));
            if self.show_borders {
                row.push(' ');
                row.push_str(&padded);
                row.push_str(" |");
            } else {
                row.push_str(&padded);
                row.push_str("  ");
            }
        }
        row.trim_end().to_string()
    }

    /// Full table with header; `style` decorates data cells only
    pub fn render<F>(&self, rows: &[RowData], style: F) -> String
    where
        F: Fn(usize, String) -> String,
    {
        let widths = self.column_widths(rows);
        let headers: Vec<String> = self.columns.iter().map(|c| c.header.clone()).collect();
        let mut lines = Vec::new();

        if self.show_borders {
            lines.push(self.border(&widths));
        }
        lines.push(self.row(&headers, &widths, |_, cell| cell));
        if self.show_borders {
            lines.push(self.border(&widths));
        }
        for row in rows {
            lines.push(self.row(row, &widths, &style));
        }
        if self.show_borders {
            lines.push(self.border(&widths));
        }
        lines.join("\n")
    }
}

/// Align text within specified width
pub fn align_text(text: &str, width: usize, alignment: &Alignment) -> String {
    let len = text.chars().count();
    if len >= width {
        return text.to_string();
    }

    let padding = width - len;
    match alignment {
        Alignment::Left => format!("{}{}", text, " ".repeat(padding)),
        Alignment::Right => format!("{}{}", " ".repeat(padding), text),
        Alignment::Center => {
            let left_pad = padding / 2;
            let right_pad = padding - left_pad;
            format!("{}{}{}", " ".repeat(left_pad), text, " ".repeat(right_pad))
        }
    }
}

/// Latency in milliseconds with two decimals
pub fn format_ms(value: f64) -> String {
    format!("{:.2}ms", value)
}

/// Table rows: series in first-seen order, tests ascending within a series
pub fn summary_rows(stats: &MergedSeries<SeriesStats>) -> Vec<RowData> {
    let mut rows = Vec::new();
    for (series, entries) in stats {
        let mut sorted: Vec<&(TestId, SeriesStats)> = entries.iter().collect();
        sorted.sort_by_key(|(test, _)| *test);
        for (test, s) in sorted {
            rows.push(vec![
                series.to_string(),
                test.to_string(),
                s.count.to_string(),
                format_ms(s.mean_ms),
                format_ms(s.median_ms),
                format_ms(s.p95_ms),
                format_ms(s.min_ms),
                format_ms(s.max_ms),
            ]);
        }
    }
    rows
}

pub(crate) fn fmt_error(e: std::fmt::Error) -> AppError {
    AppError::internal(format!("Failed to format output: {}", e))
}

/// Plain text formatter implementation
pub struct PlainFormatter {
    options: FormattingOptions,
}

impl PlainFormatter {
    /// Create a new plain formatter with options
    pub fn new(options: FormattingOptions) -> Self {
        Self { options }
    }
}

impl OutputFormatter for PlainFormatter {
    fn format_header(&self, title: &str) -> Result<String> {
        let mut output = String::new();
        let border = "=".repeat(title.len() + 4);

        writeln!(output, "{}", border).map_err(fmt_error)?;
        writeln!(output, "  {}  ", title).map_err(fmt_error)?;
        write!(output, "{}", border).map_err(fmt_error)?;

        Ok(output)
    }

    fn format_summary_table(&self, stats: &MergedSeries<SeriesStats>) -> Result<String> {
        let rows = summary_rows(stats);
        if rows.is_empty() {
            return Ok("No RTT values to summarize.".to_string());
        }
        let table = TableFormat::summary(self.options.table_borders);
        Ok(table.render(&rows, |_, cell| cell))
    }

    fn format_charts(&self, charts: &[ChartOutput]) -> Result<String> {
        let mut output = String::new();
        if charts.is_empty() {
            write!(output, "No charts written.").map_err(fmt_error)?;
            return Ok(output);
        }
        writeln!(output, "Charts:").map_err(fmt_error)?;
        for (idx, chart) in charts.iter().enumerate() {
            if idx > 0 {
                output.push('\n');
            }
            write!(
                output,
                "  {:<10} {} ({} bars)",
                chart.kind.to_string(),
                chart.path.display(),
                chart.bars
            )
            .map_err(fmt_error)?;
        }
        Ok(output)
    }

    fn format_warning(&self, warning: &str) -> Result<String> {
        Ok(format!("WARNING: {}", warning))
    }

    fn format_success(&self, message: &str) -> Result<String> {
        Ok(format!("OK: {}", message))
    }
}
