//! DNS RTT Plotter
//!
//! Reads line-delimited JSON results written by a DNS benchmark, groups the
//! measurements by protocol (UDP, DNS-over-HTTPS GET and POST) and test case,
//! and renders round-trip-time comparison charts.

pub mod app;
pub mod charts;
pub mod cli;
pub mod config;
pub mod error;
pub mod ingest;
pub mod logging;
pub mod models;
pub mod output;
pub mod stats;
pub mod types;
pub mod utils;

// Re-export commonly used types
pub use app::{App, RunReport};
pub use error::{AppError, Result};
pub use ingest::{parse_files, Corpus, CorpusBuilder, KeyExtractor};
pub use models::{Config, GroupingKey, Protocol, RecordBatch, SeriesKey, TestId};
pub use output::{ColoredFormatter, OutputCoordinator, OutputFormatter, OutputFormatterFactory, PlainFormatter, RunSummary};
pub use stats::{get_rtt, mean, merge_groups, rtt_means, rtt_summaries, MergedSeries, SeriesStats};

/// Application version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
pub const PKG_NAME: &str = env!("CARGO_PKG_NAME");
pub const PKG_DESCRIPTION: &str = env!("CARGO_PKG_DESCRIPTION");

/// Default configuration values
pub mod defaults {
    /// Directory name a result file must sit under
    pub const DEFAULT_SUBDIR: &str = "tests";
    pub const DEFAULT_OUTPUT_DIR: &str = ".";
    /// Y tick step of single-series charts, in milliseconds
    pub const DEFAULT_BAR_STEP: f64 = 10.0;
    pub const DEFAULT_CHART_SIZE: (u32, u32) = (1024, 768);
    pub const DEFAULT_X_LABEL: &str = "Tests as defined in the table";
    pub const DEFAULT_ENABLE_COLOR: bool = true;
}
