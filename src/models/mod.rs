//! Data models and structures for the RTT plotter

pub mod config;
pub mod key;
pub mod record;

// Re-export main model types
pub use config::Config;
pub use key::{GroupingKey, Protocol, SeriesKey, TestId};
pub use record::{Invocation, PeriodValue, RecordBatch, TrialRecord};
