//! Type definitions and aliases

use serde::{Deserialize, Serialize};
use std::fmt;

// Re-export commonly used types
pub use crate::charts::layout::ProtocolSeries;
pub use crate::error::{AppError, Result};

/// Kinds of chart the tool writes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChartKind {
    /// Mean RTT of UDP, DoH GET and DoH POST side by side
    Combined,
    /// DoH GET and DoH POST minus UDP
    Difference,
    /// Mean RTT of a single protocol
    Single,
}

impl ChartKind {
    /// File name suffix, without extension
    pub fn file_suffix(&self) -> &'static str {
        match self {
            ChartKind::Combined => "combined-rtt-mean",
            ChartKind::Difference => "combined-rtt-difference",
            ChartKind::Single => "rtt-mean",
        }
    }
}

impl fmt::Display for ChartKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ChartKind::Combined => "combined",
            ChartKind::Difference => "difference",
            ChartKind::Single => "single",
        };
        f.write_str(name)
    }
}

/// Outcome of one chart request
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartOutput {
    pub kind: ChartKind,
    pub path: std::path::PathBuf,
    /// Number of bars drawn
    pub bars: usize,
}
