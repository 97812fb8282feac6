//! Trial records and the per-file batches they are loaded into

use std::path::PathBuf;

/// Per-period latency cell of a detail row
#[derive(Debug, Clone, PartialEq)]
pub enum PeriodValue {
    /// Column absent or null on this row
    Missing,
    /// A single period average
    Value(f64),
    /// A list of period averages; null entries are stored as NaN
    Values(Vec<f64>),
}

impl PeriodValue {
    /// All values of the cell, in order, including zero and NaN entries
    pub fn values(&self) -> &[f64] {
        match self {
            PeriodValue::Missing => &[],
            PeriodValue::Value(v) => std::slice::from_ref(v),
            PeriodValue::Values(values) => values,
        }
    }
}

/// One measurement row of a result file
#[derive(Debug, Clone, PartialEq)]
pub struct TrialRecord {
    /// 1-based line number within the source file
    pub line: usize,
    pub period_response_avg_ms: PeriodValue,
}

/// Argument list of the benchmark invocation that produced a result file
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Invocation {
    pub args: Vec<String>,
}

impl Invocation {
    pub fn new(args: Vec<String>) -> Self {
        Self { args }
    }

    /// Whether `word` appears as an exact argument
    pub fn contains(&self, word: &str) -> bool {
        self.args.iter().any(|arg| arg == word)
    }
}

/// Retained detail rows of one result file
#[derive(Debug, Clone, PartialEq)]
pub struct RecordBatch {
    pub source: PathBuf,
    pub invocation: Invocation,
    pub records: Vec<TrialRecord>,
}

impl RecordBatch {
    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}
