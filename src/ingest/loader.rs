//! Result file loading
//!
//! A result file holds one JSON record per line. The first record carries the
//! benchmark command line under `cmdline`; the following records carry the
//! per-period latency averages, and a trailing summary record carries
//! `total_response_avg_ms`.

use crate::{
    error::{AppError, ErrorContext, Result},
    models::{Invocation, PeriodValue, RecordBatch, TrialRecord},
};
use serde::Deserialize;
use serde_json::Value;
use std::path::Path;

/// Columns of a result line this tool reads; everything else is ignored
#[derive(Debug, Default, Deserialize)]
struct ResultLine {
    #[serde(default)]
    cmdline: Option<Value>,
    #[serde(default)]
    period_response_avg_ms: Option<Value>,
    #[serde(default)]
    total_response_avg_ms: Option<Value>,
}

/// Load one result file into a record batch
pub fn load_result_file(path: &Path) -> Result<RecordBatch> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    parse_result_lines(&content, path)
}

/// Parse the content of a result file
///
/// Row 0 is always dropped after its command line is recovered. Of the
/// remaining rows only those without a defined total-response average are
/// kept.
pub fn parse_result_lines(content: &str, source: &Path) -> Result<RecordBatch> {
    let mut rows = content
        .lines()
        .enumerate()
        .filter(|(_, line)| !line.trim().is_empty())
        .map(|(index, line)| {
            let line_number = index + 1;
            serde_json5::from_str::<ResultLine>(line)
                .map(|row| (line_number, row))
                .with_context(|| format!("{} line {}", source.display(), line_number))
        });

    let (_, header) = rows
        .next()
        .ok_or_else(|| AppError::parse(format!("{} contains no records", source.display())))??;
    let invocation = parse_invocation(header.cmdline.as_ref(), source)?;

    let mut records = Vec::new();
    for row in rows {
        let (line, row) = row?;
        if is_defined(row.total_response_avg_ms.as_ref()) {
            continue;
        }
        let period_response_avg_ms = period_value(row.period_response_avg_ms, source, line)?;
        records.push(TrialRecord { line, period_response_avg_ms });
    }

    Ok(RecordBatch {
        source: source.to_path_buf(),
        invocation,
        records,
    })
}

/// Split the embedded command string the way a POSIX shell would
pub fn split_command_line(cmdline: &str) -> Result<Vec<String>> {
    shlex::split(cmdline)
        .ok_or_else(|| AppError::parse(format!("Unbalanced quoting in command line: {}", cmdline)))
}

fn parse_invocation(cmdline: Option<&Value>, source: &Path) -> Result<Invocation> {
    match cmdline {
        Some(Value::String(cmdline)) => split_command_line(cmdline)
            .map(Invocation::new)
            .with_context(|| source.display().to_string()),
        Some(other) => Err(AppError::parse(format!(
            "{}: 'cmdline' must be a string, found {}",
            source.display(),
            other
        ))),
        None => Err(AppError::parse(format!(
            "{}: first record has no 'cmdline' field",
            source.display()
        ))),
    }
}

/// Null and NaN count as undefined
fn is_defined(value: Option<&Value>) -> bool {
    !matches!(value, None | Some(Value::Null))
}

fn period_value(value: Option<Value>, source: &Path, line: usize) -> Result<PeriodValue> {
    match value {
        None | Some(Value::Null) => Ok(PeriodValue::Missing),
        Some(Value::Number(n)) => Ok(PeriodValue::Value(n.as_f64().unwrap_or(f64::NAN))),
        Some(Value::Array(items)) => items
            .into_iter()
            .map(|item| match item {
                Value::Number(n) => Ok(n.as_f64().unwrap_or(f64::NAN)),
                Value::Null => Ok(f64::NAN),
                other => Err(AppError::parse(format!(
                    "{} line {}: non-numeric latency value {}",
                    source.display(),
                    line,
                    other
                ))),
            })
            .collect::<Result<Vec<_>>>()
            .map(PeriodValue::Values),
        Some(other) => Err(AppError::parse(format!(
            "{} line {}: unexpected period_response_avg_ms value {}",
            source.display(),
            line,
            other
        ))),
    }
}
