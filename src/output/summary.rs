//! Machine-readable run summary

use crate::{
    error::{AppError, Result},
    stats::{MergedSeries, SeriesStats},
    types::ChartOutput,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

/// Statistics of one series, keyed by test name
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SeriesSummary {
    /// Display key, e.g. `udp` or `doh-GET@9.9.9.9`
    pub series: String,
    pub protocol: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resolver: Option<String>,
    pub tests: BTreeMap<String, SeriesStats>,
}

/// Everything a run aggregated, as written by `--summary-json`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunSummary {
    pub generated_at: DateTime<Utc>,
    pub version: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub run_id: Option<String>,
    pub subdir: String,
    pub roots: Vec<PathBuf>,
    pub files: usize,
    pub series: Vec<SeriesSummary>,
    #[serde(default)]
    pub charts: Vec<PathBuf>,
}

impl RunSummary {
    pub fn new(
        stats: &MergedSeries<SeriesStats>,
        subdir: &str,
        roots: &[PathBuf],
        files: usize,
    ) -> Self {
        let series = stats
            .iter()
            .map(|(key, entries)| SeriesSummary {
                series: key.to_string(),
                protocol: key.protocol.label().to_string(),
                resolver: key.resolver.clone(),
                tests: entries
                    .iter()
                    .map(|(test, s)| (test.name(), s.clone()))
                    .collect(),
            })
            .collect();

        Self {
            generated_at: Utc::now(),
            version: crate::VERSION.to_string(),
            run_id: None,
            subdir: subdir.to_string(),
            roots: roots.to_vec(),
            files,
            series,
            charts: Vec::new(),
        }
    }

    pub fn with_run_id(mut self, run_id: Option<&str>) -> Self {
        self.run_id = run_id.map(str::to_string);
        self
    }

    pub fn with_charts(mut self, charts: &[ChartOutput]) -> Self {
        self.charts = charts.iter().map(|c| c.path.clone()).collect();
        self
    }

    /// Write pretty-printed JSON, creating the parent directory if needed
    pub fn write_json(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|e| {
                AppError::io(format!("Cannot create directory {}: {}", parent.display(), e))
            })?;
        }
        let json = serde_json::to_string_pretty(self)?;
        fs::write(path, json)
            .map_err(|e| AppError::io(format!("Cannot write {}: {}", path.display(), e)))
    }

    pub fn read_json(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .map_err(|e| AppError::io(format!("Cannot read {}: {}", path.display(), e)))?;
        Ok(serde_json::from_str(&content)?)
    }
}
