//! Descriptive statistics for one RTT sample

use crate::utils::sorted_values;
use serde::{Deserialize, Serialize};

/// Summary of the filtered RTT values of one `(protocol, test)` group
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SeriesStats {
    /// Number of period values that survived filtering
    pub count: usize,
    pub mean_ms: f64,
    pub median_ms: f64,
    pub p95_ms: f64,
    pub min_ms: f64,
    pub max_ms: f64,
    /// Population standard deviation
    pub std_dev_ms: f64,
}

impl SeriesStats {
    /// Compute statistics over `values`; an empty slice yields all zeros
    pub fn from_values(values: &[f64]) -> Self {
        if values.is_empty() {
            return Self::empty();
        }

        let sorted = sorted_values(values);
        let mean = super::mean(values);
        let variance = values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / values.len() as f64;

        Self {
            count: values.len(),
            mean_ms: mean,
            median_ms: percentile(&sorted, 50.0),
            p95_ms: percentile(&sorted, 95.0),
            min_ms: sorted[0],
            max_ms: sorted[sorted.len() - 1],
            std_dev_ms: variance.sqrt(),
        }
    }

    pub fn empty() -> Self {
        Self {
            count: 0,
            mean_ms: 0.0,
            median_ms: 0.0,
            p95_ms: 0.0,
            min_ms: 0.0,
            max_ms: 0.0,
            std_dev_ms: 0.0,
        }
    }
}

/// Linear-interpolated percentile of an ascending slice
pub fn percentile(sorted_values: &[f64], percentile: f64) -> f64 {
    if sorted_values.is_empty() {
        return 0.0;
    }

    let index = (percentile / 100.0) * (sorted_values.len() as f64 - 1.0);
    let lower_index = index.floor() as usize;
    let upper_index = index.ceil() as usize;

    if lower_index == upper_index {
        sorted_values[lower_index]
    } else {
        let lower_value = sorted_values[lower_index];
        let upper_value = sorted_values[upper_index];
        let weight = index - lower_index as f64;
        lower_value + weight * (upper_value - lower_value)
    }
}
