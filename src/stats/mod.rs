//! Aggregation of grouped trial records into per-protocol RTT series

pub mod summary;

pub use summary::{percentile, SeriesStats};

use crate::{
    ingest::Corpus,
    models::{RecordBatch, SeriesKey, TestId},
};
use indexmap::IndexMap;
use std::collections::BTreeMap;

/// Aggregated values per series, each in the order its tests were first seen
pub type MergedSeries<T> = IndexMap<SeriesKey, Vec<(TestId, T)>>;

/// Whether a period latency is usable: zero, NaN and infinities are dropped
pub fn is_valid_latency(value: f64) -> bool {
    value != 0.0 && value.is_finite()
}

/// All usable per-period latencies across `batches`, flattened in order
pub fn get_rtt(batches: &[RecordBatch]) -> Vec<f64> {
    batches
        .iter()
        .flat_map(|batch| batch.records.iter())
        .flat_map(|record| record.period_response_avg_ms.values().iter().copied())
        .filter(|value| is_valid_latency(*value))
        .collect()
}

/// Arithmetic mean; NaN for an empty slice
pub fn mean(values: &[f64]) -> f64 {
    values.iter().sum::<f64>() / values.len() as f64
}

/// Reduce every corpus group and re-key it by series
///
/// For each key in corpus order, `extract` produces a numeric sample. Keys
/// with an empty sample are skipped; the rest are reduced with `post` and
/// appended, tagged with their test id, to the list of their series key.
pub fn merge_groups<T, E, P>(corpus: &Corpus, extract: E, post: P) -> MergedSeries<T>
where
    E: Fn(&[RecordBatch]) -> Vec<f64>,
    P: Fn(&[f64]) -> T,
{
    let mut merged: MergedSeries<T> = IndexMap::new();
    for (key, batches) in corpus {
        let sample = extract(batches.as_slice());
        if sample.is_empty() {
            continue;
        }
        merged
            .entry(key.series_key())
            .or_default()
            .push((key.test, post(sample.as_slice())));
    }
    merged
}

/// Mean RTT per `(series, test)`
pub fn rtt_means(corpus: &Corpus) -> MergedSeries<f64> {
    merge_groups(corpus, get_rtt, mean)
}

/// Full descriptive statistics per `(series, test)`
pub fn rtt_summaries(corpus: &Corpus) -> MergedSeries<SeriesStats> {
    merge_groups(corpus, get_rtt, SeriesStats::from_values)
}

/// Sparse test-indexed view of one merged series
pub fn by_test<T: Clone>(entries: &[(TestId, T)]) -> BTreeMap<TestId, T> {
    entries.iter().cloned().collect()
}
