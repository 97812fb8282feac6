//! Chart rendering for aggregated RTT series
//!
//! [`rtt_mean_plot`] turns the merged means into the combined and difference
//! charts, one pair per resolver (or a single pair when resolvers are not
//! tracked), plus optional single-series charts.

pub mod layout;
pub mod render;

pub use layout::{layout_bars, Bar, ClusterLayout, ProtocolSeries, DEFAULT_BAR_WIDTH};
pub use render::{
    bar_plot, difference_bar_plot, draw_chart, three_bar_plot, ChartPlan, ChartStyle, SeriesStyle,
};

use crate::{
    error::{AppError, Result},
    logging::Logger,
    models::{Config, Protocol, SeriesKey},
    stats::{by_test, MergedSeries},
    types::{ChartKind, ChartOutput},
};
use std::fs;
use std::path::{Path, PathBuf};

pub const RTT_MEAN_Y_LABEL: &str = "Round-trip time in milliseconds";
pub const RTT_DIFFERENCE_Y_LABEL: &str = "Round-trip time difference (UDP) in milliseconds";

/// The three charted series of one resolver
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ComparisonSet {
    pub resolver: Option<String>,
    pub udp: ProtocolSeries,
    pub get: ProtocolSeries,
    pub post: ProtocolSeries,
}

impl ComparisonSet {
    fn slot_mut(&mut self, protocol: &Protocol) -> Option<&mut ProtocolSeries> {
        match protocol {
            Protocol::Udp => Some(&mut self.udp),
            Protocol::DohGet => Some(&mut self.get),
            Protocol::DohPost => Some(&mut self.post),
            Protocol::Other(_) => None,
        }
    }

    fn slot(&self, protocol: &Protocol) -> Option<&ProtocolSeries> {
        match protocol {
            Protocol::Udp => Some(&self.udp),
            Protocol::DohGet => Some(&self.get),
            Protocol::DohPost => Some(&self.post),
            Protocol::Other(_) => None,
        }
    }
}

/// Distinct resolvers of `means` in first-seen order
pub fn resolvers_in(means: &MergedSeries<f64>) -> Vec<Option<String>> {
    let mut resolvers: Vec<Option<String>> = Vec::new();
    for key in means.keys() {
        if !resolvers.contains(&key.resolver) {
            resolvers.push(key.resolver.clone());
        }
    }
    resolvers
}

/// Collect the UDP, DoH GET and DoH POST series for every resolver
///
/// A charted protocol with no values is a [`AppError::MissingData`] unless
/// `allow_partial` is set, in which case it stays empty and its bars are gaps.
pub fn comparison_sets(
    means: &MergedSeries<f64>,
    allow_partial: bool,
    logger: &Logger,
) -> Result<Vec<ComparisonSet>> {
    if means.is_empty() {
        return Err(AppError::missing_data("No RTT values found in the selected result files"));
    }

    let mut sets = Vec::new();
    for resolver in resolvers_in(means) {
        let mut set = ComparisonSet { resolver: resolver.clone(), ..Default::default() };
        for protocol in Protocol::charted() {
            let key = SeriesKey { protocol: protocol.clone(), resolver: resolver.clone() };
            match means.get(&key) {
                Some(entries) => {
                    if let Some(slot) = set.slot_mut(&protocol) {
                        *slot = by_test(entries);
                    }
                }
                None if allow_partial => {
                    logger.warn("Protocol has no data, charting gaps")
                        .field("series", key.to_string())
                        .log();
                }
                None => {
                    let scope = match &resolver {
                        Some(resolver) => format!(" for resolver '{}'", resolver),
                        None => String::new(),
                    };
                    return Err(AppError::missing_data(format!(
                        "No {} results{} (series '{}')",
                        protocol.display_name(),
                        scope,
                        key
                    )));
                }
            }
        }
        sets.push(set);
    }
    Ok(sets)
}

/// Keep file names to a single portable path component
pub fn sanitize_component(value: &str) -> String {
    value
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | '_') { c } else { '_' })
        .collect()
}

/// `<subdir>[-<resolver>][-<protocol>]-<suffix>.png`
pub fn chart_file_name(
    subdir: &str,
    resolver: Option<&str>,
    protocol: Option<&Protocol>,
    kind: ChartKind,
) -> String {
    let mut parts = vec![sanitize_component(subdir)];
    if let Some(resolver) = resolver {
        parts.push(sanitize_component(resolver));
    }
    if let Some(protocol) = protocol {
        parts.push(sanitize_component(protocol.label()));
    }
    parts.push(kind.file_suffix().to_string());
    format!("{}.png", parts.join("-"))
}

fn record_chart(
    outputs: &mut Vec<ChartOutput>,
    result: Result<usize>,
    kind: ChartKind,
    path: &Path,
    allow_partial: bool,
    logger: &Logger,
) -> Result<()> {
    match result {
        Ok(bars) => {
            logger.info("Chart written")
                .field("kind", kind)
                .field("path", path.display().to_string())
                .field("bars", bars)
                .log();
            outputs.push(ChartOutput { kind, path: path.to_path_buf(), bars });
            Ok(())
        }
        Err(AppError::MissingData(_)) if allow_partial => {
            logger.warn("Skipping chart with nothing to draw")
                .field("kind", kind)
                .field("path", path.display().to_string())
                .log();
            Ok(())
        }
        Err(e) => Err(e),
    }
}

/// Render every chart for the merged RTT means into `config.output_dir`
pub fn rtt_mean_plot(
    means: &MergedSeries<f64>,
    config: &Config,
    logger: &Logger,
) -> Result<Vec<ChartOutput>> {
    let logger = logger.named("CHARTS");
    let sets = comparison_sets(means, config.allow_partial, &logger)?;

    fs::create_dir_all(&config.output_dir).map_err(|e| {
        AppError::io(format!(
            "Cannot create output directory {}: {}",
            config.output_dir.display(),
            e
        ))
    })?;

    let style = ChartStyle::from_config(config);
    let mut outputs = Vec::new();

    for set in &sets {
        let resolver = set.resolver.as_deref();
        let output_path = |protocol: Option<&Protocol>, kind: ChartKind| -> PathBuf {
            config
                .output_dir
                .join(chart_file_name(&config.subdir, resolver, protocol, kind))
        };

        let path = output_path(None, ChartKind::Combined);
        let result = three_bar_plot(
            &set.udp,
            &set.get,
            &set.post,
            &path,
            &config.x_label,
            RTT_MEAN_Y_LABEL,
            &style,
        );
        record_chart(&mut outputs, result, ChartKind::Combined, &path, config.allow_partial, &logger)?;

        let path = output_path(None, ChartKind::Difference);
        let result = difference_bar_plot(
            &set.udp,
            &set.get,
            &set.post,
            &path,
            &config.x_label,
            RTT_DIFFERENCE_Y_LABEL,
            &style,
        );
        record_chart(&mut outputs, result, ChartKind::Difference, &path, config.allow_partial, &logger)?;

        if config.per_protocol {
            for protocol in Protocol::charted() {
                let values = match set.slot(&protocol) {
                    Some(values) if !values.is_empty() => values,
                    _ => continue,
                };
                let path = output_path(Some(&protocol), ChartKind::Single);
                let result = bar_plot(
                    values,
                    SeriesStyle::for_protocol(&protocol),
                    &path,
                    &config.x_label,
                    RTT_MEAN_Y_LABEL,
                    config.bar_step,
                    &style,
                );
                record_chart(&mut outputs, result, ChartKind::Single, &path, config.allow_partial, &logger)?;
            }
        }
    }

    Ok(outputs)
}
