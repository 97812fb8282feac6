//! PNG bar chart rendering with plotters
//!
//! Each public renderer first builds a [`ChartPlan`] (pure data: bars, axis
//! ranges, ticks, legend entries) and then draws it onto a bitmap.

use super::layout::{
    difference_series, layout_bars, nice_ticks, stepped_ticks, tests_present, x_extent, y_extent,
    Bar, ClusterLayout, ProtocolSeries, DEFAULT_BAR_WIDTH,
};
use crate::error::{AppError, Result};
use crate::models::{Config, Protocol};
use plotters::prelude::*;
use plotters::style::text_anchor::{HPos, Pos, VPos};
use std::path::Path;

const ORANGE: RGBColor = RGBColor(255, 165, 0);
const DARK_GREEN: RGBColor = RGBColor(0, 128, 0);
const GRID: RGBColor = RGBColor(220, 220, 220);

const FONT: &str = "sans-serif";
const LEGEND_WIDTH: u32 = 160;
const LEGEND_ROW: i32 = 28;
const Y_TICK_TARGET: usize = 8;

/// Pixel geometry shared by every chart of a run
#[derive(Debug, Clone, PartialEq)]
pub struct ChartStyle {
    pub size: (u32, u32),
    pub bar_width: f64,
}

impl ChartStyle {
    pub fn from_config(config: &Config) -> Self {
        Self {
            size: (config.chart_width, config.chart_height),
            bar_width: DEFAULT_BAR_WIDTH,
        }
    }
}

impl Default for ChartStyle {
    fn default() -> Self {
        let (width, height) = crate::defaults::DEFAULT_CHART_SIZE;
        Self { size: (width, height), bar_width: DEFAULT_BAR_WIDTH }
    }
}

/// Legend entry and fill color of one series
#[derive(Debug, Clone, PartialEq)]
pub struct SeriesStyle {
    pub label: String,
    pub color: RGBColor,
}

impl SeriesStyle {
    pub fn new(label: impl Into<String>, color: RGBColor) -> Self {
        Self { label: label.into(), color }
    }

    /// Fixed color per charted protocol
    pub fn for_protocol(protocol: &Protocol) -> Self {
        let color = match protocol {
            Protocol::Udp => BLUE,
            Protocol::DohGet => ORANGE,
            Protocol::DohPost => DARK_GREEN,
            Protocol::Other(_) => BLACK,
        };
        Self::new(protocol.display_name(), color)
    }
}

/// Everything needed to draw one chart
#[derive(Debug, Clone)]
pub struct ChartPlan {
    pub layout: ClusterLayout,
    pub series: Vec<SeriesStyle>,
    pub bars: Vec<Bar>,
    pub x_range: (f64, f64),
    pub y_range: (f64, f64),
    /// Cluster centres of the tests that have bars
    pub x_ticks: Vec<f64>,
    pub y_ticks: Vec<f64>,
    pub x_label: String,
    pub y_label: String,
    pub zero_line: bool,
    pub value_labels: bool,
    pub legend: bool,
}

impl ChartPlan {
    fn build(
        layout: ClusterLayout,
        series: Vec<(&ProtocolSeries, SeriesStyle)>,
        x_label: &str,
        y_label: &str,
    ) -> Self {
        let values: Vec<&ProtocolSeries> = series.iter().map(|(values, _)| *values).collect();
        let bars = layout_bars(&layout, &values);
        let x_ticks = tests_present(&bars)
            .into_iter()
            .map(|test| layout.cluster_center(test))
            .collect();
        let x_range = x_extent(&layout, &bars);
        let y_range = y_extent(&bars);
        let y_ticks = nice_ticks(y_range.0, y_range.1, Y_TICK_TARGET);

        Self {
            layout,
            series: series.into_iter().map(|(_, style)| style).collect(),
            bars,
            x_range,
            y_range,
            x_ticks,
            y_ticks,
            x_label: x_label.to_string(),
            y_label: y_label.to_string(),
            zero_line: false,
            value_labels: false,
            legend: true,
        }
    }

    /// UDP, DoH GET and DoH POST means side by side
    pub fn three_bar(
        udp: &ProtocolSeries,
        get: &ProtocolSeries,
        post: &ProtocolSeries,
        style: &ChartStyle,
        x_label: &str,
        y_label: &str,
    ) -> Self {
        Self::build(
            ClusterLayout::three_bar(style.bar_width),
            vec![
                (udp, SeriesStyle::for_protocol(&Protocol::Udp)),
                (get, SeriesStyle::for_protocol(&Protocol::DohGet)),
                (post, SeriesStyle::for_protocol(&Protocol::DohPost)),
            ],
            x_label,
            y_label,
        )
    }

    /// DoH GET and DoH POST relative to UDP, with a dashed zero line
    pub fn difference(
        udp: &ProtocolSeries,
        get: &ProtocolSeries,
        post: &ProtocolSeries,
        style: &ChartStyle,
        x_label: &str,
        y_label: &str,
    ) -> Self {
        let get_delta = difference_series(udp, get);
        let post_delta = difference_series(udp, post);
        let mut plan = Self::build(
            ClusterLayout::difference(style.bar_width),
            vec![
                (&get_delta, SeriesStyle::for_protocol(&Protocol::DohGet)),
                (&post_delta, SeriesStyle::for_protocol(&Protocol::DohPost)),
            ],
            x_label,
            y_label,
        );
        plan.zero_line = true;
        plan
    }

    /// One series with value labels and fixed-step Y ticks
    pub fn single(
        values: &ProtocolSeries,
        series: SeriesStyle,
        step: f64,
        style: &ChartStyle,
        x_label: &str,
        y_label: &str,
    ) -> Self {
        let mut plan = Self::build(
            ClusterLayout::single(style.bar_width),
            vec![(values, series)],
            x_label,
            y_label,
        );
        let max_value = plan.bars.iter().map(|bar| bar.value).fold(0.0, f64::max);
        plan.y_ticks = stepped_ticks(max_value, step);
        let top_tick = plan.y_ticks.last().copied().unwrap_or(0.0);
        plan.y_range = (plan.y_range.0, plan.y_range.1.max(top_tick));
        plan.value_labels = true;
        plan.legend = false;
        plan
    }

    /// Spacing of the Y ticks, used to pick label precision
    fn y_tick_step(&self) -> f64 {
        match self.y_ticks.as_slice() {
            [first, second, ..] => second - first,
            _ => 1.0,
        }
    }
}

/// Draw the combined RTT chart
pub fn three_bar_plot(
    udp: &ProtocolSeries,
    get: &ProtocolSeries,
    post: &ProtocolSeries,
    path: &Path,
    x_label: &str,
    y_label: &str,
    style: &ChartStyle,
) -> Result<usize> {
    let plan = ChartPlan::three_bar(udp, get, post, style, x_label, y_label);
    draw_chart(&plan, path, style)
}

/// Draw the GET/POST minus UDP chart
pub fn difference_bar_plot(
    udp: &ProtocolSeries,
    get: &ProtocolSeries,
    post: &ProtocolSeries,
    path: &Path,
    x_label: &str,
    y_label: &str,
    style: &ChartStyle,
) -> Result<usize> {
    let plan = ChartPlan::difference(udp, get, post, style, x_label, y_label);
    draw_chart(&plan, path, style)
}

/// Draw a single series with its values printed above the bars
pub fn bar_plot(
    values: &ProtocolSeries,
    series: SeriesStyle,
    path: &Path,
    x_label: &str,
    y_label: &str,
    step: f64,
    style: &ChartStyle,
) -> Result<usize> {
    let plan = ChartPlan::single(values, series, step, style, x_label, y_label);
    draw_chart(&plan, path, style)
}

fn render_error<E: std::fmt::Display>(error: E) -> AppError {
    AppError::render(error.to_string())
}

/// Tick label with as many decimals as the tick spacing needs
pub fn format_tick(value: f64, step: f64) -> String {
    if step >= 1.0 || step <= 0.0 {
        format!("{:.0}", value)
    } else {
        let decimals = (-step.log10().floor()) as usize;
        format!("{:.*}", decimals, value)
    }
}

/// Dash segments `(start, end)` covering `lo..hi`
pub fn dash_segments(lo: f64, hi: f64, dash: f64) -> Vec<(f64, f64)> {
    if !(dash > 0.0) || !(hi > lo) {
        return Vec::new();
    }
    let mut segments = Vec::new();
    let mut start = lo;
    while start < hi {
        segments.push((start, (start + dash).min(hi)));
        start += dash * 2.0;
    }
    segments
}

/// Render `plan` to a PNG at `path`; returns the number of bars drawn
pub fn draw_chart(plan: &ChartPlan, path: &Path, style: &ChartStyle) -> Result<usize> {
    if plan.bars.is_empty() {
        return Err(AppError::missing_data(format!(
            "No values to plot for {}",
            path.display()
        )));
    }

    let root = BitMapBackend::new(path, style.size).into_drawing_area();
    root.fill(&WHITE).map_err(render_error)?;

    let legend_width = if plan.legend { LEGEND_WIDTH.min(style.size.0 / 3) } else { 0 };
    let (plot_area, legend_area) = root.split_horizontally((style.size.0 - legend_width) as i32);

    let (x_lo, x_hi) = plan.x_range;
    let (y_lo, y_hi) = plan.y_range;
    let mut chart = ChartBuilder::on(&plot_area)
        .margin(15)
        .x_label_area_size(50)
        .y_label_area_size(70)
        .build_cartesian_2d(x_lo..x_hi, y_lo..y_hi)
        .map_err(render_error)?;

    // Tick labels go at the plan's tick positions, not plotters' key points
    let no_label = |_: &f64| String::new();
    chart
        .configure_mesh()
        .disable_mesh()
        .set_all_tick_mark_size(0)
        .x_labels(2)
        .y_labels(2)
        .x_label_formatter(&no_label)
        .y_label_formatter(&no_label)
        .x_desc(plan.x_label.as_str())
        .y_desc(plan.y_label.as_str())
        .label_style((FONT, 14))
        .axis_desc_style((FONT, 18))
        .draw()
        .map_err(render_error)?;

    chart
        .draw_series(plan.y_ticks.iter().map(|&y| {
            PathElement::new(vec![(x_lo, y), (x_hi, y)], GRID.stroke_width(1))
        }))
        .map_err(render_error)?;

    let y_step = plan.y_tick_step();
    let y_label_style = TextStyle::from((FONT, 14).into_font()).pos(Pos::new(HPos::Right, VPos::Center));
    for &y in &plan.y_ticks {
        let (px, py) = chart.backend_coord(&(x_lo, y));
        root.draw(&Text::new(format_tick(y, y_step), (px - 6, py), y_label_style.clone()))
            .map_err(render_error)?;
    }

    let x_label_style = TextStyle::from((FONT, 14).into_font()).pos(Pos::new(HPos::Center, VPos::Top));
    for &x in &plan.x_ticks {
        let (px, py) = chart.backend_coord(&(x, y_lo));
        let label = format!("Test {}", plan.layout.test_number_at(x));
        root.draw(&Text::new(label, (px, py + 6), x_label_style.clone()))
            .map_err(render_error)?;
    }

    chart
        .draw_series(plan.bars.iter().map(|bar| {
            let color = plan.series[bar.series].color;
            Rectangle::new([(bar.left, 0.0), (bar.right, bar.value)], color.filled())
        }))
        .map_err(render_error)?;

    if plan.zero_line {
        let dash = plan.layout.bar_width / 2.0;
        chart
            .draw_series(dash_segments(x_lo, x_hi, dash).into_iter().map(|(start, end)| {
                PathElement::new(vec![(start, 0.0), (end, 0.0)], BLACK.stroke_width(1))
            }))
            .map_err(render_error)?;
    }

    if plan.value_labels {
        let offset = (y_hi - y_lo) * 0.01;
        let label_style =
            TextStyle::from((FONT, 13).into_font()).pos(Pos::new(HPos::Center, VPos::Bottom));
        chart
            .draw_series(plan.bars.iter().map(|bar| {
                Text::new(
                    format!("{:.2}", bar.value),
                    (bar.center, bar.value + offset),
                    label_style.clone(),
                )
            }))
            .map_err(render_error)?;
    }

    if legend_width > 0 {
        let (_, height) = legend_area.dim_in_pixel();
        let top = height as i32 / 2 - LEGEND_ROW * plan.series.len() as i32 / 2;
        for (index, series) in plan.series.iter().enumerate() {
            let y = top + LEGEND_ROW * index as i32;
            legend_area
                .draw(&Rectangle::new([(10, y), (30, y + 16)], series.color.filled()))
                .map_err(render_error)?;
            legend_area
                .draw(&Text::new(series.label.as_str(), (38, y), (FONT, 16).into_font()))
                .map_err(render_error)?;
        }
    }

    root.present().map_err(render_error)?;
    println!("Saved {}", path.display());
    Ok(plan.bars.len())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::TestId;
    use std::fs;

    fn series(values: &[(u8, f64)]) -> ProtocolSeries {
        values.iter().map(|(n, v)| (TestId::new(*n).unwrap(), *v)).collect()
    }

    #[test]
    fn test_three_bar_plan() {
        let udp = series(&[(1, 10.0), (2, 11.0)]);
        let get = series(&[(1, 20.0), (2, 21.0)]);
        let post = series(&[(1, 30.0)]);

        let plan = ChartPlan::three_bar(&udp, &get, &post, &ChartStyle::default(), "Tests", "RTT");
        assert_eq!(plan.bars.len(), 5);
        assert_eq!(plan.x_ticks, vec![20.0, 40.0]);
        assert_eq!(plan.series.iter().map(|s| s.label.as_str()).collect::<Vec<_>>(), vec!["UDP", "HTTPS GET", "HTTPS POST"]);
        assert_eq!(plan.series[0].color, BLUE);
        assert!(plan.legend && !plan.zero_line && !plan.value_labels);
        assert!(plan.y_range.1 >= 30.0);
    }

    #[test]
    fn test_difference_plan_uses_deltas() {
        let udp = series(&[(1, 10.0), (2, 20.0)]);
        let get = series(&[(1, 15.0), (2, 18.0)]);
        let post = series(&[(1, 12.0)]);

        let plan = ChartPlan::difference(&udp, &get, &post, &ChartStyle::default(), "Tests", "Delta");
        let values: Vec<f64> = plan.bars.iter().map(|b| b.value).collect();
        assert_eq!(values, vec![5.0, -2.0, 2.0]);
        assert_eq!(plan.bars[0].center, 20.0);
        assert_eq!(plan.bars[2].center, 25.0);
        assert!(plan.zero_line);
        assert!(plan.y_range.0 < 0.0);
        assert_eq!(plan.series.len(), 2);
    }

    #[test]
    fn test_single_plan_ticks_and_labels() {
        let values = series(&[(1, 12.5), (3, 33.0)]);
        let plan = ChartPlan::single(
            &values,
            SeriesStyle::for_protocol(&Protocol::Udp),
            10.0,
            &ChartStyle::default(),
            "Tests",
            "RTT",
        );
        assert_eq!(plan.y_ticks, vec![0.0, 10.0, 20.0, 30.0, 40.0]);
        assert_eq!(plan.x_ticks, vec![10.0, 30.0]);
        assert!(plan.y_range.1 >= 40.0);
        assert!(plan.value_labels && !plan.legend);
        assert_eq!(plan.y_tick_step(), 10.0);
    }

    #[test]
    fn test_empty_plan_is_rejected_before_drawing() {
        let empty = ProtocolSeries::new();
        let plan = ChartPlan::three_bar(&empty, &empty, &empty, &ChartStyle::default(), "x", "y");
        let err = draw_chart(&plan, Path::new("unused.png"), &ChartStyle::default()).unwrap_err();
        assert!(matches!(err, AppError::MissingData(_)));
    }

    #[test]
    fn test_renderers_write_png_files() {
        let dir = tempfile::TempDir::new().unwrap();
        let udp = series(&[(1, 10.0), (2, 11.0)]);
        let get = series(&[(1, 20.0), (2, 21.0)]);
        let post = series(&[(1, 30.0), (2, 8.0)]);
        let style = ChartStyle::default();

        let combined = dir.path().join("combined.png");
        assert_eq!(three_bar_plot(&udp, &get, &post, &combined, "Tests", "RTT", &style).unwrap(), 6);
        assert!(combined.exists());

        let difference = dir.path().join("difference.png");
        assert_eq!(difference_bar_plot(&udp, &get, &post, &difference, "Tests", "Delta", &style).unwrap(), 4);
        assert!(difference.exists());

        let single = dir.path().join("single.png");
        let written = bar_plot(
            &udp,
            SeriesStyle::for_protocol(&Protocol::Udp),
            &single,
            "Tests",
            "RTT",
            10.0,
            &style,
        )
        .unwrap();
        assert_eq!(written, 2);
        assert!(fs::metadata(&single).unwrap().len() > 0);
    }

    #[test]
    fn test_format_tick() {
        assert_eq!(format_tick(20.0, 10.0), "20");
        assert_eq!(format_tick(0.5, 0.5), "0.5");
        assert_eq!(format_tick(0.25, 0.05), "0.25");
    }

    #[test]
    fn test_dash_segments() {
        assert_eq!(dash_segments(0.0, 10.0, 2.0), vec![(0.0, 2.0), (4.0, 6.0), (8.0, 10.0)]);
        assert!(dash_segments(5.0, 5.0, 1.0).is_empty());
    }
}
