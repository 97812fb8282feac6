//! Bar geometry for the comparison charts
//!
//! Positions are derived from test numbers, never from a value's index in a
//! list: test `n` is centred at `n * width * spacing`, and each series of a
//! cluster is shifted by a whole number of bar widths. A test with no value in
//! a series leaves a gap.

use crate::models::TestId;
use crate::utils::finite_range;
use std::collections::BTreeMap;

/// Bar width in chart units
pub const DEFAULT_BAR_WIDTH: f64 = 5.0;

/// Sparse per-test values of one series
pub type ProtocolSeries = BTreeMap<TestId, f64>;

/// Horizontal arrangement of one chart kind
#[derive(Debug, Clone, PartialEq)]
pub struct ClusterLayout {
    /// Distance between neighbouring test centres, in bar widths
    pub spacing: f64,
    /// Offset of each series from the test centre, in bar widths
    pub offsets: Vec<f64>,
    pub bar_width: f64,
}

impl ClusterLayout {
    /// UDP, GET and POST side by side
    pub fn three_bar(bar_width: f64) -> Self {
        Self { spacing: 4.0, offsets: vec![-1.0, 0.0, 1.0], bar_width }
    }

    /// GET and POST deltas, starting at the test centre
    pub fn difference(bar_width: f64) -> Self {
        Self { spacing: 4.0, offsets: vec![0.0, 1.0], bar_width }
    }

    /// A single series
    pub fn single(bar_width: f64) -> Self {
        Self { spacing: 2.0, offsets: vec![0.0], bar_width }
    }

    /// X coordinate of the centre of test `test`'s cluster
    pub fn cluster_center(&self, test: TestId) -> f64 {
        test.number() as f64 * self.bar_width * self.spacing
    }

    /// Test number whose cluster centre is nearest to `x`
    pub fn test_number_at(&self, x: f64) -> i64 {
        (x / (self.bar_width * self.spacing)).round() as i64
    }
}

/// One bar to draw
#[derive(Debug, Clone, PartialEq)]
pub struct Bar {
    /// Index of the series the bar belongs to
    pub series: usize,
    pub test: TestId,
    pub center: f64,
    pub left: f64,
    pub right: f64,
    pub value: f64,
}

/// Lay out every value of every series; bars come out grouped by series,
/// each series in ascending test order
pub fn layout_bars(layout: &ClusterLayout, series: &[&ProtocolSeries]) -> Vec<Bar> {
    series
        .iter()
        .zip(layout.offsets.iter())
        .enumerate()
        .flat_map(|(index, (values, offset))| {
            values.iter().map(move |(test, value)| {
                let center = layout.cluster_center(*test) + offset * layout.bar_width;
                Bar {
                    series: index,
                    test: *test,
                    center,
                    left: center - layout.bar_width / 2.0,
                    right: center + layout.bar_width / 2.0,
                    value: *value,
                }
            })
        })
        .collect()
}

/// Tests that have at least one bar, ascending
pub fn tests_present(bars: &[Bar]) -> Vec<TestId> {
    let mut tests: Vec<TestId> = bars.iter().map(|bar| bar.test).collect();
    tests.sort();
    tests.dedup();
    tests
}

/// Horizontal extent covering all bars plus one bar width of padding
pub fn x_extent(layout: &ClusterLayout, bars: &[Bar]) -> (f64, f64) {
    let lo = bars.iter().map(|b| b.left).fold(f64::INFINITY, f64::min);
    let hi = bars.iter().map(|b| b.right).fold(f64::NEG_INFINITY, f64::max);
    if lo.is_finite() && hi.is_finite() {
        (lo - layout.bar_width, hi + layout.bar_width)
    } else {
        (0.0, 1.0)
    }
}

/// Vertical extent including zero, with 10% headroom away from zero
pub fn y_extent(bars: &[Bar]) -> (f64, f64) {
    let (lo, hi) = finite_range(bars.iter().map(|b| b.value)).unwrap_or((0.0, 0.0));
    let lo = lo.min(0.0) * 1.1;
    let hi = hi.max(0.0) * 1.1;
    if hi - lo <= f64::EPSILON {
        (lo, lo + 1.0)
    } else {
        (lo, hi)
    }
}

/// Per-test difference `other - baseline` for tests present in both
pub fn difference_series(baseline: &ProtocolSeries, other: &ProtocolSeries) -> ProtocolSeries {
    other
        .iter()
        .filter_map(|(test, value)| baseline.get(test).map(|base| (*test, value - base)))
        .collect()
}

/// Y ticks `0, step, 2*step, ...` below `max + 2*step` rounded to tens
///
/// Halfway values round to the even ten, so 25 becomes 20.
pub fn stepped_ticks(max_value: f64, step: f64) -> Vec<f64> {
    if !(step > 0.0) || !max_value.is_finite() {
        return vec![0.0];
    }
    let upper = ((max_value + step * 2.0) / 10.0).round_ties_even() * 10.0;
    let mut ticks = Vec::new();
    let mut tick = 0.0;
    while tick < upper {
        ticks.push(tick);
        tick += step;
    }
    if ticks.is_empty() {
        ticks.push(0.0);
    }
    ticks
}

/// About `target` evenly spaced round ticks spanning `lo..=hi`
pub fn nice_ticks(lo: f64, hi: f64, target: usize) -> Vec<f64> {
    let span = hi - lo;
    if !(span > 0.0) || target == 0 {
        return vec![lo];
    }
    let raw = span / target as f64;
    let magnitude = 10f64.powf(raw.log10().floor());
    let step = [1.0, 2.0, 5.0, 10.0]
        .iter()
        .map(|m| m * magnitude)
        .find(|candidate| *candidate >= raw)
        .unwrap_or(10.0 * magnitude);

    let first = (lo / step).ceil() as i64;
    let last = (hi / step).floor() as i64;
    (first..=last).map(|i| i as f64 * step).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn series(values: &[(u8, f64)]) -> ProtocolSeries {
        values.iter().map(|(n, v)| (TestId::new(*n).unwrap(), *v)).collect()
    }

    #[test]
    fn test_three_bar_positions() {
        let layout = ClusterLayout::three_bar(5.0);
        let udp = series(&[(1, 10.0), (2, 12.0)]);
        let get = series(&[(1, 20.0), (2, 22.0)]);
        let post = series(&[(1, 30.0), (2, 32.0)]);

        let bars = layout_bars(&layout, &[&udp, &get, &post]);
        let centers: Vec<f64> = bars.iter().map(|b| b.center).collect();
        assert_eq!(centers, vec![15.0, 35.0, 20.0, 40.0, 25.0, 45.0]);
        assert_eq!(bars[0].left, 12.5);
        assert_eq!(bars[0].right, 17.5);
    }

    #[test]
    fn test_one_bar_per_value_strictly_increasing() {
        let layout = ClusterLayout::single(5.0);
        let values = series(&[(1, 3.0), (2, 4.0), (3, 5.0), (5, 1.0), (8, 9.0)]);

        let bars = layout_bars(&layout, &[&values]);
        assert_eq!(bars.len(), values.len());
        assert!(bars.windows(2).all(|pair| pair[0].center < pair[1].center));
        assert_eq!(bars.iter().map(|b| b.value).collect::<Vec<_>>(), vec![3.0, 4.0, 5.0, 1.0, 9.0]);
    }

    #[test]
    fn test_missing_test_leaves_gap() {
        let layout = ClusterLayout::single(5.0);
        let values = series(&[(1, 3.0), (3, 5.0)]);
        let bars = layout_bars(&layout, &[&values]);
        assert_eq!(bars[0].center, 10.0);
        assert_eq!(bars[1].center, 30.0);
        assert_eq!(tests_present(&bars).len(), 2);
    }

    #[test]
    fn test_difference_layout_and_values() {
        let udp = series(&[(1, 10.0), (2, 12.0)]);
        let get = series(&[(1, 15.0), (2, 10.0), (3, 40.0)]);

        let delta = difference_series(&udp, &get);
        assert_eq!(delta, series(&[(1, 5.0), (2, -2.0)]));

        let layout = ClusterLayout::difference(5.0);
        let bars = layout_bars(&layout, &[&delta, &delta]);
        assert_eq!(bars[0].center, 20.0);
        assert_eq!(bars[2].center, 25.0);

        let (lo, hi) = y_extent(&bars);
        assert!(lo < 0.0 && hi > 5.0);
    }

    #[test]
    fn test_extents() {
        let layout = ClusterLayout::single(5.0);
        assert_eq!(x_extent(&layout, &[]), (0.0, 1.0));
        assert_eq!(y_extent(&[]), (0.0, 1.0));

        let bars = layout_bars(&layout, &[&series(&[(2, 8.0)])]);
        assert_eq!(x_extent(&layout, &bars), (12.5, 27.5));
        let (lo, hi) = y_extent(&bars);
        assert_eq!(lo, 0.0);
        assert!((hi - 8.8).abs() < 1e-9);
    }

    #[test]
    fn test_test_number_at_center() {
        let layout = ClusterLayout::three_bar(5.0);
        let center = layout.cluster_center(TestId::new(6).unwrap());
        assert_eq!(layout.test_number_at(center), 6);
    }

    #[test]
    fn test_stepped_ticks() {
        assert_eq!(stepped_ticks(33.0, 10.0), vec![0.0, 10.0, 20.0, 30.0, 40.0]);
        assert_eq!(stepped_ticks(0.5, 10.0), vec![0.0, 10.0]);
        assert_eq!(stepped_ticks(10.0, 0.0), vec![0.0]);
        assert_eq!(stepped_ticks(5.0, 10.0), vec![0.0, 10.0]);
        assert_eq!(stepped_ticks(15.0, 10.0), vec![0.0, 10.0, 20.0, 30.0]);
    }

    #[test]
    fn test_nice_ticks() {
        assert_eq!(nice_ticks(0.0, 10.0, 5), vec![0.0, 2.0, 4.0, 6.0, 8.0, 10.0]);
        let ticks = nice_ticks(-3.0, 12.0, 6);
        assert!(ticks.contains(&0.0));
        assert!(ticks.windows(2).all(|w| w[0] < w[1]));
        assert_eq!(nice_ticks(1.0, 1.0, 5), vec![1.0]);
    }
}
