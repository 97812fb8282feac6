//! Small numeric helpers shared by the aggregator and the chart renderer

pub mod comparison;

pub use comparison::{finite_range, safe_float_cmp, sorted_values};
