//! Weekly time series: bucketing legs by week and aligning series on a regular grid.

pub mod grid;
pub mod weekly;

pub use grid::*;
pub use weekly::*;
