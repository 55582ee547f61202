//! Mathematical utilities: great-circle distance, least squares, normal quantiles.

pub mod geo;
pub mod normal;
pub mod ols;

pub use geo::*;
pub use normal::*;
pub use ols::*;
