//! Chart rendering for the run's PNG outputs.

pub mod charts;

pub use charts::*;
