//! Synthetic data generation.

pub mod cost;

pub use cost::*;
