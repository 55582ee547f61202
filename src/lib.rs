//! `tripcast` library crate.
//!
//! The binary (`tripcast`) is a thin wrapper around this library so that:
//!
//! - core logic is testable without spawning processes
//! - the travel, cost and forecasting stages can be driven individually
//! - code stays easy to navigate as the project grows

pub mod app;
pub mod cli;
pub mod data;
pub mod domain;
pub mod error;
pub mod fit;
pub mod forecast;
pub mod io;
pub mod math;
pub mod models;
pub mod plot;
pub mod report;
pub mod series;
pub mod travel;
