//! Domain types used throughout the pipeline.
//!
//! This module defines:
//!
//! - reference data (`City`, `CityTable`) and schedule rows (`Game`)
//! - derived travel data (`Leg`, `WeeklyKm`, `WeeklyCost`, `AlignedSeries`)
//! - forecast outputs (`ForecastPoint`) and the run configuration (`RunConfig`)

pub mod types;

pub use types::*;
