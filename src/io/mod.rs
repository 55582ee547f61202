//! Input/output helpers.
//!
//! - CSV ingest + validation (`ingest`)
//! - CSV exports for forecasts and legs (`export`)
//! - model summary JSON (`summary`)

pub mod export;
pub mod ingest;
pub mod summary;

pub use export::*;
pub use ingest::*;
pub use summary::*;
