//! Time series model definitions.
//!
//! Models are implemented as small, pure functions of their parameters so that
//! fitting and forecasting code can stay generic.

pub mod sarimax;

pub use sarimax::*;
