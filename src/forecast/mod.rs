//! Forecasting: the pluggable forecaster capability and the train/test workflow.
//!
//! A forecaster is anything that can be fit on a response series with one
//! exogenous regressor and then produce point forecasts plus interval bounds
//! for future regressor values:
//!
//! ```text
//! fit(train_cost, train_km) -> model
//! model.forecast(horizon, future_km, confidence) -> (mean, lower, upper)
//! ```
//!
//! `SarimaxForecaster` is the implementation used by the pipeline; tests plug
//! in simpler ones.

pub mod sarimax;
pub mod split;

pub use sarimax::*;
pub use split::*;

use crate::error::AppError;

/// Point forecast with interval bounds, one entry per horizon step.
#[derive(Debug, Clone, PartialEq)]
pub struct Forecast {
    pub mean: Vec<f64>,
    pub lower: Vec<f64>,
    pub upper: Vec<f64>,
}

impl Forecast {
    pub fn len(&self) -> usize {
        self.mean.len()
    }

    pub fn is_empty(&self) -> bool {
        self.mean.is_empty()
    }
}

/// Fits a model on a response series and one exogenous regressor.
pub trait Forecaster {
    type Model: FittedModel;

    fn fit(&self, response: &[f64], exog: &[f64]) -> Result<Self::Model, AppError>;
}

/// A fitted model that can forecast past the end of its training sample.
pub trait FittedModel {
    /// Forecast `horizon` steps. `future_exog` must have exactly `horizon` values.
    fn forecast(&self, horizon: usize, future_exog: &[f64], confidence: f64) -> Result<Forecast, AppError>;
}
