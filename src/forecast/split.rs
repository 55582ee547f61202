//! Train/test split, future regressor construction, and the forecast run.
//!
//! - the last 8 weeks are held out (last 2 when the grid has 10 or fewer weeks)
//! - the model is fit on the remaining weeks
//! - the horizon covers the held-out weeks plus 12 weeks past the data, with
//!   km set to `0.0` for the unknown future schedule

use chrono::NaiveDate;

use crate::domain::{AlignedSeries, ForecastPoint};
use crate::error::AppError;
use crate::forecast::{FittedModel, Forecaster};
use crate::series::weeks_from;

/// Weeks forecast beyond the last observed week.
pub const FUTURE_WEEKS: usize = 12;

/// Number of trailing points held out for testing.
pub fn holdout_len(n: usize) -> usize {
    let k = if n > 10 { 8 } else { 2 };
    k.min(n)
}

/// The aligned grid cut into a training head and a test tail.
#[derive(Debug, Clone, PartialEq)]
pub struct TrainTestSplit {
    /// Index of the first test week on the aligned grid.
    pub split: usize,
    pub train_cost: Vec<f64>,
    pub train_km: Vec<f64>,
    pub test_cost: Vec<f64>,
    pub test_km: Vec<f64>,
    pub test_weeks: Vec<NaiveDate>,
}

impl TrainTestSplit {
    pub fn new(aligned: &AlignedSeries) -> Self {
        let split = aligned.len() - holdout_len(aligned.len());
        Self {
            split,
            train_cost: aligned.cost[..split].to_vec(),
            train_km: aligned.km[..split].to_vec(),
            test_cost: aligned.cost[split..].to_vec(),
            test_km: aligned.km[split..].to_vec(),
            test_weeks: aligned.weeks[split..].to_vec(),
        }
    }

    /// Forecast horizon: the test window plus [`FUTURE_WEEKS`].
    pub fn horizon(&self) -> usize {
        self.test_km.len() + FUTURE_WEEKS
    }

    /// Regressor values over the horizon: actual test km, then zeros.
    pub fn future_exog(&self) -> Vec<f64> {
        let mut exog = self.test_km.clone();
        exog.extend(std::iter::repeat_n(0.0, FUTURE_WEEKS));
        exog
    }
}

/// Everything produced by one fit + forecast.
#[derive(Debug, Clone)]
pub struct ForecastRun<M> {
    pub model: M,
    pub split: TrainTestSplit,
    pub future_exog: Vec<f64>,
    pub points: Vec<ForecastPoint>,
}

/// Split the grid, fit on the training head, forecast the horizon.
pub fn run_forecast<F: Forecaster>(
    aligned: &AlignedSeries,
    forecaster: &F,
    confidence: f64,
) -> Result<ForecastRun<F::Model>, AppError> {
    if aligned.is_empty() {
        return Err(AppError::no_data("Cannot forecast an empty weekly series."));
    }

    let split = TrainTestSplit::new(aligned);
    log::info!(
        "Train/test split: {} training weeks, {} test weeks, horizon {}",
        split.train_cost.len(),
        split.test_cost.len(),
        split.horizon()
    );

    let model = forecaster.fit(&split.train_cost, &split.train_km)?;

    let horizon = split.horizon();
    let future_exog = split.future_exog();
    let forecast = model.forecast(horizon, &future_exog, confidence)?;
    if forecast.len() != horizon {
        return Err(AppError::model(format!(
            "Forecaster returned {} steps for a horizon of {horizon}.",
            forecast.len()
        )));
    }

    let weeks = weeks_from(aligned.weeks[split.split], horizon);
    let points = weeks
        .into_iter()
        .enumerate()
        .map(|(i, week)| ForecastPoint {
            week,
            predicted_cost: forecast.mean[i],
            lower: forecast.lower[i],
            upper: forecast.upper[i],
        })
        .collect();

    Ok(ForecastRun {
        model,
        split,
        future_exog,
        points,
    })
}
