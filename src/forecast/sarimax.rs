//! `Forecaster` implementation backed by the SARIMAX model.

use crate::error::AppError;
use crate::fit::{FitOptions, SarimaxFit, fit_sarimax};
use crate::forecast::{FittedModel, Forecast, Forecaster};
use crate::math::two_sided_z;
use crate::models::{ArmaPolynomials, SarimaxOrder, forecast_mean};

#[derive(Debug, Clone)]
pub struct SarimaxForecaster {
    pub order: SarimaxOrder,
    pub options: FitOptions,
}

impl Default for SarimaxForecaster {
    fn default() -> Self {
        Self {
            order: SarimaxOrder::WEEKLY,
            options: FitOptions::default(),
        }
    }
}

/// A fitted SARIMAX model together with the sample it was fitted on.
#[derive(Debug, Clone)]
pub struct SarimaxModel {
    pub fit: SarimaxFit,
    response: Vec<f64>,
    exog: Vec<f64>,
}

impl Forecaster for SarimaxForecaster {
    type Model = SarimaxModel;

    fn fit(&self, response: &[f64], exog: &[f64]) -> Result<SarimaxModel, AppError> {
        let fit = fit_sarimax(self.order, response, exog, &self.options)?;
        log::info!(
            "Fitted SARIMAX{} on {} weeks: exog={:.4} ar={:?} ma={:?} sigma2={:.2} ({} iterations{})",
            self.order.label(),
            response.len(),
            fit.params.exog,
            fit.params.ar,
            fit.params.ma,
            fit.sigma2,
            fit.iterations,
            if fit.converged { "" } else { ", not converged" },
        );
        Ok(SarimaxModel {
            fit,
            response: response.to_vec(),
            exog: exog.to_vec(),
        })
    }
}

impl FittedModel for SarimaxModel {
    fn forecast(&self, horizon: usize, future_exog: &[f64], confidence: f64) -> Result<Forecast, AppError> {
        if future_exog.len() != horizon {
            return Err(AppError::model(format!(
                "Forecast horizon is {horizon} but {} future regressor values were given.",
                future_exog.len()
            )));
        }
        let z = two_sided_z(confidence).ok_or_else(|| {
            AppError::model(format!("Confidence level must be in (0, 1), got {confidence}."))
        })?;

        let polys = ArmaPolynomials::expand(&self.fit.order, &self.fit.params);
        let mean = forecast_mean(
            &polys,
            self.fit.params.exog,
            &self.response,
            &self.exog,
            &self.fit.innovations,
            future_exog,
        );
        if mean.iter().any(|v| !v.is_finite()) {
            return Err(AppError::model("Non-finite value in point forecast."));
        }

        let psi = polys.psi_weights(horizon);
        let mut lower = Vec::with_capacity(horizon);
        let mut upper = Vec::with_capacity(horizon);
        let mut cumulative = 0.0;
        for (m, p) in mean.iter().zip(&psi) {
            cumulative += p * p;
            let half_width = z * (self.fit.sigma2 * cumulative).sqrt();
            lower.push(m - half_width);
            upper.push(m + half_width);
        }

        Ok(Forecast { mean, lower, upper })
    }
}
