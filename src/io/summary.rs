//! Model summary JSON.
//!
//! The summary is the portable record of a run's forecast model:
//! - model order + fitted coefficients
//! - fit diagnostics (SSE, innovation variance, iterations, convergence)
//! - run metadata (seed, confidence, split sizes, date range)

use std::fs::File;
use std::path::Path;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::AppError;
use crate::fit::SarimaxFit;
use crate::models::{SarimaxOrder, SarimaxParams};

pub const SUMMARY_JSON: &str = "forecast_model.json";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FitDiagnostics {
    pub sse: f64,
    pub sigma2: f64,
    pub n_obs: usize,
    pub iterations: usize,
    pub converged: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelSummary {
    pub tool: String,
    pub model: String,
    pub order: SarimaxOrder,
    pub params: SarimaxParams,
    pub diagnostics: FitDiagnostics,
    pub base_city: String,
    pub seed: u64,
    pub confidence: f64,
    pub first_week: NaiveDate,
    pub last_week: NaiveDate,
    pub train_weeks: usize,
    pub test_weeks: usize,
    pub horizon: usize,
}

impl ModelSummary {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        fit: &SarimaxFit,
        base_city: &str,
        seed: u64,
        confidence: f64,
        first_week: NaiveDate,
        last_week: NaiveDate,
        train_weeks: usize,
        test_weeks: usize,
        horizon: usize,
    ) -> Self {
        Self {
            tool: "tripcast".to_string(),
            model: format!("SARIMAX{}", fit.order.label()),
            order: fit.order,
            params: fit.params.clone(),
            diagnostics: FitDiagnostics {
                sse: fit.sse,
                sigma2: fit.sigma2,
                n_obs: fit.n_obs,
                iterations: fit.iterations,
                converged: fit.converged,
            },
            base_city: base_city.to_string(),
            seed,
            confidence,
            first_week,
            last_week,
            train_weeks,
            test_weeks,
            horizon,
        }
    }
}

/// Write the summary as pretty-printed JSON.
pub fn write_summary_json(path: &Path, summary: &ModelSummary) -> Result<(), AppError> {
    let file = File::create(path)
        .map_err(|e| AppError::output(format!("Failed to create summary JSON '{}': {e}", path.display())))?;

    serde_json::to_writer_pretty(file, summary)
        .map_err(|e| AppError::output(format!("Failed to write summary JSON: {e}")))?;

    Ok(())
}

/// Read a summary JSON back (used to inspect previous runs).
pub fn read_summary_json(path: &Path) -> Result<ModelSummary, AppError> {
    let file = File::open(path)
        .map_err(|e| AppError::input(format!("Failed to open summary JSON '{}': {e}", path.display())))?;
    serde_json::from_reader(file).map_err(|e| AppError::input(format!("Invalid summary JSON: {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fit() -> SarimaxFit {
        SarimaxFit {
            order: SarimaxOrder::WEEKLY,
            params: SarimaxParams {
                exog: 0.12,
                ar: vec![0.9],
                ma: vec![-0.3],
                seasonal_ar: vec![0.0],
                seasonal_ma: vec![0.0],
            },
            innovations: vec![0.0, 1.0],
            sse: 1.0,
            sigma2: 1.0,
            n_obs: 1,
            iterations: 4,
            converged: true,
        }
    }

    #[test]
    fn summary_json_is_readable() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(SUMMARY_JSON);
        let week = NaiveDate::from_ymd_opt(2023, 10, 2).unwrap();
        let summary = ModelSummary::new(&fit(), "Dallas", 0, 0.8, week, week, 19, 8, 20);

        write_summary_json(&path, &summary).unwrap();
        let back = read_summary_json(&path).unwrap();

        assert_eq!(back.model, "SARIMAX(1,0,1)x(1,0,1,52)");
        assert_eq!(back.params, summary.params);
        assert_eq!(back.order, SarimaxOrder::WEEKLY);
        assert_eq!(back.horizon, 20);

        let raw: serde_json::Value = serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(raw["first_week"], "2023-10-02");
        assert_eq!(raw["params"]["exog_km"], 0.12);
        assert!(raw["params"].get("exog").is_none());
    }
}
