//! CSV exports: the forecast table and the leg table.
//!
//! Both files are overwritten on every run and are meant to be easy to load in
//! spreadsheets or downstream scripts.

use std::fs::{File, create_dir_all};
use std::path::Path;

use serde::Serialize;

use crate::domain::{ForecastPoint, Leg};
use crate::error::AppError;

pub const FORECAST_CSV: &str = "weekly_cost_forecast.csv";
pub const LEGS_CSV: &str = "travel_legs.csv";

/// Create the output directory (and parents) if needed.
pub fn ensure_dir(dir: &Path) -> Result<(), AppError> {
    create_dir_all(dir)
        .map_err(|e| AppError::output(format!("Failed to create output directory '{}': {e}", dir.display())))
}

/// Write `week,predicted_cost,lower,upper`.
pub fn write_forecast_csv(path: &Path, points: &[ForecastPoint]) -> Result<(), AppError> {
    write_rows(path, points)
}

/// Write `date,from_city,to_city,km`.
pub fn write_legs_csv(path: &Path, legs: &[Leg]) -> Result<(), AppError> {
    write_rows(path, legs)
}

fn write_rows<T: Serialize>(path: &Path, rows: &[T]) -> Result<(), AppError> {
    let file = File::create(path)
        .map_err(|e| AppError::output(format!("Failed to create CSV '{}': {e}", path.display())))?;
    let mut writer = csv::Writer::from_writer(file);

    for row in rows {
        writer
            .serialize(row)
            .map_err(|e| AppError::output(format!("Failed to write CSV row to '{}': {e}", path.display())))?;
    }
    writer
        .flush()
        .map_err(|e| AppError::output(format!("Failed to flush CSV '{}': {e}", path.display())))?;

    Ok(())
}
