//! The end-to-end run shared by the `run` and `legs` subcommands.
//!
//! Keeping this in one place avoids duplicating the core workflow:
//! CSV ingest -> legs -> weekly km -> synthetic cost -> weekly grid -> SARIMAX fit/forecast
//!
//! Writing files is a separate step so the computed run can be inspected (and
//! tested) without touching the filesystem.

use std::path::PathBuf;

use crate::domain::{AlignedSeries, CityTable, Game, Leg, RunConfig, WeeklyCost, WeeklyKm};
use crate::error::AppError;
use crate::forecast::{ForecastRun, SarimaxForecaster, SarimaxModel, run_forecast};
use crate::io::{FORECAST_CSV, LEGS_CSV, ModelSummary, SUMMARY_JSON};

/// Travel data derived from the two input CSVs.
#[derive(Debug, Clone)]
pub struct TravelData {
    pub cities: CityTable,
    pub games: Vec<Game>,
    pub legs: Vec<Leg>,
    pub weekly_km: Vec<WeeklyKm>,
}

/// All computed outputs of a single `tripcast run`.
#[derive(Debug, Clone)]
pub struct RunOutput {
    pub travel: TravelData,
    pub weekly_cost: Vec<WeeklyCost>,
    pub aligned: AlignedSeries,
    pub forecast: ForecastRun<SarimaxModel>,
}

/// Load the inputs and reconstruct legs plus weekly km.
pub fn compute_legs(config: &RunConfig) -> Result<TravelData, AppError> {
    let cities = crate::io::load_cities(&config.cities_path)?;
    let games = crate::io::load_schedule(&config.schedule_path)?;

    // Fail on an unknown base city even when every game is at home.
    cities.get(&config.base_city)?;

    let legs = crate::travel::reconstruct_legs(&games, &cities, &config.base_city)?;
    let weekly_km = crate::series::aggregate_weekly(&legs);

    let total_km: f64 = legs.iter().map(|l| l.km).sum();
    log::info!(
        "Reconstructed {} legs over {} travel weeks ({total_km:.1} km) from {} games",
        legs.len(),
        weekly_km.len(),
        games.len()
    );

    Ok(TravelData {
        cities,
        games,
        legs,
        weekly_km,
    })
}

/// Execute the full pipeline and return the computed outputs.
pub fn run_pipeline(config: &RunConfig) -> Result<RunOutput, AppError> {
    let travel = compute_legs(config)?;
    if travel.legs.is_empty() {
        return Err(AppError::no_data(format!(
            "No travel legs: every game in '{}' is in {}.",
            config.schedule_path.display(),
            config.base_city
        )));
    }

    let weekly_cost = crate::data::generate_costs(&travel.weekly_km, config.seed)?;
    let aligned = crate::series::align_weekly(&travel.weekly_km, &weekly_cost)?;
    log::info!(
        "Aligned {} weeks ({} to {})",
        aligned.len(),
        aligned.weeks.first().map(|w| w.to_string()).unwrap_or_default(),
        aligned.weeks.last().map(|w| w.to_string()).unwrap_or_default()
    );

    let forecast = run_forecast(&aligned, &SarimaxForecaster::default(), config.confidence)?;

    Ok(RunOutput {
        travel,
        weekly_cost,
        aligned,
        forecast,
    })
}

/// Write CSVs, the model summary and (optionally) the charts. Returns the written paths.
pub fn write_outputs(config: &RunConfig, run: &RunOutput) -> Result<Vec<PathBuf>, AppError> {
    let dir = &config.assets_dir;
    crate::io::ensure_dir(dir)?;

    let forecast_csv = dir.join(FORECAST_CSV);
    crate::io::write_forecast_csv(&forecast_csv, &run.forecast.points)?;

    let legs_csv = dir.join(LEGS_CSV);
    crate::io::write_legs_csv(&legs_csv, &run.travel.legs)?;

    let summary_json = dir.join(SUMMARY_JSON);
    let split = &run.forecast.split;
    let (Some(&first_week), Some(&last_week)) = (run.aligned.weeks.first(), run.aligned.weeks.last()) else {
        return Err(AppError::no_data("Cannot summarize an empty weekly series."));
    };
    let summary = ModelSummary::new(
        &run.forecast.model.fit,
        &config.base_city,
        config.seed,
        config.confidence,
        first_week,
        last_week,
        split.train_cost.len(),
        split.test_cost.len(),
        split.horizon(),
    );
    crate::io::write_summary_json(&summary_json, &summary)?;

    let mut written = vec![forecast_csv, legs_csv, summary_json];
    if config.plot {
        written.extend(crate::plot::render_all(dir, &run.aligned, &run.forecast.points)?);
    }

    for path in &written {
        log::debug!("Wrote {}", path.display());
    }
    Ok(written)
}
