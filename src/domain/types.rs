//! Shared domain types.
//!
//! These types are kept small and serializable so they can be:
//!
//! - passed between pipeline stages as immutable values
//! - exported directly to CSV/JSON via `serde`

use std::collections::HashMap;
use std::path::PathBuf;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::AppError;

/// A latitude/longitude pair in degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LatLon {
    pub lat: f64,
    pub lon: f64,
}

impl LatLon {
    pub fn new(lat: f64, lon: f64) -> Self {
        Self { lat, lon }
    }
}

/// A row of the city reference table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct City {
    pub name: String,
    pub lat: f64,
    pub lon: f64,
    /// Airport code. Carried for completeness; nothing downstream uses it.
    pub airport: String,
}

impl City {
    pub fn coords(&self) -> LatLon {
        LatLon::new(self.lat, self.lon)
    }
}

/// Read-only city lookup keyed by exact (trimmed) city name.
#[derive(Debug, Clone, Default)]
pub struct CityTable {
    cities: Vec<City>,
    index: HashMap<String, usize>,
}

impl CityTable {
    /// Build a lookup table. When a name appears twice, the first row wins.
    pub fn from_cities(cities: Vec<City>) -> Self {
        let mut index = HashMap::with_capacity(cities.len());
        for (i, city) in cities.iter().enumerate() {
            index.entry(city.name.clone()).or_insert(i);
        }
        Self { cities, index }
    }

    pub fn get(&self, name: &str) -> Result<&City, AppError> {
        self.index
            .get(name)
            .map(|&i| &self.cities[i])
            .ok_or_else(|| AppError::input(format!("Unknown city '{name}': not present in the city table.")))
    }

    pub fn len(&self) -> usize {
        self.cities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cities.is_empty()
    }
}

/// One scheduled game.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Game {
    pub date: NaiveDate,
    pub venue_city: String,
}

/// One inferred travel segment between two cities.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Leg {
    pub date: NaiveDate,
    pub from_city: String,
    pub to_city: String,
    pub km: f64,
}

/// Total distance travelled in the week starting on `week` (a Monday).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WeeklyKm {
    pub week: NaiveDate,
    pub km: f64,
}

/// Synthetic flight cost (USD) for the week starting on `week`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WeeklyCost {
    pub week: NaiveDate,
    pub cost: f64,
}

/// Km and cost reindexed onto one regular weekly grid.
///
/// All three vectors have the same length; `weeks` are consecutive Mondays.
#[derive(Debug, Clone, PartialEq)]
pub struct AlignedSeries {
    pub weeks: Vec<NaiveDate>,
    pub km: Vec<f64>,
    pub cost: Vec<f64>,
}

impl AlignedSeries {
    pub fn len(&self) -> usize {
        self.weeks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.weeks.is_empty()
    }
}

/// A single forecast row (CSV schema: `week,predicted_cost,lower,upper`).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ForecastPoint {
    pub week: NaiveDate,
    pub predicted_cost: f64,
    pub lower: f64,
    pub upper: f64,
}

/// A full run's configuration as understood by the pipeline.
///
/// This is derived from CLI flags (plus defaults).
#[derive(Debug, Clone)]
pub struct RunConfig {
    pub cities_path: PathBuf,
    pub schedule_path: PathBuf,
    pub assets_dir: PathBuf,
    /// City every trip starts from and returns to.
    pub base_city: String,
    /// Seed for the synthetic cost noise.
    pub seed: u64,
    /// Two-sided confidence level of the forecast interval (e.g. `0.8`).
    pub confidence: f64,
    pub plot: bool,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            cities_path: PathBuf::from("data/cities.csv"),
            schedule_path: PathBuf::from("data/schedule.csv"),
            assets_dir: PathBuf::from("assets"),
            base_city: "Dallas".to_string(),
            seed: 0,
            confidence: 0.8,
            plot: true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn city(name: &str, lat: f64, lon: f64) -> City {
        City {
            name: name.to_string(),
            lat,
            lon,
            airport: String::new(),
        }
    }

    #[test]
    fn city_table_first_row_wins() {
        let table = CityTable::from_cities(vec![city("Dallas", 1.0, 2.0), city("Dallas", 3.0, 4.0)]);
        assert_eq!(table.get("Dallas").unwrap().lat, 1.0);
        assert_eq!(table.len(), 2);
    }

    #[test]
    fn unknown_city_is_an_input_error() {
        let table = CityTable::from_cities(vec![city("Dallas", 32.78, -96.80)]);
        let err = table.get("Gotham").unwrap_err();
        assert_eq!(err.exit_code(), crate::error::EXIT_INPUT);
        assert!(err.message().contains("Gotham"));
    }
}
