//! CSV ingest for the city table and the game schedule.
//!
//! Design goals:
//! - **Strict schema**: missing required columns are reported by name
//! - **Fail fast**: any bad row aborts the run with its line number
//! - **Lenient headers**: case-insensitive, BOM-stripped, extra columns ignored
//! - **Separation of concerns**: no travel or forecasting logic here

use std::collections::HashMap;
use std::fs::File;
use std::io::Read;
use std::path::Path;

use chrono::{NaiveDate, NaiveDateTime};
use csv::StringRecord;

use crate::domain::{City, CityTable, Game};
use crate::error::AppError;

/// Load `cities.csv` (`city,lat,lon,airport`).
pub fn load_cities(path: &Path) -> Result<CityTable, AppError> {
    let file = open(path)?;
    let cities = read_cities(file, &path.display().to_string())?;
    log::info!("Loaded {} cities from {}", cities.len(), path.display());
    Ok(cities)
}

/// Load `schedule.csv` (needs `date` and `venue_city`; other columns are ignored).
pub fn load_schedule(path: &Path) -> Result<Vec<Game>, AppError> {
    let file = open(path)?;
    let games = read_schedule(file, &path.display().to_string())?;
    log::info!("Loaded {} games from {}", games.len(), path.display());
    Ok(games)
}

fn open(path: &Path) -> Result<File, AppError> {
    File::open(path).map_err(|e| AppError::input(format!("Failed to open CSV '{}': {e}", path.display())))
}

pub fn read_cities<R: Read>(reader: R, source: &str) -> Result<CityTable, AppError> {
    let mut reader = csv_reader(reader);
    let header_map = read_header_map(&mut reader, source)?;
    ensure_columns(&header_map, &["city", "lat", "lon"], source)?;

    let mut cities = Vec::new();
    for (idx, result) in reader.records().enumerate() {
        // +2: header is line 1 and records are 1-based.
        let line = idx + 2;
        let record = result.map_err(|e| AppError::input(format!("{source}:{line}: CSV parse error: {e}")))?;

        let row = parse_city(&record, &header_map).map_err(|e| AppError::input(format!("{source}:{line}: {e}")))?;
        cities.push(row);
    }

    Ok(CityTable::from_cities(cities))
}

pub fn read_schedule<R: Read>(reader: R, source: &str) -> Result<Vec<Game>, AppError> {
    let mut reader = csv_reader(reader);
    let header_map = read_header_map(&mut reader, source)?;
    ensure_columns(&header_map, &["date", "venue_city"], source)?;

    let mut games = Vec::new();
    for (idx, result) in reader.records().enumerate() {
        let line = idx + 2;
        let record = result.map_err(|e| AppError::input(format!("{source}:{line}: CSV parse error: {e}")))?;

        let date = get_required(&record, &header_map, "date")
            .and_then(parse_date)
            .map_err(|e| AppError::input(format!("{source}:{line}: {e}")))?;
        let venue_city = get_required(&record, &header_map, "venue_city")
            .map_err(|e| AppError::input(format!("{source}:{line}: {e}")))?
            .to_string();

        games.push(Game { date, venue_city });
    }

    Ok(games)
}

fn csv_reader<R: Read>(reader: R) -> csv::Reader<R> {
    csv::ReaderBuilder::new()
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(reader)
}

fn read_header_map<R: Read>(reader: &mut csv::Reader<R>, source: &str) -> Result<HashMap<String, usize>, AppError> {
    let headers = reader
        .headers()
        .map_err(|e| AppError::input(format!("Failed to read CSV headers of {source}: {e}")))?;
    Ok(build_header_map(headers))
}

fn build_header_map(headers: &StringRecord) -> HashMap<String, usize> {
    headers
        .iter()
        .enumerate()
        .map(|(idx, name)| (normalize_header_name(name), idx))
        .collect()
}

fn normalize_header_name(name: &str) -> String {
    // Spreadsheet exports often prefix the first header with a UTF-8 BOM.
    let name = name.trim().trim_start_matches('\u{feff}');
    name.to_ascii_lowercase()
}

fn ensure_columns(header_map: &HashMap<String, usize>, required: &[&str], source: &str) -> Result<(), AppError> {
    let missing: Vec<&str> = required
        .iter()
        .copied()
        .filter(|c| !header_map.contains_key(*c))
        .collect();
    if missing.is_empty() {
        return Ok(());
    }
    Err(AppError::input(format!(
        "{source}: missing required column(s): {}",
        missing
            .iter()
            .map(|c| format!("`{c}`"))
            .collect::<Vec<_>>()
            .join(", ")
    )))
}

fn parse_city(record: &StringRecord, header_map: &HashMap<String, usize>) -> Result<City, String> {
    let name = get_required(record, header_map, "city")?.to_string();
    let lat = parse_f64(get_required(record, header_map, "lat")?, "lat")?;
    let lon = parse_f64(get_required(record, header_map, "lon")?, "lon")?;
    let airport = get_optional(record, header_map, "airport").unwrap_or_default().to_string();

    if !(-90.0..=90.0).contains(&lat) || !(-180.0..=180.0).contains(&lon) {
        return Err(format!("Coordinates out of range for '{name}': ({lat}, {lon})"));
    }

    Ok(City { name, lat, lon, airport })
}

fn get_required<'a>(
    record: &'a StringRecord,
    header_map: &HashMap<String, usize>,
    name: &str,
) -> Result<&'a str, String> {
    let idx = header_map
        .get(name)
        .ok_or_else(|| format!("Missing required column: `{name}`"))?;
    record
        .get(*idx)
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .ok_or_else(|| format!("Missing required value: `{name}`"))
}

fn get_optional<'a>(record: &'a StringRecord, header_map: &HashMap<String, usize>, name: &str) -> Option<&'a str> {
    let idx = header_map.get(name)?;
    record.get(*idx).map(str::trim).filter(|s| !s.is_empty())
}

fn parse_f64(s: &str, name: &str) -> Result<f64, String> {
    s.parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
        .ok_or_else(|| format!("Invalid number for `{name}`: '{s}'"))
}

/// Parse an ISO date, optionally followed by a time of day (which is dropped).
pub fn parse_date(s: &str) -> Result<NaiveDate, String> {
    if let Ok(d) = NaiveDate::parse_from_str(s, "%Y-%m-%d") {
        return Ok(d);
    }

    const DATETIME_FMTS: [&str; 4] = ["%Y-%m-%d %H:%M:%S", "%Y-%m-%d %H:%M", "%Y-%m-%dT%H:%M:%S", "%Y-%m-%dT%H:%M"];
    for fmt in DATETIME_FMTS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(s, fmt) {
            return Ok(dt.date());
        }
    }
    if let Ok(dt) = chrono::DateTime::parse_from_rfc3339(s) {
        return Ok(dt.date_naive());
    }

    Err(format!(
        "Invalid date '{s}'. Expected YYYY-MM-DD, optionally followed by a time."
    ))
}
