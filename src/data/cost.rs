//! Synthetic weekly flight-cost generation.
//!
//! ```text
//! cost = max(50, 0.12 · km + seasonal(month) + noise)
//! seasonal(m) = 40 + 10 · sin(2π(m − 1)/12) + 8 · cos(2π(m − 3)/12)
//! noise ~ Normal(0, 25)
//! ```
//!
//! The month is taken from the week-start date used for bucketing, not from the
//! underlying game dates. Noise comes from a seeded `StdRng`, one draw per week
//! in ascending week order, so a given seed always reproduces the same series.

use std::f64::consts::PI;

use chrono::Datelike;
use rand::SeedableRng;
use rand::rngs::StdRng;
use rand_distr::{Distribution, Normal};

use crate::domain::{WeeklyCost, WeeklyKm};
use crate::error::AppError;

/// Cost per kilometer (USD).
pub const COST_PER_KM: f64 = 0.12;

/// Lowest cost any week can have (USD).
pub const COST_FLOOR: f64 = 50.0;

/// Standard deviation of the additive noise (USD).
pub const NOISE_STD: f64 = 25.0;

pub const DEFAULT_SEED: u64 = 0;

/// Annual seasonal component for a calendar month (`1..=12`).
///
/// Peaks around the December holidays and March.
pub fn seasonal_component(month: u32) -> f64 {
    let m = f64::from(month);
    40.0 + 10.0 * (2.0 * PI * (m - 1.0) / 12.0).sin() + 8.0 * (2.0 * PI * (m - 3.0) / 12.0).cos()
}

/// Deterministic part of the cost model plus a given noise draw, floored.
pub fn weekly_cost(km: f64, month: u32, noise: f64) -> f64 {
    (COST_PER_KM * km + seasonal_component(month) + noise).max(COST_FLOOR)
}

/// Derive one cost value per week from the weekly km series.
pub fn generate_costs(weekly: &[WeeklyKm], seed: u64) -> Result<Vec<WeeklyCost>, AppError> {
    let mut rng = StdRng::seed_from_u64(seed);
    let normal = Normal::new(0.0, NOISE_STD)
        .map_err(|e| AppError::model(format!("Noise distribution error: {e}")))?;

    let costs = weekly
        .iter()
        .map(|p| WeeklyCost {
            week: p.week,
            cost: weekly_cost(p.km, p.week.month(), normal.sample(&mut rng)),
        })
        .collect();

    Ok(costs)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, NaiveDate};

    fn series(n: usize, km: f64) -> Vec<WeeklyKm> {
        let start = NaiveDate::from_ymd_opt(2023, 10, 2).unwrap();
        (0..n)
            .map(|i| WeeklyKm {
                week: start + Duration::weeks(i as i64),
                km,
            })
            .collect()
    }

    #[test]
    fn seasonal_curve_values() {
        // January: sin(0) = 0, cos(-π/3) = 0.5.
        assert!((seasonal_component(1) - 44.0).abs() < 1e-12);
        // March: sin(π/3), cos(0) = 1.
        let march = 40.0 + 10.0 * (PI / 3.0).sin() + 8.0;
        assert!((seasonal_component(3) - march).abs() < 1e-12);
        for m in 1..=12 {
            let s = seasonal_component(m);
            assert!(s > 22.0 && s < 58.0, "month {m}: {s}");
        }
    }

    #[test]
    fn cost_never_below_floor() {
        for m in 1..=12 {
            assert_eq!(weekly_cost(0.0, m, -1_000.0), COST_FLOOR);
            assert!(weekly_cost(0.0, m, 0.0) >= COST_FLOOR);
        }

        let costs = generate_costs(&series(500, 0.0), 7).unwrap();
        assert!(costs.iter().all(|c| c.cost >= COST_FLOOR));
    }

    #[test]
    fn large_distance_dominates() {
        assert!((weekly_cost(10_000.0, 6, 0.0) - (1_200.0 + seasonal_component(6))).abs() < 1e-9);
    }

    #[test]
    fn same_seed_is_deterministic() {
        let weekly = series(30, 1_500.0);
        let a = generate_costs(&weekly, DEFAULT_SEED).unwrap();
        let b = generate_costs(&weekly, DEFAULT_SEED).unwrap();
        assert_eq!(a, b);

        let c = generate_costs(&weekly, 99).unwrap();
        assert_ne!(a, c);
    }

    #[test]
    fn weeks_are_preserved_one_to_one() {
        let weekly = series(12, 800.0);
        let costs = generate_costs(&weekly, 1).unwrap();
        assert_eq!(costs.len(), weekly.len());
        assert!(costs.iter().zip(&weekly).all(|(c, w)| c.week == w.week));
    }
}
