//! Regular weekly grid alignment.
//!
//! The km and cost series are reindexed onto every week between the first and
//! last km week. The two series are filled differently:
//!
//! - km: a missing week means no travel, so it is `0.0`
//! - cost: a missing week means no observation, so it is linearly interpolated

use std::collections::HashMap;

use chrono::{Duration, NaiveDate};

use crate::domain::{AlignedSeries, WeeklyCost, WeeklyKm};
use crate::error::AppError;

/// Every Monday from `first` to `last` inclusive.
pub fn weekly_grid(first: NaiveDate, last: NaiveDate) -> Vec<NaiveDate> {
    let mut weeks = Vec::new();
    let mut week = first;
    while week <= last {
        weeks.push(week);
        week += Duration::weeks(1);
    }
    weeks
}

/// `count` consecutive weeks starting at `first`.
pub fn weeks_from(first: NaiveDate, count: usize) -> Vec<NaiveDate> {
    (0..count)
        .map(|i| first + Duration::weeks(i as i64))
        .collect()
}

/// Reindex both series onto one regular weekly grid spanning the km series.
pub fn align_weekly(km: &[WeeklyKm], cost: &[WeeklyCost]) -> Result<AlignedSeries, AppError> {
    let (Some(first), Some(last)) = (km.iter().map(|p| p.week).min(), km.iter().map(|p| p.week).max()) else {
        return Err(AppError::no_data("No travel legs: the weekly distance series is empty."));
    };

    let weeks = weekly_grid(first, last);

    let km_by_week: HashMap<NaiveDate, f64> = km.iter().map(|p| (p.week, p.km)).collect();
    let cost_by_week: HashMap<NaiveDate, f64> = cost.iter().map(|p| (p.week, p.cost)).collect();

    let km_values: Vec<f64> = weeks
        .iter()
        .map(|w| km_by_week.get(w).copied().unwrap_or(0.0))
        .collect();
    let cost_known: Vec<Option<f64>> = weeks.iter().map(|w| cost_by_week.get(w).copied()).collect();

    let cost_values = interpolate_gaps(&cost_known)
        .ok_or_else(|| AppError::no_data("No cost observations fall on the weekly grid."))?;

    Ok(AlignedSeries {
        weeks,
        km: km_values,
        cost: cost_values,
    })
}

/// Fill `None` entries by linear interpolation between known neighbours.
///
/// Leading and trailing gaps take the nearest known value. Returns `None` when
/// nothing is known.
pub fn interpolate_gaps(values: &[Option<f64>]) -> Option<Vec<f64>> {
    let known: Vec<(usize, f64)> = values
        .iter()
        .enumerate()
        .filter_map(|(i, v)| v.map(|v| (i, v)))
        .collect();
    let (&(first_idx, first_val), &(last_idx, last_val)) = (known.first()?, known.last()?);

    let mut out = Vec::with_capacity(values.len());
    let mut segment = known.windows(2).peekable();
    for (i, v) in values.iter().enumerate() {
        if let Some(v) = v {
            out.push(*v);
            continue;
        }
        if i < first_idx {
            out.push(first_val);
            continue;
        }
        if i > last_idx {
            out.push(last_val);
            continue;
        }
        while segment.peek().is_some_and(|w| w[1].0 < i) {
            segment.next();
        }
        let w = segment.peek()?;
        out.push(linear_interp(w[0], w[1], i as f64));
    }

    Some(out)
}

fn linear_interp(a: (usize, f64), b: (usize, f64), x: f64) -> f64 {
    let (x0, y0) = (a.0 as f64, a.1);
    let (x1, y1) = (b.0 as f64, b.1);
    if (x1 - x0).abs() < 1e-12 {
        return y0;
    }
    let u = (x - x0) / (x1 - x0);
    y0 + u * (y1 - y0)
}
