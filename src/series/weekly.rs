//! Weekly aggregation of leg distances.
//!
//! Weeks start on Monday (ISO weeks). Both the km series and the derived cost
//! series are keyed by the same Monday so they line up on one grid later.

use std::collections::BTreeMap;

use chrono::{Datelike, Duration, NaiveDate};

use crate::domain::{Leg, WeeklyKm};

/// Monday of the ISO week containing `date`.
pub fn week_start(date: NaiveDate) -> NaiveDate {
    let offset = i64::from(date.weekday().num_days_from_monday());
    date - Duration::days(offset)
}

/// Sum leg distances per week, ascending by week.
///
/// Weeks without any leg are absent; alignment fills them later.
pub fn aggregate_weekly(legs: &[Leg]) -> Vec<WeeklyKm> {
    let mut buckets: BTreeMap<NaiveDate, f64> = BTreeMap::new();
    for leg in legs {
        *buckets.entry(week_start(leg.date)).or_insert(0.0) += leg.km;
    }

    buckets
        .into_iter()
        .map(|(week, km)| WeeklyKm { week, km })
        .collect()
}

/// Running total of a km series (used for the cumulative distance chart).
pub fn cumulative(values: &[f64]) -> Vec<f64> {
    values
        .iter()
        .scan(0.0, |acc, &v| {
            *acc += v;
            Some(*acc)
        })
        .collect()
}
