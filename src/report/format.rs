//! Formatted terminal output.
//!
//! We keep formatting code in one place so:
//! - the travel/forecasting code stays clean and testable
//! - output changes are localized

use crate::domain::{ForecastPoint, Leg, RunConfig, WeeklyKm};
use crate::forecast::{ForecastRun, SarimaxModel};

/// Format the full run summary (inputs + travel totals + fitted model + forecast).
pub fn format_run_summary(
    config: &RunConfig,
    legs: &[Leg],
    weekly: &[WeeklyKm],
    run: &ForecastRun<SarimaxModel>,
) -> String {
    let mut out = String::new();
    let fit = &run.model.fit;

    out.push_str("=== tripcast - Team Travel Cost Forecast ===\n");
    out.push_str(&format!("Cities:   {}\n", config.cities_path.display()));
    out.push_str(&format!("Schedule: {}\n", config.schedule_path.display()));
    out.push_str(&format!(
        "Base city: {} | seed={} | confidence={:.0}%\n",
        config.base_city,
        config.seed,
        config.confidence * 100.0
    ));

    out.push_str(&format!(
        "Travel: {} legs | {} travel weeks | total={:.1} km\n",
        legs.len(),
        weekly.len(),
        total_km(legs),
    ));
    out.push_str(&format!(
        "Split: train={} | test={} | horizon={}\n",
        run.split.train_cost.len(),
        run.split.test_cost.len(),
        run.split.horizon(),
    ));

    out.push_str(&format!("\nModel: SARIMAX{}\n", fit.order.label()));
    out.push_str(&format!("- exog km    : {:.6}\n", fit.params.exog));
    out.push_str(&format!("- ar         : {}\n", fmt_vec(&fit.params.ar)));
    out.push_str(&format!("- ma         : {}\n", fmt_vec(&fit.params.ma)));
    out.push_str(&format!("- seasonal ar: {}\n", fmt_vec(&fit.params.seasonal_ar)));
    out.push_str(&format!("- seasonal ma: {}\n", fmt_vec(&fit.params.seasonal_ma)));
    out.push_str(&format!(
        "- sigma2={:.3} SSE={:.3} n={} iterations={}{}\n",
        fit.sigma2,
        fit.sse,
        fit.n_obs,
        fit.iterations,
        if fit.converged { "" } else { " (not converged)" },
    ));

    out.push_str("\nForecast:\n");
    out.push_str(&format_forecast_table(&run.points));

    out
}

/// Format the forecast rows as a fixed-width table.
pub fn format_forecast_table(points: &[ForecastPoint]) -> String {
    let mut out = String::new();
    push_line(&mut out, format!("{:<10} {:>12} {:>12} {:>12}", "week", "predicted", "lower", "upper"));
    push_line(&mut out, format!("{:-<10} {:-<12} {:-<12} {:-<12}", "", "", "", ""));
    for p in points {
        push_line(
            &mut out,
            format!(
                "{:<10} {:>12.2} {:>12.2} {:>12.2}",
                p.week.format("%Y-%m-%d"),
                p.predicted_cost,
                p.lower,
                p.upper
            ),
        );
    }
    out
}

/// Format the leg table followed by weekly km totals.
pub fn format_legs_table(legs: &[Leg], weekly: &[WeeklyKm]) -> String {
    let mut out = String::new();

    out.push_str(&format!("Legs ({}):\n", legs.len()));
    push_line(
        &mut out,
        format!("{:<10} {:<20} {:<20} {:>10}", "date", "from", "to", "km"),
    );
    push_line(&mut out, format!("{:-<10} {:-<20} {:-<20} {:-<10}", "", "", "", ""));
    for leg in legs {
        push_line(
            &mut out,
            format!(
                "{:<10} {:<20} {:<20} {:>10.1}",
                leg.date.format("%Y-%m-%d"),
                truncate(&leg.from_city, 20),
                truncate(&leg.to_city, 20),
                leg.km
            ),
        );
    }

    out.push_str(&format!("\nWeekly km ({} weeks):\n", weekly.len()));
    push_line(&mut out, format!("{:<10} {:>10}", "week", "km"));
    push_line(&mut out, format!("{:-<10} {:-<10}", "", ""));
    for w in weekly {
        push_line(&mut out, format!("{:<10} {:>10.1}", w.week.format("%Y-%m-%d"), w.km));
    }
    out.push_str(&format!("\nTotal: {:.1} km\n", total_km(legs)));

    out
}

fn total_km(legs: &[Leg]) -> f64 {
    legs.iter().map(|l| l.km).sum()
}

fn push_line(out: &mut String, line: String) {
    out.push_str(line.trim_end());
    out.push('\n');
}

fn fmt_vec(v: &[f64]) -> String {
    let parts: Vec<String> = v.iter().map(|x| format!("{x:.6}")).collect();
    format!("[{}]", parts.join(", "))
}

fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        return s.to_string();
    }
    let mut out: String = s.chars().take(max.saturating_sub(1)).collect();
    out.push('.');
    out
}
