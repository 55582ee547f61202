//! PNG charts rendered with Plotters' bitmap backend.
//!
//! Three charts are written next to the CSV outputs:
//! - weekly km travelled (line)
//! - cost history + forecast with the shaded confidence band
//! - cumulative km over the season
//!
//! The x axis is the week index on the aligned grid (week 0 = first grid week);
//! tick labels are formatted back to calendar months.

use std::path::{Path, PathBuf};

use chrono::{Duration, NaiveDate};
use plotters::prelude::*;

use crate::domain::{AlignedSeries, ForecastPoint};
use crate::error::AppError;
use crate::series::cumulative;

pub const WEEKLY_KM_PNG: &str = "weekly_km.png";
pub const COST_FORECAST_PNG: &str = "cost_forecast.png";
pub const CUMULATIVE_KM_PNG: &str = "cumulative_km.png";

const CHART_SIZE: (u32, u32) = (1280, 800);

type DrawResult = Result<(), Box<dyn std::error::Error>>;

/// Render all three charts into `dir` and return their paths.
pub fn render_all(dir: &Path, aligned: &AlignedSeries, forecast: &[ForecastPoint]) -> Result<Vec<PathBuf>, AppError> {
    let Some(&origin) = aligned.weeks.first() else {
        return Err(AppError::no_data("Nothing to plot: the weekly series is empty."));
    };

    let weekly_km = dir.join(WEEKLY_KM_PNG);
    draw_line_chart(
        &weekly_km,
        "Weekly Travel Distance (km)",
        "Kilometers",
        origin,
        &aligned.km,
    )
    .map_err(|e| plot_error(&weekly_km, e))?;

    let cost_forecast = dir.join(COST_FORECAST_PNG);
    draw_cost_forecast(&cost_forecast, origin, &aligned.cost, forecast).map_err(|e| plot_error(&cost_forecast, e))?;

    let cumulative_km = dir.join(CUMULATIVE_KM_PNG);
    draw_line_chart(
        &cumulative_km,
        "Cumulative Travel Distance (Season)",
        "Kilometers (cumulative)",
        origin,
        &cumulative(&aligned.km),
    )
    .map_err(|e| plot_error(&cumulative_km, e))?;

    Ok(vec![weekly_km, cost_forecast, cumulative_km])
}

fn plot_error(path: &Path, e: Box<dyn std::error::Error>) -> AppError {
    AppError::output(format!("Failed to render chart '{}': {e}", path.display()))
}

fn draw_line_chart(path: &Path, title: &str, y_desc: &str, origin: NaiveDate, values: &[f64]) -> DrawResult {
    let root = BitMapBackend::new(path, CHART_SIZE).into_drawing_area();
    root.fill(&WHITE)?;

    let (x0, x1) = x_bounds(values.len());
    let (y0, y1) = y_bounds(values.iter().copied());
    let label = |v: &f64| week_label(origin, *v);

    let mut chart = ChartBuilder::on(&root)
        .caption(title, ("sans-serif", 28).into_font())
        .margin(16)
        .set_label_area_size(LabelAreaPosition::Left, 80)
        .set_label_area_size(LabelAreaPosition::Bottom, 50)
        .build_cartesian_2d(x0..x1, y0..y1)?;

    chart
        .configure_mesh()
        .x_desc("Week")
        .y_desc(y_desc)
        .x_labels(8)
        .y_labels(8)
        .x_label_formatter(&label)
        .draw()?;

    chart.draw_series(LineSeries::new(indexed(values, 0), &BLUE))?;

    root.present()?;
    Ok(())
}

fn draw_cost_forecast(path: &Path, origin: NaiveDate, history: &[f64], forecast: &[ForecastPoint]) -> DrawResult {
    let root = BitMapBackend::new(path, CHART_SIZE).into_drawing_area();
    root.fill(&WHITE)?;

    // Forecast rows sit on the same weekly grid as the history.
    let offset = forecast
        .first()
        .map(|p| (p.week - origin).num_weeks().max(0) as usize)
        .unwrap_or(history.len());
    let total = history.len().max(offset + forecast.len());

    let (x0, x1) = x_bounds(total);
    let (y0, y1) = y_bounds(
        history
            .iter()
            .copied()
            .chain(forecast.iter().flat_map(|p| [p.lower, p.upper, p.predicted_cost])),
    );
    let label = |v: &f64| week_label(origin, *v);

    let mut chart = ChartBuilder::on(&root)
        .caption("Flight Cost: History + Forecast", ("sans-serif", 28).into_font())
        .margin(16)
        .set_label_area_size(LabelAreaPosition::Left, 80)
        .set_label_area_size(LabelAreaPosition::Bottom, 50)
        .build_cartesian_2d(x0..x1, y0..y1)?;

    chart
        .configure_mesh()
        .x_desc("Week")
        .y_desc("USD")
        .x_labels(8)
        .y_labels(8)
        .x_label_formatter(&label)
        .draw()?;

    let forecast_color = RGBColor(230, 120, 20);

    // Band first so the lines draw on top of it.
    if !forecast.is_empty() {
        let mut band: Vec<(f64, f64)> = forecast
            .iter()
            .enumerate()
            .map(|(i, p)| ((offset + i) as f64, p.upper))
            .collect();
        band.extend(
            forecast
                .iter()
                .enumerate()
                .rev()
                .map(|(i, p)| ((offset + i) as f64, p.lower)),
        );
        chart
            .draw_series(std::iter::once(Polygon::new(band, forecast_color.mix(0.2).filled())))?
            .label("80% CI")
            .legend(move |(x, y)| Rectangle::new([(x, y - 5), (x + 20, y + 5)], forecast_color.mix(0.2).filled()));
    }

    chart
        .draw_series(LineSeries::new(indexed(history, 0), &BLUE))?
        .label("History")
        .legend(|(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], BLUE));

    let predicted: Vec<f64> = forecast.iter().map(|p| p.predicted_cost).collect();
    chart
        .draw_series(LineSeries::new(indexed(&predicted, offset), &forecast_color))?
        .label("Forecast")
        .legend(move |(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], forecast_color));

    chart
        .configure_series_labels()
        .position(SeriesLabelPosition::UpperLeft)
        .background_style(WHITE.mix(0.8))
        .border_style(BLACK)
        .draw()?;

    root.present()?;
    Ok(())
}

fn indexed(values: &[f64], offset: usize) -> impl Iterator<Item = (f64, f64)> + '_ {
    values
        .iter()
        .enumerate()
        .map(move |(i, &v)| ((offset + i) as f64, v))
}

fn x_bounds(n: usize) -> (f64, f64) {
    (0.0, n.saturating_sub(1).max(1) as f64)
}

/// Padded value range; degenerate ranges are widened so Plotters can build axes.
fn y_bounds(values: impl Iterator<Item = f64>) -> (f64, f64) {
    let (lo, hi) = values
        .filter(|v| v.is_finite())
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| (lo.min(v), hi.max(v)));
    if !(lo.is_finite() && hi.is_finite()) {
        return (0.0, 1.0);
    }
    if (hi - lo).abs() < 1e-9 {
        return (lo - 1.0, hi + 1.0);
    }
    let pad = 0.05 * (hi - lo);
    (lo - pad, hi + pad)
}

fn week_label(origin: NaiveDate, index: f64) -> String {
    let date = origin + Duration::weeks(index.round() as i64);
    date.format("%Y-%m").to_string()
}
