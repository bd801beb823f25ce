//! Growth projector
//!
//! Derives a monthly growth rate per metric from the first and last values
//! of a historical series, clamps it, and walks it forward month by month
//! with noise.

use std::collections::BTreeMap;

use chrono::{DateTime, Datelike, Months, NaiveDate, NaiveTime, Utc};

use crate::analysis::{
    config::ForecastConfig,
    error::AnalysisError,
    noise::NoiseSource,
    types::{ForecastPoint, GrowthRates, HistoricalPoint, Metric, PredictionValues},
};

const SECONDS_PER_DAY: i64 = 86_400;

/// Unclamped monthly rate `(last / first) ^ (1 / normalization_months) - 1`.
///
/// The window is always treated as `normalization_months` long, whatever
/// its actual span.
pub fn monthly_growth_rate(
    first: u64,
    last: u64,
    metric: Metric,
    config: &ForecastConfig,
) -> Result<f64, AnalysisError> {
    if first == 0 {
        return Err(AnalysisError::DegenerateSeed { metric });
    }
    let ratio = last as f64 / first as f64;
    Ok(ratio.powf(1.0 / config.normalization_months) - 1.0)
}

/// Clamp a rate into `[min_rate, max_rate]`
pub fn clamp_rate(rate: f64, config: &ForecastConfig) -> f64 {
    rate.max(config.min_rate).min(config.max_rate)
}

/// Clamped growth rates for both metrics
pub fn growth_rates(
    series: &[HistoricalPoint],
    config: &ForecastConfig,
) -> Result<GrowthRates, AnalysisError> {
    let (first, last) = match (series.first(), series.last()) {
        (Some(first), Some(last)) if series.len() >= 2 => (first, last),
        _ => {
            return Err(AnalysisError::insufficient_data(format!(
                "growth rate needs at least 2 historical points, got {}",
                series.len()
            )))
        }
    };

    let subscribers =
        monthly_growth_rate(first.subscribers, last.subscribers, Metric::Subscribers, config)?;
    let views = monthly_growth_rate(first.views, last.views, Metric::Views, config)?;

    Ok(GrowthRates {
        subscribers: clamp_rate(subscribers, config),
        views: clamp_rate(views, config),
    })
}

/// `months` first-of-month dates, starting the month after `last_date`
pub fn goal_dates(last_date: NaiveDate, months: usize) -> Option<Vec<NaiveDate>> {
    let month_start = last_date.with_day(1)?;
    (1..=months)
        .map(|i| month_start.checked_add_months(Months::new(u32::try_from(i).ok()?)))
        .collect()
}

/// Whole days from `now` to midnight UTC of `goal_date`, floored
pub fn days_until(goal_date: NaiveDate, now: DateTime<Utc>) -> i64 {
    let goal = goal_date.and_time(NaiveTime::default());
    (goal - now.naive_utc()).num_seconds().div_euclid(SECONDS_PER_DAY)
}

/// Project `config.months_ahead` monthly points from a historical series.
///
/// Point 0 repeats the last historical values under the first goal date.
/// Each following point multiplies its predecessor by `1 + max(0, g)` with
/// `g ~ N(rate, rate_std_dev)` drawn per metric per step, then floors.
pub fn project<N>(
    series: &[HistoricalPoint],
    config: &ForecastConfig,
    noise: &mut N,
    now: DateTime<Utc>,
) -> Result<Vec<ForecastPoint>, AnalysisError>
where
    N: NoiseSource + ?Sized,
{
    project_with_rates(series, config, noise, now).map(|(_, forecast)| forecast)
}

/// Like [`project`], also returning the growth rates the forecast was
/// drawn from. Rates come from the date-ordered series.
pub fn project_with_rates<N>(
    series: &[HistoricalPoint],
    config: &ForecastConfig,
    noise: &mut N,
    now: DateTime<Utc>,
) -> Result<(GrowthRates, Vec<ForecastPoint>), AnalysisError>
where
    N: NoiseSource + ?Sized,
{
    let mut ordered = series.to_vec();
    ordered.sort_by_key(|point| point.date);

    let rates = growth_rates(&ordered, config)?;
    let last = match ordered.last() {
        Some(last) => *last,
        None => return Err(AnalysisError::insufficient_data("projection of an empty series")),
    };

    let dates = goal_dates(last.date, config.months_ahead).ok_or_else(|| {
        AnalysisError::insufficient_data("goal dates fall outside the supported calendar")
    })?;

    tracing::debug!(
        subscriber_rate = rates.subscribers,
        view_rate = rates.views,
        months = config.months_ahead,
        "Projecting channel growth"
    );

    let mut subscribers = last.subscribers;
    let mut views = last.views;
    let mut forecast = Vec::with_capacity(dates.len());

    for (i, goal_date) in dates.into_iter().enumerate() {
        if i > 0 {
            let subscriber_growth = noise.normal(rates.subscribers, config.rate_std_dev).max(0.0);
            let view_growth = noise.normal(rates.views, config.rate_std_dev).max(0.0);
            subscribers = (subscribers as f64 * (1.0 + subscriber_growth)).floor() as u64;
            views = (views as f64 * (1.0 + view_growth)).floor() as u64;
        }

        forecast.push(ForecastPoint {
            goal_date,
            days_until: days_until(goal_date, now),
            subscribers_prediction: subscribers,
            views_prediction: views,
        });
    }

    Ok((rates, forecast))
}

/// Date-indexed predictions, ready for plotting
pub fn chart_series(forecast: &[ForecastPoint]) -> BTreeMap<NaiveDate, PredictionValues> {
    forecast
        .iter()
        .map(|point| {
            (
                point.goal_date,
                PredictionValues {
                    subscribers: point.subscribers_prediction,
                    views: point.views_prediction,
                },
            )
        })
        .collect()
}
