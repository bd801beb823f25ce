//! Historical series synthesizer
//!
//! The platform exposes no subscriber/view history, so a daily series is
//! synthesized from the channel's current totals with a bounded random walk
//! and cached for reuse until it goes stale.

use chrono::{Duration, NaiveDate};

use crate::analysis::{
    config::HistoryConfig,
    error::AnalysisError,
    noise::NoiseSource,
    provider::ChannelDataProvider,
    types::{ChannelTotals, HistoricalPoint},
};
use crate::cache::SeriesCache;

/// Build a daily series from `today - days` through `today` inclusive.
///
/// Day `i` (zero-based) holds `max(0, initial + i * step)` for each metric,
/// where every step is an independent normal draw. The first point equals
/// `totals` exactly. Fails when the window would start before the earliest
/// representable date.
pub fn synthesize_series<N>(
    totals: ChannelTotals,
    today: NaiveDate,
    config: &HistoryConfig,
    noise: &mut N,
) -> Result<Vec<HistoricalPoint>, AnalysisError>
where
    N: NoiseSource + ?Sized,
{
    let days = i64::from(config.days);
    let start = Duration::try_days(days)
        .and_then(|span| today.checked_sub_signed(span))
        .ok_or(AnalysisError::HistoryWindow { days: config.days })?;

    let series = (0..=days)
        .map(|i| {
            let subscriber_step =
                noise.normal(config.subscriber_step.mean, config.subscriber_step.std_dev);
            let view_step = noise.normal(config.view_step.mean, config.view_step.std_dev);
            let offset = i as f64;

            HistoricalPoint {
                date: start + Duration::days(i),
                subscribers: (totals.subscribers as f64 + offset * subscriber_step).max(0.0) as u64,
                views: (totals.views as f64 + offset * view_step).max(0.0) as u64,
            }
        })
        .collect();

    Ok(series)
}

/// Return the cached series when fresh, otherwise regenerate and persist it.
///
/// An unreadable cache is removed and regenerated. A failed write is logged;
/// the freshly generated series is still returned.
pub async fn get_series<P, N>(
    provider: &P,
    channel_id: &str,
    cache: &SeriesCache,
    config: &HistoryConfig,
    noise: &mut N,
    today: NaiveDate,
) -> Result<Vec<HistoricalPoint>, AnalysisError>
where
    P: ChannelDataProvider + ?Sized,
    N: NoiseSource + ?Sized,
{
    match cache.get(today) {
        Ok(Some(series)) => {
            tracing::debug!(path = %cache.path().display(), "Using cached channel history");
            return Ok(series);
        }
        Ok(None) => {}
        Err(err) => {
            tracing::warn!("Discarding unreadable history cache: {}", err);
            if let Err(err) = cache.invalidate() {
                tracing::warn!("Failed to remove history cache: {}", err);
            }
        }
    }

    let totals = provider.fetch_channel_totals(channel_id).await?;
    let series = synthesize_series(totals, today, config, noise)?;

    tracing::info!(
        channel_id,
        points = series.len(),
        "Regenerated channel history"
    );

    if let Err(err) = cache.set(&series) {
        tracing::warn!("Failed to persist channel history: {}", err);
    }

    Ok(series)
}
