//! One dashboard query, end to end.
//!
//! Resolves the channel, then runs each analysis in turn. Only the channel
//! lookup can fail the whole report: collection keeps partial results, and
//! a failed history or forecast is recorded as a warning so the rest of the
//! report still renders.

use std::collections::{BTreeMap, HashMap};
use std::path::PathBuf;

use chrono::{DateTime, NaiveDate, Utc};
use serde::Serialize;

use crate::analysis::{
    collector, history, projector, tokenizer, videos, AnalysisConfig, AnalysisError,
    ChannelDataProvider, ChannelSummary, ForecastPoint, GrowthRates, HistoricalPoint,
    NoiseSource, PredictionValues, VideoRecord, ViewStats, WeekdayCount,
};
use crate::cache::{CacheKey, SeriesCache};

/// Everything a report run needs besides the provider and noise source
#[derive(Debug, Clone)]
pub struct ReportSettings {
    pub analysis: AnalysisConfig,
    pub cache_dir: PathBuf,
    pub per_channel_cache: bool,
    pub top_videos: usize,
    pub top_words: usize,
}

impl Default for ReportSettings {
    fn default() -> Self {
        Self {
            analysis: AnalysisConfig::default(),
            cache_dir: PathBuf::from("data"),
            per_channel_cache: false,
            top_videos: 10,
            top_words: 20,
        }
    }
}

impl ReportSettings {
    pub fn series_cache(&self, channel_id: &str) -> SeriesCache {
        let key = if self.per_channel_cache {
            CacheKey::Channel(channel_id.to_string())
        } else {
            CacheKey::Shared
        };
        SeriesCache::new(&self.cache_dir, &key, self.analysis.history.max_age_days)
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ChannelReport {
    pub channel: ChannelSummary,
    pub videos: Vec<VideoRecord>,
    pub top_videos: Vec<VideoRecord>,
    pub view_stats: Option<ViewStats>,
    pub word_frequencies: HashMap<String, usize>,
    pub top_words: Vec<(String, usize)>,
    pub upload_schedule: Vec<WeekdayCount>,
    pub history: Vec<HistoricalPoint>,
    pub growth_rates: Option<GrowthRates>,
    pub forecast: Option<Vec<ForecastPoint>>,
    pub chart: BTreeMap<NaiveDate, PredictionValues>,
    pub warnings: Vec<String>,
}

pub async fn build_report<P, N>(
    provider: &P,
    handle: &str,
    settings: &ReportSettings,
    noise: &mut N,
    now: DateTime<Utc>,
) -> Result<ChannelReport, AnalysisError>
where
    P: ChannelDataProvider + ?Sized,
    N: NoiseSource + ?Sized,
{
    let channel = provider
        .find_channel(handle)
        .await?
        .ok_or_else(|| AnalysisError::channel_not_found(handle))?;

    tracing::info!(
        channel_id = %channel.id,
        provider = provider.provider_name(),
        "Channel found: {}",
        channel.title
    );

    let mut warnings = Vec::new();

    let videos = collector::collect_videos(provider, &channel.id, &settings.analysis.collector).await;
    if videos.is_empty() {
        warnings.push("No video data available for analysis.".to_string());
    }

    let titles: Vec<&str> = videos.iter().map(|video| video.title.as_str()).collect();
    let words = tokenizer::tokenize(&titles);
    let word_frequencies = tokenizer::word_frequencies(&words);
    let top_words = tokenizer::top_words(&word_frequencies, settings.top_words);

    let cache = settings.series_cache(&channel.id);
    let history = match history::get_series(
        provider,
        &channel.id,
        &cache,
        &settings.analysis.history,
        noise,
        now.date_naive(),
    )
    .await
    {
        Ok(series) => series,
        Err(err) => {
            tracing::error!("Failed to build channel history: {}", err);
            warnings.push(format!("Unable to generate predictions: {}", err));
            Vec::new()
        }
    };

    let (growth_rates, forecast) = if history.is_empty() {
        (None, None)
    } else {
        let forecast_config = &settings.analysis.forecast;
        match projector::project_with_rates(&history, forecast_config, noise, now) {
            Ok((rates, forecast)) => (Some(rates), Some(forecast)),
            Err(err) => {
                tracing::error!("Failed to project channel growth: {}", err);
                warnings.push(format!("Unable to generate predictions: {}", err));
                (None, None)
            }
        }
    };

    let chart = forecast
        .as_deref()
        .map(projector::chart_series)
        .unwrap_or_default();

    Ok(ChannelReport {
        top_videos: videos::top_videos(&videos, settings.top_videos),
        view_stats: videos::view_stats(&videos),
        upload_schedule: videos::upload_schedule(&videos),
        channel,
        videos,
        word_frequencies,
        top_words,
        history,
        growth_rates,
        forecast,
        chart,
        warnings,
    })
}
