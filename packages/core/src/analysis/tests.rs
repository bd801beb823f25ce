//! Tests for the channel analysis core
//!
//! Unit and property-based tests for pagination, history synthesis and the
//! growth projector.

use chrono::{DateTime, Duration, NaiveDate, TimeZone, Utc};
use proptest::prelude::*;

use crate::analysis::{
    collector::{collect_videos, fetch_video_details, fetch_video_ids},
    config::{CollectorConfig, ForecastConfig, HistoryConfig},
    error::AnalysisError,
    history::{get_series, synthesize_series},
    noise::{FixedNoise, RandomNoise},
    projector::{
        chart_series, clamp_rate, days_until, goal_dates, growth_rates, monthly_growth_rate, project,
        project_with_rates,
    },
    types::*,
};
use crate::cache::{CacheKey, SeriesCache};
use crate::services::mock_youtube::MockYouTubeClient;

fn today() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 6, 15).unwrap()
}

fn now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 6, 15, 12, 0, 0).unwrap()
}

fn series(first: (u64, u64), last: (u64, u64), last_date: NaiveDate) -> Vec<HistoricalPoint> {
    vec![
        HistoricalPoint {
            date: last_date - Duration::days(365),
            subscribers: first.0,
            views: first.1,
        },
        HistoricalPoint {
            date: last_date,
            subscribers: last.0,
            views: last.1,
        },
    ]
}

// =============================================================================
// Paginated collector
// =============================================================================

#[tokio::test]
async fn three_pages_then_exhaustion_yields_150_ids() {
    let provider = MockYouTubeClient::new().with_full_pages(3, 50);

    let ids = fetch_video_ids(&provider, "UC1", &CollectorConfig::default()).await;

    assert_eq!(ids.len(), 150);
    assert_eq!(provider.page_calls(), 3);
}

#[tokio::test]
async fn fourth_full_page_is_cut_at_cap() {
    let provider = MockYouTubeClient::new().with_full_pages(6, 50);

    let ids = fetch_video_ids(&provider, "UC1", &CollectorConfig::default()).await;

    assert_eq!(ids.len(), 200);
    assert_eq!(provider.page_calls(), 4);
}

#[tokio::test]
async fn cap_is_honoured_strictly_mid_page() {
    let provider = MockYouTubeClient::new().with_full_pages(3, 50);
    let config = CollectorConfig {
        cap: 120,
        ..CollectorConfig::default()
    };

    let ids = fetch_video_ids(&provider, "UC1", &config).await;

    assert_eq!(ids.len(), 120);
    assert_eq!(ids.last().map(String::as_str), Some("vid-119"));
}

#[tokio::test]
async fn failed_page_returns_partial_ids() {
    let provider = MockYouTubeClient::new()
        .with_full_pages(3, 50)
        .with_failing_page(1);

    let ids = fetch_video_ids(&provider, "UC1", &CollectorConfig::default()).await;

    assert_eq!(ids.len(), 50);
}

#[tokio::test]
async fn failure_on_first_page_yields_no_ids() {
    let provider = MockYouTubeClient::new()
        .with_full_pages(2, 50)
        .with_failing_page(0);

    assert!(fetch_video_ids(&provider, "UC1", &CollectorConfig::default()).await.is_empty());
}

#[tokio::test]
async fn details_are_requested_in_batches_of_fifty() {
    let provider = MockYouTubeClient::new();
    let ids: Vec<String> = (0..120).map(|i| format!("vid-{}", i)).collect();

    let records = fetch_video_details(&provider, &ids, &CollectorConfig::default()).await;

    assert_eq!(records.len(), 120);
    assert_eq!(provider.detail_batches(), vec![50, 50, 20]);
    assert_eq!(records[0].id, "vid-0");
    assert_eq!(records[119].id, "vid-119");
}

#[tokio::test]
async fn oversized_batch_setting_is_limited_to_api_maximum() {
    let provider = MockYouTubeClient::new();
    let ids: Vec<String> = (0..80).map(|i| format!("vid-{}", i)).collect();
    let config = CollectorConfig {
        batch_size: 500,
        ..CollectorConfig::default()
    };

    fetch_video_details(&provider, &ids, &config).await;

    assert_eq!(provider.detail_batches(), vec![50, 30]);
}

#[tokio::test]
async fn failed_batch_is_skipped_and_others_continue() {
    let provider = MockYouTubeClient::new().with_failing_batch(1);
    let ids: Vec<String> = (0..120).map(|i| format!("vid-{}", i)).collect();

    let records = fetch_video_details(&provider, &ids, &CollectorConfig::default()).await;

    assert_eq!(records.len(), 70);
    assert_eq!(provider.detail_batches().len(), 3);
    assert!(records.iter().all(|r| r.id != "vid-50"));
}

#[tokio::test]
async fn collect_videos_with_no_ids_skips_details() {
    let provider = MockYouTubeClient::new();

    let records = collect_videos(&provider, "UC1", &CollectorConfig::default()).await;

    assert!(records.is_empty());
    assert!(provider.detail_batches().is_empty());
}

// =============================================================================
// Historical series synthesizer
// =============================================================================

#[test]
fn synthesized_series_spans_days_through_today() {
    let totals = ChannelTotals {
        subscribers: 1_000,
        views: 100_000,
    };
    let points =
        synthesize_series(totals, today(), &HistoryConfig::default(), &mut FixedNoise::mean()).unwrap();

    assert_eq!(points.len(), 366);
    assert_eq!(points[0].date, today() - Duration::days(365));
    assert_eq!(points[365].date, today());
    assert_eq!(points[0].subscribers, 1_000);
    assert_eq!(points[0].views, 100_000);
    assert_eq!(points[10].subscribers, 1_000 + 10 * 100);
    assert_eq!(points[10].views, 100_000 + 10 * 5_000);
}

#[test]
fn synthesized_values_are_floored_at_zero() {
    let totals = ChannelTotals {
        subscribers: 50,
        views: 50,
    };
    let config = HistoryConfig {
        days: 5,
        ..HistoryConfig::default()
    };
    // subscriber steps of -100, view steps of +1
    let mut noise = FixedNoise::new(vec![-100.0, 1.0]);

    let points = synthesize_series(totals, today(), &config, &mut noise).unwrap();

    assert_eq!(points[0].subscribers, 50);
    assert!(points[1..].iter().all(|p| p.subscribers == 0));
    assert_eq!(points[5].views, 55);
}

#[test]
fn each_day_draws_its_own_step() {
    let totals = ChannelTotals {
        subscribers: 0,
        views: 0,
    };
    let config = HistoryConfig {
        days: 2,
        ..HistoryConfig::default()
    };
    let mut noise = FixedNoise::new(vec![10.0, 100.0, 20.0, 200.0, 30.0, 300.0]);

    let points = synthesize_series(totals, today(), &config, &mut noise).unwrap();

    assert_eq!(points[1].subscribers, 20);
    assert_eq!(points[1].views, 200);
    assert_eq!(points[2].subscribers, 60);
    assert_eq!(points[2].views, 600);
}

#[test]
fn window_before_earliest_date_is_an_error() {
    let totals = ChannelTotals {
        subscribers: 10,
        views: 10,
    };
    let config = HistoryConfig {
        days: 100_000_000,
        ..HistoryConfig::default()
    };

    let result = synthesize_series(totals, today(), &config, &mut FixedNoise::mean());

    assert!(matches!(result, Err(AnalysisError::HistoryWindow { days: 100_000_000 })));
}

#[tokio::test]
async fn fresh_cache_is_returned_without_api_call() {
    let dir = tempfile::tempdir().unwrap();
    let cache = SeriesCache::new(dir.path(), &CacheKey::Shared, 1);
    let cached = series((10, 20), (30, 40), today() - Duration::days(1));
    cache.set(&cached).unwrap();
    let provider = MockYouTubeClient::new().with_totals(1, 1);

    let result = get_series(&provider, "UC1", &cache, &HistoryConfig::default(), &mut FixedNoise::mean(), today())
        .await
        .unwrap();

    assert_eq!(result, cached);
    assert_eq!(provider.totals_calls(), 0);
}

#[tokio::test]
async fn stale_cache_is_regenerated_and_overwritten() {
    let dir = tempfile::tempdir().unwrap();
    let cache = SeriesCache::new(dir.path(), &CacheKey::Shared, 1);
    cache.set(&series((10, 20), (30, 40), today() - Duration::days(2))).unwrap();
    let provider = MockYouTubeClient::new().with_totals(500, 9_000);

    let result = get_series(&provider, "UC1", &cache, &HistoryConfig::default(), &mut FixedNoise::mean(), today())
        .await
        .unwrap();

    assert_eq!(provider.totals_calls(), 1);
    assert_eq!(result.len(), 366);
    assert_eq!(result[0].subscribers, 500);
    assert_eq!(cache.get(today()).unwrap(), Some(result));
}

#[tokio::test]
async fn corrupt_cache_triggers_regeneration() {
    let dir = tempfile::tempdir().unwrap();
    let cache = SeriesCache::new(dir.path(), &CacheKey::Shared, 1);
    std::fs::write(cache.path(), "garbage\n\"unterminated").unwrap();
    let provider = MockYouTubeClient::new().with_totals(500, 9_000);

    let result = get_series(&provider, "UC1", &cache, &HistoryConfig::default(), &mut FixedNoise::mean(), today())
        .await
        .unwrap();

    assert_eq!(result.len(), 366);
    assert_eq!(cache.get(today()).unwrap().unwrap(), result);
}

#[tokio::test]
async fn corrupt_cache_is_removed_even_when_regeneration_fails() {
    let dir = tempfile::tempdir().unwrap();
    let cache = SeriesCache::new(dir.path(), &CacheKey::Shared, 1);
    std::fs::write(cache.path(), "garbage\n\"unterminated").unwrap();
    let provider = MockYouTubeClient::new();

    let result = get_series(&provider, "UC1", &cache, &HistoryConfig::default(), &mut FixedNoise::mean(), today()).await;

    assert!(matches!(result, Err(AnalysisError::Provider(_))));
    assert!(!cache.path().exists());
    assert!(cache.get(today()).unwrap().is_none());
}

#[tokio::test]
async fn totals_failure_is_propagated() {
    let dir = tempfile::tempdir().unwrap();
    let cache = SeriesCache::new(dir.path(), &CacheKey::Shared, 1);
    let provider = MockYouTubeClient::new();

    let result = get_series(&provider, "UC1", &cache, &HistoryConfig::default(), &mut FixedNoise::mean(), today()).await;

    assert!(matches!(result, Err(AnalysisError::Provider(_))));
}

#[tokio::test]
async fn shared_cache_serves_other_channels_series() {
    let dir = tempfile::tempdir().unwrap();
    let cache = SeriesCache::new(dir.path(), &CacheKey::Shared, 1);
    let first = MockYouTubeClient::new().with_totals(100, 1_000);
    let second = MockYouTubeClient::new().with_totals(999, 9_999);

    let a = get_series(&first, "UC-A", &cache, &HistoryConfig::default(), &mut FixedNoise::mean(), today())
        .await
        .unwrap();
    let b = get_series(&second, "UC-B", &cache, &HistoryConfig::default(), &mut FixedNoise::mean(), today())
        .await
        .unwrap();

    assert_eq!(a, b);
    assert_eq!(second.totals_calls(), 0);
}

// =============================================================================
// Growth projector
// =============================================================================

#[test]
fn rate_uses_twelve_month_normalization() {
    let config = ForecastConfig::default();
    let rate = monthly_growth_rate(1_000, 2_000, Metric::Views, &config).unwrap();
    assert!((rate - (2f64.powf(1.0 / 12.0) - 1.0)).abs() < 1e-12);
}

#[test]
fn rates_are_clamped_to_band() {
    let config = ForecastConfig::default();
    assert_eq!(clamp_rate(-0.5, &config), 0.01);
    assert_eq!(clamp_rate(0.03, &config), 0.03);
    assert_eq!(clamp_rate(3.0, &config), 0.05);
}

#[test]
fn zero_first_value_is_degenerate() {
    let err = growth_rates(&series((0, 100), (10, 200), today()), &ForecastConfig::default()).unwrap_err();
    assert!(matches!(err, AnalysisError::DegenerateSeed { metric: Metric::Subscribers }));

    let err = growth_rates(&series((5, 0), (10, 200), today()), &ForecastConfig::default()).unwrap_err();
    assert!(matches!(err, AnalysisError::DegenerateSeed { metric: Metric::Views }));
}

#[test]
fn short_series_is_insufficient() {
    let single = vec![HistoricalPoint {
        date: today(),
        subscribers: 10,
        views: 10,
    }];

    let err = project(&single, &ForecastConfig::default(), &mut FixedNoise::mean(), now()).unwrap_err();
    assert!(matches!(err, AnalysisError::InsufficientData { .. }));

    let err = project(&[], &ForecastConfig::default(), &mut FixedNoise::mean(), now()).unwrap_err();
    assert!(matches!(err, AnalysisError::InsufficientData { .. }));
}

#[test]
fn goal_dates_start_first_of_next_month() {
    let dates = goal_dates(NaiveDate::from_ymd_opt(2024, 11, 30).unwrap(), 3).unwrap();
    assert_eq!(
        dates,
        vec![
            NaiveDate::from_ymd_opt(2024, 12, 1).unwrap(),
            NaiveDate::from_ymd_opt(2025, 1, 1).unwrap(),
            NaiveDate::from_ymd_opt(2025, 2, 1).unwrap(),
        ]
    );

    let dates = goal_dates(NaiveDate::from_ymd_opt(2024, 1, 31).unwrap(), 1).unwrap();
    assert_eq!(dates, vec![NaiveDate::from_ymd_opt(2024, 2, 1).unwrap()]);
}

#[test]
fn days_until_is_floored() {
    let goal = NaiveDate::from_ymd_opt(2024, 7, 1).unwrap();
    // 15 days and 12 hours ahead
    assert_eq!(days_until(goal, now()), 15);

    let past = NaiveDate::from_ymd_opt(2024, 6, 15).unwrap();
    // 12 hours behind
    assert_eq!(days_until(past, now()), -1);
}

#[test]
fn forecast_anchor_repeats_last_values() {
    let history = series((1_000, 50_000), (1_500, 80_000), today());
    let forecast = project(&history, &ForecastConfig::default(), &mut FixedNoise::mean(), now()).unwrap();

    assert_eq!(forecast.len(), 12);
    assert_eq!(forecast[0].goal_date, NaiveDate::from_ymd_opt(2024, 7, 1).unwrap());
    assert_eq!(forecast[0].subscribers_prediction, 1_500);
    assert_eq!(forecast[0].views_prediction, 80_000);
    assert_eq!(forecast[0].days_until, 15);
}

#[test]
fn growth_compounds_with_floor() {
    // 1.5x over the window is ~3.44% monthly, inside the band
    let history = series((1_000, 1_000), (1_500, 1_500), today());
    let config = ForecastConfig {
        months_ahead: 3,
        ..ForecastConfig::default()
    };
    let forecast = project(&history, &config, &mut FixedNoise::mean(), now()).unwrap();
    let rate = 1.5f64.powf(1.0 / 12.0) - 1.0;

    let second = (1_500.0 * (1.0 + rate)).floor() as u64;
    let third = (second as f64 * (1.0 + rate)).floor() as u64;
    assert_eq!(forecast[1].subscribers_prediction, second);
    assert_eq!(forecast[2].subscribers_prediction, third);
}

#[test]
fn negative_growth_draws_are_floored_to_zero() {
    let history = series((1_000, 1_000), (1_500, 1_500), today());
    let mut noise = FixedNoise::new(vec![-0.2]);

    let forecast = project(&history, &ForecastConfig::default(), &mut noise, now()).unwrap();

    assert!(forecast.iter().all(|p| p.subscribers_prediction == 1_500 && p.views_prediction == 1_500));
}

#[test]
fn unsorted_series_is_projected_from_latest_date() {
    let mut history = series((1_000, 2_000), (3_000, 4_000), today());
    history.reverse();

    let forecast = project(&history, &ForecastConfig::default(), &mut FixedNoise::mean(), now()).unwrap();

    assert_eq!(forecast[0].subscribers_prediction, 3_000);
    assert_eq!(forecast[0].views_prediction, 4_000);
}

#[test]
fn reported_rates_come_from_the_date_ordered_series() {
    let ordered = series((1_000, 2_000), (3_000, 4_000), today());
    let mut reversed = ordered.clone();
    reversed.reverse();
    let config = ForecastConfig::default();

    let (rates, forecast) = project_with_rates(&reversed, &config, &mut FixedNoise::mean(), now()).unwrap();

    assert_eq!(rates, growth_rates(&ordered, &config).unwrap());
    assert_eq!(rates.subscribers, config.max_rate);
    assert_eq!(forecast[1].subscribers_prediction, 3_150);
}

#[test]
fn zero_months_yields_empty_forecast() {
    let history = series((1_000, 2_000), (3_000, 4_000), today());
    let config = ForecastConfig {
        months_ahead: 0,
        ..ForecastConfig::default()
    };

    assert!(project(&history, &config, &mut FixedNoise::mean(), now()).unwrap().is_empty());
}

#[test]
fn chart_series_indexes_by_goal_date() {
    let history = series((1_000, 2_000), (3_000, 4_000), today());
    let forecast = project(&history, &ForecastConfig::default(), &mut FixedNoise::mean(), now()).unwrap();

    let chart = chart_series(&forecast);

    assert_eq!(chart.len(), 12);
    let first = chart.get(&NaiveDate::from_ymd_opt(2024, 7, 1).unwrap()).unwrap();
    assert_eq!(first.subscribers, 3_000);
    assert_eq!(first.views, 4_000);
}

// =============================================================================
// PROPERTY-BASED TESTS
// =============================================================================

proptest! {
    #[test]
    fn prop_clamped_rate_stays_in_band(first in 1u64..u64::MAX / 2, last in 0u64..u64::MAX / 2) {
        let config = ForecastConfig::default();
        let history = series((first, first), (last, last), today());

        let rates = growth_rates(&history, &config).unwrap();

        prop_assert!(rates.subscribers >= 0.01 && rates.subscribers <= 0.05);
        prop_assert!(rates.views >= 0.01 && rates.views <= 0.05);
    }

    #[test]
    fn prop_forecast_length_and_anchor(
        first in (1u64..1_000_000, 1u64..100_000_000),
        last in (0u64..10_000_000, 0u64..1_000_000_000),
        months in 1usize..36,
        seed in any::<u64>(),
    ) {
        let history = series(first, last, today());
        let config = ForecastConfig { months_ahead: months, ..ForecastConfig::default() };
        let mut noise = RandomNoise::seeded(seed);

        let forecast = project(&history, &config, &mut noise, now()).unwrap();

        prop_assert_eq!(forecast.len(), months);
        prop_assert_eq!(forecast[0].subscribers_prediction, last.0);
        prop_assert_eq!(forecast[0].views_prediction, last.1);
    }

    #[test]
    fn prop_forecast_never_decreases(
        first in (1u64..1_000_000, 1u64..100_000_000),
        last in (0u64..10_000_000, 0u64..1_000_000_000),
        seed in any::<u64>(),
    ) {
        let history = series(first, last, today());
        let mut noise = RandomNoise::seeded(seed);

        let forecast = project(&history, &ForecastConfig::default(), &mut noise, now()).unwrap();

        for pair in forecast.windows(2) {
            prop_assert!(pair[1].subscribers_prediction >= pair[0].subscribers_prediction);
            prop_assert!(pair[1].views_prediction >= pair[0].views_prediction);
            prop_assert!(pair[1].goal_date > pair[0].goal_date);
        }
    }

    #[test]
    fn prop_zero_growth_is_a_fixed_point(
        last in (0u64..10_000_000, 0u64..1_000_000_000),
        months in 1usize..24,
    ) {
        let history = series((1, 1), last, today());
        let config = ForecastConfig { months_ahead: months, ..ForecastConfig::default() };
        let mut noise = FixedNoise::new(vec![0.0]);

        let forecast = project(&history, &config, &mut noise, now()).unwrap();

        for point in &forecast {
            prop_assert_eq!(point.subscribers_prediction, last.0);
            prop_assert_eq!(point.views_prediction, last.1);
        }
    }

    #[test]
    fn prop_synthesized_series_is_anchored(
        subscribers in 0u64..10_000_000,
        views in 0u64..1_000_000_000,
        days in 1u32..400,
        seed in any::<u64>(),
    ) {
        let totals = ChannelTotals { subscribers, views };
        let config = HistoryConfig { days, ..HistoryConfig::default() };
        let mut noise = RandomNoise::seeded(seed);

        let points = synthesize_series(totals, today(), &config, &mut noise).unwrap();

        prop_assert_eq!(points.len(), days as usize + 1);
        prop_assert_eq!(points[0].subscribers, subscribers);
        prop_assert_eq!(points[0].views, views);
        prop_assert_eq!(points[points.len() - 1].date, today());
        for pair in points.windows(2) {
            prop_assert_eq!(pair[1].date - pair[0].date, Duration::days(1));
        }
    }
}
