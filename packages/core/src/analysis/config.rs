//! Configuration for the channel analysis core

use serde::{Deserialize, Serialize};

/// Configuration for all analysis components
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AnalysisConfig {
    pub collector: CollectorConfig,
    pub history: HistoryConfig,
    pub forecast: ForecastConfig,
}

/// Pagination tuning for the video collector
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CollectorConfig {
    /// Page size requested from the listing endpoint, clamped to 1..=50
    pub max_results: u32,
    /// Upper bound on the number of ids collected
    pub cap: usize,
    /// Ids per details request; the API rejects more than 50
    pub batch_size: usize,
}

/// Mean and standard deviation of a normal draw
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct NormalParams {
    pub mean: f64,
    pub std_dev: f64,
}

/// Configuration for the historical series synthesizer
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HistoryConfig {
    pub days: u32,
    pub subscriber_step: NormalParams,
    pub view_step: NormalParams,
    /// A cached series older than this many days is regenerated
    pub max_age_days: i64,
}

/// Configuration for the growth projector
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ForecastConfig {
    pub months_ahead: usize,
    pub min_rate: f64,
    pub max_rate: f64,
    pub rate_std_dev: f64,
    /// Months the historical window is assumed to span, whatever its length
    pub normalization_months: f64,
}

pub const MAX_BATCH_SIZE: usize = 50;

impl Default for CollectorConfig {
    fn default() -> Self {
        Self {
            max_results: 50,
            cap: 200,
            batch_size: MAX_BATCH_SIZE,
        }
    }
}

impl Default for HistoryConfig {
    fn default() -> Self {
        Self {
            days: 365,
            subscriber_step: NormalParams {
                mean: 100.0,
                std_dev: 20.0,
            },
            view_step: NormalParams {
                mean: 5000.0,
                std_dev: 1000.0,
            },
            max_age_days: 1,
        }
    }
}

impl Default for ForecastConfig {
    fn default() -> Self {
        Self {
            months_ahead: 12,
            min_rate: 0.01,
            max_rate: 0.05,
            rate_std_dev: 0.01,
            normalization_months: 12.0,
        }
    }
}
