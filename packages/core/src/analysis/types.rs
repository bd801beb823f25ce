//! Core data types for channel analysis

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// Summary of a channel as returned by a handle lookup
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChannelSummary {
    pub id: String,
    pub title: String,
    pub handle: String,
    pub url: String,
    pub subscriber_count: u64,
    pub view_count: u64,
    pub video_count: u64,
}

/// Current subscriber/view totals used to anchor a synthesized history
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChannelTotals {
    pub subscribers: u64,
    pub views: u64,
}

/// A single uploaded video with its public statistics
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VideoRecord {
    pub id: String,
    pub title: String,
    pub published_at: DateTime<Utc>,
    pub view_count: u64,
    pub like_count: u64,
    pub comment_count: u64,
    /// ISO-8601 duration exactly as reported, e.g. `PT4M13S`
    pub duration: String,
}

/// One page of video ids from a channel listing
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VideoIdPage {
    pub video_ids: Vec<String>,
    pub next_page_token: Option<String>,
}

/// A day of (synthesized) channel history
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoricalPoint {
    pub date: NaiveDate,
    pub subscribers: u64,
    pub views: u64,
}

/// A month of projected channel growth.
///
/// The first point of a forecast is an anchor: it carries the last
/// historical values but is labelled with the first future goal date.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ForecastPoint {
    pub goal_date: NaiveDate,
    /// Whole days from the evaluation instant to `goal_date` (floored)
    pub days_until: i64,
    pub subscribers_prediction: u64,
    pub views_prediction: u64,
}

/// Predicted values for a single goal date, as plotted
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PredictionValues {
    pub subscribers: u64,
    pub views: u64,
}

/// Which metric a growth rate or error refers to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Metric {
    Subscribers,
    Views,
}

impl std::fmt::Display for Metric {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Metric::Subscribers => write!(f, "subscribers"),
            Metric::Views => write!(f, "views"),
        }
    }
}

/// Clamped monthly growth rates derived from a historical series
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GrowthRates {
    pub subscribers: f64,
    pub views: f64,
}

/// Distribution of per-video view counts
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ViewStats {
    pub min: u64,
    pub median: f64,
    pub mean: f64,
    pub max: u64,
}

/// Number of uploads on one day of the week
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WeekdayCount {
    pub day: String,
    pub count: usize,
}
