use std::env;
use std::path::PathBuf;
use std::str::FromStr;

use crate::analysis::AnalysisConfig;
use crate::cli::Cli;
use crate::report::ReportSettings;
use crate::services::youtube::DEFAULT_API_URL;

/// Longest synthesized history accepted, roughly ten years
pub const MAX_HISTORY_DAYS: u32 = 3_650;

#[derive(Debug, Clone)]
pub struct Config {
    pub api_key: Option<String>,
    pub api_url: String,
    pub cache_dir: PathBuf,
    pub per_channel_cache: bool,
    pub history_days: u32,
    pub forecast_months: usize,
    pub max_results: u32,
    pub video_cap: usize,
}

impl Config {
    pub fn from_env() -> Result<Self, String> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Build from any variable source; unset optional values take defaults.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, String>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = AnalysisConfig::default();

        let api_key = lookup("YOUTUBE_API_KEY").filter(|key| !key.trim().is_empty());
        let api_url = lookup("YOUTUBE_API_URL").unwrap_or_else(|| DEFAULT_API_URL.to_string());
        let cache_dir = lookup("CACHE_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from("data"));

        let per_channel_cache = match lookup("CACHE_PER_CHANNEL") {
            None => false,
            Some(value) => match value.to_ascii_lowercase().as_str() {
                "1" | "true" | "yes" => true,
                "0" | "false" | "no" => false,
                other => return Err(format!("Invalid CACHE_PER_CHANNEL: {}", other)),
            },
        };

        let history_days = parse_or(&lookup, "HISTORY_DAYS", defaults.history.days)?;
        check_history_days("HISTORY_DAYS", history_days)?;

        Ok(Self {
            api_key,
            api_url,
            cache_dir,
            per_channel_cache,
            history_days,
            forecast_months: parse_or(&lookup, "FORECAST_MONTHS", defaults.forecast.months_ahead)?,
            max_results: parse_or(&lookup, "MAX_RESULTS", defaults.collector.max_results)?,
            video_cap: parse_or(&lookup, "VIDEO_CAP", defaults.collector.cap)?,
        })
    }

    /// Command-line values win over the environment.
    pub fn apply_cli(&mut self, cli: &Cli) -> Result<(), String> {
        if let Some(key) = &cli.api_key {
            self.api_key = Some(key.clone());
        }
        if let Some(url) = &cli.api_url {
            self.api_url = url.clone();
        }
        if let Some(dir) = &cli.cache_dir {
            self.cache_dir = dir.clone();
        }
        if cli.per_channel_cache {
            self.per_channel_cache = true;
        }
        if let Some(days) = cli.days {
            check_history_days("--days", days)?;
            self.history_days = days;
        }
        if let Some(months) = cli.months {
            self.forecast_months = months;
        }
        if let Some(max_results) = cli.max_results {
            self.max_results = max_results;
        }
        if let Some(cap) = cli.cap {
            self.video_cap = cap;
        }
        Ok(())
    }

    pub fn require_api_key(&self) -> Result<&str, String> {
        self.api_key
            .as_deref()
            .ok_or_else(|| "YOUTUBE_API_KEY is required (or pass --api-key)".to_string())
    }

    pub fn report_settings(&self) -> ReportSettings {
        let mut analysis = AnalysisConfig::default();
        analysis.collector.max_results = self.max_results;
        analysis.collector.cap = self.video_cap;
        analysis.history.days = self.history_days;
        analysis.forecast.months_ahead = self.forecast_months;

        ReportSettings {
            analysis,
            cache_dir: self.cache_dir.clone(),
            per_channel_cache: self.per_channel_cache,
            ..ReportSettings::default()
        }
    }
}

fn parse_or<F, T>(lookup: &F, name: &str, default: T) -> Result<T, String>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
{
    match lookup(name) {
        None => Ok(default),
        Some(raw) => raw
            .trim()
            .parse::<T>()
            .map_err(|_| format!("{} must be a valid number", name)),
    }
}

fn check_history_days(name: &str, days: u32) -> Result<(), String> {
    if days == 0 || days > MAX_HISTORY_DAYS {
        return Err(format!("{} must be between 1 and {}", name, MAX_HISTORY_DAYS));
    }
    Ok(())
}
