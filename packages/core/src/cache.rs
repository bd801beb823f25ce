use std::fs;
use std::path::{Path, PathBuf};

use chrono::NaiveDate;

use crate::analysis::{error::AnalysisError, types::HistoricalPoint};

const CACHE_FILE_STEM: &str = "channel_data";

/// Which cache file a series is stored under.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CacheKey {
    /// One file shared by every channel queried from this directory.
    Shared,
    /// One file per channel id.
    Channel(String),
}

impl CacheKey {
    pub fn file_name(&self) -> String {
        match self {
            CacheKey::Shared => format!("{}.csv", CACHE_FILE_STEM),
            CacheKey::Channel(id) => {
                let safe: String = id
                    .chars()
                    .map(|c| if c.is_ascii_alphanumeric() || c == '-' || c == '_' { c } else { '_' })
                    .collect();
                format!("{}_{}.csv", CACHE_FILE_STEM, safe)
            }
        }
    }
}

/// File-backed cache for a single historical series (`date,subscribers,views`).
pub struct SeriesCache {
    path: PathBuf,
    max_age_days: i64,
}

impl SeriesCache {
    pub fn new(dir: impl AsRef<Path>, key: &CacheKey, max_age_days: i64) -> Self {
        Self {
            path: dir.as_ref().join(key.file_name()),
            max_age_days,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Returns the cached series only when it is still fresh on `today`.
    pub fn get(&self, today: NaiveDate) -> Result<Option<Vec<HistoricalPoint>>, AnalysisError> {
        match self.load()? {
            Some(series) if self.is_fresh(&series, today) => Ok(Some(series)),
            _ => Ok(None),
        }
    }

    /// Overwrites the cache file with `series`.
    pub fn set(&self, series: &[HistoricalPoint]) -> Result<(), AnalysisError> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).map_err(|err| AnalysisError::cache(err.to_string()))?;
        }

        let mut writer =
            csv::Writer::from_path(&self.path).map_err(|err| AnalysisError::cache(err.to_string()))?;
        for point in series {
            writer
                .serialize(point)
                .map_err(|err| AnalysisError::cache(err.to_string()))?;
        }
        writer.flush().map_err(|err| AnalysisError::cache(err.to_string()))?;
        Ok(())
    }

    pub fn invalidate(&self) -> Result<(), AnalysisError> {
        match fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(err) => Err(AnalysisError::cache(err.to_string())),
        }
    }

    /// Fresh when the last point is at most `max_age_days` calendar days old.
    pub fn is_fresh(&self, series: &[HistoricalPoint], today: NaiveDate) -> bool {
        match series.last() {
            Some(last) => (today - last.date).num_days() <= self.max_age_days,
            None => false,
        }
    }

    fn load(&self) -> Result<Option<Vec<HistoricalPoint>>, AnalysisError> {
        if !self.path.exists() {
            return Ok(None);
        }

        let mut reader =
            csv::Reader::from_path(&self.path).map_err(|err| AnalysisError::cache(err.to_string()))?;
        let series = reader
            .deserialize::<HistoricalPoint>()
            .collect::<Result<Vec<_>, _>>()
            .map_err(|err| AnalysisError::cache(format!("{}: {}", self.path.display(), err)))?;

        Ok(Some(series))
    }
}
