//! Scripted in-memory provider for tests.
//!
//! Pages of video ids are served in order, chained with synthetic
//! `page-N` continuation tokens. Details are generated per id unless a
//! batch is scripted to fail.

use std::collections::HashSet;
use std::sync::Mutex;

use async_trait::async_trait;
use chrono::{TimeZone, Utc};

use crate::analysis::{
    error::ProviderError,
    provider::{ChannelDataProvider, ProviderResult},
    types::{ChannelSummary, ChannelTotals, VideoIdPage, VideoRecord},
};

#[derive(Default)]
pub struct MockYouTubeClient {
    channel: Option<ChannelSummary>,
    totals: Option<ChannelTotals>,
    pages: Vec<Vec<String>>,
    failing_page: Option<usize>,
    failing_batches: HashSet<usize>,
    error: Option<ProviderError>,
    page_calls: Mutex<usize>,
    detail_calls: Mutex<Vec<usize>>,
    totals_calls: Mutex<usize>,
}

impl MockYouTubeClient {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_channel(mut self, channel: ChannelSummary) -> Self {
        self.channel = Some(channel);
        self
    }

    pub fn with_totals(mut self, subscribers: u64, views: u64) -> Self {
        self.totals = Some(ChannelTotals { subscribers, views });
        self
    }

    pub fn with_pages(mut self, pages: Vec<Vec<String>>) -> Self {
        self.pages = pages;
        self
    }

    /// `count` full pages of `size` ids each, named `vid-<n>`
    pub fn with_full_pages(self, count: usize, size: usize) -> Self {
        let pages: Vec<Vec<String>> = (0..count)
            .map(|page| (0..size).map(|i| format!("vid-{}", page * size + i)).collect())
            .collect();
        self.with_pages(pages)
    }

    pub fn with_failing_page(mut self, index: usize) -> Self {
        self.failing_page = Some(index);
        self
    }

    pub fn with_failing_batch(mut self, index: usize) -> Self {
        self.failing_batches.insert(index);
        self
    }

    /// Every call fails with `error`
    pub fn with_error(mut self, error: ProviderError) -> Self {
        self.error = Some(error);
        self
    }

    pub fn page_calls(&self) -> usize {
        self.page_calls.lock().map(|calls| *calls).unwrap_or(0)
    }

    /// Sizes of the detail batches requested so far
    pub fn detail_batches(&self) -> Vec<usize> {
        self.detail_calls.lock().map(|calls| calls.clone()).unwrap_or_default()
    }

    pub fn totals_calls(&self) -> usize {
        self.totals_calls.lock().map(|calls| *calls).unwrap_or(0)
    }

    fn check_error(&self) -> ProviderResult<()> {
        match &self.error {
            Some(err) => Err(err.clone()),
            None => Ok(()),
        }
    }

    /// Deterministic record for an id: views grow with the id's index
    pub fn record_for(id: &str) -> VideoRecord {
        let index: u64 = id
            .rsplit('-')
            .next()
            .and_then(|n| n.parse().ok())
            .unwrap_or(0);
        VideoRecord {
            id: id.to_string(),
            title: format!("Episode {} highlights", index),
            published_at: Utc
                .timestamp_opt(1_704_067_200 + (index as i64) * 86_400, 0)
                .single()
                .unwrap_or_else(Utc::now),
            view_count: 1_000 + index * 10,
            like_count: index,
            comment_count: index / 2,
            duration: "PT10M".to_string(),
        }
    }
}

#[async_trait]
impl ChannelDataProvider for MockYouTubeClient {
    async fn find_channel(&self, _handle: &str) -> ProviderResult<Option<ChannelSummary>> {
        self.check_error()?;
        Ok(self.channel.clone())
    }

    async fn fetch_channel_totals(&self, _channel_id: &str) -> ProviderResult<ChannelTotals> {
        self.check_error()?;
        if let Ok(mut calls) = self.totals_calls.lock() {
            *calls += 1;
        }
        self.totals
            .ok_or_else(|| ProviderError::format("no totals scripted"))
    }

    async fn fetch_video_id_page(
        &self,
        _channel_id: &str,
        _max_results: u32,
        page_token: Option<&str>,
    ) -> ProviderResult<VideoIdPage> {
        self.check_error()?;
        if let Ok(mut calls) = self.page_calls.lock() {
            *calls += 1;
        }

        let index = match page_token {
            None => 0,
            Some(token) => token
                .strip_prefix("page-")
                .and_then(|n| n.parse::<usize>().ok())
                .ok_or_else(|| ProviderError::format(format!("unknown page token {}", token)))?,
        };

        if self.failing_page == Some(index) {
            return Err(ProviderError::ServiceUnavailable);
        }

        let video_ids = self.pages.get(index).cloned().unwrap_or_default();
        let next_page_token = (index + 1 < self.pages.len()).then(|| format!("page-{}", index + 1));

        Ok(VideoIdPage {
            video_ids,
            next_page_token,
        })
    }

    async fn fetch_video_details(&self, video_ids: &[String]) -> ProviderResult<Vec<VideoRecord>> {
        self.check_error()?;
        let batch = match self.detail_calls.lock() {
            Ok(mut calls) => {
                calls.push(video_ids.len());
                calls.len() - 1
            }
            Err(_) => 0,
        };

        if self.failing_batches.contains(&batch) {
            return Err(ProviderError::network(format!("batch {} failed", batch)));
        }

        Ok(video_ids.iter().map(|id| Self::record_for(id)).collect())
    }

    fn provider_name(&self) -> &str {
        "Mock"
    }
}
