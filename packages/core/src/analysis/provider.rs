//! Channel Data Provider Interface
//!
//! Abstraction over the video platform's data API, so the analysis core
//! never constructs a client or reads a credential itself.

use async_trait::async_trait;

use crate::analysis::{
    error::ProviderError,
    types::{ChannelSummary, ChannelTotals, VideoIdPage, VideoRecord},
};

/// Trait for channel data sources
#[async_trait]
pub trait ChannelDataProvider {
    /// Look up a channel by its public handle (with or without a leading `@`).
    /// `Ok(None)` means the API answered but knows no such channel.
    async fn find_channel(&self, handle: &str) -> ProviderResult<Option<ChannelSummary>>;

    /// Current subscriber and view totals for a channel id
    async fn fetch_channel_totals(&self, channel_id: &str) -> ProviderResult<ChannelTotals>;

    /// One page of the channel's video ids
    async fn fetch_video_id_page(
        &self,
        channel_id: &str,
        max_results: u32,
        page_token: Option<&str>,
    ) -> ProviderResult<VideoIdPage>;

    /// Details for a batch of at most 50 video ids
    async fn fetch_video_details(&self, video_ids: &[String]) -> ProviderResult<Vec<VideoRecord>>;

    /// Get the name of this provider for logging/debugging
    fn provider_name(&self) -> &str;
}

/// Result type for provider operations
pub type ProviderResult<T> = Result<T, ProviderError>;
