//! Paginated video collector
//!
//! Follows listing continuation tokens to gather a channel's video ids, then
//! resolves them to full records in API-sized batches. Both stages keep
//! whatever they managed to fetch when a request fails.

use crate::analysis::{
    config::{CollectorConfig, MAX_BATCH_SIZE},
    provider::ChannelDataProvider,
    types::VideoRecord,
};

/// Collect up to `config.cap` video ids for a channel.
///
/// Stops when the listing reports no continuation token or the cap is
/// reached; ids beyond the cap are dropped. A failed page request ends
/// collection early and the ids gathered so far are returned.
pub async fn fetch_video_ids<P>(
    provider: &P,
    channel_id: &str,
    config: &CollectorConfig,
) -> Vec<String>
where
    P: ChannelDataProvider + ?Sized,
{
    let mut video_ids: Vec<String> = Vec::new();
    let mut page_token: Option<String> = None;
    let mut page = 0usize;
    let page_size = config.max_results.clamp(1, MAX_BATCH_SIZE as u32);

    loop {
        let response = match provider
            .fetch_video_id_page(channel_id, page_size, page_token.as_deref())
            .await
        {
            Ok(response) => response,
            Err(err) => {
                tracing::warn!(
                    channel_id,
                    page,
                    "Failed to fetch video ids, keeping {} collected so far: {}",
                    video_ids.len(),
                    err
                );
                break;
            }
        };

        video_ids.extend(response.video_ids);
        page += 1;

        if video_ids.len() >= config.cap {
            video_ids.truncate(config.cap);
            break;
        }

        match response.next_page_token {
            Some(token) if !token.is_empty() => page_token = Some(token),
            _ => break,
        }
    }

    tracing::debug!(channel_id, pages = page, "Collected {} video ids", video_ids.len());
    video_ids
}

/// Resolve video ids to records, one request per batch of at most 50 ids.
///
/// A failed batch is logged and skipped; remaining batches are still fetched.
pub async fn fetch_video_details<P>(
    provider: &P,
    video_ids: &[String],
    config: &CollectorConfig,
) -> Vec<VideoRecord>
where
    P: ChannelDataProvider + ?Sized,
{
    let batch_size = config.batch_size.clamp(1, MAX_BATCH_SIZE);
    let mut records = Vec::with_capacity(video_ids.len());

    for (batch, ids) in video_ids.chunks(batch_size).enumerate() {
        match provider.fetch_video_details(ids).await {
            Ok(batch_records) => records.extend(batch_records),
            Err(err) => {
                tracing::warn!(batch, size = ids.len(), "Failed to fetch video details: {}", err);
            }
        }
    }

    records
}

/// Collect ids and resolve them in one go
pub async fn collect_videos<P>(
    provider: &P,
    channel_id: &str,
    config: &CollectorConfig,
) -> Vec<VideoRecord>
where
    P: ChannelDataProvider + ?Sized,
{
    let ids = fetch_video_ids(provider, channel_id, config).await;
    if ids.is_empty() {
        return Vec::new();
    }
    fetch_video_details(provider, &ids, config).await
}
