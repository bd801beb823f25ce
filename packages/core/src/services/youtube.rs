use async_trait::async_trait;
use chrono::{DateTime, Utc};
use reqwest::{Client, StatusCode};
use serde::de::DeserializeOwned;
use serde::Deserialize;

use crate::analysis::{
    error::ProviderError,
    provider::{ChannelDataProvider, ProviderResult},
    types::{ChannelSummary, ChannelTotals, VideoIdPage, VideoRecord},
};

pub const DEFAULT_API_URL: &str = "https://www.googleapis.com/youtube/v3";
const CHANNEL_URL_PREFIX: &str = "https://www.youtube.com/@";

/// Client for the YouTube Data API v3. The API key is bound at construction
/// and sent with every request.
#[derive(Clone)]
pub struct YouTubeClient {
    base_url: String,
    api_key: String,
    http: Client,
}

impl YouTubeClient {
    pub fn new(base_url: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            api_key: api_key.into(),
            http: Client::new(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }
}

#[derive(Debug, Deserialize)]
struct ListResponse<T> {
    #[serde(default = "Vec::new")]
    items: Vec<T>,
    #[serde(rename = "nextPageToken")]
    next_page_token: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ChannelItem {
    id: String,
    snippet: Option<ChannelSnippet>,
    statistics: Option<ChannelStatistics>,
}

#[derive(Debug, Deserialize)]
struct ChannelSnippet {
    title: String,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ChannelStatistics {
    subscriber_count: Option<String>,
    view_count: Option<String>,
    video_count: Option<String>,
}

#[derive(Debug, Deserialize)]
struct SearchItem {
    id: SearchItemId,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SearchItemId {
    video_id: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct VideoItem {
    id: String,
    snippet: VideoSnippet,
    content_details: VideoContentDetails,
    #[serde(default)]
    statistics: VideoStatistics,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct VideoSnippet {
    title: String,
    published_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize)]
struct VideoContentDetails {
    duration: String,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct VideoStatistics {
    view_count: Option<String>,
    like_count: Option<String>,
    comment_count: Option<String>,
}

/// Counts arrive as decimal strings; a missing count is zero.
fn parse_count(field: &str, value: Option<&str>) -> ProviderResult<u64> {
    match value {
        None => Ok(0),
        Some(raw) => raw
            .parse::<u64>()
            .map_err(|err| ProviderError::format(format!("Invalid {} '{}': {}", field, raw, err))),
    }
}

impl VideoItem {
    /// Converts one raw `videos` item. Shape and count errors are reported
    /// per item so a single bad entry does not sink the batch.
    fn parse(raw: serde_json::Value) -> ProviderResult<VideoRecord> {
        let item: VideoItem = serde_json::from_value(raw)
            .map_err(|err| ProviderError::format(format!("Malformed video item: {}", err)))?;
        item.into_record()
    }

    fn into_record(self) -> ProviderResult<VideoRecord> {
        Ok(VideoRecord {
            view_count: parse_count("viewCount", self.statistics.view_count.as_deref())?,
            like_count: parse_count("likeCount", self.statistics.like_count.as_deref())?,
            comment_count: parse_count("commentCount", self.statistics.comment_count.as_deref())?,
            id: self.id,
            title: self.snippet.title,
            published_at: self.snippet.published_at,
            duration: self.content_details.duration,
        })
    }
}

impl YouTubeClient {
    async fn get_json<T: DeserializeOwned>(
        &self,
        resource: &str,
        query: &[(&str, &str)],
    ) -> ProviderResult<T> {
        let url = format!("{}/{}", self.base_url, resource);

        let response = self
            .http
            .get(&url)
            .query(query)
            .query(&[("key", self.api_key.as_str())])
            .send()
            .await
            .map_err(|err| ProviderError::network(err.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(status_error(status, &body));
        }

        response
            .json::<T>()
            .await
            .map_err(|err| ProviderError::format(format!("Failed to parse {} response: {}", resource, err)))
    }
}

fn status_error(status: StatusCode, body: &str) -> ProviderError {
    match status {
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => ProviderError::AuthError {
            message: format!("YouTube returned HTTP {}: {}", status, body.trim()),
        },
        StatusCode::TOO_MANY_REQUESTS => ProviderError::RateLimitExceeded,
        s if s.is_server_error() => ProviderError::ServiceUnavailable,
        s => ProviderError::network(format!("YouTube returned HTTP {}", s)),
    }
}

#[async_trait]
impl ChannelDataProvider for YouTubeClient {
    async fn find_channel(&self, handle: &str) -> ProviderResult<Option<ChannelSummary>> {
        let handle = handle.trim().trim_start_matches('@');
        let response: ListResponse<ChannelItem> = self
            .get_json(
                "channels",
                &[("part", "snippet,statistics"), ("forHandle", handle)],
            )
            .await?;

        let Some(item) = response.items.into_iter().next() else {
            return Ok(None);
        };

        let statistics = item.statistics.unwrap_or_default();
        Ok(Some(ChannelSummary {
            title: item.snippet.map(|s| s.title).unwrap_or_default(),
            handle: handle.to_string(),
            url: format!("{}{}", CHANNEL_URL_PREFIX, handle),
            subscriber_count: parse_count("subscriberCount", statistics.subscriber_count.as_deref())?,
            view_count: parse_count("viewCount", statistics.view_count.as_deref())?,
            video_count: parse_count("videoCount", statistics.video_count.as_deref())?,
            id: item.id,
        }))
    }

    async fn fetch_channel_totals(&self, channel_id: &str) -> ProviderResult<ChannelTotals> {
        let response: ListResponse<ChannelItem> = self
            .get_json("channels", &[("part", "statistics"), ("id", channel_id)])
            .await?;

        let item = response.items.into_iter().next().ok_or_else(|| {
            ProviderError::format(format!("No statistics returned for channel {}", channel_id))
        })?;
        let statistics = item.statistics.unwrap_or_default();

        Ok(ChannelTotals {
            subscribers: parse_count("subscriberCount", statistics.subscriber_count.as_deref())?,
            views: parse_count("viewCount", statistics.view_count.as_deref())?,
        })
    }

    async fn fetch_video_id_page(
        &self,
        channel_id: &str,
        max_results: u32,
        page_token: Option<&str>,
    ) -> ProviderResult<VideoIdPage> {
        let max_results = max_results.to_string();
        let mut query = vec![
            ("part", "id"),
            ("channelId", channel_id),
            ("maxResults", max_results.as_str()),
            ("type", "video"),
        ];
        if let Some(token) = page_token {
            query.push(("pageToken", token));
        }

        let response: ListResponse<SearchItem> = self.get_json("search", &query).await?;

        Ok(VideoIdPage {
            video_ids: response
                .items
                .into_iter()
                .filter_map(|item| item.id.video_id)
                .collect(),
            next_page_token: response.next_page_token,
        })
    }

    async fn fetch_video_details(&self, video_ids: &[String]) -> ProviderResult<Vec<VideoRecord>> {
        if video_ids.is_empty() {
            return Ok(Vec::new());
        }

        let ids = video_ids.join(",");
        let response: ListResponse<serde_json::Value> = self
            .get_json(
                "videos",
                &[("part", "snippet,contentDetails,statistics"), ("id", ids.as_str())],
            )
            .await?;

        let mut records = Vec::with_capacity(response.items.len());
        for raw in response.items {
            match VideoItem::parse(raw) {
                Ok(record) => records.push(record),
                Err(err) => tracing::warn!("Skipping video item: {}", err),
            }
        }
        Ok(records)
    }

    fn provider_name(&self) -> &str {
        "YouTube Data API"
    }
}
