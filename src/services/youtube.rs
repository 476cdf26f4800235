// src/services/youtube.rs

//! YouTube Data API v3 client.
//!
//! Implements [`ChannelApi`] over the public REST endpoints with a single
//! shared HTTP client. Non-success responses are classified from the
//! structured error envelope (HTTP status plus machine-readable reason),
//! never from human-readable message text.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::Deserialize;

use super::{ApiError, ApiResult, ChannelApi, ChannelDetail, SearchPage};
use crate::error::Result;
use crate::models::{ChannelCandidate, CrawlerConfig};

/// Base URL of the Data API.
const API_BASE: &str = "https://www.googleapis.com/youtube/v3";

/// Detail facets requested for every channel lookup.
const DETAIL_PARTS: &str = "snippet,statistics,brandingSettings,topicDetails";

/// Error reasons that mean the credential's daily quota is gone.
///
/// `rateLimitExceeded` is deliberately not here: a per-minute throttle on the
/// same key clears by itself, so rotating away from the key would be wrong.
const QUOTA_REASONS: [&str; 2] = ["quotaExceeded", "dailyLimitExceeded"];

/// HTTP client for the Data API.
pub struct YouTubeDataApi {
    client: Client,
}

impl YouTubeDataApi {
    /// Build a client with the configured user agent and timeout.
    pub fn new(config: &CrawlerConfig) -> Result<Self> {
        let client = Client::builder()
            .user_agent(&config.user_agent)
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self { client })
    }

    async fn get_json<T>(&self, url: &str, params: &[(&str, String)]) -> ApiResult<T>
    where
        T: serde::de::DeserializeOwned,
    {
        let response = self.client.get(url).query(params).send().await?;
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(classify_rejection(status, &body));
        }

        let body = response.text().await?;
        serde_json::from_str(&body).map_err(|e| ApiError::Decode(e.to_string()))
    }
}

#[async_trait]
impl ChannelApi for YouTubeDataApi {
    async fn search_channels(
        &self,
        key: &str,
        query: &str,
        page_size: u32,
        page_token: Option<&str>,
    ) -> ApiResult<SearchPage> {
        let mut params = vec![
            ("part", "snippet".to_string()),
            ("type", "channel".to_string()),
            ("q", query.to_string()),
            ("maxResults", page_size.to_string()),
            ("key", key.to_string()),
        ];
        if let Some(token) = page_token {
            params.push(("pageToken", token.to_string()));
        }

        let response: SearchResponse = self
            .get_json(&format!("{API_BASE}/search"), &params)
            .await?;

        Ok(SearchPage {
            candidates: response
                .items
                .into_iter()
                .filter_map(SearchItem::into_candidate)
                .collect(),
            next_page: response.next_page_token,
        })
    }

    async fn channel_detail(&self, key: &str, channel_id: &str) -> ApiResult<Option<ChannelDetail>> {
        let params = vec![
            ("part", DETAIL_PARTS.to_string()),
            ("id", channel_id.to_string()),
            ("key", key.to_string()),
        ];

        let response: ChannelListResponse = self
            .get_json(&format!("{API_BASE}/channels"), &params)
            .await?;

        Ok(response.items.into_iter().next().map(ChannelItem::into_detail))
    }
}

/// Classify a non-success response from its structured error envelope.
fn classify_rejection(status: StatusCode, body: &str) -> ApiError {
    let parsed = serde_json::from_str::<ErrorEnvelope>(body)
        .ok()
        .map(|envelope| envelope.error);
    let reason = parsed
        .as_ref()
        .and_then(|error| error.errors.iter().find_map(|d| d.reason.clone()))
        .unwrap_or_default();

    if status == StatusCode::FORBIDDEN && QUOTA_REASONS.contains(&reason.as_str()) {
        return ApiError::QuotaExceeded {
            status: status.as_u16(),
            reason,
        };
    }

    ApiError::Rejected {
        status: status.as_u16(),
        reason,
        message: parsed
            .map(|error| error.message)
            .unwrap_or_else(|| truncate_body(body)),
    }
}

/// Fallback message for bodies that are not the JSON envelope.
fn truncate_body(body: &str) -> String {
    body.trim().chars().take(200).collect()
}

/// Counts arrive as decimal strings; missing or malformed values become 0.
fn parse_count(raw: Option<&str>) -> u64 {
    raw.and_then(|s| s.parse().ok()).unwrap_or(0)
}

// ---------------------------------------------------------------------------
// Wire types
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SearchResponse {
    #[serde(default)]
    items: Vec<SearchItem>,
    next_page_token: Option<String>,
}

#[derive(Debug, Deserialize)]
struct SearchItem {
    snippet: Option<SearchSnippet>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SearchSnippet {
    channel_id: Option<String>,
    channel_title: Option<String>,
}

impl SearchItem {
    /// Items without an id or title are dropped, not errors.
    fn into_candidate(self) -> Option<ChannelCandidate> {
        let snippet = self.snippet?;
        Some(ChannelCandidate {
            id: snippet.channel_id?,
            name: snippet.channel_title?,
        })
    }
}

#[derive(Debug, Deserialize)]
struct ChannelListResponse {
    #[serde(default)]
    items: Vec<ChannelItem>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ChannelItem {
    snippet: Option<ChannelSnippet>,
    statistics: Option<ChannelStatistics>,
    topic_details: Option<TopicDetails>,
}

#[derive(Debug, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
struct ChannelSnippet {
    #[serde(default)]
    description: String,
    published_at: Option<String>,
    country: Option<String>,
}

#[derive(Debug, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
struct ChannelStatistics {
    subscriber_count: Option<String>,
    view_count: Option<String>,
    video_count: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct TopicDetails {
    #[serde(default)]
    topic_categories: Vec<String>,
}

impl ChannelItem {
    fn into_detail(self) -> ChannelDetail {
        let snippet = self.snippet.unwrap_or_default();
        let statistics = self.statistics.unwrap_or_default();

        ChannelDetail {
            country: snippet.country,
            subscribers: parse_count(statistics.subscriber_count.as_deref()),
            views: parse_count(statistics.view_count.as_deref()),
            videos: parse_count(statistics.video_count.as_deref()),
            published_at: snippet.published_at.unwrap_or_default(),
            description: snippet.description,
            topics: self
                .topic_details
                .map(|t| t.topic_categories)
                .unwrap_or_default(),
        }
    }
}

/// Standard Google API error envelope.
#[derive(Debug, Deserialize)]
struct ErrorEnvelope {
    error: ErrorBody,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    #[serde(default)]
    message: String,
    #[serde(default)]
    errors: Vec<ErrorDetail>,
}

#[derive(Debug, Deserialize)]
struct ErrorDetail {
    reason: Option<String>,
}
