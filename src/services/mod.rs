//! Service layer for remote channel data access.
//!
//! [`ChannelApi`] is the seam between the pipeline and the network: the
//! production implementation ([`youtube::YouTubeDataApi`]) talks to the Data
//! API over HTTP, and tests swap in a scripted double. Request failures are
//! reported as tagged [`ApiError`] values so call sites can tell quota
//! exhaustion (rotate and retry) apart from everything else (skip the unit).

pub mod youtube;

use async_trait::async_trait;
use thiserror::Error;

use crate::models::ChannelCandidate;

// Re-export for convenience
pub use youtube::YouTubeDataApi;

/// Result of a single remote API request.
pub type ApiResult<T> = std::result::Result<T, ApiError>;

/// A failed request against the remote API.
#[derive(Error, Debug)]
pub enum ApiError {
    /// The active credential ran out of daily quota
    #[error("quota exceeded (HTTP {status}, reason '{reason}')")]
    QuotaExceeded { status: u16, reason: String },

    /// Any other non-success response
    #[error("request rejected (HTTP {status}, reason '{reason}'): {message}")]
    Rejected {
        status: u16,
        reason: String,
        message: String,
    },

    /// Connection, timeout, or other transport failure
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// The response body could not be decoded
    #[error("malformed response: {0}")]
    Decode(String),
}

impl ApiError {
    /// Whether this failure should trigger credential rotation.
    pub fn is_quota(&self) -> bool {
        matches!(self, Self::QuotaExceeded { .. })
    }
}

/// One page of channel search results.
#[derive(Debug, Clone, Default)]
pub struct SearchPage {
    /// Channels on this page, in response order
    pub candidates: Vec<ChannelCandidate>,

    /// Opaque cursor for the next page, if any
    pub next_page: Option<String>,
}

/// Detail facets for a single channel.
#[derive(Debug, Clone)]
pub struct ChannelDetail {
    /// Declared country; absent or empty means the channel is skipped
    pub country: Option<String>,

    pub subscribers: u64,
    pub views: u64,
    pub videos: u64,

    /// Raw creation timestamp, empty when the API omits it
    pub published_at: String,

    pub description: String,

    /// Topic category names (full identifier URLs)
    pub topics: Vec<String>,
}

/// Remote channel data source.
#[async_trait]
pub trait ChannelApi: Send + Sync {
    /// Fetch one page of channel search results for a keyword.
    async fn search_channels(
        &self,
        key: &str,
        query: &str,
        page_size: u32,
        page_token: Option<&str>,
    ) -> ApiResult<SearchPage>;

    /// Fetch detail facets for one channel; `None` when the id is unknown.
    async fn channel_detail(&self, key: &str, channel_id: &str) -> ApiResult<Option<ChannelDetail>>;
}

#[cfg(test)]
pub(crate) mod testing {
    //! Scripted [`ChannelApi`] double for pipeline tests.

    use std::collections::{HashMap, VecDeque};
    use std::sync::Mutex;

    use async_trait::async_trait;

    use super::{ApiError, ApiResult, ChannelApi, ChannelDetail, SearchPage};
    use crate::models::ChannelCandidate;

    /// In-memory API double; queue responses per query/id, popped in call
    /// order. Unqueued calls return an empty page / no detail.
    #[derive(Default)]
    pub struct ScriptedApi {
        searches: Mutex<HashMap<String, VecDeque<ApiResult<SearchPage>>>>,
        details: Mutex<HashMap<String, VecDeque<ApiResult<Option<ChannelDetail>>>>>,
        /// (key, query, page_token) per search call
        pub search_calls: Mutex<Vec<(String, String, Option<String>)>>,
        /// (key, channel_id) per detail call
        pub detail_calls: Mutex<Vec<(String, String)>>,
    }

    impl ScriptedApi {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn push_search(&self, query: &str, result: ApiResult<SearchPage>) {
            self.searches
                .lock()
                .unwrap()
                .entry(query.to_string())
                .or_default()
                .push_back(result);
        }

        pub fn push_detail(&self, channel_id: &str, result: ApiResult<Option<ChannelDetail>>) {
            self.details
                .lock()
                .unwrap()
                .entry(channel_id.to_string())
                .or_default()
                .push_back(result);
        }

        /// Build a page from `(id, name)` pairs.
        pub fn page(candidates: &[(&str, &str)], next_page: Option<&str>) -> SearchPage {
            SearchPage {
                candidates: candidates
                    .iter()
                    .map(|(id, name)| ChannelCandidate {
                        id: id.to_string(),
                        name: name.to_string(),
                    })
                    .collect(),
                next_page: next_page.map(str::to_string),
            }
        }

        /// Build a detail with fixed description/timestamp filler.
        pub fn detail(
            country: Option<&str>,
            subscribers: u64,
            views: u64,
            videos: u64,
        ) -> ChannelDetail {
            ChannelDetail {
                country: country.map(str::to_string),
                subscribers,
                views,
                videos,
                published_at: "2020-01-15T00:00:00Z".to_string(),
                description: "two words".to_string(),
                topics: Vec::new(),
            }
        }

        pub fn quota() -> ApiError {
            ApiError::QuotaExceeded {
                status: 403,
                reason: "quotaExceeded".to_string(),
            }
        }

        pub fn rejected(status: u16) -> ApiError {
            ApiError::Rejected {
                status,
                reason: "backendError".to_string(),
                message: "scripted failure".to_string(),
            }
        }

        pub fn search_call_count(&self) -> usize {
            self.search_calls.lock().unwrap().len()
        }

        pub fn detail_call_count(&self) -> usize {
            self.detail_calls.lock().unwrap().len()
        }
    }

    #[async_trait]
    impl ChannelApi for ScriptedApi {
        async fn search_channels(
            &self,
            key: &str,
            query: &str,
            _page_size: u32,
            page_token: Option<&str>,
        ) -> ApiResult<SearchPage> {
            self.search_calls.lock().unwrap().push((
                key.to_string(),
                query.to_string(),
                page_token.map(str::to_string),
            ));
            self.searches
                .lock()
                .unwrap()
                .get_mut(query)
                .and_then(VecDeque::pop_front)
                .unwrap_or_else(|| Ok(SearchPage::default()))
        }

        async fn channel_detail(
            &self,
            key: &str,
            channel_id: &str,
        ) -> ApiResult<Option<ChannelDetail>> {
            self.detail_calls
                .lock()
                .unwrap()
                .push((key.to_string(), channel_id.to_string()));
            self.details
                .lock()
                .unwrap()
                .get_mut(channel_id)
                .and_then(VecDeque::pop_front)
                .unwrap_or(Ok(None))
        }
    }
}
