//! Per-channel derived metrics.
//!
//! Pure math over the detail facets: activity ratios, channel age, and
//! description statistics, plus the synthetic engagement placeholders drawn
//! from fixed ranges.

use std::ops::RangeInclusive;

use chrono::NaiveDate;
use rand::Rng;

use crate::models::{ChannelCandidate, ChannelRecord};
use crate::services::ChannelDetail;

/// Range of the synthetic average-likes placeholder.
pub const LIKES_RANGE: RangeInclusive<u64> = 100..=10_000;

/// Range of the synthetic average-comments placeholder.
pub const COMMENTS_RANGE: RangeInclusive<u64> = 10..=5_000;

/// Synthetic per-video engagement placeholder.
///
/// The channels endpoint exposes no like or comment counts, so these are
/// drawn uniformly from fixed ranges and only feed the engagement proxy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EngagementSample {
    pub likes: u64,
    pub comments: u64,
}

impl EngagementSample {
    /// Draw a sample from the fixed placeholder ranges.
    pub fn draw(rng: &mut impl Rng) -> Self {
        Self {
            likes: rng.random_range(LIKES_RANGE),
            comments: rng.random_range(COMMENTS_RANGE),
        }
    }
}

/// Build the report row for one enriched channel.
///
/// Returns `None` when the channel declares no country (the report keeps
/// locatable channels only). The record carries the candidate's search-time
/// name, not the detail title.
pub fn build_record(
    candidate: &ChannelCandidate,
    detail: &ChannelDetail,
    engagement: EngagementSample,
    today: NaiveDate,
) -> Option<ChannelRecord> {
    let country = detail.country.as_deref().filter(|c| !c.is_empty())?;

    let age = channel_age_years(&detail.published_at, today);
    let length = detail.description.chars().count();
    let words = detail.description.split_whitespace().count();

    Some(ChannelRecord {
        channel_id: candidate.id.clone(),
        channel_name: candidate.name.clone(),
        subscribers: detail.subscribers,
        total_views: detail.views,
        total_videos: detail.videos,
        country: country.to_string(),
        published_at: detail.published_at.clone(),
        channel_age_years: age,
        views_per_video: round2(ratio(detail.views, detail.videos)),
        subscribers_per_video: round2(ratio(detail.subscribers, detail.videos)),
        views_per_subscriber: round2(ratio(detail.views, detail.subscribers)),
        average_likes: engagement.likes,
        average_comments: engagement.comments,
        engagement_proxy: round6(
            (engagement.likes + engagement.comments) as f64 / (detail.subscribers + 1) as f64,
        ),
        videos_per_year: videos_per_year(detail.videos, age),
        description_length: length,
        description_word_count: words,
        description_richness: round3(words as f64 / (length + 1) as f64),
        topic_categories: detail.topics.clone(),
        popularity_label: None,
    })
}

/// Channel age in years (2 dp), from the first 10 chars of the raw timestamp
/// (`YYYY-MM-DD`). Any parse failure degrades to `None`.
pub fn channel_age_years(published_at: &str, today: NaiveDate) -> Option<f64> {
    let date = published_at.get(..10)?;
    let created = NaiveDate::parse_from_str(date, "%Y-%m-%d").ok()?;
    Some(round2((today - created).num_days() as f64 / 365.0))
}

/// Upload cadence over the rounded age; 0.0 when the age is unknown or not
/// positive.
fn videos_per_year(videos: u64, age: Option<f64>) -> f64 {
    match age {
        Some(years) if years > 0.0 => round2(videos as f64 / years),
        _ => 0.0,
    }
}

/// Safe division: 0.0 on a zero denominator, never an error.
fn ratio(numerator: u64, denominator: u64) -> f64 {
    if denominator == 0 {
        0.0
    } else {
        numerator as f64 / denominator as f64
    }
}

fn round_dp(value: f64, digits: i32) -> f64 {
    let factor = 10f64.powi(digits);
    (value * factor).round() / factor
}

fn round2(value: f64) -> f64 {
    round_dp(value, 2)
}

fn round3(value: f64) -> f64 {
    round_dp(value, 3)
}

fn round6(value: f64) -> f64 {
    round_dp(value, 6)
}
