//! Channel data structures for discovery, enrichment, and the CSV report.

use std::fmt;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// A channel surfaced by keyword search, before enrichment.
///
/// The name is the one from the first search result that introduced the id;
/// later sightings of the same channel never replace it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChannelCandidate {
    /// Channel id (`UC...`)
    pub id: String,

    /// Channel title as shown in search results
    pub name: String,
}

/// Relative popularity tier assigned over a whole run's records.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PopularityLabel {
    Low,
    Medium,
    High,
}

impl PopularityLabel {
    /// Label text as it appears in the report.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Low => "Low",
            Self::Medium => "Medium",
            Self::High => "High",
        }
    }
}

impl fmt::Display for PopularityLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One fully enriched channel, serialized as one CSV row.
///
/// Field order is the report's column order; the serde renames are the exact
/// header texts (see [`ChannelRecord::HEADERS`]).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChannelRecord {
    #[serde(rename = "Channel_ID")]
    pub channel_id: String,

    #[serde(rename = "Channel_Name")]
    pub channel_name: String,

    #[serde(rename = "Subscribers")]
    pub subscribers: u64,

    #[serde(rename = "Total_Views")]
    pub total_views: u64,

    #[serde(rename = "Total_Videos")]
    pub total_videos: u64,

    #[serde(rename = "Country")]
    pub country: String,

    /// Raw channel creation timestamp as returned by the API (may be empty)
    #[serde(rename = "Published_At")]
    pub published_at: String,

    /// None when the creation timestamp could not be parsed
    #[serde(rename = "Channel_Age_Years")]
    pub channel_age_years: Option<f64>,

    #[serde(rename = "Views_Per_Video")]
    pub views_per_video: f64,

    #[serde(rename = "Subscribers_Per_Video")]
    pub subscribers_per_video: f64,

    #[serde(rename = "Views_Per_Subscriber")]
    pub views_per_subscriber: f64,

    /// Synthetic placeholder; the channels endpoint exposes no like counts
    #[serde(rename = "Average_Likes")]
    pub average_likes: u64,

    /// Synthetic placeholder; the channels endpoint exposes no comment counts
    #[serde(rename = "Average_Comments")]
    pub average_comments: u64,

    /// Derived from the synthetic like/comment placeholders
    #[serde(rename = "Engagement_Proxy")]
    pub engagement_proxy: f64,

    #[serde(rename = "Videos_Per_Year")]
    pub videos_per_year: f64,

    #[serde(rename = "Description_Length")]
    pub description_length: usize,

    #[serde(rename = "Description_Word_Count")]
    pub description_word_count: usize,

    #[serde(rename = "Description_Richness")]
    pub description_richness: f64,

    /// Topic category names, `|`-joined in the CSV cell
    #[serde(
        rename = "Topic_Categories",
        serialize_with = "join_topics",
        deserialize_with = "split_topics"
    )]
    pub topic_categories: Vec<String>,

    /// Assigned during labeling; None before that stage (empty CSV cell)
    #[serde(rename = "Popularity_Label")]
    pub popularity_label: Option<PopularityLabel>,
}

impl ChannelRecord {
    /// Report column headers, in column order.
    ///
    /// Must stay in sync with the serde renames above; a test guards the two
    /// against drifting apart.
    pub const HEADERS: [&'static str; 20] = [
        "Channel_ID",
        "Channel_Name",
        "Subscribers",
        "Total_Views",
        "Total_Videos",
        "Country",
        "Published_At",
        "Channel_Age_Years",
        "Views_Per_Video",
        "Subscribers_Per_Video",
        "Views_Per_Subscriber",
        "Average_Likes",
        "Average_Comments",
        "Engagement_Proxy",
        "Videos_Per_Year",
        "Description_Length",
        "Description_Word_Count",
        "Description_Richness",
        "Topic_Categories",
        "Popularity_Label",
    ];
}

fn join_topics<S>(topics: &[String], serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    serializer.serialize_str(&topics.join("|"))
}

fn split_topics<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    Ok(raw
        .split('|')
        .filter(|t| !t.is_empty())
        .map(str::to_string)
        .collect())
}
