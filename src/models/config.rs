//! Application configuration structures.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{AppError, Result};

/// Environment variable that overrides `[api] keys` (comma-separated).
pub const API_KEYS_ENV: &str = "TUBESCOPE_API_KEYS";

/// Root application configuration.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    /// API credential settings
    #[serde(default)]
    pub api: ApiConfig,

    /// HTTP client behavior settings
    #[serde(default)]
    pub crawler: CrawlerConfig,

    /// Keyword search and candidate cap settings
    #[serde(default)]
    pub discovery: DiscoveryConfig,

    /// Report output settings
    #[serde(default)]
    pub output: OutputConfig,

    /// Logging behavior settings
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl Config {
    /// Load configuration from a TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        Ok(toml::from_str(&content)?)
    }

    /// Load configuration or return default if loading fails.
    pub fn load_or_default(path: impl AsRef<Path>) -> Self {
        Self::load(&path).unwrap_or_else(|e| {
            log::warn!(
                "Config load failed from {:?}: {}. Using defaults.",
                path.as_ref(),
                e
            );
            Self::default()
        })
    }

    /// Validate configuration values for basic sanity.
    ///
    /// An empty key list passes here; credentials may arrive through the
    /// environment and are checked when the key ring is built.
    pub fn validate(&self) -> Result<()> {
        if self.crawler.user_agent.trim().is_empty() {
            return Err(AppError::validation("crawler.user_agent is empty"));
        }
        if self.crawler.timeout_secs == 0 {
            return Err(AppError::validation("crawler.timeout_secs must be > 0"));
        }
        if self.discovery.keywords.is_empty() {
            return Err(AppError::validation("No search keywords defined"));
        }
        if self.discovery.pages_per_keyword == 0 {
            return Err(AppError::validation(
                "discovery.pages_per_keyword must be > 0",
            ));
        }
        if self.discovery.page_size == 0 || self.discovery.page_size > 50 {
            return Err(AppError::validation(
                "discovery.page_size must be between 1 and 50",
            ));
        }
        if self.discovery.max_channels == 0 {
            return Err(AppError::validation("discovery.max_channels must be > 0"));
        }
        if self.output.path.as_os_str().is_empty() {
            return Err(AppError::validation("output.path is empty"));
        }
        Ok(())
    }
}

/// API credential settings.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct ApiConfig {
    /// Ordered API keys, consumed front to back as quotas run out
    #[serde(default)]
    pub keys: Vec<String>,
}

impl ApiConfig {
    /// Effective key list: the environment override when set, else the file.
    pub fn resolve_keys(&self) -> Vec<String> {
        match std::env::var(API_KEYS_ENV) {
            Ok(raw) if !raw.trim().is_empty() => parse_key_list(&raw),
            _ => self.keys.clone(),
        }
    }
}

/// Split a comma-separated credential list, dropping blanks.
fn parse_key_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|k| !k.is_empty())
        .map(str::to_string)
        .collect()
}

/// HTTP client behavior settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CrawlerConfig {
    /// User-Agent header for HTTP requests
    #[serde(default = "defaults::user_agent")]
    pub user_agent: String,

    /// Request timeout in seconds
    #[serde(default = "defaults::timeout")]
    pub timeout_secs: u64,

    /// Courtesy delay between consecutive API requests in milliseconds
    #[serde(default = "defaults::request_delay")]
    pub request_delay_ms: u64,
}

impl Default for CrawlerConfig {
    fn default() -> Self {
        Self {
            user_agent: defaults::user_agent(),
            timeout_secs: defaults::timeout(),
            request_delay_ms: defaults::request_delay(),
        }
    }
}

/// Keyword search and candidate cap settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DiscoveryConfig {
    /// Search keywords, queried in order
    #[serde(default = "defaults::keywords")]
    pub keywords: Vec<String>,

    /// Maximum search pages fetched per keyword
    #[serde(default = "defaults::pages_per_keyword")]
    pub pages_per_keyword: u32,

    /// Results requested per page (API caps this at 50)
    #[serde(default = "defaults::page_size")]
    pub page_size: u32,

    /// Global cap on unique channels across all keywords
    #[serde(default = "defaults::max_channels")]
    pub max_channels: usize,
}

impl Default for DiscoveryConfig {
    fn default() -> Self {
        Self {
            keywords: defaults::keywords(),
            pages_per_keyword: defaults::pages_per_keyword(),
            page_size: defaults::page_size(),
            max_channels: defaults::max_channels(),
        }
    }
}

/// Report output settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputConfig {
    /// Path of the CSV report, overwritten on every run
    #[serde(default = "defaults::output_path")]
    pub path: PathBuf,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            path: defaults::output_path(),
        }
    }
}

/// Logging behavior settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Emit per-keyword and per-batch progress lines at info level
    #[serde(default = "defaults::show_progress")]
    pub show_progress: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            show_progress: defaults::show_progress(),
        }
    }
}

mod defaults {
    use std::path::PathBuf;

    // Crawler defaults
    pub fn user_agent() -> String {
        "Mozilla/5.0 (compatible; tubescope/0.1)".into()
    }
    pub fn timeout() -> u64 {
        30
    }
    pub fn request_delay() -> u64 {
        800
    }

    // Discovery defaults
    pub fn keywords() -> Vec<String> {
        [
            "music",
            "gaming",
            "tech",
            "vlog",
            "comedy",
            "education",
            "food",
            "travel",
            "fashion",
            "fitness",
            "makeup",
            "sports",
            "news",
            "movies",
            "science",
            "animation",
            "DIY",
            "reviews",
            "motivation",
            "tutorial",
            "cooking",
            "health",
            "finance",
            "podcast",
        ]
        .into_iter()
        .map(String::from)
        .collect()
    }
    pub fn pages_per_keyword() -> u32 {
        3
    }
    pub fn page_size() -> u32 {
        50
    }
    pub fn max_channels() -> usize {
        4500
    }

    // Output defaults
    pub fn output_path() -> PathBuf {
        PathBuf::from("data/channels.csv")
    }

    // Logging defaults
    pub fn show_progress() -> bool {
        true
    }
}
