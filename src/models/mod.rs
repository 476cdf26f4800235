// src/models/mod.rs

//! Domain models for the harvester application.
//!
//! This module contains all data structures used throughout the application,
//! organized by their primary purpose.

mod channel;
mod config;

// Re-export all public types
pub use channel::{ChannelCandidate, ChannelRecord, PopularityLabel};
pub use config::{
    API_KEYS_ENV, ApiConfig, Config, CrawlerConfig, DiscoveryConfig, LoggingConfig, OutputConfig,
};
