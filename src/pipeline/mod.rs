//! Pipeline stages for the channel harvest.
//!
//! - `run_discovery`: Find channel candidates by keyword search
//! - `run_enrichment`: Fetch detail facets and derive per-channel metrics
//! - `run_harvest`: Full discover, enrich, label, write sequence

pub mod discover;
pub mod enrich;
pub mod harvest;
pub mod label;
pub mod metrics;
pub mod rotation;

pub use discover::{DiscoveryOutcome, run_discovery};
pub use enrich::{EnrichmentOutcome, run_enrichment};
pub use harvest::{HarvestSummary, run_harvest};
pub use label::{LabelThresholds, assign_labels, popularity_score, quantile};
pub use metrics::{EngagementSample, build_record, channel_age_years};
pub use rotation::{KeyRing, fetch_with_rotation};
