//! Channel detail enrichment.
//!
//! Looks up the detail facets for each discovered candidate sequentially and
//! turns them into report records. Channels without a declared country are
//! dropped silently; failed lookups are logged and skipped.

use std::time::Duration;

use chrono::Utc;
use rand::Rng;

use crate::error::Result;
use crate::models::{ChannelCandidate, ChannelRecord, Config};
use crate::pipeline::metrics::{self, EngagementSample};
use crate::pipeline::rotation::{KeyRing, fetch_with_rotation};
use crate::services::ChannelApi;

/// Summary of an enrichment run.
#[derive(Debug, Default)]
pub struct EnrichmentOutcome {
    /// One record per kept channel, in candidate order
    pub records: Vec<ChannelRecord>,
    /// Channels dropped for lacking a country (not an error)
    pub skipped_no_country: usize,
    /// Channels dropped because the detail lookup failed
    pub lookup_failures: usize,
}

/// Fetch details and build a record for every candidate.
///
/// Quota failures rotate credentials and replay the same lookup. The
/// courtesy delay runs after every answered lookup; failed lookups skip it.
pub async fn run_enrichment(
    api: &dyn ChannelApi,
    keys: &mut KeyRing,
    candidates: &[ChannelCandidate],
    config: &Config,
    rng: &mut impl Rng,
) -> Result<EnrichmentOutcome> {
    let delay = Duration::from_millis(config.crawler.request_delay_ms);
    let today = Utc::now().date_naive();

    let mut outcome = EnrichmentOutcome::default();

    for (index, candidate) in candidates.iter().enumerate() {
        let fetched = fetch_with_rotation(keys, |key| {
            let id = candidate.id.clone();
            async move { api.channel_detail(&key, &id).await }
        })
        .await?;

        match fetched {
            Ok(detail) => {
                if let Some(detail) = detail {
                    let sample = EngagementSample::draw(rng);
                    match metrics::build_record(candidate, &detail, sample, today) {
                        Some(record) => outcome.records.push(record),
                        None => outcome.skipped_no_country += 1,
                    }
                }
                if delay.as_millis() > 0 {
                    tokio::time::sleep(delay).await;
                }
            }
            Err(error) => {
                log::warn!(
                    "Detail lookup for '{}' failed: {}; skipping",
                    candidate.name,
                    error
                );
                outcome.lookup_failures += 1;
            }
        }

        if config.logging.show_progress && (index + 1) % 100 == 0 {
            log::info!(
                "Enriched {}/{} channels ({} records)",
                index + 1,
                candidates.len(),
                outcome.records.len()
            );
        }
    }

    Ok(outcome)
}
