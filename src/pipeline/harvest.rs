//! End-to-end harvest orchestration.
//!
//! Runs discovery, enrichment, and labeling in sequence, then writes the
//! report. The report is only written once every step has succeeded, so a
//! run that exhausts its credentials leaves no partial output behind.

use rand::SeedableRng;
use rand::rngs::StdRng;

use crate::error::Result;
use crate::models::Config;
use crate::services::ChannelApi;
use crate::storage::ReportStore;

use super::discover::run_discovery;
use super::enrich::run_enrichment;
use super::label::assign_labels;
use super::rotation::KeyRing;

/// Counters from a completed harvest run.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct HarvestSummary {
    /// Unique channels found during discovery.
    pub discovered: usize,
    /// Keywords abandoned after a failed search request.
    pub keyword_failures: usize,
    /// Enriched records that made it into the report.
    pub recorded: usize,
    /// Channels dropped for missing country metadata.
    pub skipped_no_country: usize,
    /// Detail lookups that failed with a non-quota error.
    pub lookup_failures: usize,
    /// Rows written to the report file.
    pub written: usize,
}

/// Run the full harvest against the given API and credential pool.
pub async fn run_harvest(
    api: &dyn ChannelApi,
    keys: &mut KeyRing,
    config: &Config,
) -> Result<HarvestSummary> {
    log::info!(
        "Step 1/3: Discovering channels across {} keywords...",
        config.discovery.keywords.len()
    );
    let discovery = run_discovery(api, keys, config).await?;
    log::info!("✓ Found {} unique channels", discovery.candidates.len());

    log::info!(
        "Step 2/3: Enriching {} channels...",
        discovery.candidates.len()
    );
    let mut rng = StdRng::from_os_rng();
    let enrichment = run_enrichment(api, keys, &discovery.candidates, config, &mut rng).await?;
    let mut records = enrichment.records;
    log::info!(
        "✓ Enriched {} channels ({} skipped without country)",
        records.len(),
        enrichment.skipped_no_country
    );

    log::info!("Step 3/3: Labeling popularity and writing the report...");
    match assign_labels(&mut records) {
        Some(thresholds) => log::info!(
            "Popularity cut points: p33 {:.2}, p66 {:.2}",
            thresholds.p33,
            thresholds.p66
        ),
        None => log::warn!("No records collected, skipping popularity labels"),
    }

    let store = ReportStore::new(&config.output.path);
    let written = store.write(&records).await?;
    log::info!("✓ Wrote {} records to {}", written, store.path().display());

    Ok(HarvestSummary {
        discovered: discovery.candidates.len(),
        keyword_failures: discovery.keyword_failures,
        recorded: records.len(),
        skipped_no_country: enrichment.skipped_no_country,
        lookup_failures: enrichment.lookup_failures,
        written,
    })
}
