//! tubescope CLI
//!
//! Local execution entry point for the channel harvester.

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tubescope::{
    error::Result,
    models::Config,
    pipeline::{self, KeyRing},
    services::YouTubeDataApi,
    storage::ReportStore,
};

/// tubescope - YouTube Channel Harvester
#[derive(Parser, Debug)]
#[command(
    name = "tubescope",
    version,
    about = "Keyword-driven YouTube channel metadata harvester"
)]
struct Cli {
    /// Path to the TOML configuration file
    #[arg(short, long, default_value = "data/config.toml")]
    config: PathBuf,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Discover, enrich, and label channels, then write the CSV report
    Harvest {
        /// Cap on unique channels collected during discovery
        #[arg(long)]
        max_channels: Option<usize>,

        /// Report destination (default: taken from the config file)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Validate the configuration file
    Validate,

    /// Show the head of the current report
    Show {
        /// Number of rows to print
        #[arg(long, default_value_t = 10)]
        limit: usize,
    },
}

/// Initialize logging based on verbosity flag.
fn init_logging(verbose: bool) {
    let level = if verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level))
        .format_timestamp_secs()
        .init();
}

/// Main entry point for the CLI application.
#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    log::info!("tubescope starting...");

    let mut config = Config::load_or_default(&cli.config);
    log::info!("Loaded configuration from {}", cli.config.display());

    match cli.command {
        Command::Harvest {
            max_channels,
            output,
        } => {
            if let Some(cap) = max_channels {
                config.discovery.max_channels = cap;
            }
            if let Some(path) = output {
                config.output.path = path;
            }
            config.validate()?;

            let mut keys = KeyRing::new(config.api.resolve_keys())?;
            log::info!("Using {} API credential(s)", keys.len());

            let api = YouTubeDataApi::new(&config.crawler)?;
            let summary = pipeline::run_harvest(&api, &mut keys, &config).await?;

            log::info!(
                "Harvest complete: {} discovered, {} recorded, {} written",
                summary.discovered,
                summary.recorded,
                summary.written
            );
            if summary.keyword_failures > 0 || summary.lookup_failures > 0 {
                log::warn!(
                    "{} keyword(s) and {} detail lookup(s) failed along the way",
                    summary.keyword_failures,
                    summary.lookup_failures
                );
            }
        }

        Command::Validate => {
            log::info!("Validating configuration...");

            if let Err(e) = config.validate() {
                log::error!("Config validation failed: {}", e);
                return Err(e);
            }
            log::info!(
                "✓ Config OK ({} keywords, {} credential(s))",
                config.discovery.keywords.len(),
                config.api.resolve_keys().len()
            );
        }

        Command::Show { limit } => {
            let store = ReportStore::new(&config.output.path);
            if !store.path().exists() {
                log::error!(
                    "No report found at {}. Run 'harvest' first.",
                    store.path().display()
                );
                return Err(tubescope::error::AppError::config("Report not found"));
            }

            let records = store.load()?;
            log::info!("{} record(s) in {}", records.len(), store.path().display());
            for record in records.iter().take(limit) {
                log::info!(
                    "{} | {} | {} subscribers | {} | {}",
                    record.channel_id,
                    record.channel_name,
                    record.subscribers,
                    record.country,
                    record
                        .popularity_label
                        .map(|label| label.as_str())
                        .unwrap_or("unlabeled")
                );
            }
        }
    }

    log::info!("Done!");

    Ok(())
}
