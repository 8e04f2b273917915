use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::{Days, Local, NaiveDate};
use clap::{Parser, Subcommand};
use log::{info, warn};

use kis_pipeline::backfill::{BackfillOptions, backfill};
use kis_pipeline::store::{Cacher, MemoryCache, PersistenceStore};
use kis_pipeline::{
    DashboardPipeline, KisPipeline, MemoryStore, PipelineConfig, ReplayGateway, TopicFixture,
};

#[derive(Debug, Parser)]
#[command(name = "kis-pipeline", version, about = "Hospital KIS report aggregation")]
struct Cli {
    /// Deployment configuration (TOML); built-in defaults when omitted
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Build the KIS report from recorded datasets and print it as JSON
    Report {
        /// JSON file mapping query names to result rows
        #[arg(short, long)]
        fixture: PathBuf,
        /// Report date (defaults to yesterday)
        #[arg(short, long)]
        date: Option<NaiveDate>,
    },
    /// Build and save the dashboard records, then fill the day cache
    Dashboard {
        #[arg(short, long)]
        fixture: PathBuf,
        #[arg(short, long)]
        date: Option<NaiveDate>,
    },
    /// Save dashboard records for each of the last N days
    Backfill {
        #[arg(short, long)]
        fixture: PathBuf,
        #[arg(long, default_value_t = 30)]
        days: u64,
    },
}

fn load_config(path: Option<&Path>) -> Result<PipelineConfig> {
    let config = match path {
        Some(path) => PipelineConfig::from_toml_file(path)
            .with_context(|| format!("Failed to load configuration from {}", path.display()))?,
        None => {
            info!("No configuration file given, using built-in defaults");
            PipelineConfig::default()
        }
    };
    config.validate().context("Invalid configuration")?;
    Ok(config)
}

fn load_fixture(path: &Path) -> Result<TopicFixture> {
    TopicFixture::from_json_file(path)
        .with_context(|| format!("Failed to read dataset fixture {}", path.display()))
}

fn yesterday(today: NaiveDate) -> NaiveDate {
    today.checked_sub_days(Days::new(1)).unwrap_or(today)
}

fn main() -> Result<()> {
    // Setup logging
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();
    let config = load_config(cli.config.as_deref())?;
    info!("{config}");
    let today = Local::now().date_naive();

    match cli.command {
        Command::Report { fixture, date } => {
            let fixture = load_fixture(&fixture)?;
            let date = date.unwrap_or_else(|| yesterday(today));
            let mut gateway =
                ReplayGateway::for_fixture(&fixture, &config.queries, date, &config.failure_marker);

            let result = KisPipeline::new(&config).start(&mut gateway, date)?;
            for fault in result.faults() {
                warn!("Topic '{}' degraded: {:?}", fault.topic, fault.kind);
            }
            println!("{}", serde_json::to_string_pretty(&result)?);
        }
        Command::Dashboard { fixture, date } => {
            let fixture = load_fixture(&fixture)?;
            let date = date.unwrap_or_else(|| yesterday(today));
            let mut store = MemoryStore::new().with_profiles(config.lookups.profiles.values().cloned());

            let mut gateway =
                ReplayGateway::for_fixture(&fixture, &config.queries, date, &config.failure_marker);
            let data = DashboardPipeline::new(&config).run(&mut gateway, date)?;
            let report = data.save(&mut store);
            info!("Saved {} records, {} rejected", report.saved, report.rejected.len());

            let mut cache = MemoryCache::new();
            Cacher::new(&mut cache, &store).ensure_cached(date, || {
                let mut gateway =
                    ReplayGateway::for_fixture(&fixture, &config.queries, date, &config.failure_marker);
                KisPipeline::new(&config).start(&mut gateway, date)
            })?;
            println!("{}", serde_json::to_string_pretty(&store.main_records())?);
        }
        Command::Backfill { fixture, days } => {
            let fixture = load_fixture(&fixture)?;
            let mut store = MemoryStore::new().with_profiles(config.lookups.profiles.values().cloned());

            let report = backfill(
                &config,
                |date| ReplayGateway::for_fixture(&fixture, &config.queries, date, &config.failure_marker),
                &mut store,
                BackfillOptions::new(today, days).with_progress(true),
            )?;
            info!(
                "Backfilled {} days: {} saved, {} rejected, {} failed",
                report.days,
                report.saved,
                report.rejected,
                report.failed_days.len()
            );
        }
    }

    Ok(())
}
