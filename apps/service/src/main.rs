#![warn(clippy::all)]

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use uptime::{MonitorAggregator, ProbeStore, Region};

mod config;
mod database;
mod error;
mod ingest;
mod pool;
mod retention;
mod routes;
mod server;

use config::Config;
use database::{LibsqlProbeStore, open_pool};
use logger::init_tracing;
use retention::RetentionCleanup;
use server::AppState;

#[derive(Parser)]
#[command(author, version, about = "Per-region uptime and response time aggregation")]
struct Cli {
    /// Configuration file, defaults to $XDG_CONFIG_HOME/uptime/config.toml
    #[arg(long, global = true)]
    config: Option<PathBuf>,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Serve the HTTP API and run periodic retention cleanup
    Serve,
    /// Load newline-delimited JSON probe records from a file, `-` for stdin
    Ingest { path: PathBuf },
    /// Print the metrics of one monitor as JSON
    Metrics {
        monitor_id: String,
        /// Region to report, repeatable, defaults to the configured regions
        #[arg(long = "region")]
        regions: Vec<Region>,
        /// Evaluation instant in epoch milliseconds, defaults to now
        #[arg(long)]
        at: Option<i64>,
    },
    /// Delete records older than the retention window once
    Cleanup,
    /// Print the effective configuration
    Config,
}

#[actix_web::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    init_tracing();

    let cli = Cli::parse();
    let config = Config::from_config(cli.config.as_deref())?;

    match cli.command {
        Command::Config => {
            println!("{}", config);
        }
        Command::Serve => {
            let store = open_store(&config).await?;
            RetentionCleanup::new(store.clone(), config.retention.clone()).start_periodic_cleanup();

            let state = AppState::new(store, config.aggregation.clone());
            server::run_server(&config.server, state).await?;
        }
        Command::Ingest { path } => {
            let store = open_store(&config).await?;
            let summary = ingest::ingest_path(store.as_ref(), &path).await?;
            println!("accepted: {}, rejected: {}", summary.accepted, summary.rejected);
        }
        Command::Metrics { monitor_id, regions, at } => {
            let store = open_store(&config).await?;
            let aggregator = MonitorAggregator::new(store, config.aggregation.clone());
            let now = at.unwrap_or_else(uptime::now_millis);

            let data = if regions.is_empty() {
                aggregator.compute_configured(&monitor_id, now).await?
            } else {
                aggregator.compute(&monitor_id, &regions, now).await?
            };
            println!("{}", serde_json::to_string_pretty(&data)?);
        }
        Command::Cleanup => {
            let store = open_store(&config).await?;
            let removed = RetentionCleanup::new(store, config.retention.clone())
                .cleanup_expired_records(uptime::now_millis())
                .await?;
            println!("removed: {}", removed);
        }
    }

    Ok(())
}

async fn open_store(config: &Config) -> Result<Arc<dyn ProbeStore>> {
    let pool = open_pool(&config.database).await.context("failed to open probe database")?;
    Ok(Arc::new(LibsqlProbeStore::new_from_pool(pool)))
}
