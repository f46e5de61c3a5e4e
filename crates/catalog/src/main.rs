//! Catalog CLI application.

use anyhow::{Context, Result};
use catalog::{DataManager, FilterCriteria, LoadOrigin};
use clap::{Parser, Subcommand};
use serde::Serialize;
use serde_json::json;
use shared::{Config, ContentRecord, LogConfig};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::info;

#[derive(Parser, Debug)]
#[command(name = "catalog")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to configuration file
    #[arg(short, long, default_value = "config.toml", global = true)]
    config: PathBuf,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Skip the persistent cache; always load from the sources
    #[arg(long, global = true)]
    no_cache: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Load every source (or the cache) and print a summary
    Load,

    /// Relevance-ranked text search
    Search {
        query: String,

        #[arg(short, long)]
        limit: Option<usize>,

        /// Print the score and match reason with each record
        #[arg(long)]
        explain: bool,
    },

    /// Multi-criteria filter; comma-separated values are OR-ed
    Filter {
        #[arg(long = "type")]
        content_type: Option<String>,

        #[arg(long)]
        industry: Option<String>,

        #[arg(long)]
        genre: Option<String>,

        #[arg(short, long)]
        limit: Option<usize>,
    },

    /// Records whose type or industry is the given category
    Category {
        name: String,

        #[arg(short, long)]
        limit: Option<usize>,
    },

    /// Print one record
    Show { id: String },

    /// Records related to a record
    Related {
        id: String,

        #[arg(short, long)]
        limit: Option<usize>,
    },

    /// Every season of the series a record belongs to
    Seasons { id: String },

    /// Random pick for the hero banner
    Random,

    /// Inspect or clear the persistent cache
    Cache {
        #[command(subcommand)]
        action: CacheAction,
    },
}

#[derive(Subcommand, Debug)]
enum CacheAction {
    /// Describe the cached payload
    Stats,
    /// Remove the cached payload
    Clear,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let mut config = Config::from_file(&args.config)
        .with_context(|| format!("Failed to load config from {}", args.config.display()))?;
    if args.no_cache {
        config.cache.enabled = false;
    }

    let mut log_config = LogConfig::from_settings(&config.logging, &config.log_dir(), "catalog");
    if args.verbose {
        log_config = log_config.with_level(tracing::Level::DEBUG);
    }
    shared::logging::init(log_config)?;

    info!(config_file = %args.config.display(), "Loaded configuration");

    let manager = DataManager::from_config(&config).context("Failed to set up data manager")?;

    match args.command {
        Commands::Cache { action } => run_cache(&manager, action).await,
        command => {
            manager.load_all_data().await;
            run_query(&manager, command)
        }
    }
}

async fn run_cache(manager: &DataManager, action: CacheAction) -> Result<()> {
    match action {
        CacheAction::Stats => match manager.cache_stats().await {
            Some(stats) => print_json(&json!({
                "present": stats.present,
                "current": stats.current,
                "version": stats.version,
                "entries": stats.entries,
                "saved_at": stats.saved_at,
                "size_bytes": stats.size_bytes,
            })),
            None => print_json(&json!({ "enabled": false })),
        },
        CacheAction::Clear => {
            let cleared = manager.clear_cache().await;
            info!(cleared = cleared, "Cache clear requested");
            print_json(&json!({ "cleared": cleared }))
        }
    }
}

fn run_query(manager: &DataManager, command: Commands) -> Result<()> {
    match command {
        Commands::Load => {
            let Some(report) = manager.report() else {
                return Ok(());
            };
            let mut summary = json!({
                "origin": report.origin.as_str(),
                "records": report.index.len(),
                "persisted": report.persisted,
            });
            if let (LoadOrigin::Sources, Some(stats)) = (report.origin, &report.stats) {
                summary["sources_loaded"] = json!(stats.sources_loaded);
                summary["sources_failed"] = json!(stats.sources_failed);
                summary["records_dropped"] = json!(stats.records_dropped);
                summary["records_replaced"] = json!(stats.records_replaced);
                summary["elapsed_ms"] = json!(stats.elapsed.as_millis() as u64);
            }
            print_json(&summary)
        }
        Commands::Search { query, limit, explain } => {
            if explain {
                for hit in manager.search_with_reasons(&query, limit) {
                    print_json(&json!({
                        "score": hit.score,
                        "reason": hit.reason,
                        "record": hit.record.as_ref(),
                    }))?;
                }
                Ok(())
            } else {
                print_records(&manager.search(&query, limit))
            }
        }
        Commands::Filter {
            content_type,
            industry,
            genre,
            limit,
        } => {
            let criteria = FilterCriteria {
                content_type,
                industry,
                genre,
                ..Default::default()
            };
            print_records(&manager.get_by_filter(&criteria, limit))
        }
        Commands::Category { name, limit } => print_records(&manager.get_by_category(&name, limit)),
        Commands::Show { id } => match manager.get_by_id(&id) {
            Some(record) => print_json(record.as_ref()),
            None => anyhow::bail!("No record with id {id}"),
        },
        Commands::Related { id, limit } => print_records(&manager.get_related(&id, limit)),
        Commands::Seasons { id } => print_records(&manager.get_seasons(&id)),
        Commands::Random => match manager.get_random_for_hero() {
            Some(record) => print_json(record.as_ref()),
            None => Ok(()),
        },
        Commands::Cache { .. } => Ok(()),
    }
}

fn print_records(records: &[Arc<ContentRecord>]) -> Result<()> {
    for record in records {
        print_json(record.as_ref())?;
    }
    Ok(())
}

fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<()> {
    let line = serde_json::to_string(value).context("Failed to serialize output")?;
    println!("{line}");
    Ok(())
}
