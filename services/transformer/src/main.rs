//! Transformer Service - Harmonizes food recall sources into a star schema
//!
//! Responsibilities:
//! - Normalize FDA, FSIS, RASFF and UK FSA recalls plus CDC NORS outbreaks
//!   and FDA CAERS adverse events
//! - Register geography, classification, product and company dimensions
//! - Classify recall reasons into a three-level taxonomy
//! - Assemble fact tables and write them as CSV (optionally to PostgreSQL)
//!
//! Runs are deterministic: the same inputs in the same order yield the same
//! surrogate keys and the same tables.

mod adverse;
mod calendar;
mod classify;
mod config;
mod db;
mod dimensions;
mod error;
mod facts;
mod geography;
mod health;
mod model;
mod output;
mod pipeline;
mod product;
mod schema;
mod severity;
mod sources;
mod summary;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

use crate::calendar::DateDimension;
use crate::classify::{ReasonClassifier, ReasonRules};
use crate::config::{Args, Config};

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let args = Args::parse();
    let config = Config::from_env()?.with_args(&args);

    info!("=== Food Recall Star Schema Transformer ===");
    info!(mode = if args.dry_run { "dry-run" } else { "live" }, "starting run");

    let rules = match &config.rules {
        Some(path) => {
            info!(path = %path.display(), "loading classification rules");
            ReasonRules::from_path(path)
                .with_context(|| format!("Failed to load rules from {}", path.display()))?
        }
        None => ReasonRules::default(),
    };
    let classifier = ReasonClassifier::new(rules);
    let dates = DateDimension::new(config.date_start_year, config.date_end_year)?;

    let paths = config.sources.clone();
    let loaded = tokio::task::spawn_blocking(move || sources::load_all(&paths))
        .await
        .context("Source loading task failed")?
        .context("Failed to load sources")?;

    let run = pipeline::build(&loaded, &classifier, &dates);
    run.summary.log();

    if args.dry_run {
        info!("Dry run - no tables written");
        return Ok(());
    }

    let written = output::write_all(&config.output_dir, &run.schema)
        .with_context(|| format!("Failed to write tables to {}", config.output_dir.display()))?;
    info!(tables = written.len(), dir = %config.output_dir.display(), "star schema written");

    if args.load_db {
        let db_url = config.db_url.as_deref().context("DB_URL env var missing")?;
        let pool = db::connect(db_url)
            .await
            .context("Failed to connect to database")?;
        let job_run_id = db::load(&pool, &run.schema).await?;
        info!(job_run_id = %job_run_id, "database load complete");
    }

    Ok(())
}
