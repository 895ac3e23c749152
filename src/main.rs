//! Command-line interface for trx-stress.
//!
//! ```bash
//! # rounds from trx-stress.yaml (default 10)
//! trx-stress
//!
//! # three rounds
//! trx-stress --batch 3
//! ```
//!
//! Configuration is read from `trx-stress.yaml` in the working
//! directory; a missing config file is fatal. The word corpus is picked
//! up from the conventional dictionary path when present.

use anyhow::Context;
use clap::Parser;
use std::sync::Arc;
use trx_config::{Config, CONFIG_PATH};
use trx_corpus::WordCorpus;
use trx_stress::batch;

#[derive(Parser)]
#[command(name = "trx-stress")]
#[command(about = "Randomized insert/update/delete load against a trx table")]
struct Cli {
    /// Number of batch rounds to run
    #[arg(short, long)]
    batch: Option<u32>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    if let Err(e) = run().await {
        eprintln!("Error: {e:#}");
        std::process::exit(1);
    }
    Ok(())
}

async fn run() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();

    let config = Config::from_file(CONFIG_PATH)
        .with_context(|| format!("failed to load config from {CONFIG_PATH}"))?;
    let rounds = cli.batch.unwrap_or(config.batch_rounds);
    let corpus = WordCorpus::load_default().map(Arc::new);

    batch::run_rounds(rounds, Arc::new(config), corpus).await;
    Ok(())
}
