//! Arthik main entry point

use anyhow::Context;
use arthik_api::start_server;
use arthik_config::Config;
use arthik_core::{shared, spawn_periodic_recalculation, FileAuditSink, Ledger};
use clap::Parser;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tokio::runtime::Runtime;

#[derive(Parser, Debug)]
#[command(name = "arthik")]
#[command(author = "Arthik Contributors")]
#[command(version = "0.1.0")]
#[command(about = "A personal double-entry money ledger", long_about = None)]
struct Args {
    /// Configuration file path
    #[arg(short, long, default_value = "config.yaml")]
    config: PathBuf,
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    // The logger needs the configured level, so load failures go straight to stderr.
    let config = match Config::load_or_default(args.config.clone()) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("[{}] {}", e.severity(), e.to_details());
            return Err(e)
                .with_context(|| format!("failed to load configuration from {}", args.config.display()));
        }
    };

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(config.logging.level.as_str())).init();
    if !args.config.exists() {
        log::warn!("Config file {} not found, running with defaults", args.config.display());
    }
    log::info!(
        "Config loaded: data path={}, partition={}",
        config.data_path().display(),
        config.ledger.partition
    );

    std::fs::create_dir_all(config.ledger_path())
        .with_context(|| format!("failed to create {}", config.ledger_path().display()))?;

    let rt = Runtime::new()?;
    rt.block_on(async {
        let audit = Arc::new(FileAuditSink::new(config.audit_path()));
        let mut ledger = Ledger::open(&config, audit).context("failed to open ledger")?;

        let seeded = ledger.seed_default_accounts()?;
        if seeded > 0 {
            log::info!("Created {} default accounts", seeded);
        }

        // Repairs anything a crash left between the record, balance and report writes.
        let summary = ledger.recalculate_all().context("startup recalculation failed")?;
        log::info!(
            "Startup recalculation: {} transactions, {} corrected balances",
            summary.transactions,
            summary.corrected.len()
        );

        let ledger = shared(ledger);
        let batch = if config.batch.enabled {
            let period = Duration::from_secs(config.batch.interval_hours.max(1) * 3600);
            Some(spawn_periodic_recalculation(ledger.clone(), period))
        } else {
            None
        };

        let shutdown = async {
            if let Err(e) = tokio::signal::ctrl_c().await {
                log::error!("Failed to listen for shutdown signal: {}", e);
            }
        };
        let served = start_server(config.clone(), ledger, shutdown).await;

        if let Some(handle) = batch {
            handle.abort();
        }
        served.context("server error")
    })
}
