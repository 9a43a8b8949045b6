use anyhow::{Context, Result};
use dotenv::dotenv;
use log::{info, warn};

use yield_ranker::config;
use yield_ranker::db::Database;
use yield_ranker::llama::{MarketDataClient, MarketDataSource};
use yield_ranker::snapshot::SnapshotStore;
use yield_ranker::strategy::ScoringEngine;
use yield_ranker::sync::ReconciliationEngine;

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize environment variables
    dotenv().ok();

    // Initialize logging
    init_logger();

    info!("Starting yield ranker run...");

    // Load configuration
    let config = config::load_config()?;
    info!("Configuration loaded");

    // Connect to database; failing to open it is fatal to the run
    let db = Database::new(&config.database_path)
        .await
        .with_context(|| format!("Failed to open database at {}", config.database_path))?;
    info!("Database initialized");

    let catalog = db.pool_catalog();
    let tokens = db.token_risk_table();

    let client = MarketDataClient::new(&config).context("Failed to build market data client")?;

    // Fetch the full listing; without it there is nothing to reconcile
    let listing = client
        .fetch_pool_listing()
        .await
        .context("Initial pool listing fetch failed")?;
    info!("Fetched {} pools from the upstream listing", listing.len());

    // Persist the snapshot; a write failure degrades but does not abort
    let snapshot = SnapshotStore::new(&config.snapshot_path);
    if let Err(e) = snapshot.save_listing(&listing) {
        warn!("Failed to persist listing snapshot: {}", e);
    }

    let known_ids = catalog
        .list_ids()
        .await
        .context("Failed to read pool catalog ids")?;
    info!("Reconciling {} catalog pools", known_ids.len());

    let recon = ReconciliationEngine::new(&catalog, &client, config.max_concurrent_fetches);
    let recon_report = recon.reconcile(&listing, &known_ids).await;
    info!("Reconciliation complete: {}", recon_report);

    let scoring = ScoringEngine::new(
        &catalog,
        &tokens,
        config.rating_strategy,
        config.token_key_scheme,
        config.max_concurrent_fetches,
    );

    let rating_report = scoring.score_pools(&recon, &known_ids).await;
    info!("Rating pass complete: {}", rating_report);

    let strategy_report = scoring
        .apply_strategy_ratings()
        .await
        .context("Strategy rating pass failed")?;
    info!("Strategy rating pass complete: {}", strategy_report);

    db.close().await;
    info!("Run finished");
    Ok(())
}

fn init_logger() {
    env_logger::init_from_env(env_logger::Env::default().filter_or("RUST_LOG", "info"));
}
