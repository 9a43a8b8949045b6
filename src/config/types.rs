use anyhow::Result;
use log::warn;
use serde::{Deserialize, Serialize};
use std::env;

use crate::models::TokenKeyScheme;
use crate::strategy::RatingStrategy;

/// Configuration for a yield ranker run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// SQLite database path or URL
    pub database_path: String,
    /// Path of the persisted pool listing snapshot
    pub snapshot_path: String,
    /// Endpoint returning the full pool listing
    pub listing_endpoint: String,
    /// Base endpoint for per-pool chart series
    pub series_endpoint: String,
    /// Per-request timeout for the market data API
    pub request_timeout_secs: u64,
    /// Maximum in-flight chart fetches per run
    pub max_concurrent_fetches: usize,
    /// Which rating derivation to apply
    pub rating_strategy: RatingStrategy,
    /// How token tiers are keyed for strategy ratings
    pub token_key_scheme: TokenKeyScheme,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            database_path: "ratings.db".to_string(),
            snapshot_path: "data/pools.json".to_string(),
            listing_endpoint: "https://yields.llama.fi/pools".to_string(),
            series_endpoint: "https://yields.llama.fi/chart".to_string(),
            request_timeout_secs: 30,
            max_concurrent_fetches: 8,
            rating_strategy: RatingStrategy::DurationWeighted,
            token_key_scheme: TokenKeyScheme::ChainQualified,
        }
    }
}

/// Loads configuration from environment variables, falling back to default values
pub fn load_config() -> Result<Config> {
    let mut config = Config::default();

    if let Ok(database_path) = env::var("DATABASE_PATH") {
        config.database_path = database_path;
    }

    if let Ok(snapshot_path) = env::var("SNAPSHOT_PATH") {
        config.snapshot_path = snapshot_path;
    }

    if let Ok(listing_endpoint) = env::var("LISTING_ENDPOINT") {
        config.listing_endpoint = listing_endpoint;
    }

    if let Ok(series_endpoint) = env::var("SERIES_ENDPOINT") {
        config.series_endpoint = series_endpoint;
    }

    if let Ok(timeout) = env::var("REQUEST_TIMEOUT_SECS") {
        if let Ok(value) = timeout.parse::<u64>() {
            config.request_timeout_secs = value;
        }
    }

    if let Ok(fetches) = env::var("MAX_CONCURRENT_FETCHES") {
        if let Ok(value) = fetches.parse::<usize>() {
            config.max_concurrent_fetches = value.max(1);
        }
    }

    if let Ok(raw) = env::var("RATING_STRATEGY") {
        match RatingStrategy::parse(&raw) {
            Some(strategy) => config.rating_strategy = strategy,
            None => warn!(
                "Unknown RATING_STRATEGY '{}', keeping {:?}",
                raw, config.rating_strategy
            ),
        }
    }

    if let Ok(raw) = env::var("TOKEN_KEY_SCHEME") {
        match TokenKeyScheme::parse(&raw) {
            Some(scheme) => config.token_key_scheme = scheme,
            None => warn!(
                "Unknown TOKEN_KEY_SCHEME '{}', keeping {:?}",
                raw, config.token_key_scheme
            ),
        }
    }

    Ok(config)
}
