use async_trait::async_trait;
use log::debug;
use reqwest::StatusCode;
use std::time::Duration;

use crate::config::Config;
use crate::error::SyncError;
use crate::models::{ChartPoint, ChartResponse, PoolListing, PoolListingEntry};

/// Source of external pool listings and chart series.
///
/// Abstracted so the reconciliation and scoring stages can run against
/// a stub in tests.
#[async_trait]
pub trait MarketDataSource {
    /// Fetch the full current pool listing
    async fn fetch_pool_listing(&self) -> Result<Vec<PoolListingEntry>, SyncError>;

    /// Fetch the ordered chart series for one pool.
    ///
    /// An upstream "no data for this id" answer is an empty series,
    /// not an error.
    async fn fetch_pool_series(&self, pool_id: &str) -> Result<Vec<ChartPoint>, SyncError>;
}

/// Client for the DeFiLlama yields API
pub struct MarketDataClient {
    http: reqwest::Client,
    listing_endpoint: String,
    series_endpoint: String,
}

impl MarketDataClient {
    /// Create a client from the application configuration
    pub fn new(config: &Config) -> Result<Self, SyncError> {
        Self::with_endpoints(
            &config.listing_endpoint,
            &config.series_endpoint,
            config.request_timeout_secs,
        )
    }

    /// Create a client against explicit endpoints
    pub fn with_endpoints(
        listing_endpoint: &str,
        series_endpoint: &str,
        timeout_secs: u64,
    ) -> Result<Self, SyncError> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .build()
            .map_err(|e| SyncError::upstream(listing_endpoint, e))?;

        Ok(Self {
            http,
            listing_endpoint: listing_endpoint.trim_end_matches('/').to_string(),
            series_endpoint: series_endpoint.trim_end_matches('/').to_string(),
        })
    }
}

#[async_trait]
impl MarketDataSource for MarketDataClient {
    async fn fetch_pool_listing(&self) -> Result<Vec<PoolListingEntry>, SyncError> {
        let url = &self.listing_endpoint;
        debug!("Fetching pool listing from {}", url);

        let response = self
            .http
            .get(url)
            .send()
            .await
            .map_err(|e| SyncError::upstream(url, e))?;

        if !response.status().is_success() {
            return Err(SyncError::upstream_status(url, response.status()));
        }

        let listing: PoolListing = response
            .json()
            .await
            .map_err(|e| SyncError::upstream(url, e))?;

        Ok(listing.data)
    }

    async fn fetch_pool_series(&self, pool_id: &str) -> Result<Vec<ChartPoint>, SyncError> {
        let url = format!("{}/{}", self.series_endpoint, pool_id);
        debug!("Fetching chart series from {}", url);

        let response = self
            .http
            .get(&url)
            .send()
            .await
            .map_err(|e| SyncError::upstream(&url, e))?;

        // The upstream answers 404 for ids it has never charted
        if response.status() == StatusCode::NOT_FOUND {
            return Ok(Vec::new());
        }

        if !response.status().is_success() {
            return Err(SyncError::upstream_status(&url, response.status()));
        }

        let chart: ChartResponse = response
            .json()
            .await
            .map_err(|e| SyncError::upstream(&url, e))?;

        Ok(chart.data)
    }
}
