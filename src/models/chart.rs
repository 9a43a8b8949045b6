use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One point of a pool's historical chart series
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChartPoint {
    pub timestamp: DateTime<Utc>,
    #[serde(rename = "tvlUsd")]
    pub tvl_usd: Option<f64>,
    pub apy: Option<f64>,
}

/// Wrapper matching the upstream chart response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChartResponse {
    pub data: Vec<ChartPoint>,
}

/// Current metrics extracted from a pool's chart series
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PoolMetrics {
    /// TVL at the most recent point, 0 when absent
    pub tvl_usd: f64,
    /// APY at the most recent point, 0 when absent
    pub apy: f64,
    /// Whole days between the first and last point, rounded up
    pub elapsed_days: u64,
}
