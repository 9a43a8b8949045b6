use serde::{Deserialize, Serialize};

/// Sentinel stored in the rating column when a pool has no chart data
pub const NO_DATA_SENTINEL: &str = "No data available";
/// Sentinel stored in the rating column when the chart fetch failed
pub const FETCH_ERROR_SENTINEL: &str = "Error fetching data";

/// A pool row as persisted in the catalog
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct PoolRecord {
    pub id: i64,
    /// External pool identifier, stable across runs
    pub pool_id: String,
    pub chain: Option<String>,
    pub protocol: Option<String>,
    pub token1: Option<String>,
    pub token2: Option<String>,
    /// Numeric string or one of the sentinel values
    pub rating: Option<String>,
    /// Annual percentage yield from the last sync
    pub roi: Option<f64>,
    /// Risk-adjusted score, absent until successfully computed
    pub strategy_rating: Option<f64>,
}

/// One entry of the upstream pool listing
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PoolListingEntry {
    /// External pool identifier
    pub pool: String,
    pub chain: String,
    pub project: String,
    /// Composite symbol, e.g. "USDC-WETH"
    pub symbol: String,
    pub apy: Option<f64>,
    #[serde(rename = "tvlUsd")]
    pub tvl_usd: Option<f64>,
}

/// Wrapper matching the upstream listing response and the snapshot blob
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PoolListing {
    pub data: Vec<PoolListingEntry>,
}

/// A partial update of catalog fields for one pool
#[derive(Debug, Clone, Default)]
pub struct PoolUpdate {
    pub chain: Option<String>,
    pub protocol: Option<String>,
    pub token1: Option<String>,
    pub token2: Option<String>,
    pub rating: Option<String>,
    pub roi: Option<f64>,
    pub strategy_rating: Option<f64>,
}

impl PoolUpdate {
    pub fn is_empty(&self) -> bool {
        self.chain.is_none()
            && self.protocol.is_none()
            && self.token1.is_none()
            && self.token2.is_none()
            && self.rating.is_none()
            && self.roi.is_none()
            && self.strategy_rating.is_none()
    }
}

/// A pool's comparison score, either numeric or a sentinel
#[derive(Debug, Clone, PartialEq)]
pub enum Rating {
    Score(f64),
    NoData,
    FetchError,
}

impl Rating {
    /// String representation stored in the rating column
    pub fn as_db_value(&self) -> String {
        match self {
            Rating::Score(value) => value.to_string(),
            Rating::NoData => NO_DATA_SENTINEL.to_string(),
            Rating::FetchError => FETCH_ERROR_SENTINEL.to_string(),
        }
    }

    /// Parse a persisted rating column value
    pub fn from_db_value(raw: &str) -> Self {
        match raw {
            NO_DATA_SENTINEL => Rating::NoData,
            FETCH_ERROR_SENTINEL => Rating::FetchError,
            other => other
                .trim()
                .parse::<f64>()
                .map(Rating::Score)
                .unwrap_or(Rating::NoData),
        }
    }

    /// Numeric score, if one was computed
    pub fn score(&self) -> Option<f64> {
        match self {
            Rating::Score(value) => Some(*value),
            _ => None,
        }
    }
}
