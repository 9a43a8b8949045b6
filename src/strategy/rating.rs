use serde::{Deserialize, Serialize};

use crate::models::{PoolMetrics, Rating};

/// How a pool's raw rating is derived from its chart metrics.
///
/// Both derivations are in production use; deployments pick one via
/// configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RatingStrategy {
    /// TVL at the last point times the observed duration in days
    DurationWeighted,
    /// TVL at the last point times APY, rounded to a whole number
    YieldWeighted,
}

impl RatingStrategy {
    /// Parse a configuration string; None for unrecognized values
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "duration" | "duration-weighted" => Some(RatingStrategy::DurationWeighted),
            "yield" | "yield-weighted" => Some(RatingStrategy::YieldWeighted),
            _ => None,
        }
    }

    /// Derive the raw comparison score from current metrics
    pub fn rate(&self, metrics: &PoolMetrics) -> Rating {
        match self {
            RatingStrategy::DurationWeighted => {
                Rating::Score(metrics.tvl_usd * metrics.elapsed_days as f64)
            }
            RatingStrategy::YieldWeighted => {
                Rating::Score((metrics.tvl_usd * metrics.apy).round())
            }
        }
    }
}
