use futures::stream::{self, StreamExt};
use log::{debug, error, info, warn};
use std::collections::HashMap;

use crate::db::{PoolCatalog, TokenRiskTable};
use crate::error::SyncError;
use crate::models::{token_key, PoolRecord, PoolUpdate, Rating, TokenKeyScheme};
use crate::strategy::RatingStrategy;
use crate::sync::{BatchReport, ItemOutcome, ReconciliationEngine};
use crate::utils::short_id;

/// Fixed normalization factor bringing raw TVL-scale ratings into a
/// human-comparable range
const STRATEGY_RATING_SCALE: f64 = 10_000_000.0;

/// Computes raw ratings and token-risk-adjusted strategy ratings
pub struct ScoringEngine<'a> {
    catalog: &'a PoolCatalog,
    tokens: &'a TokenRiskTable,
    strategy: RatingStrategy,
    key_scheme: TokenKeyScheme,
    max_in_flight: usize,
}

impl<'a> ScoringEngine<'a> {
    pub fn new(
        catalog: &'a PoolCatalog,
        tokens: &'a TokenRiskTable,
        strategy: RatingStrategy,
        key_scheme: TokenKeyScheme,
        max_in_flight: usize,
    ) -> Self {
        Self {
            catalog,
            tokens,
            strategy,
            key_scheme,
            max_in_flight: max_in_flight.max(1),
        }
    }

    /// Fetch chart metrics for every known pool and persist rating and
    /// roi, with a bounded number of in-flight chart fetches.
    ///
    /// A pool without chart data gets the no-data sentinel; a pool
    /// whose fetch fails gets the error sentinel. Neither aborts the
    /// batch.
    pub async fn score_pools(
        &self,
        source: &ReconciliationEngine<'_>,
        known_ids: &[String],
    ) -> BatchReport {
        let outcomes: Vec<ItemOutcome> = stream::iter(known_ids)
            .map(|pool_id| self.score_one(source, pool_id))
            .buffer_unordered(self.max_in_flight)
            .collect()
            .await;

        let mut report = BatchReport::default();
        for outcome in &outcomes {
            report.record(outcome);
        }
        report
    }

    async fn score_one(&self, source: &ReconciliationEngine<'_>, pool_id: &str) -> ItemOutcome {
        let (rating, roi, fetch_failure) = match source.compute_current_metrics(pool_id).await {
            Ok(Some(metrics)) => (self.strategy.rate(&metrics), Some(metrics.apy), None),
            Ok(None) => {
                info!("No chart data for pool {}", short_id(pool_id));
                (Rating::NoData, None, None)
            }
            Err(e) => {
                warn!("Chart fetch failed for pool {}: {}", short_id(pool_id), e);
                (Rating::FetchError, None, Some(e.to_string()))
            }
        };

        let update = PoolUpdate {
            rating: Some(rating.as_db_value()),
            roi,
            ..Default::default()
        };

        match self.catalog.update_fields(pool_id, &update).await {
            Ok(true) => match fetch_failure {
                None => {
                    debug!("Scored pool {} as {:?}", short_id(pool_id), rating);
                    ItemOutcome::Updated
                }
                Some(reason) => ItemOutcome::Failed(reason),
            },
            Ok(false) => {
                warn!("No catalog row for pool {} while scoring", short_id(pool_id));
                ItemOutcome::Skipped(format!("no catalog row for {}", pool_id))
            }
            Err(e) => {
                error!("Failed to record rating for pool {}: {}", short_id(pool_id), e);
                ItemOutcome::Failed(e.to_string())
            }
        }
    }

    /// Normalize every pool's rating by its average token tier and
    /// persist the result.
    ///
    /// The tier map is loaded once for the whole pass. Pools that
    /// cannot be scored keep their previous strategy_rating; the skip
    /// is deliberate, not a reset.
    pub async fn apply_strategy_ratings(&self) -> Result<BatchReport, SyncError> {
        let tiers = self.tokens.load_all(self.key_scheme).await?;
        debug!("Loaded {} token tiers", tiers.len());

        let pools = self.catalog.list_all().await?;
        let mut report = BatchReport::default();

        for pool in &pools {
            let outcome = match self.strategy_rating(pool, &tiers) {
                Ok(value) => {
                    let update = PoolUpdate {
                        strategy_rating: Some(value),
                        ..Default::default()
                    };
                    match self.catalog.update_fields(&pool.pool_id, &update).await {
                        Ok(true) => {
                            debug!(
                                "Strategy rating for pool {} set to {}",
                                short_id(&pool.pool_id),
                                value
                            );
                            ItemOutcome::Updated
                        }
                        Ok(false) => ItemOutcome::Skipped(format!(
                            "no catalog row for {}",
                            pool.pool_id
                        )),
                        Err(e) => {
                            error!(
                                "Failed to record strategy rating for pool {}: {}",
                                short_id(&pool.pool_id),
                                e
                            );
                            ItemOutcome::Failed(e.to_string())
                        }
                    }
                }
                Err(reason) => {
                    info!(
                        "Skipping strategy rating for pool {}: {}",
                        short_id(&pool.pool_id),
                        reason
                    );
                    ItemOutcome::Skipped(reason)
                }
            };
            report.record(&outcome);
        }

        Ok(report)
    }

    /// One pool's strategy rating, or the reason it cannot be computed
    fn strategy_rating(
        &self,
        pool: &PoolRecord,
        tiers: &HashMap<String, f64>,
    ) -> Result<f64, String> {
        let token1 = pool
            .token1
            .as_deref()
            .ok_or_else(|| "token1 not populated".to_string())?;
        let token2 = pool
            .token2
            .as_deref()
            .ok_or_else(|| "token2 not populated".to_string())?;
        let chain = pool.chain.as_deref();

        let tier1 = self.tier_for(token1, chain, tiers);
        let tier2 = self.tier_for(token2, chain, tiers);
        if tier1 <= 0.0 || tier2 <= 0.0 {
            return Err(format!(
                "missing or non-positive tier for {} ({}) or {} ({})",
                token1, tier1, token2, tier2
            ));
        }

        let average_tier = (tier1 + tier2) / 2.0;
        let rating = pool
            .rating
            .as_deref()
            .map(Rating::from_db_value)
            .and_then(|r| r.score())
            .unwrap_or(0.0);

        if average_tier > 0.0 && rating > 0.0 {
            Ok(rating / average_tier / STRATEGY_RATING_SCALE)
        } else {
            Err(format!(
                "non-positive rating ({}) or average tier ({})",
                rating, average_tier
            ))
        }
    }

    fn tier_for(&self, token: &str, chain: Option<&str>, tiers: &HashMap<String, f64>) -> f64 {
        token_key(token, chain, self.key_scheme)
            .and_then(|key| tiers.get(&key).copied())
            .unwrap_or(0.0)
    }
}
