use futures::stream::{self, StreamExt};
use log::{debug, error, info, warn};
use std::collections::HashMap;

use crate::db::PoolCatalog;
use crate::error::SyncError;
use crate::llama::MarketDataSource;
use crate::models::{PoolListingEntry, PoolMetrics, PoolUpdate};
use crate::sync::metrics::current_metrics;
use crate::sync::report::{BatchReport, ItemOutcome};
use crate::utils::{short_id, split_composite_symbol};

/// Matches externally fetched pool records against the catalog and
/// applies per-record updates with isolated failure handling
pub struct ReconciliationEngine<'a> {
    catalog: &'a PoolCatalog,
    source: &'a (dyn MarketDataSource + Sync),
    max_in_flight: usize,
}

impl<'a> ReconciliationEngine<'a> {
    pub fn new(
        catalog: &'a PoolCatalog,
        source: &'a (dyn MarketDataSource + Sync),
        max_in_flight: usize,
    ) -> Self {
        Self {
            catalog,
            source,
            max_in_flight: max_in_flight.max(1),
        }
    }

    /// Reconcile every known pool against the fetched listing.
    ///
    /// A pool with no listing match is left unchanged. Per-pool update
    /// failures are logged and counted; the batch never aborts on a
    /// single pool.
    pub async fn reconcile(
        &self,
        listing: &[PoolListingEntry],
        known_ids: &[String],
    ) -> BatchReport {
        let by_id: HashMap<&str, &PoolListingEntry> =
            listing.iter().map(|entry| (entry.pool.as_str(), entry)).collect();

        let outcomes: Vec<ItemOutcome> = stream::iter(known_ids)
            .map(|pool_id| self.reconcile_one(&by_id, pool_id))
            .buffer_unordered(self.max_in_flight)
            .collect()
            .await;

        let mut report = BatchReport::default();
        for outcome in &outcomes {
            report.record(outcome);
        }
        report
    }

    async fn reconcile_one(
        &self,
        listing: &HashMap<&str, &PoolListingEntry>,
        pool_id: &str,
    ) -> ItemOutcome {
        let Some(entry) = listing.get(pool_id) else {
            info!(
                "No listing match for pool {}, leaving record unchanged",
                short_id(pool_id)
            );
            return ItemOutcome::Skipped(format!("no listing match for {}", pool_id));
        };

        let (token1, token2) = split_composite_symbol(&entry.symbol);
        let update = PoolUpdate {
            chain: Some(entry.chain.clone()),
            protocol: Some(entry.project.clone()),
            token1: Some(token1),
            token2: Some(token2),
            roi: Some(entry.apy.unwrap_or(0.0)),
            ..Default::default()
        };

        match self.catalog.update_fields(pool_id, &update).await {
            Ok(true) => {
                debug!("Reconciled pool {}", short_id(pool_id));
                ItemOutcome::Updated
            }
            Ok(false) => {
                warn!(
                    "Pool {} matched the listing but no catalog row was updated",
                    short_id(pool_id)
                );
                ItemOutcome::Skipped(format!("no catalog row for {}", pool_id))
            }
            Err(e) => {
                error!("Failed to update pool {}: {}", short_id(pool_id), e);
                ItemOutcome::Failed(e.to_string())
            }
        }
    }

    /// Current TVL/APY and observed duration for one pool.
    ///
    /// Ok(None) means the upstream has no chart data for the id; errors
    /// are transport failures only.
    pub async fn compute_current_metrics(
        &self,
        pool_id: &str,
    ) -> Result<Option<PoolMetrics>, SyncError> {
        let series = self.source.fetch_pool_series(pool_id).await?;
        Ok(current_metrics(&series))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::sqlite::init_test_db;
    use crate::models::ChartPoint;
    use async_trait::async_trait;

    struct StubSource {
        series: HashMap<String, Vec<ChartPoint>>,
    }

    impl StubSource {
        fn empty() -> Self {
            Self {
                series: HashMap::new(),
            }
        }
    }

    #[async_trait]
    impl MarketDataSource for StubSource {
        async fn fetch_pool_listing(&self) -> Result<Vec<PoolListingEntry>, SyncError> {
            Ok(Vec::new())
        }

        async fn fetch_pool_series(&self, pool_id: &str) -> Result<Vec<ChartPoint>, SyncError> {
            Ok(self.series.get(pool_id).cloned().unwrap_or_default())
        }
    }

    fn entry(pool: &str, chain: &str, project: &str, symbol: &str, apy: Option<f64>) -> PoolListingEntry {
        PoolListingEntry {
            pool: pool.to_string(),
            chain: chain.to_string(),
            project: project.to_string(),
            symbol: symbol.to_string(),
            apy,
            tvl_usd: Some(1_000.0),
        }
    }

    #[tokio::test]
    async fn matched_pool_is_updated_and_unmatched_left_untouched() {
        let db = init_test_db().await.unwrap();
        let catalog = db.pool_catalog();
        catalog.insert("X").await.unwrap();
        catalog.insert("Y").await.unwrap();

        let source = StubSource::empty();
        let engine = ReconciliationEngine::new(&catalog, &source, 4);

        let listing = vec![entry("X", "ETH", "uni", "AAA-BBB", Some(5.0))];
        let report = engine
            .reconcile(&listing, &["X".to_string(), "Y".to_string()])
            .await;

        assert_eq!(report.updated, 1);
        assert_eq!(report.skipped, 1);
        assert_eq!(report.failed, 0);

        let x = catalog.get("X").await.unwrap().unwrap();
        assert_eq!(x.chain.as_deref(), Some("ETH"));
        assert_eq!(x.protocol.as_deref(), Some("uni"));
        assert_eq!(x.token1.as_deref(), Some("AAA"));
        assert_eq!(x.token2.as_deref(), Some("BBB"));
        assert_eq!(x.roi, Some(5.0));

        let y = catalog.get("Y").await.unwrap().unwrap();
        assert_eq!(y.chain, None);
        assert_eq!(y.token1, None);
        assert_eq!(y.roi, None);
    }

    #[tokio::test]
    async fn single_asset_symbol_fills_both_tokens() {
        let db = init_test_db().await.unwrap();
        let catalog = db.pool_catalog();
        catalog.insert("X").await.unwrap();

        let source = StubSource::empty();
        let engine = ReconciliationEngine::new(&catalog, &source, 4);

        let listing = vec![entry("X", "Ethereum", "lido", "STETH", None)];
        engine.reconcile(&listing, &["X".to_string()]).await;

        let x = catalog.get("X").await.unwrap().unwrap();
        assert_eq!(x.token1.as_deref(), Some("STETH"));
        assert_eq!(x.token2.as_deref(), Some("STETH"));
        // APY absent in the listing defaults to 0
        assert_eq!(x.roi, Some(0.0));
    }

    #[tokio::test]
    async fn a_missing_catalog_row_does_not_block_the_batch() {
        let db = init_test_db().await.unwrap();
        let catalog = db.pool_catalog();
        catalog.insert("X").await.unwrap();

        let source = StubSource::empty();
        let engine = ReconciliationEngine::new(&catalog, &source, 4);

        // "ghost" appears in the listing and the id set but has no row
        let listing = vec![
            entry("X", "ETH", "uni", "AAA-BBB", Some(5.0)),
            entry("ghost", "ETH", "uni", "CCC-DDD", Some(1.0)),
        ];
        let report = engine
            .reconcile(&listing, &["ghost".to_string(), "X".to_string()])
            .await;

        assert_eq!(report.updated, 1);
        assert_eq!(report.skipped, 1);

        let x = catalog.get("X").await.unwrap().unwrap();
        assert_eq!(x.token1.as_deref(), Some("AAA"));
    }

    #[tokio::test]
    async fn reconcile_is_idempotent_for_an_unchanged_listing() {
        let db = init_test_db().await.unwrap();
        let catalog = db.pool_catalog();
        catalog.insert("X").await.unwrap();

        let source = StubSource::empty();
        let engine = ReconciliationEngine::new(&catalog, &source, 4);
        let listing = vec![entry("X", "ETH", "uni", "AAA-BBB", Some(5.0))];

        let first = engine.reconcile(&listing, &["X".to_string()]).await;
        let after_first = catalog.get("X").await.unwrap().unwrap();

        let second = engine.reconcile(&listing, &["X".to_string()]).await;
        let after_second = catalog.get("X").await.unwrap().unwrap();

        assert_eq!(first, second);
        assert_eq!(after_first.chain, after_second.chain);
        assert_eq!(after_first.token1, after_second.token1);
        assert_eq!(after_first.token2, after_second.token2);
        assert_eq!(after_first.roi, after_second.roi);
    }

    #[tokio::test]
    async fn metrics_come_from_the_stubbed_series() {
        let db = init_test_db().await.unwrap();
        let catalog = db.pool_catalog();

        let mut source = StubSource::empty();
        source.series.insert(
            "X".to_string(),
            vec![
                ChartPoint {
                    timestamp: "2024-01-01T00:00:00Z".parse().unwrap(),
                    tvl_usd: Some(100.0),
                    apy: Some(1.0),
                },
                ChartPoint {
                    timestamp: "2024-01-05T00:00:00Z".parse().unwrap(),
                    tvl_usd: Some(400.0),
                    apy: Some(2.5),
                },
            ],
        );

        let engine = ReconciliationEngine::new(&catalog, &source, 4);

        let metrics = engine.compute_current_metrics("X").await.unwrap().unwrap();
        assert_eq!(metrics.tvl_usd, 400.0);
        assert_eq!(metrics.apy, 2.5);
        assert_eq!(metrics.elapsed_days, 4);

        // An id the upstream has never charted is no-data, not an error
        assert_eq!(engine.compute_current_metrics("unknown").await.unwrap(), None);
    }
}
