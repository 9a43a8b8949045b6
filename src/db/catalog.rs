use sqlx::sqlite::SqlitePool;
use sqlx::QueryBuilder;

use crate::error::SyncError;
use crate::models::{PoolRecord, PoolUpdate};

/// Repository owning persistence of the pool catalog
pub struct PoolCatalog {
    pool: SqlitePool,
}

impl PoolCatalog {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Every pool record currently stored
    pub async fn list_all(&self) -> Result<Vec<PoolRecord>, SyncError> {
        let records = sqlx::query_as::<_, PoolRecord>(
            "SELECT id, pool_id, chain, protocol, token1, token2, rating, roi, strategy_rating
             FROM pools ORDER BY id",
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(records)
    }

    /// Just the external pool identifiers, for matching against a listing
    pub async fn list_ids(&self) -> Result<Vec<String>, SyncError> {
        let ids: Vec<(String,)> = sqlx::query_as("SELECT pool_id FROM pools ORDER BY id")
            .fetch_all(&self.pool)
            .await?;

        Ok(ids.into_iter().map(|(id,)| id).collect())
    }

    /// One record by external pool id
    pub async fn get(&self, pool_id: &str) -> Result<Option<PoolRecord>, SyncError> {
        let record = sqlx::query_as::<_, PoolRecord>(
            "SELECT id, pool_id, chain, protocol, token1, token2, rating, roi, strategy_rating
             FROM pools WHERE pool_id = ?",
        )
        .bind(pool_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(record)
    }

    /// Add a pool to the catalog, keyed by its external id.
    ///
    /// Catalog membership is curated out-of-band; this is the seeding
    /// path used by operators and tests.
    pub async fn insert(&self, pool_id: &str) -> Result<i64, SyncError> {
        let result = sqlx::query("INSERT INTO pools (pool_id) VALUES (?)")
            .bind(pool_id)
            .execute(&self.pool)
            .await?;

        Ok(result.last_insert_rowid())
    }

    /// Partial update of one pool's fields, applied in a single statement.
    ///
    /// Returns Ok(false) when no row matched the id; callers treat that
    /// as a reportable skip, not a batch failure.
    pub async fn update_fields(&self, pool_id: &str, update: &PoolUpdate) -> Result<bool, SyncError> {
        if update.is_empty() {
            return Ok(false);
        }

        let mut builder: QueryBuilder<sqlx::Sqlite> = QueryBuilder::new("UPDATE pools SET ");
        let mut fields = builder.separated(", ");

        if let Some(chain) = &update.chain {
            fields.push("chain = ");
            fields.push_bind_unseparated(chain);
        }
        if let Some(protocol) = &update.protocol {
            fields.push("protocol = ");
            fields.push_bind_unseparated(protocol);
        }
        if let Some(token1) = &update.token1 {
            fields.push("token1 = ");
            fields.push_bind_unseparated(token1);
        }
        if let Some(token2) = &update.token2 {
            fields.push("token2 = ");
            fields.push_bind_unseparated(token2);
        }
        if let Some(rating) = &update.rating {
            fields.push("rating = ");
            fields.push_bind_unseparated(rating);
        }
        if let Some(roi) = update.roi {
            fields.push("roi = ");
            fields.push_bind_unseparated(roi);
        }
        if let Some(strategy_rating) = update.strategy_rating {
            fields.push("strategy_rating = ");
            fields.push_bind_unseparated(strategy_rating);
        }

        builder.push(" WHERE pool_id = ");
        builder.push_bind(pool_id);

        let result = builder.build().execute(&self.pool).await?;
        Ok(result.rows_affected() > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::sqlite::init_test_db;

    #[tokio::test]
    async fn update_fields_applies_only_named_fields() {
        let db = init_test_db().await.unwrap();
        let catalog = db.pool_catalog();
        catalog.insert("pool-x").await.unwrap();

        let updated = catalog
            .update_fields(
                "pool-x",
                &PoolUpdate {
                    chain: Some("Ethereum".to_string()),
                    roi: Some(5.0),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        assert!(updated);

        let record = catalog.get("pool-x").await.unwrap().unwrap();
        assert_eq!(record.chain.as_deref(), Some("Ethereum"));
        assert_eq!(record.roi, Some(5.0));
        assert_eq!(record.protocol, None);
        assert_eq!(record.strategy_rating, None);
    }

    #[tokio::test]
    async fn update_fields_reports_unknown_id() {
        let db = init_test_db().await.unwrap();
        let catalog = db.pool_catalog();

        let updated = catalog
            .update_fields(
                "missing",
                &PoolUpdate {
                    chain: Some("Ethereum".to_string()),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        assert!(!updated);
    }

    #[tokio::test]
    async fn empty_update_is_a_no_op() {
        let db = init_test_db().await.unwrap();
        let catalog = db.pool_catalog();
        catalog.insert("pool-x").await.unwrap();

        let updated = catalog
            .update_fields("pool-x", &PoolUpdate::default())
            .await
            .unwrap();
        assert!(!updated);
    }

    #[tokio::test]
    async fn list_ids_returns_external_ids_in_insertion_order() {
        let db = init_test_db().await.unwrap();
        let catalog = db.pool_catalog();
        catalog.insert("pool-a").await.unwrap();
        catalog.insert("pool-b").await.unwrap();

        let ids = catalog.list_ids().await.unwrap();
        assert_eq!(ids, vec!["pool-a".to_string(), "pool-b".to_string()]);
    }

    #[tokio::test]
    async fn list_all_round_trips_records() {
        let db = init_test_db().await.unwrap();
        let catalog = db.pool_catalog();
        catalog.insert("pool-a").await.unwrap();
        catalog
            .update_fields(
                "pool-a",
                &PoolUpdate {
                    token1: Some("USDC".to_string()),
                    token2: Some("WETH".to_string()),
                    rating: Some("12345".to_string()),
                    ..Default::default()
                },
            )
            .await
            .unwrap();

        let all = catalog.list_all().await.unwrap();
        assert_eq!(all.len(), 1);
        assert_eq!(all[0].pool_id, "pool-a");
        assert_eq!(all[0].token1.as_deref(), Some("USDC"));
        assert_eq!(all[0].rating.as_deref(), Some("12345"));
    }
}
