use log::warn;
use sqlx::sqlite::SqlitePool;
use std::collections::HashMap;

use crate::error::SyncError;
use crate::models::{token_key, TokenKeyScheme, TokenRiskEntry};

/// Read-only view of the operator-curated token risk table
pub struct TokenRiskTable {
    pool: SqlitePool,
}

impl TokenRiskTable {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Load all tiers as a normalized-key lookup map.
    ///
    /// Entries that cannot produce a key under the given scheme are
    /// skipped with a warning; they never fail the load. The last
    /// entry wins when two rows normalize to the same key.
    pub async fn load_all(&self, scheme: TokenKeyScheme) -> Result<HashMap<String, f64>, SyncError> {
        let entries = sqlx::query_as::<_, TokenRiskEntry>("SELECT token, chain, tier FROM tokens")
            .fetch_all(&self.pool)
            .await?;

        let mut tiers = HashMap::new();
        for entry in entries {
            let Some(token) = entry.token.as_deref() else {
                warn!("Skipping token tier entry with no token symbol");
                continue;
            };
            match token_key(token, entry.chain.as_deref(), scheme) {
                Some(key) => {
                    tiers.insert(key, entry.tier);
                }
                None => {
                    warn!(
                        "Skipping token tier entry for '{}' (chain {:?}): cannot build a {:?} key",
                        token, entry.chain, scheme
                    );
                }
            }
        }

        Ok(tiers)
    }

    /// Insert one tier row; the operator seeding path used by tests
    pub async fn insert(
        &self,
        token: Option<&str>,
        chain: Option<&str>,
        tier: f64,
    ) -> Result<(), SyncError> {
        sqlx::query("INSERT INTO tokens (token, chain, tier) VALUES (?, ?, ?)")
            .bind(token)
            .bind(chain)
            .bind(tier)
            .execute(&self.pool)
            .await?;

        Ok(())
    }
}
