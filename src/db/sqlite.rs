use sqlx::sqlite::{SqlitePool, SqlitePoolOptions};
use std::fs::File;
use std::path::Path;

use crate::db::{PoolCatalog, TokenRiskTable};
use crate::error::SyncError;

/// Database manager for handling SQLite operations
pub struct Database {
    pool: SqlitePool,
}

impl Database {
    /// Create a new database connection
    pub async fn new(database_url: &str) -> Result<Self, SyncError> {
        // Ensure the database file exists
        if database_url != "sqlite::memory:" && !database_url.starts_with("sqlite:") {
            let db_path = Path::new(database_url);
            if !db_path.exists() {
                File::create(db_path)?;
            }
        }

        let connect_url = if database_url.starts_with("sqlite:") {
            database_url.to_string()
        } else {
            format!("sqlite://{}", database_url)
        };

        // An in-memory database is private to its connection, so the
        // pool must not hand out more than one
        let max_connections = if database_url.contains(":memory:") { 1 } else { 5 };

        let pool = SqlitePoolOptions::new()
            .max_connections(max_connections)
            .connect(&connect_url)
            .await?;

        // Initialize schema if needed
        let db = Self { pool };
        db.init_schema().await?;

        Ok(db)
    }

    /// Initialize the database schema
    pub async fn init_schema(&self) -> Result<(), SyncError> {
        // Create tables if they don't exist
        sqlx::query(
            "CREATE TABLE IF NOT EXISTS pools (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                pool_id TEXT NOT NULL UNIQUE,
                chain TEXT,
                protocol TEXT,
                token1 TEXT,
                token2 TEXT,
                rating TEXT,
                roi REAL,
                strategy_rating REAL
            )",
        )
        .execute(&self.pool)
        .await?;

        sqlx::query(
            "CREATE TABLE IF NOT EXISTS tokens (
                token TEXT,
                chain TEXT,
                tier REAL NOT NULL
            )",
        )
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Repository over the pools table
    pub fn pool_catalog(&self) -> PoolCatalog {
        PoolCatalog::new(self.pool.clone())
    }

    /// Repository over the operator-curated tokens table
    pub fn token_risk_table(&self) -> TokenRiskTable {
        TokenRiskTable::new(self.pool.clone())
    }

    /// Release all connections
    pub async fn close(&self) {
        self.pool.close().await;
    }
}

/// Initialize an in-memory database for testing
#[cfg(test)]
pub async fn init_test_db() -> Result<Database, SyncError> {
    Database::new("sqlite::memory:").await
}
