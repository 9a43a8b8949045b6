use log::debug;
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::SyncError;
use crate::models::{PoolListing, PoolListingEntry};

/// Durable store for the most recent pool listing.
///
/// A single JSON blob shaped `{"data": [...]}`, overwritten on each run.
/// Writes go through a temp file and a rename so a concurrent reader
/// never observes a partially written blob.
pub struct SnapshotStore {
    path: PathBuf,
}

impl SnapshotStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Overwrite the persisted snapshot with the given listing
    pub fn save_listing(&self, listing: &[PoolListingEntry]) -> Result<(), SyncError> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }

        let blob = PoolListing {
            data: listing.to_vec(),
        };
        let json = serde_json::to_vec(&blob)?;

        let tmp = self.path.with_extension("json.tmp");
        fs::write(&tmp, &json)?;
        fs::rename(&tmp, &self.path)?;

        debug!(
            "Saved listing snapshot with {} pools to {}",
            listing.len(),
            self.path.display()
        );
        Ok(())
    }

    /// Load the last saved listing
    pub fn load_listing(&self) -> Result<Vec<PoolListingEntry>, SyncError> {
        if !self.path.exists() {
            return Err(SyncError::SnapshotMissing(self.path.clone()));
        }
        let raw = fs::read(&self.path)?;
        let blob: PoolListing = serde_json::from_slice(&raw)?;
        Ok(blob.data)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::PoolListingEntry;
    use tempfile::tempdir;

    fn entry(pool: &str) -> PoolListingEntry {
        PoolListingEntry {
            pool: pool.to_string(),
            chain: "Ethereum".to_string(),
            project: "uniswap-v3".to_string(),
            symbol: "USDC-WETH".to_string(),
            apy: Some(4.2),
            tvl_usd: Some(1_000_000.0),
        }
    }

    #[test]
    fn save_then_load_round_trips() {
        let dir = tempdir().unwrap();
        let store = SnapshotStore::new(dir.path().join("pools.json"));

        store.save_listing(&[entry("a"), entry("b")]).unwrap();
        let loaded = store.load_listing().unwrap();

        assert_eq!(loaded.len(), 2);
        assert_eq!(loaded[0].pool, "a");
        assert_eq!(loaded[1].pool, "b");
    }

    #[test]
    fn save_overwrites_the_previous_blob() {
        let dir = tempdir().unwrap();
        let store = SnapshotStore::new(dir.path().join("pools.json"));

        store.save_listing(&[entry("a")]).unwrap();
        store.save_listing(&[entry("b")]).unwrap();

        let loaded = store.load_listing().unwrap();
        assert_eq!(loaded.len(), 1);
        assert_eq!(loaded[0].pool, "b");
    }

    #[test]
    fn load_without_save_reports_missing() {
        let dir = tempdir().unwrap();
        let store = SnapshotStore::new(dir.path().join("pools.json"));

        match store.load_listing() {
            Err(SyncError::SnapshotMissing(path)) => {
                assert_eq!(path, dir.path().join("pools.json"));
            }
            other => panic!("expected SnapshotMissing, got {:?}", other.map(|v| v.len())),
        }
    }
}
