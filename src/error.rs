use std::path::PathBuf;
use thiserror::Error;

/// Errors produced by the sync-and-scoring pipeline
#[derive(Debug, Error)]
pub enum SyncError {
    /// Network failure or non-2xx response from the market data API
    #[error("upstream unavailable ({url}): {reason}")]
    UpstreamUnavailable { url: String, reason: String },

    /// No pool listing snapshot has been persisted yet
    #[error("no pool listing snapshot at {}", .0.display())]
    SnapshotMissing(PathBuf),

    /// Snapshot blob could not be read or written
    #[error("snapshot I/O failure: {0}")]
    SnapshotIo(#[from] std::io::Error),

    /// Payload did not match the expected JSON shape
    #[error("malformed payload: {0}")]
    MalformedPayload(#[from] serde_json::Error),

    /// Database read/write failure
    #[error("persistence failure: {0}")]
    Persistence(#[from] sqlx::Error),
}

impl SyncError {
    /// Wrap a transport-level HTTP error against the given URL
    pub fn upstream(url: impl Into<String>, err: reqwest::Error) -> Self {
        Self::UpstreamUnavailable {
            url: url.into(),
            reason: err.to_string(),
        }
    }

    /// Wrap a non-2xx status code against the given URL
    pub fn upstream_status(url: impl Into<String>, status: reqwest::StatusCode) -> Self {
        Self::UpstreamUnavailable {
            url: url.into(),
            reason: format!("HTTP {}", status),
        }
    }
}
