//! Error types at the catalog's I/O seams.
//!
//! None of these reach callers of the query API: the loader and the cache
//! log them and degrade to "no records" / "cache miss".

use thiserror::Error;

/// Failure to fetch or parse one data source
#[derive(Debug, Error)]
pub enum SourceError {
    #[error("failed to read source {source_name}: {error}")]
    Io {
        source_name: String,
        #[source]
        error: std::io::Error,
    },

    #[error("request for source {source_name} failed: {error}")]
    Http {
        source_name: String,
        #[source]
        error: reqwest::Error,
    },

    #[error("source {source_name} returned status {status}")]
    Status { source_name: String, status: u16 },

    #[error("source {source_name} is not valid JSON: {error}")]
    Parse {
        source_name: String,
        #[source]
        error: serde_json::Error,
    },
}

/// Failure of the durable key-value storage
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("storage I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("storage database error: {0}")]
    Database(#[from] anyhow::Error),

    #[error("storage task failed: {0}")]
    Task(#[from] tokio::task::JoinError),
}
