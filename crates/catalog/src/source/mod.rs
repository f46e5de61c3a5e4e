//! Data source access.
//!
//! A source is a named JSON document (e.g. `anime.json`). The [`SourceFetcher`]
//! trait is the injected fetch capability; the loader only ever sees parsed
//! JSON values.

pub mod client;
pub mod file;
pub mod memory;
pub mod types;

use crate::error::SourceError;
use async_trait::async_trait;
use serde_json::Value;

pub use client::HttpSourceFetcher;
pub use file::FileSourceFetcher;
pub use memory::MemorySourceFetcher;
pub use types::{extract_records, ExtractedRecords, DEFAULT_WRAPPER_FIELD};

/// Fetch capability for named data sources
#[async_trait]
pub trait SourceFetcher: Send + Sync {
    /// Fetch and parse one source
    async fn fetch(&self, source: &str) -> Result<Value, SourceError>;
}
