//! Source loader.
//!
//! Fetches every configured source in order, extracts its records, and merges
//! them into one [`ContentIndex`]. A failing source is logged and skipped; it
//! never aborts the load.

use crate::index::ContentIndex;
use crate::source::{extract_records, SourceFetcher, DEFAULT_WRAPPER_FIELD};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{error, info};

/// Statistics for one load run
#[derive(Debug, Clone, Default)]
pub struct LoadStats {
    pub sources_total: usize,
    pub sources_loaded: usize,
    pub sources_failed: usize,
    pub records_seen: usize,
    pub records_indexed: usize,
    pub records_dropped: usize,
    /// Ids that replaced a record from an earlier source
    pub records_replaced: usize,
    pub elapsed: Duration,
}

/// Loads and merges a fixed, ordered list of sources
pub struct SourceLoader {
    fetcher: Arc<dyn SourceFetcher>,
    sources: Vec<String>,
    wrapper_field: String,
}

impl SourceLoader {
    /// Create a new loader over `sources`, fetched in the given order
    pub fn new(fetcher: Arc<dyn SourceFetcher>, sources: Vec<String>) -> Self {
        Self {
            fetcher,
            sources,
            wrapper_field: DEFAULT_WRAPPER_FIELD.to_string(),
        }
    }

    /// Use a different wrapper field for object-shaped sources
    pub fn with_wrapper_field(mut self, field: impl Into<String>) -> Self {
        self.wrapper_field = field.into();
        self
    }

    /// Load every source into a fresh index
    ///
    /// Sources are fetched one after another so that, on id collisions, the
    /// later source in the list always wins.
    pub async fn load(&self) -> (ContentIndex, LoadStats) {
        info!(sources = self.sources.len(), "Loading content data into memory");

        let start = Instant::now();
        let mut index = ContentIndex::new();
        let mut stats = LoadStats {
            sources_total: self.sources.len(),
            ..Default::default()
        };

        for source in &self.sources {
            let payload = match self.fetcher.fetch(source).await {
                Ok(payload) => payload,
                Err(e) => {
                    error!(source = %source, error = %e, "Failed to load source");
                    stats.sources_failed += 1;
                    continue;
                }
            };

            let extracted = extract_records(source, payload, &self.wrapper_field);
            stats.records_seen += extracted.seen;
            stats.records_dropped += extracted.dropped;

            let count = extracted.records.len();
            for record in extracted.records {
                if index.insert(record) {
                    stats.records_replaced += 1;
                }
            }

            stats.sources_loaded += 1;
            info!(source = %source, items = count, "Loaded source");
        }

        stats.records_indexed = index.len();
        stats.elapsed = start.elapsed();

        info!(
            total_items = stats.records_indexed,
            sources_loaded = stats.sources_loaded,
            sources_failed = stats.sources_failed,
            dropped = stats.records_dropped,
            replaced = stats.records_replaced,
            elapsed_ms = stats.elapsed.as_millis() as u64,
            "All content loaded"
        );

        (index, stats)
    }
}
