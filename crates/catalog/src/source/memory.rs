//! In-process source fetcher, used by tests and embedders that already hold
//! the payloads.

use super::SourceFetcher;
use crate::error::SourceError;
use async_trait::async_trait;
use serde_json::Value;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};

/// Serves fixed payloads by source name
///
/// Names registered with [`MemorySourceFetcher::with_raw`] hold raw text that
/// is parsed on every fetch, so malformed sources can be simulated. Unknown
/// names fail like a missing file.
#[derive(Debug, Default)]
pub struct MemorySourceFetcher {
    payloads: HashMap<String, Value>,
    raw: HashMap<String, String>,
    fetches: AtomicUsize,
}

impl MemorySourceFetcher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_source(mut self, name: impl Into<String>, payload: Value) -> Self {
        self.payloads.insert(name.into(), payload);
        self
    }

    pub fn with_raw(mut self, name: impl Into<String>, text: impl Into<String>) -> Self {
        self.raw.insert(name.into(), text.into());
        self
    }

    /// Number of `fetch` calls served so far, successful or not
    pub fn fetch_count(&self) -> usize {
        self.fetches.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl SourceFetcher for MemorySourceFetcher {
    async fn fetch(&self, source: &str) -> Result<Value, SourceError> {
        self.fetches.fetch_add(1, Ordering::SeqCst);
        tokio::task::yield_now().await;

        if let Some(payload) = self.payloads.get(source) {
            return Ok(payload.clone());
        }

        if let Some(text) = self.raw.get(source) {
            return serde_json::from_str(text).map_err(|error| SourceError::Parse {
                source_name: source.to_string(),
                error,
            });
        }

        Err(SourceError::Io {
            source_name: source.to_string(),
            error: std::io::Error::new(std::io::ErrorKind::NotFound, "no such source"),
        })
    }
}
