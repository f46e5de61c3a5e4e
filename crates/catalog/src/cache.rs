//! Persistent content cache.
//!
//! Stores the merged collection as a versioned [`CacheEnvelope`] so a later
//! session can skip loading the sources. Caching is best-effort: every
//! failure here is logged and reported as a miss or a `false`, never as an
//! error.

use crate::store::KeyValueStore;
use chrono::{DateTime, Utc};
use shared::{CacheEnvelope, ContentRecord};
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Storage key of the content payload
pub const DEFAULT_CACHE_KEY: &str = "content_cache";

/// What the store currently holds under the cache key
#[derive(Debug, Clone, Default)]
pub struct CacheStats {
    pub present: bool,
    pub version: Option<String>,
    pub entries: usize,
    pub saved_at: Option<DateTime<Utc>>,
    pub size_bytes: usize,
    /// Stored version equals the expected one
    pub current: bool,
}

/// Versioned cache of the content collection
pub struct PersistentCache {
    store: Arc<dyn KeyValueStore>,
    key: String,
    version: String,
}

impl PersistentCache {
    pub fn new(store: Arc<dyn KeyValueStore>, key: impl Into<String>, version: impl Into<String>) -> Self {
        Self {
            store,
            key: key.into(),
            version: version.into(),
        }
    }

    /// Read back the persisted records
    ///
    /// Returns `None` when nothing is stored, the payload is corrupt, or it
    /// was written under a different version. A stale payload is also
    /// removed from the store.
    pub async fn restore(&self) -> Option<Vec<ContentRecord>> {
        let raw = match self.store.get(&self.key).await {
            Ok(Some(raw)) => raw,
            Ok(None) => {
                debug!(key = %self.key, "No cached content");
                return None;
            }
            Err(e) => {
                warn!(key = %self.key, error = %e, "Failed to read content cache");
                return None;
            }
        };

        let envelope: CacheEnvelope = match serde_json::from_str(&raw) {
            Ok(envelope) => envelope,
            Err(e) => {
                warn!(key = %self.key, error = %e, "Cached content is corrupt, ignoring");
                return None;
            }
        };

        if envelope.version != self.version {
            warn!(
                key = %self.key,
                cached_version = %envelope.version,
                expected_version = %self.version,
                "Cached content version mismatch, invalidating"
            );
            self.invalidate().await;
            return None;
        }

        info!(
            key = %self.key,
            entries = envelope.entries.len(),
            saved_at = %envelope.saved_at,
            "Restored content from cache"
        );
        Some(envelope.entries)
    }

    /// Write the records under the current version stamp
    ///
    /// Returns whether the write succeeded.
    pub async fn persist(&self, records: Vec<ContentRecord>) -> bool {
        let count = records.len();
        let envelope = CacheEnvelope::new(self.version.clone(), records);

        let raw = match serde_json::to_string(&envelope) {
            Ok(raw) => raw,
            Err(e) => {
                warn!(key = %self.key, error = %e, "Failed to serialize content cache");
                return false;
            }
        };

        match self.store.set(&self.key, &raw).await {
            Ok(()) => {
                info!(
                    key = %self.key,
                    entries = count,
                    bytes = raw.len(),
                    version = %self.version,
                    "Content cached"
                );
                true
            }
            Err(e) => {
                warn!(key = %self.key, error = %e, "Failed to write content cache");
                false
            }
        }
    }

    /// Drop the stored payload
    pub async fn invalidate(&self) -> bool {
        match self.store.remove(&self.key).await {
            Ok(()) => {
                debug!(key = %self.key, "Content cache invalidated");
                true
            }
            Err(e) => {
                warn!(key = %self.key, error = %e, "Failed to invalidate content cache");
                false
            }
        }
    }

    /// Describe the stored payload without loading it into an index
    pub async fn stats(&self) -> CacheStats {
        let raw = match self.store.get(&self.key).await {
            Ok(Some(raw)) => raw,
            _ => return CacheStats::default(),
        };

        match serde_json::from_str::<CacheEnvelope>(&raw) {
            Ok(envelope) => CacheStats {
                present: true,
                current: envelope.version == self.version,
                version: Some(envelope.version),
                entries: envelope.entries.len(),
                saved_at: Some(envelope.saved_at),
                size_bytes: raw.len(),
            },
            Err(_) => CacheStats {
                present: true,
                size_bytes: raw.len(),
                ..Default::default()
            },
        }
    }
}
