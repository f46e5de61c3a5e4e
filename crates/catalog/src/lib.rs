//! Content catalog core.
//!
//! Loads movie/series records from a fixed list of JSON sources into one
//! in-memory index (restoring from a versioned persistent cache when it can),
//! and answers category, filter, text-search and related-content queries
//! over it. [`DataManager`] is the entry point.

pub mod cache;
pub mod error;
pub mod filter;
pub mod index;
pub mod loader;
pub mod manager;
pub mod related;
pub mod search;
pub mod seasons;
pub mod similarity;
pub mod source;
pub mod store;

pub use cache::{CacheStats, PersistentCache, DEFAULT_CACHE_KEY};
pub use error::{SourceError, StoreError};
pub use filter::{FilterCriteria, DEFAULT_CATEGORY_LIMIT};
pub use index::{ContentIndex, HERO_POOL_SIZE};
pub use loader::{LoadStats, SourceLoader};
pub use manager::{DataManager, LoadOrigin, LoadReport, QueryLimits};
pub use related::DEFAULT_RELATED_LIMIT;
pub use search::{MatchReason, SearchHit, DEFAULT_SEARCH_LIMIT};
pub use source::{FileSourceFetcher, HttpSourceFetcher, MemorySourceFetcher, SourceFetcher};
pub use store::{FileStore, KeyValueStore, MemoryStore, SqliteStore};
