//! The catalog's query service.
//!
//! [`DataManager`] owns the load lifecycle (cache restore or source load,
//! then persist) and answers every query against the loaded index. It is
//! built once and shared by `Arc`.

use crate::cache::{CacheStats, PersistentCache};
use crate::filter::{self, FilterCriteria, DEFAULT_CATEGORY_LIMIT};
use crate::index::{ContentIndex, HERO_POOL_SIZE};
use crate::loader::{LoadStats, SourceLoader};
use crate::related::{self, DEFAULT_RELATED_LIMIT};
use crate::search::{self, SearchHit, DEFAULT_SEARCH_LIMIT};
use crate::seasons;
use crate::source::{FileSourceFetcher, HttpSourceFetcher, SourceFetcher};
use crate::store::{FileStore, KeyValueStore, SqliteStore};
use anyhow::{Context, Result};
use shared::{CacheBackend, Config, ContentRecord, QueryConfig, SourceKind};
use std::sync::Arc;
use tokio::sync::OnceCell;
use tracing::{debug, info};

/// Where the loaded index came from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadOrigin {
    Cache,
    Sources,
}

impl LoadOrigin {
    pub fn as_str(&self) -> &'static str {
        match self {
            LoadOrigin::Cache => "cache",
            LoadOrigin::Sources => "sources",
        }
    }
}

/// Outcome of the session's single load
#[derive(Debug)]
pub struct LoadReport {
    pub index: ContentIndex,
    pub origin: LoadOrigin,
    /// Present when the index was built from the sources
    pub stats: Option<LoadStats>,
    /// The freshly loaded collection was written to the cache
    pub persisted: bool,
}

/// Default result caps and the hero pool size
#[derive(Debug, Clone, Copy)]
pub struct QueryLimits {
    pub category: usize,
    pub search: usize,
    pub related: usize,
    pub hero_pool: usize,
}

impl Default for QueryLimits {
    fn default() -> Self {
        Self {
            category: DEFAULT_CATEGORY_LIMIT,
            search: DEFAULT_SEARCH_LIMIT,
            related: DEFAULT_RELATED_LIMIT,
            hero_pool: HERO_POOL_SIZE,
        }
    }
}

impl From<&QueryConfig> for QueryLimits {
    fn from(config: &QueryConfig) -> Self {
        Self {
            category: config.category_limit,
            search: config.search_limit,
            related: config.related_limit,
            hero_pool: config.hero_pool_size,
        }
    }
}

/// Loads the catalog once per session and serves queries over it
///
/// Every query answers empty (or `None`) until [`DataManager::load_all_data`]
/// has completed.
pub struct DataManager {
    loader: SourceLoader,
    cache: Option<PersistentCache>,
    limits: QueryLimits,
    loaded: OnceCell<LoadReport>,
}

impl DataManager {
    /// Create a manager over `sources`, fetched in the given order
    pub fn new(fetcher: Arc<dyn SourceFetcher>, sources: Vec<String>) -> Self {
        Self::with_loader(SourceLoader::new(fetcher, sources))
    }

    pub fn with_loader(loader: SourceLoader) -> Self {
        Self {
            loader,
            cache: None,
            limits: QueryLimits::default(),
            loaded: OnceCell::new(),
        }
    }

    pub fn with_cache(mut self, cache: PersistentCache) -> Self {
        self.cache = Some(cache);
        self
    }

    pub fn with_limits(mut self, limits: QueryLimits) -> Self {
        self.limits = limits;
        self
    }

    /// Build the fetcher, store and cache described by `config`
    pub fn from_config(config: &Config) -> Result<Self> {
        let sources = &config.sources;
        let fetcher: Arc<dyn SourceFetcher> = match sources.kind {
            SourceKind::File => Arc::new(FileSourceFetcher::new(config.sources_dir())),
            SourceKind::Http => Arc::new(
                HttpSourceFetcher::new(&sources.base_url, sources.max_retries, sources.retry_delay_ms)
                    .context("Failed to create HTTP source fetcher")?,
            ),
        };

        let loader = SourceLoader::new(fetcher, sources.files.clone())
            .with_wrapper_field(&sources.wrapper_field);
        let mut manager = Self::with_loader(loader).with_limits(QueryLimits::from(&config.query));

        if config.cache.enabled {
            let store: Arc<dyn KeyValueStore> = match config.cache.backend {
                CacheBackend::File => Arc::new(
                    FileStore::new(config.cache_dir()).context("Failed to open cache directory")?,
                ),
                CacheBackend::Sqlite => Arc::new(
                    SqliteStore::open(config.database_path())
                        .context("Failed to open cache database")?,
                ),
            };
            manager = manager.with_cache(PersistentCache::new(
                store,
                &config.cache.key,
                config.cache.version(),
            ));
        }

        Ok(manager)
    }

    /// Load the catalog, at most once per manager
    ///
    /// The first caller restores the cache or loads every source (then
    /// persists the result); concurrent callers wait on that same run and
    /// later calls return immediately. Never fails: unreachable sources and
    /// cache trouble only shrink what gets loaded.
    pub async fn load_all_data(&self) -> &LoadReport {
        self.loaded.get_or_init(|| self.load()).await
    }

    async fn load(&self) -> LoadReport {
        if let Some(cache) = &self.cache {
            if let Some(records) = cache.restore().await {
                let index = ContentIndex::from_records(records);
                info!(total_items = index.len(), "Content loaded from cache");
                return LoadReport {
                    index,
                    origin: LoadOrigin::Cache,
                    stats: None,
                    persisted: false,
                };
            }
        }

        let (index, stats) = self.loader.load().await;

        let persisted = match &self.cache {
            Some(cache) if !index.is_empty() => cache.persist(index.to_records()).await,
            Some(_) => {
                debug!("Nothing loaded, skipping cache write");
                false
            }
            None => false,
        };

        LoadReport {
            index,
            origin: LoadOrigin::Sources,
            stats: Some(stats),
            persisted,
        }
    }

    pub fn is_loaded(&self) -> bool {
        self.loaded.initialized()
    }

    /// The loaded index, if loading has completed
    pub fn index(&self) -> Option<&ContentIndex> {
        self.loaded.get().map(|report| &report.index)
    }

    pub fn report(&self) -> Option<&LoadReport> {
        self.loaded.get()
    }

    pub fn len(&self) -> usize {
        self.index().map_or(0, ContentIndex::len)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn get_by_id(&self, id: &str) -> Option<Arc<ContentRecord>> {
        self.index()?.get_by_id(id)
    }

    pub fn get_by_ids<S: AsRef<str>>(&self, ids: &[S]) -> Vec<Arc<ContentRecord>> {
        self.index()
            .map(|index| index.get_by_ids(ids))
            .unwrap_or_default()
    }

    pub fn get_all(&self) -> Vec<Arc<ContentRecord>> {
        self.index().map(ContentIndex::get_all).unwrap_or_default()
    }

    pub fn get_by_category(&self, category: &str, limit: Option<usize>) -> Vec<Arc<ContentRecord>> {
        let Some(index) = self.index() else {
            return Vec::new();
        };
        let results = filter::by_category(index, category, limit.unwrap_or(self.limits.category));
        debug!(category = category, results = results.len(), "Category query");
        results
    }

    /// `limit` of `None` returns every match
    pub fn get_by_filter(&self, criteria: &FilterCriteria, limit: Option<usize>) -> Vec<Arc<ContentRecord>> {
        let Some(index) = self.index() else {
            return Vec::new();
        };
        let results = filter::filter(index, criteria, limit);
        debug!(criteria = ?criteria, results = results.len(), "Filter query");
        results
    }

    pub fn search(&self, query: &str, limit: Option<usize>) -> Vec<Arc<ContentRecord>> {
        self.search_with_reasons(query, limit)
            .into_iter()
            .map(|hit| hit.record)
            .collect()
    }

    pub fn search_with_reasons(&self, query: &str, limit: Option<usize>) -> Vec<SearchHit> {
        match self.index() {
            Some(index) => search::search_with_reasons(index, query, limit.unwrap_or(self.limits.search)),
            None => Vec::new(),
        }
    }

    pub fn get_random_for_hero(&self) -> Option<Arc<ContentRecord>> {
        self.index()?.get_random(self.limits.hero_pool)
    }

    /// Records related to `id`, best first; empty for an unknown id
    pub fn get_related(&self, id: &str, limit: Option<usize>) -> Vec<Arc<ContentRecord>> {
        let Some(index) = self.index() else {
            return Vec::new();
        };
        let Some(record) = index.get_by_id(id) else {
            return Vec::new();
        };
        related::related(&record, index.iter(), limit.unwrap_or(self.limits.related))
    }

    pub fn get_seasons(&self, id: &str) -> Vec<Arc<ContentRecord>> {
        self.index()
            .map(|index| seasons::seasons_of(index, id))
            .unwrap_or_default()
    }

    /// Describe the persisted payload; `None` when caching is disabled
    pub async fn cache_stats(&self) -> Option<CacheStats> {
        match &self.cache {
            Some(cache) => Some(cache.stats().await),
            None => None,
        }
    }

    /// Drop the persisted payload so the next session loads from sources
    pub async fn clear_cache(&self) -> bool {
        match &self.cache {
            Some(cache) => cache.invalidate().await,
            None => false,
        }
    }
}
