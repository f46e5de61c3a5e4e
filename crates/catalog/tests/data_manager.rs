//! DataManager integration tests.
//!
//! Exercise the load lifecycle and the query API end to end with in-memory
//! sources and storage.

use std::collections::HashSet;
use std::sync::Arc;

use serde_json::{json, Value};

use catalog::{
    DataManager, FilterCriteria, KeyValueStore, LoadOrigin, MemorySourceFetcher, MemoryStore,
    PersistentCache, DEFAULT_CACHE_KEY,
};
use shared::ContentRecord;

const SOURCES: [&str; 3] = ["hollywood.json", "anime.json", "cartoons.json"];

fn sources() -> Vec<String> {
    SOURCES.iter().map(|s| s.to_string()).collect()
}

fn hollywood() -> Value {
    json!({"movies": [
        {"id": "heat", "title": "Heat", "type": "movie", "industry": "Hollywood",
         "genres": ["Crime", "Thriller"], "cast": ["Al Pacino", "Robert De Niro"],
         "director": "Michael Mann", "rating": "8.3"},
        {"id": "st", "title": "Stranger Things", "type": "series", "industry": "Hollywood",
         "genres": ["Sci-Fi", "Horror"], "rating": 8.7, "season": 1},
        {"id": "st2", "title": "Stranger Things Season 2", "type": "series", "industry": "Hollywood",
         "genres": ["Sci-Fi", "Horror"], "rating": 8.5, "season": 2},
        {"id": "ts", "title": "Things Strange", "type": "movie", "industry": "Hollywood",
         "genres": ["Drama"]},
        {"id": "shared", "title": "Shared From Hollywood", "type": "movie", "genres": ["Drama"]}
    ]})
}

fn anime() -> Value {
    json!([
        {"id": "naruto", "title": "Naruto", "type": "anime", "industry": "Japanese",
         "genres": ["Action", "Adventure"]},
        {"id": "shared", "title": "Shared From Anime", "type": "anime"},
        {"title": "Missing id"}
    ])
}

fn cartoons() -> Value {
    json!({"movies": [
        {"id": "shrek", "title": "Shrek", "type": "movie", "industry": "Hollywood",
         "genres": ["Cartoon", "Comedy"]},
        {"id": "tom", "title": "Tom and Jerry", "type": "cartoon", "genres": ["Comedy"]}
    ]})
}

fn fetcher() -> Arc<MemorySourceFetcher> {
    Arc::new(
        MemorySourceFetcher::new()
            .with_source("hollywood.json", hollywood())
            .with_source("anime.json", anime())
            .with_source("cartoons.json", cartoons()),
    )
}

fn ids(records: &[Arc<ContentRecord>]) -> Vec<&str> {
    records.iter().map(|r| r.id.as_str()).collect()
}

async fn loaded_manager() -> DataManager {
    let manager = DataManager::new(fetcher(), sources());
    manager.load_all_data().await;
    manager
}

#[tokio::test]
async fn test_concurrent_loads_share_one_fetch_sequence() {
    let fetcher = fetcher();
    let manager = DataManager::new(fetcher.clone(), sources());

    let (first, second) = tokio::join!(manager.load_all_data(), manager.load_all_data());

    assert!(std::ptr::eq(first, second));
    assert_eq!(fetcher.fetch_count(), SOURCES.len());
    assert_eq!(first.origin, LoadOrigin::Sources);

    // Loaded state is permanent
    manager.load_all_data().await;
    assert_eq!(fetcher.fetch_count(), SOURCES.len());
}

#[tokio::test]
async fn test_concurrent_loads_from_spawned_tasks() {
    let fetcher = fetcher();
    let manager = Arc::new(DataManager::new(fetcher.clone(), sources()));

    let handles: Vec<_> = (0..8)
        .map(|_| {
            let manager = Arc::clone(&manager);
            tokio::spawn(async move { manager.load_all_data().await.index.len() })
        })
        .collect();

    for handle in handles {
        assert_eq!(handle.await.unwrap(), manager.len());
    }
    assert_eq!(fetcher.fetch_count(), SOURCES.len());
}

#[tokio::test]
async fn test_later_source_wins_without_merge() {
    let manager = loaded_manager().await;

    let shared = manager.get_by_id("shared").unwrap();
    assert_eq!(shared.title, "Shared From Anime");
    assert!(shared.genres.is_empty());

    // The replaced record keeps its first enumeration slot
    let all = manager.get_all();
    assert_eq!(ids(&all)[4], "shared");
    assert_eq!(all.len(), 8);
}

#[tokio::test]
async fn test_cache_round_trip() {
    let store: Arc<dyn KeyValueStore> = Arc::new(MemoryStore::new());

    let first = DataManager::new(fetcher(), sources())
        .with_cache(PersistentCache::new(store.clone(), DEFAULT_CACHE_KEY, "2"));
    let report = first.load_all_data().await;
    assert!(report.persisted);
    let before: HashSet<String> = first.get_all().iter().map(|r| r.id.clone()).collect();

    let second_fetcher = fetcher();
    let second = DataManager::new(second_fetcher.clone(), sources())
        .with_cache(PersistentCache::new(store, DEFAULT_CACHE_KEY, "2"));
    let report = second.load_all_data().await;

    assert_eq!(report.origin, LoadOrigin::Cache);
    assert!(report.stats.is_none());
    assert_eq!(second_fetcher.fetch_count(), 0);

    let after: HashSet<String> = second.get_all().iter().map(|r| r.id.clone()).collect();
    assert_eq!(before, after);
    assert_eq!(second.get_by_id("heat").unwrap().rating_value(), Some(8.3));
}

#[tokio::test]
async fn test_version_mismatch_is_a_miss() {
    let store: Arc<dyn KeyValueStore> = Arc::new(MemoryStore::new());

    // Stale payload under an older version, holding a record no source has
    let stale = PersistentCache::new(store.clone(), DEFAULT_CACHE_KEY, "1");
    assert!(stale.persist(vec![ContentRecord::new("ghost", "Ghost")]).await);

    let fetcher = fetcher();
    let manager = DataManager::new(fetcher.clone(), sources())
        .with_cache(PersistentCache::new(store.clone(), DEFAULT_CACHE_KEY, "2"));
    let report = manager.load_all_data().await;

    assert_eq!(report.origin, LoadOrigin::Sources);
    assert_eq!(fetcher.fetch_count(), SOURCES.len());
    assert!(manager.get_by_id("ghost").is_none());

    let stats = manager.cache_stats().await.unwrap();
    assert!(stats.current);
    assert_eq!(stats.entries, manager.len());
}

#[tokio::test]
async fn test_category_exclusivity() {
    let manager = loaded_manager().await;

    let movies = manager.get_by_filter(&FilterCriteria::new().with_type("movie"), None);
    assert!(!ids(&movies).contains(&"naruto"));

    let anime = manager.get_by_filter(&FilterCriteria::new().with_type("anime"), None);
    assert!(ids(&anime).contains(&"naruto"));
}

#[tokio::test]
async fn test_cartoon_or_rule() {
    let manager = loaded_manager().await;

    let cartoons = manager.get_by_filter(&FilterCriteria::new().with_type("cartoon"), None);
    assert_eq!(ids(&cartoons), vec!["shrek", "tom"]);

    let movies = manager.get_by_filter(&FilterCriteria::new().with_type("movie"), None);
    assert_eq!(ids(&movies), vec!["heat", "ts"]);
}

#[tokio::test]
async fn test_category_query() {
    let manager = loaded_manager().await;

    let hollywood = manager.get_by_category("hollywood", None);
    assert_eq!(ids(&hollywood), vec!["heat", "st", "st2", "ts"]);

    let limited = manager.get_by_category("hollywood", Some(2));
    assert_eq!(ids(&limited), vec!["heat", "st"]);
}

#[tokio::test]
async fn test_search_ranking_example() {
    let manager = loaded_manager().await;

    let results = manager.search("stranger things", None);
    assert_eq!(ids(&results), vec!["st", "st2"]);

    let hits = manager.search_with_reasons("stranger things", None);
    assert_eq!(hits[0].score, 100);
    assert_eq!(hits[1].score, 80);
}

#[tokio::test]
async fn test_search_by_cast_and_director() {
    let manager = loaded_manager().await;

    assert_eq!(ids(&manager.search("de niro", None)), vec!["heat"]);
    assert_eq!(ids(&manager.search("michael mann", None)), vec!["heat"]);
}

#[tokio::test]
async fn test_single_character_query_is_empty() {
    let manager = loaded_manager().await;
    assert!(manager.search("a", None).is_empty());
    assert!(manager.search("", None).is_empty());
}

#[tokio::test]
async fn test_get_by_ids_keeps_input_order() {
    let manager = loaded_manager().await;

    let results = manager.get_by_ids(&["tom", "heat", "nope", "naruto"]);
    assert_eq!(ids(&results), vec!["tom", "heat", "naruto"]);
}

#[tokio::test]
async fn test_random_hero_from_small_index() {
    let fetcher = Arc::new(MemorySourceFetcher::new().with_source(
        "three.json",
        json!([{"id": "x", "title": "X"}, {"id": "y", "title": "Y"}, {"id": "z", "title": "Z"}]),
    ));
    let manager = DataManager::new(fetcher, vec!["three.json".to_string()]);
    manager.load_all_data().await;

    for _ in 0..50 {
        let pick = manager.get_random_for_hero().unwrap();
        assert!(["x", "y", "z"].contains(&pick.id.as_str()));
    }
}

#[tokio::test]
async fn test_related_and_seasons() {
    let manager = loaded_manager().await;

    let related = manager.get_related("st", None);
    assert_eq!(related[0].id, "st2");
    assert!(!ids(&related).contains(&"st"));

    let seasons = manager.get_seasons("st2");
    assert_eq!(ids(&seasons), vec!["st", "st2"]);
}

#[tokio::test]
async fn test_queries_on_empty_load() {
    let manager = DataManager::new(Arc::new(MemorySourceFetcher::new()), sources());

    // Before load
    assert!(manager.get_by_category("movie", None).is_empty());

    let report = manager.load_all_data().await;
    assert_eq!(report.index.len(), 0);
    assert_eq!(report.stats.as_ref().unwrap().sources_failed, SOURCES.len());

    assert!(manager.get_by_id("heat").is_none());
    assert!(manager.get_by_ids(&["heat"]).is_empty());
    assert!(manager.search("heat", None).is_empty());
    assert!(manager.get_by_filter(&FilterCriteria::new(), None).is_empty());
    assert!(manager.get_random_for_hero().is_none());
}
