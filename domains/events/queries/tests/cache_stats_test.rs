use std::sync::Arc;

use cache_store::{CacheStore, MemoryCacheStore};
use events_models::SearchFilters;
use events_queries::{
    CacheStatsQueryHandler, GetNearbyEventsQuery, NearbyEventsQueryHandler,
};
use geo_filter::GeoPoint;
use test_utils::{
    FailingCacheStore, MUMBAI, StaticEventStore, StaticGeocoder, event_near,
};

const PUNE: GeoPoint = GeoPoint {
    latitude: 18.5204,
    longitude: 73.8567,
};

async fn populate(cache: &Arc<dyn CacheStore>) -> NearbyEventsQueryHandler {
    let store = Arc::new(StaticEventStore::with_events(vec![
        event_near(MUMBAI, 4.0, "Jazz Night", "music", 5),
        event_near(PUNE, 2.0, "Hill Run", "sports", 8),
    ]));
    let handler = NearbyEventsQueryHandler::new(
        store,
        Arc::new(StaticGeocoder::empty()),
        cache.clone(),
    );

    for (city, radius) in [("Mumbai", 10.0), ("Mumbai", 25.0), ("Pune", 10.0)]
    {
        handler
            .execute(GetNearbyEventsQuery {
                city: city.to_string(),
                radius_km: radius,
                filters: SearchFilters::default(),
            })
            .await
            .unwrap();
    }
    handler
}

#[tokio::test]
async fn stats_count_entries_and_distinct_cities() {
    let cache: Arc<dyn CacheStore> = Arc::new(MemoryCacheStore::new());
    populate(&cache).await;

    let stats = CacheStatsQueryHandler::new(cache.clone())
        .execute()
        .await
        .unwrap();
    assert_eq!(stats.total_cached_searches, 3);
    assert_eq!(stats.cached_cities, vec!["mumbai", "pune"]);
}

#[tokio::test]
async fn stats_on_an_empty_cache_are_zero() {
    let cache: Arc<dyn CacheStore> = Arc::new(MemoryCacheStore::new());
    let stats = CacheStatsQueryHandler::new(cache).execute().await.unwrap();
    assert_eq!(stats.total_cached_searches, 0);
    assert!(stats.cached_cities.is_empty());
}

#[tokio::test]
async fn stats_ignore_keys_outside_the_namespace() {
    let cache: Arc<dyn CacheStore> = Arc::new(MemoryCacheStore::new());
    cache
        .set_with_ttl("sessions:abc", b"x", std::time::Duration::from_secs(60))
        .await
        .unwrap();
    populate(&cache).await;

    let stats = CacheStatsQueryHandler::new(cache.clone())
        .execute()
        .await
        .unwrap();
    assert_eq!(stats.total_cached_searches, 3);
}

#[tokio::test]
async fn stats_surface_a_cache_outage() {
    let cache: Arc<dyn CacheStore> = Arc::new(FailingCacheStore);
    assert!(CacheStatsQueryHandler::new(cache).execute().await.is_err());
}
