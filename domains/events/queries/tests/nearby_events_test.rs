use std::{sync::Arc, time::Duration};

use cache_store::{CacheStore, MemoryCacheStore};
use events_errors::ProximityError;
use events_models::SearchFilters;
use events_queries::{
    CACHE_OP_TIMEOUT, EVENT_STORE_TIMEOUT, GetNearbyEventsQuery, MAX_RESULTS,
    NearbyEventsQueryHandler, cache_keys,
};
use events_store::EventStoreError;
use geo_filter::GeoPoint;
use test_utils::{
    CountingCacheStore, FailingCacheStore, MUMBAI, SlowCacheStore,
    StaticEventStore, StaticGeocoder, event_at, event_near,
};

fn handler(
    store: &Arc<StaticEventStore>, cache: &Arc<dyn CacheStore>,
) -> NearbyEventsQueryHandler {
    NearbyEventsQueryHandler::new(
        store.clone(),
        Arc::new(StaticGeocoder::empty()),
        cache.clone(),
    )
}

fn query(city: &str, radius_km: f64) -> GetNearbyEventsQuery {
    GetNearbyEventsQuery {
        city: city.to_string(),
        radius_km,
        filters: SearchFilters::default(),
    }
}

fn query_with(
    city: &str, radius_km: f64, filters: SearchFilters,
) -> GetNearbyEventsQuery {
    GetNearbyEventsQuery {
        city: city.to_string(),
        radius_km,
        filters,
    }
}

#[tokio::test]
async fn mumbai_first_call_live_second_call_cached() {
    let store = Arc::new(StaticEventStore::with_events(vec![
        event_near(MUMBAI, 4.0, "Jazz Night", "music", 5),
        event_near(MUMBAI, 15.0, "Warehouse Rave", "music", 8),
    ]));
    let cache: Arc<dyn CacheStore> = Arc::new(MemoryCacheStore::new());
    let handler = handler(&store, &cache);

    let first = handler.execute(query("Mumbai", 10.0)).await.unwrap();
    assert_eq!(first.events.len(), 1);
    assert_eq!(first.events[0].title, "Jazz Night");
    assert!((first.events[0].distance_km - 4.0).abs() < 0.01);
    assert!(!first.from_cache);
    assert_eq!(first.city, "Mumbai");
    assert_eq!(first.radius_km, 10.0);

    let second = handler.execute(query("Mumbai", 10.0)).await.unwrap();
    assert!(second.from_cache);
    assert_eq!(second.events, first.events);
    // The cached call never reached the source of truth.
    assert_eq!(store.query_count(), 1);
}

#[tokio::test]
async fn empty_results_are_returned_but_never_cached() {
    let store = Arc::new(StaticEventStore::empty());
    let cache: Arc<dyn CacheStore> = Arc::new(MemoryCacheStore::new());
    let handler = handler(&store, &cache);

    let first = handler.execute(query("Mumbai", 10.0)).await.unwrap();
    assert!(first.events.is_empty());
    assert!(!first.from_cache);

    let second = handler.execute(query("Mumbai", 10.0)).await.unwrap();
    assert!(second.events.is_empty());
    assert!(!second.from_cache);
    assert_eq!(store.query_count(), 2);
    assert!(
        cache
            .keys_by_prefix(cache_keys::LOCATION_NAMESPACE)
            .await
            .unwrap()
            .is_empty()
    );

    // An event created inside what would have been the TTL window is
    // visible immediately because no empty entry poisoned the cache.
    store
        .set_events(vec![event_near(MUMBAI, 2.0, "Pop-up Gig", "music", 1)])
        .await;
    let third = handler.execute(query("Mumbai", 10.0)).await.unwrap();
    assert_eq!(third.events.len(), 1);
    assert!(!third.from_cache);
}

#[tokio::test]
async fn unregistered_city_is_computed_live_without_cache_traffic() {
    let shimla = GeoPoint::new(31.1048, 77.1734).unwrap();
    let store = Arc::new(StaticEventStore::with_events(vec![event_near(
        shimla,
        3.0,
        "Mountain Fair",
        "outdoors",
        12,
    )]));
    let counting = Arc::new(CountingCacheStore::new(Arc::new(
        MemoryCacheStore::new(),
    )));
    let cache: Arc<dyn CacheStore> = counting.clone();
    let handler = NearbyEventsQueryHandler::new(
        store.clone(),
        Arc::new(StaticGeocoder::with_entry("Shimla", shimla)),
        cache.clone(),
    );

    let first = handler.execute(query("Shimla", 10.0)).await.unwrap();
    assert_eq!(first.events.len(), 1);
    assert!(!first.from_cache);

    let second = handler.execute(query("Shimla", 10.0)).await.unwrap();
    assert!(!second.from_cache);

    // Skip-cache path: no reads, no writes, no keys.
    assert_eq!(counting.get_count(), 0);
    assert_eq!(counting.set_count(), 0);
    assert_eq!(store.query_count(), 2);
    assert!(cache.keys_by_prefix("").await.unwrap().is_empty());
}

#[tokio::test]
async fn city_unknown_to_registry_and_geocoder_is_a_typed_miss() {
    let store = Arc::new(StaticEventStore::empty());
    let cache: Arc<dyn CacheStore> = Arc::new(MemoryCacheStore::new());
    let handler = handler(&store, &cache);

    let err = handler.execute(query("Atlantis", 10.0)).await.unwrap_err();
    assert!(matches!(err, ProximityError::UnknownCity { .. }));
    assert_eq!(store.query_count(), 0);
}

#[tokio::test]
async fn geocoder_outage_is_surfaced_not_swallowed() {
    let store = Arc::new(StaticEventStore::empty());
    let handler = NearbyEventsQueryHandler::new(
        store.clone(),
        Arc::new(StaticGeocoder::failing()),
        Arc::new(MemoryCacheStore::new()),
    );

    let err = handler.execute(query("Shimla", 10.0)).await.unwrap_err();
    assert!(matches!(err, ProximityError::Geocode(_)));
}

#[tokio::test]
async fn results_sort_by_distance_with_start_date_tiebreak() {
    let store = Arc::new(StaticEventStore::with_events(vec![
        event_near(MUMBAI, 12.0, "Far Gig", "music", 1),
        event_near(MUMBAI, 3.5, "Near Late", "music", 48),
        event_near(MUMBAI, 3.5, "Near Early", "music", 2),
        event_near(MUMBAI, 9.0, "Mid Gig", "music", 1),
    ]));
    let cache: Arc<dyn CacheStore> = Arc::new(MemoryCacheStore::new());
    let handler = handler(&store, &cache);

    let result = handler.execute(query("Mumbai", 20.0)).await.unwrap();
    let titles: Vec<_> =
        result.events.iter().map(|e| e.title.as_str()).collect();
    assert_eq!(titles, ["Near Early", "Near Late", "Mid Gig", "Far Gig"]);
}

#[tokio::test]
async fn venue_exactly_at_the_radius_is_included() {
    let event = event_near(MUMBAI, 10.0, "Edge Case Live", "music", 4);
    let exact_distance =
        geo_filter::distance_km(MUMBAI, event.venue.unwrap()).unwrap();
    let store = Arc::new(StaticEventStore::with_events(vec![event]));
    let cache: Arc<dyn CacheStore> = Arc::new(MemoryCacheStore::new());
    let handler = handler(&store, &cache);

    let at_boundary = handler
        .execute(query("Mumbai", exact_distance))
        .await
        .unwrap();
    assert_eq!(at_boundary.events.len(), 1);

    let shy_of_boundary = handler
        .execute(query("Mumbai", exact_distance - 0.001))
        .await
        .unwrap();
    assert!(shy_of_boundary.events.is_empty());
}

#[tokio::test]
async fn invalid_radius_is_rejected_before_any_store_is_touched() {
    let store = Arc::new(StaticEventStore::empty());
    let counting = Arc::new(CountingCacheStore::new(Arc::new(
        MemoryCacheStore::new(),
    )));
    let cache: Arc<dyn CacheStore> = counting.clone();
    let handler = handler(&store, &cache);

    for radius in [0.0, -5.0, f64::NAN, f64::INFINITY] {
        let err = handler.execute(query("Mumbai", radius)).await.unwrap_err();
        assert!(matches!(err, ProximityError::InvalidRadius { .. }));
    }
    assert_eq!(store.query_count(), 0);
    assert_eq!(counting.get_count(), 0);
}

#[tokio::test]
async fn upstream_failure_surfaces_instead_of_an_empty_result() {
    let store = Arc::new(StaticEventStore::empty());
    store.set_failing(true);
    let cache: Arc<dyn CacheStore> = Arc::new(MemoryCacheStore::new());
    let handler = handler(&store, &cache);

    let err = handler.execute(query("Mumbai", 10.0)).await.unwrap_err();
    assert!(matches!(err, ProximityError::UpstreamUnavailable(_)));
}

#[tokio::test(start_paused = true)]
async fn slow_event_store_times_out_as_upstream_unavailable() {
    let store = Arc::new(StaticEventStore::with_events(vec![event_near(
        MUMBAI,
        4.0,
        "Jazz Night",
        "music",
        5,
    )]));
    store
        .set_delay(EVENT_STORE_TIMEOUT + Duration::from_secs(1))
        .await;
    let cache: Arc<dyn CacheStore> = Arc::new(MemoryCacheStore::new());
    let handler = handler(&store, &cache);

    let err = handler.execute(query("Mumbai", 10.0)).await.unwrap_err();
    assert!(matches!(
        err,
        ProximityError::UpstreamUnavailable(EventStoreError::Timeout)
    ));
    // Nothing was cached for the failed computation.
    assert!(
        cache
            .keys_by_prefix(cache_keys::LOCATION_NAMESPACE)
            .await
            .unwrap()
            .is_empty()
    );
}

#[tokio::test(start_paused = true)]
async fn slow_cache_times_out_to_live_computation() {
    let store = Arc::new(StaticEventStore::with_events(vec![event_near(
        MUMBAI,
        4.0,
        "Jazz Night",
        "music",
        5,
    )]));
    let cache: Arc<dyn CacheStore> = Arc::new(SlowCacheStore::new(
        Arc::new(MemoryCacheStore::new()),
        CACHE_OP_TIMEOUT + Duration::from_secs(1),
    ));
    let handler = handler(&store, &cache);

    // Read deadline expires -> miss; write deadline expires -> swallowed.
    let first = handler.execute(query("Mumbai", 10.0)).await.unwrap();
    assert_eq!(first.events.len(), 1);
    assert!(!first.from_cache);

    let second = handler.execute(query("Mumbai", 10.0)).await.unwrap();
    assert!(!second.from_cache);
    assert_eq!(store.query_count(), 2);
}

#[tokio::test]
async fn cache_hit_survives_an_upstream_outage() {
    let store = Arc::new(StaticEventStore::with_events(vec![event_near(
        MUMBAI,
        4.0,
        "Jazz Night",
        "music",
        5,
    )]));
    let cache: Arc<dyn CacheStore> = Arc::new(MemoryCacheStore::new());
    let handler = handler(&store, &cache);

    handler.execute(query("Mumbai", 10.0)).await.unwrap();
    store.set_failing(true);

    let cached = handler.execute(query("Mumbai", 10.0)).await.unwrap();
    assert!(cached.from_cache);
    assert_eq!(cached.events.len(), 1);
}

#[tokio::test]
async fn cache_failures_fail_open_to_live_computation() {
    let store = Arc::new(StaticEventStore::with_events(vec![event_near(
        MUMBAI,
        4.0,
        "Jazz Night",
        "music",
        5,
    )]));
    let cache: Arc<dyn CacheStore> = Arc::new(FailingCacheStore);
    let handler = handler(&store, &cache);

    // Read fails -> miss; write fails -> swallowed. The request succeeds.
    let first = handler.execute(query("Mumbai", 10.0)).await.unwrap();
    assert_eq!(first.events.len(), 1);
    assert!(!first.from_cache);

    let second = handler.execute(query("Mumbai", 10.0)).await.unwrap();
    assert!(!second.from_cache);
    assert_eq!(store.query_count(), 2);
}

#[tokio::test]
async fn garbage_cache_payload_is_ignored_and_recomputed() {
    let store = Arc::new(StaticEventStore::with_events(vec![event_near(
        MUMBAI,
        4.0,
        "Jazz Night",
        "music",
        5,
    )]));
    let cache = Arc::new(MemoryCacheStore::new());
    let key = cache_keys::search_key(
        "Mumbai",
        10.0,
        &SearchFilters::default(),
    );
    cache
        .set_with_ttl(&key, b"not json", std::time::Duration::from_secs(60))
        .await
        .unwrap();

    let handler = NearbyEventsQueryHandler::new(
        store.clone(),
        Arc::new(StaticGeocoder::empty()),
        cache.clone(),
    );
    let result = handler.execute(query("Mumbai", 10.0)).await.unwrap();
    assert_eq!(result.events.len(), 1);
    assert!(!result.from_cache);
    assert_eq!(store.query_count(), 1);
}

#[tokio::test]
async fn events_without_venue_coordinates_are_excluded() {
    let store = Arc::new(StaticEventStore::with_events(vec![
        event_at("Online Quiz", "games", None, 2),
        event_near(MUMBAI, 1.0, "Street Fest", "outdoors", 2),
    ]));
    let cache: Arc<dyn CacheStore> = Arc::new(MemoryCacheStore::new());
    let handler = handler(&store, &cache);

    let result = handler.execute(query("Mumbai", 50.0)).await.unwrap();
    let titles: Vec<_> =
        result.events.iter().map(|e| e.title.as_str()).collect();
    assert_eq!(titles, ["Street Fest"]);
}

#[tokio::test]
async fn filters_narrow_results_and_key_separately() {
    let store = Arc::new(StaticEventStore::with_events(vec![
        event_near(MUMBAI, 2.0, "Jazz Night", "music", 5),
        event_near(MUMBAI, 3.0, "Standup Hour", "comedy", 5),
    ]));
    let cache: Arc<dyn CacheStore> = Arc::new(MemoryCacheStore::new());
    let handler = handler(&store, &cache);

    let unfiltered = handler.execute(query("Mumbai", 10.0)).await.unwrap();
    assert_eq!(unfiltered.events.len(), 2);

    // Different filter set, different cache entry: this is a miss.
    let filters = SearchFilters {
        category: Some("comedy".to_string()),
        search: None,
    };
    let filtered = handler
        .execute(query_with("Mumbai", 10.0, filters))
        .await
        .unwrap();
    assert_eq!(filtered.events.len(), 1);
    assert_eq!(filtered.events[0].title, "Standup Hour");
    assert!(!filtered.from_cache);
    assert_eq!(store.query_count(), 2);
}

#[tokio::test]
async fn set_equal_filters_hit_the_same_cache_entry() {
    let store = Arc::new(StaticEventStore::with_events(vec![event_near(
        MUMBAI,
        2.0,
        "Jazz Night",
        "music",
        5,
    )]));
    let cache: Arc<dyn CacheStore> = Arc::new(MemoryCacheStore::new());
    let handler = handler(&store, &cache);

    let noisy = SearchFilters {
        category: Some("  MUSIC ".to_string()),
        search: Some("Jazz".to_string()),
    };
    let clean = SearchFilters {
        search: Some("jazz".to_string()),
        category: Some("music".to_string()),
    };

    let first = handler
        .execute(query_with("Mumbai", 10.0, noisy))
        .await
        .unwrap();
    assert!(!first.from_cache);
    assert_eq!(first.filters.category.as_deref(), Some("music"));

    let second = handler
        .execute(query_with("MUMBAI", 10.0, clean))
        .await
        .unwrap();
    assert!(second.from_cache);
    assert_eq!(store.query_count(), 1);
}

#[tokio::test]
async fn result_count_is_bounded() {
    let events = (0..MAX_RESULTS + 20)
        .map(|i| {
            event_near(
                MUMBAI,
                0.1 + i as f64 * 0.05,
                &format!("Gig {i}"),
                "music",
                2,
            )
        })
        .collect();
    let store = Arc::new(StaticEventStore::with_events(events));
    let cache: Arc<dyn CacheStore> = Arc::new(MemoryCacheStore::new());
    let handler = handler(&store, &cache);

    let result = handler.execute(query("Mumbai", 50.0)).await.unwrap();
    assert_eq!(result.events.len(), MAX_RESULTS);
    // Truncation keeps the closest events.
    assert!(
        result
            .events
            .windows(2)
            .all(|w| w[0].distance_km <= w[1].distance_km)
    );
}
