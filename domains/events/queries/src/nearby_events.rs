use std::{sync::Arc, time::Duration};

use cache_store::CacheStore;
use chrono::Utc;
use city_registry::CityRegistry;
use events_errors::ProximityError;
use events_models::{Provenance, SearchFilters};
use events_responses::{CachedSearch, EventSummary, NearbyEventsResponse};
use events_store::{EventStore, EventStoreError, Geocoder};
use geo_filter::GeoPoint;
use tokio::time::timeout;
use tracing::{debug, instrument, warn};

use crate::cache_keys;

/// Broad radii must not produce unbounded payloads.
pub const MAX_RESULTS: usize = 100;
/// Budget for one source-of-truth query; past it the request fails as
/// upstream-unavailable rather than hanging.
pub const EVENT_STORE_TIMEOUT: Duration = Duration::from_secs(5);
/// Budget for one cache operation; past it the cache is treated as down.
pub const CACHE_OP_TIMEOUT: Duration = Duration::from_secs(2);

#[derive(Debug)]
pub struct GetNearbyEventsQuery {
    pub city: String,
    pub radius_km: f64,
    pub filters: SearchFilters,
}

/// Read-through proximity search.
///
/// Curated cities go through the cache: hit → return as-is, miss →
/// compute from the event store and populate with the city's own TTL.
/// Anything else is computed live with no cache traffic at all, since
/// caching free-text city strings would grow the keyspace without bound.
///
/// Stateless over its collaborators: concurrent calls are safe, and
/// concurrent misses for one key simply overwrite each other with the
/// same payload.
#[derive(Clone)]
pub struct NearbyEventsQueryHandler {
    events: Arc<dyn EventStore>,
    geocoder: Arc<dyn Geocoder>,
    cache: Arc<dyn CacheStore>,
}

impl NearbyEventsQueryHandler {
    pub fn new(
        events: Arc<dyn EventStore>, geocoder: Arc<dyn Geocoder>,
        cache: Arc<dyn CacheStore>,
    ) -> Self {
        Self {
            events,
            geocoder,
            cache,
        }
    }

    #[instrument(skip(self))]
    pub async fn execute(
        &self, query: GetNearbyEventsQuery,
    ) -> Result<NearbyEventsResponse, ProximityError> {
        // Reject malformed input before any store is touched.
        if !query.radius_km.is_finite() || query.radius_km <= 0.0 {
            return Err(ProximityError::InvalidRadius {
                radius_km: query.radius_km,
            });
        }

        let city_name = query.city.trim();
        let filters = query.filters.normalize();

        let Some(city) = CityRegistry::lookup(city_name) else {
            let Some(center) = self.geocoder.resolve(city_name).await? else {
                return Err(ProximityError::UnknownCity {
                    city: city_name.to_string(),
                });
            };
            debug!(city = city_name, "not a registered city, skipping cache");
            let events = self
                .compute_live(center, query.radius_km, &filters)
                .await?;
            return Ok(response(
                city_name.to_string(),
                query.radius_km,
                filters,
                events,
                Provenance::Live,
            ));
        };

        let key = cache_keys::search_key(city.name, query.radius_km, &filters);

        if let Some(cached) = self.cache_get(&key).await {
            // If the backend still has the key it is by definition not
            // expired; no further freshness check.
            debug!(%key, "cache hit");
            return Ok(response(
                city.name.to_string(),
                query.radius_km,
                filters,
                cached.events,
                Provenance::Cache,
            ));
        }

        debug!(%key, "cache miss, querying event store");
        let events = self
            .compute_live(city.coordinates, query.radius_km, &filters)
            .await?;

        // An empty result is returned but never cached: a transient lull
        // would otherwise mask newly created events for a full TTL.
        if !events.is_empty() {
            let payload = CachedSearch {
                events: events.clone(),
                city: city.name.to_string(),
                radius_km: query.radius_km,
                filters: filters.clone(),
                generated_at: Utc::now(),
            };
            self.cache_put(&key, &payload, city.cache_ttl()).await;
        }

        Ok(response(
            city.name.to_string(),
            query.radius_km,
            filters,
            events,
            Provenance::Live,
        ))
    }

    async fn compute_live(
        &self, center: GeoPoint, radius_km: f64, filters: &SearchFilters,
    ) -> Result<Vec<EventSummary>, ProximityError> {
        center.validate()?;

        let records = match timeout(
            EVENT_STORE_TIMEOUT,
            self.events.active_upcoming_or_ongoing(),
        )
        .await
        {
            Ok(result) => result?,
            Err(_) => {
                return Err(ProximityError::UpstreamUnavailable(
                    EventStoreError::Timeout,
                ));
            }
        };

        let mut hits = Vec::new();
        for record in records {
            // No venue geolocation means no distance; excluded.
            let Some(venue) = record.venue else {
                continue;
            };
            let distance_km = match geo_filter::distance_km(center, venue) {
                Ok(distance) => distance,
                Err(e) => {
                    warn!(
                        event_id = %record.id,
                        error = %e,
                        "event venue has invalid coordinates, skipping"
                    );
                    continue;
                }
            };
            // Inclusive boundary: exactly at the radius counts as inside.
            if distance_km > radius_km {
                continue;
            }
            if !filters.matches(&record) {
                continue;
            }
            hits.push(EventSummary::from_record(record, venue, distance_km));
        }

        hits.sort_by(|a, b| {
            a.distance_km
                .total_cmp(&b.distance_km)
                .then_with(|| a.starts_at.cmp(&b.starts_at))
        });
        hits.truncate(MAX_RESULTS);

        Ok(hits)
    }

    /// Cache reads fail open: any error or timeout is a miss, because the
    /// cache is an optimization, not a correctness requirement.
    async fn cache_get(&self, key: &str) -> Option<CachedSearch> {
        let bytes = match timeout(CACHE_OP_TIMEOUT, self.cache.get(key)).await
        {
            Ok(Ok(bytes)) => bytes?,
            Ok(Err(e)) => {
                warn!(%key, error = %e, "cache read failed, treating as miss");
                return None;
            }
            Err(_) => {
                warn!(%key, "cache read timed out, treating as miss");
                return None;
            }
        };

        match serde_json::from_slice(&bytes) {
            Ok(cached) => Some(cached),
            Err(e) => {
                warn!(%key, error = %e, "cached payload unreadable, recomputing");
                None
            }
        }
    }

    /// A failed population must not fail a request that already has a
    /// valid result in hand.
    async fn cache_put(&self, key: &str, payload: &CachedSearch, ttl: Duration) {
        let bytes = match serde_json::to_vec(payload) {
            Ok(bytes) => bytes,
            Err(e) => {
                warn!(%key, error = %e, "failed to serialize cache payload");
                return;
            }
        };

        match timeout(
            CACHE_OP_TIMEOUT,
            self.cache.set_with_ttl(key, &bytes, ttl),
        )
        .await
        {
            Ok(Ok(())) => debug!(%key, ttl_secs = ttl.as_secs(), "cache populated"),
            Ok(Err(e)) => warn!(%key, error = %e, "cache write failed"),
            Err(_) => warn!(%key, "cache write timed out"),
        }
    }
}

fn response(
    city: String, radius_km: f64, filters: SearchFilters,
    events: Vec<EventSummary>, provenance: Provenance,
) -> NearbyEventsResponse {
    NearbyEventsResponse {
        events,
        from_cache: provenance.from_cache(),
        city,
        radius_km,
        filters,
        timestamp: Utc::now(),
    }
}
