use chrono::{DateTime, Utc};
use events_models::{EventRecord, SearchFilters};
use geo_filter::GeoPoint;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

/// An event projected for one proximity query: the record plus its
/// computed distance from the query center.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct EventSummary {
    pub id: Uuid,
    pub title: String,
    pub category: String,
    #[serde(rename = "startsAt")]
    pub starts_at: DateTime<Utc>,
    #[serde(rename = "endsAt")]
    pub ends_at: DateTime<Utc>,
    pub venue: GeoPoint,
    #[serde(rename = "distanceKm")]
    pub distance_km: f64,
}

impl EventSummary {
    pub fn from_record(
        record: EventRecord, venue: GeoPoint, distance_km: f64,
    ) -> Self {
        Self {
            id: record.id,
            title: record.title,
            category: record.category,
            starts_at: record.starts_at,
            ends_at: record.ends_at,
            venue,
            distance_km,
        }
    }
}

/// The payload stored under a cache key. Echoes the query that produced
/// it for validation and debugging. Never stored with an empty event
/// list; never updated in place.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CachedSearch {
    pub events: Vec<EventSummary>,
    pub city: String,
    pub radius_km: f64,
    pub filters: SearchFilters,
    pub generated_at: DateTime<Utc>,
}

/// What callers of the proximity search receive.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct NearbyEventsResponse {
    pub events: Vec<EventSummary>,
    #[serde(rename = "fromCache")]
    pub from_cache: bool,
    pub city: String,
    #[serde(rename = "radiusKm")]
    pub radius_km: f64,
    pub filters: SearchFilters,
    pub timestamp: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct CityResponse {
    pub name: String,
    pub state: String,
    pub tier: u8,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct CacheStatsResponse {
    #[serde(rename = "totalCachedSearches")]
    pub total_cached_searches: usize,
    #[serde(rename = "cachedCities")]
    pub cached_cities: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct InvalidateCityResponse {
    pub city: String,
    pub removed: u64,
}
