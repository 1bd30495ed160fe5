pub mod errors;

use std::sync::Arc;

use axum::{
    Router,
    extract::{Path, Query, State},
    response::Json,
    routing::{delete, get},
};
use cache_store::CacheStore;
use common_errors::AppError;
use events_commands::{InvalidateCityCacheCommand, InvalidateCityCacheHandler};
use events_models::SearchFilters;
use events_queries::{
    CacheStatsQueryHandler, GetNearbyEventsQuery, ListCitiesQueryHandler,
    NearbyEventsQueryHandler,
};
use events_responses::{
    CacheStatsResponse, CityResponse, InvalidateCityResponse,
    NearbyEventsResponse,
};
use events_store::{EventStore, Geocoder};
use serde::Deserialize;
use tracing::instrument;
use utoipa::IntoParams;

use crate::errors::{map_cache_error, map_proximity_error};

#[derive(Clone)]
pub struct ProximityServices {
    pub nearby_events: NearbyEventsQueryHandler,
    pub cache_stats: CacheStatsQueryHandler,
    pub list_cities: ListCitiesQueryHandler,
    pub invalidate_city: InvalidateCityCacheHandler,
}

impl ProximityServices {
    pub fn new(
        events: Arc<dyn EventStore>, geocoder: Arc<dyn Geocoder>,
        cache: Arc<dyn CacheStore>,
    ) -> Self {
        Self {
            nearby_events: NearbyEventsQueryHandler::new(
                events,
                geocoder,
                cache.clone(),
            ),
            cache_stats: CacheStatsQueryHandler::new(cache.clone()),
            list_cities: ListCitiesQueryHandler::new(),
            invalidate_city: InvalidateCityCacheHandler::new(cache),
        }
    }
}

pub struct ProximityHandlers;

impl ProximityHandlers {
    pub fn routes() -> Router<ProximityServices> {
        Router::new()
            .route("/events/nearby", get(nearby_events))
            .route("/cities", get(list_cities))
            .route("/cache/stats", get(cache_stats))
            .route("/cache/{city}", delete(invalidate_city))
    }
}

#[derive(Debug, Deserialize, IntoParams)]
pub struct NearbyEventsParams {
    /// City to search around; curated cities are served read-through.
    pub city: String,
    pub radius_km: f64,
    pub category: Option<String>,
    pub search: Option<String>,
}

#[utoipa::path(
    get,
    path = "/events/nearby",
    params(NearbyEventsParams),
    responses(
        (status = 200, description = "Events within the radius, closest first", body = NearbyEventsResponse),
        (status = 400, description = "Malformed radius or coordinates", body = common_errors::ApiErrorResponse),
        (status = 404, description = "City could not be resolved", body = common_errors::ApiErrorResponse),
        (status = 503, description = "Event store temporarily unavailable", body = common_errors::ApiErrorResponse)
    ),
    tag = "events"
)]
#[instrument(skip_all)]
pub async fn nearby_events(
    State(services): State<ProximityServices>,
    Query(params): Query<NearbyEventsParams>,
) -> Result<Json<NearbyEventsResponse>, AppError> {
    let query = GetNearbyEventsQuery {
        city: params.city,
        radius_km: params.radius_km,
        filters: SearchFilters {
            category: params.category,
            search: params.search,
        },
    };
    let result = services
        .nearby_events
        .execute(query)
        .await
        .map_err(map_proximity_error)?;
    Ok(Json(result))
}

#[utoipa::path(
    get,
    path = "/cities",
    responses(
        (status = 200, description = "Cacheable cities, grouped by tier", body = [CityResponse])
    ),
    tag = "cities"
)]
#[instrument(skip_all)]
pub async fn list_cities(
    State(services): State<ProximityServices>,
) -> Json<Vec<CityResponse>> {
    Json(services.list_cities.execute())
}

#[utoipa::path(
    get,
    path = "/cache/stats",
    responses(
        (status = 200, description = "Live cache entry counts", body = CacheStatsResponse),
        (status = 503, description = "Cache backend unavailable", body = common_errors::ApiErrorResponse)
    ),
    tag = "cache"
)]
#[instrument(skip_all)]
pub async fn cache_stats(
    State(services): State<ProximityServices>,
) -> Result<Json<CacheStatsResponse>, AppError> {
    let stats = services
        .cache_stats
        .execute()
        .await
        .map_err(map_cache_error)?;
    Ok(Json(stats))
}

#[utoipa::path(
    delete,
    path = "/cache/{city}",
    params(
        ("city" = String, Path, description = "City whose cached searches to drop")
    ),
    responses(
        (status = 200, description = "Entries removed", body = InvalidateCityResponse),
        (status = 503, description = "Cache backend unavailable", body = common_errors::ApiErrorResponse)
    ),
    tag = "cache"
)]
#[instrument(skip_all)]
pub async fn invalidate_city(
    State(services): State<ProximityServices>, Path(city): Path<String>,
) -> Result<Json<InvalidateCityResponse>, AppError> {
    let result = services
        .invalidate_city
        .execute(InvalidateCityCacheCommand { city })
        .await
        .map_err(map_cache_error)?;
    Ok(Json(result))
}
