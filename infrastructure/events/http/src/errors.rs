use cache_store::CacheError;
use common_errors::AppError;
use events_errors::ProximityError;

/// Only invalid input and upstream outages cross the HTTP boundary as
/// errors; everything else degrades inside the service.
pub fn map_proximity_error(err: ProximityError) -> AppError {
    match &err {
        ProximityError::InvalidRadius { .. } => {
            AppError::bad_request("INVALID_RADIUS", &err.to_string())
        }
        ProximityError::InvalidCoordinates(_) => {
            AppError::bad_request("INVALID_COORDINATES", &err.to_string())
        }
        ProximityError::UnknownCity { city } => {
            AppError::not_found(
                "UNKNOWN_CITY",
                &format!("City '{city}' could not be resolved"),
            )
        }
        ProximityError::UpstreamUnavailable(_)
        | ProximityError::Geocode(_) => {
            AppError::service_unavailable(
                "EVENTS_TEMPORARILY_UNAVAILABLE",
                "Event search is temporarily unavailable, please retry",
            )
        }
    }
}

pub fn map_cache_error(err: CacheError) -> AppError {
    AppError::service_unavailable(
        "CACHE_UNAVAILABLE",
        &format!("Cache backend unavailable: {err}"),
    )
}
