use events_store::{EventStoreError, GeocodeError};
use thiserror::Error;

/// Errors that cross the proximity-service boundary. Cache failures never
/// appear here: the service degrades to live computation instead.
#[derive(Debug, Error)]
pub enum ProximityError {
    #[error("Invalid search radius: {radius_km}")]
    InvalidRadius { radius_km: f64 },
    #[error("Invalid coordinates: {0}")]
    InvalidCoordinates(#[from] geo_filter::GeoError),
    #[error("Unknown city: {city}")]
    UnknownCity { city: String },
    #[error("Event store unavailable: {0}")]
    UpstreamUnavailable(#[from] EventStoreError),
    #[error("Geocoder unavailable: {0}")]
    Geocode(#[from] GeocodeError),
}
