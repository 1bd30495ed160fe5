//! Persistence seams for the proximity search: the source-of-truth event
//! query and the coordinate resolver for cities outside the curated
//! registry. Handlers take these as injected trait objects so tests can
//! swap in doubles.

use async_trait::async_trait;
use events_models::EventRecord;
use geo_filter::GeoPoint;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum EventStoreError {
    #[error("Connection error: {0}")]
    Connection(String),
    #[error("Query error: {0}")]
    Query(String),
    #[error("Query timed out")]
    Timeout,
}

/// Source-of-truth event query (the persistence collaborator).
#[async_trait]
pub trait EventStore: Send + Sync {
    /// Events flagged active and not cancelled/postponed whose end time is
    /// in the future. Status filtering happens at the data layer; callers
    /// only filter by distance and search dimensions.
    async fn active_upcoming_or_ongoing(
        &self,
    ) -> Result<Vec<EventRecord>, EventStoreError>;
}

#[derive(Debug, Error)]
pub enum GeocodeError {
    #[error("Geocoder unavailable: {0}")]
    Unavailable(String),
}

/// Coordinate resolution for free-text city names that are not in the
/// curated registry. Failures are typed, never swallowed.
#[async_trait]
pub trait Geocoder: Send + Sync {
    async fn resolve(
        &self, city: &str,
    ) -> Result<Option<GeoPoint>, GeocodeError>;
}
