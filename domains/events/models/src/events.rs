use chrono::{DateTime, Utc};
use geo_filter::GeoPoint;
use serde::{Deserialize, Serialize};
use typed_builder::TypedBuilder;
use utoipa::ToSchema;
use uuid::Uuid;

/// One active event as the persistence layer hands it over: status and
/// time-window filtering already applied, venue coordinates attached when
/// the venue has them.
#[derive(
    Clone,
    Debug,
    PartialEq,
    Serialize,
    Deserialize,
    TypedBuilder,
    ToSchema,
)]
pub struct EventRecord {
    #[builder(default)]
    pub id: Uuid,
    #[builder(setter(into))]
    pub title: String,
    #[builder(setter(into))]
    pub description: String,
    #[builder(setter(into))]
    pub category: String,
    pub starts_at: DateTime<Utc>,
    pub ends_at: DateTime<Utc>,
    /// Events without venue geolocation cannot be distance-filtered and
    /// are excluded from proximity results.
    #[builder(default)]
    pub venue: Option<GeoPoint>,
}

/// Where a search result came from.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Provenance {
    Cache,
    Live,
}

impl Provenance {
    pub fn from_cache(self) -> bool { self == Self::Cache }
}
