use chrono::{Duration, Utc};
use events_models::EventRecord;
use geo_filter::{EARTH_RADIUS_KM, GeoPoint};
use uuid::Uuid;

/// Mumbai city center, matching the curated registry entry.
pub const MUMBAI: GeoPoint = GeoPoint {
    latitude: 19.076,
    longitude: 72.8777,
};

/// An active upcoming event at `venue`, starting `starts_in_hours` from
/// now and running for three hours.
pub fn event_at(
    title: &str, category: &str, venue: Option<GeoPoint>,
    starts_in_hours: i64,
) -> EventRecord {
    let starts_at = Utc::now() + Duration::hours(starts_in_hours);
    EventRecord::builder()
        .id(Uuid::new_v4())
        .title(title)
        .description(format!("{title} ({category})"))
        .category(category)
        .starts_at(starts_at)
        .ends_at(starts_at + Duration::hours(3))
        .venue(venue)
        .build()
}

/// A venue due north of `center` at (to floating-point precision) exactly
/// `km` away: along a meridian the haversine distance reduces to
/// `R * Δlat`, so the offset is exact rather than approximate.
pub fn event_near(
    center: GeoPoint, km: f64, title: &str, category: &str,
    starts_in_hours: i64,
) -> EventRecord {
    let delta_lat = (km / EARTH_RADIUS_KM).to_degrees();
    let venue = GeoPoint {
        latitude: center.latitude + delta_lat,
        longitude: center.longitude,
    };
    event_at(title, category, Some(venue), starts_in_hours)
}
