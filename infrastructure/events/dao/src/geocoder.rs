use async_trait::async_trait;
use events_store::{GeocodeError, Geocoder};
use geo_filter::GeoPoint;

/// Coordinate fallback for cities outside the curated registry: a fixed
/// table of secondary markets, no live lookup. Queries for cities it does
/// not know resolve to `None`, which the service reports as an unknown
/// city.
#[derive(Clone, Default)]
pub struct FallbackGeocoder;

const FALLBACK_CITIES: &[(&str, f64, f64)] = &[
    ("shimla", 31.1048, 77.1734),
    ("mysore", 12.2958, 76.6394),
    ("nagpur", 21.1458, 79.0882),
    ("indore", 22.7196, 75.8577),
    ("chandigarh", 30.7333, 76.7794),
    ("bhopal", 23.2599, 77.4126),
    ("vadodara", 22.3072, 73.1812),
    ("visakhapatnam", 17.6868, 83.2185),
];

impl FallbackGeocoder {
    pub fn new() -> Self { Self }
}

#[async_trait]
impl Geocoder for FallbackGeocoder {
    async fn resolve(
        &self, city: &str,
    ) -> Result<Option<GeoPoint>, GeocodeError> {
        let city = city.trim().to_lowercase();
        let point = FALLBACK_CITIES
            .iter()
            .find(|(name, ..)| *name == city)
            .map(|(_, latitude, longitude)| {
                GeoPoint::new(*latitude, *longitude).map_err(|e| {
                    GeocodeError::Unavailable(format!(
                        "bad fallback entry for {city}: {e}"
                    ))
                })
            })
            .transpose()?;
        Ok(point)
    }
}
