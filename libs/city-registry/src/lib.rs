//! Curated set of cities eligible for proximity-search caching.
//!
//! The table is fixed at startup. Lookup is case-insensitive exact match:
//! no fuzzy matching, so "Bengaluru" and "Bangalore" would be separate
//! entries if both were wanted.

use std::{sync::LazyLock, time::Duration};

use geo_filter::GeoPoint;
use serde::Serialize;
use utoipa::ToSchema;

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct CityDescriptor {
    /// Canonical casing for display; compared case-insensitively.
    pub name: &'static str,
    pub state_name: &'static str,
    /// Traffic rank, 1 = highest. Display grouping only; cache behavior
    /// never reads it.
    pub tier: u8,
    pub coordinates: GeoPoint,
    /// Per-city cache lifetime. A tunable per entry, not a formula over
    /// tier.
    pub cache_ttl_secs: u64,
}

impl CityDescriptor {
    pub fn cache_ttl(&self) -> Duration {
        Duration::from_secs(self.cache_ttl_secs)
    }
}

struct CityRow(&'static str, &'static str, u8, f64, f64, u64);

const CITY_ROWS: &[CityRow] = &[
    CityRow("Mumbai", "Maharashtra", 1, 19.076, 72.8777, 300),
    CityRow("Delhi", "Delhi", 1, 28.7041, 77.1025, 300),
    CityRow("Bangalore", "Karnataka", 1, 12.9716, 77.5946, 300),
    CityRow("Hyderabad", "Telangana", 1, 17.385, 78.4867, 300),
    CityRow("Chennai", "Tamil Nadu", 2, 13.0827, 80.2707, 600),
    CityRow("Kolkata", "West Bengal", 2, 22.5726, 88.3639, 600),
    CityRow("Pune", "Maharashtra", 2, 18.5204, 73.8567, 600),
    CityRow("Ahmedabad", "Gujarat", 2, 23.0225, 72.5714, 600),
    CityRow("Jaipur", "Rajasthan", 3, 26.9124, 75.7873, 900),
    CityRow("Surat", "Gujarat", 3, 21.1702, 72.8311, 900),
    CityRow("Lucknow", "Uttar Pradesh", 3, 26.8467, 80.9462, 900),
    CityRow("Kochi", "Kerala", 3, 9.9312, 76.2673, 900),
];

static CITIES: LazyLock<Vec<CityDescriptor>> = LazyLock::new(|| {
    let mut cities: Vec<CityDescriptor> = CITY_ROWS
        .iter()
        .map(|row| {
            CityDescriptor {
                name: row.0,
                state_name: row.1,
                tier: row.2,
                coordinates: GeoPoint::new(row.3, row.4)
                    .unwrap_or_else(|e| panic!("bad registry entry {}: {e}", row.0)),
                cache_ttl_secs: row.5,
            }
        })
        .collect();
    cities.sort_by(|a, b| a.tier.cmp(&b.tier).then(a.name.cmp(b.name)));
    cities
});

pub struct CityRegistry;

impl CityRegistry {
    /// Case-insensitive exact match on the city name.
    pub fn lookup(name: &str) -> Option<&'static CityDescriptor> {
        let name = name.trim();
        CITIES.iter().find(|city| city.name.eq_ignore_ascii_case(name))
    }

    /// All cacheable cities, ordered by tier then name.
    pub fn list_all() -> &'static [CityDescriptor] { &CITIES }
}
