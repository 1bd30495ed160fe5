//! Deterministic cache-key derivation for proximity searches.
//!
//! Every key this subsystem writes lives under one fixed namespace so that
//! prefix scans for statistics and invalidation can never touch unrelated
//! cache usage. Filter dimensions are folded in sorted by key, so
//! set-equal filter combinations always land on the same entry.

use events_models::SearchFilters;

pub const LOCATION_NAMESPACE: &str = "events:location:";

/// Lowercased, hyphen-joined city name. City names come from a curated
/// registry, never raw user input, so this stays a plain transform.
pub fn city_slug(name: &str) -> String {
    name.trim()
        .to_lowercase()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join("-")
}

/// Prefix covering every radius/filter combination cached for one city.
pub fn city_prefix(city: &str) -> String {
    format!("{LOCATION_NAMESPACE}{}:", city_slug(city))
}

/// Key for one (city, radius, filters) tuple. Expects normalized filters.
pub fn search_key(
    city: &str, radius_km: f64, filters: &SearchFilters,
) -> String {
    format!(
        "{}{radius_km}:{}",
        city_prefix(city),
        filter_fingerprint(filters)
    )
}

/// The city segment of a namespaced key, for cache statistics.
pub fn city_of_key(key: &str) -> Option<&str> {
    key.strip_prefix(LOCATION_NAMESPACE)?.split(':').next()
}

fn filter_fingerprint(filters: &SearchFilters) -> String {
    let pairs = filters.as_sorted_pairs();
    if pairs.is_empty() {
        return "all".to_string();
    }
    pairs
        .iter()
        .map(|(key, value)| format!("{key}:{}", escape_value(value)))
        .collect::<Vec<_>>()
        .join("|")
}

/// Separator characters inside a filter value are percent-encoded so a
/// value containing `:` or `|` cannot imitate another dimension's segment
/// and collide with a genuinely different query.
fn escape_value(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '%' => escaped.push_str("%25"),
            ':' => escaped.push_str("%3A"),
            '|' => escaped.push_str("%7C"),
            _ => escaped.push(c),
        }
    }
    escaped
}
