use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::events::EventRecord;

/// Optional refinements for a proximity search. A closed struct rather
/// than an open key-value map: the set of dimensions is fixed, and key
/// derivation must not depend on insertion order.
#[derive(
    Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema,
)]
pub struct SearchFilters {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub search: Option<String>,
}

impl SearchFilters {
    /// Trim and lowercase every dimension, dropping blanks. Matching and
    /// cache-key derivation both run on the normalized form, so `Music`
    /// and `music` are the same query.
    pub fn normalize(&self) -> Self {
        fn clean(value: &Option<String>) -> Option<String> {
            value
                .as_deref()
                .map(str::trim)
                .filter(|v| !v.is_empty())
                .map(str::to_lowercase)
        }

        Self {
            category: clean(&self.category),
            search: clean(&self.search),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.category.is_none() && self.search.is_none()
    }

    /// Enabled dimensions as (key, value) pairs, sorted by key. This is
    /// the canonical order fed into cache keys.
    pub fn as_sorted_pairs(&self) -> Vec<(&'static str, &str)> {
        let mut pairs = Vec::new();
        if let Some(category) = &self.category {
            pairs.push(("category", category.as_str()));
        }
        if let Some(search) = &self.search {
            pairs.push(("search", search.as_str()));
        }
        pairs.sort_by_key(|(key, _)| *key);
        pairs
    }

    /// All enabled dimensions must pass (filters AND together). Expects
    /// `self` to be normalized.
    pub fn matches(&self, event: &EventRecord) -> bool {
        if let Some(category) = &self.category {
            if !event.category.eq_ignore_ascii_case(category) {
                return false;
            }
        }

        if let Some(search) = &self.search {
            let title = event.title.to_lowercase();
            let description = event.description.to_lowercase();
            if !title.contains(search) && !description.contains(search) {
                return false;
            }
        }

        true
    }
}

#[cfg(test)]
mod tests {
    use chrono::Utc;

    use super::*;

    fn event(title: &str, description: &str, category: &str) -> EventRecord {
        EventRecord::builder()
            .title(title)
            .description(description)
            .category(category)
            .starts_at(Utc::now())
            .ends_at(Utc::now())
            .build()
    }

    #[test]
    fn normalize_trims_lowercases_and_drops_blanks() {
        let filters = SearchFilters {
            category: Some("  Music ".into()),
            search: Some("   ".into()),
        };
        let normalized = filters.normalize();
        assert_eq!(normalized.category.as_deref(), Some("music"));
        assert_eq!(normalized.search, None);
    }

    #[test]
    fn empty_filters_match_everything() {
        let filters = SearchFilters::default();
        assert!(filters.is_empty());
        assert!(filters.matches(&event("Jazz Night", "live jazz", "music")));
    }

    #[test]
    fn category_is_exact_match() {
        let filters = SearchFilters {
            category: Some("music".into()),
            search: None,
        };
        assert!(filters.matches(&event("Jazz Night", "", "Music")));
        assert!(!filters.matches(&event("Jazz Night", "", "musical")));
        assert!(!filters.matches(&event("Standup", "", "comedy")));
    }

    #[test]
    fn search_matches_title_or_description_substring() {
        let filters = SearchFilters {
            search: Some("jazz".into()),
            ..Default::default()
        };
        assert!(filters.matches(&event("JAZZ Night", "", "music")));
        assert!(filters.matches(&event("Open Mic", "some Jazz acts", "music")));
        assert!(!filters.matches(&event("Rock Show", "loud guitars", "music")));
    }

    #[test]
    fn dimensions_and_together() {
        let filters = SearchFilters {
            category: Some("music".into()),
            search: Some("jazz".into()),
        };
        assert!(filters.matches(&event("Jazz Night", "", "music")));
        // Search passes, category fails.
        assert!(!filters.matches(&event("Jazz Brunch", "", "food")));
        // Category passes, search fails.
        assert!(!filters.matches(&event("Rock Show", "", "music")));
    }

    #[test]
    fn sorted_pairs_are_key_ordered() {
        let filters = SearchFilters {
            search: Some("jazz".into()),
            category: Some("music".into()),
        };
        assert_eq!(
            filters.as_sorted_pairs(),
            vec![("category", "music"), ("search", "jazz")]
        );
    }
}
