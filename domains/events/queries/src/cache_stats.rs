use std::{collections::BTreeSet, sync::Arc};

use cache_store::{CacheError, CacheStore};
use events_responses::CacheStatsResponse;
use tracing::instrument;

use crate::cache_keys;

/// Counts live cache entries in this subsystem's namespace and the
/// distinct cities they encode. Purely observational: it reports what the
/// cache backend holds right now, not what the database knows.
#[derive(Clone)]
pub struct CacheStatsQueryHandler {
    cache: Arc<dyn CacheStore>,
}

impl CacheStatsQueryHandler {
    pub fn new(cache: Arc<dyn CacheStore>) -> Self { Self { cache } }

    #[instrument(skip(self))]
    pub async fn execute(&self) -> Result<CacheStatsResponse, CacheError> {
        let keys = self
            .cache
            .keys_by_prefix(cache_keys::LOCATION_NAMESPACE)
            .await?;

        let cities: BTreeSet<String> = keys
            .iter()
            .filter_map(|key| cache_keys::city_of_key(key))
            .map(str::to_string)
            .collect();

        Ok(CacheStatsResponse {
            total_cached_searches: keys.len(),
            cached_cities: cities.into_iter().collect(),
        })
    }
}
