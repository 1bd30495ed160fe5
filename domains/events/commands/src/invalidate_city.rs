use std::sync::Arc;

use cache_store::{CacheError, CacheStore};
use events_queries::cache_keys;
use events_responses::InvalidateCityResponse;
use serde::Deserialize;
use tracing::{info, instrument};

#[derive(Debug, Deserialize)]
pub struct InvalidateCityCacheCommand {
    pub city: String,
}

/// Drops every cached search for one city, across all radius and filter
/// combinations, for when upstream data changed and waiting out the TTL
/// is not acceptable. Subsequent queries recompute and repopulate.
#[derive(Clone)]
pub struct InvalidateCityCacheHandler {
    cache: Arc<dyn CacheStore>,
}

impl InvalidateCityCacheHandler {
    pub fn new(cache: Arc<dyn CacheStore>) -> Self { Self { cache } }

    #[instrument(skip(self))]
    pub async fn execute(
        &self, command: InvalidateCityCacheCommand,
    ) -> Result<InvalidateCityResponse, CacheError> {
        let prefix = cache_keys::city_prefix(&command.city);
        let keys = self.cache.keys_by_prefix(&prefix).await?;
        let removed = self.cache.delete_keys(&keys).await?;

        info!(city = %command.city, removed, "city cache invalidated");

        Ok(InvalidateCityResponse {
            city: command.city,
            removed,
        })
    }
}
