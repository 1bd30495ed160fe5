pub mod cache_keys;
pub mod cache_stats;
pub mod list_cities;
pub mod nearby_events;

pub use cache_stats::CacheStatsQueryHandler;
pub use list_cities::ListCitiesQueryHandler;
pub use nearby_events::{
    CACHE_OP_TIMEOUT, EVENT_STORE_TIMEOUT, GetNearbyEventsQuery, MAX_RESULTS,
    NearbyEventsQueryHandler,
};
