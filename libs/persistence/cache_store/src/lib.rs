use std::time::Duration;

use deadpool_redis::{Config, CreatePoolError, Pool, Runtime};
pub use deadpool_redis::{PoolError, redis::RedisError};
use tracing::{info, instrument};
use url::Url;

pub mod config;
pub mod memory;
pub mod redis_cache;

pub use memory::MemoryCacheStore;
pub use redis_cache::RedisCacheStore;

/// Cache-specific error type that doesn't leak backend details to callers.
#[derive(Debug, thiserror::Error)]
pub enum CacheError {
    #[error("Pool error: {0}")]
    Pool(String),

    #[error("Backend error: {0}")]
    Backend(String),
}

pub type CacheResult<T> = Result<T, CacheError>;

/// Key-value store with expiry, as seen by the proximity cache.
///
/// Values are opaque bytes; serialization belongs to the caller. Keys are
/// expected to be namespaced so that `keys_by_prefix`/`delete_keys` scans
/// cannot touch unrelated cache usage.
#[async_trait::async_trait]
pub trait CacheStore: Send + Sync {
    async fn get(&self, key: &str) -> CacheResult<Option<Vec<u8>>>;

    /// Entries expire passively after `ttl`; there is no explicit update.
    async fn set_with_ttl(
        &self, key: &str, value: &[u8], ttl: Duration,
    ) -> CacheResult<()>;

    async fn keys_by_prefix(&self, prefix: &str) -> CacheResult<Vec<String>>;

    async fn delete_keys(&self, keys: &[String]) -> CacheResult<u64>;
}

#[instrument(skip_all, name = "connect-redis")]
pub async fn connect_redis_db<C>(config: &C) -> Result<Pool, CreatePoolError>
where
    C: config::DbConnectConfig,
{
    let mut url = Url::parse("redis://").unwrap();

    url.set_host(Some(config.host())).unwrap();
    url.set_port(config.port().into()).unwrap();
    url.path_segments_mut()
        .unwrap()
        .extend(&[config.db().to_string()]);

    info!(redis.url = %url, redis.connect = true);

    let cfg = Config {
        url: Some(url.to_string()),
        pool: Some(deadpool_redis::PoolConfig::default()),
        connection: None,
    };

    let pool = cfg.create_pool(Some(Runtime::Tokio1))?;
    Ok(pool)
}
