use std::time::Duration;

use async_trait::async_trait;
use redis::AsyncCommands;

use crate::{CacheError, CacheResult, CacheStore};

/// Redis-backed store using a deadpool Redis pool. Expiry is delegated to
/// Redis (`SET … EX`), prefix listing uses cursor-based SCAN so it never
/// blocks the server the way KEYS would.
#[derive(Clone)]
pub struct RedisCacheStore {
    pool: deadpool_redis::Pool,
}

impl RedisCacheStore {
    pub fn new(pool: deadpool_redis::Pool) -> Self { Self { pool } }

    async fn connection(
        &self,
    ) -> CacheResult<deadpool_redis::Connection> {
        self.pool
            .get()
            .await
            .map_err(|e| CacheError::Pool(e.to_string()))
    }
}

#[async_trait]
impl CacheStore for RedisCacheStore {
    async fn get(&self, key: &str) -> CacheResult<Option<Vec<u8>>> {
        let mut conn = self.connection().await?;
        conn.get(key)
            .await
            .map_err(|e| CacheError::Backend(e.to_string()))
    }

    async fn set_with_ttl(
        &self, key: &str, value: &[u8], ttl: Duration,
    ) -> CacheResult<()> {
        let mut conn = self.connection().await?;
        let _: () = conn
            .set_ex(key, value, ttl.as_secs())
            .await
            .map_err(|e| CacheError::Backend(e.to_string()))?;
        Ok(())
    }

    async fn keys_by_prefix(&self, prefix: &str) -> CacheResult<Vec<String>> {
        let mut conn = self.connection().await?;
        let pattern = format!("{prefix}*");
        let mut keys = Vec::new();
        let mut cursor: u64 = 0;

        loop {
            let (next, batch): (u64, Vec<String>) = redis::cmd("SCAN")
                .arg(cursor)
                .arg("MATCH")
                .arg(&pattern)
                .arg("COUNT")
                .arg(100)
                .query_async(&mut conn)
                .await
                .map_err(|e| CacheError::Backend(e.to_string()))?;

            keys.extend(batch);
            cursor = next;
            if cursor == 0 {
                break;
            }
        }

        Ok(keys)
    }

    async fn delete_keys(&self, keys: &[String]) -> CacheResult<u64> {
        if keys.is_empty() {
            return Ok(0);
        }

        let mut conn = self.connection().await?;
        conn.del(keys)
            .await
            .map_err(|e| CacheError::Backend(e.to_string()))
    }
}
