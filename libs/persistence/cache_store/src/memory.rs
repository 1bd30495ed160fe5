use std::{
    collections::HashMap,
    time::{Duration, Instant},
};

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::{CacheResult, CacheStore};

struct Entry {
    value: Vec<u8>,
    expires_at: Instant,
}

impl Entry {
    fn is_expired(&self) -> bool { Instant::now() > self.expires_at }
}

/// In-process store with real per-key TTLs. Backs tests and the degraded
/// mode the server falls into when Redis is unreachable at startup.
/// Expired entries are dropped lazily on read and on prefix scans.
#[derive(Default)]
pub struct MemoryCacheStore {
    entries: RwLock<HashMap<String, Entry>>,
}

impl MemoryCacheStore {
    pub fn new() -> Self { Self::default() }
}

#[async_trait]
impl CacheStore for MemoryCacheStore {
    async fn get(&self, key: &str) -> CacheResult<Option<Vec<u8>>> {
        {
            let entries = self.entries.read().await;
            match entries.get(key) {
                Some(entry) if !entry.is_expired() => {
                    return Ok(Some(entry.value.clone()));
                }
                Some(_) => {}
                None => return Ok(None),
            }
        }

        // Expired: drop it so scans stay honest.
        self.entries.write().await.remove(key);
        Ok(None)
    }

    async fn set_with_ttl(
        &self, key: &str, value: &[u8], ttl: Duration,
    ) -> CacheResult<()> {
        let entry = Entry {
            value: value.to_vec(),
            expires_at: Instant::now() + ttl,
        };
        self.entries.write().await.insert(key.to_string(), entry);
        Ok(())
    }

    async fn keys_by_prefix(&self, prefix: &str) -> CacheResult<Vec<String>> {
        let entries = self.entries.read().await;
        Ok(entries
            .iter()
            .filter(|(key, entry)| {
                key.starts_with(prefix) && !entry.is_expired()
            })
            .map(|(key, _)| key.clone())
            .collect())
    }

    async fn delete_keys(&self, keys: &[String]) -> CacheResult<u64> {
        let mut entries = self.entries.write().await;
        let mut removed = 0;
        for key in keys {
            if entries.remove(key).is_some() {
                removed += 1;
            }
        }
        Ok(removed)
    }
}
