use std::{
    sync::{
        Arc,
        atomic::{AtomicUsize, Ordering},
    },
    time::Duration,
};

use async_trait::async_trait;
use cache_store::{CacheError, CacheResult, CacheStore};

/// Cache double where every operation fails, for fail-open coverage.
#[derive(Default)]
pub struct FailingCacheStore;

#[async_trait]
impl CacheStore for FailingCacheStore {
    async fn get(&self, _key: &str) -> CacheResult<Option<Vec<u8>>> {
        Err(CacheError::Backend("injected failure".to_string()))
    }

    async fn set_with_ttl(
        &self, _key: &str, _value: &[u8], _ttl: Duration,
    ) -> CacheResult<()> {
        Err(CacheError::Backend("injected failure".to_string()))
    }

    async fn keys_by_prefix(&self, _prefix: &str) -> CacheResult<Vec<String>> {
        Err(CacheError::Backend("injected failure".to_string()))
    }

    async fn delete_keys(&self, _keys: &[String]) -> CacheResult<u64> {
        Err(CacheError::Backend("injected failure".to_string()))
    }
}

/// Pass-through wrapper that sleeps before every operation, for deadline
/// coverage.
pub struct SlowCacheStore {
    inner: Arc<dyn CacheStore>,
    delay: Duration,
}

impl SlowCacheStore {
    pub fn new(inner: Arc<dyn CacheStore>, delay: Duration) -> Self {
        Self { inner, delay }
    }
}

#[async_trait]
impl CacheStore for SlowCacheStore {
    async fn get(&self, key: &str) -> CacheResult<Option<Vec<u8>>> {
        tokio::time::sleep(self.delay).await;
        self.inner.get(key).await
    }

    async fn set_with_ttl(
        &self, key: &str, value: &[u8], ttl: Duration,
    ) -> CacheResult<()> {
        tokio::time::sleep(self.delay).await;
        self.inner.set_with_ttl(key, value, ttl).await
    }

    async fn keys_by_prefix(&self, prefix: &str) -> CacheResult<Vec<String>> {
        tokio::time::sleep(self.delay).await;
        self.inner.keys_by_prefix(prefix).await
    }

    async fn delete_keys(&self, keys: &[String]) -> CacheResult<u64> {
        tokio::time::sleep(self.delay).await;
        self.inner.delete_keys(keys).await
    }
}

/// Pass-through wrapper that counts reads and writes.
pub struct CountingCacheStore {
    inner: Arc<dyn CacheStore>,
    gets: AtomicUsize,
    sets: AtomicUsize,
}

impl CountingCacheStore {
    pub fn new(inner: Arc<dyn CacheStore>) -> Self {
        Self {
            inner,
            gets: AtomicUsize::new(0),
            sets: AtomicUsize::new(0),
        }
    }

    pub fn get_count(&self) -> usize { self.gets.load(Ordering::SeqCst) }

    pub fn set_count(&self) -> usize { self.sets.load(Ordering::SeqCst) }
}

#[async_trait]
impl CacheStore for CountingCacheStore {
    async fn get(&self, key: &str) -> CacheResult<Option<Vec<u8>>> {
        self.gets.fetch_add(1, Ordering::SeqCst);
        self.inner.get(key).await
    }

    async fn set_with_ttl(
        &self, key: &str, value: &[u8], ttl: Duration,
    ) -> CacheResult<()> {
        self.sets.fetch_add(1, Ordering::SeqCst);
        self.inner.set_with_ttl(key, value, ttl).await
    }

    async fn keys_by_prefix(&self, prefix: &str) -> CacheResult<Vec<String>> {
        self.inner.keys_by_prefix(prefix).await
    }

    async fn delete_keys(&self, keys: &[String]) -> CacheResult<u64> {
        self.inner.delete_keys(keys).await
    }
}
