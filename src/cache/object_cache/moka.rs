use std::time::{Duration, Instant};

use async_trait::async_trait;
use moka::Expiry;
use moka::future::Cache;
use tracing::debug;

use crate::cache::{CacheResult, ObjectCache};
use crate::config::AppConfig;
use crate::declare_object_cache_plugin;

declare_object_cache_plugin!("moka", MokaObjectCache);

/// 缓存条目：值与其存活时间
#[derive(Clone)]
struct Entry {
    value: String,
    ttl: Duration,
}

/// 按条目 TTL 过期
struct PerEntryTtl;

impl Expiry<String, Entry> for PerEntryTtl {
    fn expire_after_create(&self, _key: &String, entry: &Entry, _created_at: Instant) -> Option<Duration> {
        Some(entry.ttl)
    }
}

pub struct MokaObjectCache {
    inner: Cache<String, Entry>,
    default_ttl: Duration,
}

impl MokaObjectCache {
    pub fn new() -> Result<Self, String> {
        let config = AppConfig::get();
        Ok(Self::with_capacity(
            config.cache.memory.max_capacity,
            config.cache.default_ttl,
        ))
    }

    pub fn with_capacity(max_capacity: u64, default_ttl: u64) -> Self {
        let inner = Cache::builder()
            .max_capacity(max_capacity)
            .expire_after(PerEntryTtl)
            .build();

        debug!(
            "MokaObjectCache initialized with max capacity: {}, default TTL: {}s",
            max_capacity, default_ttl
        );
        Self {
            inner,
            default_ttl: Duration::from_secs(default_ttl),
        }
    }
}

#[async_trait]
impl ObjectCache for MokaObjectCache {
    async fn get_raw(&self, key: &str) -> CacheResult<String> {
        match self.inner.get(key).await {
            Some(entry) => CacheResult::Found(entry.value),
            None => CacheResult::NotFound,
        }
    }

    async fn insert_raw(&self, key: String, value: String, ttl: u64) {
        let ttl = if ttl == 0 {
            self.default_ttl
        } else {
            Duration::from_secs(ttl)
        };
        self.inner.insert(key, Entry { value, ttl }).await;
    }

    async fn remove(&self, key: &str) {
        self.inner.invalidate(key).await;
    }

    async fn invalidate_all(&self) {
        self.inner.invalidate_all();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[actix_web::test]
    async fn test_insert_get_remove() {
        let cache = MokaObjectCache::with_capacity(100, 60);
        assert_eq!(cache.get_raw("class:1").await, CacheResult::NotFound);

        cache
            .insert_raw("class:1".into(), "{\"id\":1}".into(), 0)
            .await;
        assert_eq!(
            cache.get_raw("class:1").await,
            CacheResult::Found("{\"id\":1}".to_string())
        );

        cache.remove("class:1").await;
        assert_eq!(cache.get_raw("class:1").await, CacheResult::NotFound);
    }

    #[actix_web::test]
    async fn test_json_helpers() {
        let cache = MokaObjectCache::with_capacity(100, 60);
        crate::cache::insert_json(&cache, "k".into(), &vec![1, 2, 3], 30).await;
        let value: Option<Vec<i32>> = crate::cache::get_json(&cache, "k").await;
        assert_eq!(value, Some(vec![1, 2, 3]));

        // 类型不符的条目会被丢弃
        let broken: Option<String> = crate::cache::get_json(&cache, "k").await;
        assert!(broken.is_none());
        assert_eq!(cache.get_raw("k").await, CacheResult::NotFound);
    }
}
