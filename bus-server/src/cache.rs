//! Expiring caches for slowly-changing upstream lookups.
//!
//! Line metadata (security nonce and map id) and route geometry change
//! rarely but are expensive to fetch, so they are kept for a short TTL,
//! keyed by line. The last successfully fetched stop list is kept for
//! longer so a failed refresh can still show the line.
//!
//! These caches belong to the collaborators around the estimator; the
//! estimator itself holds no state.

use std::future::Future;
use std::hash::Hash;
use std::time::Duration;

use moka::future::Cache as MokaCache;

/// Configuration for the caches.
#[derive(Debug, Clone)]
pub struct CacheConfig {
    /// TTL for line metadata and route geometry.
    pub ttl: Duration,

    /// How long the last known stop list is kept as a fallback.
    pub fallback_ttl: Duration,

    /// Maximum number of entries per cache.
    pub max_capacity: u64,
}

impl CacheConfig {
    pub fn with_ttl(mut self, ttl: Duration) -> Self {
        self.ttl = ttl;
        self
    }

    pub fn with_fallback_ttl(mut self, ttl: Duration) -> Self {
        self.fallback_ttl = ttl;
        self
    }
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            ttl: Duration::from_secs(5 * 60),
            fallback_ttl: Duration::from_secs(60 * 60),
            max_capacity: 200,
        }
    }
}

/// A small expiring key-value store.
///
/// Entries expire `ttl` after insertion. Misses and expiries are filled by
/// [`TtlCache::get_or_fetch`]; failed fetches are not cached.
pub struct TtlCache<K, V> {
    entries: MokaCache<K, V>,
}

impl<K, V> TtlCache<K, V>
where
    K: Hash + Eq + Send + Sync + 'static,
    V: Clone + Send + Sync + 'static,
{
    /// Create a new cache.
    pub fn new(ttl: Duration, max_capacity: u64) -> Self {
        let entries = MokaCache::builder()
            .time_to_live(ttl)
            .max_capacity(max_capacity)
            .build();

        Self { entries }
    }

    /// Get an unexpired entry.
    pub async fn get(&self, key: &K) -> Option<V> {
        self.entries.get(key).await
    }

    /// Insert or replace an entry, restarting its TTL.
    pub async fn insert(&self, key: K, value: V) {
        self.entries.insert(key, value).await;
    }

    /// Return the cached value, or run `fetch` and cache its result.
    ///
    /// An error from `fetch` is returned as-is and leaves the cache untouched.
    pub async fn get_or_fetch<F, Fut, E>(&self, key: K, fetch: F) -> Result<V, E>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<V, E>>,
    {
        if let Some(cached) = self.entries.get(&key).await {
            return Ok(cached);
        }

        let value = fetch().await?;
        self.entries.insert(key, value.clone()).await;

        Ok(value)
    }

    /// Drop one entry.
    pub async fn invalidate(&self, key: &K) {
        self.entries.invalidate(key).await;
    }

    /// Drop every entry.
    pub fn invalidate_all(&self) {
        self.entries.invalidate_all();
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use super::*;

    #[test]
    fn default_config() {
        let config = CacheConfig::default();
        assert_eq!(config.ttl, Duration::from_secs(300));
        assert_eq!(config.fallback_ttl, Duration::from_secs(3600));
        assert_eq!(config.max_capacity, 200);
    }

    #[test]
    fn config_builder() {
        let config = CacheConfig::default()
            .with_ttl(Duration::from_secs(30))
            .with_fallback_ttl(Duration::from_secs(90));
        assert_eq!(config.ttl, Duration::from_secs(30));
        assert_eq!(config.fallback_ttl, Duration::from_secs(90));
    }

    #[tokio::test]
    async fn new_cache_is_empty() {
        let cache: TtlCache<String, u32> = TtlCache::new(Duration::from_secs(60), 10);
        assert!(cache.get(&"05".to_string()).await.is_none());
    }

    #[tokio::test]
    async fn get_or_fetch_only_fetches_once() {
        let cache: TtlCache<String, u32> = TtlCache::new(Duration::from_secs(60), 10);
        let calls = AtomicUsize::new(0);

        for _ in 0..3 {
            let value = cache
                .get_or_fetch("05".to_string(), || async {
                    calls.fetch_add(1, Ordering::SeqCst);
                    Ok::<_, String>(42)
                })
                .await
                .unwrap();
            assert_eq!(value, 42);
        }

        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn failed_fetch_is_not_cached() {
        let cache: TtlCache<String, u32> = TtlCache::new(Duration::from_secs(60), 10);

        let err = cache
            .get_or_fetch("05".to_string(), || async { Err::<u32, _>("down") })
            .await;
        assert_eq!(err, Err("down"));
        assert!(cache.get(&"05".to_string()).await.is_none());

        let ok = cache
            .get_or_fetch("05".to_string(), || async { Ok::<_, &str>(7) })
            .await;
        assert_eq!(ok, Ok(7));
    }

    #[tokio::test]
    async fn invalidate_forces_refetch() {
        let cache: TtlCache<String, u32> = TtlCache::new(Duration::from_secs(60), 10);
        cache.insert("05".to_string(), 1).await;

        cache.invalidate(&"05".to_string()).await;
        assert!(cache.get(&"05".to_string()).await.is_none());

        let value = cache
            .get_or_fetch("05".to_string(), || async { Ok::<_, String>(2) })
            .await
            .unwrap();
        assert_eq!(value, 2);
    }

    #[tokio::test]
    async fn expired_entries_are_refetched() {
        let cache: TtlCache<String, u32> = TtlCache::new(Duration::from_millis(20), 10);
        cache.insert("05".to_string(), 1).await;

        tokio::time::sleep(Duration::from_millis(60)).await;

        assert!(cache.get(&"05".to_string()).await.is_none());
    }
}
