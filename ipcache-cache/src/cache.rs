//! Read-through cache in front of a [`KvStore`].

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tokio::runtime::Handle;
use tracing::{debug, warn};

use ipcache_core::error::{Result, StoreError};
use ipcache_core::traits::KvStore;

use crate::config::CacheConfig;
use crate::entries::EntryMap;
use crate::evictor::Evictor;

/// Read-through cache for point lookups.
///
/// Implements [`KvStore`] itself, so callers can swap it in for the backing
/// store without noticing. Only [`get`](KvStore::get) is cached;
/// [`mget`](KvStore::mget) and [`keys`](KvStore::keys) are forwarded as-is.
///
/// # Eviction
///
/// A background task replaces the whole map with an empty one every
/// [`CacheConfig::eviction_interval`]. There is no per-entry expiry, so
/// entries live at most one interval. The task ends on
/// [`shutdown`](Self::shutdown) or when the cache is dropped.
///
/// # Errors
///
/// Store failures are returned unchanged and never cached.
pub struct ReadThroughCache<S: KvStore + ?Sized> {
    remote: Arc<S>,
    entries: Arc<EntryMap>,
    evictor: Evictor,
    hits: AtomicU64,
    misses: AtomicU64,
    remote_failures: AtomicU64,
}

impl<S: KvStore + ?Sized> ReadThroughCache<S> {
    /// Creates a cache with the default 5 second eviction interval.
    ///
    /// No store call is made here.
    ///
    /// # Panics
    ///
    /// Panics if called outside a Tokio runtime.
    pub fn new(remote: Arc<S>) -> Self {
        let config = CacheConfig::default();
        Self::build(remote, config.eviction_interval(), &Handle::current())
    }

    /// Creates a cache with a custom configuration.
    ///
    /// Fails if the configuration is invalid or no Tokio runtime is running.
    pub fn with_config(remote: Arc<S>, config: CacheConfig) -> Result<Self> {
        config.validate()?;
        let runtime = Handle::try_current()
            .map_err(|e| StoreError::Config(format!("no Tokio runtime for eviction task: {e}")))?;

        Ok(Self::build(remote, config.eviction_interval(), &runtime))
    }

    fn build(remote: Arc<S>, period: Duration, runtime: &Handle) -> Self {
        let entries = Arc::new(EntryMap::new());
        let evictor = Evictor::spawn(entries.clone(), period, runtime);

        Self {
            remote,
            entries,
            evictor,
            hits: AtomicU64::new(0),
            misses: AtomicU64::new(0),
            remote_failures: AtomicU64::new(0),
        }
    }

    /// Stops the eviction task and waits for it to exit.
    ///
    /// Lookups keep working afterwards; entries are simply never flushed again.
    /// Calling this more than once is harmless.
    pub async fn shutdown(&self) {
        self.evictor.stop().await;
    }

    /// Returns true while the eviction task is alive.
    pub fn is_running(&self) -> bool {
        self.evictor.is_running()
    }

    /// Returns true if `key` is cached in the current epoch.
    pub fn contains_key(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    /// Returns the number of cached entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if nothing is cached.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Number of full flushes performed so far.
    pub fn epoch(&self) -> u64 {
        self.entries.epoch()
    }

    /// Returns the backing store.
    pub fn remote(&self) -> &Arc<S> {
        &self.remote
    }

    /// Returns cache statistics.
    pub fn stats(&self) -> CacheStats {
        CacheStats {
            hits: self.hits.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
            remote_failures: self.remote_failures.load(Ordering::Relaxed),
            flushes: self.entries.epoch(),
            entries: self.entries.len(),
            eviction_interval: self.evictor.period(),
        }
    }
}

#[async_trait]
impl<S: KvStore + ?Sized> KvStore for ReadThroughCache<S> {
    async fn get(&self, key: &str) -> Result<String> {
        let (cached, epoch) = self.entries.get(key);
        if let Some(value) = cached {
            self.hits.fetch_add(1, Ordering::Relaxed);
            debug!(key, "Cache hit");
            return Ok(value);
        }

        self.misses.fetch_add(1, Ordering::Relaxed);
        debug!(key, "Cache miss, querying store");

        let value = match self.remote.get(key).await {
            Ok(value) => value,
            Err(e) => {
                self.remote_failures.fetch_add(1, Ordering::Relaxed);
                warn!(key, error = %e, "Store lookup failed");
                return Err(e);
            }
        };

        if !self.entries.insert(key, value.clone(), epoch) {
            debug!(key, "Flushed during fetch, not caching");
        }

        Ok(value)
    }

    async fn mget(&self, keys: &[String]) -> Result<Vec<Option<String>>> {
        self.remote.mget(keys).await
    }

    async fn keys(&self) -> Result<Vec<String>> {
        self.remote.keys().await
    }
}

/// Cache statistics.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CacheStats {
    /// Lookups answered from the map
    pub hits: u64,
    /// Lookups that went to the store
    pub misses: u64,
    /// Misses whose store call failed
    pub remote_failures: u64,
    /// Full flushes since construction
    pub flushes: u64,
    /// Entries cached right now
    pub entries: usize,
    /// Period between flushes
    pub eviction_interval: Duration,
}

impl CacheStats {
    /// Fraction of lookups served from the map, in `[0, 1]`.
    pub fn hit_ratio(&self) -> f64 {
        let total = self.hits + self.misses;
        if total == 0 {
            0.0
        } else {
            self.hits as f64 / total as f64
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ipcache_store::MemoryStore;
    use tokio::time;

    fn store() -> Arc<MemoryStore> {
        let store = Arc::new(MemoryStore::new());
        store.insert("10.0.0.1", "192.168.1.5").unwrap();
        store.insert("10.0.0.2", "192.168.1.6").unwrap();
        store
    }

    #[tokio::test]
    async fn test_second_get_served_locally() {
        let store = store();
        let cache = ReadThroughCache::new(store.clone());

        assert_eq!(cache.get("10.0.0.1").await.unwrap(), "192.168.1.5");
        assert_eq!(cache.get("10.0.0.1").await.unwrap(), "192.168.1.5");
        assert_eq!(store.get_calls(), 1);

        let stats = cache.stats();
        assert_eq!(stats.hits, 1);
        assert_eq!(stats.misses, 1);
        assert_eq!(stats.entries, 1);
        assert!((stats.hit_ratio() - 0.5).abs() < f64::EPSILON);
    }

    #[tokio::test]
    async fn test_error_passed_through_and_not_cached() {
        let store = store();
        let cache = ReadThroughCache::new(store.clone());

        let err = cache.get("10.0.0.9").await.unwrap_err();
        assert!(matches!(err, StoreError::NotFound(ref k) if k == "10.0.0.9"));
        assert!(!cache.contains_key("10.0.0.9"));
        assert!(cache.is_empty());

        // Still not cached: every attempt reaches the store
        assert!(cache.get("10.0.0.9").await.is_err());
        assert_eq!(store.get_calls(), 2);
        assert_eq!(cache.stats().remote_failures, 2);
    }

    #[tokio::test]
    async fn test_outage_does_not_touch_cached_entries() {
        let store = store();
        let cache = ReadThroughCache::new(store.clone());
        cache.get("10.0.0.1").await.unwrap();

        store.set_unavailable(true);
        assert!(cache.get("10.0.0.2").await.unwrap_err().is_recoverable());
        assert_eq!(cache.get("10.0.0.1").await.unwrap(), "192.168.1.5");
        assert_eq!(cache.len(), 1);
    }

    #[tokio::test]
    async fn test_passthrough_does_not_populate() {
        let store = store();
        let cache = ReadThroughCache::new(store.clone());
        let keys = vec!["10.0.0.1".to_string(), "10.0.0.2".to_string()];

        assert_eq!(cache.mget(&keys).await.unwrap(), store.mget(&keys).await.unwrap());
        assert_eq!(cache.keys().await.unwrap(), store.keys().await.unwrap());

        assert!(cache.is_empty());
        assert_eq!(store.mget_calls(), 2);
        assert_eq!(store.keys_calls(), 2);
        assert_eq!(store.get_calls(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_entries_gone_after_interval() {
        let store = store();
        let cache = ReadThroughCache::new(store.clone());

        cache.get("10.0.0.1").await.unwrap();
        time::sleep(Duration::from_millis(5_100)).await;

        assert!(cache.is_empty());
        assert_eq!(cache.epoch(), 1);

        cache.get("10.0.0.1").await.unwrap();
        assert_eq!(store.get_calls(), 2);
        assert_eq!(cache.stats().flushes, 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_fetch_spanning_flush_is_not_cached() {
        let store = Arc::new(MemoryStore::with_latency(Duration::from_millis(300)));
        store.insert("10.0.0.1", "192.168.1.5").unwrap();
        let config = CacheConfig::default().with_eviction_interval(Duration::from_secs(1));
        let cache = ReadThroughCache::with_config(store.clone(), config).unwrap();

        // Fetch runs from 0.8s to 1.1s, across the flush at 1s
        time::sleep(Duration::from_millis(800)).await;
        assert_eq!(cache.get("10.0.0.1").await.unwrap(), "192.168.1.5");

        assert_eq!(cache.epoch(), 1);
        assert!(!cache.contains_key("10.0.0.1"));
    }

    #[tokio::test(start_paused = true)]
    async fn test_shutdown_stops_eviction() {
        let store = store();
        let cache = ReadThroughCache::new(store.clone());
        assert!(cache.is_running());

        cache.shutdown().await;
        assert!(!cache.is_running());

        cache.get("10.0.0.1").await.unwrap();
        time::sleep(Duration::from_secs(30)).await;
        assert!(cache.contains_key("10.0.0.1"));
        assert_eq!(cache.epoch(), 0);

        cache.shutdown().await;
    }

    #[tokio::test]
    async fn test_invalid_config_rejected() {
        let config = CacheConfig::default().with_eviction_interval(Duration::ZERO);
        let result = ReadThroughCache::with_config(store(), config);
        assert!(matches!(result, Err(StoreError::Config(_))));
    }

    #[test]
    fn test_with_config_requires_runtime() {
        let result = ReadThroughCache::with_config(store(), CacheConfig::default());
        assert!(matches!(result, Err(StoreError::Config(_))));
    }

    #[tokio::test]
    async fn test_usable_as_trait_object() {
        let remote: Arc<dyn KvStore> = store();
        let cache: Arc<dyn KvStore> = Arc::new(ReadThroughCache::new(remote));
        assert_eq!(cache.get("10.0.0.2").await.unwrap(), "192.168.1.6");
    }

    #[test]
    fn test_hit_ratio_empty() {
        let stats = CacheStats {
            hits: 0,
            misses: 0,
            remote_failures: 0,
            flushes: 0,
            entries: 0,
            eviction_interval: Duration::from_secs(5),
        };
        assert_eq!(stats.hit_ratio(), 0.0);
    }
}
