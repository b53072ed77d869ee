//! In-memory key-value store.
//!
//! Fast, thread-safe storage that mimics the remote IPv4 database: every
//! operation can be delayed by a fixed latency and can be made to fail.

use std::collections::HashMap;
use std::net::Ipv4Addr;
use std::path::Path;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use dashmap::DashMap;
use tracing::{debug, instrument};

use ipcache_core::constants::REMOTE_LATENCY;
use ipcache_core::error::{Result, StoreError};
use ipcache_core::traits::KvStore;

/// In-memory key-value store.
///
/// Uses a concurrent map for thread-safe access without requiring external
/// synchronization.
///
/// # Call accounting
///
/// Each operation bumps its own counter before anything else happens, so
/// failed and slow calls are counted too. Tests use the counters to prove
/// whether a lookup reached the store.
#[derive(Debug)]
pub struct MemoryStore {
    /// key → IPv4 address
    entries: DashMap<String, String>,
    /// Delay applied to every operation
    latency: Duration,
    /// When set, every operation fails with `Unavailable`
    unavailable: AtomicBool,
    get_calls: AtomicU64,
    mget_calls: AtomicU64,
    keys_calls: AtomicU64,
}

impl MemoryStore {
    /// Creates an empty store that answers immediately.
    pub fn new() -> Self {
        Self::with_latency(Duration::ZERO)
    }

    /// Creates an empty store with the latency of the real remote database.
    pub fn remote() -> Self {
        Self::with_latency(REMOTE_LATENCY)
    }

    /// Creates an empty store that delays every operation by `latency`.
    pub fn with_latency(latency: Duration) -> Self {
        Self {
            entries: DashMap::new(),
            latency,
            unavailable: AtomicBool::new(false),
            get_calls: AtomicU64::new(0),
            mget_calls: AtomicU64::new(0),
            keys_calls: AtomicU64::new(0),
        }
    }

    /// Stores `value` under `key`, replacing any previous value.
    ///
    /// Fails with [`StoreError::InvalidValue`] unless `value` is a dotted-quad IPv4 address.
    pub fn insert(&self, key: impl Into<String>, value: impl Into<String>) -> Result<()> {
        let key = key.into();
        let value = value.into();

        if value.parse::<Ipv4Addr>().is_err() {
            return Err(StoreError::InvalidValue { key, value });
        }

        self.entries.insert(key, value);
        Ok(())
    }

    /// Removes a key. Returns the previous value, if any.
    pub fn remove(&self, key: &str) -> Option<String> {
        self.entries.remove(key).map(|(_, value)| value)
    }

    /// Imports every pair from a JSON object file (`{"key": "ipv4", ...}`).
    ///
    /// Returns the number of imported entries. Nothing is imported if any
    /// value is invalid.
    pub fn load_json(&self, path: impl AsRef<Path>) -> Result<usize> {
        let raw = std::fs::read_to_string(path.as_ref())?;
        let pairs: HashMap<String, String> = serde_json::from_str(&raw)?;

        if let Some((key, value)) = pairs.iter().find(|(_, v)| v.parse::<Ipv4Addr>().is_err()) {
            return Err(StoreError::InvalidValue {
                key: key.clone(),
                value: value.clone(),
            });
        }

        let imported = pairs.len();
        for (key, value) in pairs {
            self.entries.insert(key, value);
        }

        debug!(path = %path.as_ref().display(), imported, "Loaded entries from JSON");
        Ok(imported)
    }

    /// Makes every subsequent operation fail (`true`) or succeed again (`false`).
    pub fn set_unavailable(&self, unavailable: bool) {
        self.unavailable.store(unavailable, Ordering::SeqCst);
    }

    /// Number of point lookups received.
    pub fn get_calls(&self) -> u64 {
        self.get_calls.load(Ordering::SeqCst)
    }

    /// Number of bulk lookups received.
    pub fn mget_calls(&self) -> u64 {
        self.mget_calls.load(Ordering::SeqCst)
    }

    /// Number of key enumerations received.
    pub fn keys_calls(&self) -> u64 {
        self.keys_calls.load(Ordering::SeqCst)
    }

    /// Returns the configured latency.
    pub fn latency(&self) -> Duration {
        self.latency
    }

    /// Returns the number of stored entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if the store is empty.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Waits out the latency, then checks availability.
    async fn round_trip(&self) -> Result<()> {
        if !self.latency.is_zero() {
            tokio::time::sleep(self.latency).await;
        }
        if self.unavailable.load(Ordering::SeqCst) {
            return Err(StoreError::Unavailable("store is offline".into()));
        }
        Ok(())
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl KvStore for MemoryStore {
    #[instrument(skip(self))]
    async fn get(&self, key: &str) -> Result<String> {
        self.get_calls.fetch_add(1, Ordering::SeqCst);
        self.round_trip().await?;

        self.entries
            .get(key)
            .map(|entry| entry.value().clone())
            .ok_or_else(|| StoreError::NotFound(key.to_string()))
    }

    #[instrument(skip(self, keys), fields(count = keys.len()))]
    async fn mget(&self, keys: &[String]) -> Result<Vec<Option<String>>> {
        self.mget_calls.fetch_add(1, Ordering::SeqCst);
        self.round_trip().await?;

        Ok(keys
            .iter()
            .map(|key| self.entries.get(key).map(|entry| entry.value().clone()))
            .collect())
    }

    #[instrument(skip(self))]
    async fn keys(&self) -> Result<Vec<String>> {
        self.keys_calls.fetch_add(1, Ordering::SeqCst);
        self.round_trip().await?;

        let mut keys: Vec<String> = self.entries.iter().map(|entry| entry.key().clone()).collect();
        keys.sort();
        Ok(keys)
    }
}
