//! Runtime settings: backing store contents, latency, eviction period.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};

use ipcache_cache::CacheConfig;
use ipcache_store::MemoryStore;

/// Entries used when no data file is given.
const SAMPLE_ENTRIES: &[(&str, &str)] = &[
    ("10.0.0.1", "192.168.1.5"),
    ("10.0.0.2", "192.168.1.6"),
    ("10.0.0.3", "172.16.4.20"),
    ("alice", "203.0.113.7"),
    ("bob", "198.51.100.23"),
];

#[derive(Clone, Debug)]
pub struct Settings {
    pub data: Option<PathBuf>,
    pub latency: Duration,
    pub eviction_interval: Duration,
}

impl Settings {
    /// Builds the simulated remote store, seeded from the data file or the sample set.
    pub fn build_store(&self) -> Result<Arc<MemoryStore>> {
        let store = MemoryStore::with_latency(self.latency);

        match &self.data {
            Some(path) => {
                let count = store
                    .load_json(path)
                    .with_context(|| format!("Failed to load data file {}", path.display()))?;
                tracing::info!(path = %path.display(), count, "Seeded store from file");
            }
            None => {
                for (key, value) in SAMPLE_ENTRIES {
                    store.insert(*key, *value).context("Invalid sample entry")?;
                }
            }
        }

        Ok(Arc::new(store))
    }

    pub fn cache_config(&self) -> CacheConfig {
        CacheConfig::default().with_eviction_interval(self.eviction_interval)
    }
}
