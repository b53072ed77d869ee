//! Cache configuration.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use ipcache_core::constants::DEFAULT_EVICTION_INTERVAL_MS;
use ipcache_core::error::{Result, StoreError};

/// Cache configuration.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CacheConfig {
    /// Period between two full flushes, in milliseconds
    pub eviction_interval_ms: u64,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            eviction_interval_ms: DEFAULT_EVICTION_INTERVAL_MS,
        }
    }
}

impl CacheConfig {
    /// Sets the eviction period.
    pub fn with_eviction_interval(mut self, interval: Duration) -> Self {
        self.eviction_interval_ms = u64::try_from(interval.as_millis()).unwrap_or(u64::MAX);
        self
    }

    /// Returns the eviction period.
    pub fn eviction_interval(&self) -> Duration {
        Duration::from_millis(self.eviction_interval_ms)
    }

    /// Checks that the configuration can drive an eviction task.
    pub fn validate(&self) -> Result<()> {
        if self.eviction_interval_ms == 0 {
            return Err(StoreError::Config(
                "eviction interval must be at least 1ms".into(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_five_seconds() {
        let config = CacheConfig::default();
        assert_eq!(config.eviction_interval(), Duration::from_secs(5));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_builder() {
        let config = CacheConfig::default().with_eviction_interval(Duration::from_millis(250));
        assert_eq!(config.eviction_interval_ms, 250);
    }

    #[test]
    fn test_zero_interval_rejected() {
        let config = CacheConfig::default().with_eviction_interval(Duration::ZERO);
        assert!(matches!(config.validate(), Err(StoreError::Config(_))));
    }

    #[test]
    fn test_missing_fields_use_defaults() {
        let config: CacheConfig = serde_json::from_str("{}").unwrap();
        assert_eq!(config, CacheConfig::default());

        let config: CacheConfig = serde_json::from_str(r#"{"eviction_interval_ms": 100}"#).unwrap();
        assert_eq!(config.eviction_interval(), Duration::from_millis(100));
    }
}
