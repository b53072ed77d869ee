//! Shared constants for ipcache.

use std::time::Duration;

// ═══════════════════════════════════════════════════════════════════════════════
// TIMINGS
// ═══════════════════════════════════════════════════════════════════════════════

/// Default period between two full flushes of the cache mapping.
pub const DEFAULT_EVICTION_INTERVAL: Duration = Duration::from_secs(5);

/// Default eviction period in milliseconds, as used by serialized configs.
pub const DEFAULT_EVICTION_INTERVAL_MS: u64 = 5_000;

/// Latency the remote store adds to every call.
pub const REMOTE_LATENCY: Duration = Duration::from_millis(100);

// ═══════════════════════════════════════════════════════════════════════════════
// ENVIRONMENT
// ═══════════════════════════════════════════════════════════════════════════════

/// Overrides the eviction period (milliseconds).
pub const ENV_EVICTION_INTERVAL_MS: &str = "IPCACHE_EVICTION_INTERVAL_MS";

/// Overrides the simulated remote latency (milliseconds).
pub const ENV_LATENCY_MS: &str = "IPCACHE_LATENCY_MS";

/// Path to a JSON object used to seed the in-memory store.
pub const ENV_DATA_FILE: &str = "IPCACHE_DATA";
