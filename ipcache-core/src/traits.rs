//! Common traits for ipcache.
//!
//! [`KvStore`] is the capability the cache consumes from the remote store and
//! exposes again to its own callers, so the two are interchangeable.

use std::sync::Arc;

use async_trait::async_trait;

use crate::error::Result;

// ═══════════════════════════════════════════════════════════════════════════════
// KEY-VALUE STORE TRAIT
// ═══════════════════════════════════════════════════════════════════════════════

/// Interface to a key-value store mapping string keys to IPv4-address strings.
///
/// Implementations must be safe to call from many tasks at once.
#[async_trait]
pub trait KvStore: Send + Sync {
    /// Gets a single value by key.
    ///
    /// This is the hot path; callers use it very often.
    async fn get(&self, key: &str) -> Result<String>;

    /// Gets the values of several keys.
    ///
    /// The result has the same length and order as `keys`; absent keys map to `None`.
    async fn mget(&self, keys: &[String]) -> Result<Vec<Option<String>>>;

    /// Lists every key in the store.
    async fn keys(&self) -> Result<Vec<String>>;
}

#[async_trait]
impl<T: KvStore + ?Sized> KvStore for Arc<T> {
    async fn get(&self, key: &str) -> Result<String> {
        (**self).get(key).await
    }

    async fn mget(&self, keys: &[String]) -> Result<Vec<Option<String>>> {
        (**self).mget(keys).await
    }

    async fn keys(&self) -> Result<Vec<String>> {
        (**self).keys().await
    }
}
