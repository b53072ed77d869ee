//! # ipcache Cache
//!
//! Transparent read-through cache for a [`KvStore`](ipcache_core::KvStore).
//!
//! Point lookups are answered from a local map when possible and fetched from
//! the backing store otherwise. A background task throws the whole map away on
//! a fixed period, which bounds how stale any answer can be. Bulk lookups and
//! key listings go straight to the backing store.
//!
//! ## Example
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use ipcache_cache::ReadThroughCache;
//! use ipcache_store::{KvStore, MemoryStore};
//!
//! let store = Arc::new(MemoryStore::remote());
//! store.insert("10.0.0.1", "192.168.1.5")?;
//!
//! let cache = ReadThroughCache::new(store);
//! let ip = cache.get("10.0.0.1").await?; // ~100ms, fetched
//! let ip = cache.get("10.0.0.1").await?; // served locally
//!
//! cache.shutdown().await;
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs, rust_2018_idioms)]

mod cache;
mod config;
mod entries;
mod evictor;

pub use cache::{CacheStats, ReadThroughCache};
pub use config::CacheConfig;
