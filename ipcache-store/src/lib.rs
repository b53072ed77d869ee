//! # ipcache Store
//!
//! In-process key-value store mapping keys to IPv4 addresses.
//!
//! [`MemoryStore`] stands in for the remote database: it can add a fixed
//! latency to every call, fail on demand, and count how often each
//! operation was invoked.
//!
//! ## Example
//!
//! ```rust,ignore
//! use ipcache_store::{MemoryStore, KvStore};
//!
//! let store = MemoryStore::remote();
//! store.insert("10.0.0.1", "192.168.1.5")?;
//!
//! let ip = store.get("10.0.0.1").await?; // ~100ms
//! assert_eq!(store.get_calls(), 1);
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs, rust_2018_idioms)]

mod memory;

pub use memory::MemoryStore;

// Re-export the trait from core
pub use ipcache_core::traits::KvStore;
