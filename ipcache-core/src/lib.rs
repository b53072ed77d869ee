//! # ipcache Core
//!
//! Core building blocks shared by every ipcache crate:
//!
//! - **Traits**: the [`KvStore`] capability (point lookup, bulk lookup, key enumeration)
//! - **Errors**: [`StoreError`], the single failure class a store can report
//! - **Constants**: default timings and environment variable names
//!
//! ## Example
//!
//! ```rust,ignore
//! use ipcache_core::{KvStore, Result};
//!
//! async fn lookup(store: &dyn KvStore) -> Result<String> {
//!     store.get("10.0.0.1").await
//! }
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs, rust_2018_idioms, clippy::all)]

pub mod constants;
pub mod error;
pub mod traits;

// Re-export commonly used items at crate root
pub use constants::*;
pub use error::{Result, StoreError};
pub use traits::KvStore;
