//! Key → value map guarded by a single reader/writer lock.

use std::collections::HashMap;

use parking_lot::RwLock;

/// One eviction epoch: the map and the number of flushes that preceded it.
#[derive(Debug, Default)]
struct Generation {
    epoch: u64,
    map: HashMap<String, String>,
}

/// Cached entries for the current eviction epoch.
///
/// Entries are only ever added one at a time or dropped all at once.
/// The lock is never held across an `.await`.
#[derive(Debug, Default)]
pub(crate) struct EntryMap {
    current: RwLock<Generation>,
}

impl EntryMap {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Looks up `key` under the read lock.
    ///
    /// Returns the value (if cached) together with the epoch it was read in.
    pub(crate) fn get(&self, key: &str) -> (Option<String>, u64) {
        let current = self.current.read();
        (current.map.get(key).cloned(), current.epoch)
    }

    /// Inserts a fetched value, unless the map was flushed since `epoch`.
    ///
    /// A value fetched before a flush must not leak into the next epoch.
    /// Returns true if the entry was stored.
    pub(crate) fn insert(&self, key: &str, value: String, epoch: u64) -> bool {
        let mut current = self.current.write();
        if current.epoch != epoch {
            return false;
        }
        current.map.insert(key.to_string(), value);
        true
    }

    /// Replaces the whole map with an empty one and starts a new epoch.
    ///
    /// Returns the number of entries dropped.
    pub(crate) fn flush(&self) -> usize {
        let mut current = self.current.write();
        let next = Generation {
            epoch: current.epoch + 1,
            map: HashMap::new(),
        };
        let previous = std::mem::replace(&mut *current, next);
        drop(current);

        previous.map.len()
    }

    pub(crate) fn contains_key(&self, key: &str) -> bool {
        self.current.read().map.contains_key(key)
    }

    pub(crate) fn len(&self) -> usize {
        self.current.read().map.len()
    }

    /// Number of flushes so far.
    pub(crate) fn epoch(&self) -> u64 {
        self.current.read().epoch
    }
}
