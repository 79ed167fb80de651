//! Per-key async mutexes whose map entries are dropped once unused.

use std::hash::Hash;
use std::sync::Arc;

use dashmap::DashMap;
use tokio::sync::{Mutex, OwnedMutexGuard};

/// A set of async mutexes keyed by `K`.
///
/// An entry exists only while some task holds or waits for its lock, so
/// the map stays bounded by the number of keys in use.
pub(crate) struct KeyedLocks<K: Eq + Hash + Clone> {
    map: DashMap<K, Arc<Mutex<()>>>,
}

impl<K: Eq + Hash + Clone> Default for KeyedLocks<K> {
    fn default() -> Self {
        Self {
            map: DashMap::new(),
        }
    }
}

impl<K: Eq + Hash + Clone> KeyedLocks<K> {
    /// Wait for the lock on `key`.
    pub(crate) async fn lock(&self, key: &K) -> KeyedGuard<'_, K> {
        let mutex = self.map.entry(key.clone()).or_default().clone();
        let guard = mutex.lock_owned().await;
        KeyedGuard {
            locks: self,
            key: key.clone(),
            guard: Some(guard),
        }
    }

    /// Number of keys currently held or awaited.
    #[cfg(test)]
    pub(crate) fn len(&self) -> usize {
        self.map.len()
    }
}

/// Holds one key's lock. Dropping it releases the lock and removes the
/// map entry when no other task references it.
pub(crate) struct KeyedGuard<'a, K: Eq + Hash + Clone> {
    locks: &'a KeyedLocks<K>,
    key: K,
    guard: Option<OwnedMutexGuard<()>>,
}

impl<K: Eq + Hash + Clone> Drop for KeyedGuard<'_, K> {
    fn drop(&mut self) {
        // Release first so the guard's own Arc no longer counts.
        drop(self.guard.take());
        // The shard lock held by remove_if excludes a concurrent `lock` clone.
        self.locks
            .map
            .remove_if(&self.key, |_, mutex| Arc::strong_count(mutex) == 1);
    }
}
