//! Process-local keyed store with per-key write serialisation.
//!
//! Reads go straight to the map. Writers take [`ResourceStore::lock`] for the
//! key first, so a check-then-generate-then-write sequence on one key cannot
//! interleave with another writer on the same key, while different keys never
//! wait on each other. Nothing is persisted; contents live as long as the
//! process.

use dashmap::DashMap;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::{Mutex, OwnedMutexGuard};

struct Inner<V> {
    entries: DashMap<String, V>,
    locks: DashMap<String, Arc<Mutex<()>>>,
}

pub struct ResourceStore<V> {
    inner: Arc<Inner<V>>,
}

impl<V> Clone for ResourceStore<V> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<V> Default for ResourceStore<V> {
    fn default() -> Self {
        Self {
            inner: Arc::new(Inner {
                entries: DashMap::new(),
                locks: DashMap::new(),
            }),
        }
    }
}

impl<V: Clone> ResourceStore<V> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, key: &str) -> Option<V> {
        self.inner.entries.get(key).map(|entry| entry.value().clone())
    }

    pub fn contains(&self, key: &str) -> bool {
        self.inner.entries.contains_key(key)
    }

    /// Copy of every entry at the time of the call.
    pub fn snapshot(&self) -> HashMap<String, V> {
        self.inner
            .entries
            .iter()
            .map(|entry| (entry.key().clone(), entry.value().clone()))
            .collect()
    }

    pub fn len(&self) -> usize {
        self.inner.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.entries.is_empty()
    }

    /// Wait for exclusive write access to `key`.
    ///
    /// Dropping the returned future before it resolves leaves no lock entry
    /// behind.
    pub async fn lock(&self, key: &str) -> KeyGuard<V> {
        let slot = LockSlot {
            mutex: self.inner.locks.entry(key.to_string()).or_default().clone(),
            store: self.clone(),
            key: key.to_string(),
        };
        let guard = Arc::clone(&slot.mutex).lock_owned().await;

        KeyGuard {
            _guard: guard,
            slot,
        }
    }

    /// Keys with a lock entry that is held or waited on.
    #[cfg(test)]
    fn lock_entries(&self) -> usize {
        self.inner.locks.len()
    }
}

/// A reference to one key's lock entry, held while waiting and while locked.
struct LockSlot<V> {
    store: ResourceStore<V>,
    key: String,
    mutex: Arc<Mutex<()>>,
}

impl<V> Drop for LockSlot<V> {
    fn drop(&mut self) {
        // The map and this slot are the last references: nobody holds or awaits it.
        self.store.inner.locks.remove_if(&self.key, |_, mutex| {
            Arc::ptr_eq(mutex, &self.mutex) && Arc::strong_count(mutex) == 2
        });
    }
}

/// Exclusive write access to one key. Released on drop.
pub struct KeyGuard<V> {
    // Declared first so the mutex is released before the slot cleans up.
    _guard: OwnedMutexGuard<()>,
    slot: LockSlot<V>,
}

impl<V: Clone> KeyGuard<V> {
    pub fn get(&self) -> Option<V> {
        self.slot.store.get(&self.slot.key)
    }

    pub fn exists(&self) -> bool {
        self.slot.store.contains(&self.slot.key)
    }

    /// Store `value`, returning the previous one.
    pub fn insert(&self, value: V) -> Option<V> {
        self.slot
            .store
            .inner
            .entries
            .insert(self.slot.key.clone(), value)
    }

    pub fn remove(&self) -> Option<V> {
        self.slot
            .store
            .inner
            .entries
            .remove(&self.slot.key)
            .map(|(_, value)| value)
    }
}
