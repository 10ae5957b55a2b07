//! Shadow Index Module
//!
//! The authoritative key -> entry map both cache variants read from,
//! with double-checked lazy expiration under a single reader/writer lock.

use std::collections::HashMap;

use tokio::sync::{RwLock, RwLockWriteGuard};
use tokio::time::Instant;

use crate::cache::CacheEntry;

pub(crate) type Entries<V> = HashMap<String, CacheEntry<V>>;

// == Lookup Outcome ==
/// Result of reading a key through the index.
pub(crate) enum Lookup<'a, V> {
    /// Entry was live
    Hit(V),
    /// No entry for the key
    Miss,
    /// Entry was expired and has been removed. The exclusive lock is still
    /// held so the caller can finish side effects before a concurrent set
    /// can land.
    Evicted(RwLockWriteGuard<'a, Entries<V>>),
}

// == Index ==
#[derive(Debug)]
pub(crate) struct Index<V> {
    entries: RwLock<Entries<V>>,
}

impl<V: Clone> Index<V> {
    pub fn new() -> Self {
        Self {
            entries: RwLock::new(HashMap::new()),
        }
    }

    /// Acquires the exclusive lock for a mutation.
    pub async fn write(&self) -> RwLockWriteGuard<'_, Entries<V>> {
        self.entries.write().await
    }

    // == Lookup ==
    /// Reads `key`, escalating to the exclusive lock only when the
    /// snapshot taken under the shared lock looks expired.
    ///
    /// Liveness is judged against a single `now` taken before escalation.
    /// The locked re-read guards against deleting a value that a concurrent
    /// set refreshed between the two lock acquisitions.
    pub async fn lookup(&self, key: &str) -> Lookup<'_, V> {
        let snapshot = self.entries.read().await.get(key).cloned();
        let Some(entry) = snapshot else {
            return Lookup::Miss;
        };

        let now = Instant::now();
        if entry.is_live_at(now) {
            return Lookup::Hit(entry.value);
        }

        let mut entries = self.entries.write().await;
        match entries.get(key).map(|current| current.is_live_at(now)) {
            None => Lookup::Miss,
            Some(true) => Lookup::Hit(entries[key].value.clone()),
            Some(false) => {
                entries.remove(key);
                Lookup::Evicted(entries)
            }
        }
    }

    // == Length ==
    /// Number of physically present entries, expired ones included.
    pub async fn len(&self) -> usize {
        self.entries.read().await.len()
    }
}

/// Removes every entry that is no longer live and returns their keys.
pub(crate) fn remove_expired<V>(entries: &mut Entries<V>) -> Vec<String> {
    let now = Instant::now();
    let expired: Vec<String> = entries
        .iter()
        .filter(|(_, entry)| !entry.is_live_at(now))
        .map(|(key, _)| key.clone())
        .collect();

    for key in &expired {
        entries.remove(key);
    }
    expired
}
