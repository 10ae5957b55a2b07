//! Local Shadowed Cache
//!
//! Index mirrored into an in-process `ExpiringStore`. The store expires its
//! copies on its own schedule, so deletes and lazy evictions never touch it.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tracing::debug;

use crate::cache::index::{remove_expired, Index, Lookup};
use crate::cache::{Cache, CacheEntry, CacheStats, StatsRecorder};
use crate::error::{CacheError, Result};
use crate::store::ExpiringStore;
use crate::tasks::Sweep;

// == Local Cache ==
/// Cache whose secondary store lives in the same process.
#[derive(Debug)]
pub struct LocalCache<V> {
    /// Authoritative key -> entry index
    index: Index<V>,
    /// Secondary store, shared with its sweeper
    store: Arc<ExpiringStore<V>>,
    /// Performance statistics
    stats: StatsRecorder,
}

impl<V> LocalCache<V>
where
    V: Clone + Send + Sync + 'static,
{
    // == Constructors ==
    /// Creates a cache backed by a fresh store with the default expiration.
    ///
    /// Nothing sweeps that store until `spawn_cleanup_task` is started on
    /// `self.store()`.
    pub fn new() -> Self {
        Self::with_store(Arc::new(ExpiringStore::default()))
    }

    /// Creates a cache mirroring into an existing store.
    pub fn with_store(store: Arc<ExpiringStore<V>>) -> Self {
        Self {
            index: Index::new(),
            store,
            stats: StatsRecorder::new(),
        }
    }

    /// The secondary store this cache mirrors into.
    pub fn store(&self) -> &Arc<ExpiringStore<V>> {
        &self.store
    }

    /// Number of entries in the index, expired ones included.
    pub async fn len(&self) -> usize {
        self.index.len().await
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}

impl<V> Default for LocalCache<V>
where
    V: Clone + Send + Sync + 'static,
{
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl<V> Cache<V> for LocalCache<V>
where
    V: Clone + Send + Sync + 'static,
{
    async fn set(&self, key: &str, value: V, ttl: Duration) -> Result<()> {
        let mut entries = self.index.write().await;
        entries.insert(key.to_string(), CacheEntry::with_ttl(value.clone(), ttl));

        // Mirror under the index lock so both copies agree on the last writer.
        self.store.put(key, value, ttl).await;
        Ok(())
    }

    async fn get(&self, key: &str) -> Result<V> {
        match self.index.lookup(key).await {
            Lookup::Hit(value) => {
                self.stats.record_hit();
                Ok(value)
            }
            Lookup::Miss => {
                self.stats.record_miss();
                Err(CacheError::NotFound(key.to_string()))
            }
            Lookup::Evicted(entries) => {
                drop(entries);
                debug!(key, "evicted expired entry");
                self.stats.record_lazy_evictions(1);
                self.stats.record_miss();
                Err(CacheError::NotFound(key.to_string()))
            }
        }
    }

    async fn delete(&self, key: &str) -> Result<()> {
        self.index.write().await.remove(key);
        Ok(())
    }

    async fn stats(&self) -> CacheStats {
        self.stats.snapshot(self.index.len().await)
    }
}

#[async_trait]
impl<V> Sweep for LocalCache<V>
where
    V: Clone + Send + Sync + 'static,
{
    fn name(&self) -> &'static str {
        "local_cache_index"
    }

    async fn sweep_expired(&self) -> usize {
        let removed = remove_expired(&mut *self.index.write().await).len();
        self.stats.record_lazy_evictions(removed);
        removed
    }
}
