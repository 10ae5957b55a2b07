//! Remote Shadowed Cache
//!
//! Index mirrored into a networked `RemoteStore`. Reads never reach the
//! store: a key the index has not seen is a miss even if the store holds it.

use std::future::Future;
use std::time::Duration;

use async_trait::async_trait;
use tracing::{debug, warn};

use crate::cache::index::{remove_expired, Index, Lookup};
use crate::cache::{Cache, CacheEntry, CacheStats, MirrorPolicy, StatsRecorder, WireValue};
use crate::error::{CacheError, MirrorOp, Result, StoreError};
use crate::store::RemoteStore;
use crate::tasks::Sweep;

// == Remote Cache ==
/// Cache whose secondary store is reached over the network.
///
/// Values are encoded through [`WireValue`] before being mirrored, so the
/// store holds exactly what other readers expect to find.
pub struct RemoteCache<V, S> {
    /// Authoritative key -> entry index
    index: Index<V>,
    /// Handle to the networked store; its lifecycle belongs to the caller
    store: S,
    /// Performance statistics
    stats: StatsRecorder,
    /// How mirror failures are reported
    policy: MirrorPolicy,
    /// Upper bound on each mirrored call
    timeout: Option<Duration>,
}

impl<V, S> RemoteCache<V, S>
where
    V: Clone + WireValue + Send + Sync + 'static,
    S: RemoteStore,
{
    // == Constructor ==
    /// Creates a cold cache in front of `store` with best-effort mirroring
    /// and no timeout.
    pub fn new(store: S) -> Self {
        Self {
            index: Index::new(),
            store,
            stats: StatsRecorder::new(),
            policy: MirrorPolicy::default(),
            timeout: None,
        }
    }

    /// Sets how failed mirror calls are reported.
    pub fn with_mirror_policy(mut self, policy: MirrorPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Bounds every mirrored call; an elapsed call fails with
    /// `StoreError::Timeout`.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// The store this cache mirrors into.
    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn mirror_policy(&self) -> MirrorPolicy {
        self.policy
    }

    /// Number of entries in the index, expired ones included.
    pub async fn len(&self) -> usize {
        self.index.len().await
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }

    // == Mirroring ==
    async fn mirror_put(
        &self,
        key: &str,
        payload: std::result::Result<Vec<u8>, StoreError>,
        ttl: Duration,
    ) -> std::result::Result<(), StoreError> {
        self.call(self.store.put(key, payload?, ttl)).await
    }

    async fn mirror_delete(&self, key: &str) -> std::result::Result<u64, StoreError> {
        self.call(self.store.delete(key)).await
    }

    async fn call<T, F>(&self, call: F) -> std::result::Result<T, StoreError>
    where
        F: Future<Output = std::result::Result<T, StoreError>>,
    {
        match self.timeout {
            Some(limit) => tokio::time::timeout(limit, call)
                .await
                .map_err(|_| StoreError::Timeout(limit))?,
            None => call.await,
        }
    }

    /// Records a failed mirror call and applies the mirror policy.
    fn settle<T>(
        &self,
        op: MirrorOp,
        key: &str,
        outcome: std::result::Result<T, StoreError>,
    ) -> Result<()> {
        let Err(source) = outcome else {
            return Ok(());
        };

        self.stats.record_mirror_failure();
        warn!(%op, key, error = %source, "mirrored call failed");

        match self.policy {
            MirrorPolicy::BestEffort => Ok(()),
            MirrorPolicy::Strict => Err(CacheError::Mirror {
                op,
                key: key.to_string(),
                source,
            }),
        }
    }
}

#[async_trait]
impl<V, S> Cache<V> for RemoteCache<V, S>
where
    V: Clone + WireValue + Send + Sync + 'static,
    S: RemoteStore,
{
    async fn set(&self, key: &str, value: V, ttl: Duration) -> Result<()> {
        let payload = value.to_wire();

        let mut entries = self.index.write().await;
        entries.insert(key.to_string(), CacheEntry::with_ttl(value, ttl));
        // Mirror under the index lock so both copies agree on the last writer.
        let outcome = self.mirror_put(key, payload, ttl).await;
        drop(entries);

        self.settle(MirrorOp::Put, key, outcome)
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
                // Delete remotely before releasing the lock so a concurrent
                // set cannot be wiped out by this eviction.
                let outcome = self.mirror_delete(key).await;
                drop(entries);

                debug!(key, "evicted expired entry");
                self.stats.record_lazy_evictions(1);
                self.stats.record_miss();
                // Reads only ever report NotFound; the policy applies to writes.
                let _ = self.settle(MirrorOp::Delete, key, outcome);
                Err(CacheError::NotFound(key.to_string()))
            }
        }
    }

    async fn delete(&self, key: &str) -> Result<()> {
        let mut entries = self.index.write().await;
        entries.remove(key);
        let outcome = self.mirror_delete(key).await;
        drop(entries);

        self.settle(MirrorOp::Delete, key, outcome)
    }

    async fn stats(&self) -> CacheStats {
        self.stats.snapshot(self.index.len().await)
    }
}

#[async_trait]
impl<V, S> Sweep for RemoteCache<V, S>
where
    V: Clone + WireValue + Send + Sync + 'static,
    S: RemoteStore,
{
    fn name(&self) -> &'static str {
        "remote_cache_index"
    }

    async fn sweep_expired(&self) -> usize {
        let mut entries = self.index.write().await;
        let expired = remove_expired(&mut entries);
        for key in &expired {
            let outcome = self.mirror_delete(key).await;
            let _ = self.settle(MirrorOp::Delete, key, outcome);
        }
        drop(entries);

        self.stats.record_lazy_evictions(expired.len());
        expired.len()
    }
}
