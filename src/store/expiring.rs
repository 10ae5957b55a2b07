//! Expiring Store Module
//!
//! In-process TTL store used as the secondary of the local cache. Expired
//! entries are hidden on read and physically removed by the sweeper.

use std::collections::HashMap;
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::RwLock;
use tracing::trace;

use crate::cache::CacheEntry;
use crate::tasks::Sweep;

/// Default expiration applied when `put` receives a zero TTL.
pub const DEFAULT_EXPIRATION: Duration = Duration::from_secs(5 * 60);

/// Default interval between sweeps of an expiring store.
pub const DEFAULT_CLEANUP_INTERVAL: Duration = Duration::from_secs(10 * 60);

// == Expiring Store ==
/// Key-value storage with per-entry expiration and a store-wide default.
#[derive(Debug)]
pub struct ExpiringStore<V> {
    /// Key-value storage
    entries: RwLock<HashMap<String, CacheEntry<V>>>,
    /// Expiration used for zero-TTL puts
    default_ttl: Duration,
}

impl<V> ExpiringStore<V>
where
    V: Clone + Send + Sync + 'static,
{
    // == Constructor ==
    /// Creates a new store.
    ///
    /// # Arguments
    /// * `default_ttl` - Expiration used when a put carries a zero TTL
    pub fn new(default_ttl: Duration) -> Self {
        Self {
            entries: RwLock::new(HashMap::new()),
            default_ttl,
        }
    }

    // == Put ==
    /// Stores a key-value pair, overwriting any previous value and TTL.
    ///
    /// A zero `ttl` means "use the store default", not "expire now".
    pub async fn put(&self, key: &str, value: V, ttl: Duration) {
        let effective_ttl = if ttl.is_zero() { self.default_ttl } else { ttl };
        let entry = CacheEntry::with_ttl(value, effective_ttl);

        self.entries.write().await.insert(key.to_string(), entry);
        trace!(key, ttl = ?effective_ttl, "expiring store put");
    }

    // == Get ==
    /// Retrieves a live value. Expired entries read as absent but stay in
    /// place until the next sweep.
    pub async fn get(&self, key: &str) -> Option<V> {
        self.entries
            .read()
            .await
            .get(key)
            .filter(|entry| entry.is_live())
            .map(|entry| entry.value.clone())
    }

    // == Cleanup Expired ==
    /// Removes all expired entries from the store.
    ///
    /// Returns the number of entries removed.
    pub async fn cleanup_expired(&self) -> usize {
        let mut entries = self.entries.write().await;
        let before = entries.len();
        entries.retain(|_, entry| entry.is_live());
        before - entries.len()
    }

    // == Length ==
    /// Returns the number of physically present entries.
    pub async fn len(&self) -> usize {
        self.entries.read().await.len()
    }

    // == Is Empty ==
    pub async fn is_empty(&self) -> bool {
        self.entries.read().await.is_empty()
    }

    /// Expiration used for zero-TTL puts.
    pub fn default_ttl(&self) -> Duration {
        self.default_ttl
    }
}

impl<V> Default for ExpiringStore<V>
where
    V: Clone + Send + Sync + 'static,
{
    fn default() -> Self {
        Self::new(DEFAULT_EXPIRATION)
    }
}

#[async_trait]
impl<V> Sweep for ExpiringStore<V>
where
    V: Clone + Send + Sync + 'static,
{
    fn name(&self) -> &'static str {
        "expiring_store"
    }

    async fn sweep_expired(&self) -> usize {
        self.cleanup_expired().await
    }
}

// == Unit Tests ==
#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_store_new() {
        let store: ExpiringStore<String> = ExpiringStore::default();
        assert_eq!(store.len().await, 0);
        assert!(store.is_empty().await);
        assert_eq!(store.default_ttl(), DEFAULT_EXPIRATION);
    }

    #[tokio::test]
    async fn test_store_put_and_get() {
        let store = ExpiringStore::new(Duration::from_secs(300));

        store.put("key1", "value1".to_string(), Duration::from_secs(60)).await;

        assert_eq!(store.get("key1").await.as_deref(), Some("value1"));
        assert_eq!(store.len().await, 1);
    }

    #[tokio::test]
    async fn test_store_get_nonexistent() {
        let store: ExpiringStore<String> = ExpiringStore::default();
        assert!(store.get("nonexistent").await.is_none());
    }

    #[tokio::test]
    async fn test_store_overwrite() {
        let store = ExpiringStore::default();

        store.put("key1", 1, Duration::from_secs(60)).await;
        store.put("key1", 2, Duration::from_secs(60)).await;

        assert_eq!(store.get("key1").await, Some(2));
        assert_eq!(store.len().await, 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_store_ttl_expiration_is_lazy() {
        let store = ExpiringStore::default();
        store.put("key1", "v", Duration::from_secs(1)).await;
        assert!(store.get("key1").await.is_some());

        tokio::time::advance(Duration::from_millis(1100)).await;

        assert!(store.get("key1").await.is_none());
        assert_eq!(store.len().await, 1, "expired entry stays until swept");
    }

    #[tokio::test(start_paused = true)]
    async fn test_zero_ttl_uses_default_expiration() {
        let store = ExpiringStore::new(Duration::from_secs(10));
        store.put("key1", "v", Duration::ZERO).await;

        tokio::time::advance(Duration::from_secs(9)).await;
        assert_eq!(store.get("key1").await, Some("v"));

        tokio::time::advance(Duration::from_secs(1)).await;
        assert!(store.get("key1").await.is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn test_store_cleanup_expired() {
        let store = ExpiringStore::default();

        store.put("key1", "value1", Duration::from_secs(1)).await;
        store.put("key2", "value2", Duration::from_secs(10)).await;

        tokio::time::advance(Duration::from_millis(1100)).await;

        let removed = store.sweep_expired().await;
        assert_eq!(removed, 1);
        assert_eq!(store.len().await, 1);
        assert!(store.get("key2").await.is_some());
    }
}
