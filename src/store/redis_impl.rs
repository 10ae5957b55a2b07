//! Redis store implementation.
//!
//! The connection manager reconnects on its own and is cheap to clone, so
//! every call works on a clone of the shared handle.

use std::time::Duration;

use async_trait::async_trait;
use redis::aio::ConnectionManager;
use redis::AsyncCommands;

use super::RemoteStore;
use crate::error::StoreError;

/// Redis-backed remote store.
///
/// Created and owned by the caller; caches only hold clones of it.
#[derive(Clone)]
pub struct RedisStore {
    conn: ConnectionManager,
}

impl RedisStore {
    /// Opens a managed connection.
    ///
    /// # Arguments
    ///
    /// * `url` - Redis connection URL (e.g., "redis://localhost:6379")
    ///
    /// # Errors
    ///
    /// Returns `StoreError::ConnectionFailed` if the server cannot be reached.
    pub async fn connect(url: &str) -> Result<Self, StoreError> {
        let client = redis::Client::open(url)?;
        let conn = ConnectionManager::new(client).await?;
        Ok(Self { conn })
    }

    /// Reads the raw bytes stored under `key`.
    ///
    /// Never used on the cache read path; exposed for diagnostics.
    pub async fn get(&self, key: &str) -> Result<Option<Vec<u8>>, StoreError> {
        let mut conn = self.conn.clone();
        let value: Option<Vec<u8>> = conn.get(key).await?;
        Ok(value)
    }
}

#[async_trait]
impl RemoteStore for RedisStore {
    async fn put(&self, key: &str, value: Vec<u8>, ttl: Duration) -> Result<(), StoreError> {
        let mut conn = self.conn.clone();

        if ttl.is_zero() {
            conn.set::<_, _, ()>(key, value).await?;
        } else {
            // PSETEX rejects 0, so sub-millisecond TTLs round up.
            let millis = u64::try_from(ttl.as_millis()).unwrap_or(u64::MAX).max(1);
            conn.pset_ex::<_, _, ()>(key, value, millis).await?;
        }
        Ok(())
    }

    async fn delete(&self, key: &str) -> Result<u64, StoreError> {
        let mut conn = self.conn.clone();
        let removed: u64 = conn.del(key).await?;
        Ok(removed)
    }
}
