//! Secondary Store Module
//!
//! Backing stores the cache index is mirrored into.
//!
//! # Stores
//! - `ExpiringStore`: in-process TTL store with its own sweep
//! - `RedisStore`: networked store reached through a connection manager

mod expiring;
mod redis_impl;

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;

use crate::error::StoreError;

pub use expiring::{ExpiringStore, DEFAULT_CLEANUP_INTERVAL, DEFAULT_EXPIRATION};
pub use redis_impl::RedisStore;

// == Remote Store Trait ==
/// Request/response contract of a networked key-value store.
///
/// Implementations must be safe for concurrent use; the cache never adds
/// locking around the store beyond its own index lock.
#[async_trait]
pub trait RemoteStore: Send + Sync + 'static {
    /// Stores `value` under `key`. A zero `ttl` stores without expiration.
    async fn put(&self, key: &str, value: Vec<u8>, ttl: Duration) -> Result<(), StoreError>;

    /// Deletes `key`, returning how many keys were removed.
    async fn delete(&self, key: &str) -> Result<u64, StoreError>;
}

#[async_trait]
impl<S: RemoteStore + ?Sized> RemoteStore for Arc<S> {
    async fn put(&self, key: &str, value: Vec<u8>, ttl: Duration) -> Result<(), StoreError> {
        (**self).put(key, value, ttl).await
    }

    async fn delete(&self, key: &str) -> Result<u64, StoreError> {
        (**self).delete(key).await
    }
}
