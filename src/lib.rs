//! Shadow Cache - unified TTL cache over local and remote stores
//!
//! Every cache keeps an authoritative in-memory index of keys with
//! deadlines and shadows its writes into a secondary store: an in-process
//! `ExpiringStore` or a networked `RemoteStore` such as Redis. Reads are
//! answered from the index alone and expired entries are removed lazily.

pub mod api;
pub mod cache;
pub mod config;
pub mod error;
pub mod models;
pub mod store;
pub mod tasks;

pub use api::AppState;
pub use cache::{Cache, Json, LocalCache, MirrorPolicy, RemoteCache, WireValue};
pub use config::{Backend, Config};
pub use error::{CacheError, StoreError};
pub use store::{ExpiringStore, RedisStore, RemoteStore};
pub use tasks::{spawn_cleanup_task, Sweep};
