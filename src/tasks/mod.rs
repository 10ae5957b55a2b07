//! Background Tasks Module
//!
//! Contains background tasks that run periodically alongside the caches.
//!
//! # Tasks
//! - Expiry sweep: removes expired entries from a store or cache index

mod cleanup;

pub use cleanup::{spawn_cleanup_task, Sweep};
