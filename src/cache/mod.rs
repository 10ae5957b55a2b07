//! Cache Module
//!
//! Unified Set/Get/Delete over an authoritative in-memory index that is
//! shadowed into a secondary store.
//!
//! # Variants
//! - `LocalCache`: mirrors writes into an in-process `ExpiringStore`
//! - `RemoteCache`: mirrors writes and deletes into a `RemoteStore`
//!
//! Reads are answered from the index alone. The secondary store is a
//! best-effort replica; see `MirrorPolicy` for how its failures surface.

mod entry;
mod index;
mod local;
mod remote;
mod stats;
mod wire;


use std::time::Duration;

use async_trait::async_trait;

use crate::error::Result;

// Re-export public types
pub use entry::CacheEntry;
pub use local::LocalCache;
pub use remote::RemoteCache;
pub use stats::{CacheStats, StatsRecorder};
pub use wire::{Json, WireValue};

// == Cache Trait ==
/// Set/Get/Delete contract shared by every cache variant.
#[async_trait]
pub trait Cache<V>: Send + Sync {
    /// Stores `value` under `key`, live for `ttl` from now. A zero `ttl`
    /// produces an entry that is already expired.
    async fn set(&self, key: &str, value: V, ttl: Duration) -> Result<()>;

    /// Returns the live value for `key`, or `CacheError::NotFound`.
    async fn get(&self, key: &str) -> Result<V>;

    /// Removes `key`. Deleting an absent key is not an error.
    async fn delete(&self, key: &str) -> Result<()>;

    /// Snapshot of the cache counters.
    async fn stats(&self) -> CacheStats;
}

// == Mirror Policy ==
/// How failures of mirrored calls to the secondary store are reported.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum MirrorPolicy {
    /// Log and count the failure; the operation still succeeds.
    #[default]
    BestEffort,
    /// Return `CacheError::Mirror` after the local index has been updated.
    Strict,
}

impl std::str::FromStr for MirrorPolicy {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "best_effort" | "best-effort" => Ok(MirrorPolicy::BestEffort),
            "strict" => Ok(MirrorPolicy::Strict),
            other => Err(format!("unknown mirror policy: {other}")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mirror_policy_parse() {
        assert_eq!("strict".parse(), Ok(MirrorPolicy::Strict));
        assert_eq!("Best-Effort".parse(), Ok(MirrorPolicy::BestEffort));
        assert_eq!(" best_effort ".parse(), Ok(MirrorPolicy::BestEffort));
        assert!("sometimes".parse::<MirrorPolicy>().is_err());
    }

    #[test]
    fn test_mirror_policy_default() {
        assert_eq!(MirrorPolicy::default(), MirrorPolicy::BestEffort);
    }
}
