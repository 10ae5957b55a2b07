//! Cache Statistics Module
//!
//! Tracks hits, misses, lazy evictions and failed mirror calls.

use std::sync::atomic::{AtomicU64, Ordering};

use serde::Serialize;

// == Cache Stats ==
/// Point-in-time snapshot of cache counters.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct CacheStats {
    /// Number of successful cache retrievals
    pub hits: u64,
    /// Number of failed cache retrievals (key not found or expired)
    pub misses: u64,
    /// Number of expired entries removed from the index
    pub lazy_evictions: u64,
    /// Number of mirrored puts/deletes the secondary store failed
    pub mirror_failures: u64,
    /// Current number of entries in the index, expired ones included
    pub total_entries: usize,
}

impl CacheStats {
    // == Hit Rate ==
    /// Calculates the cache hit rate.
    ///
    /// Returns hits / (hits + misses), or 0.0 if no requests have been made.
    pub fn hit_rate(&self) -> f64 {
        let total = self.hits + self.misses;
        if total == 0 {
            0.0
        } else {
            self.hits as f64 / total as f64
        }
    }
}

// == Stats Recorder ==
/// Lock-free counters shared by every operation on one cache.
///
/// Reads on the hot path hold only the shared index lock, so counters
/// cannot live behind the index lock.
#[derive(Debug, Default)]
pub struct StatsRecorder {
    hits: AtomicU64,
    misses: AtomicU64,
    lazy_evictions: AtomicU64,
    mirror_failures: AtomicU64,
}

impl StatsRecorder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_hit(&self) {
        self.hits.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_miss(&self) {
        self.misses.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_lazy_evictions(&self, count: usize) {
        self.lazy_evictions.fetch_add(count as u64, Ordering::Relaxed);
    }

    pub fn record_mirror_failure(&self) {
        self.mirror_failures.fetch_add(1, Ordering::Relaxed);
    }

    /// Builds a snapshot with the given index size.
    pub fn snapshot(&self, total_entries: usize) -> CacheStats {
        CacheStats {
            hits: self.hits.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
            lazy_evictions: self.lazy_evictions.load(Ordering::Relaxed),
            mirror_failures: self.mirror_failures.load(Ordering::Relaxed),
            total_entries,
        }
    }
}

// == Unit Tests ==
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stats_new() {
        let stats = StatsRecorder::new().snapshot(0);
        assert_eq!(stats, CacheStats::default());
    }

    #[test]
    fn test_hit_rate_no_requests() {
        let stats = CacheStats::default();
        assert_eq!(stats.hit_rate(), 0.0);
    }

    #[test]
    fn test_hit_rate_mixed() {
        let recorder = StatsRecorder::new();
        recorder.record_hit();
        recorder.record_hit();
        recorder.record_hit();
        recorder.record_miss();
        assert_eq!(recorder.snapshot(0).hit_rate(), 0.75);
    }

    #[test]
    fn test_evictions_and_mirror_failures() {
        let recorder = StatsRecorder::new();
        recorder.record_lazy_evictions(3);
        recorder.record_lazy_evictions(0);
        recorder.record_mirror_failure();

        let stats = recorder.snapshot(42);
        assert_eq!(stats.lazy_evictions, 3);
        assert_eq!(stats.mirror_failures, 1);
        assert_eq!(stats.total_entries, 42);
    }
}
