//! Cache Entry Module
//!
//! Defines the structure for individual cache entries with deadline support.

use std::time::Duration;

use tokio::time::Instant;

// == Cache Entry ==
/// A stored value together with the instant it stops being live.
#[derive(Debug, Clone)]
pub struct CacheEntry<V> {
    /// The stored value
    pub value: V,
    /// Expiration instant, None = never expires
    pub deadline: Option<Instant>,
}

impl<V> CacheEntry<V> {
    // == Constructors ==
    /// Creates an entry expiring `ttl` from now. A zero TTL yields an entry
    /// that is already expired.
    pub fn with_ttl(value: V, ttl: Duration) -> Self {
        Self {
            value,
            deadline: Some(deadline_after(ttl)),
        }
    }

    /// Creates an entry that never expires.
    pub fn eternal(value: V) -> Self {
        Self {
            value,
            deadline: None,
        }
    }

    // == Liveness ==
    /// Checks whether the entry is live at `now`.
    ///
    /// Boundary condition: an entry whose deadline equals `now` is expired.
    pub fn is_live_at(&self, now: Instant) -> bool {
        match self.deadline {
            Some(deadline) => now < deadline,
            None => true,
        }
    }

    /// Checks whether the entry is live right now.
    pub fn is_live(&self) -> bool {
        self.is_live_at(Instant::now())
    }
}

/// Instant `ttl` from now, saturating far in the future on overflow.
fn deadline_after(ttl: Duration) -> Instant {
    let now = Instant::now();
    now.checked_add(ttl)
        .unwrap_or_else(|| now + Duration::from_secs(60 * 60 * 24 * 365 * 30))
}

// == Unit Tests ==
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_entry_eternal_is_always_live() {
        let entry = CacheEntry::eternal("v");

        assert!(entry.deadline.is_none());
        assert!(entry.is_live());
    }

    #[test]
    fn test_entry_with_ttl_is_live() {
        let entry = CacheEntry::with_ttl("v", Duration::from_secs(60));

        assert!(entry.deadline.is_some());
        assert!(entry.is_live());
    }

    #[test]
    fn test_zero_ttl_expires_immediately() {
        let entry = CacheEntry::with_ttl("v", Duration::ZERO);
        assert!(!entry.is_live(), "zero TTL must not mean 'never expires'");
    }

    #[test]
    fn test_expiration_boundary_condition() {
        let now = Instant::now();
        let entry = CacheEntry {
            value: "v",
            deadline: Some(now),
        };

        assert!(!entry.is_live_at(now), "Entry should be expired at boundary");
        assert!(entry.is_live_at(now - Duration::from_millis(1)));
    }

    #[test]
    fn test_huge_ttl_does_not_overflow() {
        let entry = CacheEntry::with_ttl("v", Duration::MAX);
        assert!(entry.is_live());
    }

    #[tokio::test(start_paused = true)]
    async fn test_entry_expiration() {
        let entry = CacheEntry::with_ttl("v", Duration::from_secs(1));
        assert!(entry.is_live());

        tokio::time::advance(Duration::from_millis(999)).await;
        assert!(entry.is_live());

        tokio::time::advance(Duration::from_millis(1)).await;
        assert!(!entry.is_live());
    }
}
