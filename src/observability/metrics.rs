//! Metrics registry for curio
//!
//! - Counters only, monotonic
//! - Reset only when the registry is created
//! - Thread-safe, lock-free

use std::sync::atomic::{AtomicU64, Ordering};

use serde::Serialize;

/// Engine operational counters
///
/// Relaxed ordering: counters are reported, never used for control flow.
#[derive(Debug, Default)]
pub struct MetricsRegistry {
    events_appended: AtomicU64,
    events_rejected: AtomicU64,
    snapshots_built: AtomicU64,
    snapshot_cache_hits: AtomicU64,
    achievements_unlocked: AtomicU64,
}

impl MetricsRegistry {
    /// Create a new metrics registry with all counters at zero
    pub fn new() -> Self {
        Self::default()
    }

    pub fn increment_events_appended(&self) {
        self.events_appended.fetch_add(1, Ordering::Relaxed);
    }

    pub fn increment_events_rejected(&self) {
        self.events_rejected.fetch_add(1, Ordering::Relaxed);
    }

    pub fn increment_snapshots_built(&self) {
        self.snapshots_built.fetch_add(1, Ordering::Relaxed);
    }

    pub fn increment_snapshot_cache_hits(&self) {
        self.snapshot_cache_hits.fetch_add(1, Ordering::Relaxed);
    }

    /// Adds newly observed unlocks
    pub fn add_achievements_unlocked(&self, count: u64) {
        self.achievements_unlocked.fetch_add(count, Ordering::Relaxed);
    }

    /// Get all metrics as a snapshot
    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            events_appended: self.events_appended.load(Ordering::Relaxed),
            events_rejected: self.events_rejected.load(Ordering::Relaxed),
            snapshots_built: self.snapshots_built.load(Ordering::Relaxed),
            snapshot_cache_hits: self.snapshot_cache_hits.load(Ordering::Relaxed),
            achievements_unlocked: self.achievements_unlocked.load(Ordering::Relaxed),
        }
    }
}

/// A point-in-time copy of all counters
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct MetricsSnapshot {
    pub events_appended: u64,
    pub events_rejected: u64,
    pub snapshots_built: u64,
    pub snapshot_cache_hits: u64,
    pub achievements_unlocked: u64,
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::thread;

    #[test]
    fn test_new_registry_zeroed() {
        assert_eq!(MetricsRegistry::new().snapshot(), MetricsSnapshot::default());
    }

    #[test]
    fn test_counters() {
        let metrics = MetricsRegistry::new();
        metrics.increment_events_appended();
        metrics.increment_events_appended();
        metrics.increment_events_rejected();
        metrics.add_achievements_unlocked(3);

        let snap = metrics.snapshot();
        assert_eq!(snap.events_appended, 2);
        assert_eq!(snap.events_rejected, 1);
        assert_eq!(snap.achievements_unlocked, 3);
    }

    #[test]
    fn test_concurrent_increments() {
        let metrics = Arc::new(MetricsRegistry::new());
        let handles: Vec<_> = (0..4)
            .map(|_| {
                let m = Arc::clone(&metrics);
                thread::spawn(move || {
                    for _ in 0..250 {
                        m.increment_snapshots_built();
                    }
                })
            })
            .collect();
        for h in handles {
            h.join().unwrap();
        }
        assert_eq!(metrics.snapshot().snapshots_built, 1000);
    }
}
