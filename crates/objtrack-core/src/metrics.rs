//! Atomic counters for tracker observability.
//!
//! All counters use relaxed ordering — they are advisory/diagnostic,
//! not synchronization primitives.

use std::sync::atomic::{AtomicU64, Ordering};

/// Per-tracker operation counters.
#[derive(Debug)]
pub struct TrackerMetrics {
    /// Total handle validations performed.
    pub validations: AtomicU64,
    /// Validations that reported a not-found or wrong-parent violation.
    pub violations: AtomicU64,
    /// Records created.
    pub creates: AtomicU64,
    /// Records removed through the explicit destroy path.
    pub destroys: AtomicU64,
    /// Records removed by cascade or teardown passes.
    pub cascade_destroys: AtomicU64,
    /// Leak diagnostics emitted at scope teardown.
    pub leaks: AtomicU64,
}

impl TrackerMetrics {
    /// Create a new zeroed metrics instance.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            validations: AtomicU64::new(0),
            violations: AtomicU64::new(0),
            creates: AtomicU64::new(0),
            destroys: AtomicU64::new(0),
            cascade_destroys: AtomicU64::new(0),
            leaks: AtomicU64::new(0),
        }
    }

    /// Increment a counter by 1.
    pub fn inc(counter: &AtomicU64) {
        counter.fetch_add(1, Ordering::Relaxed);
    }

    /// Read a counter value.
    #[must_use]
    pub fn get(counter: &AtomicU64) -> u64 {
        counter.load(Ordering::Relaxed)
    }

    /// Snapshot all counters into a displayable summary.
    #[must_use]
    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            validations: Self::get(&self.validations),
            violations: Self::get(&self.violations),
            creates: Self::get(&self.creates),
            destroys: Self::get(&self.destroys),
            cascade_destroys: Self::get(&self.cascade_destroys),
            leaks: Self::get(&self.leaks),
        }
    }
}

impl Default for TrackerMetrics {
    fn default() -> Self {
        Self::new()
    }
}

/// Point-in-time snapshot of all tracker counters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MetricsSnapshot {
    pub validations: u64,
    pub violations: u64,
    pub creates: u64,
    pub destroys: u64,
    pub cascade_destroys: u64,
    pub leaks: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn snapshot_reflects_increments() {
        let metrics = TrackerMetrics::new();
        TrackerMetrics::inc(&metrics.validations);
        TrackerMetrics::inc(&metrics.validations);
        TrackerMetrics::inc(&metrics.creates);

        let snap = metrics.snapshot();
        assert_eq!(snap.validations, 2);
        assert_eq!(snap.creates, 1);
        assert_eq!(snap.destroys, 0);
    }
}
