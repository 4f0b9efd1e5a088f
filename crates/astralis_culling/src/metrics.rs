//! # Culling Metrics
//!
//! Rolling counters for the operator "cache" view. Gating queries run on host
//! threads (render included), so every counter is an atomic.

use std::sync::atomic::{AtomicU64, Ordering};

/// Decision and failure counters. Shared behind an `Arc`.
#[derive(Debug, Default)]
pub struct CullingMetrics {
    /// Gating decisions answered.
    decisions: AtomicU64,
    /// Decisions that told the host to skip work.
    skipped: AtomicU64,
    /// Per-entity step failures.
    failed_steps: AtomicU64,
    /// Tier changes applied.
    tier_changes: AtomicU64,
}

/// Point-in-time copy of [`CullingMetrics`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct MetricsSnapshot {
    /// Gating decisions answered.
    pub decisions: u64,
    /// Decisions that told the host to skip work.
    pub skipped: u64,
    /// Per-entity step failures.
    pub failed_steps: u64,
    /// Tier changes applied.
    pub tier_changes: u64,
}

impl MetricsSnapshot {
    /// Share of decisions that skipped work, 0-100. Zero when no decisions.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn skip_percent(&self) -> f64 {
        if self.decisions == 0 {
            0.0
        } else {
            self.skipped as f64 * 100.0 / self.decisions as f64
        }
    }
}

impl CullingMetrics {
    /// Counts one gating decision.
    #[inline]
    pub fn record_decision(&self, skipped: bool) {
        self.decisions.fetch_add(1, Ordering::Relaxed);
        if skipped {
            self.skipped.fetch_add(1, Ordering::Relaxed);
        }
    }

    /// Counts one per-entity step failure.
    #[inline]
    pub fn record_failure(&self) {
        self.failed_steps.fetch_add(1, Ordering::Relaxed);
    }

    /// Counts one tier change.
    #[inline]
    pub fn record_tier_change(&self) {
        self.tier_changes.fetch_add(1, Ordering::Relaxed);
    }

    /// Copies every counter.
    #[must_use]
    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            decisions: self.decisions.load(Ordering::Relaxed),
            skipped: self.skipped.load(Ordering::Relaxed),
            failed_steps: self.failed_steps.load(Ordering::Relaxed),
            tier_changes: self.tier_changes.load(Ordering::Relaxed),
        }
    }

    /// Zeroes every counter, starting a fresh measurement window.
    pub fn reset(&self) {
        self.decisions.store(0, Ordering::Relaxed);
        self.skipped.store(0, Ordering::Relaxed);
        self.failed_steps.store(0, Ordering::Relaxed);
        self.tier_changes.store(0, Ordering::Relaxed);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_skip_percent() {
        let metrics = CullingMetrics::default();
        assert_eq!(metrics.snapshot().skip_percent(), 0.0);

        metrics.record_decision(true);
        metrics.record_decision(false);
        metrics.record_decision(true);
        metrics.record_decision(true);

        let snap = metrics.snapshot();
        assert_eq!(snap.decisions, 4);
        assert_eq!(snap.skipped, 3);
        assert_eq!(snap.skip_percent(), 75.0);
    }

    #[test]
    fn test_reset_zeroes() {
        let metrics = CullingMetrics::default();
        metrics.record_decision(true);
        metrics.record_failure();
        metrics.record_tier_change();
        metrics.reset();
        assert_eq!(metrics.snapshot(), MetricsSnapshot::default());
    }
}
