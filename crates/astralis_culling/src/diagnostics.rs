//! # Diagnostics
//!
//! Read-only snapshot of the bridge for operators. Capturing never mutates
//! simulation state.
//!
//! ## Status line
//!
//! ```text
//! FULL:1 MODERATE:1 AGGRESSIVE:1 total:3
//! ```
//!
//! Tiers with no entities are left out.

use astralis_shared::LodTier;

use crate::bridge::{Bridge, BridgeState};
use crate::metrics::MetricsSnapshot;
use crate::timestep::TickAccumulator;

/// Point-in-time operator view of a bridge.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DiagnosticsReport {
    /// Lifecycle state.
    pub state: BridgeState,
    /// Simulation tick.
    pub tick: u64,
    /// Simulated seconds.
    pub simulated_secs: f64,
    /// Bound entities per tier.
    pub tier_counts: [usize; LodTier::COUNT],
    /// Bound slots.
    pub bound: usize,
    /// Released slots awaiting reuse.
    pub free: usize,
    /// Slot high-water mark.
    pub high_water: usize,
    /// Decision and failure counters.
    pub metrics: MetricsSnapshot,
    /// Viewpoint currently unavailable.
    pub viewpoint_lost: bool,
    /// Times the viewpoint went missing.
    pub viewpoint_episodes: u64,
    /// Host link invariant violations.
    pub violations: u64,
    /// Frames whose accumulated time was dropped, when an accumulator was supplied.
    pub drains: Option<u64>,
}

impl DiagnosticsReport {
    /// Captures `bridge`.
    #[must_use]
    pub fn capture(bridge: &Bridge) -> Self {
        Self {
            state: bridge.state(),
            tick: bridge.tick(),
            simulated_secs: bridge.simulated_secs(),
            tier_counts: bridge.tier_counts(),
            bound: bridge.bound_count(),
            free: bridge.free_count(),
            high_water: bridge.high_water(),
            metrics: bridge.metrics(),
            viewpoint_lost: bridge.classifier().viewpoint_lost(),
            viewpoint_episodes: bridge.classifier().lost_episodes(),
            violations: bridge.violations(),
            drains: None,
        }
    }

    /// Adds accumulator counters.
    #[must_use]
    pub fn with_timestep(mut self, timestep: &TickAccumulator) -> Self {
        self.drains = Some(timestep.total_drains());
        self
    }

    /// Entities counted across every tier.
    #[must_use]
    pub fn total(&self) -> usize {
        self.tier_counts.iter().sum()
    }

    /// Entities in `tier`.
    #[must_use]
    pub fn count(&self, tier: LodTier) -> usize {
        self.tier_counts[tier.index()]
    }

    /// One-line tier summary.
    #[must_use]
    pub fn status_line(&self) -> String {
        let mut parts: Vec<String> = LodTier::ALL
            .iter()
            .filter(|tier| self.count(**tier) > 0)
            .map(|tier| format!("{}:{}", tier.name(), self.count(*tier)))
            .collect();
        parts.push(format!("total:{}", self.total()));
        parts.join(" ")
    }

    /// Multi-line bridge and slot summary.
    #[must_use]
    pub fn stats_text(&self) -> String {
        let viewpoint = if self.viewpoint_lost { "LOST" } else { "ok" };
        [
            format!(
                "bridge: {} tick={} simulated={:.2}s",
                self.state, self.tick, self.simulated_secs
            ),
            format!(
                "slots: bound={} free={} high_water={}",
                self.bound, self.free, self.high_water
            ),
            format!("tiers: {}", self.status_line()),
            format!(
                "viewpoint: {viewpoint} (lost {} times)",
                self.viewpoint_episodes
            ),
        ]
        .join("\n")
    }

    /// Gating effectiveness and failure counters.
    #[must_use]
    pub fn cache_text(&self) -> String {
        let m = &self.metrics;
        let drains = self
            .drains
            .map_or_else(|| "n/a".to_string(), |d| d.to_string());
        [
            format!(
                "decisions={} skipped={} ({:.1}%)",
                m.decisions,
                m.skipped,
                m.skip_percent()
            ),
            format!(
                "failed_steps={} tier_changes={} drains={drains} violations={}",
                m.failed_steps, m.tier_changes, self.violations
            ),
        ]
        .join("\n")
    }
}

impl std::fmt::Display for DiagnosticsReport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.status_line())
    }
}
