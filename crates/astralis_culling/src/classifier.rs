//! # Tier Classifier
//!
//! Turns a viewpoint distance into a LOD tier.
//!
//! ## Bands
//!
//! ```text
//! 0 ────── full_max ────── moderate_max ────── minimal_max ──────▶
//!   FULL            MODERATE              MINIMAL          AGGRESSIVE
//! ```
//!
//! ## Hysteresis
//!
//! Near an edge the distance jitters frame to frame. To stop tier flapping:
//! - Going coarser across edge `e` requires `distance > e * (1 + margin)`
//! - Going finer across edge `e` requires `distance < e * (1 - margin)`
//! - A record that just changed tier holds it for `min_dwell_ticks`
//!
//! The first classification after registration skips both rules.
//!
//! ## Fail Open
//!
//! No viewpoint means every entity is FULL. Never stop simulating entities
//! next to the player because the camera lookup failed.

use astralis_shared::{LodTier, Vec3};
use tracing::{info, warn};

use crate::config::TierBands;

/// Stateless band math plus the once-per-episode viewpoint warning latch.
#[derive(Clone, Debug)]
pub struct TierClassifier {
    /// Band configuration.
    bands: TierBands,
    /// Viewpoint was unavailable at the last observation.
    viewpoint_lost: bool,
    /// Number of distinct unavailability episodes.
    lost_episodes: u64,
}

impl TierClassifier {
    /// Creates a classifier over `bands`.
    #[must_use]
    pub const fn new(bands: TierBands) -> Self {
        Self {
            bands,
            viewpoint_lost: false,
            lost_episodes: 0,
        }
    }

    /// Band configuration.
    #[inline]
    #[must_use]
    pub const fn bands(&self) -> &TierBands {
        &self.bands
    }

    /// Whether the viewpoint is currently considered unavailable.
    #[inline]
    #[must_use]
    pub const fn viewpoint_lost(&self) -> bool {
        self.viewpoint_lost
    }

    /// Number of times the viewpoint went missing.
    #[inline]
    #[must_use]
    pub const fn lost_episodes(&self) -> u64 {
        self.lost_episodes
    }

    /// Records this step's viewpoint, logging only on availability changes.
    ///
    /// Non-finite viewpoints count as unavailable. Returns the usable viewpoint.
    pub fn observe_viewpoint(&mut self, viewpoint: Option<Vec3>, tick: u64) -> Option<Vec3> {
        let usable = viewpoint.filter(|v| v.is_finite());
        match (usable.is_some(), self.viewpoint_lost) {
            (false, false) => {
                self.viewpoint_lost = true;
                self.lost_episodes += 1;
                warn!(tick, "viewpoint unavailable; classifying every entity as FULL");
            }
            (true, true) => {
                self.viewpoint_lost = false;
                info!(tick, "viewpoint restored; distance culling resumed");
            }
            _ => {}
        }
        usable
    }

    /// Tier for `distance` ignoring hysteresis.
    #[must_use]
    pub fn raw_tier(&self, distance: f32) -> LodTier {
        self.bands
            .thresholds()
            .iter()
            .position(|&edge| distance < edge)
            .map_or(LodTier::Aggressive, LodTier::from_index)
    }

    /// Tier for `distance` given the record's current tier and history.
    ///
    /// * `fresh` - record has never been classified
    /// * `ticks_in_tier` - ticks since the last tier change
    #[must_use]
    pub fn classify(&self, distance: f32, current: LodTier, fresh: bool, ticks_in_tier: u64) -> LodTier {
        if fresh {
            return self.raw_tier(distance);
        }
        if ticks_in_tier < self.bands.min_dwell_ticks {
            return current;
        }
        self.with_hysteresis(distance, current)
    }

    /// Tier for a position seen from `viewpoint`; FULL when there is none.
    #[must_use]
    pub fn classify_position(
        &self,
        viewpoint: Option<Vec3>,
        position: Vec3,
        current: LodTier,
        fresh: bool,
        ticks_in_tier: u64,
    ) -> LodTier {
        match viewpoint {
            Some(view) => self.classify(view.distance(position), current, fresh, ticks_in_tier),
            None => LodTier::Full,
        }
    }

    fn with_hysteresis(&self, distance: f32, current: LodTier) -> LodTier {
        let raw = self.raw_tier(distance);
        let edges = self.bands.thresholds();
        let margin = self.bands.hysteresis;
        let mut result = current;

        if raw > current {
            for t in (current.index() + 1)..=raw.index() {
                if distance > edges[t - 1] * (1.0 + margin) {
                    result = LodTier::from_index(t);
                } else {
                    break;
                }
            }
        } else if raw < current {
            for t in (raw.index()..current.index()).rev() {
                if distance < edges[t] * (1.0 - margin) {
                    result = LodTier::from_index(t);
                } else {
                    break;
                }
            }
        }

        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn classifier(hysteresis: f32, dwell: u64) -> TierClassifier {
        TierClassifier::new(TierBands {
            hysteresis,
            min_dwell_ticks: dwell,
            ..TierBands::default()
        })
    }

    #[test]
    fn test_raw_bands() {
        let c = classifier(0.1, 0);
        assert_eq!(c.raw_tier(2.0), LodTier::Full);
        assert_eq!(c.raw_tier(50.0), LodTier::Moderate);
        assert_eq!(c.raw_tier(200.0), LodTier::Minimal);
        assert_eq!(c.raw_tier(500.0), LodTier::Aggressive);
        assert_eq!(c.raw_tier(16.0), LodTier::Moderate);
        assert_eq!(c.raw_tier(256.0), LodTier::Aggressive);
    }

    #[test]
    fn test_fresh_ignores_hysteresis() {
        let c = classifier(0.1, 100);
        assert_eq!(c.classify(17.0, LodTier::Full, true, 0), LodTier::Moderate);
    }

    #[test]
    fn test_coarser_needs_margin() {
        let c = classifier(0.1, 0);
        // Edge 16, margin 10% -> must exceed 17.6
        assert_eq!(c.classify(17.0, LodTier::Full, false, 10), LodTier::Full);
        assert_eq!(c.classify(17.7, LodTier::Full, false, 10), LodTier::Moderate);
    }

    #[test]
    fn test_finer_needs_margin() {
        let c = classifier(0.1, 0);
        // Edge 16, margin 10% -> must fall below 14.4
        assert_eq!(c.classify(15.0, LodTier::Moderate, false, 10), LodTier::Moderate);
        assert_eq!(c.classify(14.0, LodTier::Moderate, false, 10), LodTier::Full);
    }

    #[test]
    fn test_multi_band_jump_stops_at_first_unmet_margin() {
        let c = classifier(0.1, 0);
        // Raw AGGRESSIVE but 260 < 256 * 1.1 -> settles on MINIMAL
        assert_eq!(c.classify(260.0, LodTier::Full, false, 10), LodTier::Minimal);
        assert_eq!(c.classify(500.0, LodTier::Full, false, 10), LodTier::Aggressive);
        assert_eq!(c.classify(1.0, LodTier::Aggressive, false, 10), LodTier::Full);
    }

    #[test]
    fn test_exact_boundary_retains_tier() {
        let c = classifier(0.0, 0);
        assert_eq!(c.classify(64.0, LodTier::Moderate, false, 10), LodTier::Moderate);
        assert_eq!(c.classify(64.0, LodTier::Minimal, false, 10), LodTier::Minimal);
    }

    #[test]
    fn test_dwell_holds_tier() {
        let c = classifier(0.1, 4);
        assert_eq!(c.classify(500.0, LodTier::Full, false, 3), LodTier::Full);
        assert_eq!(c.classify(500.0, LodTier::Full, false, 4), LodTier::Aggressive);
    }

    #[test]
    fn test_missing_viewpoint_is_full() {
        let c = classifier(0.1, 0);
        let tier = c.classify_position(None, Vec3::new(1000.0, 0.0, 0.0), LodTier::Aggressive, false, 10);
        assert_eq!(tier, LodTier::Full);
    }

    #[test]
    fn test_viewpoint_episodes_counted_once() {
        let mut c = classifier(0.1, 0);
        assert!(c.observe_viewpoint(None, 1).is_none());
        assert!(c.observe_viewpoint(None, 2).is_none());
        assert!(c.observe_viewpoint(Some(Vec3::new(f32::NAN, 0.0, 0.0)), 3).is_none());
        assert_eq!(c.lost_episodes(), 1);

        assert!(c.observe_viewpoint(Some(Vec3::ZERO), 4).is_some());
        assert!(!c.viewpoint_lost());
        c.observe_viewpoint(None, 5);
        assert_eq!(c.lost_episodes(), 2);
    }
}
