//! # Flag View
//!
//! Lock-free read handle the host's threads use to gate expensive work.
//! Cloning is an `Arc` bump; no call here touches the bridge lock.
//!
//! ## Usage
//!
//! ```rust,ignore
//! let view = bridge.flag_view();
//!
//! // AI thread
//! if view.should_run_ai(slot) {
//!     run_pathfinding(entity);
//! }
//!
//! // Render thread
//! if view.should_render(slot) {
//!     draw(entity);
//! }
//! ```

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use astralis_core::{EntityFlags, FlagTable};
use astralis_shared::LodTier;

use crate::metrics::CullingMetrics;
use crate::policy::CullingPolicy;

/// State the bridge shares with every [`FlagView`].
#[derive(Default)]
pub(crate) struct BridgeShared {
    /// Flag word per slot.
    pub(crate) flags: FlagTable,
    /// Decision counters.
    pub(crate) metrics: CullingMetrics,
    /// Last completed simulation tick.
    pub(crate) tick: AtomicU64,
}

impl BridgeShared {
    pub(crate) fn with_len(len: usize) -> Self {
        Self {
            flags: FlagTable::with_len(len),
            metrics: CullingMetrics::default(),
            tick: AtomicU64::new(0),
        }
    }
}

/// Read-only gate over the bridge's flag words.
#[derive(Clone)]
pub struct FlagView {
    shared: Arc<BridgeShared>,
    /// `ai_interval` per tier, copied from the policy.
    intervals: [u32; LodTier::COUNT],
}

impl FlagView {
    pub(crate) fn new(shared: Arc<BridgeShared>, policy: &CullingPolicy) -> Self {
        Self {
            shared,
            intervals: LodTier::ALL.map(|tier| policy.for_tier(tier).ai_interval.max(1)),
        }
    }

    /// Flag word of `slot`. Empty for unbound or out-of-range slots.
    #[inline]
    #[must_use]
    pub fn flags(&self, slot: u32) -> EntityFlags {
        self.shared.flags.get_flags(slot)
    }

    /// Tier of a bound slot.
    #[inline]
    #[must_use]
    pub fn tier(&self, slot: u32) -> Option<LodTier> {
        let flags = self.flags(slot);
        flags.is_registered().then(|| flags.tier())
    }

    /// Last completed simulation tick.
    #[inline]
    #[must_use]
    pub fn tick(&self) -> u64 {
        self.shared.tick.load(Ordering::Acquire)
    }

    /// Whether the host should run AI for `slot` on the current tick.
    #[inline]
    pub fn should_run_ai(&self, slot: u32) -> bool {
        self.should_run_ai_at(slot, self.tick())
    }

    /// Whether the host should run AI for `slot` on `tick`.
    ///
    /// Unbound slots always run. Otherwise AI is skipped when culled and
    /// spread over `ai_interval` ticks, staggered by slot.
    pub fn should_run_ai_at(&self, slot: u32, tick: u64) -> bool {
        let flags = self.flags(slot);
        let run = if !flags.is_registered() {
            true
        } else if flags.is_ai_culled() {
            false
        } else {
            let interval = u64::from(self.intervals[flags.tier().index()]);
            (tick + u64::from(slot)) % interval == 0
        };
        self.shared.metrics.record_decision(!run);
        run
    }

    /// Whether the host should draw `slot`.
    #[inline]
    pub fn should_render(&self, slot: u32) -> bool {
        let run = !self.flags(slot).is_render_culled();
        self.shared.metrics.record_decision(!run);
        run
    }

    /// Whether the ECS side owns physics for `slot`.
    #[inline]
    #[must_use]
    pub fn ecs_owns_physics(&self, slot: u32) -> bool {
        self.flags(slot).ecs_owns_physics()
    }
}

impl std::fmt::Debug for FlagView {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FlagView")
            .field("slots", &self.shared.flags.len())
            .field("tick", &self.tick())
            .field("intervals", &self.intervals)
            .finish()
    }
}
