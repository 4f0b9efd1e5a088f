//! # Tier Policy Table
//!
//! Maps each LOD tier to the work the host is allowed to do for it. The bridge
//! never branches on tiers directly; it asks this table.

use astralis_core::EntityFlags;
use astralis_shared::constants::{FLAG_AI_CULLED, FLAG_ECS_PHYSICS, FLAG_RENDER_CULLED};
use astralis_shared::LodTier;
use serde::{Deserialize, Serialize};

/// What one tier allows.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TierPolicy {
    /// Skip AI / pathfinding entirely.
    pub ai_culled: bool,
    /// Skip rendering.
    pub render_culled: bool,
    /// Hand physics authority to the ECS side.
    pub ecs_physics: bool,
    /// Run AI once every `ai_interval` ticks (1 = every tick).
    pub ai_interval: u32,
}

impl TierPolicy {
    /// Builds a policy entry.
    #[must_use]
    pub const fn new(ai_culled: bool, render_culled: bool, ecs_physics: bool, ai_interval: u32) -> Self {
        Self {
            ai_culled,
            render_culled,
            ecs_physics,
            ai_interval,
        }
    }

    /// Flag bits this entry controls, the ones it sets given `remote`.
    ///
    /// Remote entities are server-authoritative and never get ECS physics.
    #[must_use]
    pub const fn flags(&self, remote: bool) -> u32 {
        let mut bits = 0;
        if self.ai_culled {
            bits |= FLAG_AI_CULLED;
        }
        if self.render_culled {
            bits |= FLAG_RENDER_CULLED;
        }
        if self.ecs_physics && !remote {
            bits |= FLAG_ECS_PHYSICS;
        }
        bits
    }
}

/// Policy for every tier.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CullingPolicy {
    /// FULL tier.
    pub full: TierPolicy,
    /// MODERATE tier.
    pub moderate: TierPolicy,
    /// MINIMAL tier.
    pub minimal: TierPolicy,
    /// AGGRESSIVE tier.
    pub aggressive: TierPolicy,
}

impl Default for CullingPolicy {
    fn default() -> Self {
        Self {
            full: TierPolicy::new(false, false, false, 1),
            moderate: TierPolicy::new(false, false, false, 2),
            minimal: TierPolicy::new(true, false, false, 4),
            aggressive: TierPolicy::new(true, true, true, 8),
        }
    }
}

impl CullingPolicy {
    /// Every bit the policy table may touch.
    pub const MANAGED_FLAGS: u32 = FLAG_AI_CULLED | FLAG_RENDER_CULLED | FLAG_ECS_PHYSICS;

    /// Entry for `tier`.
    #[inline]
    #[must_use]
    pub const fn for_tier(&self, tier: LodTier) -> &TierPolicy {
        match tier {
            LodTier::Full => &self.full,
            LodTier::Moderate => &self.moderate,
            LodTier::Minimal => &self.minimal,
            LodTier::Aggressive => &self.aggressive,
        }
    }

    /// Applies the entry for `tier` to `flags`, leaving unmanaged bits alone.
    #[must_use]
    pub fn apply(&self, tier: LodTier, remote: bool, flags: EntityFlags) -> EntityFlags {
        let mut next = flags;
        next.remove(Self::MANAGED_FLAGS);
        next.insert(self.for_tier(tier).flags(remote));
        next
    }

    /// Checks that every interval is at least one tick.
    pub(crate) fn validate(&self) -> Result<(), String> {
        for tier in LodTier::ALL {
            if self.for_tier(tier).ai_interval == 0 {
                return Err(format!("policy.{}.ai_interval must be >= 1", tier.name().to_lowercase()));
            }
        }
        Ok(())
    }
}
