//! # Entity Record
//!
//! Everything the engine remembers about one bound slot, except its flags.

use astralis_shared::{EntitySnapshot, HostId, LodTier, Vec3};

use super::entity::EntityId;

/// Per-slot record. Reset to `Default` when the slot is released.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct EntityRecord {
    /// Host identifier bound to this slot.
    pub host_id: HostId,
    /// ECS-side reference (slot + generation).
    pub ecs_entity: EntityId,
    /// Current LOD tier.
    pub tier: LodTier,
    /// Tick at which `tier` last changed.
    pub last_tier_change_tick: u64,
    /// False until the first step after registration classifies the record.
    pub classified: bool,
    /// Latest snapshot folded into the record.
    pub snapshot: EntitySnapshot,
    /// Snapshot pushed by the host and not yet consumed by a step.
    pub pending: Option<EntitySnapshot>,
    /// Position at the previous step, start point of render interpolation.
    pub previous_position: Vec3,
    /// Last position produced by a render tick.
    pub render_position: Vec3,
    /// A fault on this slot has already been logged.
    pub fault_logged: bool,
}

impl EntityRecord {
    /// Creates a freshly bound record from the registration snapshot.
    #[must_use]
    pub fn bind(host_id: HostId, ecs_entity: EntityId, snapshot: EntitySnapshot) -> Self {
        Self {
            host_id,
            ecs_entity,
            tier: LodTier::Full,
            last_tier_change_tick: 0,
            classified: false,
            snapshot,
            pending: None,
            previous_position: snapshot.position,
            render_position: snapshot.position,
            fault_logged: false,
        }
    }

    /// Current position.
    #[inline]
    #[must_use]
    pub const fn position(&self) -> Vec3 {
        self.snapshot.position
    }

    /// Folds a new snapshot in, remembering the old position.
    ///
    /// Returns the distance moved.
    pub fn advance(&mut self, snapshot: EntitySnapshot) -> f32 {
        self.previous_position = self.snapshot.position;
        self.snapshot = snapshot;
        self.previous_position.distance(snapshot.position)
    }

    /// Records a tier change at `tick`. Returns `true` if the tier differed.
    pub fn set_tier(&mut self, tier: LodTier, tick: u64) -> bool {
        if self.tier == tier {
            return false;
        }
        self.tier = tier;
        self.last_tier_change_tick = tick;
        true
    }
}
