//! # Host Back-Reference
//!
//! Every host object the bridge tracks carries three cached values: its
//! bridge slot, its ECS entity and a mirror of its flag word. Hosts either
//! implement [`BridgeCapability`] on their own entity type or embed a
//! [`HostLink`].

use astralis_core::EntityId;
use astralis_shared::constants::NO_SLOT;
use astralis_shared::HostId;

/// Back-reference a host object keeps to its bridge slot.
///
/// Only the bridge writes these values. Hosts read `bridge_slot` to index
/// the [`FlagView`](super::FlagView) in O(1).
pub trait BridgeCapability {
    /// Stable host identifier.
    fn host_id(&self) -> HostId;

    /// Cached slot, or [`NO_SLOT`].
    fn bridge_slot(&self) -> i32;

    /// Stores the cached slot.
    fn set_bridge_slot(&mut self, slot: i32);

    /// Cached ECS entity.
    fn ecs_entity(&self) -> EntityId;

    /// Stores the cached ECS entity.
    fn set_ecs_entity(&mut self, entity: EntityId);

    /// Cached flag word.
    fn flags(&self) -> u32;

    /// Stores the cached flag word.
    fn set_flags(&mut self, flags: u32);

    /// Whether every bit of `flag` is set in the cached word.
    fn has_flag(&self, flag: u32) -> bool {
        self.flags() & flag == flag
    }

    /// Sets `flag` in the cached word.
    fn set_flag(&mut self, flag: u32) {
        let flags = self.flags() | flag;
        self.set_flags(flags);
    }

    /// Clears `flag` in the cached word.
    fn clear_flag(&mut self, flag: u32) {
        let flags = self.flags() & !flag;
        self.set_flags(flags);
    }

    /// Whether a slot is cached.
    fn is_bridged(&self) -> bool {
        self.bridge_slot() != NO_SLOT
    }

    /// Cached slot as an index, `None` when unset or negative.
    fn bound_slot(&self) -> Option<u32> {
        u32::try_from(self.bridge_slot()).ok()
    }

    /// Forgets the slot, entity and flags.
    fn reset_link(&mut self) {
        self.set_bridge_slot(NO_SLOT);
        self.set_ecs_entity(EntityId::NULL);
        self.set_flags(0);
    }
}

/// Ready-made back-reference for hosts that don't want to implement the trait.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct HostLink {
    /// Stable host identifier.
    pub host_id: HostId,
    /// Cached slot.
    pub slot: i32,
    /// Cached ECS entity.
    pub ecs_entity: EntityId,
    /// Cached flag word.
    pub flags: u32,
}

impl HostLink {
    /// Unbridged link for `host_id`.
    #[must_use]
    pub const fn new(host_id: HostId) -> Self {
        Self {
            host_id,
            slot: NO_SLOT,
            ecs_entity: EntityId::NULL,
            flags: 0,
        }
    }
}

impl Default for HostLink {
    fn default() -> Self {
        Self::new(HostId::default())
    }
}

impl BridgeCapability for HostLink {
    fn host_id(&self) -> HostId {
        self.host_id
    }

    fn bridge_slot(&self) -> i32 {
        self.slot
    }

    fn set_bridge_slot(&mut self, slot: i32) {
        self.slot = slot;
    }

    fn ecs_entity(&self) -> EntityId {
        self.ecs_entity
    }

    fn set_ecs_entity(&mut self, entity: EntityId) {
        self.ecs_entity = entity;
    }

    fn flags(&self) -> u32 {
        self.flags
    }

    fn set_flags(&mut self, flags: u32) {
        self.flags = flags;
    }
}
