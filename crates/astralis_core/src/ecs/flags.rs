//! # Entity Flags
//!
//! Value type over the host-visible flag word. Bit positions come from
//! `astralis_shared::constants`.
//!
//! ```text
//! bit  9 8 | 7    6    5     4     3    2      1      0
//!     tier | INT  TEL  D_OUT D_IN  ECS  R_CULL AI_CULL REG
//! ```

use astralis_shared::constants::{
    FLAG_AI_CULLED, FLAG_ALL, FLAG_DIRTY_INBOUND, FLAG_DIRTY_OUTBOUND, FLAG_ECS_PHYSICS,
    FLAG_INTERPOLATING, FLAG_REGISTERED, FLAG_RENDER_CULLED, FLAG_TELEPORTED, TIER_MASK,
    TIER_SHIFT, WORD_MASK,
};
use astralis_shared::LodTier;

/// A copy of one slot's flag word, tier field included.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[repr(transparent)]
pub struct EntityFlags(u32);

impl EntityFlags {
    /// No flags set.
    pub const EMPTY: Self = Self(0);

    /// Wraps a raw word. Undefined bits are dropped.
    #[inline]
    #[must_use]
    pub const fn from_bits(bits: u32) -> Self {
        Self(bits & WORD_MASK)
    }

    /// Raw word.
    #[inline]
    #[must_use]
    pub const fn bits(self) -> u32 {
        self.0
    }

    /// Whether every bit in `flag` is set.
    #[inline]
    #[must_use]
    pub const fn contains(self, flag: u32) -> bool {
        (self.0 & flag) == flag
    }

    /// Sets the bits in `flag`.
    #[inline]
    pub fn insert(&mut self, flag: u32) {
        self.0 |= flag & FLAG_ALL;
    }

    /// Clears the bits in `flag`.
    #[inline]
    pub fn remove(&mut self, flag: u32) {
        self.0 &= !flag;
    }

    /// Sets or clears `flag`.
    #[inline]
    pub fn set(&mut self, flag: u32, on: bool) {
        if on {
            self.insert(flag);
        } else {
            self.remove(flag);
        }
    }

    /// Tier stored in the word.
    #[inline]
    #[must_use]
    pub const fn tier(self) -> LodTier {
        LodTier::from_index(((self.0 & TIER_MASK) >> TIER_SHIFT) as usize)
    }

    /// Copy with the tier field replaced.
    #[inline]
    #[must_use]
    pub const fn with_tier(self, tier: LodTier) -> Self {
        Self((self.0 & !TIER_MASK) | ((tier as u32) << TIER_SHIFT))
    }

    /// Slot is bound.
    #[inline]
    #[must_use]
    pub const fn is_registered(self) -> bool {
        self.contains(FLAG_REGISTERED)
    }

    /// AI should be skipped.
    #[inline]
    #[must_use]
    pub const fn is_ai_culled(self) -> bool {
        self.contains(FLAG_AI_CULLED)
    }

    /// Rendering should be skipped.
    #[inline]
    #[must_use]
    pub const fn is_render_culled(self) -> bool {
        self.contains(FLAG_RENDER_CULLED)
    }

    /// ECS owns physics.
    #[inline]
    #[must_use]
    pub const fn ecs_owns_physics(self) -> bool {
        self.contains(FLAG_ECS_PHYSICS)
    }

    /// Pushed snapshot pending.
    #[inline]
    #[must_use]
    pub const fn is_dirty_inbound(self) -> bool {
        self.contains(FLAG_DIRTY_INBOUND)
    }

    /// Engine-side change not yet collected by the host.
    #[inline]
    #[must_use]
    pub const fn is_dirty_outbound(self) -> bool {
        self.contains(FLAG_DIRTY_OUTBOUND)
    }

    /// Teleported during the last step.
    #[inline]
    #[must_use]
    pub const fn is_teleported(self) -> bool {
        self.contains(FLAG_TELEPORTED)
    }

    /// Render position is blending.
    #[inline]
    #[must_use]
    pub const fn is_interpolating(self) -> bool {
        self.contains(FLAG_INTERPOLATING)
    }
}

impl From<u32> for EntityFlags {
    fn from(bits: u32) -> Self {
        Self::from_bits(bits)
    }
}

impl From<EntityFlags> for u32 {
    fn from(flags: EntityFlags) -> Self {
        flags.bits()
    }
}
