//! # Flag Layout & Default Tuning
//!
//! **CRITICAL:** The flag bits below are read and written directly by host
//! code holding a `u32` per entity. Changing a bit position breaks every host
//! built against the previous layout.

// =============================================================================
// FLAG BIT LAYOUT
// =============================================================================

/// Slot is bound to a live host entity.
pub const FLAG_REGISTERED: u32 = 1 << 0;

/// Host should skip AI / pathfinding for this entity.
pub const FLAG_AI_CULLED: u32 = 1 << 1;

/// Host should skip rendering this entity.
pub const FLAG_RENDER_CULLED: u32 = 1 << 2;

/// The ECS side owns physics for this entity; the host must not integrate it.
pub const FLAG_ECS_PHYSICS: u32 = 1 << 3;

/// Host pushed a snapshot that the next step has not consumed yet.
pub const FLAG_DIRTY_INBOUND: u32 = 1 << 4;

/// Engine changed tier or authority since the host last collected changes.
pub const FLAG_DIRTY_OUTBOUND: u32 = 1 << 5;

/// Entity jumped farther than the teleport distance during the last step.
pub const FLAG_TELEPORTED: u32 = 1 << 6;

/// Render position is blending between the previous and current sample.
pub const FLAG_INTERPOLATING: u32 = 1 << 7;

/// Every defined flag bit.
pub const FLAG_ALL: u32 = FLAG_REGISTERED
    | FLAG_AI_CULLED
    | FLAG_RENDER_CULLED
    | FLAG_ECS_PHYSICS
    | FLAG_DIRTY_INBOUND
    | FLAG_DIRTY_OUTBOUND
    | FLAG_TELEPORTED
    | FLAG_INTERPOLATING;

/// First bit of the two-bit tier field stored alongside the flags.
pub const TIER_SHIFT: u32 = 8;

/// Mask of the tier field (`LodTier as u32` shifted by `TIER_SHIFT`).
pub const TIER_MASK: u32 = 0b11 << TIER_SHIFT;

/// Every meaningful bit of a flag word: flags plus the tier field.
pub const WORD_MASK: u32 = FLAG_ALL | TIER_MASK;

/// Sentinel the host stores in its back-reference when no slot is bound.
pub const NO_SLOT: i32 = -1;

// =============================================================================
// DEFAULT TUNING
// =============================================================================

/// Upper bound (exclusive) of the FULL band, in world units.
pub const DEFAULT_FULL_MAX: f32 = 16.0;

/// Upper bound (exclusive) of the MODERATE band, in world units.
pub const DEFAULT_MODERATE_MAX: f32 = 64.0;

/// Upper bound (exclusive) of the MINIMAL band, in world units.
pub const DEFAULT_MINIMAL_MAX: f32 = 256.0;

/// Fractional margin a distance must clear past a band edge to switch tiers.
pub const DEFAULT_HYSTERESIS: f32 = 0.1;

/// Ticks a slot must hold its tier before it may change again.
pub const DEFAULT_MIN_DWELL_TICKS: u64 = 4;

/// Fixed simulation step in seconds (50 Hz).
pub const DEFAULT_FIXED_TIMESTEP: f64 = 0.02;

/// Largest wall-clock delta accepted from a single host frame, in seconds.
pub const DEFAULT_MAX_FRAME_TIME: f64 = 0.25;

/// Most fixed steps a single host frame may run.
pub const DEFAULT_MAX_STEPS_PER_CALLBACK: u32 = 4;

/// Slots reserved when a bridge is created.
pub const DEFAULT_INITIAL_CAPACITY: usize = 256;

/// Per-step movement (world units) above which a move counts as a teleport.
pub const DEFAULT_TELEPORT_DISTANCE: f32 = 16.0;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flag_bits_are_disjoint() {
        let bits = [
            FLAG_REGISTERED,
            FLAG_AI_CULLED,
            FLAG_RENDER_CULLED,
            FLAG_ECS_PHYSICS,
            FLAG_DIRTY_INBOUND,
            FLAG_DIRTY_OUTBOUND,
            FLAG_TELEPORTED,
            FLAG_INTERPOLATING,
        ];
        let mut seen = 0u32;
        for bit in bits {
            assert_eq!(bit.count_ones(), 1);
            assert_eq!(seen & bit, 0);
            seen |= bit;
        }
        assert_eq!(seen, FLAG_ALL);
        assert_eq!(FLAG_ALL, 0xFF);
        assert_eq!(FLAG_ALL & TIER_MASK, 0);
        assert_eq!(WORD_MASK, 0x3FF);
    }

    #[test]
    fn test_default_bands_ascend() {
        assert!(DEFAULT_FULL_MAX < DEFAULT_MODERATE_MAX);
        assert!(DEFAULT_MODERATE_MAX < DEFAULT_MINIMAL_MAX);
    }
}
