//! # LOD Tiers
//!
//! Discrete simulation-fidelity levels, ordered from finest to coarsest.

use serde::{Deserialize, Serialize};

/// Level-of-detail tier assigned to an entity.
///
/// Ordering follows coarseness: `Full < Moderate < Minimal < Aggressive`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[repr(u8)]
pub enum LodTier {
    /// Closest band - everything runs every tick.
    #[default]
    Full = 0,
    /// Near band - reduced AI frequency.
    Moderate = 1,
    /// Far band - AI skipped.
    Minimal = 2,
    /// Farthest band - AI and rendering skipped.
    Aggressive = 3,
}

impl LodTier {
    /// All tiers, finest first.
    pub const ALL: [Self; 4] = [Self::Full, Self::Moderate, Self::Minimal, Self::Aggressive];

    /// Number of tiers.
    pub const COUNT: usize = 4;

    /// Array index of this tier.
    #[inline]
    #[must_use]
    pub const fn index(self) -> usize {
        self as usize
    }

    /// Converts from an index, saturating at `Aggressive`.
    #[inline]
    #[must_use]
    pub const fn from_index(index: usize) -> Self {
        match index {
            0 => Self::Full,
            1 => Self::Moderate,
            2 => Self::Minimal,
            _ => Self::Aggressive,
        }
    }

    /// Upper-case name used in operator reports.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Full => "FULL",
            Self::Moderate => "MODERATE",
            Self::Minimal => "MINIMAL",
            Self::Aggressive => "AGGRESSIVE",
        }
    }
}

impl std::fmt::Display for LodTier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}
