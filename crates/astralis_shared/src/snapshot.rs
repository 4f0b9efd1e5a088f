//! # Host Entity Snapshots
//!
//! The only view of a host entity the engine ever gets. The host fills one in
//! at registration and again every tick (either pulled through an entity host
//! or pushed explicitly).

use serde::{Deserialize, Serialize};

use crate::math::Vec3;

/// Stable identifier the host already exposes for its entities
/// (network id, UUID hash, ...). Opaque to the engine.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[repr(transparent)]
pub struct HostId(pub u64);

impl std::fmt::Display for HostId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "host#{}", self.0)
    }
}

/// Point-in-time state of one host entity.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct EntitySnapshot {
    /// World-space position.
    pub position: Vec3,
    /// World-space velocity (units per tick).
    pub velocity: Vec3,
    /// Whether the host still considers the entity alive.
    pub alive: bool,
    /// Remote (server-authoritative) copy; never handed physics authority.
    pub remote: bool,
}

impl EntitySnapshot {
    /// Creates a live, local snapshot at `position` with zero velocity.
    #[must_use]
    pub const fn at(position: Vec3) -> Self {
        Self {
            position,
            velocity: Vec3::ZERO,
            alive: true,
            remote: false,
        }
    }

    /// Returns a copy marked as a remote entity.
    #[must_use]
    pub const fn remote(mut self) -> Self {
        self.remote = true;
        self
    }

    /// Returns a copy with the given velocity.
    #[must_use]
    pub const fn with_velocity(mut self, velocity: Vec3) -> Self {
        self.velocity = velocity;
        self
    }
}
