//! # ASTRALIS Shared
//!
//! Types exchanged between a host game and the culling engine.
//!
//! ## CRITICAL RULE
//!
//! This crate must NEVER contain engine logic. It describes:
//! - What the host hands to the engine (`EntitySnapshot`, `HostId`, `Vec3`)
//! - What the engine hands back (`LodTier`, the flag bit layout)
//!
//! If you need behavior, put it in `astralis_core` or `astralis_culling`.

#![deny(missing_docs)]
#![deny(unsafe_code)]

pub mod constants;
pub mod math;
pub mod snapshot;
pub mod tier;

pub use constants::{
    FLAG_AI_CULLED, FLAG_DIRTY_INBOUND, FLAG_DIRTY_OUTBOUND, FLAG_ECS_PHYSICS,
    FLAG_INTERPOLATING, FLAG_REGISTERED, FLAG_RENDER_CULLED, FLAG_TELEPORTED, NO_SLOT,
};
pub use math::Vec3;
pub use snapshot::{EntitySnapshot, HostId};
pub use tier::LodTier;
