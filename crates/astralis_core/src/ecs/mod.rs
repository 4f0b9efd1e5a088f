//! # Entity Records
//!
//! The engine-side mirror of a host entity.
//!
//! ## Design Philosophy
//!
//! - One record per bound slot, stored densely
//! - ECS entity ids are slot indices with generation counters
//! - Flags are plain bitsets; the shared copy lives in `sync::FlagTable`

mod entity;
mod flags;
mod record;

pub use entity::EntityId;
pub use flags::EntityFlags;
pub use record::EntityRecord;
