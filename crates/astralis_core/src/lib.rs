//! # ASTRALIS Core
//!
//! Storage layer for the entity culling bridge:
//! - Dense, slot-indexed entity records
//! - O(1) slot allocation with deterministic reuse
//! - Per-slot flag words readable from any thread
//!
//! ## Architecture Rules
//!
//! 1. **Slots are stable** - a slot never moves while it is bound
//! 2. **Reuse is deterministic** - the lowest free slot is always handed out first
//! 3. **Flags are atomic** - one `AtomicU32` per slot, acquire/release ordering
//!
//! ## Example
//!
//! ```rust,ignore
//! use astralis_core::{SlotAllocator, EntityRecord};
//!
//! let mut slots: SlotAllocator<EntityRecord> = SlotAllocator::with_capacity(256);
//! let (slot, generation) = slots.allocate();
//! ```

#![deny(missing_docs)]
#![deny(unsafe_code)]
#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![deny(clippy::perf)]

pub mod ecs;
pub mod memory;
pub mod sync;

pub use ecs::{EntityFlags, EntityId, EntityRecord};
pub use memory::SlotAllocator;
pub use sync::FlagTable;
