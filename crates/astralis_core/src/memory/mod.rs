//! # Memory Management
//!
//! Slot allocation for entity records.
//!
//! ## Design Philosophy
//!
//! Records live in one dense array indexed by slot:
//! - Allocation and release are O(1) amortized
//! - The array only grows (doubling), it never shrinks or compacts
//! - Released slots are reused lowest-first

mod slots;

pub use slots::SlotAllocator;
