//! # Cross-Thread Flag State
//!
//! ## The Problem
//!
//! ```text
//! Simulation thread:  WRITES tier-derived flags every step
//! Render thread:      READS render/interpolation flags every frame
//!
//! Plain u32 per slot:  torn or stale reads on the render thread
//! Mutex per read:      render thread stalls behind the step
//! ```
//!
//! ## The Solution: Atomic Flag Words
//!
//! ```text
//! slot 0   slot 1   slot 2   ...
//! ┌──────┐ ┌──────┐ ┌──────┐
//! │AtomicU32│AtomicU32│AtomicU32│   store = Release, load = Acquire
//! └──────┘ └──────┘ └──────┘
//!          ▲
//!          └── RwLock, write-locked only when the table grows
//! ```

mod flag_table;

pub use flag_table::FlagTable;
