//! # ASTRALIS
//!
//! Host-facing integration crate: one place that ties the culling engine to a
//! host's frame clock and threads.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                            ASTRALIS ENGINE                              │
//! ├─────────────────────────────────────────────────────────────────────────┤
//! │                                                                         │
//! │  ┌─────────────────┐     ┌─────────────────┐     ┌─────────────────┐   │
//! │  │   shared        │     │   core          │     │   culling       │   │
//! │  │                 │────>│                 │────>│                 │   │
//! │  │  • Vec3         │     │  • Slots        │     │  • Classifier   │   │
//! │  │  • LodTier      │     │  • Flag words   │     │  • Bridge       │   │
//! │  │  • Constants    │     │  • Flag table   │     │  • Timestep     │   │
//! │  └─────────────────┘     └─────────────────┘     └────────┬────────┘   │
//! │                                                           │            │
//! │                          ┌─────────────────┐              │            │
//! │                          │   astralis      │<─────────────┘            │
//! │                          │                 │                           │
//! │                          │  • Host loop    │                           │
//! │                          │  • Shared lock  │                           │
//! │                          └─────────────────┘                           │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - `host_loop`: Frame orchestration and timing
//! - `shared_bridge`: Bridge behind a global lock for multi-threaded hosts

#![deny(missing_docs)]
#![deny(unsafe_code)]
#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![deny(clippy::perf)]

pub mod host_loop;
pub mod shared_bridge;

// Re-export the layers
pub use astralis_core as core;
pub use astralis_culling as culling;
pub use astralis_shared as shared;

pub use host_loop::{FrameReport, HostLoop};
pub use shared_bridge::SharedBridge;
