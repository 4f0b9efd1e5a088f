//! # ASTRALIS Culling
//!
//! Distance-based LOD decisions for host game entities.
//!
//! ## Design Principles
//!
//! 1. **Fail open** - no viewpoint, no culling; entities near the player never freeze
//! 2. **One bad entity never aborts a tick** - errors are caught per entity
//! 3. **Hysteresis everywhere** - tiers never flap at band edges
//! 4. **External configuration** - bands, margins and policy come from TOML
//!
//! ## Thread Safety
//!
//! The [`Bridge`] is single-writer (`&mut self`). Host threads that only need
//! to gate work hold a [`FlagView`], which reads atomic flag words without
//! touching the bridge.
//!
//! ## Example
//!
//! ```rust,ignore
//! use astralis_culling::{Bridge, CullingConfig, HostLink, TickAccumulator};
//!
//! let config = CullingConfig::from_file("astralis.toml")?;
//! let mut bridge = Bridge::new(config);
//! bridge.initialize()?;
//!
//! let mut link = HostLink::new(entity.host_id());
//! bridge.register_entity(&mut link, entity.snapshot());
//!
//! let mut timestep = TickAccumulator::new(config.timestep);
//! timestep.on_frame(Instant::now(), |dt| {
//!     bridge.on_client_tick(&world, dt);
//! });
//! bridge.on_render_tick(timestep.alpha());
//! ```

#![deny(missing_docs)]
#![deny(unsafe_code)]
#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![deny(clippy::perf)]

pub mod bridge;
pub mod classifier;
pub mod command;
pub mod config;
pub mod diagnostics;
pub mod error;
pub mod interpolation;
pub mod metrics;
pub mod policy;
pub mod timestep;

pub use bridge::{
    Bridge, BridgeCapability, BridgeState, EntityHost, FlagView, HostLink, SnapshotHost,
    StepReport, UnregisterQueue,
};
pub use classifier::TierClassifier;
pub use command::{run_command, run_command_with_timestep, USAGE};
pub use config::{BridgeSettings, CullingConfig, TierBands, TimestepConfig};
pub use diagnostics::DiagnosticsReport;
pub use error::{BridgeError, BridgeResult, CommandError, ConfigError, ConfigResult, StepError};
pub use interpolation::InterpolationMode;
pub use metrics::{CullingMetrics, MetricsSnapshot};
pub use policy::{CullingPolicy, TierPolicy};
pub use timestep::{FrameOutcome, TickAccumulator};
