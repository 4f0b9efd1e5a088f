//! # Culling Configuration
//!
//! All tuning lives here and is loaded once at startup from TOML. Every
//! section is optional; missing values fall back to the defaults in
//! `astralis_shared::constants`.
//!
//! ```toml
//! [tiers]
//! full_max = 16.0
//! moderate_max = 64.0
//! minimal_max = 256.0
//! hysteresis = 0.1
//! min_dwell_ticks = 4
//!
//! [timestep]
//! fixed_timestep = 0.02
//! max_frame_time = 0.25
//! max_steps_per_callback = 4
//!
//! [bridge]
//! initial_capacity = 256
//! teleport_distance = 16.0
//! interpolation = "linear"
//!
//! [policy.minimal]
//! ai_culled = true
//! render_culled = false
//! ecs_physics = false
//! ai_interval = 4
//! ```

use std::path::Path;

use astralis_shared::constants::{
    DEFAULT_FIXED_TIMESTEP, DEFAULT_FULL_MAX, DEFAULT_HYSTERESIS, DEFAULT_INITIAL_CAPACITY,
    DEFAULT_MAX_FRAME_TIME, DEFAULT_MAX_STEPS_PER_CALLBACK, DEFAULT_MINIMAL_MAX,
    DEFAULT_MIN_DWELL_TICKS, DEFAULT_MODERATE_MAX, DEFAULT_TELEPORT_DISTANCE,
};
use serde::{Deserialize, Serialize};

use crate::error::{ConfigError, ConfigResult};
use crate::interpolation::InterpolationMode;
use crate::policy::CullingPolicy;

/// Distance bands and hysteresis for the tier classifier.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TierBands {
    /// FULL below this distance.
    pub full_max: f32,
    /// MODERATE below this distance.
    pub moderate_max: f32,
    /// MINIMAL below this distance, AGGRESSIVE at or beyond.
    pub minimal_max: f32,
    /// Fractional margin past a band edge required to switch tier.
    pub hysteresis: f32,
    /// Ticks a record must hold a tier before changing again.
    pub min_dwell_ticks: u64,
}

impl Default for TierBands {
    fn default() -> Self {
        Self {
            full_max: DEFAULT_FULL_MAX,
            moderate_max: DEFAULT_MODERATE_MAX,
            minimal_max: DEFAULT_MINIMAL_MAX,
            hysteresis: DEFAULT_HYSTERESIS,
            min_dwell_ticks: DEFAULT_MIN_DWELL_TICKS,
        }
    }
}

impl TierBands {
    /// Band edges in ascending order.
    #[inline]
    #[must_use]
    pub const fn thresholds(&self) -> [f32; 3] {
        [self.full_max, self.moderate_max, self.minimal_max]
    }

    fn validate(&self) -> Result<(), String> {
        let edges = self.thresholds();
        if edges.iter().any(|e| !e.is_finite() || *e <= 0.0) {
            return Err("tier thresholds must be finite and positive".into());
        }
        if !(edges[0] < edges[1] && edges[1] < edges[2]) {
            return Err(format!(
                "tier thresholds must ascend strictly: {} < {} < {}",
                edges[0], edges[1], edges[2]
            ));
        }
        if !(0.0..0.5).contains(&self.hysteresis) {
            return Err(format!("hysteresis {} outside [0, 0.5)", self.hysteresis));
        }
        Ok(())
    }
}

/// Fixed-timestep accumulator tuning.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TimestepConfig {
    /// Length of one simulation step in seconds.
    pub fixed_timestep: f64,
    /// Largest frame delta accepted, in seconds.
    pub max_frame_time: f64,
    /// Most steps a single frame may run.
    pub max_steps_per_callback: u32,
}

impl Default for TimestepConfig {
    fn default() -> Self {
        Self {
            fixed_timestep: DEFAULT_FIXED_TIMESTEP,
            max_frame_time: DEFAULT_MAX_FRAME_TIME,
            max_steps_per_callback: DEFAULT_MAX_STEPS_PER_CALLBACK,
        }
    }
}

impl TimestepConfig {
    fn validate(&self) -> Result<(), String> {
        if !(self.fixed_timestep.is_finite() && self.fixed_timestep > 0.0) {
            return Err(format!("fixed_timestep {} must be positive", self.fixed_timestep));
        }
        if !(self.max_frame_time.is_finite() && self.max_frame_time >= self.fixed_timestep) {
            return Err(format!(
                "max_frame_time {} must be >= fixed_timestep {}",
                self.max_frame_time, self.fixed_timestep
            ));
        }
        if self.max_steps_per_callback == 0 {
            return Err("max_steps_per_callback must be >= 1".into());
        }
        Ok(())
    }
}

/// Bridge storage and movement tuning.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BridgeSettings {
    /// Slots reserved up front.
    pub initial_capacity: usize,
    /// Per-step movement beyond which the render side snaps instead of blending.
    pub teleport_distance: f32,
    /// Curve used for render interpolation.
    pub interpolation: InterpolationMode,
}

impl Default for BridgeSettings {
    fn default() -> Self {
        Self {
            initial_capacity: DEFAULT_INITIAL_CAPACITY,
            teleport_distance: DEFAULT_TELEPORT_DISTANCE,
            interpolation: InterpolationMode::Linear,
        }
    }
}

/// Complete engine configuration.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CullingConfig {
    /// Classifier bands.
    pub tiers: TierBands,
    /// Accumulator tuning.
    pub timestep: TimestepConfig,
    /// Bridge tuning.
    pub bridge: BridgeSettings,
    /// Per-tier work policy.
    pub policy: CullingPolicy,
}

impl CullingConfig {
    /// Parses and validates config from TOML text.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Parse` for malformed TOML and
    /// `ConfigError::Invalid` for out-of-range values.
    pub fn from_toml_str(text: &str) -> ConfigResult<Self> {
        let config: Self = toml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Reads, parses and validates a TOML config file.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Io` if the file cannot be read, otherwise as
    /// [`CullingConfig::from_toml_str`].
    pub fn from_file(path: impl AsRef<Path>) -> ConfigResult<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_toml_str(&text)
    }

    /// Checks every value range.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Invalid` naming the first bad value.
    pub fn validate(&self) -> ConfigResult<()> {
        self.tiers.validate().map_err(ConfigError::Invalid)?;
        self.timestep.validate().map_err(ConfigError::Invalid)?;
        self.policy.validate().map_err(ConfigError::Invalid)?;
        if !(self.bridge.teleport_distance.is_finite() && self.bridge.teleport_distance > 0.0) {
            return Err(ConfigError::Invalid(format!(
                "teleport_distance {} must be positive",
                self.bridge.teleport_distance
            )));
        }
        Ok(())
    }
}
