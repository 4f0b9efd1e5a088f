//! # Render Interpolation
//!
//! The simulation runs on fixed steps; frames land between them. The render
//! tick places each moving entity between its previous and current step
//! position using the frame's partial-tick fraction.
//!
//! ## Model:
//! - **Logical position**: the snapshot folded in by the last step
//! - **Render position**: where the entity is drawn this frame
//! - **Teleports** never blend; the render position snaps

use astralis_shared::Vec3;
use serde::{Deserialize, Serialize};

/// Curve applied to the partial-tick fraction.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InterpolationMode {
    /// No blending - always draw the logical position.
    HardSnap,
    /// Straight-line blend.
    #[default]
    Linear,
    /// Fast start, slow end.
    EaseOut,
    /// S-curve: 3t^2 - 2t^3.
    SmoothStep,
}

impl InterpolationMode {
    /// Shapes a partial-tick fraction. Input is clamped to `[0, 1]`.
    #[must_use]
    pub fn blend_factor(self, partial: f32) -> f32 {
        let t = if partial.is_nan() { 1.0 } else { partial.clamp(0.0, 1.0) };
        match self {
            Self::HardSnap => 1.0,
            Self::Linear => t,
            Self::EaseOut => {
                let inv = 1.0 - t;
                1.0 - inv * inv
            }
            Self::SmoothStep => t * t * (3.0 - 2.0 * t),
        }
    }

    /// Render position between `previous` and `current` at `partial`.
    #[must_use]
    pub fn render_position(self, previous: Vec3, current: Vec3, partial: f32) -> Vec3 {
        previous.lerp(current, self.blend_factor(partial))
    }
}
