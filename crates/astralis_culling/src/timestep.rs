//! # Fixed-Timestep Accumulator
//!
//! Converts variable host frame deltas into a whole number of fixed
//! simulation steps.
//!
//! ## Per frame
//!
//! 1. `delta = now - last_sample`
//! 2. `delta = min(delta, max_frame_time)`
//! 3. `accumulated += delta`
//! 4. Step while `accumulated >= fixed_timestep`, at most `max_steps_per_callback` times
//! 5. Still `>= 2 * fixed_timestep` behind? Drain to zero.
//!
//! Step 5 is the spiral-of-death guard: under sustained overload we drop
//! simulated time rather than queue ever more catch-up work.
//!
//! The stepping logic only ever sees injected deltas, so a recorded delta
//! sequence replays bit-for-bit.

use std::time::Instant;

use tracing::warn;

use crate::config::TimestepConfig;

/// Result of one host frame.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct FrameOutcome {
    /// Fixed steps executed.
    pub steps: u32,
    /// Leftover time was dropped by the overload guard.
    pub drained: bool,
}

/// Fixed-timestep accumulator.
#[derive(Clone, Debug)]
pub struct TickAccumulator {
    /// Tuning.
    config: TimestepConfig,
    /// Simulated time not yet consumed by a step, in seconds.
    accumulated: f64,
    /// Wall-clock time of the previous frame.
    last_sample: Option<Instant>,
    /// Steps executed over the accumulator's lifetime.
    total_steps: u64,
    /// Frames whose leftover time was drained.
    total_drains: u64,
}

impl TickAccumulator {
    /// Creates an empty accumulator.
    #[must_use]
    pub const fn new(config: TimestepConfig) -> Self {
        Self {
            config,
            accumulated: 0.0,
            last_sample: None,
            total_steps: 0,
            total_drains: 0,
        }
    }

    /// Tuning in use.
    #[inline]
    #[must_use]
    pub const fn config(&self) -> &TimestepConfig {
        &self.config
    }

    /// Unconsumed time in seconds.
    #[inline]
    #[must_use]
    pub const fn accumulated(&self) -> f64 {
        self.accumulated
    }

    /// Fraction of a step carried over, used as the render partial tick.
    #[inline]
    #[must_use]
    #[allow(clippy::cast_possible_truncation)]
    pub fn alpha(&self) -> f32 {
        (self.accumulated / self.config.fixed_timestep) as f32
    }

    /// Lifetime step count.
    #[inline]
    #[must_use]
    pub const fn total_steps(&self) -> u64 {
        self.total_steps
    }

    /// Lifetime drain count.
    #[inline]
    #[must_use]
    pub const fn total_drains(&self) -> u64 {
        self.total_drains
    }

    /// Samples the wall clock and advances by the elapsed time.
    ///
    /// The first call only records `now` and runs no steps.
    pub fn on_frame(&mut self, now: Instant, step: impl FnMut(f64)) -> FrameOutcome {
        let delta = self
            .last_sample
            .map_or(0.0, |last| now.saturating_duration_since(last).as_secs_f64());
        self.last_sample = Some(now);
        self.advance(delta, step)
    }

    /// Advances by an injected `delta` (seconds), calling `step(fixed_timestep)`
    /// once per fixed step.
    pub fn advance(&mut self, delta: f64, mut step: impl FnMut(f64)) -> FrameOutcome {
        let fixed = self.config.fixed_timestep;
        let delta = if delta.is_finite() {
            delta.clamp(0.0, self.config.max_frame_time)
        } else {
            self.config.max_frame_time
        };

        self.accumulated += delta;

        let mut outcome = FrameOutcome::default();
        while self.accumulated >= fixed && outcome.steps < self.config.max_steps_per_callback {
            step(fixed);
            self.accumulated -= fixed;
            outcome.steps += 1;
        }
        self.total_steps += u64::from(outcome.steps);

        if self.accumulated >= 2.0 * fixed {
            warn!(
                dropped_secs = self.accumulated,
                steps = outcome.steps,
                "simulation behind; dropping accumulated time"
            );
            self.accumulated = 0.0;
            self.total_drains += 1;
            outcome.drained = true;
        }

        outcome
    }

    /// Forgets the last wall-clock sample and leftover time.
    ///
    /// Call when the host resumes after a pause so the pause is not replayed.
    pub fn reset(&mut self) {
        self.accumulated = 0.0;
        self.last_sample = None;
    }
}

impl Default for TickAccumulator {
    fn default() -> Self {
        Self::new(TimestepConfig::default())
    }
}
