//! # Host Loop
//!
//! One owner for everything a host does per frame:
//!
//! ```text
//! Frame N:
//! ┌─────────────────────────────────────────────────────────────────────┐
//! │ 1. SAMPLE CLOCK                                                     │
//! │    └─ delta = now - last frame, clamped                             │
//! │                                                                     │
//! │ 2. FIXED STEPS (0..=max_steps_per_callback)                         │
//! │    └─ bridge.on_client_tick(host, fixed_timestep)                   │
//! │       ├─ classify every bound entity                                │
//! │       ├─ rewrite flag words                                         │
//! │       └─ apply deferred unregistrations                             │
//! │                                                                     │
//! │ 3. RENDER TICK                                                      │
//! │    └─ bridge.on_render_tick(alpha)                                  │
//! └─────────────────────────────────────────────────────────────────────┘
//! ```

use std::time::Instant;

use astralis_culling::{
    run_command_with_timestep, Bridge, BridgeResult, CommandError, CullingConfig,
    DiagnosticsReport, EntityHost, FrameOutcome, StepReport, TickAccumulator,
};

/// What one frame did.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct FrameReport {
    /// Frame number, starting at 0.
    pub frame: u64,
    /// Fixed steps executed.
    pub steps: u32,
    /// Accumulated time was dropped by the overload guard.
    pub drained: bool,
    /// Partial tick handed to the render tick.
    pub alpha: f32,
    /// Entities whose step failed, summed over the frame's steps.
    pub failures: u32,
    /// Tier changes, summed over the frame's steps.
    pub tier_changes: u32,
    /// Deferred unregistrations applied.
    pub deferred_released: u32,
    /// Entities blended by the render tick.
    pub blended: u32,
}

impl FrameReport {
    fn absorb(&mut self, step: StepReport) {
        self.failures += step.failures;
        self.tier_changes += step.tier_changes;
        self.deferred_released += step.deferred_released;
    }
}

/// Bridge plus accumulator, driven once per host frame.
pub struct HostLoop {
    /// The engine.
    bridge: Bridge,
    /// Wall-clock to fixed-step conversion.
    timestep: TickAccumulator,
    /// Frames run.
    frame_count: u64,
}

impl HostLoop {
    /// Creates and initializes a bridge for `config`.
    ///
    /// # Errors
    ///
    /// Propagates bridge initialization failure.
    pub fn new(config: CullingConfig) -> BridgeResult<Self> {
        let mut bridge = Bridge::new(config);
        bridge.initialize()?;
        Ok(Self {
            bridge,
            timestep: TickAccumulator::new(config.timestep),
            frame_count: 0,
        })
    }

    /// The engine.
    #[inline]
    #[must_use]
    pub const fn bridge(&self) -> &Bridge {
        &self.bridge
    }

    /// The engine, for registration calls.
    #[inline]
    pub fn bridge_mut(&mut self) -> &mut Bridge {
        &mut self.bridge
    }

    /// The accumulator.
    #[inline]
    #[must_use]
    pub const fn timestep(&self) -> &TickAccumulator {
        &self.timestep
    }

    /// Frames run so far.
    #[inline]
    #[must_use]
    pub const fn frame_count(&self) -> u64 {
        self.frame_count
    }

    /// Runs one frame at wall-clock time `now`.
    ///
    /// While the bridge is paused the clock is not accumulated; only the
    /// render tick runs.
    pub fn frame(&mut self, host: &impl EntityHost, now: Instant) -> FrameReport {
        if !self.bridge.is_running() {
            return self.finish_frame(FrameOutcome::default(), FrameReport::default());
        }
        let bridge = &mut self.bridge;
        let mut report = FrameReport::default();
        let outcome = self.timestep.on_frame(now, |dt| {
            report.absorb(bridge.on_client_tick(host, dt));
        });
        self.finish_frame(outcome, report)
    }

    /// Runs one frame with an injected `delta` in seconds.
    ///
    /// Replaying the same deltas against the same host reproduces the same
    /// frames exactly.
    pub fn frame_with_delta(&mut self, host: &impl EntityHost, delta: f64) -> FrameReport {
        if !self.bridge.is_running() {
            return self.finish_frame(FrameOutcome::default(), FrameReport::default());
        }
        let bridge = &mut self.bridge;
        let mut report = FrameReport::default();
        let outcome = self.timestep.advance(delta, |dt| {
            report.absorb(bridge.on_client_tick(host, dt));
        });
        self.finish_frame(outcome, report)
    }

    /// Pauses stepping.
    ///
    /// # Errors
    ///
    /// Propagates invalid lifecycle transitions.
    pub fn pause(&mut self) -> BridgeResult<()> {
        self.bridge.pause()
    }

    /// Resumes stepping without replaying the time spent paused.
    ///
    /// # Errors
    ///
    /// Propagates invalid lifecycle transitions.
    pub fn resume(&mut self) -> BridgeResult<()> {
        self.bridge.resume()?;
        self.timestep.reset();
        Ok(())
    }

    /// Closes the bridge.
    ///
    /// # Errors
    ///
    /// Propagates invalid lifecycle transitions.
    pub fn close(&mut self) -> BridgeResult<()> {
        self.bridge.close()
    }

    /// Diagnostics including accumulator counters.
    #[must_use]
    pub fn report(&self) -> DiagnosticsReport {
        DiagnosticsReport::capture(&self.bridge).with_timestep(&self.timestep)
    }

    /// Runs an operator command.
    ///
    /// # Errors
    ///
    /// Unknown or empty commands.
    pub fn command(&self, line: &str) -> Result<String, CommandError> {
        run_command_with_timestep(&self.bridge, &self.timestep, line)
    }

    fn finish_frame(&mut self, outcome: FrameOutcome, mut report: FrameReport) -> FrameReport {
        report.frame = self.frame_count;
        report.steps = outcome.steps;
        report.drained = outcome.drained;
        report.alpha = self.timestep.alpha();
        report.blended = self.bridge.on_render_tick(report.alpha);
        self.frame_count += 1;
        report
    }
}
