//! # The Bridge
//!
//! Owns every engine-side entity record and keeps the host's view of them
//! (the flag words) up to date.
//!
//! ## Per step
//!
//! ```text
//! on_client_tick(host, dt)
//!   tick += 1
//!   viewpoint = host.viewpoint()           (None -> every entity FULL)
//!   for slot in bound slots, ascending:
//!       snapshot = pushed ?: host.snapshot(id)
//!       teleport / interpolation bookkeeping
//!       tier = classifier(distance, hysteresis, dwell)
//!       flags = policy(tier)
//!   drain deferred unregistrations
//! ```
//!
//! A failure on one entity is counted, logged once, and leaves that
//! entity's previous tier in place. The step continues.
//!
//! ## Threading
//!
//! Every mutating method takes `&mut self`; hosts with several threads wrap
//! the bridge in one mutex. Flag words are the exception: they are atomics
//! shared with every [`FlagView`], so gating reads never take that mutex.

mod capability;
mod host;
mod lifecycle;
mod queue;
mod view;

use std::sync::atomic::Ordering;
use std::sync::Arc;

use astralis_core::{EntityFlags, EntityId, EntityRecord, SlotAllocator};
use astralis_shared::constants::{
    FLAG_DIRTY_INBOUND, FLAG_DIRTY_OUTBOUND, FLAG_INTERPOLATING, FLAG_REGISTERED, FLAG_TELEPORTED,
};
use astralis_shared::{EntitySnapshot, HostId, LodTier, Vec3, NO_SLOT};
use crossbeam_channel::{Receiver, Sender};
use tracing::{debug, info, warn};

use crate::classifier::TierClassifier;
use crate::config::CullingConfig;
use crate::error::{BridgeError, BridgeResult, StepError};
use crate::metrics::{CullingMetrics, MetricsSnapshot};
use crate::policy::CullingPolicy;

pub use capability::{BridgeCapability, HostLink};
pub use host::{EntityHost, SnapshotHost};
pub use lifecycle::BridgeState;
pub use queue::UnregisterQueue;
pub use view::FlagView;

use view::BridgeShared;

/// Summary of one `on_client_tick` call.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct StepReport {
    /// Tick the step ran as. Unchanged when the bridge was not running.
    pub tick: u64,
    /// Entities stepped successfully.
    pub processed: u32,
    /// Entities whose step failed.
    pub failures: u32,
    /// Tier changes applied.
    pub tier_changes: u32,
    /// Entities flagged as teleported.
    pub teleports: u32,
    /// Deferred unregistrations applied after iteration.
    pub deferred_released: u32,
}

/// What one entity's step changed.
#[derive(Clone, Copy, Debug, Default)]
struct EntityStep {
    tier_changed: bool,
    teleported: bool,
}

/// Read-only inputs shared by every entity in one step.
struct StepContext<'a> {
    tick: u64,
    viewpoint: Option<Vec3>,
    classifier: &'a TierClassifier,
    config: &'a CullingConfig,
    shared: &'a BridgeShared,
}

impl StepContext<'_> {
    fn step(
        &self,
        slot: u32,
        record: &mut EntityRecord,
        host: &impl EntityHost,
    ) -> Result<EntityStep, StepError> {
        let snapshot = match record.pending.take() {
            Some(pushed) => pushed,
            None => host
                .snapshot(record.host_id)
                .ok_or(StepError::SnapshotUnavailable(record.host_id))?,
        };
        if !snapshot.position.is_finite() {
            return Err(StepError::NonFinitePosition(record.host_id));
        }

        let moved = record.advance(snapshot);
        let teleported = moved > self.config.bridge.teleport_distance;

        let tier = self.classifier.classify_position(
            self.viewpoint,
            record.position(),
            record.tier,
            !record.classified,
            self.tick.saturating_sub(record.last_tier_change_tick),
        );
        let tier_changed = record.set_tier(tier, self.tick);
        record.classified = true;

        if record.fault_logged {
            record.fault_logged = false;
            info!(slot, host_id = %record.host_id, "entity step recovered");
        }

        let previous = self.shared.flags.get_flags(slot);
        let mut next = self
            .config
            .policy
            .apply(tier, snapshot.remote, previous)
            .with_tier(tier);
        next.remove(FLAG_DIRTY_INBOUND);
        next.set(FLAG_TELEPORTED, teleported);
        next.set(FLAG_INTERPOLATING, !teleported && moved > 0.0);

        let authority_changed =
            (previous.bits() ^ next.bits()) & CullingPolicy::MANAGED_FLAGS != 0;
        if tier_changed || authority_changed {
            next.insert(FLAG_DIRTY_OUTBOUND);
        }
        self.shared.flags.set_flags(slot, next);

        if tier_changed {
            self.shared.metrics.record_tier_change();
        }

        Ok(EntityStep {
            tier_changed,
            teleported,
        })
    }
}

/// Entity LOD bridge.
///
/// Construct one per host world and pass it explicitly; there is no global
/// instance.
pub struct Bridge {
    /// Tuning, fixed for the bridge's lifetime.
    config: CullingConfig,
    /// Lifecycle state.
    state: BridgeState,
    /// Record per slot.
    slots: SlotAllocator<EntityRecord>,
    /// Distance-to-tier logic.
    classifier: TierClassifier,
    /// Flag words, counters and tick, shared with every `FlagView`.
    shared: Arc<BridgeShared>,
    /// Handed out through `UnregisterQueue`.
    unregister_tx: Sender<EntityId>,
    /// Drained at the end of every step.
    unregister_rx: Receiver<EntityId>,
    /// Simulation tick, incremented once per running step.
    tick: u64,
    /// Simulated seconds (sum of step `dt`).
    simulated_secs: f64,
    /// Invariant violations seen so far.
    violations: u64,
}

impl Bridge {
    /// Creates an uninitialized bridge.
    #[must_use]
    pub fn new(config: CullingConfig) -> Self {
        let capacity = config.bridge.initial_capacity;
        let (unregister_tx, unregister_rx) = crossbeam_channel::unbounded();
        Self {
            config,
            state: BridgeState::Uninitialized,
            slots: SlotAllocator::with_capacity(capacity),
            classifier: TierClassifier::new(config.tiers),
            shared: Arc::new(BridgeShared::with_len(capacity)),
            unregister_tx,
            unregister_rx,
            tick: 0,
            simulated_secs: 0.0,
            violations: 0,
        }
    }

    // =========================================================================
    // LIFECYCLE
    // =========================================================================

    /// Starts accepting registrations and steps.
    ///
    /// # Errors
    ///
    /// `InvalidTransition` unless the bridge is uninitialized.
    pub fn initialize(&mut self) -> BridgeResult<()> {
        self.state = self.state.initialize()?;
        info!(
            capacity = self.config.bridge.initial_capacity,
            "bridge initialized"
        );
        Ok(())
    }

    /// Stops stepping; registrations are kept. Idempotent.
    ///
    /// # Errors
    ///
    /// `InvalidTransition` from uninitialized or closed.
    pub fn pause(&mut self) -> BridgeResult<()> {
        self.state = self.state.pause()?;
        debug!(tick = self.tick, "bridge paused");
        Ok(())
    }

    /// Resumes stepping. Idempotent.
    ///
    /// # Errors
    ///
    /// `InvalidTransition` from uninitialized or closed.
    pub fn resume(&mut self) -> BridgeResult<()> {
        self.state = self.state.resume()?;
        debug!(tick = self.tick, "bridge resumed");
        Ok(())
    }

    /// Releases every slot and clears every flag word. Terminal.
    ///
    /// Host links still holding slots become stale; [`Bridge::sync_link`]
    /// reports them as such.
    ///
    /// # Errors
    ///
    /// `InvalidTransition` if already closed.
    pub fn close(&mut self) -> BridgeResult<()> {
        self.state = self.state.close()?;
        let released = self.slots.bound_count();
        while self.unregister_rx.try_recv().is_ok() {}
        self.slots.clear();
        self.shared.flags.clear_all();
        info!(released, tick = self.tick, "bridge closed");
        Ok(())
    }

    /// Lifecycle state.
    #[inline]
    #[must_use]
    pub const fn state(&self) -> BridgeState {
        self.state
    }

    /// Whether steps and registrations are accepted.
    #[inline]
    #[must_use]
    pub const fn is_running(&self) -> bool {
        self.state.is_running()
    }

    /// Current simulation tick.
    #[inline]
    #[must_use]
    pub const fn tick(&self) -> u64 {
        self.tick
    }

    /// Simulated seconds across every running step.
    #[inline]
    #[must_use]
    pub const fn simulated_secs(&self) -> f64 {
        self.simulated_secs
    }

    /// Tuning in use.
    #[inline]
    #[must_use]
    pub const fn config(&self) -> &CullingConfig {
        &self.config
    }

    /// Classifier state (viewpoint availability).
    #[inline]
    #[must_use]
    pub const fn classifier(&self) -> &TierClassifier {
        &self.classifier
    }

    // =========================================================================
    // REGISTRATION
    // =========================================================================

    /// Binds a host entity to a fresh slot and writes the back-reference.
    ///
    /// # Errors
    ///
    /// - `NotRunning` unless running
    /// - `AlreadyRegistered` if the link already caches a slot
    /// - `EntityNotAlive` if the snapshot is dead
    /// - `SlotSpaceExhausted` if the slot no longer fits an `i32`
    ///
    /// Nothing is mutated on error.
    pub fn try_register(
        &mut self,
        link: &mut impl BridgeCapability,
        snapshot: EntitySnapshot,
    ) -> BridgeResult<u32> {
        let host_id = link.host_id();
        if !self.state.is_running() {
            return Err(BridgeError::NotRunning(self.state));
        }
        if link.is_bridged() {
            return Err(BridgeError::AlreadyRegistered {
                host_id,
                slot: link.bridge_slot(),
            });
        }
        if !snapshot.alive {
            return Err(BridgeError::EntityNotAlive(host_id));
        }
        let next_slot = self.slots.next_free();
        let Ok(host_slot) = i32::try_from(next_slot) else {
            return Err(BridgeError::SlotSpaceExhausted(next_slot));
        };

        let (slot, generation) = self.slots.allocate();
        debug_assert_eq!(slot, next_slot);
        self.shared.flags.ensure_len(self.slots.capacity());

        let entity = EntityId::new(slot, generation);
        if let Some(record) = self.slots.get_mut(slot) {
            *record = EntityRecord::bind(host_id, entity, snapshot);
        }
        let flags = self
            .config
            .policy
            .apply(
                LodTier::Full,
                snapshot.remote,
                EntityFlags::from_bits(FLAG_REGISTERED),
            )
            .with_tier(LodTier::Full);
        self.shared.flags.set_flags(slot, flags);

        link.set_bridge_slot(host_slot);
        link.set_ecs_entity(entity);
        link.set_flags(flags.bits());

        debug!(slot, generation, %host_id, "entity registered");
        Ok(slot)
    }

    /// Sentinel form of [`Bridge::try_register`]: the slot, or [`NO_SLOT`].
    pub fn register_entity(
        &mut self,
        link: &mut impl BridgeCapability,
        snapshot: EntitySnapshot,
    ) -> i32 {
        match self.try_register(link, snapshot) {
            Ok(_) => link.bridge_slot(),
            Err(err) => {
                debug!(error = %err, "registration rejected");
                NO_SLOT
            }
        }
    }

    /// Releases the slot behind `link` and resets the link.
    ///
    /// Returns `Ok(false)` when there was nothing to release: the link is
    /// unbridged or refers to a binding that no longer exists (stale links
    /// are reset too). Works in every state.
    ///
    /// # Errors
    ///
    /// `LinkMismatch` if the slot is bound to a different host id. That is an
    /// invariant violation; debug builds panic, release builds warn and skip.
    pub fn try_unregister(&mut self, link: &mut impl BridgeCapability) -> BridgeResult<bool> {
        let Some(slot) = link.bound_slot() else {
            return Ok(false);
        };
        let entity = link.ecs_entity();
        let Some(record) = self.slots.get(slot) else {
            link.reset_link();
            return Ok(false);
        };
        if record.ecs_entity != entity {
            link.reset_link();
            return Ok(false);
        }

        let bound = record.host_id;
        let claimed = link.host_id();
        if bound != claimed {
            self.report_violation(slot, bound, claimed);
            return Err(BridgeError::LinkMismatch {
                slot,
                bound,
                claimed,
            });
        }

        self.release_slot(slot);
        link.reset_link();
        debug!(slot, host_id = %claimed, "entity unregistered");
        Ok(true)
    }

    /// Sentinel form of [`Bridge::try_unregister`]. Idempotent.
    pub fn unregister_entity(&mut self, link: &mut impl BridgeCapability) {
        if let Err(err) = self.try_unregister(link) {
            debug!(error = %err, "unregistration skipped");
        }
    }

    /// Handle for queuing unregistrations from host callbacks or other threads.
    #[must_use]
    pub fn unregister_queue(&self) -> UnregisterQueue {
        UnregisterQueue::new(self.unregister_tx.clone())
    }

    /// Pushes a snapshot for the next step to consume instead of pulling.
    ///
    /// Returns `false` if `slot` is not bound.
    pub fn update_snapshot(&mut self, slot: u32, snapshot: EntitySnapshot) -> bool {
        let Some(record) = self.slots.get_mut(slot) else {
            return false;
        };
        record.pending = Some(snapshot);
        self.shared.flags.set_flag(slot, FLAG_DIRTY_INBOUND);
        true
    }

    // =========================================================================
    // STEPPING
    // =========================================================================

    /// Runs one fixed simulation step of length `dt` seconds.
    ///
    /// No-op (empty report) unless running.
    pub fn on_client_tick(&mut self, host: &impl EntityHost, dt: f64) -> StepReport {
        if !self.state.is_running() {
            return StepReport {
                tick: self.tick,
                ..StepReport::default()
            };
        }

        self.tick += 1;
        self.simulated_secs += dt;
        let tick = self.tick;
        let viewpoint = self.classifier.observe_viewpoint(host.viewpoint(), tick);

        let mut report = StepReport {
            tick,
            ..StepReport::default()
        };
        let ctx = StepContext {
            tick,
            viewpoint,
            classifier: &self.classifier,
            config: &self.config,
            shared: &self.shared,
        };

        for slot in self.slots.bound_slots() {
            let Some(record) = self.slots.get_mut(slot) else {
                continue;
            };
            match ctx.step(slot, record, host) {
                Ok(step) => {
                    report.processed += 1;
                    report.tier_changes += u32::from(step.tier_changed);
                    report.teleports += u32::from(step.teleported);
                }
                Err(err) => {
                    report.failures += 1;
                    ctx.shared.metrics.record_failure();
                    if !record.fault_logged {
                        record.fault_logged = true;
                        warn!(slot, tick, error = %err, "entity step failed; keeping previous tier");
                    }
                }
            }
        }

        self.shared.tick.store(tick, Ordering::Release);
        report.deferred_released = self.drain_deferred();
        report
    }

    /// Updates render positions for a frame `partial` of the way to the next step.
    ///
    /// Teleported entities snap and lose `TELEPORTED`; interpolating entities
    /// blend and lose `INTERPOLATING` once `partial >= 1`. Tiers are never
    /// touched. Returns the number of blended entities.
    pub fn on_render_tick(&mut self, partial: f32) -> u32 {
        if !self.state.is_open() {
            return 0;
        }
        let mode = self.config.bridge.interpolation;
        let finished = partial.is_nan() || partial >= 1.0;
        let flags = &self.shared.flags;
        let mut blended = 0;

        for (slot, record) in self.slots.iter_mut() {
            let word = flags.get_flags(slot);
            if word.is_teleported() {
                record.render_position = record.position();
                flags.clear_flag(slot, FLAG_TELEPORTED);
            } else if word.is_interpolating() {
                record.render_position =
                    mode.render_position(record.previous_position, record.position(), partial);
                blended += 1;
                if finished {
                    flags.clear_flag(slot, FLAG_INTERPOLATING);
                }
            } else {
                record.render_position = record.position();
            }
        }
        blended
    }

    /// Slots whose tier or authority changed since the last call, clearing
    /// `DIRTY_OUTBOUND` on each.
    pub fn take_outbound_changes(&mut self) -> Vec<u32> {
        let flags = &self.shared.flags;
        self.slots
            .iter()
            .filter(|(slot, _)| flags.clear_flag(*slot, FLAG_DIRTY_OUTBOUND).is_dirty_outbound())
            .map(|(slot, _)| slot)
            .collect()
    }

    /// Copies the live flag word into the link's mirror.
    ///
    /// Returns `false` (and leaves the link alone) if the link is stale.
    pub fn sync_link(&self, link: &mut impl BridgeCapability) -> bool {
        let Some(slot) = link.bound_slot() else {
            return false;
        };
        let entity = link.ecs_entity();
        if !self.slots.is_current(slot, entity.generation()) || entity.slot() != slot {
            return false;
        }
        link.set_flags(self.shared.flags.get_flags(slot).bits());
        true
    }

    // =========================================================================
    // QUERIES
    // =========================================================================

    /// Tier of a bound slot.
    #[must_use]
    pub fn tier(&self, slot: u32) -> Option<LodTier> {
        self.slots.get(slot).map(|record| record.tier)
    }

    /// Record of a bound slot.
    #[must_use]
    pub fn record(&self, slot: u32) -> Option<&EntityRecord> {
        self.slots.get(slot)
    }

    /// Flags of `slot`.
    #[must_use]
    pub fn flags(&self, slot: u32) -> EntityFlags {
        self.shared.flags.get_flags(slot)
    }

    /// Last render position of a bound slot.
    #[must_use]
    pub fn render_position(&self, slot: u32) -> Option<Vec3> {
        self.slots.get(slot).map(|record| record.render_position)
    }

    /// Bound slot count.
    #[must_use]
    pub const fn bound_count(&self) -> usize {
        self.slots.bound_count()
    }

    /// Released slots awaiting reuse.
    #[must_use]
    pub fn free_count(&self) -> usize {
        self.slots.free_count()
    }

    /// Highest slot ever handed out, plus one.
    #[must_use]
    pub fn high_water(&self) -> usize {
        self.slots.high_water()
    }

    /// Bound slots per tier, indexed by [`LodTier::index`].
    #[must_use]
    pub fn tier_counts(&self) -> [usize; LodTier::COUNT] {
        let mut counts = [0; LodTier::COUNT];
        for (_, record) in self.slots.iter() {
            counts[record.tier.index()] += 1;
        }
        counts
    }

    /// Lock-free gating handle for host threads.
    #[must_use]
    pub fn flag_view(&self) -> FlagView {
        FlagView::new(Arc::clone(&self.shared), &self.config.policy)
    }

    /// Decision and failure counters.
    #[must_use]
    pub fn metrics(&self) -> MetricsSnapshot {
        self.metrics_handle().snapshot()
    }

    /// Starts a fresh measurement window.
    pub fn reset_metrics(&self) {
        self.metrics_handle().reset();
        info!(tick = self.tick, "culling metrics reset");
    }

    /// Invariant violations seen so far.
    #[must_use]
    pub const fn violations(&self) -> u64 {
        self.violations
    }

    // =========================================================================
    // INTERNALS
    // =========================================================================

    fn metrics_handle(&self) -> &CullingMetrics {
        &self.shared.metrics
    }

    fn release_slot(&mut self, slot: u32) {
        self.shared.flags.set_flags(slot, EntityFlags::EMPTY);
        self.slots.release(slot);
    }

    fn drain_deferred(&mut self) -> u32 {
        let mut released = 0;
        while let Ok(entity) = self.unregister_rx.try_recv() {
            let slot = entity.slot();
            if self.slots.is_current(slot, entity.generation()) {
                self.release_slot(slot);
                released += 1;
                debug!(slot, "deferred unregistration applied");
            } else {
                debug!(slot, generation = entity.generation(), "stale deferred unregistration ignored");
            }
        }
        released
    }

    fn report_violation(&mut self, slot: u32, bound: HostId, claimed: HostId) {
        self.violations += 1;
        debug_assert_eq!(
            bound, claimed,
            "slot {slot} is bound to {bound} but the link claims {claimed}"
        );
        if self.violations == 1 {
            warn!(slot, %bound, %claimed, "host link does not match slot record; skipping");
        }
    }
}

impl std::fmt::Debug for Bridge {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Bridge")
            .field("state", &self.state)
            .field("tick", &self.tick)
            .field("bound", &self.slots.bound_count())
            .finish_non_exhaustive()
    }
}
