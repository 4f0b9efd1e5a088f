//! # Shared Bridge
//!
//! Multi-threaded hosts (separate server, client and render threads) share
//! one bridge behind a single global lock. Gating reads go through the
//! bundled [`FlagView`] and never take that lock.

use std::sync::Arc;

use astralis_culling::{Bridge, FlagView, UnregisterQueue};
use parking_lot::{Mutex, MutexGuard};

/// Cloneable handle to a bridge shared across threads.
#[derive(Clone)]
pub struct SharedBridge {
    /// The bridge behind the global lock.
    inner: Arc<Mutex<Bridge>>,
    /// Lock-free gating handle.
    view: FlagView,
    /// Lock-free unregistration handle.
    queue: UnregisterQueue,
}

impl SharedBridge {
    /// Wraps `bridge`.
    #[must_use]
    pub fn new(bridge: Bridge) -> Self {
        let view = bridge.flag_view();
        let queue = bridge.unregister_queue();
        tracing::debug!(state = %bridge.state(), bound = bridge.bound_count(), "sharing bridge");
        Self {
            inner: Arc::new(Mutex::new(bridge)),
            view,
            queue,
        }
    }

    /// Takes the global lock.
    pub fn lock(&self) -> MutexGuard<'_, Bridge> {
        self.inner.lock()
    }

    /// Runs `f` under the global lock.
    pub fn with<R>(&self, f: impl FnOnce(&mut Bridge) -> R) -> R {
        f(&mut self.inner.lock())
    }

    /// Gating handle; no lock needed.
    #[must_use]
    pub fn view(&self) -> &FlagView {
        &self.view
    }

    /// Unregistration handle; no lock needed.
    #[must_use]
    pub fn unregister_queue(&self) -> &UnregisterQueue {
        &self.queue
    }
}

impl std::fmt::Debug for SharedBridge {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SharedBridge")
            .field("view", &self.view)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use astralis_culling::{BridgeCapability, CullingConfig, HostLink, SnapshotHost};
    use astralis_shared::{EntitySnapshot, HostId, Vec3};
    use std::collections::HashSet;
    use std::thread;

    #[test]
    fn test_concurrent_registration_hands_out_unique_slots() {
        let mut bridge = Bridge::new(CullingConfig::default());
        bridge.initialize().unwrap();
        let shared = SharedBridge::new(bridge);

        let handles: Vec<_> = (0..4u64)
            .map(|t| {
                let shared = shared.clone();
                thread::spawn(move || {
                    (0..250u64)
                        .map(|i| {
                            let mut link = HostLink::new(HostId(t * 1_000 + i));
                            shared.with(|b| b.register_entity(&mut link, EntitySnapshot::at(Vec3::ZERO)))
                        })
                        .collect::<Vec<_>>()
                })
            })
            .collect();

        let mut slots = HashSet::new();
        for handle in handles {
            for slot in handle.join().unwrap() {
                assert!(slot >= 0);
                assert!(slots.insert(slot), "slot {slot} handed out twice");
            }
        }
        assert_eq!(shared.lock().bound_count(), 1_000);
    }

    #[test]
    fn test_view_reads_without_lock() {
        let mut bridge = Bridge::new(CullingConfig::default());
        bridge.initialize().unwrap();
        let shared = SharedBridge::new(bridge);

        let mut host = SnapshotHost::with_viewpoint(Vec3::ZERO);
        let mut link = HostLink::new(HostId(1));
        let far = EntitySnapshot::at(Vec3::new(900.0, 0.0, 0.0));
        host.insert(HostId(1), far);

        let guard = {
            let mut bridge = shared.lock();
            bridge.register_entity(&mut link, far);
            bridge.on_client_tick(&host, 0.02);
            bridge
        };
        // Lock still held: the view must not need it.
        let slot = link.bound_slot().unwrap();
        assert!(!shared.view().should_render(slot));
        assert!(shared.unregister_queue().push_link(&mut link));
        drop(guard);

        shared.with(|b| b.on_client_tick(&host, 0.02));
        assert_eq!(shared.lock().bound_count(), 0);
    }
}
