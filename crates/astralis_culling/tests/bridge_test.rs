//! Integration tests for bridge registration, stepping and reporting.

use std::collections::HashMap;

use astralis_culling::{
    run_command, Bridge, BridgeCapability, CullingConfig, EntityHost, HostLink, SnapshotHost,
    UnregisterQueue,
};
use astralis_core::EntityId;
use astralis_shared::{EntitySnapshot, HostId, LodTier, Vec3, NO_SLOT};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

fn running_bridge() -> Bridge {
    let mut bridge = Bridge::new(CullingConfig::default());
    bridge.initialize().unwrap();
    bridge
}

fn at(x: f32) -> EntitySnapshot {
    EntitySnapshot::at(Vec3::new(x, 0.0, 0.0))
}

#[test]
fn test_three_band_scenario_status() {
    let mut bridge = running_bridge();
    let mut host = SnapshotHost::with_viewpoint(Vec3::ZERO);
    let mut links = Vec::new();

    for (id, distance) in [(1, 2.0), (2, 50.0), (3, 500.0)] {
        let mut link = HostLink::new(HostId(id));
        host.insert(HostId(id), at(distance));
        assert_ne!(bridge.register_entity(&mut link, at(distance)), NO_SLOT);
        links.push(link);
    }

    bridge.on_client_tick(&host, 0.02);

    assert_eq!(
        run_command(&bridge, "status").unwrap(),
        "FULL:1 MODERATE:1 AGGRESSIVE:1 total:3"
    );
    assert_eq!(bridge.tier(links[0].bound_slot().unwrap()), Some(LodTier::Full));
    assert_eq!(bridge.tier(links[1].bound_slot().unwrap()), Some(LodTier::Moderate));
    assert_eq!(bridge.tier(links[2].bound_slot().unwrap()), Some(LodTier::Aggressive));
}

#[test]
fn test_slot_uniqueness_under_random_churn() {
    let mut rng = ChaCha8Rng::seed_from_u64(0x5EED);
    let mut bridge = running_bridge();
    let mut live: Vec<HostLink> = Vec::new();
    let mut next_id = 0u64;

    for _ in 0..2_000 {
        if live.is_empty() || rng.gen_bool(0.6) {
            next_id += 1;
            let mut link = HostLink::new(HostId(next_id));
            let expected = (0..)
                .find(|slot| bridge.record(*slot).is_none())
                .unwrap();
            let slot = bridge.register_entity(&mut link, at(rng.gen_range(0.0..400.0)));
            assert_eq!(u32::try_from(slot).unwrap(), expected, "lowest free slot reused first");
            live.push(link);
        } else {
            let idx = rng.gen_range(0..live.len());
            let mut link = live.swap_remove(idx);
            bridge.unregister_entity(&mut link);
            assert_eq!(link.bridge_slot(), NO_SLOT);
        }

        let mut seen = HashMap::new();
        for link in &live {
            let slot = link.bound_slot().unwrap();
            assert!(seen.insert(slot, link.host_id).is_none(), "slot {slot} bound twice");
            assert_eq!(bridge.record(slot).map(|r| r.host_id), Some(link.host_id));
            assert!(bridge.flags(slot).is_registered());
        }
        assert_eq!(bridge.bound_count(), live.len());
    }

    for slot in 0..u32::try_from(bridge.high_water()).unwrap() {
        assert_eq!(bridge.flags(slot).is_registered(), bridge.record(slot).is_some());
    }
}

#[test]
fn test_unregister_twice_equals_once() {
    let mut bridge = running_bridge();
    let mut a = HostLink::new(HostId(1));
    let mut b = HostLink::new(HostId(2));
    bridge.register_entity(&mut a, at(0.0));
    bridge.register_entity(&mut b, at(0.0));

    bridge.unregister_entity(&mut a);
    let after_once = (bridge.bound_count(), bridge.free_count(), bridge.flags(0));
    bridge.unregister_entity(&mut a);
    let after_twice = (bridge.bound_count(), bridge.free_count(), bridge.flags(0));

    assert_eq!(after_once, after_twice);
    assert!(bridge.flags(1).is_registered());
}

/// Host that kills selected entities from inside the step, the way a death
/// event handler would.
struct DyingHost {
    inner: SnapshotHost,
    queue: UnregisterQueue,
    doomed: HashMap<HostId, EntityId>,
}

impl EntityHost for DyingHost {
    fn viewpoint(&self) -> Option<Vec3> {
        self.inner.viewpoint()
    }

    fn snapshot(&self, host_id: HostId) -> Option<EntitySnapshot> {
        if let Some(entity) = self.doomed.get(&host_id) {
            // Queued twice on purpose: the second entry must be ignored.
            self.queue.push(*entity);
            self.queue.push(*entity);
        }
        self.inner.snapshot(host_id)
    }
}

#[test]
fn test_unregister_from_inside_step_is_deferred() {
    let mut bridge = running_bridge();
    let mut inner = SnapshotHost::with_viewpoint(Vec3::ZERO);
    let mut links: Vec<HostLink> = (1..=4).map(|id| HostLink::new(HostId(id))).collect();
    for link in &mut links {
        inner.insert(link.host_id, at(10.0));
        bridge.register_entity(link, at(10.0));
    }

    let host = DyingHost {
        inner,
        queue: bridge.unregister_queue(),
        doomed: [(links[1].host_id, links[1].ecs_entity)].into_iter().collect(),
    };

    let report = bridge.on_client_tick(&host, 0.02);

    // Every entity was still stepped; the release happened afterwards.
    assert_eq!(report.processed, 4);
    assert_eq!(report.deferred_released, 1);
    assert_eq!(bridge.bound_count(), 3);
    assert!(bridge.record(1).is_none());
    assert!(!bridge.flags(1).is_registered());

    // The old link is stale now: unregistering through it changes nothing.
    let mut stale = links[1];
    assert_eq!(bridge.try_unregister(&mut stale), Ok(false));
    assert_eq!(bridge.bound_count(), 3);
}

#[test]
fn test_queue_from_another_thread() {
    let mut bridge = running_bridge();
    let host = SnapshotHost::with_viewpoint(Vec3::ZERO);
    let mut link = HostLink::new(HostId(9));
    bridge.register_entity(&mut link, at(0.0));

    let queue = bridge.unregister_queue();
    let pushed = std::thread::spawn(move || queue.push_link(&mut link))
        .join()
        .unwrap();
    assert!(pushed);
    assert_eq!(bridge.bound_count(), 1);

    // Paused steps do nothing, including the drain.
    bridge.pause().unwrap();
    bridge.on_client_tick(&host, 0.02);
    assert_eq!(bridge.bound_count(), 1);

    bridge.resume().unwrap();
    assert_eq!(bridge.on_client_tick(&host, 0.02).deferred_released, 1);
    assert_eq!(bridge.bound_count(), 0);
}

#[test]
fn test_missing_viewpoint_fails_open_to_full() {
    let mut bridge = running_bridge();
    let mut host = SnapshotHost::with_viewpoint(Vec3::ZERO);
    let mut link = HostLink::new(HostId(1));
    host.insert(HostId(1), at(1_000.0));
    bridge.register_entity(&mut link, at(1_000.0));

    bridge.on_client_tick(&host, 0.02);
    assert_eq!(bridge.tier(0), Some(LodTier::Aggressive));

    host.viewpoint = None;
    for _ in 0..3 {
        bridge.on_client_tick(&host, 0.02);
        assert_eq!(bridge.tier(0), Some(LodTier::Full));
        assert!(!bridge.flags(0).is_ai_culled());
        assert!(!bridge.flags(0).is_render_culled());
    }
    assert!(bridge.classifier().viewpoint_lost());
    assert_eq!(bridge.classifier().lost_episodes(), 1);

    host.viewpoint = Some(Vec3::ZERO);
    for _ in 0..10 {
        bridge.on_client_tick(&host, 0.02);
    }
    assert_eq!(bridge.tier(0), Some(LodTier::Aggressive));
    assert!(!bridge.classifier().viewpoint_lost());
}

#[test]
fn test_non_finite_position_is_isolated() {
    let mut bridge = running_bridge();
    let mut host = SnapshotHost::with_viewpoint(Vec3::ZERO);
    let mut bad = HostLink::new(HostId(1));
    let mut good = HostLink::new(HostId(2));
    host.insert(HostId(1), at(2.0));
    host.insert(HostId(2), at(300.0));
    bridge.register_entity(&mut bad, at(2.0));
    bridge.register_entity(&mut good, at(300.0));

    host.move_to(HostId(1), Vec3::new(f32::NAN, 0.0, 0.0));
    for _ in 0..3 {
        let report = bridge.on_client_tick(&host, 0.02);
        assert_eq!(report.failures, 1);
        assert_eq!(report.processed, 1);
    }
    assert_eq!(bridge.tier(0), Some(LodTier::Full));
    assert_eq!(bridge.tier(1), Some(LodTier::Aggressive));
    assert_eq!(bridge.metrics().failed_steps, 3);

    host.move_to(HostId(1), Vec3::new(3.0, 0.0, 0.0));
    assert_eq!(bridge.on_client_tick(&host, 0.02).failures, 0);
    assert!(bridge.record(0).is_some_and(|r| !r.fault_logged));
}

#[test]
fn test_flag_view_gates_by_tier() {
    let mut bridge = running_bridge();
    let mut host = SnapshotHost::with_viewpoint(Vec3::ZERO);
    let mut near = HostLink::new(HostId(1));
    let mut far = HostLink::new(HostId(2));
    host.insert(HostId(1), at(1.0));
    host.insert(HostId(2), at(900.0));
    bridge.register_entity(&mut near, at(1.0));
    bridge.register_entity(&mut far, at(900.0));
    bridge.on_client_tick(&host, 0.02);

    let view = bridge.flag_view();
    let render_view = view.clone();
    let (near_slot, far_slot) = (near.bound_slot().unwrap(), far.bound_slot().unwrap());

    assert!(view.should_run_ai(near_slot));
    assert!(!view.should_run_ai(far_slot));
    assert!(std::thread::spawn(move || render_view.should_render(near_slot) && !render_view.should_render(far_slot))
        .join()
        .unwrap());
    assert!(view.ecs_owns_physics(far_slot));
    assert_eq!(view.tier(far_slot), Some(LodTier::Aggressive));

    let metrics = bridge.metrics();
    assert_eq!(metrics.decisions, 4);
    assert_eq!(metrics.skipped, 2);
    assert!(run_command(&bridge, "cache").unwrap().contains("(50.0%)"));
}

#[test]
fn test_remote_entity_never_owns_physics() {
    let mut bridge = running_bridge();
    let mut host = SnapshotHost::with_viewpoint(Vec3::ZERO);
    let mut link = HostLink::new(HostId(1));
    let snapshot = at(900.0).remote();
    host.insert(HostId(1), snapshot);
    bridge.register_entity(&mut link, snapshot);

    bridge.on_client_tick(&host, 0.02);
    assert_eq!(bridge.tier(0), Some(LodTier::Aggressive));
    assert!(!bridge.flags(0).ecs_owns_physics());
}
