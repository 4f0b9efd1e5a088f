//! Integration tests for the fixed-timestep accumulator driving a bridge.

use astralis_culling::{Bridge, CullingConfig, HostLink, SnapshotHost, TickAccumulator};
use astralis_shared::{EntitySnapshot, HostId, LodTier, Vec3};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

fn random_deltas(seed: u64, frames: usize) -> Vec<f64> {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    (0..frames)
        .map(|_| {
            if rng.gen_bool(0.05) {
                rng.gen_range(0.2..3.0)
            } else {
                rng.gen_range(0.0..0.05)
            }
        })
        .collect()
}

/// Runs a bridge with one entity walking away from the origin and returns
/// the per-frame step counts plus the tier after every frame.
fn replay(deltas: &[f64]) -> (Vec<u32>, Vec<LodTier>) {
    let config = CullingConfig::default();
    let mut bridge = Bridge::new(config);
    bridge.initialize().unwrap();

    let mut host = SnapshotHost::with_viewpoint(Vec3::ZERO);
    let mut link = HostLink::new(HostId(1));
    host.insert(HostId(1), EntitySnapshot::at(Vec3::ZERO));
    bridge.register_entity(&mut link, EntitySnapshot::at(Vec3::ZERO));

    let mut acc = TickAccumulator::new(config.timestep);
    let mut steps = Vec::new();
    let mut tiers = Vec::new();
    let mut x = 0.0f32;

    for &delta in deltas {
        let outcome = acc.advance(delta, |dt| {
            bridge.on_client_tick(&host, dt);
        });
        steps.push(outcome.steps);
        tiers.push(bridge.tier(0).unwrap());

        x += 1.5;
        host.move_to(HostId(1), Vec3::new(x, 0.0, 0.0));
    }
    (steps, tiers)
}

#[test]
fn test_replay_is_deterministic() {
    let deltas = random_deltas(42, 500);
    let first = replay(&deltas);
    let second = replay(&deltas);
    assert_eq!(first, second);
}

#[test]
fn test_step_count_never_exceeds_cap_and_backlog_stays_bounded() {
    let config = CullingConfig::default().timestep;
    let mut acc = TickAccumulator::new(config);

    for delta in random_deltas(7, 2_000) {
        let outcome = acc.advance(delta, |_| {});
        assert!(outcome.steps <= config.max_steps_per_callback);
        assert!(acc.accumulated() >= 0.0);
        assert!(
            acc.accumulated() < 2.0 * config.fixed_timestep,
            "backlog {} after delta {delta}",
            acc.accumulated()
        );
    }
    assert!(acc.total_drains() > 0);
}

#[test]
fn test_seventy_ms_frame() {
    let mut acc = TickAccumulator::default();
    let mut dts = Vec::new();
    let outcome = acc.advance(0.07, |dt| dts.push(dt));

    assert_eq!(outcome.steps, 3);
    assert_eq!(dts.len(), 3);
    assert!((acc.accumulated() - 0.01).abs() < 1e-9);
}

#[test]
fn test_steady_frames_match_wall_time() {
    let mut acc = TickAccumulator::default();
    let mut total = 0;
    // 100 frames at 60 Hz is 1.666 s, i.e. 83 whole 20 ms steps
    for _ in 0..100 {
        total += acc.advance(1.0 / 60.0, |_| {}).steps;
    }
    assert_eq!(total, 83);
    assert_eq!(acc.total_drains(), 0);
}
