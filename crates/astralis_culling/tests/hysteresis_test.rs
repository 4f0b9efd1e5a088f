//! Integration tests for tier stability at band edges.

use astralis_culling::{Bridge, CullingConfig, HostLink, SnapshotHost, TierBands, TierClassifier};
use astralis_shared::{EntitySnapshot, HostId, LodTier, Vec3};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

#[test]
fn test_monotonic_retreat_never_refines() {
    let classifier = TierClassifier::new(TierBands {
        min_dwell_ticks: 0,
        ..TierBands::default()
    });

    let mut tier = classifier.classify(0.0, LodTier::Full, true, 0);
    let mut distance = 0.0f32;
    while distance < 400.0 {
        let next = classifier.classify(distance, tier, false, u64::MAX);
        assert!(next >= tier, "{tier} -> {next} at {distance}");
        tier = next;
        distance += 0.37;
    }
    assert_eq!(tier, LodTier::Aggressive);
}

#[test]
fn test_monotonic_approach_never_coarsens() {
    let classifier = TierClassifier::new(TierBands::default());

    let mut tier = classifier.classify(400.0, LodTier::Full, true, 0);
    let mut distance = 400.0f32;
    while distance > 0.0 {
        let next = classifier.classify(distance, tier, false, u64::MAX);
        assert!(next <= tier, "{tier} -> {next} at {distance}");
        tier = next;
        distance -= 0.37;
    }
    assert_eq!(tier, LodTier::Full);
}

#[test]
fn test_jitter_inside_margin_never_flaps() {
    let mut rng = ChaCha8Rng::seed_from_u64(99);
    let bands = TierBands::default();
    let classifier = TierClassifier::new(bands);

    for edge in bands.thresholds() {
        let band = edge * bands.hysteresis * 0.9;
        for start in [LodTier::Full, LodTier::Aggressive] {
            let mut tier = classifier.classify(edge, start, true, 0);
            let settled = tier;
            for _ in 0..1_000 {
                let distance = edge + rng.gen_range(-band..band);
                tier = classifier.classify(distance, tier, false, u64::MAX);
                assert_eq!(tier, settled, "flapped near edge {edge} at {distance}");
            }
        }
    }
}

#[test]
fn test_bridge_tier_changes_once_per_crossing() {
    let mut bridge = Bridge::new(CullingConfig::default());
    bridge.initialize().unwrap();
    let mut host = SnapshotHost::with_viewpoint(Vec3::ZERO);
    let mut link = HostLink::new(HostId(1));
    host.insert(HostId(1), EntitySnapshot::at(Vec3::new(10.0, 0.0, 0.0)));
    bridge.register_entity(&mut link, EntitySnapshot::at(Vec3::new(10.0, 0.0, 0.0)));

    // Hover around the 16-unit edge, then cross it for good.
    let path = [15.5, 16.5, 15.2, 17.0, 15.9, 16.8, 30.0, 30.0, 30.0, 30.0, 30.0];
    let mut changes = 0;
    for x in path {
        host.move_to(HostId(1), Vec3::new(x, 0.0, 0.0));
        changes += bridge.on_client_tick(&host, 0.02).tier_changes;
    }
    assert_eq!(changes, 1);
    assert_eq!(bridge.tier(0), Some(LodTier::Moderate));
    assert_eq!(bridge.metrics().tier_changes, 1);
}

#[test]
fn test_dwell_blocks_immediate_reversal() {
    let mut bridge = Bridge::new(CullingConfig::default());
    bridge.initialize().unwrap();
    let mut host = SnapshotHost::with_viewpoint(Vec3::ZERO);
    let mut link = HostLink::new(HostId(1));
    host.insert(HostId(1), EntitySnapshot::at(Vec3::new(100.0, 0.0, 0.0)));
    bridge.register_entity(&mut link, EntitySnapshot::at(Vec3::new(100.0, 0.0, 0.0)));

    bridge.on_client_tick(&host, 0.02);
    assert_eq!(bridge.tier(0), Some(LodTier::Minimal));
    let changed_at = bridge.record(0).unwrap().last_tier_change_tick;

    host.move_to(HostId(1), Vec3::new(1.0, 0.0, 0.0));
    let dwell = bridge.config().tiers.min_dwell_ticks;
    for _ in 1..dwell {
        bridge.on_client_tick(&host, 0.02);
        assert_eq!(bridge.tier(0), Some(LodTier::Minimal));
    }
    bridge.on_client_tick(&host, 0.02);
    assert_eq!(bridge.tier(0), Some(LodTier::Full));
    assert_eq!(bridge.record(0).unwrap().last_tier_change_tick, changed_at + dwell);
}
