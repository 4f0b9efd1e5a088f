//! # Culling Step Benchmark
//!
//! REQUIREMENTS:
//! - A 10k-entity step fits comfortably inside a 20 ms fixed step
//! - Gating reads through a `FlagView` stay lock-free and cheap
//!
//! Run with: `cargo bench --package astralis_culling`

#![allow(missing_docs)]

use astralis_culling::{Bridge, CullingConfig, HostLink, SnapshotHost};
use astralis_shared::{EntitySnapshot, HostId, Vec3};
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

fn populated(count: u64) -> (Bridge, SnapshotHost) {
    let mut rng = ChaCha8Rng::seed_from_u64(count);
    let mut bridge = Bridge::new(CullingConfig::default());
    bridge.initialize().expect("fresh bridge initializes");
    let mut host = SnapshotHost::with_viewpoint(Vec3::ZERO);

    for id in 0..count {
        let position = Vec3::new(
            rng.gen_range(-400.0..400.0),
            rng.gen_range(0.0..64.0),
            rng.gen_range(-400.0..400.0),
        );
        let snapshot = EntitySnapshot::at(position);
        let mut link = HostLink::new(HostId(id));
        host.insert(HostId(id), snapshot);
        bridge.register_entity(&mut link, snapshot);
    }
    (bridge, host)
}

fn bench_client_tick(c: &mut Criterion) {
    let mut group = c.benchmark_group("on_client_tick");

    for count in [1_000u64, 10_000] {
        let (mut bridge, host) = populated(count);
        group.bench_with_input(BenchmarkId::from_parameter(count), &count, |b, _| {
            b.iter(|| black_box(bridge.on_client_tick(&host, 0.02)));
        });
    }

    group.finish();
}

fn bench_gating(c: &mut Criterion) {
    let (mut bridge, host) = populated(10_000);
    bridge.on_client_tick(&host, 0.02);
    let view = bridge.flag_view();

    c.bench_function("should_run_ai_10k", |b| {
        b.iter(|| {
            let mut run = 0u32;
            for slot in 0..10_000u32 {
                run += u32::from(view.should_run_ai(black_box(slot)));
            }
            run
        });
    });
}

criterion_group!(benches, bench_client_tick, bench_gating);
criterion_main!(benches);
