//! # LOD Soak
//!
//! Drives the engine with a synthetic host: entities wander around a moving
//! viewpoint, spawn, and die through the unregister queue while frames arrive
//! with jittered and occasionally stalled deltas.
//!
//! ```text
//! lod_soak [entities] [frames] [config.toml]
//! ```
//!
//! Same arguments, same output. The run is seeded.

use astralis::culling::{BridgeCapability, CullingConfig, HostLink, SnapshotHost};
use astralis::shared::{EntitySnapshot, HostId, Vec3};
use astralis::HostLoop;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

/// Seed for every random decision in the run.
const SEED: u64 = 0xA57_2A11;

/// World half-extent on the x/z plane.
const WORLD_EXTENT: f32 = 400.0;

/// Chance per frame that a given entity dies.
const DEATH_CHANCE: f64 = 0.002;

/// Parsed command line.
struct SoakArgs {
    entities: u64,
    frames: u64,
    config: CullingConfig,
}

fn parse_args() -> Result<SoakArgs, String> {
    let mut args = std::env::args().skip(1);
    let entities = match args.next() {
        Some(text) => text.parse().map_err(|e| format!("bad entity count '{text}': {e}"))?,
        None => 1_000,
    };
    let frames = match args.next() {
        Some(text) => text.parse().map_err(|e| format!("bad frame count '{text}': {e}"))?,
        None => 600,
    };
    let config = match args.next() {
        Some(path) => CullingConfig::from_file(&path).map_err(|e| format!("{path}: {e}"))?,
        None => CullingConfig::default(),
    };
    Ok(SoakArgs {
        entities,
        frames,
        config,
    })
}

fn random_position(rng: &mut ChaCha8Rng) -> Vec3 {
    Vec3::new(
        rng.gen_range(-WORLD_EXTENT..WORLD_EXTENT),
        0.0,
        rng.gen_range(-WORLD_EXTENT..WORLD_EXTENT),
    )
}

/// Spawns one entity into both the host and the engine.
fn spawn(
    host_loop: &mut HostLoop,
    host: &mut SnapshotHost,
    rng: &mut ChaCha8Rng,
    id: u64,
) -> Option<HostLink> {
    let mut link = HostLink::new(HostId(id));
    let mut snapshot = EntitySnapshot::at(random_position(rng));
    if rng.gen_bool(0.1) {
        snapshot = snapshot.remote();
    }
    host.insert(link.host_id, snapshot);
    host_loop.bridge_mut().register_entity(&mut link, snapshot);
    link.is_bridged().then_some(link)
}

fn frame_delta(rng: &mut ChaCha8Rng) -> f64 {
    if rng.gen_bool(0.01) {
        // Stall: loading screen, GC pause, debugger.
        rng.gen_range(0.3..2.0)
    } else {
        1.0 / 60.0 + rng.gen_range(-0.004..0.004)
    }
}

fn main() {
    let args = match parse_args() {
        Ok(args) => args,
        Err(e) => {
            eprintln!("   ✗ FATAL: {e}");
            eprintln!("     usage: lod_soak [entities] [frames] [config.toml]");
            std::process::exit(1);
        }
    };

    println!("╔══════════════════════════════════════════════════════════════════╗");
    println!("║           ASTRALIS LOD SOAK                                      ║");
    println!("║           Spawn → Wander → Classify → Die                        ║");
    println!("╚══════════════════════════════════════════════════════════════════╝");
    println!();

    let mut host_loop = match HostLoop::new(args.config) {
        Ok(host_loop) => host_loop,
        Err(e) => {
            eprintln!("   ✗ FATAL: bridge failed to start: {e}");
            std::process::exit(1);
        }
    };

    let mut rng = ChaCha8Rng::seed_from_u64(SEED);
    let mut host = SnapshotHost::with_viewpoint(Vec3::ZERO);
    let mut live: Vec<HostLink> = Vec::new();
    let mut dying: Vec<(HostId, u32)> = Vec::new();
    let mut next_id = 0u64;

    for _ in 0..args.entities {
        next_id += 1;
        if let Some(link) = spawn(&mut host_loop, &mut host, &mut rng, next_id) {
            live.push(link);
        }
    }
    println!("Spawned {} entities, running {} frames...", live.len(), args.frames);

    let queue = host_loop.bridge().unregister_queue();
    let mut total_steps = 0u64;
    let mut total_changes = 0u64;
    let mut total_released = 0u64;
    let mut total_failures = 0u64;
    let mut peak_steps = 0u32;
    let mut drained_frames = 0u64;
    let mut deaths = 0u64;
    let mut outbound_writes = 0u64;
    let mut viewpoint = Vec3::ZERO;

    for frame in 0..args.frames {
        // The viewpoint orbits slowly so entities cross band edges.
        #[allow(clippy::cast_precision_loss)]
        let angle = frame as f32 * 0.01;
        viewpoint = Vec3::new(angle.cos() * 120.0, 0.0, angle.sin() * 120.0);
        host.viewpoint = Some(viewpoint);

        for link in &live {
            let step = Vec3::new(rng.gen_range(-0.5..0.5), 0.0, rng.gen_range(-0.5..0.5));
            if let Some(snapshot) = host.entities.get(&link.host_id) {
                let moved = snapshot.position + step;
                host.move_to(link.host_id, moved);
            }
        }

        // Deaths go through the queue the way a host event handler would.
        let mut index = 0;
        while index < live.len() {
            if rng.gen_bool(DEATH_CHANCE) {
                let mut link = live.swap_remove(index);
                if let Some(slot) = link.bound_slot() {
                    if queue.push_link(&mut link) {
                        dying.push((link.host_id, slot));
                        deaths += 1;
                    }
                }
            } else {
                index += 1;
            }
        }

        let report = host_loop.frame_with_delta(&host, frame_delta(&mut rng));
        total_steps += u64::from(report.steps);
        total_changes += u64::from(report.tier_changes);
        total_released += u64::from(report.deferred_released);
        total_failures += u64::from(report.failures);
        peak_steps = peak_steps.max(report.steps);
        drained_frames += u64::from(report.drained);

        // Keep a dead entity's snapshot until the engine has let go of it.
        let bridge = host_loop.bridge();
        dying.retain(|(host_id, slot)| {
            let held = bridge.record(*slot).is_some_and(|r| r.host_id == *host_id);
            if !held {
                host.remove(*host_id);
            }
            held
        });

        // Respawn to keep the population roughly stable.
        while (live.len() as u64) < args.entities && rng.gen_bool(0.5) {
            next_id += 1;
            match spawn(&mut host_loop, &mut host, &mut rng, next_id) {
                Some(link) => live.push(link),
                None => break,
            }
        }

        // A real host would push each changed flag word back to its entity.
        outbound_writes += host_loop.bridge_mut().take_outbound_changes().len() as u64;
    }

    let report = host_loop.report();

    println!();
    println!("╔══════════════════════════════════════════════════════════════════╗");
    println!("║                    SOAK RESULTS                                  ║");
    println!("╚══════════════════════════════════════════════════════════════════╝");
    println!();
    println!("┌─ TIMING ─────────────────────────────────────────────────────────┐");
    println!("│ Frames:             {}                                          ", host_loop.frame_count());
    println!("│ Fixed Steps:        {total_steps}                                          ");
    println!("│ Peak Steps/Frame:   {peak_steps}                                            ");
    println!("│ Overloaded Frames:  {drained_frames}                                            ");
    println!("│ Simulated Time:     {:.2}s                                      ", report.simulated_secs);
    println!("└──────────────────────────────────────────────────────────────────┘");
    println!();
    println!("┌─ POPULATION ─────────────────────────────────────────────────────┐");
    println!("│ Live Entities:      {}                                          ", report.bound);
    println!("│ Deaths Queued:      {deaths}                                          ");
    println!("│ Deferred Releases:  {total_released}                                          ");
    println!("│ Tier Changes:       {total_changes}                                          ");
    println!("│ Outbound Writes:    {outbound_writes}                                          ");
    println!("│ Failed Steps:       {total_failures}                                            ");
    println!("│ Final Viewpoint:    ({:.1}, {:.1})                              ", viewpoint.x, viewpoint.z);
    println!("└──────────────────────────────────────────────────────────────────┘");
    println!();

    for command in ["status", "stats", "cache"] {
        match host_loop.command(command) {
            Ok(text) => println!("> {command}\n{text}\n"),
            Err(e) => eprintln!("   ⚠ {command}: {e}"),
        }
    }

    if report.violations > 0 || total_failures > 0 {
        println!("✗ SOAK FAILED: {} violations, {total_failures} failed steps", report.violations);
        std::process::exit(1);
    }
    println!("✓ SOAK PASSED");
}
