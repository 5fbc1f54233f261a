//! Benchmarks for the per-frame CPU work.
//!
//! Run with: `cargo bench`

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use std::time::Duration;

use glowdust::integrate::Integrator;
use glowdust::prelude::*;
use glowdust::input::PointerState;
use glowdust::spawn::Spawner;

fn full_session(count: usize) -> Session<Canvas> {
    let viewport = Viewport::new(1280.0, 720.0, 1.0);
    let config = Config::new().with_particle_counts(count, count);
    let mut session = Session::with_seed(config, 7);
    session.start(Canvas::new(viewport), &DeviceProfile::new(viewport, false));
    session.set_pointer_position(640.0, 360.0);
    // Fill the pool before measuring
    for i in 0..count as u64 {
        session.frame(Duration::from_micros(i * 16_670));
    }
    session
}

fn bench_frame(c: &mut Criterion) {
    let mut group = c.benchmark_group("frame");

    for count in [30usize, 60, 500] {
        group.bench_with_input(BenchmarkId::new("session", count), &count, |b, &count| {
            let mut session = full_session(count);
            let mut t = Duration::ZERO;
            b.iter(|| {
                t += Duration::from_micros(16_670);
                black_box(session.frame(t))
            })
        });
    }

    group.finish();
}

fn bench_integrate(c: &mut Criterion) {
    let config = Config::default();
    let integrator = Integrator::new(&config);
    let mut spawner = Spawner::with_seed(&config, 1);
    let mut store = ParticleStore::new(10_000);
    spawner.spawn_burst(&mut store, Vec2::new(500.0, 500.0), 10_000);
    let pointer = PointerState {
        position: Vec2::new(520.0, 480.0),
        active: true,
    };

    c.bench_function("integrate_10k", |b| {
        b.iter(|| integrator.advance(black_box(&mut store), 1.0, &pointer))
    });
}

criterion_group!(benches, bench_frame, bench_integrate);
criterion_main!(benches);
