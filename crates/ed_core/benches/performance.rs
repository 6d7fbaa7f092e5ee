//! Performance benchmarks for ed_core using Criterion.rs.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use ed_core::distributions::DurationDistribution;
use ed_core::station::StationConfig;
use ed_core::{EdConfig, EmergencyDepartment};
use rand::rngs::StdRng;
use rand::SeedableRng;

fn bench_replication(c: &mut Criterion) {
    let horizons = vec![("day", 1_440.0), ("week", 10_080.0), ("month", 43_200.0)];

    let mut group = c.benchmark_group("replication");
    for (name, until) in horizons {
        group.bench_with_input(BenchmarkId::from_parameter(name), &until, |b, &until| {
            b.iter(|| {
                let mut ed =
                    EmergencyDepartment::new(&EdConfig::default(), Some(42)).expect("valid");
                black_box(ed.run(until).expect("run"));
            });
        });
    }
    group.finish();
}

fn bench_station_queue(c: &mut Criterion) {
    use bevy_ecs::prelude::Entity;

    let config = StationConfig::new(
        "Bench Lab",
        4,
        DurationDistribution::exponential_mean(5.0),
        1.0,
    );

    c.bench_function("station_request_release_1000", |b| {
        b.iter(|| {
            let mut station = config.attach().expect("valid");
            for i in 0..1_000u32 {
                station.request_service(Entity::from_raw(i), i as f64);
            }
            for i in 0..1_000u32 {
                black_box(station.release(1_000.0 + i as f64).expect("busy"));
            }
        });
    });
}

fn bench_sampling(c: &mut Criterion) {
    let sampler = DurationDistribution::Normal { mean: 5.0, std: 2.0 }
        .sampler("bench")
        .expect("valid");
    let mut rng = StdRng::seed_from_u64(7);
    c.bench_function("normal_sample_clamped", |b| {
        b.iter(|| black_box(sampler.sample(&mut rng)));
    });
}

criterion_group!(benches, bench_replication, bench_station_queue, bench_sampling);
criterion_main!(benches);
