//! Field-of-view benchmarks.
//!
//! Run with: cargo bench --bench fov

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use rand::rngs::StdRng;
use rand::SeedableRng;

use tombs::data::DataManager;
use tombs::ecs::Position;
use tombs::world::{compute_fov, DungeonGenerator, GameMap, GenerationParams, RoomsGenerator};

fn bench_open_arena(c: &mut Criterion) {
    let mut group = c.benchmark_group("fov_open_arena");
    let map = GameMap::open_arena(80, 43, 1);

    for radius in [4, 8, 16].iter() {
        group.bench_with_input(BenchmarkId::from_parameter(radius), radius, |b, &radius| {
            b.iter(|| black_box(compute_fov(black_box(&map), map.entry, radius)));
        });
    }

    group.finish();
}

fn bench_generated_floor(c: &mut Criterion) {
    let data = DataManager::default();
    let params = GenerationParams::from_config(&data.config, 1);
    let mut rng = StdRng::seed_from_u64(42);
    let generated = match RoomsGenerator.generate(&params, &data, &mut rng) {
        Ok(generated) => generated,
        Err(e) => panic!("generation failed: {}", e),
    };
    let origin: Position = generated.player_start;

    c.bench_function("fov_generated_floor", |b| {
        b.iter(|| black_box(compute_fov(black_box(&generated.map), origin, 8)));
    });
}

criterion_group!(benches, bench_open_arena, bench_generated_floor);
criterion_main!(benches);
