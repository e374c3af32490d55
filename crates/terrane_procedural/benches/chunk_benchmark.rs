//! Benchmark for chunk generation.
//!
//! Run with: cargo bench --package terrane_procedural --bench chunk_benchmark

use criterion::{black_box, criterion_group, criterion_main, Criterion, Throughput};
use terrane_procedural::batch::{generate_batch, BatchProgress};
use terrane_procedural::biome::BiomeClassifier;
use terrane_procedural::chunk::ChunkCoord;
use terrane_procedural::generator::{ChunkGenerator, WorldGenerator};
use terrane_procedural::noise::WorldSeed;
use terrane_procedural::platformer::{PlatformerGenerator, PlatformerSettings};

fn benchmark_single_chunk(c: &mut Criterion) {
    let gen = ChunkGenerator::new(WorldSeed::new(42));

    c.bench_function("single_chunk_generation", |b| {
        let mut coord = 0i32;
        b.iter(|| {
            coord = coord.wrapping_add(1);
            black_box(gen.generate(ChunkCoord::new(coord, coord / 2)))
        });
    });
}

fn benchmark_chunk_grid(c: &mut Criterion) {
    let gen = ChunkGenerator::new(WorldSeed::new(42));

    let mut group = c.benchmark_group("chunk_grid");
    group.sample_size(10);

    // 8x8 chunks = 128x128 columns
    group.throughput(Throughput::Elements(8 * 8));
    group.bench_function("8x8_chunks", |b| {
        b.iter(|| {
            for z in 0..8 {
                for x in 0..8 {
                    black_box(gen.generate(ChunkCoord::new(x, z)));
                }
            }
        });
    });

    group.finish();
}

fn benchmark_batch(c: &mut Criterion) {
    let gen = WorldGenerator::from(ChunkGenerator::new(WorldSeed::new(42)));
    let coords: Vec<ChunkCoord> = (0..64).map(|i| ChunkCoord::new(i % 8, i / 8)).collect();

    let mut group = c.benchmark_group("batch");
    group.sample_size(10);
    group.throughput(Throughput::Elements(coords.len() as u64));

    for workers in [1, 4] {
        group.bench_function(format!("64_chunks_{workers}_workers"), |b| {
            b.iter(|| {
                let progress = BatchProgress::new();
                black_box(generate_batch(&gen, &coords, workers, &progress))
            });
        });
    }

    group.finish();
}

fn benchmark_platformer_chunk(c: &mut Criterion) {
    let gen = WorldGenerator::from(
        PlatformerGenerator::new(WorldSeed::new(42), PlatformerSettings::default())
            .expect("default platformer settings are valid"),
    );

    c.bench_function("platformer_chunk_generation", |b| {
        let mut x = 0i32;
        b.iter(|| {
            x = x.wrapping_add(1);
            black_box(gen.generate(ChunkCoord::new(x, 0)))
        });
    });
}

fn benchmark_biome_lookup(c: &mut Criterion) {
    let classifier = BiomeClassifier::new(WorldSeed::new(42));

    c.bench_function("biome_at", |b| {
        let mut x = 0i32;
        b.iter(|| {
            x = x.wrapping_add(1);
            black_box(classifier.biome_at(black_box(x), black_box(x / 3)))
        });
    });

    c.bench_function("blended_properties_radius_64", |b| {
        let mut x = 0i32;
        b.iter(|| {
            x = x.wrapping_add(7);
            black_box(classifier.blended_properties_at(
                black_box(x),
                black_box(x / 3),
                BiomeClassifier::DEFAULT_BLEND_RADIUS,
            ))
        });
    });
}

criterion_group!(
    benches,
    benchmark_single_chunk,
    benchmark_chunk_grid,
    benchmark_batch,
    benchmark_platformer_chunk,
    benchmark_biome_lookup
);
criterion_main!(benches);
