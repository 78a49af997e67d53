//! Benchmarks for logo generation
//!
//! Covers the full pipeline across canvas sizes, the rarity effect
//! stages, and seed claims from a populated pool.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use pixel_forge::{
    generation::{GeneratorSettings, LogoGenerator},
    rarity::{apply_effects, RarityTier},
    seeds::{ExclusiveSeedPool, MemorySeedStore, PoolConfig},
};

/// Benchmark the full generation pipeline at different canvas sizes
fn bench_generate(c: &mut Criterion) {
    let mut group = c.benchmark_group("generate");

    for (width, height) in [(256u32, 128u32), (512, 256), (1024, 512)] {
        let generator = LogoGenerator::new(GeneratorSettings { width, height }).unwrap();
        group.throughput(Throughput::Elements(u64::from(width * height)));
        group.bench_with_input(
            BenchmarkId::new("canvas", format!("{width}x{height}")),
            &generator,
            |b, generator| b.iter(|| generator.generate(black_box("Pixel Forge"), Some(42))),
        );
    }

    group.finish();
}

/// Benchmark rarity effects on a default-size artifact
fn bench_effects(c: &mut Criterion) {
    let mut group = c.benchmark_group("rarity_effects");
    let logo = LogoGenerator::default().generate("Nike", Some(42)).unwrap();

    for tier in RarityTier::ALL {
        group.bench_with_input(BenchmarkId::from_parameter(tier), &tier, |b, tier| {
            b.iter(|| apply_effects(black_box(&logo.artifact), *tier))
        });
    }

    group.finish();
}

/// Benchmark claiming seeds until a pool is empty
fn bench_claims(c: &mut Criterion) {
    c.bench_function("claim_1000", |b| {
        b.iter_batched(
            || {
                let pool = ExclusiveSeedPool::new(
                    MemorySeedStore::new(),
                    PoolConfig {
                        total: 1000,
                        ..Default::default()
                    },
                );
                pool.initialize().unwrap();
                pool
            },
            |pool| {
                while pool.consume_next(None).unwrap().is_some() {}
            },
            criterion::BatchSize::LargeInput,
        )
    });
}

criterion_group!(benches, bench_generate, bench_effects, bench_claims);
criterion_main!(benches);
