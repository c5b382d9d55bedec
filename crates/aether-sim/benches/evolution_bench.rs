//! Benchmarks for locking-circuit evolution.
//!
//! Run with: cargo bench -p aether-sim

use aether_compile::{AdaptiveBraidGenerator, CircuitGenerator, compile_circuit};
use aether_ir::Statevector;
use aether_sim::{NoisyEvolution, GateNoise, ideal_unitary};
use criterion::{BenchmarkId, Criterion, black_box, criterion_group, criterion_main};
use rand::SeedableRng;
use rand::rngs::StdRng;

/// Benchmark building the unlocking unitary for growing blocks.
fn bench_ideal_unitary(c: &mut Criterion) {
    let mut group = c.benchmark_group("ideal_unitary");

    for n in &[2_usize, 4, 6, 8] {
        let lock = compile_circuit(&AdaptiveBraidGenerator::new().generate(*n, 8, 7).unwrap())
            .unwrap();
        group.bench_with_input(BenchmarkId::new("depth8", n), &lock, |b, lock| {
            b.iter(|| ideal_unitary(black_box(lock)).unwrap());
        });
    }

    group.finish();
}

/// Benchmark one noisy pass of a block through its lock.
fn bench_noisy_evolution(c: &mut Criterion) {
    let mut group = c.benchmark_group("noisy_evolution");
    let engine = NoisyEvolution::new(GateNoise::PauliTwirl { p: 0.01 });

    for n in &[2_usize, 4, 6, 8] {
        let lock = compile_circuit(&AdaptiveBraidGenerator::new().generate(*n, 8, 7).unwrap())
            .unwrap();
        let psi = Statevector::zero(*n).unwrap();
        group.bench_with_input(BenchmarkId::new("depth8", n), &lock, |b, lock| {
            let mut rng = StdRng::seed_from_u64(1);
            b.iter(|| engine.evolve(black_box(&psi), black_box(lock), &mut rng).unwrap());
        });
    }

    group.finish();
}

criterion_group!(benches, bench_ideal_unitary, bench_noisy_evolution);
criterion_main!(benches);
