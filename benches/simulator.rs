//! Benchmarks for the alliance simulator and one search generation.

use criterion::{BenchmarkId, Criterion, black_box, criterion_group, criterion_main};

use alliance_ga::{
    compute::{AllianceSimulator, evolution::{EvolutionEngine, GenomeRng}},
    schema::{EvolutionConfig, MatchConfig, ParameterBounds},
};

fn bench_simulate(c: &mut Criterion) {
    let mut group = c.benchmark_group("simulate");
    let genome = GenomeRng::new(42).random_genome(&ParameterBounds::default());

    for step_duration in [0.5f32, 0.25, 0.1] {
        let simulator = AllianceSimulator::new(MatchConfig {
            match_duration: 135.0,
            step_duration,
        });

        group.bench_with_input(
            BenchmarkId::new("untraced", step_duration),
            &step_duration,
            |b, _| b.iter(|| simulator.simulate(black_box(&genome), false)),
        );
        group.bench_with_input(
            BenchmarkId::new("traced", step_duration),
            &step_duration,
            |b, _| b.iter(|| simulator.simulate(black_box(&genome), true)),
        );
    }

    group.finish();
}

fn bench_generation(c: &mut Criterion) {
    let mut group = c.benchmark_group("evolution");
    group.sample_size(10);

    for population_size in [20, 40, 80] {
        let config = EvolutionConfig {
            population_size,
            generations: 1,
            random_seed: Some(42),
            ..Default::default()
        };

        group.bench_with_input(
            BenchmarkId::from_parameter(population_size),
            &population_size,
            |b, _| {
                b.iter(|| {
                    let mut engine = EvolutionEngine::new(config.clone()).unwrap();
                    black_box(engine.run())
                });
            },
        );
    }

    group.finish();
}

criterion_group!(benches, bench_simulate, bench_generation);
criterion_main!(benches);
