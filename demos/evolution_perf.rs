//! Quick evolution performance test

use alliance_ga::{
    EvolutionConfig, EvolutionEngine,
    schema::{MatchConfig, Role},
};
use std::time::Instant;

fn main() {
    println!("=== Evolution Performance Test ===\n");

    // Test different time resolutions
    for step_duration in [0.5, 0.25, 0.1] {
        println!("Step duration: {}s", step_duration);

        let config = EvolutionConfig {
            match_config: MatchConfig {
                match_duration: 135.0,
                step_duration,
            },
            population_size: 40,
            generations: 20,
            random_seed: Some(42),
            ..Default::default()
        };

        let start = Instant::now();
        let mut engine = EvolutionEngine::new(config).expect("valid config");
        let result = engine.run();
        let elapsed = start.elapsed();

        let total_evals = result.stats.total_evaluations;
        let evals_per_sec = total_evals as f64 / elapsed.as_secs_f64();

        println!("  Generations:    {}", result.stats.generations);
        println!("  Evaluations:    {}", total_evals);
        println!("  Elapsed:        {:.2}s", elapsed.as_secs_f64());
        println!("  Evals/sec:      {:.1}", evals_per_sec);
        println!("  Best fitness:   {:.1}", result.stats.best_fitness);

        if let Some(roles) = result.history.role_counts.last() {
            let summary: Vec<String> = Role::ALL
                .iter()
                .map(|&r| format!("{:?}={}", r, roles.get(r)))
                .collect();
            println!("  Final roles:    {}", summary.join(" "));
        }
        println!();
    }

    println!("=== Scalability Test (0.25s steps) ===\n");

    // Test different population sizes
    for pop_size in [10, 20, 40, 80] {
        let config = EvolutionConfig {
            population_size: pop_size,
            generations: 10,
            random_seed: Some(42),
            ..Default::default()
        };

        let start = Instant::now();
        let mut engine = EvolutionEngine::new(config).expect("valid config");
        let result = engine.run();
        let elapsed = start.elapsed();

        let total_evals = result.stats.total_evaluations;
        let evals_per_sec = total_evals as f64 / elapsed.as_secs_f64();

        println!(
            "Population {}: {} evals in {:.2}s ({:.1} evals/sec)",
            pop_size,
            total_evals,
            elapsed.as_secs_f64(),
            evals_per_sec
        );
    }
}
