//! Generational genetic search over alliance genomes.

use std::time::Instant;

use log::{debug, info};
use rayon::prelude::*;

use crate::compute::{AllianceSimulator, SimulationOutcome};
use crate::schema::{
    Candidate, EvolutionConfig, EvolutionConfigError, EvolutionHistory, EvolutionProgress,
    EvolutionResult, EvolutionStats, Genome, RoleCounts,
};

use super::genome::{GenomeRng, tournament_winner};

/// Evolution engine that runs the search.
///
/// Each generation evaluates every genome, records the best fitness and role
/// frequencies, then builds the next population from the single best genome
/// plus tournament-selected, recombined, mutated children.
pub struct EvolutionEngine {
    config: EvolutionConfig,
    seed: u64,
    rng: GenomeRng,
    simulator: AllianceSimulator,
    population: Vec<Candidate>,
    history: EvolutionHistory,
    generation: usize,
    evaluations: u64,
    next_id: u64,
}

impl EvolutionEngine {
    /// Create a new evolution engine from a validated configuration.
    pub fn new(config: EvolutionConfig) -> Result<Self, EvolutionConfigError> {
        config.validate()?;

        let seed = config.random_seed.unwrap_or_else(rand::random);
        let simulator = AllianceSimulator::new(config.match_config.clone());

        debug!(
            "evolution engine: population={} generations={} mutation_rate={} tournament={} seed={}",
            config.population_size,
            config.generations,
            config.mutation_rate,
            config.tournament_size,
            seed
        );

        Ok(Self {
            rng: GenomeRng::new(seed),
            seed,
            simulator,
            population: Vec::new(),
            history: EvolutionHistory::default(),
            generation: 0,
            evaluations: 0,
            next_id: 0,
            config,
        })
    }

    /// Seed driving this run.
    pub fn seed(&self) -> u64 {
        self.seed
    }

    pub fn simulator(&self) -> &AllianceSimulator {
        &self.simulator
    }

    pub fn population(&self) -> &[Candidate] {
        &self.population
    }

    pub fn history(&self) -> &EvolutionHistory {
        &self.history
    }

    fn next_id(&mut self) -> u64 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    /// Initialize the population with random genomes.
    pub fn initialize(&mut self) {
        self.population.clear();
        self.history = EvolutionHistory::default();
        self.generation = 0;
        self.evaluations = 0;

        for _ in 0..self.config.population_size {
            let genome = self.rng.random_genome(&self.config.bounds);
            let id = self.next_id();
            self.population.push(Candidate {
                id,
                genome,
                fitness: 0.0,
                generation: 0,
                parents: Vec::new(),
            });
        }
    }

    /// Evaluate all candidates in the population.
    ///
    /// Simulation is pure, so parallel evaluation matches sequential results.
    fn evaluate_population(&mut self) {
        let simulator = &self.simulator;

        self.population.par_iter_mut().for_each(|candidate| {
            candidate.fitness = simulator.fitness(&candidate.genome);
        });

        self.evaluations += self.population.len() as u64;
    }

    /// Index of the fittest candidate; the first maximum wins ties.
    fn best_index(&self) -> usize {
        let fitness: Vec<f32> = self.population.iter().map(|c| c.fitness).collect();
        let all: Vec<usize> = (0..fitness.len()).collect();
        tournament_winner(&fitness, &all).unwrap_or(0)
    }

    /// Record statistics for the freshly evaluated generation.
    fn record_generation(&mut self, best_idx: usize) -> EvolutionProgress {
        let n = self.population.len() as f32;
        let best_fitness = self.population[best_idx].fitness;
        let avg_fitness = self.population.iter().map(|c| c.fitness).sum::<f32>() / n;
        let variance = self
            .population
            .iter()
            .map(|c| (c.fitness - avg_fitness).powi(2))
            .sum::<f32>()
            / n;
        let role_counts = RoleCounts::from_genomes(self.population.iter().map(|c| &c.genome));

        self.history.best_fitness.push(best_fitness);
        self.history.avg_fitness.push(avg_fitness);
        self.history.fitness_std.push(variance.sqrt());
        self.history.role_counts.push(role_counts);

        info!(
            "generation {}: best fitness = {:.1}, mean = {:.1}",
            self.generation, best_fitness, avg_fitness
        );
        debug!("generation {} roles: {:?}", self.generation, role_counts);

        EvolutionProgress {
            generation: self.generation,
            total_generations: self.config.generations,
            best_fitness,
            avg_fitness,
            role_counts,
            best_candidate: self.population[best_idx].clone(),
        }
    }

    /// Tournament selection over the current population.
    fn select_index(&mut self, fitness: &[f32]) -> usize {
        let contenders = self
            .rng
            .sample_indices(fitness.len(), self.config.tournament_size);
        tournament_winner(fitness, &contenders).unwrap_or(0)
    }

    /// Build the next generation: the elite plus offspring.
    fn step_generation(&mut self, best_idx: usize) {
        let fitness: Vec<f32> = self.population.iter().map(|c| c.fitness).collect();
        let mut next_gen = Vec::with_capacity(self.config.population_size);

        // Elitism: the best candidate survives unchanged.
        next_gen.push(self.population[best_idx].clone());

        while next_gen.len() < self.config.population_size {
            let idx1 = self.select_index(&fitness);
            let idx2 = self.select_index(&fitness);

            let parent1 = &self.population[idx1];
            let parent2 = &self.population[idx2];
            let mut child_genome = self.rng.crossover(&parent1.genome, &parent2.genome);
            let parents = vec![parent1.id, parent2.id];

            self.rng
                .mutate(&mut child_genome, self.config.mutation_rate, &self.config.bounds);

            let id = self.next_id();
            next_gen.push(Candidate {
                id,
                genome: child_genome,
                fitness: 0.0,
                generation: self.generation + 1,
                parents,
            });
        }

        self.population = next_gen;
        self.generation += 1;
    }

    /// Run evolution with progress callback.
    pub fn run_with_callback<F>(&mut self, mut callback: F) -> EvolutionResult
    where
        F: FnMut(&EvolutionProgress),
    {
        let start_time = Instant::now();

        self.initialize();

        for _ in 0..self.config.generations {
            self.evaluate_population();
            let best_idx = self.best_index();
            let progress = self.record_generation(best_idx);
            callback(&progress);
            self.step_generation(best_idx);
        }

        // Score the final population once more before picking the winner.
        self.evaluate_population();
        let best = self.population[self.best_index()].clone();

        let elapsed = start_time.elapsed().as_secs_f64();
        let final_avg_fitness =
            self.population.iter().map(|c| c.fitness).sum::<f32>() / self.population.len() as f32;

        info!(
            "evolution finished after {} generations: best fitness = {:.1}",
            self.generation, best.fitness
        );

        EvolutionResult {
            stats: EvolutionStats {
                generations: self.generation,
                total_evaluations: self.evaluations,
                best_fitness: best.fitness,
                final_avg_fitness,
                elapsed_seconds: elapsed,
                evaluations_per_second: self.evaluations as f64 / elapsed.max(f64::EPSILON),
                random_seed: self.seed,
            },
            best,
            history: self.history.clone(),
        }
    }

    /// Run evolution (blocking).
    pub fn run(&mut self) -> EvolutionResult {
        self.run_with_callback(|_| {})
    }

    /// Simulate `genome` under this run's match config, with congestion tracing.
    pub fn replay(&self, genome: &Genome) -> SimulationOutcome {
        self.simulator.simulate(genome, true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::{ALLIANCE_SIZE, MatchConfig};

    fn small_config(seed: u64) -> EvolutionConfig {
        EvolutionConfig {
            match_config: MatchConfig {
                match_duration: 40.0,
                step_duration: 0.25,
            },
            population_size: 12,
            generations: 8,
            random_seed: Some(seed),
            ..Default::default()
        }
    }

    #[test]
    fn test_evolution_engine_creation() {
        let mut engine = EvolutionEngine::new(small_config(1)).unwrap();
        engine.initialize();

        assert_eq!(engine.population().len(), 12);
        assert_eq!(engine.seed(), 1);
    }

    #[test]
    fn test_invalid_config_rejected() {
        let config = EvolutionConfig {
            population_size: 1,
            ..small_config(1)
        };
        assert!(matches!(
            EvolutionEngine::new(config),
            Err(EvolutionConfigError::PopulationTooSmall(1))
        ));
    }

    #[test]
    fn test_evolution_run() {
        let mut engine = EvolutionEngine::new(small_config(42)).unwrap();
        let mut seen = Vec::new();
        let result = engine.run_with_callback(|progress| seen.push(progress.generation));

        assert_eq!(seen, (0..8).collect::<Vec<_>>());
        assert_eq!(result.stats.generations, 8);
        assert_eq!(result.stats.total_evaluations, 9 * 12);
        assert_eq!(result.history.best_fitness.len(), 8);
        assert_eq!(result.history.role_counts.len(), 8);
        assert!(result.best.fitness >= 0.0);
        assert_eq!(result.best.genome.robots.len(), ALLIANCE_SIZE);
    }

    #[test]
    fn test_best_fitness_non_decreasing() {
        let mut engine = EvolutionEngine::new(small_config(7)).unwrap();
        let result = engine.run();

        let best = &result.history.best_fitness;
        for pair in best.windows(2) {
            assert!(pair[1] >= pair[0], "regressed: {best:?}");
        }
        assert!(result.best.fitness >= *best.last().unwrap());
    }

    #[test]
    fn test_elite_survives_unchanged() {
        let mut engine = EvolutionEngine::new(small_config(3)).unwrap();
        engine.initialize();
        engine.evaluate_population();

        let best_idx = engine.best_index();
        let elite = engine.population()[best_idx].clone();
        engine.step_generation(best_idx);

        let carried = &engine.population()[0];
        assert_eq!(carried.id, elite.id);
        assert_eq!(carried.genome, elite.genome);
        assert_eq!(engine.population().len(), 12);
        assert!(engine.population()[1..].iter().all(|c| c.parents.len() == 2));
    }

    #[test]
    fn test_reproducible_with_seed() {
        let a = EvolutionEngine::new(small_config(99)).unwrap().run();
        let b = EvolutionEngine::new(small_config(99)).unwrap().run();

        assert_eq!(a.history.best_fitness, b.history.best_fitness);
        assert_eq!(a.best.genome, b.best.genome);
        assert_eq!(a.best.fitness.to_bits(), b.best.fitness.to_bits());
    }

    #[test]
    fn test_unseeded_run_reports_its_seed() {
        let config = EvolutionConfig {
            random_seed: None,
            ..small_config(0)
        };
        let first = EvolutionEngine::new(config).unwrap().run();

        let replay = EvolutionEngine::new(small_config(first.stats.random_seed))
            .unwrap()
            .run();
        assert_eq!(first.best.genome, replay.best.genome);
        assert_eq!(first.history.best_fitness, replay.history.best_fitness);
    }

    #[test]
    fn test_role_counts_cover_population() {
        let mut engine = EvolutionEngine::new(small_config(5)).unwrap();
        let result = engine.run();

        for counts in &result.history.role_counts {
            assert_eq!(counts.total(), 12 * ALLIANCE_SIZE);
        }
    }

    #[test]
    fn test_zero_generations_still_returns_best() {
        let config = EvolutionConfig {
            generations: 0,
            ..small_config(2)
        };
        let mut engine = EvolutionEngine::new(config).unwrap();
        let result = engine.run();

        assert_eq!(result.stats.generations, 0);
        assert!(result.history.best_fitness.is_empty());
        assert_eq!(result.stats.total_evaluations, 12);
        let trace = engine.replay(&result.best.genome).trace.unwrap();
        assert_eq!(trace.len(), 160);
    }
}
