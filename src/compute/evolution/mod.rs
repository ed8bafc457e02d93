//! Evolutionary search module for discovering strong alliance strategies.
//!
//! # Overview
//!
//! The evolutionary search system consists of:
//!
//! - **Genome Operations** (`genome`): Random generation, per-slot crossover,
//!   bounded mutation, and tournament sampling
//! - **Search Engine** (`search`): Generational loop with elitism
//!
//! Fitness comes straight from [`AllianceSimulator`](crate::compute::AllianceSimulator):
//! the points one alliance scores in one simulated match.
//!
//! # Example
//!
//! ```rust,no_run
//! use alliance_ga::schema::EvolutionConfig;
//! use alliance_ga::compute::evolution::EvolutionEngine;
//!
//! let config = EvolutionConfig {
//!     random_seed: Some(42),
//!     ..Default::default()
//! };
//!
//! let mut engine = EvolutionEngine::new(config).expect("valid config");
//! let result = engine.run_with_callback(|progress| {
//!     println!("Generation {}: best fitness = {:.1}",
//!         progress.generation, progress.best_fitness);
//! });
//!
//! println!("Best fitness: {:.1}", result.best.fitness);
//! ```

mod genome;
mod search;

pub use genome::{GenomeRng, MUTATION_SPAN, tournament_winner};
pub use search::EvolutionEngine;
