//! Evolution configuration types for alliance strategy search.
//!
//! This module provides the configuration of the genetic search over robot
//! alliances, the per-field parameter bounds, and the progress/result types
//! reported to callers.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use super::{Genome, MatchConfig, NumericField, Role};

/// Top-level configuration for alliance evolution.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct EvolutionConfig {
    /// Match timing used for every evaluation.
    #[serde(default)]
    pub match_config: MatchConfig,
    /// Number of genomes in the population.
    #[serde(default = "default_population_size")]
    pub population_size: usize,
    /// Number of generations to evolve.
    #[serde(default = "default_generations")]
    pub generations: usize,
    /// Probability that any one gene is mutated (0.0-1.0).
    #[serde(default = "default_mutation_rate")]
    pub mutation_rate: f32,
    /// Genomes sampled per tournament.
    #[serde(default = "default_tournament_size")]
    pub tournament_size: usize,
    /// Random seed for reproducibility.
    #[serde(default)]
    pub random_seed: Option<u64>,
    /// Initialization and mutation bounds per numeric field.
    #[serde(default)]
    pub bounds: ParameterBounds,
}

impl Default for EvolutionConfig {
    fn default() -> Self {
        Self {
            match_config: MatchConfig::default(),
            population_size: default_population_size(),
            generations: default_generations(),
            mutation_rate: default_mutation_rate(),
            tournament_size: default_tournament_size(),
            random_seed: None,
            bounds: ParameterBounds::default(),
        }
    }
}

fn default_population_size() -> usize {
    40
}
fn default_generations() -> usize {
    60
}
fn default_mutation_rate() -> f32 {
    0.12
}
fn default_tournament_size() -> usize {
    4
}

/// Initialization range and mutation clamp range for one numeric field.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FieldBounds {
    /// Uniform range for freshly generated robots.
    pub init: (f32, f32),
    /// Hard limits applied after mutation.
    pub limits: (f32, f32),
}

impl FieldBounds {
    pub const fn new(init: (f32, f32), limits: (f32, f32)) -> Self {
        Self { init, limits }
    }

    /// Width of the clamp range.
    #[inline]
    pub fn span(&self) -> f32 {
        self.limits.1 - self.limits.0
    }

    #[inline]
    pub fn clamp(&self, value: f32) -> f32 {
        value.clamp(self.limits.0, self.limits.1)
    }
}

/// Bounds for every numeric robot parameter.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ParameterBounds {
    #[serde(default = "default_rate_bounds")]
    pub collection_rate_center: FieldBounds,
    #[serde(default = "default_rate_bounds")]
    pub collection_rate_wing: FieldBounds,
    #[serde(default = "default_rate_bounds")]
    pub shooting_rate: FieldBounds,
    #[serde(default = "default_bump_travel_bounds")]
    pub travel_center_to_bump: FieldBounds,
    #[serde(default = "default_travel_bounds")]
    pub travel_center_to_side: FieldBounds,
    #[serde(default = "default_travel_bounds")]
    pub travel_side_to_score: FieldBounds,
    #[serde(default = "default_travel_bounds")]
    pub travel_bump_to_score: FieldBounds,
    #[serde(default = "default_accuracy_open_bounds")]
    pub accuracy_open: FieldBounds,
    #[serde(default = "default_accuracy_defended_bounds")]
    pub accuracy_defended: FieldBounds,
    #[serde(default = "default_capacity_bounds")]
    pub max_capacity: FieldBounds,
    #[serde(default = "default_cycle_size_bounds")]
    pub cycle_size_preference: FieldBounds,
    #[serde(default = "default_unit_bounds")]
    pub defend_aggressiveness: FieldBounds,
}

impl Default for ParameterBounds {
    fn default() -> Self {
        Self {
            collection_rate_center: default_rate_bounds(),
            collection_rate_wing: default_rate_bounds(),
            shooting_rate: default_rate_bounds(),
            travel_center_to_bump: default_bump_travel_bounds(),
            travel_center_to_side: default_travel_bounds(),
            travel_side_to_score: default_travel_bounds(),
            travel_bump_to_score: default_travel_bounds(),
            accuracy_open: default_accuracy_open_bounds(),
            accuracy_defended: default_accuracy_defended_bounds(),
            max_capacity: default_capacity_bounds(),
            cycle_size_preference: default_cycle_size_bounds(),
            defend_aggressiveness: default_unit_bounds(),
        }
    }
}

fn default_rate_bounds() -> FieldBounds {
    FieldBounds::new((0.5, 4.5), (0.3, 5.0))
}
fn default_bump_travel_bounds() -> FieldBounds {
    FieldBounds::new((1.0, 6.0), (0.7, 8.0))
}
fn default_travel_bounds() -> FieldBounds {
    FieldBounds::new((0.7, 5.0), (0.5, 7.0))
}
fn default_accuracy_open_bounds() -> FieldBounds {
    FieldBounds::new((0.6, 0.98), (0.4, 0.99))
}
fn default_accuracy_defended_bounds() -> FieldBounds {
    FieldBounds::new((0.3, 0.9), (0.2, 0.95))
}
fn default_capacity_bounds() -> FieldBounds {
    FieldBounds::new((8.0, 60.0), (5.0, 70.0))
}
fn default_cycle_size_bounds() -> FieldBounds {
    FieldBounds::new((0.3, 1.0), (0.2, 1.0))
}
fn default_unit_bounds() -> FieldBounds {
    FieldBounds::new((0.0, 1.0), (0.0, 1.0))
}

impl ParameterBounds {
    /// Bounds for one field.
    pub fn get(&self, field: NumericField) -> &FieldBounds {
        match field {
            NumericField::CollectionRateCenter => &self.collection_rate_center,
            NumericField::CollectionRateWing => &self.collection_rate_wing,
            NumericField::ShootingRate => &self.shooting_rate,
            NumericField::TravelCenterToBump => &self.travel_center_to_bump,
            NumericField::TravelCenterToSide => &self.travel_center_to_side,
            NumericField::TravelSideToScore => &self.travel_side_to_score,
            NumericField::TravelBumpToScore => &self.travel_bump_to_score,
            NumericField::AccuracyOpen => &self.accuracy_open,
            NumericField::AccuracyDefended => &self.accuracy_defended,
            NumericField::MaxCapacity => &self.max_capacity,
            NumericField::CycleSizePreference => &self.cycle_size_preference,
            NumericField::DefendAggressiveness => &self.defend_aggressiveness,
        }
    }
}

// ============================================================================
// Progress and Result Types
// ============================================================================

/// A genome together with its evaluated fitness.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Candidate {
    /// Unique identifier.
    pub id: u64,
    /// The alliance genome.
    pub genome: Genome,
    /// Points scored in one simulated match.
    pub fitness: f32,
    /// Generation created.
    pub generation: usize,
    /// Parent IDs.
    pub parents: Vec<u64>,
}

/// Number of robots holding each role across a population.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct RoleCounts {
    pub hopper: usize,
    pub feeder: usize,
    pub shooter: usize,
    pub hybrid: usize,
    pub defender: usize,
}

impl RoleCounts {
    /// Tally every robot of every genome.
    pub fn from_genomes<'a>(genomes: impl IntoIterator<Item = &'a Genome>) -> Self {
        let mut counts = Self::default();
        for genome in genomes {
            for robot in genome.iter() {
                counts.record(robot.role);
            }
        }
        counts
    }

    pub fn record(&mut self, role: Role) {
        *self.slot(role) += 1;
    }

    pub fn get(&self, role: Role) -> usize {
        match role {
            Role::Hopper => self.hopper,
            Role::Feeder => self.feeder,
            Role::Shooter => self.shooter,
            Role::Hybrid => self.hybrid,
            Role::Defender => self.defender,
        }
    }

    pub fn total(&self) -> usize {
        Role::ALL.iter().map(|&r| self.get(r)).sum()
    }

    fn slot(&mut self, role: Role) -> &mut usize {
        match role {
            Role::Hopper => &mut self.hopper,
            Role::Feeder => &mut self.feeder,
            Role::Shooter => &mut self.shooter,
            Role::Hybrid => &mut self.hybrid,
            Role::Defender => &mut self.defender,
        }
    }
}

/// Evolution history for plotting.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct EvolutionHistory {
    /// Best fitness per generation.
    pub best_fitness: Vec<f32>,
    /// Average fitness per generation.
    pub avg_fitness: Vec<f32>,
    /// Standard deviation per generation.
    pub fitness_std: Vec<f32>,
    /// Role frequencies per generation.
    pub role_counts: Vec<RoleCounts>,
}

/// Progress update emitted after each evaluated generation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EvolutionProgress {
    /// Generation index (0-based).
    pub generation: usize,
    /// Total generations planned.
    pub total_generations: usize,
    /// Best fitness this generation.
    pub best_fitness: f32,
    /// Average fitness of the current population.
    pub avg_fitness: f32,
    /// Role frequencies of the current population.
    pub role_counts: RoleCounts,
    /// Best candidate this generation (the next elite).
    pub best_candidate: Candidate,
}

/// Final result of an evolution run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EvolutionResult {
    /// Best candidate of the final population.
    pub best: Candidate,
    /// Statistics from the run.
    pub stats: EvolutionStats,
    /// Full history for analysis.
    pub history: EvolutionHistory,
}

/// Statistics from an evolution run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EvolutionStats {
    /// Total generations run.
    pub generations: usize,
    /// Total simulations performed, including the final re-evaluation.
    pub total_evaluations: u64,
    /// Best fitness achieved.
    pub best_fitness: f32,
    /// Average fitness of final population.
    pub final_avg_fitness: f32,
    /// Time taken (in seconds).
    pub elapsed_seconds: f64,
    /// Evaluations per second.
    pub evaluations_per_second: f64,
    /// Seed that drove the run.
    pub random_seed: u64,
}

// ============================================================================
// Validation
// ============================================================================

/// Evolution configuration validation errors.
#[derive(Debug, thiserror::Error)]
pub enum EvolutionConfigError {
    #[error("Population size must be at least 2, got {0}")]
    PopulationTooSmall(usize),
    #[error("Tournament size {size} must be between 1 and the population size {population}")]
    InvalidTournamentSize { size: usize, population: usize },
    #[error("Mutation rate must be within [0, 1], got {0}")]
    InvalidMutationRate(f32),
    #[error("Invalid parameter bounds: {0}")]
    InvalidBounds(String),
    #[error("Match config validation failed: {0}")]
    MatchConfigError(#[from] super::ConfigError),
    #[error("Failed to read config: {0}")]
    Io(#[from] std::io::Error),
    #[error("Failed to parse config: {0}")]
    Parse(#[from] serde_json::Error),
}

impl EvolutionConfig {
    /// Load and validate a JSON configuration file.
    pub fn from_json_file<P: AsRef<Path>>(path: P) -> Result<Self, EvolutionConfigError> {
        let text = fs::read_to_string(path)?;
        let config: Self = serde_json::from_str(&text)?;
        config.validate()?;
        Ok(config)
    }

    /// Validate evolution configuration.
    pub fn validate(&self) -> Result<(), EvolutionConfigError> {
        self.match_config.validate()?;

        if self.population_size < 2 {
            return Err(EvolutionConfigError::PopulationTooSmall(
                self.population_size,
            ));
        }

        if self.tournament_size == 0 || self.tournament_size > self.population_size {
            return Err(EvolutionConfigError::InvalidTournamentSize {
                size: self.tournament_size,
                population: self.population_size,
            });
        }

        if !(0.0..=1.0).contains(&self.mutation_rate) {
            return Err(EvolutionConfigError::InvalidMutationRate(
                self.mutation_rate,
            ));
        }

        for field in NumericField::ALL {
            let FieldBounds { init, limits } = *self.bounds.get(field);
            if init.0 > init.1 || limits.0 > limits.1 {
                return Err(EvolutionConfigError::InvalidBounds(format!(
                    "{field} min > max"
                )));
            }
            if init.0 < limits.0 || init.1 > limits.1 {
                return Err(EvolutionConfigError::InvalidBounds(format!(
                    "{field} init range {init:?} escapes limits {limits:?}"
                )));
            }
            if field.is_strictly_positive() && limits.0 <= 0.0 {
                return Err(EvolutionConfigError::InvalidBounds(format!(
                    "{field} lower limit must be positive"
                )));
            }
            if limits.0 < 0.0 {
                return Err(EvolutionConfigError::InvalidBounds(format!(
                    "{field} lower limit must not be negative"
                )));
            }
            if field.is_fraction() && limits.1 > 1.0 {
                return Err(EvolutionConfigError::InvalidBounds(format!(
                    "{field} limits {limits:?} must lie within [0, 1]"
                )));
            }
        }

        Ok(())
    }
}
