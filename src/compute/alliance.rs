//! Alliance match simulator.
//!
//! Runs every robot of a genome through a fixed number of time steps and
//! scores the alliance by the units it puts through the goal.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::schema::{Genome, GenomeError, MatchConfig, ParameterBounds, Zone};

use super::agent::{AgentState, StepContext, ZoneOccupancy};
use super::opponent::opponent_zone;

/// Points awarded per scored unit.
pub const POINTS_PER_UNIT: f32 = 1.0;

/// Per-zone robot counts for every simulated step.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CongestionTrace {
    /// Step length in seconds.
    pub step_duration: f32,
    /// Elapsed match time at each recorded step.
    pub times: Vec<f32>,
    /// Occupant count per zone, one entry per step.
    pub zones: BTreeMap<Zone, Vec<u32>>,
}

impl CongestionTrace {
    fn with_capacity(step_duration: f32, steps: usize) -> Self {
        let zones = Zone::ALL
            .iter()
            .map(|&z| (z, Vec::with_capacity(steps)))
            .collect();
        Self {
            step_duration,
            times: Vec::with_capacity(steps),
            zones,
        }
    }

    fn record(&mut self, time: f32, occupancy: &ZoneOccupancy) {
        self.times.push(time);
        for (zone, series) in self.zones.iter_mut() {
            series.push(occupancy.count(*zone));
        }
    }

    /// Occupancy series for one zone.
    pub fn zone(&self, zone: Zone) -> &[u32] {
        self.zones.get(&zone).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Number of recorded steps.
    pub fn len(&self) -> usize {
        self.times.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Robots across all zones at `step`.
    pub fn total_at(&self, step: usize) -> u32 {
        self.zones.values().filter_map(|s| s.get(step)).sum()
    }
}

/// Fitness of one simulated match plus the optional congestion trace.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimulationOutcome {
    pub fitness: f32,
    pub trace: Option<CongestionTrace>,
}

/// Stateless simulator for one alliance over one match.
#[derive(Debug, Clone, Default)]
pub struct AllianceSimulator {
    config: MatchConfig,
}

impl AllianceSimulator {
    pub fn new(config: MatchConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &MatchConfig {
        &self.config
    }

    /// Simulate one match for `genome`, optionally recording congestion.
    pub fn simulate(&self, genome: &Genome, record_trace: bool) -> SimulationOutcome {
        let steps = self.config.step_count();
        let dt = self.config.step_duration;

        let mut agents: Vec<AgentState<'_>> = genome.iter().map(AgentState::new).collect();
        let mut trace = record_trace.then(|| CongestionTrace::with_capacity(dt, steps));
        let mut scored_total = 0.0f32;

        for step in 0..steps {
            let t = self.config.time_at(step);
            let occupancy = ZoneOccupancy::tally(&agents);
            if let Some(trace) = trace.as_mut() {
                trace.record(t, &occupancy);
            }

            let ctx = StepContext {
                step_duration: dt,
                occupancy,
                opponent_zone: opponent_zone(t),
            };

            for agent in agents.iter_mut() {
                scored_total += agent.step(&ctx);
            }
        }

        SimulationOutcome {
            fitness: scored_total * POINTS_PER_UNIT,
            trace,
        }
    }

    /// Fitness only, without tracing.
    pub fn fitness(&self, genome: &Genome) -> f32 {
        self.simulate(genome, false).fitness
    }

    /// Validate an externally supplied genome, then simulate it.
    pub fn simulate_checked(
        &self,
        genome: &Genome,
        bounds: &ParameterBounds,
        record_trace: bool,
    ) -> Result<SimulationOutcome, GenomeError> {
        genome.validate(bounds)?;
        Ok(self.simulate(genome, record_trace))
    }
}
