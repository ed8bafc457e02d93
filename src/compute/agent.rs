//! Per-robot state machine advanced once per time step.
//!
//! Each robot cycles Collecting -> Traveling -> Shooting -> Traveling -> ...
//! along the zone sequence derived from its route. Congestion from teammates
//! sharing a zone slows every activity; sharing a zone with the opposing
//! defender lowers accuracy and slows travel.

use serde::{Deserialize, Serialize};

use crate::schema::{RobotParameters, Route, Zone};

use super::zones::{ZoneSequence, route_to_zones, score_index, travel_time_for_leg};

/// Slowdown added per extra robot sharing a zone.
pub const CONGESTION_PER_ROBOT: f32 = 0.2;

/// Travel time multiplier while defended.
pub const DEFENDED_TRAVEL_PENALTY: f32 = 1.2;

/// What a robot is currently doing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AgentMode {
    Collecting,
    Traveling,
    Shooting,
}

/// Number of robots resting in each zone at the start of a step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ZoneOccupancy([u32; 4]);

impl ZoneOccupancy {
    /// Tally the current zone of every agent.
    pub fn tally<'a, 'p: 'a>(agents: impl IntoIterator<Item = &'a AgentState<'p>>) -> Self {
        let mut counts = [0u32; 4];
        for agent in agents {
            counts[agent.current_zone().index()] += 1;
        }
        Self(counts)
    }

    #[inline]
    pub fn count(&self, zone: Zone) -> u32 {
        self.0[zone.index()]
    }

    pub fn total(&self) -> u32 {
        self.0.iter().sum()
    }

    /// `1 + 0.2 * (robots - 1)`, with no penalty for a robot alone.
    #[inline]
    pub fn congestion_factor(&self, zone: Zone) -> f32 {
        1.0 + CONGESTION_PER_ROBOT * self.count(zone).saturating_sub(1) as f32
    }
}

/// Shared inputs for one step of every agent.
#[derive(Debug, Clone, Copy)]
pub struct StepContext {
    /// Step length in seconds.
    pub step_duration: f32,
    /// Occupancy computed before any agent acted this step.
    pub occupancy: ZoneOccupancy,
    /// Zone contested by the opponent this step.
    pub opponent_zone: Zone,
}

/// Runtime state of one robot, rebuilt for every simulation.
#[derive(Debug, Clone)]
pub struct AgentState<'p> {
    params: &'p RobotParameters,
    mode: AgentMode,
    zone_sequence: ZoneSequence,
    sequence_index: usize,
    remaining_leg_time: f32,
    payload: f32,
    current_zone: Zone,
    cycle_load: f32,
    collection_rate: f32,
}

impl<'p> AgentState<'p> {
    /// Start collecting at the first zone of the robot's route.
    pub fn new(params: &'p RobotParameters) -> Self {
        let zone_sequence = route_to_zones(params.route);
        let collection_rate = match params.route {
            Route::WingViaSide => params.collection_rate_wing,
            Route::CenterViaBump | Route::CenterViaSide => params.collection_rate_center,
        };

        Self {
            params,
            mode: AgentMode::Collecting,
            zone_sequence,
            sequence_index: 0,
            remaining_leg_time: 0.0,
            payload: 0.0,
            current_zone: zone_sequence[0],
            cycle_load: params.cycle_load(),
            collection_rate,
        }
    }

    pub fn mode(&self) -> AgentMode {
        self.mode
    }

    pub fn current_zone(&self) -> Zone {
        self.current_zone
    }

    pub fn payload(&self) -> f32 {
        self.payload
    }

    pub fn cycle_load(&self) -> f32 {
        self.cycle_load
    }

    pub fn sequence_index(&self) -> usize {
        self.sequence_index
    }

    pub fn remaining_leg_time(&self) -> f32 {
        self.remaining_leg_time
    }

    /// Advance one step and return the units scored during it.
    ///
    /// A committed defender takes no cycling action but keeps occupying its
    /// last zone.
    pub fn step(&mut self, ctx: &StepContext) -> f32 {
        if self.params.plays_defense() {
            return 0.0;
        }

        let congestion = ctx.occupancy.congestion_factor(self.current_zone);
        let defended = self.current_zone == ctx.opponent_zone;
        let (accuracy, travel_penalty) = if defended {
            (self.params.accuracy_defended, DEFENDED_TRAVEL_PENALTY)
        } else {
            (self.params.accuracy_open, 1.0)
        };

        match self.mode {
            AgentMode::Collecting => {
                self.collect(ctx.step_duration, congestion);
                0.0
            }
            AgentMode::Traveling => {
                self.travel(ctx.step_duration * congestion * travel_penalty);
                0.0
            }
            AgentMode::Shooting => self.shoot(ctx.step_duration, congestion, accuracy),
        }
    }

    fn collect(&mut self, dt: f32, congestion: f32) {
        self.payload += self.collection_rate / congestion * dt;

        if self.payload >= self.cycle_load {
            self.payload = self.cycle_load;
            self.mode = AgentMode::Traveling;
            self.arm_leg(1);
        }
    }

    fn travel(&mut self, delta: f32) {
        self.remaining_leg_time -= delta;
        if self.remaining_leg_time > 0.0 {
            return;
        }

        self.current_zone = self.zone_sequence[self.sequence_index];
        self.sequence_index += 1;

        if self.current_zone == Zone::Score {
            self.mode = AgentMode::Shooting;
        } else if self.sequence_index < self.zone_sequence.len() {
            self.arm_leg(self.sequence_index);
        } else {
            self.restart_cycle();
        }
    }

    fn shoot(&mut self, dt: f32, congestion: f32, accuracy: f32) -> f32 {
        let shot = (self.params.shooting_rate / congestion * dt).min(self.payload);
        self.payload -= shot;

        if self.payload <= 0.0 {
            self.payload = 0.0;
            let next = score_index(&self.zone_sequence).map_or(self.zone_sequence.len(), |i| i + 1);
            if next < self.zone_sequence.len() {
                self.mode = AgentMode::Traveling;
                self.arm_leg(next);
            } else {
                self.restart_cycle();
            }
        }

        shot * accuracy
    }

    /// Head toward `zone_sequence[leg]`.
    fn arm_leg(&mut self, leg: usize) {
        self.sequence_index = leg;
        self.remaining_leg_time = travel_time_for_leg(self.params, &self.zone_sequence, leg);
    }

    fn restart_cycle(&mut self) {
        self.mode = AgentMode::Collecting;
        self.sequence_index = 0;
        self.current_zone = self.zone_sequence[0];
    }
}
