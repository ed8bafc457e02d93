//! Alliance GA - Evolutionary search over robot alliance strategies.
//!
//! Three cooperating robots cycle between collecting, traveling and scoring
//! while sharing field zones with each other and with a rule-based opposing
//! defender. A time-stepped simulator scores one alliance per match; a genetic
//! algorithm searches for the robot parameters that score the most.
//!
//! # Architecture
//!
//! The crate is split into two main modules:
//!
//! - `schema`: Robot parameters, genomes, and configuration types
//! - `compute`: Zone model, opponent model, agent state machine, alliance
//!   simulator, and the evolutionary search engine
//!
//! # Example
//!
//! ```rust,no_run
//! use alliance_ga::{
//!     compute::{AllianceSimulator, evolution::EvolutionEngine},
//!     schema::{EvolutionConfig, Zone},
//! };
//!
//! let config = EvolutionConfig::default();
//! let mut engine = EvolutionEngine::new(config.clone()).expect("valid config");
//! let result = engine.run();
//!
//! // Re-run the winner with congestion tracing for charting.
//! let simulator = AllianceSimulator::new(config.match_config);
//! let outcome = simulator.simulate(&result.best.genome, true);
//! if let Some(trace) = outcome.trace {
//!     println!("Robots at center over time: {:?}", trace.zone(Zone::Center));
//! }
//! ```

pub mod compute;
pub mod schema;

// Re-export commonly used types
pub use compute::evolution::EvolutionEngine;
pub use compute::{AllianceSimulator, CongestionTrace, SimulationOutcome};
pub use schema::{EvolutionConfig, Genome, MatchConfig, RobotParameters};
