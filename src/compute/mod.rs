//! Compute module - Match simulation and evolutionary search.

mod agent;
mod alliance;
mod opponent;
mod zones;

pub mod evolution;

pub use agent::*;
pub use alliance::*;
pub use opponent::*;
pub use zones::*;
