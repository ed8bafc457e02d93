//! Schema module - Configuration and data model types for alliance evolution.

mod config;
mod evolution;
mod robot;

pub use config::*;
pub use evolution::*;
pub use robot::*;

#[cfg(test)]
pub(crate) use robot::sample_robot;
