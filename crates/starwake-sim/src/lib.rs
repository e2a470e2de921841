//! Simulation engine for STARWAKE.
//!
//! Owns the flight state, steps the trajectory at a fixed integration step,
//! runs the per-step systems and produces `FrameReport`s for the frontend.

pub mod engine;
pub mod error;
pub mod persistence;
pub mod scenario;
pub mod systems;

pub use engine::{SimConfig, SimulationEngine};
pub use error::SimError;
pub use scenario::Scenario;
pub use starwake_core as core;

#[cfg(test)]
mod tests;
