//! Physics for STARWAKE.
//!
//! Pure functions and small cursor objects: the velocity-Verlet trajectory
//! integrator with its lookahead buffer, closed-form circular orbits, and
//! the relativistic travel model. No engine state.

pub mod gravity;
pub mod orbits;
pub mod relativity;

pub use starwake_core as core;
