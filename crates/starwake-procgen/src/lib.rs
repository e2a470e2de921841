//! Procedural generation for STARWAKE.
//!
//! Builds star systems and star-chart neighbourhoods from a seed. The same
//! seed always yields the same content, so generated systems can be rebuilt
//! instead of stored.

pub mod generator;
pub mod names;

pub use generator::{generate_neighbourhood, generate_system, GeneratedSystem};
