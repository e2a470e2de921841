//! Core types and definitions for the STARWAKE simulation.
//!
//! This crate defines the vocabulary shared across all other crates:
//! vector math, tuning constants, enums, events, persisted state shapes
//! and player commands. It has no dependency on any runtime framework.

pub mod commands;
pub mod constants;
pub mod enums;
pub mod events;
pub mod state;
pub mod types;
