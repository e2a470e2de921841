//! Per-step systems run by the engine.
//!
//! Systems are plain functions over explicit `&mut` state. They do not own
//! state and report to the presentation layer only through the `EventQueue`
//! they are handed.

pub mod civilization;
pub mod navigation;
pub mod scanning;
pub mod stores;
pub mod workshop;
