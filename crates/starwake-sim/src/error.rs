//! Error type for fallible engine operations.
//!
//! Only caller mistakes and I/O surface here. Numeric edge cases are clamped,
//! resource shortfalls are `ActionOutcome::Declined`, and running out of fuel
//! or hull is a `RunEnded` event.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum SimError {
    #[error("unknown star system '{0}'")]
    UnknownSystem(String),

    #[error("no planet named '{body}' in {system}")]
    UnknownBody { system: String, body: String },

    #[error("invalid scenario: {0}")]
    InvalidScenario(String),

    #[error("failed to parse scenario: {0}")]
    ScenarioParse(#[from] serde_yaml::Error),

    #[error("failed to encode or decode save state: {0}")]
    Encoding(#[from] serde_json::Error),

    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),
}
