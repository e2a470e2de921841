//! Inputs from the presentation layer: per-frame flight input and discrete
//! ship commands.

use serde::{Deserialize, Serialize};

use crate::enums::VesselKind;
use crate::types::Vector2;

/// Input supplied once per rendered frame.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FrameInput {
    /// In-universe days that passed this frame at time scale 1.
    pub elapsed_days: f64,
    /// Desired thrust direction, any length. `None` (or zero) coasts.
    pub thrust: Option<Vector2>,
    /// Multiplier from the UI zoom / fast-forward control.
    pub time_scale: f64,
}

impl FrameInput {
    pub fn coasting(elapsed_days: f64) -> Self {
        Self {
            elapsed_days,
            thrust: None,
            time_scale: 1.0,
        }
    }

    pub fn thrusting(elapsed_days: f64, direction: Vector2) -> Self {
        Self {
            elapsed_days,
            thrust: Some(direction),
            time_scale: 1.0,
        }
    }
}

impl Default for FrameInput {
    fn default() -> Self {
        Self::coasting(0.0)
    }
}

/// Discrete player actions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum ShipCommand {
    /// Queue a vessel in the workshop.
    StartFabrication { kind: VesselKind },
    /// Put the workshop to repairing the hull.
    StartRepair,
    /// Launch a stored vessel at the scan target (probe) or orbited planet (lander).
    LaunchVessel { kind: VesselKind },
    /// Start scanning a planet of the current system.
    TargetPlanet { planet: String },
    /// Stop scanning, keeping progress.
    CancelScan,
    /// Transit to another star system.
    TravelTo { system: String },
}

/// Result of a command that may be refused for lack of resources.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ActionOutcome {
    Accepted,
    /// Refused; state is unchanged and a warning was emitted.
    Declined(String),
}

impl ActionOutcome {
    pub fn is_accepted(&self) -> bool {
        matches!(self, ActionOutcome::Accepted)
    }
}
