//! Events emitted by the simulation for the presentation layer.

use serde::{Deserialize, Serialize};

use crate::enums::{RunEndReason, VesselKind};

/// Disclosed attributes of a scanned planet, as display strings.
/// Undisclosed attributes read `"Unknown"`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlanetReadout {
    pub system: String,
    pub planet: String,
    pub composition: String,
    pub atmosphere: String,
    pub temperature: String,
    pub biosphere: String,
    pub civilization: String,
    /// Accumulated scan minutes behind this readout.
    pub scan_minutes: f64,
}

/// Advisory and status events, in the order they were raised.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum SimEvent {
    /// Advisory message: low resources, predicted hull stress, declined actions.
    Warning { message: String },
    /// The ship entered a new system or a planet's orbit. Path is `system[/body]`.
    LocationChanged { path: String },
    /// Info panel contents for the scan target; `None` clears the panel.
    ShowInfo { readout: Option<PlanetReadout> },
    /// Terminal condition; the driver stops the run.
    RunEnded { reason: RunEndReason },
    /// The workshop finished a vessel.
    FabricationComplete { kind: VesselKind },
    /// The workshop finished repairing the hull.
    RepairComplete,
    /// A vessel left the hangar.
    VesselLaunched { kind: VesselKind },
}

/// Output queue handed to every stepper. The engine drains it once per tick.
#[derive(Debug, Clone, Default)]
pub struct EventQueue {
    events: Vec<SimEvent>,
}

impl EventQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, event: SimEvent) {
        self.events.push(event);
    }

    pub fn warn(&mut self, message: impl Into<String>) {
        self.events.push(SimEvent::Warning {
            message: message.into(),
        });
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &SimEvent> {
        self.events.iter()
    }

    /// Take all queued events, leaving the queue empty.
    pub fn drain(&mut self) -> Vec<SimEvent> {
        std::mem::take(&mut self.events)
    }
}
