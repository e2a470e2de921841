//! Game state: the persisted shape handed to storage, and the per-frame report
//! handed to the presentation layer.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::constants::RESOURCE_MAX;
use crate::enums::*;
use crate::events::SimEvent;
use crate::types::{GravityWell, SimulationClock, Vector2};

/// The ship's dynamic physical state.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct ShipState {
    pub position: Vector2,
    pub velocity: Vector2,
    /// Heading in radians, counter-clockwise from +x.
    pub orientation: f64,
}

/// Consumable ship resources, each in `[0, RESOURCE_MAX]`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ResourceState {
    pub fuel: f64,
    pub integrity: f64,
    pub supplies: f64,
    pub passengers: f64,
}

impl Default for ResourceState {
    fn default() -> Self {
        Self::full()
    }
}

impl ResourceState {
    pub fn full() -> Self {
        Self {
            fuel: RESOURCE_MAX,
            integrity: RESOURCE_MAX,
            supplies: RESOURCE_MAX,
            passengers: RESOURCE_MAX,
        }
    }

    /// Clamp every field into `[0, RESOURCE_MAX]`.
    pub fn clamp(&mut self) {
        for value in [
            &mut self.fuel,
            &mut self.integrity,
            &mut self.supplies,
            &mut self.passengers,
        ] {
            *value = value.clamp(0.0, RESOURCE_MAX);
        }
    }
}

/// Accumulated scan time on a planet.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct ScanState {
    /// Distance-scaled scan minutes. Never decreases.
    pub minutes: f64,
    /// Whether the planet is currently being scanned.
    pub active: bool,
}

/// A population living on a planet.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Civilization {
    pub species: String,
    pub population: f64,
    /// Annual growth multiplier, always greater than 1.
    pub growth_rate: f64,
    pub technology: Technology,
    /// Earth-time minute at which the civilization was founded.
    pub established: f64,
}

/// A planet on a closed-form circular orbit around its system's sun.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Planet {
    pub name: String,
    pub mass: f64,
    pub orbital_radius: f64,
    /// Angle at earth time zero, radians.
    pub start_angle: f64,
    pub orbital_speed_multiplier: f64,
    #[serde(default, rename = "scanState")]
    pub scan: ScanState,
    /// Ordered oldest first; merges absorb later entries into earlier ones.
    #[serde(default)]
    pub civilizations: Vec<Civilization>,
    #[serde(default)]
    pub composition: Composition,
    #[serde(default)]
    pub atmosphere: Option<Atmosphere>,
    /// Surface temperature in kelvin.
    #[serde(default)]
    pub temperature: Option<f64>,
    #[serde(default)]
    pub biosphere: Option<Biosphere>,
}

/// A body in a star system.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum OrbitalBody {
    Sun { name: String, mass: f64 },
    Planet(Planet),
}

impl OrbitalBody {
    pub fn name(&self) -> &str {
        match self {
            OrbitalBody::Sun { name, .. } => name,
            OrbitalBody::Planet(planet) => &planet.name,
        }
    }

    pub fn mass(&self) -> f64 {
        match self {
            OrbitalBody::Sun { mass, .. } => *mass,
            OrbitalBody::Planet(planet) => planet.mass,
        }
    }

    pub fn as_planet(&self) -> Option<&Planet> {
        match self {
            OrbitalBody::Planet(planet) => Some(planet),
            OrbitalBody::Sun { .. } => None,
        }
    }

    pub fn as_planet_mut(&mut self) -> Option<&mut Planet> {
        match self {
            OrbitalBody::Planet(planet) => Some(planet),
            OrbitalBody::Sun { .. } => None,
        }
    }
}

/// A star system and the bodies it owns, keyed by body name.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StarSystem {
    pub objects: BTreeMap<String, OrbitalBody>,
}

impl StarSystem {
    pub fn new(bodies: impl IntoIterator<Item = OrbitalBody>) -> Self {
        Self {
            objects: bodies
                .into_iter()
                .map(|body| (body.name().to_string(), body))
                .collect(),
        }
    }

    /// Combined mass of the system's suns; planets orbit this.
    pub fn sun_mass(&self) -> f64 {
        self.objects
            .values()
            .filter(|body| matches!(body, OrbitalBody::Sun { .. }))
            .map(OrbitalBody::mass)
            .sum()
    }

    /// Gravity wells acting on the ship: the suns, fixed at the system origin.
    pub fn gravity_wells(&self) -> Vec<GravityWell> {
        self.objects
            .values()
            .filter(|body| matches!(body, OrbitalBody::Sun { .. }))
            .map(|sun| GravityWell::new(Vector2::ZERO, sun.mass()))
            .collect()
    }

    pub fn planet(&self, name: &str) -> Option<&Planet> {
        self.objects.get(name).and_then(OrbitalBody::as_planet)
    }

    pub fn planet_mut(&mut self, name: &str) -> Option<&mut Planet> {
        self.objects.get_mut(name).and_then(OrbitalBody::as_planet_mut)
    }

    pub fn planets(&self) -> impl Iterator<Item = &Planet> {
        self.objects.values().filter_map(OrbitalBody::as_planet)
    }

    pub fn planets_mut(&mut self) -> impl Iterator<Item = &mut Planet> {
        self.objects.values_mut().filter_map(OrbitalBody::as_planet_mut)
    }
}

/// Where the ship currently is.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Location {
    pub system: String,
    /// Planet being orbited, if any.
    #[serde(default)]
    pub body: Option<String>,
}

impl Location {
    pub fn in_system(system: impl Into<String>) -> Self {
        Self {
            system: system.into(),
            body: None,
        }
    }

    /// `system` or `system/body`.
    pub fn path(&self) -> String {
        match &self.body {
            Some(body) => format!("{}/{}", self.system, body),
            None => self.system.clone(),
        }
    }
}

/// What the workshop is doing. Only one activity runs at a time.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(tag = "state", rename_all = "camelCase")]
pub enum WorkshopActivity {
    #[default]
    Idle,
    #[serde(rename_all = "camelCase")]
    Building {
        kind: VesselKind,
        /// Ship minutes left until the vessel is finished.
        remaining_minutes: f64,
    },
    Repairing,
}

/// Fabrication and repair bay.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Workshop {
    pub activity: WorkshopActivity,
}

impl Workshop {
    pub fn is_idle(&self) -> bool {
        matches!(self.activity, WorkshopActivity::Idle)
    }
}

/// Finished vessels waiting to launch.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Hangar {
    pub vessels: BTreeMap<VesselKind, u32>,
}

impl Hangar {
    pub fn count(&self, kind: VesselKind) -> u32 {
        self.vessels.get(&kind).copied().unwrap_or(0)
    }

    pub fn store(&mut self, kind: VesselKind) {
        *self.vessels.entry(kind).or_insert(0) += 1;
    }

    /// Remove one vessel of `kind`. Returns false if none is stored.
    pub fn take(&mut self, kind: VesselKind) -> bool {
        match self.vessels.get_mut(&kind) {
            Some(count) if *count > 0 => {
                *count -= 1;
                true
            }
            _ => false,
        }
    }
}

/// Sensor suite: which planet of the current system is being scanned.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Sensors {
    pub target: Option<String>,
}

/// Typed subsystem records, persisted under `shipSystems`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ShipSystems {
    pub stores: ResourceState,
    pub workshop: Workshop,
    pub hangar: Hangar,
    pub sensors: Sensors,
}

/// Everything needed to resume a run. Handed verbatim to storage.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SaveState {
    pub earth_time: f64,
    pub relative_time: f64,
    pub ship: ShipState,
    pub systems: BTreeMap<String, StarSystem>,
    pub ship_systems: ShipSystems,
    pub location: Location,
}

impl SaveState {
    pub fn clock(&self) -> SimulationClock {
        SimulationClock::new(self.earth_time, self.relative_time)
    }
}

/// State broadcast to the presentation layer after each frame.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FrameReport {
    pub clock: SimulationClock,
    pub ship: ShipState,
    pub resources: ResourceState,
    pub location: String,
    /// Integration steps consumed this frame.
    pub steps: usize,
    pub events: Vec<SimEvent>,
    pub ended: Option<RunEndReason>,
}
