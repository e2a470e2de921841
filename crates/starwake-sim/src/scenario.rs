//! Scenario definitions: the star chart, the systems on it, and where the
//! ship starts.
//!
//! Scenarios load from YAML or come from the built-in Sol neighbourhood.
//!
//! ```yaml
//! name: Two stars
//! start:
//!   system: Sol
//!   distance: 5000.0      # from the sun, simulation units (optional)
//!   angle: 0.0            # radians from +x (optional)
//! systems:
//!   - name: Sol
//!     position_ly: [0.0, 0.0]
//!     bodies:
//!       - { type: Sun, name: Sol, mass: 2.0e7 }
//!       - type: Planet
//!         name: Verdance
//!         mass: 120.0
//!         orbitalRadius: 3200.0
//!         startAngle: 0.0
//!         orbitalSpeedMultiplier: 1.0
//!   - name: Kessa
//!     position_ly: [3.0, 4.0]
//!     seed: 17              # generated when no bodies are listed
//! neighbourhood:            # optional extra generated systems
//!   seed: 42
//!   count: 4
//!   radius_ly: 15.0
//! ```

use std::collections::BTreeMap;
use std::path::Path;

use serde::{Deserialize, Serialize};

use starwake_core::constants::{ARRIVAL_DISTANCE, MINUTES_PER_YEAR, RESOURCE_MAX};
use starwake_core::enums::{Atmosphere, Biosphere, Composition, Technology};
use starwake_core::state::{
    Civilization, OrbitalBody, Planet, ResourceState, ScanState, ShipState, StarSystem,
};
use starwake_core::types::Vector2;
use starwake_procgen::{generate_neighbourhood, generate_system};

use crate::error::SimError;
use crate::systems::navigation::{self, StarChart};

/// Name of the home system in the built-in scenario.
pub const HOME_SYSTEM: &str = "Sol";

fn default_start_distance() -> f64 {
    ARRIVAL_DISTANCE
}

/// Where and how the ship begins.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StartConfig {
    pub system: String,
    #[serde(default = "default_start_distance")]
    pub distance: f64,
    #[serde(default)]
    pub angle: f64,
    #[serde(default)]
    pub resources: ResourceState,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SystemConfig {
    pub name: String,
    pub position_ly: Vector2,
    /// Seed for generating the system when `bodies` is empty.
    #[serde(default)]
    pub seed: Option<u64>,
    #[serde(default)]
    pub bodies: Vec<OrbitalBody>,
}

/// Randomly generated systems scattered around the origin.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NeighbourhoodConfig {
    pub seed: u64,
    pub count: usize,
    pub radius_ly: f64,
}

/// Top-level scenario file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScenarioConfig {
    pub name: String,
    pub start: StartConfig,
    #[serde(default)]
    pub systems: Vec<SystemConfig>,
    #[serde(default)]
    pub neighbourhood: Option<NeighbourhoodConfig>,
}

impl ScenarioConfig {
    pub fn from_yaml(yaml: &str) -> Result<Self, SimError> {
        Ok(serde_yaml::from_str(yaml)?)
    }

    /// Resolve generated systems and validate the result.
    pub fn build(self) -> Result<Scenario, SimError> {
        let mut chart = StarChart::default();
        let mut systems = BTreeMap::new();

        for config in self.systems {
            if systems.contains_key(&config.name) {
                return Err(SimError::InvalidScenario(format!(
                    "system '{}' is defined twice",
                    config.name
                )));
            }
            let system = match (config.bodies.is_empty(), config.seed) {
                (false, _) => StarSystem::new(config.bodies),
                (true, Some(seed)) => generate_system(&config.name, seed),
                (true, None) => {
                    return Err(SimError::InvalidScenario(format!(
                        "system '{}' has neither bodies nor a seed",
                        config.name
                    )))
                }
            };
            chart.positions.insert(config.name.clone(), config.position_ly);
            systems.insert(config.name, system);
        }

        if let Some(hood) = self.neighbourhood {
            if !(hood.radius_ly > 0.0) || !hood.radius_ly.is_finite() {
                return Err(SimError::InvalidScenario(format!(
                    "neighbourhood radius {} must be positive",
                    hood.radius_ly
                )));
            }
            for generated in generate_neighbourhood(hood.seed, hood.count, Vector2::ZERO, hood.radius_ly) {
                if systems.contains_key(&generated.name) {
                    continue;
                }
                chart.positions.insert(generated.name.clone(), generated.position_ly);
                systems.insert(generated.name, generated.system);
            }
        }

        let start = systems
            .get(&self.start.system)
            .ok_or_else(|| SimError::UnknownSystem(self.start.system.clone()))?;
        let ship = navigation::orbit_state(start, self.start.distance, self.start.angle);

        let scenario = Scenario {
            name: self.name,
            chart,
            systems,
            start_system: self.start.system,
            ship,
            resources: self.start.resources,
        };
        scenario.validate()?;
        Ok(scenario)
    }
}

/// A resolved scenario, ready to start an engine.
#[derive(Debug, Clone, PartialEq)]
pub struct Scenario {
    pub name: String,
    pub chart: StarChart,
    pub systems: BTreeMap<String, StarSystem>,
    pub start_system: String,
    pub ship: ShipState,
    pub resources: ResourceState,
}

impl Scenario {
    pub fn from_yaml(yaml: &str) -> Result<Self, SimError> {
        ScenarioConfig::from_yaml(yaml)?.build()
    }

    pub fn load(path: &Path) -> Result<Self, SimError> {
        let yaml = std::fs::read_to_string(path)?;
        Self::from_yaml(&yaml)
    }

    /// Sol and a generated neighbourhood of `neighbours` systems.
    pub fn builtin(seed: u64, neighbours: usize) -> Self {
        let mut chart = StarChart::default();
        let mut systems = BTreeMap::new();
        chart.positions.insert(HOME_SYSTEM.to_string(), Vector2::ZERO);
        systems.insert(HOME_SYSTEM.to_string(), sol());

        for generated in generate_neighbourhood(seed, neighbours, Vector2::ZERO, 15.0) {
            chart.positions.insert(generated.name.clone(), generated.position_ly);
            systems.insert(generated.name, generated.system);
        }

        let ship = navigation::arrival_state(&systems[HOME_SYSTEM]);
        Self {
            name: "Sol neighbourhood".to_string(),
            chart,
            systems,
            start_system: HOME_SYSTEM.to_string(),
            ship,
            resources: ResourceState::full(),
        }
    }

    /// Check the invariants the engine relies on.
    pub fn validate(&self) -> Result<(), SimError> {
        let invalid = |message: String| Err(SimError::InvalidScenario(message));

        if !self.systems.contains_key(&self.start_system) {
            return Err(SimError::UnknownSystem(self.start_system.clone()));
        }
        for (name, system) in &self.systems {
            if !self.chart.contains(name) {
                return invalid(format!("system '{name}' is not on the star chart"));
            }
            if !(system.sun_mass() > 0.0) || !system.sun_mass().is_finite() {
                return invalid(format!("system '{name}' has no sun with positive mass"));
            }
            for planet in system.planets() {
                validate_planet(name, planet)?;
            }
        }

        let r = &self.resources;
        for (label, value) in [
            ("fuel", r.fuel),
            ("integrity", r.integrity),
            ("supplies", r.supplies),
            ("passengers", r.passengers),
        ] {
            if !(0.0..=RESOURCE_MAX).contains(&value) {
                return invalid(format!("starting {label} {value} is outside 0..={RESOURCE_MAX}"));
            }
        }
        if !self.ship.position.is_finite() || !self.ship.velocity.is_finite() {
            return invalid("starting ship state is not finite".to_string());
        }
        Ok(())
    }
}

fn validate_planet(system: &str, planet: &Planet) -> Result<(), SimError> {
    let invalid = |what: &str| {
        Err(SimError::InvalidScenario(format!(
            "planet '{}' in {system}: {what}",
            planet.name
        )))
    };
    if !(planet.orbital_radius > 0.0) || !planet.orbital_radius.is_finite() {
        return invalid("orbital radius must be positive");
    }
    if !(planet.mass >= 0.0) || !planet.mass.is_finite() {
        return invalid("mass must be non-negative");
    }
    if !(planet.orbital_speed_multiplier > 0.0) {
        return invalid("orbital speed multiplier must be positive");
    }
    for civ in &planet.civilizations {
        if !(civ.growth_rate > 1.0) || !civ.growth_rate.is_finite() {
            return invalid("civilization growth rate must be greater than 1");
        }
        if !(civ.population >= 0.0) || !civ.population.is_finite() {
            return invalid("civilization population must be non-negative");
        }
    }
    Ok(())
}

fn sol() -> StarSystem {
    let planet = |name: &str, radius: f64, angle: f64, composition: Composition| Planet {
        name: name.to_string(),
        mass: 100.0,
        orbital_radius: radius,
        start_angle: angle,
        orbital_speed_multiplier: 1.0,
        scan: ScanState::default(),
        civilizations: Vec::new(),
        composition,
        atmosphere: None,
        temperature: None,
        biosphere: None,
    };
    let civ = |species: &str, population: f64, growth_rate: f64, technology, years_ago: f64| {
        Civilization {
            species: species.to_string(),
            population,
            growth_rate,
            technology,
            established: -years_ago * MINUTES_PER_YEAR,
        }
    };

    let cinder = Planet {
        mass: 60.0,
        temperature: Some(440.0),
        ..planet("Cinder", 1_800.0, 1.1, Composition::Metallic)
    };
    let verdance = Planet {
        mass: 120.0,
        atmosphere: Some(Atmosphere::Breathable),
        temperature: Some(288.0),
        biosphere: Some(Biosphere::Fauna),
        civilizations: vec![
            civ("Verdani", 2.0e8, 1.012, Technology::Industrial, 3_000.0),
            civ("Oruun", 4.0e5, 1.004, Technology::Neolithic, 900.0),
            civ("Verdani", 3.5e7, 1.02, Technology::PreIndustrial, 400.0),
        ],
        ..planet("Verdance", 3_200.0, 2.4, Composition::Oceanic)
    };
    let hollow = Planet {
        atmosphere: Some(Atmosphere::Thin),
        temperature: Some(210.0),
        ..planet("Hollow", 4_100.0, 4.0, Composition::Rocky)
    };
    let aster = Planet {
        atmosphere: Some(Atmosphere::Toxic),
        temperature: Some(260.0),
        biosphere: Some(Biosphere::Microbial),
        civilizations: vec![civ("Kaeli", 1.2e4, 1.03, Technology::Interstellar, 40.0)],
        ..planet("Aster", 6_400.0, 0.3, Composition::Rocky)
    };
    let titanis = Planet {
        mass: 9_000.0,
        atmosphere: Some(Atmosphere::Dense),
        temperature: Some(120.0),
        ..planet("Titanis", 9_500.0, 5.2, Composition::GasGiant)
    };

    StarSystem::new([
        OrbitalBody::Sun {
            name: HOME_SYSTEM.to_string(),
            mass: 2.0e7,
        },
        OrbitalBody::Planet(cinder),
        OrbitalBody::Planet(verdance),
        OrbitalBody::Planet(hollow),
        OrbitalBody::Planet(aster),
        OrbitalBody::Planet(titanis),
    ])
}
