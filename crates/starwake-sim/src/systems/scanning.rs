//! Planet scanning and progressive disclosure.
//!
//! Scan minutes accumulate on the target planet at a rate divided by
//! `max(log10(distance), MIN_SCAN_SCALING)`. Each attribute has a threshold
//! that depends on its true value; an attribute is disclosed once the
//! accumulated minutes exceed it, or immediately when the threshold is zero.

use starwake_core::constants::MIN_SCAN_SCALING;
use starwake_core::enums::{Atmosphere, Biosphere, ScanAttribute, Technology};
use starwake_core::events::{EventQueue, PlanetReadout, SimEvent};
use starwake_core::state::{Planet, Sensors, StarSystem};
use starwake_core::types::{StepDelta, Vector2};
use starwake_physics::orbits;

use crate::systems::civilization;

/// Every disclosure threshold is below this, so a scan at this many minutes
/// reveals the whole planet.
pub const FULL_DISCLOSURE_MINUTES: f64 = 10_081.0;

pub const UNKNOWN: &str = "Unknown";

/// Divisor applied to scan rate at `distance` from the target.
pub fn distance_scaling(distance: f64) -> f64 {
    distance.log10().max(MIN_SCAN_SCALING)
}

fn technology_threshold(technology: Option<Technology>) -> f64 {
    match technology {
        Some(Technology::Interstellar) => 0.0,
        Some(Technology::Intrastellar) => 60.0,
        Some(Technology::Industrial) => 720.0,
        Some(Technology::PreIndustrial) => 2_880.0,
        Some(Technology::Neolithic) => 5_760.0,
        None => 7_200.0,
    }
}

fn atmosphere_threshold(atmosphere: Option<Atmosphere>) -> f64 {
    match atmosphere {
        Some(Atmosphere::Dense) => 60.0,
        Some(Atmosphere::Toxic) => 720.0,
        Some(Atmosphere::Breathable) => 2_880.0,
        Some(Atmosphere::Thin) => 10_080.0,
        None => 4_320.0,
    }
}

fn biosphere_threshold(biosphere: Option<Biosphere>) -> f64 {
    match biosphere {
        Some(Biosphere::Fauna) => 720.0,
        Some(Biosphere::Flora) => 1_440.0,
        Some(Biosphere::Microbial) => 5_760.0,
        None => 8_640.0,
    }
}

/// Scan minutes needed to disclose `attribute` of `planet` at `earth_time`.
pub fn threshold(planet: &Planet, attribute: ScanAttribute, earth_time: f64) -> f64 {
    match attribute {
        ScanAttribute::Atmosphere => atmosphere_threshold(planet.atmosphere),
        ScanAttribute::Temperature => 180.0,
        ScanAttribute::Biosphere => biosphere_threshold(planet.biosphere),
        ScanAttribute::Civilization => technology_threshold(civilization::dominant_technology(
            &planet.civilizations,
            earth_time,
        )),
    }
}

pub fn is_disclosed(planet: &Planet, attribute: ScanAttribute, earth_time: f64) -> bool {
    let threshold = threshold(planet, attribute, earth_time);
    threshold == 0.0 || planet.scan.minutes > threshold
}

pub fn disclosed_count(planet: &Planet, earth_time: f64) -> usize {
    ScanAttribute::ALL
        .iter()
        .filter(|a| is_disclosed(planet, **a, earth_time))
        .count()
}

pub fn fully_disclosed(planet: &Planet, earth_time: f64) -> bool {
    disclosed_count(planet, earth_time) == ScanAttribute::ALL.len()
}

/// Info-panel contents for `planet`. Composition is visible from any range.
pub fn readout(system: &str, planet: &Planet, earth_time: f64) -> PlanetReadout {
    let show = |attribute: ScanAttribute, value: String| {
        if is_disclosed(planet, attribute, earth_time) {
            value
        } else {
            UNKNOWN.to_string()
        }
    };

    let civilization = match civilization::dominant_civilization(&planet.civilizations, earth_time) {
        Some(civ) => format!(
            "{} ({}, population {:.0})",
            civ.species, civ.technology, civ.population
        ),
        None => "None".to_string(),
    };

    PlanetReadout {
        system: system.to_string(),
        planet: planet.name.clone(),
        composition: planet.composition.to_string(),
        atmosphere: show(
            ScanAttribute::Atmosphere,
            planet
                .atmosphere
                .map_or_else(|| "None".to_string(), |a| a.to_string()),
        ),
        temperature: show(
            ScanAttribute::Temperature,
            planet
                .temperature
                .map_or_else(|| "Unmeasured".to_string(), |t| format!("{t:.0} K")),
        ),
        biosphere: show(
            ScanAttribute::Biosphere,
            planet
                .biosphere
                .map_or_else(|| "Sterile".to_string(), |b| b.to_string()),
        ),
        civilization: show(ScanAttribute::Civilization, civilization),
        scan_minutes: planet.scan.minutes,
    }
}

/// Add scan minutes to `planet`, announcing newly disclosed attributes and
/// stopping the scan once everything is known.
fn accumulate(
    system_name: &str,
    planet: &mut Planet,
    sensors: &mut Sensors,
    minutes: f64,
    earth_time: f64,
    events: &mut EventQueue,
) {
    let before = disclosed_count(planet, earth_time);
    if minutes > 0.0 {
        planet.scan.minutes += minutes;
    }
    if disclosed_count(planet, earth_time) > before {
        events.push(SimEvent::ShowInfo {
            readout: Some(readout(system_name, planet, earth_time)),
        });
    }
    if fully_disclosed(planet, earth_time) && planet.scan.active {
        planet.scan.active = false;
        if sensors.target.as_deref() == Some(planet.name.as_str()) {
            sensors.target = None;
        }
        log::info!("scan of {} complete", planet.name);
    }
}

/// Advance the active scan by one step.
pub fn run(
    system_name: &str,
    system: &mut StarSystem,
    sensors: &mut Sensors,
    ship_position: Vector2,
    earth_time: f64,
    delta: &StepDelta,
    events: &mut EventQueue,
) {
    let Some(target) = sensors.target.clone() else {
        return;
    };
    let sun_mass = system.sun_mass();
    let Some(planet) = system.planet_mut(&target) else {
        log::debug!("scan target {target} is not in {system_name}, dropping it");
        sensors.target = None;
        return;
    };
    let distance = ship_position.distance(orbits::position_at(planet, sun_mass, earth_time));
    let minutes = delta.relative_minutes.max(0.0) / distance_scaling(distance);
    accumulate(system_name, planet, sensors, minutes, earth_time, events);
}

/// Point the sensors at `planet_name`. Returns false if the system has no such planet.
pub fn start(
    system_name: &str,
    system: &mut StarSystem,
    sensors: &mut Sensors,
    planet_name: &str,
    earth_time: f64,
    events: &mut EventQueue,
) -> bool {
    if system.planet(planet_name).is_none() {
        return false;
    }
    if let Some(previous) = sensors.target.take() {
        if let Some(planet) = system.planet_mut(&previous) {
            planet.scan.active = false;
        }
    }
    let Some(planet) = system.planet_mut(planet_name) else {
        return false;
    };
    events.push(SimEvent::ShowInfo {
        readout: Some(readout(system_name, planet, earth_time)),
    });
    if !fully_disclosed(planet, earth_time) {
        planet.scan.active = true;
        sensors.target = Some(planet_name.to_string());
        log::debug!("scanning {planet_name}");
    }
    true
}

/// Stop scanning. Accumulated minutes are kept.
pub fn cancel(system: &mut StarSystem, sensors: &mut Sensors, events: &mut EventQueue) {
    if let Some(target) = sensors.target.take() {
        if let Some(planet) = system.planet_mut(&target) {
            planet.scan.active = false;
        }
    }
    events.push(SimEvent::ShowInfo { readout: None });
}

/// Credit a probe's close-range survey to the current target.
/// Returns false if nothing is targeted.
pub fn probe_survey(
    system_name: &str,
    system: &mut StarSystem,
    sensors: &mut Sensors,
    minutes: f64,
    earth_time: f64,
    events: &mut EventQueue,
) -> bool {
    let Some(target) = sensors.target.clone() else {
        return false;
    };
    let Some(planet) = system.planet_mut(&target) else {
        return false;
    };
    accumulate(system_name, planet, sensors, minutes, earth_time, events);
    true
}

/// A lander on the surface discloses everything about its planet.
pub fn land(
    system_name: &str,
    system: &mut StarSystem,
    sensors: &mut Sensors,
    planet_name: &str,
    earth_time: f64,
    events: &mut EventQueue,
) -> bool {
    let Some(planet) = system.planet_mut(planet_name) else {
        return false;
    };
    let needed = (FULL_DISCLOSURE_MINUTES - planet.scan.minutes).max(0.0);
    accumulate(system_name, planet, sensors, needed, earth_time, events);
    true
}
