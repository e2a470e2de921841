//! Star chart, orbit capture and arrival placement.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use starwake_core::constants::{ARRIVAL_DISTANCE, ORBIT_CAPTURE_DISTANCE};
use starwake_core::events::{EventQueue, SimEvent};
use starwake_core::state::{Location, ShipState, StarSystem};
use starwake_core::types::{angle_of, from_polar, Vector2};
use starwake_physics::orbits;

/// Positions of star systems in light years.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StarChart {
    pub positions: BTreeMap<String, Vector2>,
}

impl StarChart {
    pub fn position(&self, system: &str) -> Option<Vector2> {
        self.positions.get(system).copied()
    }

    /// Distance between two charted systems in light years.
    pub fn distance(&self, from: &str, to: &str) -> Option<f64> {
        Some(self.position(from)?.distance(self.position(to)?))
    }

    pub fn contains(&self, system: &str) -> bool {
        self.positions.contains_key(system)
    }

    /// Charted systems ordered by distance from `from`, nearest first.
    pub fn neighbours(&self, from: &str) -> Vec<(String, f64)> {
        let Some(origin) = self.position(from) else {
            return Vec::new();
        };
        let mut neighbours: Vec<(String, f64)> = self
            .positions
            .iter()
            .filter(|(name, _)| name.as_str() != from)
            .map(|(name, pos)| (name.clone(), origin.distance(*pos)))
            .collect();
        neighbours.sort_by(|a, b| a.1.total_cmp(&b.1));
        neighbours
    }
}

/// The planet whose orbit the ship is inside, if any. Nearest wins.
pub fn captured_by(system: &StarSystem, ship_position: Vector2, earth_time: f64) -> Option<String> {
    let sun_mass = system.sun_mass();
    system
        .planets()
        .map(|p| {
            let distance = ship_position.distance(orbits::position_at(p, sun_mass, earth_time));
            (p, distance)
        })
        .filter(|(_, d)| *d <= ORBIT_CAPTURE_DISTANCE)
        .min_by(|a, b| a.1.total_cmp(&b.1))
        .map(|(p, _)| p.name.clone())
}

/// Update which planet the ship is orbiting.
pub fn run(
    location: &mut Location,
    system: &StarSystem,
    ship_position: Vector2,
    earth_time: f64,
    events: &mut EventQueue,
) {
    let body = captured_by(system, ship_position, earth_time);
    if body != location.body {
        location.body = body;
        let path = location.path();
        log::info!("location changed to {path}");
        events.push(SimEvent::LocationChanged { path });
    }
}

/// Where the ship appears on entering `system`: a circular orbit around the
/// sun at `distance`, at `angle` from +x, heading prograde.
pub fn orbit_state(system: &StarSystem, distance: f64, angle: f64) -> ShipState {
    let position = from_polar(distance, angle);
    let velocity = orbits::circular_orbit_velocity(position, system.sun_mass());
    ShipState {
        position,
        velocity,
        orientation: angle_of(velocity),
    }
}

pub fn arrival_state(system: &StarSystem) -> ShipState {
    orbit_state(system, ARRIVAL_DISTANCE, 0.0)
}
