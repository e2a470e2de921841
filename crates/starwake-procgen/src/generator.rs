//! Seeded star-system generator.

use std::f64::consts::TAU;

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use starwake_core::constants::MINUTES_PER_YEAR;
use starwake_core::enums::{Atmosphere, Biosphere, Composition, Technology};
use starwake_core::state::{Civilization, OrbitalBody, Planet, ScanState, StarSystem};
use starwake_core::types::{from_polar, Vector2};

use crate::names;

/// A generated system together with its place on the star chart.
#[derive(Debug, Clone, PartialEq)]
pub struct GeneratedSystem {
    pub name: String,
    /// Position on the star chart in light years.
    pub position_ly: Vector2,
    pub system: StarSystem,
}

/// Generate a star system named `name`. The sun is named after the system.
pub fn generate_system(name: &str, seed: u64) -> StarSystem {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    build_system(&mut rng, name)
}

/// Generate `count` systems scattered within `radius_ly` of `center_ly`.
pub fn generate_neighbourhood(
    seed: u64,
    count: usize,
    center_ly: Vector2,
    radius_ly: f64,
) -> Vec<GeneratedSystem> {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    let mut generated: Vec<GeneratedSystem> = Vec::with_capacity(count);
    while generated.len() < count {
        let name = names::proper_name(&mut rng);
        if generated.iter().any(|g| g.name == name) {
            continue;
        }
        let bearing = rng.gen_range(0.0..TAU);
        let distance = rng.gen_range(radius_ly * 0.25..=radius_ly);
        let system_seed: u64 = rng.gen();
        let mut system_rng = ChaCha8Rng::seed_from_u64(system_seed);
        generated.push(GeneratedSystem {
            position_ly: center_ly + from_polar(distance, bearing),
            system: build_system(&mut system_rng, &name),
            name,
        });
    }
    generated
}

fn build_system(rng: &mut ChaCha8Rng, name: &str) -> StarSystem {
    let sun_mass: f64 = rng.gen_range(1.0e7..4.0e7);
    let planet_count = rng.gen_range(2..=6);

    let mut bodies = vec![OrbitalBody::Sun {
        name: name.to_string(),
        mass: sun_mass,
    }];

    let mut radius: f64 = rng.gen_range(1_500.0..2_500.0);
    for index in 0..planet_count {
        bodies.push(OrbitalBody::Planet(build_planet(rng, name, index, radius)));
        radius *= rng.gen_range(1.4..1.9);
    }

    StarSystem::new(bodies)
}

fn build_planet(rng: &mut ChaCha8Rng, star: &str, index: usize, radius: f64) -> Planet {
    let composition = pick_composition(rng, radius);
    let mass = match composition {
        Composition::GasGiant => rng.gen_range(5_000.0..20_000.0),
        Composition::IceGiant => rng.gen_range(2_000.0..8_000.0),
        _ => rng.gen_range(50.0..500.0),
    };
    // Equilibrium-style falloff with distance from the star.
    let temperature = 290.0 * (3_000.0 / radius).sqrt() + rng.gen_range(-25.0..25.0);
    let atmosphere = pick_atmosphere(rng, composition, temperature);
    let biosphere = pick_biosphere(rng, atmosphere, temperature);
    let civilizations = match biosphere {
        Some(Biosphere::Fauna) if rng.gen_bool(0.6) => build_civilizations(rng),
        _ => Vec::new(),
    };

    Planet {
        name: names::planet_name(star, index),
        mass,
        orbital_radius: radius,
        start_angle: rng.gen_range(0.0..TAU),
        orbital_speed_multiplier: rng.gen_range(0.8..1.2),
        scan: ScanState::default(),
        civilizations,
        composition,
        atmosphere,
        temperature: Some(temperature),
        biosphere,
    }
}

fn pick_composition(rng: &mut ChaCha8Rng, radius: f64) -> Composition {
    if radius < 3_000.0 {
        if rng.gen_bool(0.3) {
            Composition::Metallic
        } else {
            Composition::Rocky
        }
    } else if radius < 6_000.0 {
        if rng.gen_bool(0.5) {
            Composition::Oceanic
        } else {
            Composition::Rocky
        }
    } else if rng.gen_bool(0.6) {
        Composition::GasGiant
    } else {
        Composition::IceGiant
    }
}

fn pick_atmosphere(
    rng: &mut ChaCha8Rng,
    composition: Composition,
    temperature: f64,
) -> Option<Atmosphere> {
    match composition {
        Composition::GasGiant | Composition::IceGiant => Some(Atmosphere::Dense),
        Composition::Metallic => rng.gen_bool(0.3).then_some(Atmosphere::Thin),
        Composition::Rocky | Composition::Oceanic => match rng.gen_range(0..5) {
            0 => None,
            1 => Some(Atmosphere::Thin),
            2 => Some(Atmosphere::Toxic),
            3 if (250.0..330.0).contains(&temperature) => Some(Atmosphere::Breathable),
            _ => Some(Atmosphere::Dense),
        },
    }
}

fn pick_biosphere(
    rng: &mut ChaCha8Rng,
    atmosphere: Option<Atmosphere>,
    temperature: f64,
) -> Option<Biosphere> {
    if !(230.0..350.0).contains(&temperature) {
        return None;
    }
    match atmosphere {
        Some(Atmosphere::Breathable) => match rng.gen_range(0..3) {
            0 => Some(Biosphere::Flora),
            _ => Some(Biosphere::Fauna),
        },
        Some(Atmosphere::Dense | Atmosphere::Toxic) => {
            rng.gen_bool(0.3).then_some(Biosphere::Microbial)
        }
        _ => None,
    }
}

fn build_civilizations(rng: &mut ChaCha8Rng) -> Vec<Civilization> {
    let species = names::species_name(rng);
    let count = rng.gen_range(1..=2);
    (0..count)
        .map(|_| {
            let technology = Technology::ALL[rng.gen_range(0..Technology::ALL.len())];
            let years_ago: f64 = rng.gen_range(2.0..5_000.0);
            Civilization {
                species: species.clone(),
                population: rng.gen_range(1.0e4..1.0e9_f64).round(),
                growth_rate: rng.gen_range(1.001..1.03),
                technology,
                established: -years_ago * MINUTES_PER_YEAR,
            }
        })
        .collect()
}
