//! Closed-form circular orbits.
//!
//! Planet positions are a pure function of earth time and never integrated,
//! so they do not drift no matter how long a run lasts.

use std::f64::consts::TAU;

use starwake_core::constants::{GRAVITATIONAL_CONSTANT, MINUTES_PER_DAY};
use starwake_core::state::Planet;
use starwake_core::types::{from_polar, Vector2};

/// Orbital period in days: 2π·sqrt(a³ / (G·M)).
/// A massless center never completes an orbit.
pub fn orbital_period(semi_major_axis: f64, central_mass: f64) -> f64 {
    if central_mass <= 0.0 {
        return f64::INFINITY;
    }
    TAU * (semi_major_axis.powi(3) / (GRAVITATIONAL_CONSTANT * central_mass)).sqrt()
}

/// Orbital angle of a planet after `elapsed_earth_minutes`.
pub fn angle_at(planet: &Planet, sun_mass: f64, elapsed_earth_minutes: f64) -> f64 {
    let period_minutes = orbital_period(planet.orbital_radius, sun_mass) * MINUTES_PER_DAY;
    if !period_minutes.is_finite() || period_minutes <= 0.0 {
        return planet.start_angle;
    }
    planet.start_angle
        + TAU * planet.orbital_speed_multiplier * (elapsed_earth_minutes / period_minutes)
}

/// Position of a planet relative to its sun after `elapsed_earth_minutes`.
pub fn position_at(planet: &Planet, sun_mass: f64, elapsed_earth_minutes: f64) -> Vector2 {
    from_polar(
        planet.orbital_radius,
        angle_at(planet, sun_mass, elapsed_earth_minutes),
    )
}

/// Speed of a circular orbit at `radius`: sqrt(G·M / r).
pub fn circular_orbit_speed(radius: f64, central_mass: f64) -> f64 {
    if radius <= 0.0 || central_mass <= 0.0 {
        return 0.0;
    }
    (GRAVITATIONAL_CONSTANT * central_mass / radius).sqrt()
}

/// Counter-clockwise circular orbit velocity for a body at `position`
/// around a mass at the origin.
pub fn circular_orbit_velocity(position: Vector2, central_mass: f64) -> Vector2 {
    let radius = position.length();
    let speed = circular_orbit_speed(radius, central_mass);
    if speed == 0.0 {
        return Vector2::ZERO;
    }
    position.perp() / radius * speed
}
