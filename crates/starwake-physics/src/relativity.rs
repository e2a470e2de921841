//! Relativistic travel model.
//!
//! Interstellar transits use a constant proper acceleration, flipping at the
//! midpoint to decelerate. Units: light years, years, c = 1.

use serde::{Deserialize, Serialize};

use starwake_core::constants::{
    LIGHT_SPEED_UNITS_PER_DAY, MAX_VELOCITY_FRACTION, TRAVEL_PROPER_ACCELERATION,
};

/// Duration of a transit in both frames.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TravelTime {
    /// Years elapsed for a stationary observer.
    pub reference_years: f64,
    /// Years elapsed aboard ship. Never exceeds `reference_years`.
    pub relative_years: f64,
}

/// Transit time over `distance_ly` at the standard proper acceleration.
pub fn travel_time(distance_ly: f64) -> TravelTime {
    travel_time_with(distance_ly, TRAVEL_PROPER_ACCELERATION)
}

/// Transit time over `distance_ly` at proper acceleration `a` (ly/yr²).
///
/// reference = 2·sqrt((d/2)² + d/a)
/// relative  = (2/a)·acosh(a·d/2 + 1)
pub fn travel_time_with(distance_ly: f64, a: f64) -> TravelTime {
    if !(distance_ly > 0.0) || !(a > 0.0) {
        return TravelTime::default();
    }
    let half = distance_ly / 2.0;
    TravelTime {
        reference_years: 2.0 * (half * half + distance_ly / a).sqrt(),
        relative_years: (2.0 / a) * (a * half + 1.0).acosh(),
    }
}

/// Proper time elapsed aboard a ship moving at `velocity_fraction` of c
/// while `minutes` pass for a stationary observer: minutes·sqrt(1 − v²).
///
/// Only the magnitude counts, capped at `MAX_VELOCITY_FRACTION`; NaN counts
/// as rest.
pub fn contract_time(minutes: f64, velocity_fraction: f64) -> f64 {
    let v = if velocity_fraction.is_nan() {
        0.0
    } else {
        velocity_fraction.abs().min(MAX_VELOCITY_FRACTION)
    };
    minutes * (1.0 - v * v).sqrt()
}

/// Ship speed (units/day) as a fraction of light speed.
pub fn velocity_fraction(speed_units_per_day: f64) -> f64 {
    speed_units_per_day.abs() / LIGHT_SPEED_UNITS_PER_DAY
}
