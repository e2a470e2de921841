//! Fundamental geometric and simulation types.

use serde::{Deserialize, Serialize};

/// 2D vector in system space (stylized distance units, +x right, +y up).
pub type Vector2 = glam::DVec2;

/// Build a vector from polar coordinates (radians, counter-clockwise from +x).
pub fn from_polar(radius: f64, angle: f64) -> Vector2 {
    Vector2::new(radius * angle.cos(), radius * angle.sin())
}

/// Polar angle of a vector in radians, normalized to `[0, TAU)`.
pub fn angle_of(v: Vector2) -> f64 {
    v.y.atan2(v.x).rem_euclid(std::f64::consts::TAU)
}

/// A fixed point mass attracting the ship.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GravityWell {
    pub position: Vector2,
    pub mass: f64,
}

impl GravityWell {
    pub fn new(position: Vector2, mass: f64) -> Self {
        Self { position, mass }
    }
}

/// One step of a predicted trajectory.
///
/// `acceleration` is the one in force at `position`; `velocity` has already
/// been advanced by the step that leaves `position`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TrajectorySample {
    pub position: Vector2,
    pub velocity: Vector2,
    pub acceleration: Vector2,
}

/// The two parallel clocks, both in minutes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SimulationClock {
    /// Time experienced by a stationary observer.
    pub earth_time: f64,
    /// Time experienced aboard the ship.
    pub relative_time: f64,
}

impl SimulationClock {
    pub fn new(earth_time: f64, relative_time: f64) -> Self {
        Self {
            earth_time,
            relative_time,
        }
    }

    /// Advance both clocks. Negative deltas are ignored so the clocks never run backwards.
    pub fn advance(&mut self, earth_minutes: f64, relative_minutes: f64) {
        self.earth_time += earth_minutes.max(0.0);
        self.relative_time += relative_minutes.max(0.0);
    }

    /// Earth time expressed in years.
    pub fn earth_years(&self) -> f64 {
        self.earth_time / crate::constants::MINUTES_PER_YEAR
    }

    /// Ship time expressed in years.
    pub fn relative_years(&self) -> f64 {
        self.relative_time / crate::constants::MINUTES_PER_YEAR
    }
}

/// Elapsed time and acceleration experienced during one integration step.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct StepDelta {
    pub earth_minutes: f64,
    pub relative_minutes: f64,
    /// Magnitude of the total acceleration (gravity + thrust) in g.
    pub total_acceleration_g: f64,
    /// Magnitude of the ship's own thrust in g.
    pub own_acceleration_g: f64,
}

impl StepDelta {
    /// Relative (ship) time of this step in days.
    pub fn relative_days(&self) -> f64 {
        self.relative_minutes / crate::constants::MINUTES_PER_DAY
    }

    /// A delta carrying elapsed time only, with no acceleration load.
    pub fn time_only(earth_minutes: f64, relative_minutes: f64) -> Self {
        Self {
            earth_minutes,
            relative_minutes,
            ..Default::default()
        }
    }
}
