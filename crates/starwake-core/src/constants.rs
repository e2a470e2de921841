//! Simulation constants and tuning parameters.
//!
//! Distances are stylized "units", masses stylized "mass units", and the
//! integration clock runs in days. Interstellar distances are light years.

// --- Time ---

/// Minutes in one day.
pub const MINUTES_PER_DAY: f64 = 1440.0;

/// Days in one year.
pub const DAYS_PER_YEAR: f64 = 365.0;

/// Minutes in one year (525,600).
pub const MINUTES_PER_YEAR: f64 = MINUTES_PER_DAY * DAYS_PER_YEAR;

// --- Gravity ---

/// Gravitational constant in units³ / (mass · day²).
pub const GRAVITATIONAL_CONSTANT: f64 = 1.0;

/// Wells closer than this are skipped when summing gravity (avoids 1/0).
pub const MIN_WELL_DISTANCE: f64 = 1.0;

/// Acceleration (units/day²) that counts as one g aboard ship.
pub const ACCELERATION_PER_G: f64 = 1.0;

/// Player thrust magnitude in g.
pub const THRUST_ACCELERATION_G: f64 = 2.0;

// --- Integration ---

/// Fixed integration step in days.
pub const INTEGRATION_STEP_DAYS: f64 = 0.1;

/// Number of predicted samples kept ahead of the ship.
pub const LOOKAHEAD_STEPS: usize = 600;

/// Hard cap on samples consumed in one frame.
pub const MAX_STEPS_PER_FRAME: usize = 5_000;

// --- Relativity ---

/// Speed of light in units per day.
pub const LIGHT_SPEED_UNITS_PER_DAY: f64 = 1_000.0;

/// Ceiling on v/c before the contraction formula is applied.
pub const MAX_VELOCITY_FRACTION: f64 = 0.999;

/// Proper acceleration used for interstellar transits (ly/yr², roughly 1 g).
pub const TRAVEL_PROPER_ACCELERATION: f64 = 1.0;

// --- Resources ---

/// Ceiling shared by fuel, integrity, supplies and passengers.
pub const RESOURCE_MAX: f64 = 100.0;

/// Fraction of `RESOURCE_MAX` below which a low-resource warning is raised.
pub const LOW_RESOURCE_FRACTION: f64 = 0.2;

/// Fuel burned per g of own thrust per ship day.
pub const FUEL_PER_G_DAY: f64 = 1.0;

/// Acceleration the hull tolerates without damage, in g.
pub const SAFE_ACCELERATION_G: f64 = 3.0;

/// Multiple of `SAFE_ACCELERATION_G` a predicted acceleration must exceed to warn.
pub const ACCELERATION_WARNING_MULTIPLE: f64 = 1.0;

/// Integrity lost per g above the safe threshold per ship day.
pub const HULL_STRESS_PER_G_DAY: f64 = 4.0;

/// Supplies consumed per ship day regardless of activity.
pub const SUPPLY_USE_PER_DAY: f64 = 0.02;

/// Passengers lost per ship day while supplies are exhausted.
pub const PASSENGER_LOSS_PER_DAY: f64 = 0.5;

// --- Workshop ---

/// Integrity restored per ship day of repair.
pub const REPAIR_RATE_PER_DAY: f64 = 10.0;

/// Supplies consumed per ship day of repair.
pub const REPAIR_SUPPLY_PER_DAY: f64 = 1.0;

/// Repair stops once integrity reaches this fraction of `RESOURCE_MAX`.
pub const REPAIR_COMPLETE_FRACTION: f64 = 0.95;

/// Probe build time in ship days.
pub const PROBE_BUILD_DAYS: f64 = 2.0;

/// Supplies consumed per ship day while building a probe.
pub const PROBE_SUPPLY_PER_DAY: f64 = 0.5;

/// Fuel loaded into a finished probe.
pub const PROBE_FUEL_COST: f64 = 2.0;

/// Lander build time in ship days.
pub const LANDER_BUILD_DAYS: f64 = 5.0;

/// Supplies consumed per ship day while building a lander.
pub const LANDER_SUPPLY_PER_DAY: f64 = 1.0;

/// Fuel loaded into a finished lander.
pub const LANDER_FUEL_COST: f64 = 5.0;

/// Fuel spent by the ship to launch any vessel.
pub const LAUNCH_FUEL_COST: f64 = 1.0;

// --- Navigation ---

/// Distance from a planet at which the ship counts as orbiting it.
pub const ORBIT_CAPTURE_DISTANCE: f64 = 200.0;

/// Distance from the sun at which the ship arrives in a new system.
pub const ARRIVAL_DISTANCE: f64 = 5_000.0;

/// Fuel spent on an interstellar transit.
pub const JUMP_FUEL_COST: f64 = 10.0;

// --- Civilizations ---

/// Civilizations do not grow during their first year (earth time).
pub const SETTLING_PERIOD_MINUTES: f64 = MINUTES_PER_YEAR;

// --- Scanning ---

/// Floor on the distance scaling factor (scans are at most 2x real time).
pub const MIN_SCAN_SCALING: f64 = 0.5;

/// Scan minutes added to the target when a probe is launched at it.
pub const PROBE_SCAN_BONUS_MINUTES: f64 = 2_880.0;
