//! Resource stepper: fuel, hull integrity, supplies and passengers.
//!
//! Each step burns fuel for thrust, stresses the hull above the safe
//! acceleration, eats supplies, and advances the workshop. Threshold
//! crossings become warnings; fuel or integrity reaching zero ends the run.

use starwake_core::constants::*;
use starwake_core::enums::RunEndReason;
use starwake_core::events::{EventQueue, SimEvent};
use starwake_core::state::{ResourceState, ShipSystems};
use starwake_core::types::StepDelta;

use crate::systems::workshop;

/// Advance all ship stores by one step. Returns the reason if this step ended the run.
pub fn run(
    systems: &mut ShipSystems,
    delta: &StepDelta,
    events: &mut EventQueue,
) -> Option<RunEndReason> {
    let before = systems.stores;
    // Damage and repair net out before the one clamp.
    consume(&mut systems.stores, delta);
    workshop::advance(systems, delta, events);
    systems.stores.clamp();
    report_crossings(&before, &systems.stores, events)
}

/// Spend a lump of fuel and supplies for a discrete action.
pub fn spend(
    stores: &mut ResourceState,
    fuel: f64,
    supplies: f64,
    events: &mut EventQueue,
) -> Option<RunEndReason> {
    let before = *stores;
    stores.fuel -= fuel.max(0.0);
    stores.supplies -= supplies.max(0.0);
    stores.clamp();
    report_crossings(&before, stores, events)
}

fn consume(stores: &mut ResourceState, delta: &StepDelta) {
    let days = delta.relative_days().max(0.0);
    let own_g = delta.own_acceleration_g.max(0.0);
    let excess_g = (delta.total_acceleration_g - SAFE_ACCELERATION_G).max(0.0);

    stores.fuel -= FUEL_PER_G_DAY * own_g * days;
    stores.integrity -= HULL_STRESS_PER_G_DAY * excess_g * days;
    stores.supplies -= SUPPLY_USE_PER_DAY * days;
    if stores.supplies <= 0.0 {
        stores.passengers -= PASSENGER_LOSS_PER_DAY * days;
    }
}

/// Emit warnings for downward threshold crossings and the terminal signal
/// for fuel or integrity reaching zero.
pub fn report_crossings(
    before: &ResourceState,
    after: &ResourceState,
    events: &mut EventQueue,
) -> Option<RunEndReason> {
    let low = RESOURCE_MAX * LOW_RESOURCE_FRACTION;
    let crossed = |was: f64, now: f64, line: f64| was > line && now <= line;

    if crossed(before.fuel, after.fuel, low) && after.fuel > 0.0 {
        events.warn(format!("Fuel low: {:.0}% remaining", after.fuel));
    }
    if crossed(before.integrity, after.integrity, low) && after.integrity > 0.0 {
        events.warn(format!("Hull integrity critical: {:.0}%", after.integrity));
    }
    if crossed(before.supplies, after.supplies, low) && after.supplies > 0.0 {
        events.warn(format!("Supplies low: {:.0}% remaining", after.supplies));
    }
    if crossed(before.supplies, after.supplies, 0.0) {
        events.warn("Supplies exhausted, passengers are starving");
    }
    if crossed(before.passengers, after.passengers, low) && after.passengers > 0.0 {
        events.warn(format!("Passengers dwindling: {:.0}% remain", after.passengers));
    }
    if crossed(before.passengers, after.passengers, 0.0) {
        events.warn("No passengers remain aboard");
    }

    let mut ended = None;
    if crossed(before.fuel, after.fuel, 0.0) {
        events.push(SimEvent::RunEnded {
            reason: RunEndReason::Fuel,
        });
        ended = Some(RunEndReason::Fuel);
    }
    if crossed(before.integrity, after.integrity, 0.0) {
        events.push(SimEvent::RunEnded {
            reason: RunEndReason::Integrity,
        });
        ended = ended.or(Some(RunEndReason::Integrity));
    }
    ended
}
