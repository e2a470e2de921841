//! Workshop state machine: vessel fabrication, hull repair, and launches.
//!
//! ```text
//! Idle ──start_fabrication──▶ Building ──remaining ≤ 0──▶ Idle (+1 vessel)
//! Idle ──start_repair───────▶ Repairing ──hull ≥ 95%───▶ Idle
//!                                        └─no supplies─▶ Idle
//! ```

use starwake_core::commands::ActionOutcome;
use starwake_core::constants::*;
use starwake_core::enums::VesselKind;
use starwake_core::events::{EventQueue, SimEvent};
use starwake_core::state::{ShipSystems, WorkshopActivity};
use starwake_core::types::StepDelta;

use crate::systems::stores;

/// Build cost of a vessel.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VesselSpec {
    pub build_days: f64,
    pub supply_per_day: f64,
    /// Fuel loaded into the vessel when it is finished.
    pub fuel_cost: f64,
}

impl VesselSpec {
    pub fn for_kind(kind: VesselKind) -> Self {
        match kind {
            VesselKind::Probe => Self {
                build_days: PROBE_BUILD_DAYS,
                supply_per_day: PROBE_SUPPLY_PER_DAY,
                fuel_cost: PROBE_FUEL_COST,
            },
            VesselKind::Lander => Self {
                build_days: LANDER_BUILD_DAYS,
                supply_per_day: LANDER_SUPPLY_PER_DAY,
                fuel_cost: LANDER_FUEL_COST,
            },
        }
    }

    pub fn total_supplies(&self) -> f64 {
        self.build_days * self.supply_per_day
    }
}

fn decline(events: &mut EventQueue, reason: String) -> ActionOutcome {
    log::warn!("workshop declined: {reason}");
    events.warn(reason.clone());
    ActionOutcome::Declined(reason)
}

pub fn start_fabrication(
    systems: &mut ShipSystems,
    kind: VesselKind,
    events: &mut EventQueue,
) -> ActionOutcome {
    if !systems.workshop.is_idle() {
        return decline(events, "Workshop is busy".to_string());
    }
    let spec = VesselSpec::for_kind(kind);
    if systems.stores.supplies < spec.total_supplies() {
        return decline(events, format!("Not enough supplies to build a {kind}"));
    }
    // Fuelling the vessel must not drain the ship.
    if systems.stores.fuel <= spec.fuel_cost {
        return decline(events, format!("Not enough fuel to fuel a {kind}"));
    }

    systems.workshop.activity = WorkshopActivity::Building {
        kind,
        remaining_minutes: spec.build_days * MINUTES_PER_DAY,
    };
    log::debug!("fabrication of {kind} started");
    ActionOutcome::Accepted
}

pub fn start_repair(systems: &mut ShipSystems, events: &mut EventQueue) -> ActionOutcome {
    if !systems.workshop.is_idle() {
        return decline(events, "Workshop is busy".to_string());
    }
    if systems.stores.integrity >= RESOURCE_MAX * REPAIR_COMPLETE_FRACTION {
        return decline(events, "Hull does not need repair".to_string());
    }
    if systems.stores.supplies <= 0.0 {
        return decline(events, "No supplies for repairs".to_string());
    }

    systems.workshop.activity = WorkshopActivity::Repairing;
    log::debug!("hull repair started at {:.1}%", systems.stores.integrity);
    ActionOutcome::Accepted
}

/// Take a vessel out of the hangar and pay its launch fuel. The caller applies
/// whatever the vessel does once it is away.
pub fn launch(systems: &mut ShipSystems, kind: VesselKind, events: &mut EventQueue) -> ActionOutcome {
    if systems.hangar.count(kind) == 0 {
        return decline(events, format!("No {kind} in the hangar"));
    }
    if systems.stores.fuel <= LAUNCH_FUEL_COST {
        return decline(events, format!("Not enough fuel to launch a {kind}"));
    }

    systems.hangar.take(kind);
    stores::spend(&mut systems.stores, LAUNCH_FUEL_COST, 0.0, events);
    events.push(SimEvent::VesselLaunched { kind });
    log::info!("{kind} launched");
    ActionOutcome::Accepted
}

/// Advance the current workshop activity by one step.
pub(crate) fn advance(systems: &mut ShipSystems, delta: &StepDelta, events: &mut EventQueue) {
    let days = delta.relative_days().max(0.0);
    let stores = &mut systems.stores;

    match systems.workshop.activity {
        WorkshopActivity::Idle => {}
        WorkshopActivity::Building {
            kind,
            remaining_minutes,
        } => {
            // Fabrication stalls without supplies.
            if stores.supplies <= 0.0 {
                return;
            }
            let spec = VesselSpec::for_kind(kind);
            stores.supplies -= spec.supply_per_day * days;
            let remaining_minutes = remaining_minutes - delta.relative_minutes.max(0.0);
            if remaining_minutes <= 0.0 {
                stores.fuel -= spec.fuel_cost;
                systems.hangar.store(kind);
                systems.workshop.activity = WorkshopActivity::Idle;
                events.push(SimEvent::FabricationComplete { kind });
                log::info!("{kind} fabricated");
            } else {
                systems.workshop.activity = WorkshopActivity::Building {
                    kind,
                    remaining_minutes,
                };
            }
        }
        WorkshopActivity::Repairing => {
            if stores.supplies <= 0.0 {
                systems.workshop.activity = WorkshopActivity::Idle;
                events.warn("Repairs halted: no supplies");
                return;
            }
            stores.integrity += REPAIR_RATE_PER_DAY * days;
            stores.supplies -= REPAIR_SUPPLY_PER_DAY * days;
            if stores.integrity >= RESOURCE_MAX * REPAIR_COMPLETE_FRACTION {
                systems.workshop.activity = WorkshopActivity::Idle;
                events.push(SimEvent::RepairComplete);
                log::info!("hull repaired to {:.1}%", stores.integrity.min(RESOURCE_MAX));
            }
        }
    }
}
