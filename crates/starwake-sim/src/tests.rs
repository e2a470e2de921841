//! Tests for the simulation engine: flight, resources, scanning, travel and saves.

use starwake_core::commands::{ActionOutcome, FrameInput, ShipCommand};
use starwake_core::constants::*;
use starwake_core::enums::*;
use starwake_core::events::SimEvent;
use starwake_core::state::{
    Civilization, Location, OrbitalBody, Planet, ResourceState, ScanState, StarSystem,
};
use starwake_core::types::Vector2;
use starwake_procgen::generate_system;

use crate::engine::{SimConfig, SimulationEngine};
use crate::error::SimError;
use crate::persistence;
use crate::scenario::Scenario;
use crate::systems::navigation::{self, StarChart};
use crate::systems::{civilization, scanning};

// ---- Helpers ----

fn planet(name: &str, radius: f64, start_angle: f64) -> Planet {
    Planet {
        name: name.to_string(),
        mass: 100.0,
        orbital_radius: radius,
        start_angle,
        orbital_speed_multiplier: 1.0,
        scan: ScanState::default(),
        civilizations: Vec::new(),
        composition: Composition::Rocky,
        atmosphere: Some(Atmosphere::Thin),
        temperature: Some(210.0),
        biosphere: None,
    }
}

fn verdance() -> Planet {
    Planet {
        composition: Composition::Oceanic,
        atmosphere: Some(Atmosphere::Breathable),
        temperature: Some(288.0),
        biosphere: Some(Biosphere::Fauna),
        civilizations: vec![Civilization {
            species: "Verdani".into(),
            population: 1.0e6,
            growth_rate: 1.02,
            technology: Technology::Industrial,
            established: -100.0 * MINUTES_PER_YEAR,
        }],
        ..planet("Verdance", 3_200.0, 2.0)
    }
}

/// Sol (with the given sun mass and planets) and a generated neighbour 5 ly away.
/// The ship starts on a circular orbit at `ARRIVAL_DISTANCE`.
fn single_star(sun_mass: f64, planets: Vec<Planet>) -> Scenario {
    let mut bodies = vec![OrbitalBody::Sun {
        name: "Sol".into(),
        mass: sun_mass,
    }];
    bodies.extend(planets.into_iter().map(OrbitalBody::Planet));
    let sol = StarSystem::new(bodies);
    let ship = navigation::arrival_state(&sol);

    Scenario {
        name: "test".into(),
        chart: StarChart {
            positions: [
                ("Sol".to_string(), Vector2::ZERO),
                ("Kessa".to_string(), Vector2::new(3.0, 4.0)),
            ]
            .into_iter()
            .collect(),
        },
        systems: [
            ("Sol".to_string(), sol),
            ("Kessa".to_string(), generate_system("Kessa", 17)),
        ]
        .into_iter()
        .collect(),
        start_system: "Sol".into(),
        ship,
        resources: ResourceState::full(),
    }
}

fn engine(scenario: Scenario) -> SimulationEngine {
    SimulationEngine::new(scenario, SimConfig::default()).unwrap()
}

fn count_warnings(events: &[SimEvent], prefix: &str) -> usize {
    events
        .iter()
        .filter(|e| matches!(e, SimEvent::Warning { message } if message.starts_with(prefix)))
        .count()
}

// ---- Flight ----

#[test]
fn test_ten_year_orbit_stays_bounded() {
    let mut engine = engine(single_star(2.0e7, Vec::new()));
    for day in 0..3_650 {
        let report = engine.tick(&FrameInput::coasting(1.0));
        assert_eq!(report.steps, 10);
        let r = report.ship.position.length();
        assert!(
            (r - ARRIVAL_DISTANCE).abs() < 0.01 * ARRIVAL_DISTANCE,
            "orbit drifted to r = {r} on day {day}"
        );
        assert!(report.ended.is_none());
    }

    let clock = engine.clock();
    assert!((clock.earth_years() - 10.0).abs() < 1e-9);
    assert!(clock.relative_time < clock.earth_time);
    assert!(clock.relative_time > 0.99 * clock.earth_time);
    assert_eq!(engine.resources().fuel, RESOURCE_MAX);
}

#[test]
fn test_thrust_until_fuel_runs_out() {
    // Negligible gravity: only the engine acts on the ship.
    let mut engine = engine(single_star(1.0, Vec::new()));
    let mut terminal_events = 0;
    let mut first_end = None;
    for day in 0..120 {
        let report = engine.tick(&FrameInput::thrusting(1.0, Vector2::X));
        terminal_events += report
            .events
            .iter()
            .filter(|e| matches!(e, SimEvent::RunEnded { .. }))
            .count();
        if report.ended.is_some() && first_end.is_none() {
            first_end = Some(day);
        }
    }

    assert_eq!(engine.ended(), Some(RunEndReason::Fuel));
    assert_eq!(engine.resources().fuel, 0.0);
    assert_eq!(terminal_events, 1);
    // 2 g burns two units a day: roughly fifty days of fuel.
    let day = first_end.unwrap();
    assert!((49..=52).contains(&day), "fuel ran out on day {day}");

    // Nothing moves once the run is over.
    let frozen = engine.ship();
    let report = engine.tick(&FrameInput::thrusting(1.0, Vector2::X));
    assert_eq!(report.steps, 0);
    assert_eq!(report.ship, frozen);
    assert!(!engine.apply(ShipCommand::StartRepair).unwrap().is_accepted());
}

#[test]
fn test_thrust_sets_orientation_and_retargets() {
    let mut engine = engine(single_star(2.0e7, Vec::new()));
    let coasting: Vec<Vector2> = engine.predicted_path();
    assert_eq!(coasting.len(), LOOKAHEAD_STEPS);

    engine.tick(&FrameInput::thrusting(0.0, Vector2::new(0.0, -3.0)));
    let thrusting = engine.predicted_path();
    assert_eq!(thrusting.len(), LOOKAHEAD_STEPS);
    assert_ne!(coasting.last(), thrusting.last());
    assert!((engine.ship().orientation - 1.5 * std::f64::consts::PI).abs() < 1e-12);
}

#[test]
fn test_predicted_stress_warns_once() {
    // Four g of gravity on the arrival orbit.
    let mut engine = engine(single_star(1.0e8, Vec::new()));
    let mut events = Vec::new();
    for _ in 0..5 {
        events.extend(engine.tick(&FrameInput::coasting(1.0)).events);
    }
    assert_eq!(count_warnings(&events, "Predicted acceleration"), 1);
    assert!(engine.resources().integrity < RESOURCE_MAX);
}

#[test]
fn test_time_scale_and_step_cap() {
    let mut engine = engine(single_star(2.0e7, Vec::new()));
    let paused = FrameInput {
        time_scale: 0.0,
        ..FrameInput::coasting(1.0)
    };
    assert_eq!(engine.tick(&paused).steps, 0);

    let doubled = FrameInput {
        time_scale: 2.0,
        ..FrameInput::coasting(1.0)
    };
    assert_eq!(engine.tick(&doubled).steps, 20);

    assert_eq!(engine.tick(&FrameInput::coasting(f64::NAN)).steps, 0);
    assert_eq!(engine.tick(&FrameInput::coasting(-5.0)).steps, 0);

    let report = engine.tick(&FrameInput::coasting(1_000.0));
    assert_eq!(report.steps, MAX_STEPS_PER_FRAME);
    // Excess is dropped, not carried into the next frame.
    assert_eq!(engine.tick(&FrameInput::coasting(1.0)).steps, 10);
}

#[test]
fn test_partial_steps_accumulate() {
    let mut engine = engine(single_star(2.0e7, Vec::new()));
    let mut steps = 0;
    for _ in 0..9 {
        steps += engine.tick(&FrameInput::coasting(0.05)).steps;
    }
    assert_eq!(steps, 4);
}

// ---- Orbit capture, scanning, vessels ----

#[test]
fn test_orbit_capture_and_lander() {
    // Hollow orbits just outside the ship and slightly ahead; the ship's
    // faster inner orbit catches up with it.
    let mut engine = engine(single_star(2.0e7, vec![planet("Hollow", 5_100.0, 0.06)]));
    assert_eq!(engine.location().body, None);

    let mut events = Vec::new();
    for _ in 0..200 {
        events.extend(engine.tick(&FrameInput::coasting(1.0)).events);
        if engine.location().body.is_some() {
            break;
        }
    }
    assert_eq!(engine.location().path(), "Sol/Hollow");
    assert!(events.contains(&SimEvent::LocationChanged {
        path: "Sol/Hollow".into()
    }));

    let outcome = engine
        .apply(ShipCommand::StartFabrication {
            kind: VesselKind::Lander,
        })
        .unwrap();
    assert!(outcome.is_accepted());
    for _ in 0..7 {
        events.extend(engine.tick(&FrameInput::coasting(1.0)).events);
    }
    assert!(events.contains(&SimEvent::FabricationComplete {
        kind: VesselKind::Lander
    }));
    assert_eq!(engine.location().body.as_deref(), Some("Hollow"));

    let outcome = engine
        .apply(ShipCommand::LaunchVessel {
            kind: VesselKind::Lander,
        })
        .unwrap();
    assert!(outcome.is_accepted());
    let readout = engine.readout("Hollow").unwrap();
    assert_eq!(readout.atmosphere, "Thin");
    assert_eq!(readout.temperature, "210 K");
    assert_eq!(readout.biosphere, "Sterile");
    assert_eq!(readout.civilization, "None");
}

#[test]
fn test_lander_needs_orbit() {
    let mut engine = engine(single_star(2.0e7, vec![verdance()]));
    let outcome = engine
        .apply(ShipCommand::LaunchVessel {
            kind: VesselKind::Lander,
        })
        .unwrap();
    assert_eq!(
        outcome,
        ActionOutcome::Declined("Landers need a planet in orbit".into())
    );
    assert_eq!(count_warnings(&engine.take_events(), "Landers"), 1);
}

#[test]
fn test_scan_through_engine() {
    let mut engine = engine(single_star(2.0e7, vec![verdance()]));
    engine
        .apply(ShipCommand::TargetPlanet {
            planet: "Verdance".into(),
        })
        .unwrap();
    let events = engine.take_events();
    assert!(matches!(
        events.as_slice(),
        [SimEvent::ShowInfo { readout: Some(r) }] if r.planet == "Verdance" && r.atmosphere == "Unknown"
    ));

    // One day at this range is not enough to learn everything.
    engine.tick(&FrameInput::coasting(1.0));
    let scanned = engine.current_system().planet("Verdance").unwrap().scan;
    assert!(scanned.active);
    assert!(scanned.minutes > 0.0);
    assert_eq!(engine.ship_systems().sensors.target.as_deref(), Some("Verdance"));

    engine.apply(ShipCommand::CancelScan).unwrap();
    let report = engine.tick(&FrameInput::coasting(1.0));
    assert!(report
        .events
        .contains(&SimEvent::ShowInfo { readout: None }));
    let after = engine.current_system().planet("Verdance").unwrap().scan;
    assert!(!after.active);
    assert_eq!(after.minutes, scanned.minutes);
}

#[test]
fn test_scan_unknown_planet_is_an_error() {
    let mut engine = engine(single_star(2.0e7, vec![verdance()]));
    let err = engine
        .apply(ShipCommand::TargetPlanet {
            planet: "Nowhere".into(),
        })
        .unwrap_err();
    assert!(matches!(err, SimError::UnknownBody { body, .. } if body == "Nowhere"));
    assert!(engine.readout("Nowhere").is_err());
}

#[test]
fn test_probe_boosts_scan() {
    let mut engine = engine(single_star(2.0e7, vec![verdance()]));
    engine
        .apply(ShipCommand::StartFabrication {
            kind: VesselKind::Probe,
        })
        .unwrap();
    // The workshop takes one job at a time.
    let busy = engine.apply(ShipCommand::StartRepair).unwrap();
    assert!(!busy.is_accepted());
    for _ in 0..3 {
        engine.tick(&FrameInput::coasting(1.0));
    }
    assert_eq!(engine.ship_systems().hangar.count(VesselKind::Probe), 1);

    let no_target = engine
        .apply(ShipCommand::LaunchVessel {
            kind: VesselKind::Probe,
        })
        .unwrap();
    assert!(!no_target.is_accepted());
    assert_eq!(engine.ship_systems().hangar.count(VesselKind::Probe), 1);

    engine
        .apply(ShipCommand::TargetPlanet {
            planet: "Verdance".into(),
        })
        .unwrap();
    let before = engine.current_system().planet("Verdance").unwrap().scan.minutes;
    let launched = engine
        .apply(ShipCommand::LaunchVessel {
            kind: VesselKind::Probe,
        })
        .unwrap();
    assert!(launched.is_accepted());
    let after = engine.current_system().planet("Verdance").unwrap().scan.minutes;
    assert!((after - before - PROBE_SCAN_BONUS_MINUTES).abs() < 1e-9);
    assert_eq!(engine.ship_systems().hangar.count(VesselKind::Probe), 0);
    assert!(engine
        .take_events()
        .contains(&SimEvent::VesselLaunched {
            kind: VesselKind::Probe
        }));
}

// ---- Interstellar travel ----

#[test]
fn test_travel_to_neighbour() {
    let mut engine = SimulationEngine::with_builtin(SimConfig::default());
    let (destination, _) = engine.chart().neighbours("Sol").remove(0);
    let sol_population = |engine: &SimulationEngine| -> f64 {
        engine.systems()["Sol"]
            .planets()
            .map(|p| civilization::total_population(&p.civilizations))
            .sum()
    };
    let before = sol_population(&engine);

    let outcome = engine
        .apply(ShipCommand::TravelTo {
            system: destination.clone(),
        })
        .unwrap();
    assert!(outcome.is_accepted());

    assert_eq!(engine.location().system, destination);
    let clock = engine.clock();
    assert!(clock.earth_time > clock.relative_time);
    assert!(clock.relative_time > 0.0);
    assert!((engine.resources().fuel - (RESOURCE_MAX - JUMP_FUEL_COST)).abs() < 1e-9);
    assert!(engine.resources().supplies < RESOURCE_MAX);
    assert!((engine.ship().position.length() - ARRIVAL_DISTANCE).abs() < 1e-9);
    assert!(sol_population(&engine) > before);
    assert!(engine.take_events().contains(&SimEvent::LocationChanged {
        path: destination.clone()
    }));

    // Flight continues around the new sun.
    let report = engine.tick(&FrameInput::coasting(1.0));
    assert_eq!(report.steps, 10);
    assert!(report.location.starts_with(&destination));
}

#[test]
fn test_travel_declined_and_rejected() {
    let mut scenario = single_star(2.0e7, Vec::new());
    scenario.resources.fuel = JUMP_FUEL_COST;
    let mut engine = engine(scenario);

    let outcome = engine
        .apply(ShipCommand::TravelTo {
            system: "Kessa".into(),
        })
        .unwrap();
    assert!(!outcome.is_accepted());
    assert_eq!(engine.location().system, "Sol");
    assert_eq!(engine.clock().earth_time, 0.0);

    let same = engine
        .apply(ShipCommand::TravelTo {
            system: "Sol".into(),
        })
        .unwrap();
    assert!(!same.is_accepted());

    let err = engine
        .apply(ShipCommand::TravelTo {
            system: "Vega".into(),
        })
        .unwrap_err();
    assert!(matches!(err, SimError::UnknownSystem(name) if name == "Vega"));
}

#[test]
fn test_travel_cancels_scan() {
    let mut engine = engine(single_star(2.0e7, vec![verdance()]));
    engine
        .apply(ShipCommand::TargetPlanet {
            planet: "Verdance".into(),
        })
        .unwrap();
    engine
        .apply(ShipCommand::TravelTo {
            system: "Kessa".into(),
        })
        .unwrap();
    assert_eq!(engine.ship_systems().sensors.target, None);
    assert!(!engine.systems()["Sol"].planet("Verdance").unwrap().scan.active);
}

// ---- Determinism and saves ----

fn fly(engine: &mut SimulationEngine, days: usize) {
    for day in 0..days {
        let input = if day % 20 < 3 {
            FrameInput::thrusting(1.0, Vector2::new(1.0, 1.0))
        } else {
            FrameInput::coasting(1.0)
        };
        engine.tick(&input);
    }
}

#[test]
fn test_determinism_same_seed() {
    let mut engine_a = SimulationEngine::with_builtin(SimConfig {
        seed: 12345,
        ..Default::default()
    });
    let mut engine_b = SimulationEngine::with_builtin(SimConfig {
        seed: 12345,
        ..Default::default()
    });
    for _ in 0..10 {
        fly(&mut engine_a, 10);
        fly(&mut engine_b, 10);
        let json_a = persistence::to_json(&engine_a.save_state()).unwrap();
        let json_b = persistence::to_json(&engine_b.save_state()).unwrap();
        assert_eq!(json_a, json_b, "runs diverged with same seed");
    }
}

#[test]
fn test_different_seeds_chart_different_neighbourhoods() {
    let a = SimulationEngine::with_builtin(SimConfig {
        seed: 1,
        ..Default::default()
    });
    let b = SimulationEngine::with_builtin(SimConfig {
        seed: 2,
        ..Default::default()
    });
    assert_eq!(a.systems()["Sol"], b.systems()["Sol"]);
    assert_ne!(a.chart(), b.chart());
}

#[test]
fn test_save_restore_resumes_flight() {
    let mut original = SimulationEngine::with_builtin(SimConfig::default());
    original
        .apply(ShipCommand::TargetPlanet {
            planet: "Verdance".into(),
        })
        .unwrap();
    fly(&mut original, 30);
    // Coast a step so the save is taken without thrust.
    original.tick(&FrameInput::coasting(1.0));

    let dir = tempfile::tempdir().unwrap();
    persistence::save_to_file(dir.path(), "auto", &original.save_state()).unwrap();
    let loaded = persistence::load_from_file(dir.path(), "auto").unwrap();
    assert_eq!(loaded, original.save_state());

    let mut restored =
        SimulationEngine::restore(original.chart().clone(), loaded.clone(), SimConfig::default())
            .unwrap();
    let mut again =
        SimulationEngine::restore(original.chart().clone(), loaded, SimConfig::default()).unwrap();
    for _ in 0..30 {
        original.tick(&FrameInput::coasting(1.0));
        restored.tick(&FrameInput::coasting(1.0));
        again.tick(&FrameInput::coasting(1.0));
    }
    // Two restores of one save are indistinguishable.
    assert_eq!(restored.save_state(), again.save_state());

    // The saved velocity is already one step ahead of the saved position, so
    // a restore follows a neighbouring orbit rather than the same one.
    assert_eq!(restored.clock().earth_time, original.clock().earth_time);
    let ship = original.ship();
    let drift = restored.ship().position.distance(ship.position);
    assert!(drift < ship.position.length() * 0.01, "restored ship drifted {drift} units");
    let dv = restored.ship().velocity.distance(ship.velocity);
    assert!(dv < ship.velocity.length() * 0.01, "restored velocity differs by {dv}");
    let (a, b) = (restored.resources(), original.resources());
    assert!((a.fuel - b.fuel).abs() < 1e-3);
    assert!((a.integrity - b.integrity).abs() < 1e-3);
    assert!((a.supplies - b.supplies).abs() < 1e-3);
    let minutes = original.clock().relative_time;
    assert!((restored.clock().relative_time - minutes).abs() < minutes * 1e-6);
}

#[test]
fn test_save_state_json_shape() {
    let engine = SimulationEngine::with_builtin(SimConfig::default());
    let value: serde_json::Value =
        serde_json::from_str(&persistence::to_json(&engine.save_state()).unwrap()).unwrap();
    for key in ["earthTime", "relativeTime", "ship", "systems", "shipSystems", "location"] {
        assert!(value.get(key).is_some(), "missing key {key}");
    }
    assert!(value["ship"]["position"].is_array());
    assert_eq!(value["location"]["system"], "Sol");
    assert_eq!(value["systems"]["Sol"]["objects"]["Sol"]["type"], "Sun");
}

#[test]
fn test_restore_rejects_unknown_location() {
    let engine = SimulationEngine::with_builtin(SimConfig::default());
    let mut save = engine.save_state();
    save.location = Location::in_system("Nowhere");
    let err = SimulationEngine::restore(engine.chart().clone(), save, SimConfig::default());
    assert!(matches!(err, Err(SimError::UnknownSystem(_))));

    let mut save = engine.save_state();
    save.ship_systems.sensors.target = Some("Ghost".into());
    let err = SimulationEngine::restore(engine.chart().clone(), save, SimConfig::default());
    assert!(matches!(err, Err(SimError::UnknownBody { .. })));
}

#[test]
fn test_restore_of_finished_run_stays_finished() {
    let engine = SimulationEngine::with_builtin(SimConfig::default());
    let mut save = engine.save_state();
    save.ship_systems.stores.fuel = 0.0;
    let mut restored =
        SimulationEngine::restore(engine.chart().clone(), save, SimConfig::default()).unwrap();
    assert_eq!(restored.ended(), Some(RunEndReason::Fuel));
    assert_eq!(restored.tick(&FrameInput::coasting(1.0)).steps, 0);
}

#[test]
fn test_readouts_cover_current_system() {
    let engine = SimulationEngine::with_builtin(SimConfig::default());
    let readouts = engine.readouts();
    assert_eq!(readouts.len(), engine.current_system().planets().count());
    // The Kaeli are interstellar and visible without scanning.
    let aster = readouts.iter().find(|r| r.planet == "Aster").unwrap();
    assert!(aster.civilization.starts_with("Kaeli"));
    assert_eq!(aster.atmosphere, scanning::UNKNOWN);
}
