//! voyage: headless runner for the STARWAKE simulation.
//!
//! Usage:
//!   voyage --days 365
//!   voyage --scenario two_stars.yaml --thrust 1,0 --thrust-days 5 --scan Verdance
//!   voyage --travel Kessa --save-dir saves --slot after-jump
//!   voyage --save-dir saves --slot after-jump --resume --days 30

use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::Parser;

use starwake_core::commands::{FrameInput, ShipCommand};
use starwake_core::events::SimEvent;
use starwake_core::types::Vector2;
use starwake_sim::persistence;
use starwake_sim::{Scenario, SimConfig, SimulationEngine};

#[derive(Debug, Parser)]
#[command(author, version, about = "STARWAKE headless voyage runner")]
struct Cli {
    /// Scenario YAML file (built-in Sol neighbourhood when omitted)
    #[arg(long)]
    scenario: Option<PathBuf>,

    /// Seed for the built-in scenario
    #[arg(long, default_value_t = 42)]
    seed: u64,

    /// Days to fly
    #[arg(long, default_value_t = 365.0)]
    days: f64,

    /// Days per simulated frame
    #[arg(long, default_value_t = 1.0)]
    frame_days: f64,

    /// Thrust direction as `x,y`
    #[arg(long, value_parser = parse_vector, allow_hyphen_values = true)]
    thrust: Option<Vector2>,

    /// Days to hold the thrust before coasting
    #[arg(long, default_value_t = 0.0)]
    thrust_days: f64,

    /// Planet of the current system to scan
    #[arg(long)]
    scan: Option<String>,

    /// Star system to jump to before flying
    #[arg(long)]
    travel: Option<String>,

    /// Directory for save files
    #[arg(long)]
    save_dir: Option<PathBuf>,

    /// Save slot name
    #[arg(long, default_value = "voyage")]
    slot: String,

    /// Resume from the save slot instead of starting fresh
    #[arg(long)]
    resume: bool,
}

fn parse_vector(s: &str) -> Result<Vector2, String> {
    let (x, y) = s
        .split_once(',')
        .ok_or_else(|| format!("expected x,y but got '{s}'"))?;
    let x: f64 = x.trim().parse().map_err(|e| format!("bad x '{x}': {e}"))?;
    let y: f64 = y.trim().parse().map_err(|e| format!("bad y '{y}': {e}"))?;
    Ok(Vector2::new(x, y))
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let cli = Cli::parse();

    if !(cli.frame_days > 0.0) {
        bail!("--frame-days must be positive");
    }

    let config = SimConfig {
        seed: cli.seed,
        ..SimConfig::default()
    };
    let scenario = match &cli.scenario {
        Some(path) => Scenario::load(path)
            .with_context(|| format!("loading scenario {}", path.display()))?,
        None => Scenario::builtin(cli.seed, starwake_sim::engine::BUILTIN_NEIGHBOURS),
    };

    let mut engine = if cli.resume {
        let Some(dir) = &cli.save_dir else {
            bail!("--resume needs --save-dir");
        };
        let save = persistence::load_from_file(dir, &cli.slot)
            .with_context(|| format!("loading save slot '{}'", cli.slot))?;
        SimulationEngine::restore(scenario.chart.clone(), save, config)?
    } else {
        SimulationEngine::new(scenario, config)?
    };

    if let Some(system) = &cli.travel {
        let outcome = engine.apply(ShipCommand::TravelTo {
            system: system.clone(),
        })?;
        log::info!("travel to {system}: {outcome:?}");
    }
    if let Some(planet) = &cli.scan {
        engine.apply(ShipCommand::TargetPlanet {
            planet: planet.clone(),
        })?;
    }

    let mut events = engine.take_events();
    let mut flown = 0.0;
    while flown < cli.days && engine.ended().is_none() {
        let frame = cli.frame_days.min(cli.days - flown);
        let input = match cli.thrust {
            Some(direction) if flown < cli.thrust_days => FrameInput::thrusting(frame, direction),
            _ => FrameInput::coasting(frame),
        };
        events.extend(engine.tick(&input).events);
        flown += frame;
    }

    for event in &events {
        match event {
            SimEvent::Warning { message } => println!("warning: {message}"),
            SimEvent::LocationChanged { path } => println!("location: {path}"),
            SimEvent::RunEnded { reason } => println!("run ended: {reason}"),
            SimEvent::FabricationComplete { kind } => println!("fabricated: {kind}"),
            SimEvent::RepairComplete => println!("hull repaired"),
            SimEvent::VesselLaunched { kind } => println!("launched: {kind}"),
            SimEvent::ShowInfo { .. } => {}
        }
    }
    if let Some(planet) = &cli.scan {
        let readout = engine.readout(planet)?;
        println!(
            "{}: {} | atmosphere {} | {} | biosphere {} | civilization {}",
            readout.planet,
            readout.composition,
            readout.atmosphere,
            readout.temperature,
            readout.biosphere,
            readout.civilization
        );
    }

    let clock = engine.clock();
    let stores = engine.resources();
    println!(
        "At {} after {:.2} years ({:.2} aboard). Fuel {:.1}, hull {:.1}, supplies {:.1}, passengers {:.1}",
        engine.location().path(),
        clock.earth_years(),
        clock.relative_years(),
        stores.fuel,
        stores.integrity,
        stores.supplies,
        stores.passengers
    );

    if let Some(dir) = &cli.save_dir {
        let path = persistence::save_to_file(dir, &cli.slot, &engine.save_state())?;
        println!("Saved to {}", path.display());
    }
    Ok(())
}
