//! Simulation engine: the per-frame driver.
//!
//! `SimulationEngine` owns the flight state, the star chart and the
//! trajectory lookahead. Each `tick` converts elapsed frame time into fixed
//! integration steps, consumes one predicted sample per step and runs the
//! per-step systems against it. Completely headless, so runs are
//! deterministic and testable.

use std::collections::BTreeMap;

use starwake_core::commands::{ActionOutcome, FrameInput, ShipCommand};
use starwake_core::constants::*;
use starwake_core::enums::{RunEndReason, VesselKind};
use starwake_core::events::{EventQueue, PlanetReadout, SimEvent};
use starwake_core::state::{
    FrameReport, Location, ResourceState, SaveState, ShipState, ShipSystems, StarSystem,
};
use starwake_core::types::{angle_of, SimulationClock, StepDelta, Vector2};
use starwake_physics::gravity::{Lookahead, Trajectory};
use starwake_physics::relativity::{contract_time, travel_time, velocity_fraction};

use crate::error::SimError;
use crate::scenario::Scenario;
use crate::systems::navigation::{self, StarChart};
use crate::systems::{civilization, scanning, stores, workshop};

/// Number of generated neighbours around Sol in the built-in scenario.
pub const BUILTIN_NEIGHBOURS: usize = 5;

/// Configuration for starting a new simulation.
#[derive(Debug, Clone, PartialEq)]
pub struct SimConfig {
    /// Seed for the built-in scenario's generated neighbourhood.
    pub seed: u64,
    /// Multiplier applied on top of each frame's own time scale.
    pub time_scale: f64,
    /// Integration step in days.
    pub step_days: f64,
    /// Predicted samples kept ahead of the ship.
    pub lookahead_steps: usize,
    /// Steps beyond this in one frame are dropped.
    pub max_steps_per_frame: usize,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            seed: 42,
            time_scale: 1.0,
            step_days: INTEGRATION_STEP_DAYS,
            lookahead_steps: LOOKAHEAD_STEPS,
            max_steps_per_frame: MAX_STEPS_PER_FRAME,
        }
    }
}

/// The simulation engine. Owns all flight state.
pub struct SimulationEngine {
    config: SimConfig,
    clock: SimulationClock,
    ship: ShipState,
    systems: BTreeMap<String, StarSystem>,
    ship_systems: ShipSystems,
    location: Location,
    chart: StarChart,
    lookahead: Lookahead,
    /// Normalized thrust direction, `None` while coasting.
    thrust_direction: Option<Vector2>,
    /// Frame time not yet consumed by a whole step, in days.
    pending_days: f64,
    events: EventQueue,
    ended: Option<RunEndReason>,
    /// Whether the last step predicted acceleration above hull tolerance.
    stress_predicted: bool,
}

/// The system the ship is in. Construction guarantees it exists.
fn located<'a>(
    systems: &'a mut BTreeMap<String, StarSystem>,
    location: &Location,
) -> &'a mut StarSystem {
    match systems.get_mut(&location.system) {
        Some(system) => system,
        None => unreachable!("ship is in unknown system '{}'", location.system),
    }
}

impl SimulationEngine {
    /// Start a fresh run from `scenario`.
    pub fn new(scenario: Scenario, config: SimConfig) -> Result<Self, SimError> {
        scenario.validate()?;
        Ok(Self::from_scenario(scenario, config))
    }

    /// Start a fresh run in the built-in Sol neighbourhood.
    pub fn with_builtin(config: SimConfig) -> Self {
        let scenario = Scenario::builtin(config.seed, BUILTIN_NEIGHBOURS);
        Self::from_scenario(scenario, config)
    }

    fn from_scenario(scenario: Scenario, config: SimConfig) -> Self {
        let Scenario {
            chart,
            systems,
            start_system,
            ship,
            resources,
            ..
        } = scenario;
        let ship_systems = ShipSystems {
            stores: resources,
            ..ShipSystems::default()
        };
        Self::assemble(
            config,
            chart,
            SimulationClock::default(),
            ship,
            systems,
            ship_systems,
            Location::in_system(start_system),
        )
    }

    /// Resume a saved run. The chart is static scenario data and is not saved.
    pub fn restore(chart: StarChart, save: SaveState, config: SimConfig) -> Result<Self, SimError> {
        let SaveState {
            earth_time,
            relative_time,
            ship,
            systems,
            ship_systems,
            location,
        } = save;

        let system = systems
            .get(&location.system)
            .ok_or_else(|| SimError::UnknownSystem(location.system.clone()))?;
        if !chart.contains(&location.system) {
            return Err(SimError::UnknownSystem(location.system.clone()));
        }
        for body in [&location.body, &ship_systems.sensors.target].into_iter().flatten() {
            if system.planet(body).is_none() {
                return Err(SimError::UnknownBody {
                    system: location.system.clone(),
                    body: body.clone(),
                });
            }
        }
        if !ship.position.is_finite() || !ship.velocity.is_finite() {
            return Err(SimError::InvalidScenario(
                "saved ship state is not finite".to_string(),
            ));
        }

        Ok(Self::assemble(
            config,
            chart,
            SimulationClock::new(earth_time, relative_time),
            ship,
            systems,
            ship_systems,
            location,
        ))
    }

    fn assemble(
        config: SimConfig,
        chart: StarChart,
        clock: SimulationClock,
        ship: ShipState,
        mut systems: BTreeMap<String, StarSystem>,
        ship_systems: ShipSystems,
        mut location: Location,
    ) -> Self {
        let system = located(&mut systems, &location);
        let trajectory = Trajectory::new(
            system.gravity_wells(),
            ship.position,
            ship.velocity,
            Vector2::ZERO,
            config.step_days,
        );
        let lookahead = Lookahead::new(trajectory, config.lookahead_steps);
        if location.body.is_none() {
            location.body = navigation::captured_by(system, ship.position, clock.earth_time);
        }
        let ended = ended_by(&ship_systems.stores);

        log::info!("starting at {} ({} systems charted)", location.path(), chart.positions.len());
        Self {
            config,
            clock,
            ship,
            systems,
            ship_systems,
            location,
            chart,
            lookahead,
            thrust_direction: None,
            pending_days: 0.0,
            events: EventQueue::new(),
            ended,
            stress_predicted: false,
        }
    }

    /// Advance by one rendered frame and report the resulting state.
    pub fn tick(&mut self, input: &FrameInput) -> FrameReport {
        let mut steps = 0;
        if self.ended.is_none() {
            self.set_thrust(input.thrust);
            steps = self.run_steps(input);
        }
        FrameReport {
            clock: self.clock,
            ship: self.ship,
            resources: self.ship_systems.stores,
            location: self.location.path(),
            steps,
            events: self.events.drain(),
            ended: self.ended,
        }
    }

    /// Apply a discrete player command. Events it raises are reported by
    /// the next `tick` (or `take_events`).
    pub fn apply(&mut self, command: ShipCommand) -> Result<ActionOutcome, SimError> {
        if let Some(reason) = self.ended {
            return Ok(self.decline(format!("The voyage is over: {reason}")));
        }
        let now = self.clock.earth_time;
        match command {
            ShipCommand::StartFabrication { kind } => Ok(workshop::start_fabrication(
                &mut self.ship_systems,
                kind,
                &mut self.events,
            )),
            ShipCommand::StartRepair => Ok(workshop::start_repair(
                &mut self.ship_systems,
                &mut self.events,
            )),
            ShipCommand::LaunchVessel { kind } => Ok(self.launch(kind)),
            ShipCommand::TargetPlanet { planet } => {
                let system = located(&mut self.systems, &self.location);
                let found = scanning::start(
                    &self.location.system,
                    system,
                    &mut self.ship_systems.sensors,
                    &planet,
                    now,
                    &mut self.events,
                );
                if !found {
                    return Err(SimError::UnknownBody {
                        system: self.location.system.clone(),
                        body: planet,
                    });
                }
                Ok(ActionOutcome::Accepted)
            }
            ShipCommand::CancelScan => {
                let system = located(&mut self.systems, &self.location);
                scanning::cancel(system, &mut self.ship_systems.sensors, &mut self.events);
                Ok(ActionOutcome::Accepted)
            }
            ShipCommand::TravelTo { system } => self.travel_to(&system),
        }
    }

    /// Events raised since the last tick.
    pub fn take_events(&mut self) -> Vec<SimEvent> {
        self.events.drain()
    }

    pub fn config(&self) -> &SimConfig {
        &self.config
    }

    pub fn clock(&self) -> SimulationClock {
        self.clock
    }

    pub fn ship(&self) -> ShipState {
        self.ship
    }

    pub fn resources(&self) -> ResourceState {
        self.ship_systems.stores
    }

    pub fn ship_systems(&self) -> &ShipSystems {
        &self.ship_systems
    }

    pub fn location(&self) -> &Location {
        &self.location
    }

    pub fn chart(&self) -> &StarChart {
        &self.chart
    }

    pub fn systems(&self) -> &BTreeMap<String, StarSystem> {
        &self.systems
    }

    pub fn current_system(&self) -> &StarSystem {
        match self.systems.get(&self.location.system) {
            Some(system) => system,
            None => unreachable!("ship is in unknown system '{}'", self.location.system),
        }
    }

    pub fn ended(&self) -> Option<RunEndReason> {
        self.ended
    }

    /// Predicted ship positions, nearest first.
    pub fn predicted_path(&self) -> Vec<Vector2> {
        self.lookahead.points().collect()
    }

    /// Readout for a planet of the current system.
    pub fn readout(&self, planet: &str) -> Result<PlanetReadout, SimError> {
        let planet = self.current_system().planet(planet).ok_or_else(|| SimError::UnknownBody {
            system: self.location.system.clone(),
            body: planet.to_string(),
        })?;
        Ok(scanning::readout(&self.location.system, planet, self.clock.earth_time))
    }

    /// Readouts for every planet of the current system.
    pub fn readouts(&self) -> Vec<PlanetReadout> {
        self.current_system()
            .planets()
            .map(|p| scanning::readout(&self.location.system, p, self.clock.earth_time))
            .collect()
    }

    pub fn save_state(&self) -> SaveState {
        SaveState {
            earth_time: self.clock.earth_time,
            relative_time: self.clock.relative_time,
            ship: self.ship,
            systems: self.systems.clone(),
            ship_systems: self.ship_systems.clone(),
            location: self.location.clone(),
        }
    }

    fn set_thrust(&mut self, thrust: Option<Vector2>) {
        let direction = thrust
            .map(Vector2::normalize_or_zero)
            .filter(|d| *d != Vector2::ZERO);
        if direction == self.thrust_direction {
            return;
        }
        self.thrust_direction = direction;
        let acceleration = match direction {
            Some(d) => {
                self.ship.orientation = angle_of(d);
                d * THRUST_ACCELERATION_G * ACCELERATION_PER_G
            }
            None => Vector2::ZERO,
        };
        log::debug!("thrust changed to {acceleration:?}, retargeting lookahead");
        self.lookahead.retarget(acceleration);
    }

    fn run_steps(&mut self, input: &FrameInput) -> usize {
        let days = input.elapsed_days * input.time_scale * self.config.time_scale;
        if days.is_finite() && days > 0.0 {
            self.pending_days += days;
        }
        let step_days = self.lookahead.step_days();
        let whole = (self.pending_days / step_days).floor();
        self.pending_days = (self.pending_days - whole * step_days).max(0.0);

        let mut due = whole as usize;
        if due > self.config.max_steps_per_frame {
            log::debug!(
                "dropping {} integration steps this frame",
                due - self.config.max_steps_per_frame
            );
            due = self.config.max_steps_per_frame;
        }

        for taken in 1..=due {
            if let Some(reason) = self.step() {
                self.finish(reason);
                return taken;
            }
        }
        due
    }

    /// Consume one predicted sample and run every system over it.
    fn step(&mut self) -> Option<RunEndReason> {
        let sample = self.lookahead.advance();
        self.ship.position = sample.position;
        self.ship.velocity = sample.velocity;

        let earth_minutes = self.lookahead.step_days() * MINUTES_PER_DAY;
        let relative_minutes =
            contract_time(earth_minutes, velocity_fraction(sample.velocity.length()));
        let delta = StepDelta {
            earth_minutes,
            relative_minutes,
            total_acceleration_g: sample.acceleration.length() / ACCELERATION_PER_G,
            own_acceleration_g: self.lookahead.thrust().length() / ACCELERATION_PER_G,
        };
        self.clock.advance(earth_minutes, relative_minutes);
        let now = self.clock.earth_time;

        let ended = stores::run(&mut self.ship_systems, &delta, &mut self.events);
        civilization::run(&mut self.systems, now, &delta);

        let system = located(&mut self.systems, &self.location);
        scanning::run(
            &self.location.system,
            system,
            &mut self.ship_systems.sensors,
            self.ship.position,
            now,
            &delta,
            &mut self.events,
        );
        navigation::run(
            &mut self.location,
            system,
            self.ship.position,
            now,
            &mut self.events,
        );

        self.check_predicted_stress();
        ended
    }

    fn check_predicted_stress(&mut self) {
        let limit = SAFE_ACCELERATION_G * ACCELERATION_WARNING_MULTIPLE * ACCELERATION_PER_G;
        let peak = self.lookahead.peak_acceleration();
        let stressed = peak > limit;
        if stressed && !self.stress_predicted {
            self.events.warn(format!(
                "Predicted acceleration of {:.1} g exceeds hull tolerance",
                peak / ACCELERATION_PER_G
            ));
        }
        self.stress_predicted = stressed;
    }

    fn launch(&mut self, kind: VesselKind) -> ActionOutcome {
        let landing_site = match kind {
            VesselKind::Probe => {
                if self.ship_systems.sensors.target.is_none() {
                    return self.decline("No scan target for the probe");
                }
                None
            }
            VesselKind::Lander => {
                let Some(body) = self.location.body.clone() else {
                    return self.decline("Landers need a planet in orbit");
                };
                Some(body)
            }
        };

        let outcome = workshop::launch(&mut self.ship_systems, kind, &mut self.events);
        if !outcome.is_accepted() {
            return outcome;
        }

        let now = self.clock.earth_time;
        let system = located(&mut self.systems, &self.location);
        let sensors = &mut self.ship_systems.sensors;
        match landing_site {
            Some(body) => {
                scanning::land(&self.location.system, system, sensors, &body, now, &mut self.events);
            }
            None => {
                scanning::probe_survey(
                    &self.location.system,
                    system,
                    sensors,
                    PROBE_SCAN_BONUS_MINUTES,
                    now,
                    &mut self.events,
                );
            }
        }
        outcome
    }

    fn travel_to(&mut self, destination: &str) -> Result<ActionOutcome, SimError> {
        if !self.systems.contains_key(destination) {
            return Err(SimError::UnknownSystem(destination.to_string()));
        }
        let origin = self.location.system.clone();
        if destination == origin {
            return Ok(self.decline(format!("Already in {destination}")));
        }
        let distance = self
            .chart
            .distance(&origin, destination)
            .ok_or_else(|| SimError::UnknownSystem(destination.to_string()))?;

        let time = travel_time(distance);
        let earth_minutes = time.reference_years * MINUTES_PER_YEAR;
        let relative_minutes = time.relative_years * MINUTES_PER_YEAR;
        let supplies_needed = SUPPLY_USE_PER_DAY * relative_minutes / MINUTES_PER_DAY;

        if self.ship_systems.stores.fuel <= JUMP_FUEL_COST {
            return Ok(self.decline(format!("Not enough fuel for the jump to {destination}")));
        }
        if self.ship_systems.stores.supplies < supplies_needed {
            return Ok(self.decline(format!(
                "Not enough supplies for a {:.1} year voyage",
                time.relative_years
            )));
        }

        let system = located(&mut self.systems, &self.location);
        scanning::cancel(system, &mut self.ship_systems.sensors, &mut self.events);

        let mut ended = stores::spend(
            &mut self.ship_systems.stores,
            JUMP_FUEL_COST,
            0.0,
            &mut self.events,
        );
        self.clock.advance(earth_minutes, relative_minutes);
        let delta = StepDelta::time_only(earth_minutes, relative_minutes);
        ended = ended.or(stores::run(&mut self.ship_systems, &delta, &mut self.events));
        civilization::run(&mut self.systems, self.clock.earth_time, &delta);

        self.location = Location::in_system(destination);
        let arrived = located(&mut self.systems, &self.location);
        self.ship = navigation::arrival_state(arrived);
        self.thrust_direction = None;
        self.stress_predicted = false;
        self.pending_days = 0.0;
        self.lookahead.rebuild(
            arrived.gravity_wells(),
            self.ship.position,
            self.ship.velocity,
            Vector2::ZERO,
        );

        let path = self.location.path();
        log::info!(
            "arrived at {path} from {origin}: {:.2} years passed, {:.2} aboard",
            time.reference_years,
            time.relative_years
        );
        self.events.push(SimEvent::LocationChanged { path });
        navigation::run(
            &mut self.location,
            arrived,
            self.ship.position,
            self.clock.earth_time,
            &mut self.events,
        );

        if let Some(reason) = ended {
            self.finish(reason);
        }
        Ok(ActionOutcome::Accepted)
    }

    fn decline(&mut self, reason: impl Into<String>) -> ActionOutcome {
        let reason = reason.into();
        log::warn!("declined: {reason}");
        self.events.warn(reason.clone());
        ActionOutcome::Declined(reason)
    }

    fn finish(&mut self, reason: RunEndReason) {
        self.ended = Some(reason);
        self.thrust_direction = None;
        log::info!(
            "run ended at {}: {reason} after {:.2} years",
            self.location.path(),
            self.clock.earth_years()
        );
    }
}

fn ended_by(stores: &ResourceState) -> Option<RunEndReason> {
    if stores.fuel <= 0.0 {
        Some(RunEndReason::Fuel)
    } else if stores.integrity <= 0.0 {
        Some(RunEndReason::Integrity)
    } else {
        None
    }
}
