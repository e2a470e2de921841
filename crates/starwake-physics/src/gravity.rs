//! Velocity-Verlet trajectory integration under fixed gravity wells.
//!
//! `Trajectory` is an explicit cursor over an infinite sequence of samples;
//! `restart` is the only way to change its inputs. `Lookahead` keeps a window
//! of predicted samples ahead of the ship so the presentation layer can draw
//! the future path and the driver can warn about upcoming stress.

use std::collections::VecDeque;

use starwake_core::constants::{GRAVITATIONAL_CONSTANT, INTEGRATION_STEP_DAYS, MIN_WELL_DISTANCE};
use starwake_core::types::{GravityWell, TrajectorySample, Vector2};

/// Gravitational acceleration at `position` from all wells.
///
/// Wells with non-positive or non-finite mass, and wells closer than
/// `MIN_WELL_DISTANCE`, contribute nothing.
pub fn gravity_at(wells: &[GravityWell], position: Vector2) -> Vector2 {
    let mut total = Vector2::ZERO;
    for well in wells {
        if !(well.mass > 0.0 && well.mass.is_finite()) {
            continue;
        }
        let offset = well.position - position;
        let dist_sq = offset.length_squared();
        // Negated so NaN offsets are skipped too.
        if !(dist_sq >= MIN_WELL_DISTANCE * MIN_WELL_DISTANCE) {
            continue;
        }
        let dist = dist_sq.sqrt();
        total += offset * (GRAVITATIONAL_CONSTANT * well.mass / (dist_sq * dist));
    }
    total
}

/// Integrator state between steps: where the body is, how fast it is going
/// there, and the acceleration acting on it there.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TrajectoryState {
    pub position: Vector2,
    pub velocity: Vector2,
    pub acceleration: Vector2,
}

/// Advance `state` by `dt` days.
///
/// x' = x + v·dt + ½·a·dt²
/// a' = thrust + gravity(x')
/// v' = v + ½·(a + a')·dt
pub fn verlet_step(
    wells: &[GravityWell],
    thrust: Vector2,
    state: TrajectoryState,
    dt: f64,
) -> TrajectoryState {
    let position =
        state.position + state.velocity * dt + state.acceleration * (0.5 * dt * dt);
    let acceleration = thrust + gravity_at(wells, position);
    let velocity = state.velocity + (state.acceleration + acceleration) * (0.5 * dt);
    TrajectoryState {
        position,
        velocity,
        acceleration,
    }
}

/// Infinite, restartable trajectory cursor.
#[derive(Debug, Clone)]
pub struct Trajectory {
    wells: Vec<GravityWell>,
    thrust: Vector2,
    step_days: f64,
    state: TrajectoryState,
}

impl Trajectory {
    /// Start a sequence at `position`/`velocity` with a constant `thrust`
    /// acceleration (units/day²). A non-positive step falls back to
    /// `INTEGRATION_STEP_DAYS`.
    pub fn new(
        wells: Vec<GravityWell>,
        position: Vector2,
        velocity: Vector2,
        thrust: Vector2,
        step_days: f64,
    ) -> Self {
        let step_days = if step_days > 0.0 && step_days.is_finite() {
            step_days
        } else {
            INTEGRATION_STEP_DAYS
        };
        let mut trajectory = Self {
            wells,
            thrust,
            step_days,
            state: TrajectoryState {
                position,
                velocity,
                acceleration: Vector2::ZERO,
            },
        };
        trajectory.restart(position, velocity, thrust);
        trajectory
    }

    /// Discard the current sequence and begin again from new initial conditions.
    pub fn restart(&mut self, position: Vector2, velocity: Vector2, thrust: Vector2) {
        self.thrust = thrust;
        self.state = TrajectoryState {
            position,
            velocity,
            acceleration: thrust + gravity_at(&self.wells, position),
        };
    }

    /// Advance one step and emit the position left behind, paired with the
    /// acceleration used there and the velocity after the update.
    pub fn step(&mut self) -> TrajectorySample {
        let current = self.state;
        self.state = verlet_step(&self.wells, self.thrust, current, self.step_days);
        TrajectorySample {
            position: current.position,
            velocity: self.state.velocity,
            acceleration: current.acceleration,
        }
    }

    /// State the next `step` starts from. Restarting here with the same
    /// thrust continues the sequence unchanged.
    pub fn state(&self) -> TrajectoryState {
        self.state
    }

    pub fn thrust(&self) -> Vector2 {
        self.thrust
    }

    pub fn step_days(&self) -> f64 {
        self.step_days
    }
}

impl Iterator for Trajectory {
    type Item = TrajectorySample;

    fn next(&mut self) -> Option<TrajectorySample> {
        Some(self.step())
    }
}

#[derive(Debug, Clone, Copy)]
struct Predicted {
    /// Integrator state the sample was stepped from.
    origin: TrajectoryState,
    sample: TrajectorySample,
}

/// Window of predicted samples strictly ahead of the ship.
#[derive(Debug, Clone)]
pub struct Lookahead {
    trajectory: Trajectory,
    buffer: VecDeque<Predicted>,
    capacity: usize,
}

impl Lookahead {
    /// The trajectory's starting point is taken to be where the ship is now;
    /// the buffer starts one step after it.
    pub fn new(trajectory: Trajectory, capacity: usize) -> Self {
        let capacity = capacity.max(1);
        let mut lookahead = Self {
            trajectory,
            buffer: VecDeque::with_capacity(capacity),
            capacity,
        };
        // The starting point is the ship itself, not a prediction.
        lookahead.trajectory.step();
        lookahead.fill();
        lookahead
    }

    /// Re-plan everything not yet consumed under a new thrust. The next
    /// sample keeps its position; its acceleration and everything after it
    /// are recomputed.
    pub fn retarget(&mut self, thrust: Vector2) {
        let resume = match self.buffer.front() {
            Some(next) => next.origin,
            None => self.trajectory.state(),
        };
        self.trajectory.restart(resume.position, resume.velocity, thrust);
        self.buffer.clear();
        self.fill();
    }

    /// Replace the wells (entering another system) and start over from the
    /// ship's state.
    pub fn rebuild(
        &mut self,
        wells: Vec<GravityWell>,
        position: Vector2,
        velocity: Vector2,
        thrust: Vector2,
    ) {
        let step_days = self.trajectory.step_days();
        let trajectory = Trajectory::new(wells, position, velocity, thrust, step_days);
        *self = Self::new(trajectory, self.capacity);
    }

    /// Consume the next predicted sample and extend the window by one.
    pub fn advance(&mut self) -> TrajectorySample {
        let next = match self.buffer.pop_front() {
            Some(predicted) => predicted.sample,
            None => self.trajectory.step(),
        };
        self.fill();
        next
    }

    /// Largest acceleration magnitude anywhere in the window.
    pub fn peak_acceleration(&self) -> f64 {
        self.buffer
            .iter()
            .map(|p| p.sample.acceleration.length())
            .fold(0.0, f64::max)
    }

    /// Predicted positions, nearest first.
    pub fn points(&self) -> impl Iterator<Item = Vector2> + '_ {
        self.buffer.iter().map(|p| p.sample.position)
    }

    pub fn len(&self) -> usize {
        self.buffer.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buffer.is_empty()
    }

    pub fn thrust(&self) -> Vector2 {
        self.trajectory.thrust()
    }

    pub fn step_days(&self) -> f64 {
        self.trajectory.step_days()
    }

    fn fill(&mut self) {
        while self.buffer.len() < self.capacity {
            let origin = self.trajectory.state();
            let sample = self.trajectory.step();
            self.buffer.push_back(Predicted { origin, sample });
        }
    }
}
