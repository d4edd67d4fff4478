//! Movement behavior state machines.
//!
//! Each hostile agent owns one `MovementBehavior` with its private timers.
//! A step resolves the current waypoint, moves the body, turns it toward the
//! direction of travel and reports whether the agent reached the core.

use std::f64::consts::PI;

use glam::{DQuat, DVec3};
use rand::Rng;
use serde::{Deserialize, Serialize};

use rampart_core::constants::*;
use rampart_core::enums::BehaviorKind;
use rampart_core::types::{Orientation, Position};

use crate::path::{PathCursor, PathProvider};

/// The moving parts of an agent that a behavior may change.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Body {
    pub position: Position,
    pub orientation: Orientation,
    /// Current speed in units per second, after any slow is applied.
    pub speed: f64,
}

/// Time for a single step.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Clock {
    pub dt: f64,
    /// Simulation time at the start of the step.
    pub now: f64,
}

/// Result of one movement step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepOutcome {
    /// No waypoint could be resolved; the agent stayed put.
    Idle,
    Moving,
    /// The last waypoint was reached.
    ReachedCore,
}

/// Sprint timers for `Surge`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct SurgeState {
    pub current_speed: f64,
    pub next_sprint_at: f64,
    pub sprint_ends_at: f64,
    pub sprinting: bool,
    primed: bool,
}

/// Oscillation phase for `Weave`, in seconds since the last waypoint.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct WeaveState {
    pub phase: f64,
}

/// Charge cycle of a `Juggernaut`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub enum ChargePhase {
    #[default]
    Cruising,
    WindUp {
        elapsed: f64,
    },
    Burst,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct JuggernautState {
    pub current_speed: f64,
    pub phase: ChargePhase,
    primed: bool,
}

/// Per-agent movement state machine.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum MovementBehavior {
    Steady,
    Surge(SurgeState),
    Weave(WeaveState),
    Juggernaut(JuggernautState),
}

impl MovementBehavior {
    /// Fresh behavior of the given kind with its timers unset.
    pub fn new(kind: BehaviorKind) -> Self {
        match kind {
            BehaviorKind::Steady => MovementBehavior::Steady,
            BehaviorKind::Surge => MovementBehavior::Surge(SurgeState::default()),
            BehaviorKind::Weave => MovementBehavior::Weave(WeaveState::default()),
            BehaviorKind::Juggernaut => MovementBehavior::Juggernaut(JuggernautState::default()),
        }
    }

    pub fn kind(&self) -> BehaviorKind {
        match self {
            MovementBehavior::Steady => BehaviorKind::Steady,
            MovementBehavior::Surge(_) => BehaviorKind::Surge,
            MovementBehavior::Weave(_) => BehaviorKind::Weave,
            MovementBehavior::Juggernaut(_) => BehaviorKind::Juggernaut,
        }
    }

    /// Advance the agent by one step.
    pub fn step<R: Rng + ?Sized>(
        &mut self,
        body: &mut Body,
        cursor: &mut PathCursor,
        path: &dyn PathProvider,
        clock: Clock,
        rng: &mut R,
    ) -> StepOutcome {
        match self {
            MovementBehavior::Steady => follow(body, cursor, path, STEADY_TURN_RATE, clock.dt),
            MovementBehavior::Surge(state) => step_surge(state, body, cursor, path, clock, rng),
            MovementBehavior::Weave(state) => step_weave(state, body, cursor, path, clock),
            MovementBehavior::Juggernaut(state) => step_juggernaut(state, body, cursor, path, clock),
        }
    }
}

/// Straight-line pursuit for agents with no behavior attached yet.
pub fn pursue(
    body: &mut Body,
    cursor: &mut PathCursor,
    path: &dyn PathProvider,
    clock: Clock,
) -> StepOutcome {
    follow(body, cursor, path, STEADY_TURN_RATE, clock.dt)
}

fn follow(
    body: &mut Body,
    cursor: &mut PathCursor,
    path: &dyn PathProvider,
    turn_rate: f64,
    dt: f64,
) -> StepOutcome {
    let Some(target) = cursor.resolve(path) else {
        return StepOutcome::Idle;
    };

    body.position = move_towards(body.position, target, body.speed * dt);
    face(body, target - body.position, turn_rate, dt);

    if body.position.distance(target) < ARRIVAL_EPSILON {
        return arrive(cursor, path);
    }
    StepOutcome::Moving
}

fn step_surge<R: Rng + ?Sized>(
    state: &mut SurgeState,
    body: &mut Body,
    cursor: &mut PathCursor,
    path: &dyn PathProvider,
    clock: Clock,
    rng: &mut R,
) -> StepOutcome {
    let base = body.speed;
    if !state.primed {
        state.primed = true;
        state.current_speed = base * SURGE_SPEED_FACTOR;
        let (lo, hi) = SURGE_FIRST_SPRINT_DELAY;
        state.next_sprint_at = clock.now + rng.gen_range(lo..hi);
    }

    let Some(target) = cursor.resolve(path) else {
        return StepOutcome::Idle;
    };

    if !state.sprinting && clock.now >= state.next_sprint_at {
        state.sprinting = true;
        state.sprint_ends_at = clock.now + SURGE_SPRINT_DURATION;
    } else if state.sprinting && clock.now >= state.sprint_ends_at {
        state.sprinting = false;
        let (lo, hi) = SURGE_SPRINT_COOLDOWN;
        state.next_sprint_at = clock.now + rng.gen_range(lo..hi);
    }

    let target_speed = if state.sprinting {
        base * SURGE_SPRINT_FACTOR
    } else {
        base * SURGE_SPEED_FACTOR
    };
    state.current_speed = lerp(state.current_speed, target_speed, clock.dt * SURGE_ACCELERATION);

    body.position = move_towards(body.position, target, state.current_speed * clock.dt);
    face(body, target - body.position, SURGE_TURN_RATE, clock.dt);

    if body.position.distance(target) < ARRIVAL_EPSILON {
        return arrive(cursor, path);
    }
    StepOutcome::Moving
}

fn step_weave(
    state: &mut WeaveState,
    body: &mut Body,
    cursor: &mut PathCursor,
    path: &dyn PathProvider,
    clock: Clock,
) -> StepOutcome {
    let Some(target) = cursor.resolve(path) else {
        return StepOutcome::Idle;
    };

    state.phase += clock.dt;

    let start = body.position;
    let direction = (target - start).normalize_or_zero();
    let lateral = direction.cross(DVec3::Y).normalize_or_zero()
        * (state.phase * WEAVE_FREQUENCY * PI).sin()
        * WEAVE_AMPLITUDE;

    let forward = move_towards(start, target, body.speed * clock.dt);
    body.position = forward + lateral * clock.dt;
    face(body, body.position - start, WEAVE_TURN_RATE, clock.dt);

    if body.position.distance(target) < WEAVE_ARRIVAL_EPSILON {
        state.phase = 0.0;
        return arrive(cursor, path);
    }
    StepOutcome::Moving
}

fn step_juggernaut(
    state: &mut JuggernautState,
    body: &mut Body,
    cursor: &mut PathCursor,
    path: &dyn PathProvider,
    clock: Clock,
) -> StepOutcome {
    let base = body.speed;
    if !state.primed {
        state.primed = true;
        state.current_speed = base * JUGGERNAUT_SPEED_FACTOR;
    }

    let Some(target) = cursor.resolve(path) else {
        return StepOutcome::Idle;
    };

    let distance = body.position.distance(target);
    if state.phase == ChargePhase::Cruising {
        if distance <= JUGGERNAUT_CHARGE_RANGE && distance > JUGGERNAUT_MIN_CHARGE_RANGE {
            state.phase = ChargePhase::WindUp { elapsed: 0.0 };
        } else if distance > JUGGERNAUT_CHARGE_RANGE {
            state.current_speed = lerp(
                state.current_speed,
                base * JUGGERNAUT_SPEED_FACTOR,
                clock.dt * JUGGERNAUT_CRUISE_ACCELERATION,
            );
        }
    }

    match state.phase {
        ChargePhase::WindUp { elapsed } if elapsed + TIMER_EPSILON < JUGGERNAUT_WINDUP_SECS => {
            state.current_speed = base * JUGGERNAUT_WINDUP_FACTOR;
            state.phase = ChargePhase::WindUp {
                elapsed: elapsed + clock.dt,
            };
        }
        ChargePhase::WindUp { .. } | ChargePhase::Burst => {
            state.current_speed = base * JUGGERNAUT_BURST_FACTOR;
            state.phase = ChargePhase::Burst;
        }
        ChargePhase::Cruising => {}
    }

    body.position = move_towards(body.position, target, state.current_speed * clock.dt);
    face(body, target - body.position, JUGGERNAUT_TURN_RATE, clock.dt);

    if body.position.distance(target) < ARRIVAL_EPSILON {
        state.phase = ChargePhase::Cruising;
        return arrive(cursor, path);
    }
    StepOutcome::Moving
}

fn arrive(cursor: &mut PathCursor, path: &dyn PathProvider) -> StepOutcome {
    match cursor.advance(path) {
        Some(_) => StepOutcome::Moving,
        None => StepOutcome::ReachedCore,
    }
}

/// Move `from` toward `to` by at most `max_delta`, never overshooting.
pub fn move_towards(from: Position, to: Position, max_delta: f64) -> Position {
    let delta = to - from;
    let distance = delta.length();
    if distance <= max_delta || distance == 0.0 {
        return to;
    }
    from + delta / distance * max_delta
}

/// Turn the body toward `direction` at `rate` per second.
fn face(body: &mut Body, direction: DVec3, rate: f64, dt: f64) {
    if let Some(dir) = direction.try_normalize() {
        let look = DQuat::from_rotation_arc(DVec3::Z, dir);
        body.orientation = body.orientation.slerp(look, (rate * dt).clamp(0.0, 1.0));
    }
}

fn lerp(from: f64, to: f64, t: f64) -> f64 {
    from + (to - from) * t.clamp(0.0, 1.0)
}
