//! Agent movement: advances every live agent along the path.
//!
//! Stunned agents hold position. Slowed agents move at their slowed speed;
//! behaviors read it as their base speed.

use hecs::World;
use rand::Rng;

use rampart_behavior::movement::{pursue, Body, Clock, StepOutcome};
use rampart_behavior::path::PathProvider;
use rampart_core::types::{Orientation, Position};

use crate::combat::{self, Services};
use crate::components::{Agent, Mover, Speed, Vitals};
use crate::effects::ActiveEffects;

pub fn run<R: Rng + ?Sized>(
    world: &mut World,
    path: &dyn PathProvider,
    services: &mut Services<'_>,
    rng: &mut R,
    now: f64,
    dt: f64,
) {
    let clock = Clock { dt, now };
    for (_entity, (agent, vitals, mover, position, orientation, speed, effects)) in world
        .query_mut::<(
            &Agent,
            &mut Vitals,
            &mut Mover,
            &mut Position,
            &mut Orientation,
            &mut Speed,
            &ActiveEffects,
        )>()
    {
        if !vitals.alive || effects.is_stunned(now) {
            continue;
        }

        speed.current = speed.base * effects.speed_factor(now);
        let mut body = Body {
            position: *position,
            orientation: *orientation,
            speed: speed.current,
        };

        let outcome = match mover.behavior.as_mut() {
            Some(behavior) => behavior.step(&mut body, &mut mover.cursor, path, clock, rng),
            None => pursue(&mut body, &mut mover.cursor, path, clock),
        };

        *position = body.position;
        *orientation = body.orientation;

        if outcome == StepOutcome::ReachedCore {
            combat::reach_core(agent.id, vitals, services);
        }
    }
}
