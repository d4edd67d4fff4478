//! Timed effects: burn damage ticks and expiry of every effect window.

use hecs::World;

use crate::combat::{self, Services};
use crate::components::{Agent, Vitals};
use crate::effects::ActiveEffects;

/// Advance effects to `now`, the end of the current tick.
pub fn run(world: &mut World, services: &mut Services<'_>, now: f64) {
    for (_entity, (agent, vitals, effects)) in
        world.query_mut::<(&Agent, &mut Vitals, &mut ActiveEffects)>()
    {
        if !vitals.alive {
            continue;
        }
        let ticks = effects.take_burn_ticks(now);
        if let Some(burn) = effects.burn {
            for _ in 0..ticks {
                combat::receive_damage(agent.id, vitals, burn.potency, services);
            }
        }
        effects.expire(now);
    }
}
