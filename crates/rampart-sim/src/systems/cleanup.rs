//! Cleanup system: despawns agents that died or reached the core.

use hecs::{Entity, World};

use crate::components::{Agent, Vitals};

/// Remove released agents. Uses a pre-allocated buffer to avoid per-tick allocation.
pub fn run(world: &mut World, despawn_buffer: &mut Vec<Entity>) {
    despawn_buffer.clear();

    for (entity, (_agent, vitals)) in world.query_mut::<(&Agent, &Vitals)>() {
        if !vitals.alive {
            despawn_buffer.push(entity);
        }
    }

    for entity in despawn_buffer.drain(..) {
        let _ = world.despawn(entity);
    }
}
