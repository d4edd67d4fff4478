//! Entity spawn factories for agents and defenders.

use hecs::{Entity, World};

use rampart_behavior::path::PathCursor;
use rampart_behavior::profiles::AgentStats;
use rampart_core::config::DefenderTemplate;
use rampart_core::enums::BehaviorKind;
use rampart_core::types::{AgentId, DefenderId, Orientation, Position};

use crate::components::{Agent, Defender, Mover, Speed, Vitals};
use crate::effects::ActiveEffects;

/// Everything needed to materialize one agent.
#[derive(Debug, Clone, Copy)]
pub struct AgentSpawn {
    pub id: AgentId,
    pub position: Position,
    pub speed: f64,
    pub stats: AgentStats,
    pub planned: BehaviorKind,
}

/// Spawn an agent at its spawn point with no behavior attached yet.
pub fn spawn_agent(world: &mut World, spawn: AgentSpawn) -> Entity {
    world.spawn((
        Agent { id: spawn.id },
        Vitals::new(
            spawn.stats.health,
            spawn.stats.reward_gold,
            spawn.stats.core_damage,
        ),
        Speed::new(spawn.speed),
        Mover {
            cursor: PathCursor::new(),
            planned: spawn.planned,
            behavior: None,
        },
        spawn.position,
        Orientation::IDENTITY,
        ActiveEffects::default(),
    ))
}

/// Spawn a defender with the template's base stats and no element.
pub fn spawn_defender(
    world: &mut World,
    id: DefenderId,
    template: &DefenderTemplate,
    position: Position,
) -> Entity {
    world.spawn((
        Defender {
            id,
            template_id: template.id.clone(),
            range: template.range,
            damage: template.damage,
            fire_interval: template.fire_interval,
            fire_timer: 0.0,
            target: None,
            strategy: template.target_strategy,
            element: None,
        },
        position,
    ))
}
