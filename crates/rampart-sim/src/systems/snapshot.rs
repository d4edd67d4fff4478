//! Snapshot system: queries the ECS world and builds a complete SimSnapshot.
//!
//! This system is read-only. It never modifies the world.

use hecs::World;

use rampart_core::enums::SessionPhase;
use rampart_core::events::SimEvent;
use rampart_core::state::*;
use rampart_core::types::{Orientation, Position, SimTime};

use crate::components::{Agent, Defender, Mover, Speed, Vitals};
use crate::core_health::CoreHealth;
use crate::director::WaveDirector;
use crate::effects::ActiveEffects;

/// Build a complete SimSnapshot from the current world state.
pub fn build_snapshot(
    world: &World,
    time: &SimTime,
    phase: SessionPhase,
    director: &WaveDirector,
    core: &CoreHealth,
    gold: u32,
    events: Vec<SimEvent>,
) -> SimSnapshot {
    SimSnapshot {
        time: *time,
        phase,
        director: director.view(),
        core: CoreView {
            current: core.current(),
            max: core.max(),
        },
        gold,
        agents: build_agents(world, time.elapsed_secs),
        defenders: build_defenders(world),
        events,
    }
}

/// Live agents in spawn order.
fn build_agents(world: &World, now: f64) -> Vec<AgentView> {
    let mut agents: Vec<AgentView> = world
        .query::<(
            &Agent,
            &Vitals,
            &Mover,
            &Position,
            &Orientation,
            &Speed,
            &ActiveEffects,
        )>()
        .iter()
        .filter(|(_, (_, vitals, ..))| vitals.alive)
        .map(
            |(_, (agent, vitals, mover, position, orientation, speed, effects))| AgentView {
                id: agent.id,
                position: *position,
                orientation: *orientation,
                speed: speed.current,
                health: vitals.health,
                max_health: vitals.max_health,
                path_index: mover.cursor.index(),
                behavior: mover.behavior.map(|b| b.kind()),
                burning: effects.is_burning(now),
                slowed: effects.is_slowed(now),
                stunned: effects.is_stunned(now),
            },
        )
        .collect();
    agents.sort_by_key(|a| a.id);
    agents
}

/// Defenders in id order.
fn build_defenders(world: &World) -> Vec<DefenderView> {
    let mut defenders: Vec<DefenderView> = world
        .query::<(&Defender, &Position)>()
        .iter()
        .map(|(_, (defender, position))| DefenderView {
            id: defender.id,
            template_id: defender.template_id.clone(),
            position: *position,
            range: defender.range,
            damage: defender.damage,
            fire_interval: defender.fire_interval,
            target: defender.target,
            strategy: defender.strategy,
            element: defender.element.as_ref().map(|s| s.element),
            element_level: defender.element.as_ref().map_or(0, |s| s.level),
        })
        .collect();
    defenders.sort_by_key(|d| d.id);
    defenders
}
