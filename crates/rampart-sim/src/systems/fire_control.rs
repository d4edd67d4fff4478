//! Defender fire control.
//!
//! Defenders run in `DefenderId` order. Each one drops a target that died or
//! left range, re-selects when it has none, and fires when its timer reaches
//! the fire interval. Hits land immediately, so a kill by one defender is
//! visible to the next. Status effects are stamped at the end of the tick,
//! since movement for this tick has already run.

use hecs::{Entity, World};
use log::trace;
use rand::Rng;

use rampart_core::constants::TIMER_EPSILON;
use rampart_core::events::SimEvent;
use rampart_core::types::{AgentId, DefenderId, Position};

use crate::combat::{self, Services};
use crate::components::{Agent, Defender, Vitals};
use crate::effects::ActiveEffects;
use crate::elemental::{self, ElementalState};
use crate::targeting::{self, TargetCandidate};

/// A live agent as seen by fire control this tick.
struct Tracked {
    entity: Entity,
    candidate: TargetCandidate,
    alive: bool,
}

/// A defender's shot, copied out of the world before damage is applied.
struct Shot {
    defender: DefenderId,
    target: AgentId,
    damage: f64,
    element: Option<ElementalState>,
}

pub fn run<R: Rng + ?Sized>(
    world: &mut World,
    services: &mut Services<'_>,
    rng: &mut R,
    now: f64,
    dt: f64,
) {
    let mut tracked: Vec<Tracked> = world
        .query::<(&Agent, &Vitals, &Position)>()
        .iter()
        .filter(|(_, (_, vitals, _))| vitals.alive)
        .map(|(entity, (agent, vitals, position))| Tracked {
            entity,
            candidate: TargetCandidate {
                id: agent.id,
                position: *position,
                health: vitals.health,
            },
            alive: true,
        })
        .collect();
    tracked.sort_by_key(|t| t.candidate.id);

    let mut order: Vec<(DefenderId, Entity)> = world
        .query::<&Defender>()
        .iter()
        .map(|(entity, defender)| (defender.id, entity))
        .collect();
    order.sort_by_key(|(id, _)| *id);

    let hit_at = now + dt;
    for (_, entity) in order {
        let Some(shot) = aim(world, entity, &tracked, dt) else {
            continue;
        };
        fire(world, services, rng, &mut tracked, shot, hit_at);
    }
}

/// Update target and timer for one defender. Returns a shot when it fires.
fn aim(world: &mut World, entity: Entity, tracked: &[Tracked], dt: f64) -> Option<Shot> {
    let Ok((position, defender)) = world.query_one_mut::<(&Position, &mut Defender)>(entity)
    else {
        return None;
    };

    let live: Vec<TargetCandidate> = tracked
        .iter()
        .filter(|t| t.alive)
        .map(|t| t.candidate)
        .collect();
    let in_range = targeting::in_range(*position, defender.range, &live);

    let held = defender
        .target
        .is_some_and(|id| in_range.iter().any(|c| c.id == id));
    if !held {
        defender.target = targeting::selector(defender.strategy).select(*position, &in_range);
    }

    let target = defender.target?;
    defender.fire_timer += dt;
    if defender.fire_timer + TIMER_EPSILON < defender.fire_interval {
        return None;
    }
    defender.fire_timer = 0.0;

    Some(Shot {
        defender: defender.id,
        target,
        damage: defender.damage,
        element: defender.element.clone(),
    })
}

fn fire<R: Rng + ?Sized>(
    world: &mut World,
    services: &mut Services<'_>,
    rng: &mut R,
    tracked: &mut [Tracked],
    shot: Shot,
    hit_at: f64,
) {
    let Some(primary) = tracked
        .iter()
        .find(|t| t.alive && t.candidate.id == shot.target)
        .map(|t| (t.entity, t.candidate))
    else {
        return;
    };

    let (damage, critical) = match &shot.element {
        Some(state)
            if state.tier.crit_chance > 0.0 && rng.gen::<f64>() < state.tier.crit_chance =>
        {
            (shot.damage * state.tier.crit_mult, true)
        }
        _ => (shot.damage, false),
    };
    trace!(
        "defender {:?} fires at {:?} for {}",
        shot.defender,
        shot.target,
        damage
    );
    services.events.emit(SimEvent::DefenderFired {
        defender: shot.defender,
        agent: shot.target,
        damage,
        critical,
    });

    let secondary = match &shot.element {
        Some(state) => {
            let others: Vec<TargetCandidate> = tracked
                .iter()
                .filter(|t| t.alive)
                .map(|t| t.candidate)
                .collect();
            elemental::secondary_hits(state, &primary.1, &others, damage)
        }
        None => Vec::new(),
    };

    let (entity, candidate) = primary;
    let survived = hit(world, services, tracked, candidate.id, damage);
    if survived {
        if let Some(state) = &shot.element {
            if let Ok(mut effects) = world.get::<&mut ActiveEffects>(entity) {
                elemental::apply_status_effects(state, &mut effects, hit_at);
            }
        }
    }

    for (id, amount) in secondary {
        hit(world, services, tracked, id, amount);
    }
}

/// Damage one tracked agent. Returns true if it is still alive afterward.
fn hit(
    world: &World,
    services: &mut Services<'_>,
    tracked: &mut [Tracked],
    id: AgentId,
    amount: f64,
) -> bool {
    let Some(target) = tracked.iter_mut().find(|t| t.alive && t.candidate.id == id) else {
        return false;
    };
    let Ok(mut vitals) = world.get::<&mut Vitals>(target.entity) else {
        target.alive = false;
        return false;
    };
    combat::receive_damage(id, &mut vitals, amount, services);
    target.candidate.health = vitals.health;
    target.alive = vitals.alive;
    vitals.alive
}
