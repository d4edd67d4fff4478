//! Damage, death and core arrival for hostile agents.
//!
//! Death and core arrival are single-fire: the `alive` flag guards both, so
//! the director's counter sees at most one decrement per agent.

use log::debug;

use rampart_core::events::SimEvent;
use rampart_core::types::AgentId;

use crate::components::Vitals;
use crate::core_health::CoreHealth;
use crate::director::WaveDirector;
use crate::economy::EconomyLedger;
use crate::event_bus::EventBus;

/// Collaborators touched when an agent dies or reaches the core.
pub struct Services<'a> {
    pub director: &'a mut WaveDirector,
    pub core: &'a mut CoreHealth,
    pub ledger: &'a mut dyn EconomyLedger,
    pub events: &'a mut EventBus,
}

/// Subtract `ceil(amount)` from health and kill at zero or below.
/// Returns true if this hit killed the agent.
pub fn receive_damage(
    id: AgentId,
    vitals: &mut Vitals,
    amount: f64,
    services: &mut Services<'_>,
) -> bool {
    if !vitals.alive || !(amount > 0.0) {
        return false;
    }
    let dealt = amount.ceil().min(i32::MAX as f64) as i32;
    vitals.health = vitals.health.saturating_sub(dealt);
    if vitals.health <= 0 {
        return die(id, vitals, services);
    }
    false
}

/// Kill the agent, pay its reward and release it from the director.
/// Returns false if it was already dead.
pub fn die(id: AgentId, vitals: &mut Vitals, services: &mut Services<'_>) -> bool {
    if !vitals.alive {
        return false;
    }
    vitals.alive = false;
    debug!("agent {:?} killed, reward {}", id, vitals.reward_gold);

    services.ledger.reward(vitals.reward_gold);
    services.events.emit(SimEvent::AgentKilled {
        agent: id,
        reward: vitals.reward_gold,
    });
    services.events.emit(SimEvent::GoldChanged {
        gold: services.ledger.balance(),
    });
    services.director.on_agent_death(id, services.events);
    true
}

/// Damage the core and remove the agent without a reward.
/// Returns false if the agent was already dead.
pub fn reach_core(id: AgentId, vitals: &mut Vitals, services: &mut Services<'_>) -> bool {
    if !vitals.alive {
        return false;
    }
    vitals.alive = false;
    debug!("agent {:?} reached the core for {}", id, vitals.core_damage);

    let hit = services.core.apply_damage(vitals.core_damage);
    services.events.emit(SimEvent::AgentReachedCore {
        agent: id,
        core_damage: vitals.core_damage,
    });
    services.events.emit(SimEvent::CoreDamaged {
        current: hit.current,
        max: services.core.max(),
    });
    if hit.depleted_now {
        services.events.emit(SimEvent::SessionLost);
    }
    services.director.on_agent_death(id, services.events);
    true
}
