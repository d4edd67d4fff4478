//! Events emitted by the simulation for observers (UI, audio, analytics).

use serde::{Deserialize, Serialize};

use crate::enums::{BehaviorKind, ElementType};
use crate::types::{AgentId, DefenderId};

/// Everything an observer can learn about a tick.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum SimEvent {
    /// Agents left to spawn in the current wave.
    RemainingToSpawn { remaining: u32 },
    /// Authoritative alive count after a spawn, death or round change.
    AliveCount { alive: u32 },
    /// A round was cleared; `round` is the new round index.
    RoundChanged { round: u32 },
    /// Control returned to the preparation phase.
    PreparationStarted { round: u32 },
    /// Every configured wave has been cleared.
    WavesComplete,
    AgentSpawned {
        agent: AgentId,
        health: u32,
        planned_behavior: BehaviorKind,
    },
    /// Behaviors were attached to a completed batch (Steady, Surge, Weave, Juggernaut counts).
    BehaviorsAssigned { counts: [u32; 4] },
    AgentKilled { agent: AgentId, reward: u32 },
    AgentReachedCore { agent: AgentId, core_damage: u32 },
    CoreDamaged { current: u32, max: u32 },
    /// The core reached zero. Emitted once per session.
    SessionLost,
    DefenderPlaced { defender: DefenderId },
    DefenderFired {
        defender: DefenderId,
        agent: AgentId,
        damage: f64,
        critical: bool,
    },
    ElementApplied {
        defender: DefenderId,
        element: ElementType,
    },
    UpgradeApplied {
        defender: DefenderId,
        element: ElementType,
        level: u8,
    },
    ElementRemoved { defender: DefenderId },
    GoldChanged { gold: u32 },
}
