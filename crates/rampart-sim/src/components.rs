//! ECS components attached to agents and defenders.

use rampart_behavior::movement::MovementBehavior;
use rampart_behavior::path::PathCursor;
use rampart_core::enums::{BehaviorKind, TargetStrategyKind};
use rampart_core::types::{AgentId, DefenderId};

use crate::elemental::ElementalState;

/// Marker and identity for hostile agents.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Agent {
    pub id: AgentId,
}

/// Health and payout of an agent.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Vitals {
    pub health: i32,
    pub max_health: u32,
    pub reward_gold: u32,
    pub core_damage: u32,
    /// Flips to false exactly once, on death or core arrival.
    pub alive: bool,
}

impl Vitals {
    pub fn new(health: u32, reward_gold: u32, core_damage: u32) -> Self {
        Self {
            health: health.min(i32::MAX as u32) as i32,
            max_health: health,
            reward_gold,
            core_damage,
            alive: true,
        }
    }
}

/// Base speed from the template and the speed used this tick.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Speed {
    pub base: f64,
    pub current: f64,
}

impl Speed {
    pub fn new(base: f64) -> Self {
        Self {
            base,
            current: base,
        }
    }
}

/// Path progress and movement state of an agent.
#[derive(Debug, Clone, PartialEq)]
pub struct Mover {
    pub cursor: PathCursor,
    /// Behavior drawn for this agent when its wave started.
    pub planned: BehaviorKind,
    /// `None` until the whole batch has spawned; the agent pursues the path
    /// in a straight line meanwhile.
    pub behavior: Option<MovementBehavior>,
}

/// A stationary defender.
#[derive(Debug, Clone, PartialEq)]
pub struct Defender {
    pub id: DefenderId,
    pub template_id: String,
    pub range: f64,
    pub damage: f64,
    /// Seconds between shots.
    pub fire_interval: f64,
    /// Seconds accumulated toward the next shot while a target is held.
    pub fire_timer: f64,
    pub target: Option<AgentId>,
    pub strategy: TargetStrategyKind,
    pub element: Option<ElementalState>,
}
