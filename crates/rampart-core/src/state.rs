//! Simulation snapshot: the complete visible state after each tick.

use serde::{Deserialize, Serialize};

use crate::enums::*;
use crate::events::SimEvent;
use crate::types::{AgentId, DefenderId, Orientation, Position, SimTime};

/// State broadcast to observers after each tick.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SimSnapshot {
    pub time: SimTime,
    pub phase: SessionPhase,
    pub director: DirectorView,
    pub core: CoreView,
    pub gold: u32,
    pub agents: Vec<AgentView>,
    pub defenders: Vec<DefenderView>,
    /// Events emitted during this tick, in emission order.
    pub events: Vec<SimEvent>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DirectorView {
    pub phase: DirectorPhase,
    pub round: u32,
    pub total_rounds: u32,
    pub remaining_to_spawn: u32,
    pub alive: u32,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CoreView {
    pub current: u32,
    pub max: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AgentView {
    pub id: AgentId,
    pub position: Position,
    pub orientation: Orientation,
    pub speed: f64,
    pub health: i32,
    pub max_health: u32,
    pub path_index: usize,
    /// `None` while the agent still uses fallback path pursuit.
    pub behavior: Option<BehaviorKind>,
    pub burning: bool,
    pub slowed: bool,
    pub stunned: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DefenderView {
    pub id: DefenderId,
    pub template_id: String,
    pub position: Position,
    pub range: f64,
    pub damage: f64,
    pub fire_interval: f64,
    pub target: Option<AgentId>,
    pub strategy: TargetStrategyKind,
    pub element: Option<ElementType>,
    pub element_level: u8,
}
