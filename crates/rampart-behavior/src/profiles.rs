//! Behavior-specific stat profiles.
//!
//! Each behavior trades toughness for speed or reward. The profile is applied
//! once, when the agent spawns.

use rampart_core::constants::*;
use rampart_core::enums::BehaviorKind;

/// Multipliers applied to an agent's template stats.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BehaviorStatProfile {
    pub health_factor: f64,
    pub reward_factor: f64,
    pub core_damage_factor: f64,
}

/// Integer stats of a single agent.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AgentStats {
    pub health: u32,
    pub reward_gold: u32,
    pub core_damage: u32,
}

/// Get the stat profile for a behavior.
pub fn get_profile(kind: BehaviorKind) -> BehaviorStatProfile {
    match kind {
        BehaviorKind::Steady => BehaviorStatProfile {
            health_factor: 1.0,
            reward_factor: 1.0,
            core_damage_factor: 1.0,
        },
        BehaviorKind::Surge => BehaviorStatProfile {
            health_factor: SURGE_HEALTH_FACTOR,
            reward_factor: SURGE_REWARD_FACTOR,
            core_damage_factor: 1.0,
        },
        BehaviorKind::Weave => BehaviorStatProfile {
            health_factor: 1.0,
            reward_factor: WEAVE_REWARD_FACTOR,
            core_damage_factor: 1.0,
        },
        BehaviorKind::Juggernaut => BehaviorStatProfile {
            health_factor: JUGGERNAUT_HEALTH_FACTOR,
            reward_factor: JUGGERNAUT_REWARD_FACTOR,
            core_damage_factor: JUGGERNAUT_CORE_DAMAGE_FACTOR,
        },
    }
}

impl BehaviorStatProfile {
    /// Scale `stats`, rounding half to even. Health never drops below 1.
    pub fn apply(&self, stats: AgentStats) -> AgentStats {
        AgentStats {
            health: scale(stats.health, self.health_factor).max(1),
            reward_gold: scale(stats.reward_gold, self.reward_factor),
            core_damage: scale(stats.core_damage, self.core_damage_factor),
        }
    }
}

fn scale(value: u32, factor: f64) -> u32 {
    (value as f64 * factor).round_ties_even() as u32
}
