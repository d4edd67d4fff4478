//! Enumeration types used throughout the simulation.

use serde::{Deserialize, Serialize};

/// Movement behavior variant attached to a hostile agent.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BehaviorKind {
    /// Constant speed along the path.
    #[default]
    Steady,
    /// Faster than normal with randomized sprint windows.
    Surge,
    /// Lateral sinusoidal weaving while advancing.
    Weave,
    /// Slow, winds up and bursts when close to a waypoint.
    Juggernaut,
}

impl BehaviorKind {
    /// All variants in assignment order. The last one absorbs the remainder.
    pub const ALL: [BehaviorKind; 4] = [
        BehaviorKind::Steady,
        BehaviorKind::Surge,
        BehaviorKind::Weave,
        BehaviorKind::Juggernaut,
    ];

    /// Position of this variant in [`BehaviorKind::ALL`].
    pub fn index(self) -> usize {
        match self {
            BehaviorKind::Steady => 0,
            BehaviorKind::Surge => 1,
            BehaviorKind::Weave => 2,
            BehaviorKind::Juggernaut => 3,
        }
    }
}

/// Target selection strategy of a defender.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TargetStrategyKind {
    /// Closest agent to the defender.
    #[default]
    Nearest,
    /// Agent with the least current health.
    Weakest,
}

/// Element that can be attached to a defender.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum ElementType {
    Fire,
    Ice,
    Lightning,
    Poison,
    Holy,
    Dark,
}

impl ElementType {
    pub const ALL: [ElementType; 6] = [
        ElementType::Fire,
        ElementType::Ice,
        ElementType::Lightning,
        ElementType::Poison,
        ElementType::Holy,
        ElementType::Dark,
    ];

    /// Price multiplier used when costing an upgrade of this element.
    pub fn cost_factor(self) -> f64 {
        match self {
            ElementType::Fire => 1.2,
            ElementType::Ice => 1.1,
            ElementType::Lightning => 1.3,
            ElementType::Poison => 1.0,
            ElementType::Holy => 1.5,
            ElementType::Dark => 1.4,
        }
    }
}

/// Effect flags carried by element definitions and tiers.
///
/// Several flags collapse onto the same simulated [`EffectKind`]; flags with
/// no simulated counterpart are kept for observers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ElementalEffect {
    DamageOverTime,
    Slow,
    Stun,
    ChainDamage,
    ArmorReduction,
    LifeSteal,
    Heal,
    Burn,
    Freeze,
    Shock,
    Poison,
    Purify,
    Curse,
}

impl ElementalEffect {
    /// The simulated effect this flag triggers on hit, if any.
    pub fn kind(self) -> Option<EffectKind> {
        match self {
            ElementalEffect::DamageOverTime | ElementalEffect::Burn | ElementalEffect::Poison => {
                Some(EffectKind::Burn)
            }
            ElementalEffect::Slow | ElementalEffect::Freeze => Some(EffectKind::Slow),
            ElementalEffect::Stun => Some(EffectKind::Stun),
            ElementalEffect::ChainDamage | ElementalEffect::Shock => Some(EffectKind::Chain),
            ElementalEffect::ArmorReduction
            | ElementalEffect::LifeSteal
            | ElementalEffect::Heal
            | ElementalEffect::Purify
            | ElementalEffect::Curse => None,
        }
    }
}

/// Secondary effect applied when a shaped hit lands.
///
/// Declaration order is resolution order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum EffectKind {
    /// Periodic damage for a duration.
    Burn,
    /// Temporary speed multiplier.
    Slow,
    /// Movement suspended for a duration.
    Stun,
    /// Reduced-damage hits on nearby agents.
    Chain,
    /// Falloff damage to every agent within a radius.
    Area,
}

/// Wave director state.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum DirectorPhase {
    /// Waiting for the start-round signal.
    #[default]
    Idle,
    /// Spawning the current wave on its interval.
    Spawning,
    /// All agents spawned; waiting for the alive counter to reach zero.
    AwaitingClear,
    /// Every configured wave has been cleared.
    Complete,
}

/// Overall session phase.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum SessionPhase {
    /// Between rounds; building and upgrading is expected here.
    #[default]
    Preparation,
    /// A round is running.
    Combat,
    /// The core was destroyed.
    Lost,
    /// Every wave was cleared.
    Victory,
}

impl SessionPhase {
    /// Whether the session has reached a terminal phase.
    pub fn is_over(self) -> bool {
        matches!(self, SessionPhase::Lost | SessionPhase::Victory)
    }
}
