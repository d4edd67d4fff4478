//! Built-in campaign and element catalog.
//!
//! Used when no config file is supplied, and as the element catalog for
//! configs that define no elements of their own.

use rampart_core::config::*;
use rampart_core::constants::*;
use rampart_core::enums::{ElementType, ElementalEffect, TargetStrategyKind};
use rampart_core::types::Position;

fn tier(level: u8) -> ElementTier {
    ElementTier {
        level,
        damage_mult: 1.0,
        speed_mult: 1.0,
        range_mult: 1.0,
        effect_flags: Vec::new(),
        duration: 0.0,
        potency: 0.0,
        extra_targets: 0,
        blast_radius: 0.0,
        crit_chance: 0.0,
        crit_mult: 1.5,
    }
}

/// Three tiers for each of the six elements.
pub fn default_elements() -> Vec<ElementDefinition> {
    vec![
        ElementDefinition {
            element_type: ElementType::Fire,
            base_effect_flags: vec![ElementalEffect::DamageOverTime, ElementalEffect::Burn],
            tiers: vec![
                ElementTier {
                    damage_mult: 1.15,
                    duration: 3.0,
                    potency: 5.0,
                    ..tier(1)
                },
                ElementTier {
                    damage_mult: 1.3,
                    duration: 4.0,
                    potency: 10.0,
                    crit_chance: 0.1,
                    ..tier(2)
                },
                ElementTier {
                    damage_mult: 1.5,
                    duration: 5.0,
                    potency: 15.0,
                    blast_radius: 3.0,
                    crit_chance: 0.2,
                    ..tier(3)
                },
            ],
        },
        ElementDefinition {
            element_type: ElementType::Ice,
            base_effect_flags: vec![ElementalEffect::Slow, ElementalEffect::Freeze],
            tiers: vec![
                ElementTier {
                    damage_mult: 1.1,
                    speed_mult: 0.8,
                    duration: 2.0,
                    potency: 0.3,
                    ..tier(1)
                },
                ElementTier {
                    damage_mult: 1.2,
                    speed_mult: 0.7,
                    duration: 3.0,
                    potency: 0.5,
                    effect_flags: vec![ElementalEffect::Stun],
                    ..tier(2)
                },
                ElementTier {
                    damage_mult: 1.35,
                    speed_mult: 0.6,
                    duration: 4.0,
                    potency: 0.7,
                    blast_radius: 4.0,
                    extra_targets: 2,
                    ..tier(3)
                },
            ],
        },
        ElementDefinition {
            element_type: ElementType::Lightning,
            base_effect_flags: vec![ElementalEffect::ChainDamage, ElementalEffect::Shock],
            tiers: vec![
                ElementTier {
                    damage_mult: 1.05,
                    speed_mult: 1.1,
                    extra_targets: 1,
                    potency: 0.8,
                    ..tier(1)
                },
                ElementTier {
                    damage_mult: 1.2,
                    speed_mult: 1.2,
                    extra_targets: 3,
                    potency: 0.7,
                    crit_chance: 0.15,
                    ..tier(2)
                },
                ElementTier {
                    damage_mult: 1.4,
                    speed_mult: 1.3,
                    extra_targets: 5,
                    potency: 0.6,
                    effect_flags: vec![ElementalEffect::Stun],
                    duration: 0.5,
                    crit_chance: 0.25,
                    ..tier(3)
                },
            ],
        },
        ElementDefinition {
            element_type: ElementType::Poison,
            base_effect_flags: vec![ElementalEffect::Poison],
            tiers: vec![
                ElementTier {
                    damage_mult: 1.0,
                    duration: 5.0,
                    potency: 3.0,
                    ..tier(1)
                },
                ElementTier {
                    damage_mult: 1.1,
                    duration: 6.0,
                    potency: 6.0,
                    effect_flags: vec![ElementalEffect::ArmorReduction],
                    ..tier(2)
                },
                ElementTier {
                    damage_mult: 1.2,
                    duration: 8.0,
                    potency: 9.0,
                    blast_radius: 2.5,
                    ..tier(3)
                },
            ],
        },
        ElementDefinition {
            element_type: ElementType::Holy,
            base_effect_flags: vec![ElementalEffect::Purify],
            tiers: vec![
                ElementTier {
                    damage_mult: 1.25,
                    range_mult: 1.1,
                    crit_chance: 0.1,
                    crit_mult: 2.0,
                    ..tier(1)
                },
                ElementTier {
                    damage_mult: 1.45,
                    range_mult: 1.2,
                    crit_chance: 0.2,
                    crit_mult: 2.0,
                    ..tier(2)
                },
                ElementTier {
                    damage_mult: 1.7,
                    range_mult: 1.3,
                    crit_chance: 0.3,
                    crit_mult: 2.5,
                    effect_flags: vec![ElementalEffect::Stun],
                    duration: 0.75,
                    ..tier(3)
                },
            ],
        },
        ElementDefinition {
            element_type: ElementType::Dark,
            base_effect_flags: vec![ElementalEffect::Curse, ElementalEffect::ArmorReduction],
            tiers: vec![
                ElementTier {
                    damage_mult: 1.3,
                    speed_mult: 0.9,
                    ..tier(1)
                },
                ElementTier {
                    damage_mult: 1.55,
                    speed_mult: 0.9,
                    effect_flags: vec![ElementalEffect::DamageOverTime],
                    duration: 3.0,
                    potency: 4.0,
                    ..tier(2)
                },
                ElementTier {
                    damage_mult: 1.85,
                    speed_mult: 0.9,
                    effect_flags: vec![ElementalEffect::DamageOverTime],
                    duration: 4.0,
                    potency: 8.0,
                    blast_radius: 3.5,
                    ..tier(3)
                },
            ],
        },
    ]
}

fn wave(template: &str, count: u32, interval: f64, pct: [f64; 4]) -> WaveConfig {
    WaveConfig {
        agent_template_id: template.to_string(),
        count,
        interval,
        pct_steady: pct[0],
        pct_surge: pct[1],
        pct_weave: pct[2],
        pct_juggernaut: pct[3],
    }
}

/// Five escalating rounds along a dog-leg path.
pub fn default_campaign() -> GameConfig {
    GameConfig {
        seed: 42,
        dt: DT,
        path: vec![
            Position::new(0.0, 0.0, 0.0),
            Position::new(0.0, 0.0, 20.0),
            Position::new(15.0, 0.0, 20.0),
            Position::new(15.0, 0.0, 40.0),
            Position::new(-5.0, 0.0, 40.0),
            Position::new(-5.0, 0.0, 60.0),
        ],
        spawn_points: vec![Position::new(-1.0, 0.0, -2.0), Position::new(1.0, 0.0, -2.0)],
        core_max_health: DEFAULT_CORE_HEALTH,
        starting_gold: 250,
        escalation_step: DEFAULT_ESCALATION_STEP,
        agent_templates: vec![
            AgentTemplate {
                id: "grunt".to_string(),
                speed: 3.0,
                health: 20,
                reward_gold: 5,
                core_damage: 1,
            },
            AgentTemplate {
                id: "runner".to_string(),
                speed: 4.5,
                health: 12,
                reward_gold: 6,
                core_damage: 1,
            },
            AgentTemplate {
                id: "brute".to_string(),
                speed: 2.0,
                health: 60,
                reward_gold: 15,
                core_damage: 3,
            },
        ],
        defender_templates: vec![
            DefenderTemplate {
                id: "arrow".to_string(),
                range: 8.0,
                damage: 6.0,
                fire_interval: 0.8,
                cost: 50,
                target_strategy: TargetStrategyKind::Nearest,
            },
            DefenderTemplate {
                id: "cannon".to_string(),
                range: 6.0,
                damage: 18.0,
                fire_interval: 2.0,
                cost: 90,
                target_strategy: TargetStrategyKind::Weakest,
            },
        ],
        waves: vec![
            wave("grunt", 6, 1.5, [100.0, 0.0, 0.0, 0.0]),
            wave("grunt", 10, 1.2, [60.0, 20.0, 20.0, 0.0]),
            wave("runner", 12, 1.0, [40.0, 40.0, 20.0, 0.0]),
            wave("grunt", 16, 0.9, [40.0, 20.0, 20.0, 20.0]),
            wave("brute", 8, 2.0, [25.0, 0.0, 25.0, 50.0]),
        ],
        elements: default_elements(),
    }
}
