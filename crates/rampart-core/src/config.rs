//! Configuration records loaded at startup.
//!
//! A `GameConfig` describes everything the engine needs before the first
//! tick: the path, spawn points, templates, waves and the element catalog.
//! Validation happens once, here; the engine treats a validated config as
//! trusted.

use std::collections::HashSet;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::constants::*;
use crate::enums::{ElementType, ElementalEffect, TargetStrategyKind};
use crate::error::ConfigError;
use crate::types::Position;

/// One scheduled batch of agent spawns.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WaveConfig {
    pub agent_template_id: String,
    pub count: u32,
    /// Seconds between spawns.
    pub interval: f64,
    pub pct_steady: f64,
    pub pct_surge: f64,
    pub pct_weave: f64,
    pub pct_juggernaut: f64,
}

impl WaveConfig {
    /// Behavior weights in [`crate::enums::BehaviorKind::ALL`] order.
    pub fn behavior_weights(&self) -> [f64; 4] {
        [
            self.pct_steady,
            self.pct_surge,
            self.pct_weave,
            self.pct_juggernaut,
        ]
    }
}

/// Base stats for a hostile agent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AgentTemplate {
    pub id: String,
    /// Units per second.
    pub speed: f64,
    pub health: u32,
    pub reward_gold: u32,
    pub core_damage: u32,
}

/// Base stats for a defender.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DefenderTemplate {
    pub id: String,
    pub range: f64,
    pub damage: f64,
    /// Seconds between shots.
    pub fire_interval: f64,
    pub cost: u32,
    #[serde(default)]
    pub target_strategy: TargetStrategyKind,
}

/// One tier of an element.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ElementTier {
    pub level: u8,
    #[serde(default = "one")]
    pub damage_mult: f64,
    /// Fire-rate multiplier; the fire interval is divided by it.
    #[serde(default = "one")]
    pub speed_mult: f64,
    #[serde(default = "one")]
    pub range_mult: f64,
    #[serde(default)]
    pub effect_flags: Vec<ElementalEffect>,
    #[serde(default)]
    pub duration: f64,
    #[serde(default)]
    pub potency: f64,
    #[serde(default)]
    pub extra_targets: u32,
    #[serde(default)]
    pub blast_radius: f64,
    #[serde(default)]
    pub crit_chance: f64,
    #[serde(default = "default_crit_mult")]
    pub crit_mult: f64,
}

fn one() -> f64 {
    1.0
}

fn default_crit_mult() -> f64 {
    1.5
}

/// An element and its upgrade tiers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ElementDefinition {
    #[serde(rename = "type")]
    pub element_type: ElementType,
    #[serde(default)]
    pub base_effect_flags: Vec<ElementalEffect>,
    pub tiers: Vec<ElementTier>,
}

impl ElementDefinition {
    /// Tier at the given level, if defined.
    pub fn tier(&self, level: u8) -> Option<&ElementTier> {
        self.tiers.iter().find(|t| t.level == level)
    }
}

/// Complete startup configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GameConfig {
    /// RNG seed. Same seed and same commands give the same run.
    pub seed: u64,
    /// Fixed step used by `SimulationEngine::step`.
    #[serde(default = "default_dt")]
    pub dt: f64,
    /// Ordered waypoints; the last one is the core.
    pub path: Vec<Position>,
    pub spawn_points: Vec<Position>,
    #[serde(default = "default_core_health")]
    pub core_max_health: u32,
    #[serde(default = "default_starting_gold")]
    pub starting_gold: u32,
    #[serde(default = "default_escalation_step")]
    pub escalation_step: u32,
    pub agent_templates: Vec<AgentTemplate>,
    pub defender_templates: Vec<DefenderTemplate>,
    pub waves: Vec<WaveConfig>,
    #[serde(default)]
    pub elements: Vec<ElementDefinition>,
}

fn default_dt() -> f64 {
    DT
}

fn default_core_health() -> u32 {
    DEFAULT_CORE_HEALTH
}

fn default_starting_gold() -> u32 {
    DEFAULT_STARTING_GOLD
}

fn default_escalation_step() -> u32 {
    DEFAULT_ESCALATION_STEP
}

impl GameConfig {
    /// Parse and validate a JSON config.
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let config: GameConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Read, parse and validate a JSON config file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path)?;
        Self::from_json_str(&text)
    }

    pub fn agent_template(&self, id: &str) -> Option<&AgentTemplate> {
        self.agent_templates.iter().find(|t| t.id == id)
    }

    pub fn defender_template(&self, id: &str) -> Option<&DefenderTemplate> {
        self.defender_templates.iter().find(|t| t.id == id)
    }

    /// Check every startup invariant. Failures are fatal configuration errors.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.path.is_empty() {
            return Err(ConfigError::MissingPath);
        }
        if self.spawn_points.is_empty() {
            return Err(ConfigError::MissingSpawnPoints);
        }
        if !(self.dt > 0.0) {
            return Err(ConfigError::InvalidTimeStep(self.dt));
        }
        if self.core_max_health == 0 {
            return Err(ConfigError::ZeroCoreHealth);
        }

        for template in &self.agent_templates {
            if !(template.speed >= 0.0) || template.health == 0 {
                return Err(ConfigError::InvalidAgentTemplate(template.id.clone()));
            }
        }
        for template in &self.defender_templates {
            if !(template.range >= 0.0) || !(template.fire_interval > 0.0) {
                return Err(ConfigError::InvalidDefenderTemplate(template.id.clone()));
            }
        }

        for (index, wave) in self.waves.iter().enumerate() {
            if self.agent_template(&wave.agent_template_id).is_none() {
                return Err(ConfigError::UnknownAgentTemplate {
                    wave: index,
                    template: wave.agent_template_id.clone(),
                });
            }
            if !(wave.interval >= 0.0) {
                return Err(ConfigError::InvalidInterval { wave: index });
            }
            let weights = wave.behavior_weights();
            let total: f64 = weights.iter().sum();
            if weights.iter().any(|w| !(*w >= 0.0)) || !(total > 0.0) {
                return Err(ConfigError::InvalidBehaviorWeights { wave: index });
            }
        }

        let mut seen = HashSet::new();
        for definition in &self.elements {
            if !seen.insert(definition.element_type) {
                return Err(ConfigError::DuplicateElement(definition.element_type));
            }
            let mut levels = HashSet::new();
            for tier in &definition.tiers {
                if tier.level == 0 || tier.level > MAX_ELEMENT_LEVEL || !levels.insert(tier.level)
                {
                    return Err(ConfigError::InvalidTier {
                        element: definition.element_type,
                        level: tier.level,
                    });
                }
                if !(tier.speed_mult > 0.0) || !(tier.damage_mult >= 0.0) || !(tier.range_mult >= 0.0)
                {
                    return Err(ConfigError::InvalidTier {
                        element: definition.element_type,
                        level: tier.level,
                    });
                }
            }
        }

        Ok(())
    }
}
