//! Elemental modifier engine.
//!
//! A defender holds at most one element. Attaching it captures the
//! defender's base stats once; every tier change recomputes stats from that
//! baseline and removal restores it exactly. Hits from an elemental defender
//! can carry burn, slow and stun payloads and spill over as chain or area
//! damage.

use std::collections::BTreeSet;

use log::debug;

use rampart_core::config::{ElementDefinition, ElementTier};
use rampart_core::constants::*;
use rampart_core::enums::{EffectKind, ElementType};
use rampart_core::error::ElementError;
use rampart_core::types::AgentId;

use crate::components::Defender;
use crate::effects::ActiveEffects;
use crate::scenario;
use crate::targeting::TargetCandidate;

/// The stats an element scales.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DefenderStats {
    pub range: f64,
    pub damage: f64,
    pub fire_interval: f64,
}

impl DefenderStats {
    pub fn of(defender: &Defender) -> Self {
        Self {
            range: defender.range,
            damage: defender.damage,
            fire_interval: defender.fire_interval,
        }
    }
}

/// Element attached to a defender.
#[derive(Debug, Clone, PartialEq)]
pub struct ElementalState {
    pub element: ElementType,
    pub level: u8,
    pub tier: ElementTier,
    /// Simulated effects of the definition and tier flags, in resolution order.
    pub effects: Vec<EffectKind>,
    baseline: DefenderStats,
}

impl ElementalState {
    /// Stats captured when the element was first attached.
    pub fn baseline(&self) -> DefenderStats {
        self.baseline
    }

    pub fn has(&self, kind: EffectKind) -> bool {
        self.effects.contains(&kind)
    }
}

/// A purchasable element tier.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UpgradeOffer {
    pub element: ElementType,
    pub level: u8,
    pub cost: u32,
}

/// Element definitions available to the session.
#[derive(Debug, Clone, PartialEq)]
pub struct ElementCatalog {
    definitions: Vec<ElementDefinition>,
}

impl Default for ElementCatalog {
    fn default() -> Self {
        Self::new(scenario::default_elements())
    }
}

impl ElementCatalog {
    pub fn new(definitions: Vec<ElementDefinition>) -> Self {
        Self { definitions }
    }

    pub fn definition(&self, element: ElementType) -> Option<&ElementDefinition> {
        self.definitions.iter().find(|d| d.element_type == element)
    }

    pub fn tier(&self, element: ElementType, level: u8) -> Result<&ElementTier, ElementError> {
        self.definition(element)
            .and_then(|d| d.tier(level))
            .ok_or(ElementError::MissingTier { element, level })
    }

    pub fn elements(&self) -> impl Iterator<Item = ElementType> + '_ {
        self.definitions.iter().map(|d| d.element_type)
    }

    /// Simulated effects for a tier: the definition's base flags, the tier's
    /// own flags, and area damage when the tier has a blast radius.
    pub fn effects_for(&self, element: ElementType, tier: &ElementTier) -> Vec<EffectKind> {
        let base = self
            .definition(element)
            .map(|d| d.base_effect_flags.as_slice())
            .unwrap_or_default();
        let mut kinds: BTreeSet<EffectKind> = base
            .iter()
            .chain(tier.effect_flags.iter())
            .filter_map(|flag| flag.kind())
            .collect();
        if tier.blast_radius > 0.0 {
            kinds.insert(EffectKind::Area);
        }
        kinds.into_iter().collect()
    }
}

/// Price of an element tier: `50 × level × element factor`, rounded.
pub fn upgrade_cost(element: ElementType, level: u8) -> u32 {
    (ELEMENT_BASE_COST * level as f64 * element.cost_factor()).round_ties_even() as u32
}

/// Validate attaching `element` at tier 1. Returns its cost.
pub fn check_element(
    defender: &Defender,
    element: ElementType,
    catalog: &ElementCatalog,
) -> Result<u32, ElementError> {
    if let Some(state) = &defender.element {
        if state.element == element {
            return Err(ElementError::AlreadyApplied(element));
        }
        return Err(ElementError::ConflictingElement {
            held: state.element,
            requested: element,
        });
    }
    catalog.tier(element, 1)?;
    Ok(upgrade_cost(element, 1))
}

/// Attach `element` at tier 1 and capture the baseline.
pub fn apply_element(
    defender: &mut Defender,
    element: ElementType,
    catalog: &ElementCatalog,
) -> Result<(), ElementError> {
    check_element(defender, element, catalog)?;
    attach(defender, element, 1, catalog)
}

/// Validate raising `element` to `level`. Returns its cost.
///
/// A defender with no element may buy any tier directly.
pub fn check_upgrade(
    defender: &Defender,
    element: ElementType,
    level: u8,
    catalog: &ElementCatalog,
) -> Result<u32, ElementError> {
    if let Some(state) = &defender.element {
        if state.element != element {
            return Err(ElementError::ConflictingElement {
                held: state.element,
                requested: element,
            });
        }
        if level <= state.level {
            return Err(ElementError::NotAnUpgrade {
                current: state.level,
                requested: level,
            });
        }
    }
    catalog.tier(element, level)?;
    Ok(upgrade_cost(element, level))
}

/// Move the held element to `level`, or attach it there if none is held.
pub fn apply_upgrade(
    defender: &mut Defender,
    element: ElementType,
    level: u8,
    catalog: &ElementCatalog,
) -> Result<(), ElementError> {
    check_upgrade(defender, element, level, catalog)?;
    attach(defender, element, level, catalog)
}

/// Restore the baseline and clear the element.
pub fn remove_element(defender: &mut Defender) -> Result<ElementType, ElementError> {
    let state = defender.element.take().ok_or(ElementError::NoElement)?;
    let baseline = state.baseline;
    defender.range = baseline.range;
    defender.damage = baseline.damage;
    defender.fire_interval = baseline.fire_interval;
    debug!("defender {:?} lost {:?}", defender.id, state.element);
    Ok(state.element)
}

/// Tiers the defender could buy next: tier 1 of every element when it holds
/// none, otherwise the higher tiers of its element.
pub fn available_upgrades(defender: &Defender, catalog: &ElementCatalog) -> Vec<UpgradeOffer> {
    match &defender.element {
        None => catalog
            .elements()
            .filter(|e| catalog.tier(*e, 1).is_ok())
            .map(|element| UpgradeOffer {
                element,
                level: 1,
                cost: upgrade_cost(element, 1),
            })
            .collect(),
        Some(state) => catalog
            .definition(state.element)
            .map(|d| {
                let mut offers: Vec<UpgradeOffer> = d
                    .tiers
                    .iter()
                    .filter(|t| t.level > state.level)
                    .map(|t| UpgradeOffer {
                        element: state.element,
                        level: t.level,
                        cost: upgrade_cost(state.element, t.level),
                    })
                    .collect();
                offers.sort_by_key(|o| o.level);
                offers
            })
            .unwrap_or_default(),
    }
}

fn attach(
    defender: &mut Defender,
    element: ElementType,
    level: u8,
    catalog: &ElementCatalog,
) -> Result<(), ElementError> {
    let tier = catalog.tier(element, level)?.clone();
    let baseline = defender
        .element
        .as_ref()
        .map_or_else(|| DefenderStats::of(defender), |s| s.baseline);

    defender.range = baseline.range * tier.range_mult;
    defender.damage = baseline.damage * tier.damage_mult;
    defender.fire_interval = baseline.fire_interval / tier.speed_mult;
    defender.element = Some(ElementalState {
        element,
        level,
        effects: catalog.effects_for(element, &tier),
        tier,
        baseline,
    });
    debug!("defender {:?} now {:?} tier {}", defender.id, element, level);
    Ok(())
}

/// Attach the burn, slow and stun payloads of a hit to the struck agent.
pub fn apply_status_effects(state: &ElementalState, effects: &mut ActiveEffects, now: f64) {
    let tier = &state.tier;
    for kind in &state.effects {
        match kind {
            EffectKind::Burn => effects.apply_burn(tier.potency, tier.duration, now),
            EffectKind::Slow => effects.apply_slow(tier.potency, tier.duration, now),
            EffectKind::Stun => effects.apply_stun(tier.duration, now),
            EffectKind::Chain | EffectKind::Area => {}
        }
    }
}

/// Chain and area hits that spill from a primary hit of `damage`.
///
/// Chain jumps go to the nearest agents within range of the struck one,
/// jump `k` dealing `damage × falloff^k`. Area damage falls off linearly to
/// zero at the blast radius. The struck agent is never in the result.
pub fn secondary_hits(
    state: &ElementalState,
    primary: &TargetCandidate,
    others: &[TargetCandidate],
    damage: f64,
) -> Vec<(AgentId, f64)> {
    let tier = &state.tier;
    let mut hits = Vec::new();

    if state.has(EffectKind::Chain) && tier.extra_targets > 0 {
        let falloff = if tier.potency > 0.0 && tier.potency <= 1.0 {
            tier.potency
        } else {
            CHAIN_DEFAULT_FALLOFF
        };
        let mut near: Vec<(f64, &TargetCandidate)> = others
            .iter()
            .filter(|c| c.id != primary.id)
            .map(|c| (c.position.distance(primary.position), c))
            .filter(|(d, _)| *d <= CHAIN_JUMP_RANGE)
            .collect();
        near.sort_by(|a, b| a.0.total_cmp(&b.0).then(a.1.id.cmp(&b.1.id)));
        for (k, (_, c)) in near.iter().take(tier.extra_targets as usize).enumerate() {
            hits.push((c.id, damage * falloff.powi(k as i32 + 1)));
        }
    }

    if state.has(EffectKind::Area) && tier.blast_radius > 0.0 {
        for c in others.iter().filter(|c| c.id != primary.id) {
            let d = c.position.distance(primary.position);
            if d < tier.blast_radius {
                hits.push((c.id, damage * (1.0 - d / tier.blast_radius)));
            }
        }
    }

    hits
}
