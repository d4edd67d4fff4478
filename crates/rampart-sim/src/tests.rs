//! Tests for the simulation engine, wave director, fire control and elements.

use std::cell::RefCell;
use std::rc::Rc;

use hecs::World;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use rampart_behavior::movement::{ChargePhase, MovementBehavior};
use rampart_behavior::path::Waypoints;
use rampart_behavior::profiles::AgentStats;
use rampart_core::commands::PlayerCommand;
use rampart_core::config::{
    AgentTemplate, DefenderTemplate, ElementDefinition, ElementTier, GameConfig, WaveConfig,
};
use rampart_core::enums::*;
use rampart_core::error::{ElementError, SimError};
use rampart_core::events::SimEvent;
use rampart_core::types::{AgentId, DefenderId, Position};

use crate::combat::{self, Services};
use crate::components::{Defender, Mover, Vitals};
use crate::core_health::CoreHealth;
use crate::director::WaveDirector;
use crate::economy::{EconomyLedger, Treasury};
use crate::effects::ActiveEffects;
use crate::elemental::{self, ElementCatalog, ElementalState};
use crate::engine::SimulationEngine;
use crate::event_bus::EventBus;
use crate::scenario;
use crate::systems;
use crate::targeting::{self, TargetCandidate};
use crate::world_setup::{self, AgentSpawn};

// ---- Fixtures ----

fn wave(count: u32, interval: f64) -> WaveConfig {
    WaveConfig {
        agent_template_id: "dummy".to_string(),
        count,
        interval,
        pct_steady: 100.0,
        pct_surge: 0.0,
        pct_weave: 0.0,
        pct_juggernaut: 0.0,
    }
}

/// Stationary 10-health agents on a long straight path, and a turret that
/// one-shots them four times a second.
fn arena(waves: Vec<WaveConfig>) -> GameConfig {
    GameConfig {
        seed: 7,
        dt: 0.25,
        path: vec![Position::ZERO, Position::new(0.0, 0.0, 100.0)],
        spawn_points: vec![Position::ZERO],
        core_max_health: 20,
        starting_gold: 1000,
        escalation_step: 0,
        agent_templates: vec![AgentTemplate {
            id: "dummy".to_string(),
            speed: 0.0,
            health: 10,
            reward_gold: 5,
            core_damage: 1,
        }],
        defender_templates: vec![DefenderTemplate {
            id: "turret".to_string(),
            range: 5.0,
            damage: 100.0,
            fire_interval: 0.25,
            cost: 50,
            target_strategy: TargetStrategyKind::Nearest,
        }],
        waves,
        elements: Vec::new(),
    }
}

fn defender(range: f64, damage: f64, fire_interval: f64) -> Defender {
    Defender {
        id: DefenderId(0),
        template_id: "turret".to_string(),
        range,
        damage,
        fire_interval,
        fire_timer: 0.0,
        target: None,
        strategy: TargetStrategyKind::Nearest,
        element: None,
    }
}

fn candidate(id: u32, x: f64, health: i32) -> TargetCandidate {
    TargetCandidate {
        id: AgentId(id),
        position: Position::new(x, 0.0, 0.0),
        health,
    }
}

fn elemental_state(element: ElementType, level: u8) -> ElementalState {
    let catalog = ElementCatalog::default();
    let mut d = defender(5.0, 10.0, 1.0);
    elemental::apply_upgrade(&mut d, element, level, &catalog).unwrap();
    d.element.unwrap()
}

/// A single Holy tier carrying only `effect`, so a hit applies nothing else.
fn status_element(effect: ElementalEffect, potency: f64) -> ElementDefinition {
    ElementDefinition {
        element_type: ElementType::Holy,
        base_effect_flags: Vec::new(),
        tiers: vec![ElementTier {
            level: 1,
            damage_mult: 1.0,
            speed_mult: 1.0,
            range_mult: 1.0,
            effect_flags: vec![effect],
            duration: 1.0,
            potency,
            extra_targets: 0,
            blast_radius: 0.0,
            crit_chance: 0.0,
            crit_mult: 1.5,
        }],
    }
}

/// Per-tick distance walked by one agent in the ticks after a turret first
/// hits it with `element`.
fn strides_after_hit(element: ElementDefinition, ticks: usize) -> Vec<f64> {
    let mut config = arena(vec![wave(1, 1.0)]);
    config.agent_templates[0].speed = 4.0;
    config.agent_templates[0].health = 1000;
    config.defender_templates[0].damage = 1.0;
    config.defender_templates[0].fire_interval = 5.0;
    config.defender_templates[0].range = 1000.0;
    config.elements = vec![element];

    let mut engine = SimulationEngine::new(config).unwrap();
    engine
        .place_defender("turret", Position::new(1.0, 0.0, 0.0), Some(ElementType::Holy))
        .unwrap();
    engine.start_round().unwrap();

    let mut last_z = None;
    for _ in 0..100 {
        let snap = engine.step();
        let fired = count_events(&snap.events, |e| matches!(e, SimEvent::DefenderFired { .. }));
        if fired > 0 {
            last_z = Some(snap.agents[0].position.z);
            break;
        }
    }
    let mut last_z = last_z.expect("turret never fired");

    let mut strides = Vec::new();
    for _ in 0..ticks {
        let snap = engine.step();
        let z = snap.agents[0].position.z;
        strides.push(z - last_z);
        last_z = z;
    }
    strides
}

fn count_events(events: &[SimEvent], pred: impl Fn(&SimEvent) -> bool) -> usize {
    events.iter().filter(|e| pred(e)).count()
}

// ---- Determinism ----

#[test]
fn test_determinism_same_seed() {
    let mut engine_a = SimulationEngine::new(scenario::default_campaign()).unwrap();
    let mut engine_b = SimulationEngine::new(scenario::default_campaign()).unwrap();

    for engine in [&mut engine_a, &mut engine_b] {
        engine
            .place_defender("arrow", Position::new(3.0, 0.0, 10.0), None)
            .unwrap();
        engine
            .place_defender("cannon", Position::new(10.0, 0.0, 22.0), None)
            .unwrap();
        engine.queue_command(PlayerCommand::StartRound);
    }

    for _ in 0..900 {
        let snap_a = engine_a.step();
        let snap_b = engine_b.step();

        let json_a = serde_json::to_string(&snap_a).unwrap();
        let json_b = serde_json::to_string(&snap_b).unwrap();
        assert_eq!(json_a, json_b, "Snapshots diverged with same seed");

        if snap_a.phase == SessionPhase::Preparation {
            engine_a.queue_command(PlayerCommand::StartRound);
            engine_b.queue_command(PlayerCommand::StartRound);
        }
    }
}

// ---- Wave director ----

#[test]
fn test_spawn_schedule_and_round_change() {
    let mut engine = SimulationEngine::new(arena(vec![wave(3, 1.0), wave(1, 1.0)])).unwrap();
    engine
        .place_defender("turret", Position::new(2.0, 0.0, 0.0), None)
        .unwrap();
    engine.start_round().unwrap();
    assert_eq!(engine.phase(), SessionPhase::Combat);

    let mut remaining = Vec::new();
    let mut all_events = Vec::new();
    for _ in 0..12 {
        let before = engine.time().elapsed_secs;
        let snap = engine.tick(0.25);
        for event in &snap.events {
            if let SimEvent::RemainingToSpawn { remaining: r } = event {
                remaining.push((before, *r));
            }
        }
        all_events.extend(snap.events);
    }

    assert_eq!(remaining.len(), 3);
    let expected = [(0.0, 2), (1.0, 1), (2.0, 0)];
    for ((time, r), (want_time, want_r)) in remaining.iter().zip(expected) {
        assert!((time - want_time).abs() < 1e-9, "spawn at {time}, expected {want_time}");
        assert_eq!(*r, want_r);
    }

    let round_changes = count_events(&all_events, |e| matches!(e, SimEvent::RoundChanged { .. }));
    assert_eq!(round_changes, 1);
    assert!(all_events.contains(&SimEvent::RoundChanged { round: 1 }));
    assert!(all_events.contains(&SimEvent::PreparationStarted { round: 1 }));
    assert_eq!(engine.phase(), SessionPhase::Preparation);
    assert_eq!(engine.director().round(), 1);
    assert_eq!(engine.director().alive(), 0);
}

#[test]
fn test_behaviors_assigned_after_batch() {
    let mut config = arena(vec![WaveConfig {
        pct_steady: 50.0,
        pct_surge: 25.0,
        pct_weave: 25.0,
        ..wave(4, 1.0)
    }]);
    config.defender_templates.clear();
    let mut engine = SimulationEngine::new(config).unwrap();
    engine.start_round().unwrap();

    let first = engine.tick(0.25);
    assert_eq!(first.agents.len(), 1);
    assert_eq!(first.agents[0].behavior, None);

    let mut counts = None;
    for _ in 0..16 {
        let snap = engine.tick(0.25);
        for event in &snap.events {
            if let SimEvent::BehaviorsAssigned { counts: c } = event {
                counts = Some(*c);
            }
        }
    }
    assert_eq!(counts, Some([2, 1, 1, 0]));

    let snap = engine.snapshot();
    assert_eq!(snap.agents.len(), 4);
    assert!(snap.agents.iter().all(|a| a.behavior.is_some()));
    assert_eq!(snap.director.phase, DirectorPhase::AwaitingClear);
}

#[test]
fn test_alive_count_matches_live_agents() {
    let mut engine = SimulationEngine::new(scenario::default_campaign()).unwrap();
    engine
        .place_defender("arrow", Position::new(2.0, 0.0, 8.0), None)
        .unwrap();
    engine.start_round().unwrap();

    for _ in 0..1200 {
        let snap = engine.step();
        assert_eq!(snap.director.alive, snap.agents.len() as u32);
        if snap.phase == SessionPhase::Preparation {
            engine.queue_command(PlayerCommand::StartRound);
        }
        if snap.phase.is_over() {
            break;
        }
    }
}

#[test]
fn test_death_is_idempotent() {
    let config = arena(vec![wave(1, 1.0)]);
    let mut director = WaveDirector::new(&config);
    let mut core = CoreHealth::new(20);
    let mut ledger = Treasury::new(0);
    let mut events = EventBus::new();
    director.on_spawn(AgentId(0));

    let mut services = Services {
        director: &mut director,
        core: &mut core,
        ledger: &mut ledger,
        events: &mut events,
    };
    let mut vitals = Vitals::new(10, 5, 1);
    assert!(combat::die(AgentId(0), &mut vitals, &mut services));
    assert!(!combat::die(AgentId(0), &mut vitals, &mut services));
    assert!(!combat::reach_core(AgentId(0), &mut vitals, &mut services));
    assert!(!combat::receive_damage(AgentId(0), &mut vitals, 50.0, &mut services));

    assert_eq!(ledger.balance(), 5);
    assert_eq!(core.current(), 20);
    assert_eq!(director.alive(), 0);
    let kills = count_events(&events.drain(), |e| matches!(e, SimEvent::AgentKilled { .. }));
    assert_eq!(kills, 1);
}

#[test]
fn test_damage_rounds_up() {
    let config = arena(Vec::new());
    let mut director = WaveDirector::new(&config);
    let mut core = CoreHealth::new(20);
    let mut ledger = Treasury::new(0);
    let mut events = EventBus::new();
    let mut services = Services {
        director: &mut director,
        core: &mut core,
        ledger: &mut ledger,
        events: &mut events,
    };

    let mut vitals = Vitals::new(10, 5, 1);
    assert!(!combat::receive_damage(AgentId(0), &mut vitals, 2.1, &mut services));
    assert_eq!(vitals.health, 7);
    assert!(combat::receive_damage(AgentId(0), &mut vitals, 7.0, &mut services));
    assert_eq!(vitals.health, 0);
    assert!(!vitals.alive);
}

#[test]
fn test_start_round_wrong_phase() {
    let mut engine = SimulationEngine::new(arena(vec![wave(2, 1.0)])).unwrap();
    engine.start_round().unwrap();
    assert!(matches!(
        engine.start_round(),
        Err(SimError::WrongPhase(SessionPhase::Combat))
    ));
}

#[test]
fn test_waves_complete_victory() {
    let mut engine = SimulationEngine::new(arena(vec![wave(1, 1.0)])).unwrap();
    engine
        .place_defender("turret", Position::new(1.0, 0.0, 0.0), None)
        .unwrap();
    engine.queue_command(PlayerCommand::StartRound);

    let mut events = Vec::new();
    for _ in 0..8 {
        events.extend(engine.tick(0.25).events);
    }
    assert_eq!(engine.phase(), SessionPhase::Victory);
    assert_eq!(engine.director().phase(), DirectorPhase::Complete);
    assert_eq!(count_events(&events, |e| *e == SimEvent::WavesComplete), 1);

    // A finished session ignores further time and commands.
    let time = engine.time().elapsed_secs;
    engine.queue_command(PlayerCommand::StartRound);
    engine.tick(0.25);
    assert_eq!(engine.time().elapsed_secs, time);
    assert_eq!(engine.phase(), SessionPhase::Victory);
}

#[test]
fn test_start_beyond_waves() {
    let mut engine = SimulationEngine::new(arena(Vec::new())).unwrap();
    engine.start_round().unwrap();
    assert_eq!(engine.phase(), SessionPhase::Victory);

    let snap = engine.snapshot();
    assert_eq!(count_events(&snap.events, |e| *e == SimEvent::WavesComplete), 1);
}

#[test]
fn test_escalation_adds_health_per_round() {
    let mut config = arena(vec![wave(1, 1.0), wave(1, 1.0)]);
    config.escalation_step = 4;
    let mut engine = SimulationEngine::new(config).unwrap();
    engine
        .place_defender("turret", Position::new(1.0, 0.0, 0.0), None)
        .unwrap();

    let mut healths = Vec::new();
    for _ in 0..2 {
        engine.start_round().unwrap();
        for _ in 0..4 {
            for event in engine.tick(0.25).events {
                if let SimEvent::AgentSpawned { health, .. } = event {
                    healths.push(health);
                }
            }
        }
    }
    assert_eq!(healths, vec![10, 14]);
}

// ---- Core health ----

#[test]
fn test_core_loss_signalled_once() {
    let mut config = arena(vec![wave(4, 0.0)]);
    config.path = vec![Position::ZERO, Position::new(0.0, 0.0, 1.0)];
    config.agent_templates[0].speed = 10.0;
    config.core_max_health = 2;
    let mut engine = SimulationEngine::new(config).unwrap();
    engine.start_round().unwrap();

    let mut events = Vec::new();
    for _ in 0..20 {
        events.extend(engine.tick(0.25).events);
    }

    assert_eq!(engine.phase(), SessionPhase::Lost);
    assert_eq!(engine.core().current(), 0);
    assert!(engine.core().is_depleted());
    assert_eq!(count_events(&events, |e| *e == SimEvent::SessionLost), 1);
    let arrivals = count_events(&events, |e| matches!(e, SimEvent::AgentReachedCore { .. }));
    assert_eq!(arrivals, 4);
    // Core arrivals pay nothing.
    assert_eq!(engine.gold(), 1000);
}

#[test]
fn test_core_damage_saturates() {
    let mut core = CoreHealth::new(3);
    let first = core.apply_damage(2);
    assert_eq!(first.current, 1);
    assert!(!first.depleted_now);
    let second = core.apply_damage(5);
    assert_eq!(second.current, 0);
    assert!(second.depleted_now);
    let third = core.apply_damage(1);
    assert!(!third.depleted_now);
    core.reset();
    assert_eq!(core.current(), 3);
}

// ---- Fire control ----

#[test]
fn test_fire_interval_respected() {
    let mut config = arena(vec![wave(1, 1.0)]);
    config.agent_templates[0].health = 1000;
    config.defender_templates[0].damage = 1.0;
    config.defender_templates[0].fire_interval = 1.0;
    let mut engine = SimulationEngine::new(config).unwrap();
    engine
        .place_defender("turret", Position::new(3.0, 0.0, 0.0), None)
        .unwrap();
    engine.start_round().unwrap();

    let mut fired_at = Vec::new();
    for tick in 1..=16 {
        let snap = engine.tick(0.25);
        if snap
            .events
            .iter()
            .any(|e| matches!(e, SimEvent::DefenderFired { .. }))
        {
            fired_at.push(tick);
        }
    }
    assert_eq!(fired_at, vec![4, 8, 12, 16]);
    assert_eq!(engine.snapshot().agents[0].health, 996);
}

#[test]
fn test_out_of_range_agent_not_targeted() {
    let mut config = arena(vec![wave(1, 1.0)]);
    config.defender_templates[0].range = 2.0;
    let mut engine = SimulationEngine::new(config).unwrap();
    let id = engine
        .place_defender("turret", Position::new(2.5, 0.0, 0.0), None)
        .unwrap();
    engine.start_round().unwrap();

    for _ in 0..8 {
        let snap = engine.tick(0.25);
        assert!(!snap
            .events
            .iter()
            .any(|e| matches!(e, SimEvent::DefenderFired { .. })));
    }
    assert_eq!(engine.defender(id).unwrap().target, None);
}

#[test]
fn test_nearest_selects_closest() {
    let origin = Position::ZERO;
    let candidates = [candidate(0, 5.0, 10), candidate(1, 2.0, 10), candidate(2, 8.0, 10)];
    let chosen = targeting::selector(TargetStrategyKind::Nearest).select(origin, &candidates);
    assert_eq!(chosen, Some(AgentId(1)));
}

#[test]
fn test_nearest_tie_prefers_earlier_spawn() {
    let origin = Position::ZERO;
    let candidates = [candidate(4, -3.0, 10), candidate(2, 3.0, 10)];
    let chosen = targeting::selector(TargetStrategyKind::Nearest).select(origin, &candidates);
    assert_eq!(chosen, Some(AgentId(2)));
}

#[test]
fn test_weakest_selects_lowest_health() {
    let origin = Position::ZERO;
    let candidates = [candidate(0, 1.0, 30), candidate(1, 6.0, 12), candidate(2, 3.0, 12)];
    let chosen = targeting::selector(TargetStrategyKind::Weakest).select(origin, &candidates);
    assert_eq!(chosen, Some(AgentId(1)));
    assert_eq!(
        targeting::selector(TargetStrategyKind::Weakest).select(origin, &[]),
        None
    );
}

#[test]
fn test_range_boundary_inclusive() {
    let candidates = [candidate(0, 5.0, 10), candidate(1, 5.01, 10)];
    let inside = targeting::in_range(Position::ZERO, 5.0, &candidates);
    assert_eq!(inside.len(), 1);
    assert_eq!(inside[0].id, AgentId(0));
}

#[test]
fn test_set_target_strategy_clears_target() {
    let mut config = arena(vec![wave(1, 1.0)]);
    config.agent_templates[0].health = 1000;
    config.defender_templates[0].damage = 1.0;
    let mut engine = SimulationEngine::new(config).unwrap();
    let id = engine
        .place_defender("turret", Position::new(1.0, 0.0, 0.0), None)
        .unwrap();
    engine.start_round().unwrap();
    engine.tick(0.25);
    assert_eq!(engine.defender(id).unwrap().target, Some(AgentId(0)));

    engine
        .set_target_strategy(id, TargetStrategyKind::Weakest)
        .unwrap();
    let state = engine.defender(id).unwrap();
    assert_eq!(state.strategy, TargetStrategyKind::Weakest);
    assert_eq!(state.target, None);
}

// ---- Economy and placement ----

#[test]
fn test_insufficient_funds_leaves_state_unchanged() {
    let mut config = arena(Vec::new());
    config.starting_gold = 10;
    let mut engine = SimulationEngine::new(config).unwrap();

    let result = engine.place_defender("turret", Position::ZERO, None);
    assert!(matches!(
        result,
        Err(SimError::InsufficientFunds {
            cost: 50,
            balance: 10
        })
    ));
    assert_eq!(engine.gold(), 10);
    assert_eq!(engine.world().query::<&Defender>().iter().count(), 0);
}

#[test]
fn test_element_purchase_needs_funds() {
    let mut config = arena(Vec::new());
    config.starting_gold = 60;
    let mut engine = SimulationEngine::new(config).unwrap();
    let id = engine.place_defender("turret", Position::ZERO, None).unwrap();
    assert_eq!(engine.gold(), 10);

    let result = engine.apply_element(id, ElementType::Fire);
    assert!(matches!(
        result,
        Err(SimError::InsufficientFunds { cost: 60, .. })
    ));
    let state = engine.defender(id).unwrap();
    assert!(state.element.is_none());
    assert_eq!(state.damage, 100.0);
    assert_eq!(engine.gold(), 10);
}

#[test]
fn test_placement_with_staged_element() {
    let mut engine = SimulationEngine::new(arena(Vec::new())).unwrap();
    let mut draft = engine
        .begin_placement("turret", Position::new(1.0, 0.0, 1.0))
        .unwrap();
    draft.stage_element(ElementType::Ice);
    let id = engine.commit_placement(draft).unwrap();

    // 50 for the turret, round(50 × 1.1) for ice.
    assert_eq!(engine.gold(), 1000 - 50 - 55);
    let state = engine.defender(id).unwrap();
    assert_eq!(state.element.as_ref().map(|e| e.element), Some(ElementType::Ice));
    assert_eq!(state.element.as_ref().map(|e| e.level), Some(1));

    let snap = engine.snapshot();
    assert!(snap.events.contains(&SimEvent::DefenderPlaced { defender: id }));
    assert!(snap.events.contains(&SimEvent::ElementApplied {
        defender: id,
        element: ElementType::Ice
    }));
}

#[test]
fn test_placement_cancel_discards_draft() {
    let mut engine = SimulationEngine::new(arena(Vec::new())).unwrap();
    let mut draft = engine.begin_placement("turret", Position::ZERO).unwrap();
    draft.stage_element(ElementType::Fire);
    draft.cancel();

    assert_eq!(engine.gold(), 1000);
    assert_eq!(engine.world().query::<&Defender>().iter().count(), 0);
    assert!(engine.snapshot().events.is_empty());
}

#[test]
fn test_unknown_template_rejected() {
    let engine = SimulationEngine::new(arena(Vec::new())).unwrap();
    assert!(matches!(
        engine.begin_placement("ballista", Position::ZERO),
        Err(SimError::UnknownDefenderTemplate(_))
    ));
}

#[test]
fn test_kill_pays_reward() {
    let mut engine = SimulationEngine::new(arena(vec![wave(1, 1.0), wave(1, 1.0)])).unwrap();
    engine
        .place_defender("turret", Position::new(1.0, 0.0, 0.0), None)
        .unwrap();
    assert_eq!(engine.gold(), 950);
    engine.start_round().unwrap();
    let snap = engine.tick(0.25);
    assert!(snap.events.contains(&SimEvent::AgentKilled {
        agent: AgentId(0),
        reward: 5
    }));
    assert_eq!(engine.gold(), 955);
}

// ---- Elements ----

#[test]
fn test_upgrade_cost_rounding() {
    assert_eq!(elemental::upgrade_cost(ElementType::Fire, 1), 60);
    assert_eq!(elemental::upgrade_cost(ElementType::Ice, 1), 55);
    assert_eq!(elemental::upgrade_cost(ElementType::Lightning, 3), 195);
    assert_eq!(elemental::upgrade_cost(ElementType::Holy, 2), 150);
}

#[test]
fn test_element_tiers_monotonic() {
    let catalog = ElementCatalog::default();
    let mut d = defender(5.0, 10.0, 1.0);
    elemental::apply_element(&mut d, ElementType::Fire, &catalog).unwrap();
    let tier1 = d.damage;
    elemental::apply_upgrade(&mut d, ElementType::Fire, 2, &catalog).unwrap();
    let tier2 = d.damage;
    elemental::apply_upgrade(&mut d, ElementType::Fire, 3, &catalog).unwrap();
    let tier3 = d.damage;

    assert!(10.0 <= tier1 && tier1 <= tier2 && tier2 <= tier3);
    assert!((tier3 - 15.0).abs() < 1e-9);
}

#[test]
fn test_remove_element_restores_baseline() {
    let catalog = ElementCatalog::default();
    let mut d = defender(5.0, 10.0, 1.0);
    let original = elemental::DefenderStats::of(&d);

    elemental::apply_upgrade(&mut d, ElementType::Fire, 2, &catalog).unwrap();
    assert!((d.damage - 13.0).abs() < 1e-9);
    elemental::apply_upgrade(&mut d, ElementType::Fire, 3, &catalog).unwrap();
    assert_eq!(d.element.as_ref().unwrap().baseline(), original);

    assert_eq!(elemental::remove_element(&mut d), Ok(ElementType::Fire));
    assert_eq!(elemental::DefenderStats::of(&d), original);
    assert!(d.element.is_none());
    assert_eq!(elemental::remove_element(&mut d), Err(ElementError::NoElement));
}

#[test]
fn test_lightning_speeds_up_fire_rate() {
    let catalog = ElementCatalog::default();
    let mut d = defender(5.0, 10.0, 1.3);
    elemental::apply_upgrade(&mut d, ElementType::Lightning, 3, &catalog).unwrap();
    assert!((d.fire_interval - 1.0).abs() < 1e-9);
}

#[test]
fn test_conflicting_element_rejected() {
    let catalog = ElementCatalog::default();
    let mut d = defender(5.0, 10.0, 1.0);
    elemental::apply_element(&mut d, ElementType::Ice, &catalog).unwrap();

    assert_eq!(
        elemental::apply_element(&mut d, ElementType::Fire, &catalog),
        Err(ElementError::ConflictingElement {
            held: ElementType::Ice,
            requested: ElementType::Fire
        })
    );
    assert_eq!(
        elemental::apply_element(&mut d, ElementType::Ice, &catalog),
        Err(ElementError::AlreadyApplied(ElementType::Ice))
    );
    assert_eq!(
        elemental::check_upgrade(&d, ElementType::Ice, 1, &catalog),
        Err(ElementError::NotAnUpgrade {
            current: 1,
            requested: 1
        })
    );
    assert_eq!(
        elemental::check_upgrade(&d, ElementType::Ice, 4, &catalog),
        Err(ElementError::MissingTier {
            element: ElementType::Ice,
            level: 4
        })
    );
}

#[test]
fn test_available_upgrades() {
    let catalog = ElementCatalog::default();
    let mut d = defender(5.0, 10.0, 1.0);
    let offers = elemental::available_upgrades(&d, &catalog);
    assert_eq!(offers.len(), ElementType::ALL.len());
    assert!(offers.iter().all(|o| o.level == 1));

    elemental::apply_element(&mut d, ElementType::Poison, &catalog).unwrap();
    let offers = elemental::available_upgrades(&d, &catalog);
    let levels: Vec<u8> = offers.iter().map(|o| o.level).collect();
    assert_eq!(levels, vec![2, 3]);
    assert_eq!(offers[0].cost, 100);
}

#[test]
fn test_engine_upgrade_charges_once() {
    let mut engine = SimulationEngine::new(arena(Vec::new())).unwrap();
    let id = engine.place_defender("turret", Position::ZERO, None).unwrap();
    engine.apply_element(id, ElementType::Fire).unwrap();
    assert_eq!(engine.gold(), 1000 - 50 - 60);

    engine
        .purchase_upgrade(id, ElementType::Fire, 2)
        .unwrap();
    assert_eq!(engine.gold(), 1000 - 50 - 60 - 120);

    let rejected = engine.purchase_upgrade(id, ElementType::Fire, 2);
    assert!(matches!(
        rejected,
        Err(SimError::Element(ElementError::NotAnUpgrade { .. }))
    ));
    assert_eq!(engine.gold(), 1000 - 50 - 60 - 120);

    assert_eq!(engine.remove_element(id).unwrap(), ElementType::Fire);
    assert_eq!(engine.defender(id).unwrap().damage, 100.0);
}

#[test]
fn test_chain_hits_nearest_with_falloff() {
    let state = elemental_state(ElementType::Lightning, 1);
    let primary = candidate(0, 0.0, 50);
    let others = [
        primary,
        candidate(1, 1.0, 50),
        candidate(2, 3.0, 50),
        candidate(3, 7.0, 50),
    ];
    let hits = elemental::secondary_hits(&state, &primary, &others, 10.0);
    assert_eq!(hits.len(), 1);
    assert_eq!(hits[0].0, AgentId(1));
    assert!((hits[0].1 - 8.0).abs() < 1e-9);
}

#[test]
fn test_chain_falloff_compounds() {
    let state = elemental_state(ElementType::Lightning, 2);
    let primary = candidate(0, 0.0, 50);
    let others = [candidate(1, 1.0, 50), candidate(2, 2.0, 50), candidate(3, 6.0, 50)];
    let hits = elemental::secondary_hits(&state, &primary, &others, 10.0);
    // Tier 2 potency 0.7; the agent 6 units away is outside the jump range.
    assert_eq!(hits.len(), 2);
    assert!((hits[0].1 - 7.0).abs() < 1e-9);
    assert!((hits[1].1 - 4.9).abs() < 1e-9);
}

#[test]
fn test_area_damage_falls_off() {
    let state = elemental_state(ElementType::Fire, 3);
    let primary = candidate(0, 0.0, 50);
    let others = [primary, candidate(1, 1.0, 50), candidate(2, 3.0, 50)];
    let hits = elemental::secondary_hits(&state, &primary, &others, 9.0);
    assert_eq!(hits.len(), 1);
    assert_eq!(hits[0].0, AgentId(1));
    assert!((hits[0].1 - 6.0).abs() < 1e-9);
}

#[test]
fn test_burning_hit_in_engine() {
    let mut config = arena(vec![wave(1, 1.0)]);
    config.agent_templates[0].health = 1000;
    config.defender_templates[0].damage = 1.0;
    let mut engine = SimulationEngine::new(config).unwrap();
    engine
        .place_defender("turret", Position::new(1.0, 0.0, 0.0), Some(ElementType::Fire))
        .unwrap();
    engine.start_round().unwrap();

    let snap = engine.tick(0.25);
    assert_eq!(snap.agents.len(), 1);
    assert!(snap.agents[0].burning);
    // ceil(1 × 1.15) = 2
    assert_eq!(snap.agents[0].health, 998);
}

// ---- Effects ----

#[test]
fn test_burn_ticks_each_second() {
    let mut effects = ActiveEffects::default();
    effects.apply_burn(5.0, 3.0, 0.0);
    assert_eq!(effects.take_burn_ticks(0.5), 0);
    assert_eq!(effects.take_burn_ticks(1.0), 1);
    assert_eq!(effects.take_burn_ticks(3.0), 2);
    assert_eq!(effects.take_burn_ticks(10.0), 0);
    effects.expire(3.0);
    assert!(effects.burn.is_none());
}

#[test]
fn test_burn_reapply_restarts_and_keeps_stronger() {
    let mut effects = ActiveEffects::default();
    effects.apply_burn(10.0, 3.0, 0.0);
    effects.apply_burn(5.0, 3.0, 2.0);
    let burn = effects.burn.unwrap();
    assert_eq!(burn.potency, 10.0);
    assert_eq!(burn.ends_at(), 5.0);
}

#[test]
fn test_slow_scales_speed_until_expiry() {
    let mut effects = ActiveEffects::default();
    effects.apply_slow(0.3, 2.0, 0.0);
    assert!((effects.speed_factor(1.0) - 0.7).abs() < 1e-9);
    assert_eq!(effects.speed_factor(2.0), 1.0);
    effects.expire(2.0);
    assert!(effects.slow.is_none());
}

#[test]
fn test_slow_reapply_restarts_window() {
    let mut effects = ActiveEffects::default();
    effects.apply_slow(0.3, 2.0, 0.0);
    effects.apply_slow(0.3, 2.0, 1.0);
    let slow = effects.slow.unwrap();
    assert!((slow.factor - 0.7).abs() < 1e-9);
    assert_eq!(slow.ends_at(), 3.0);
    assert!((effects.speed_factor(2.5) - 0.7).abs() < 1e-9);
    assert_eq!(effects.speed_factor(3.0), 1.0);
    effects.expire(3.0);
    assert!(effects.slow.is_none());
}

#[test]
fn test_each_burn_tick_is_a_separate_hit() {
    let config = arena(Vec::new());
    let mut director = WaveDirector::new(&config);
    let mut core = CoreHealth::new(20);
    let mut ledger = Treasury::new(0);
    let mut events = EventBus::new();

    let mut world = World::new();
    let agent = world_setup::spawn_agent(
        &mut world,
        AgentSpawn {
            id: AgentId(0),
            position: Position::ZERO,
            speed: 0.0,
            stats: AgentStats {
                health: 100,
                reward_gold: 1,
                core_damage: 1,
            },
            planned: BehaviorKind::Steady,
        },
    );
    world
        .get::<&mut ActiveEffects>(agent)
        .unwrap()
        .apply_burn(2.5, 5.0, 0.0);

    let mut services = Services {
        director: &mut director,
        core: &mut core,
        ledger: &mut ledger,
        events: &mut events,
    };
    systems::effects::run(&mut world, &mut services, 3.0);

    // Three ticks of ceil(2.5), not ceil(7.5).
    assert_eq!(world.get::<&Vitals>(agent).unwrap().health, 91);
}

#[test]
fn test_stunned_agent_holds_position() {
    let config = arena(Vec::new());
    let mut director = WaveDirector::new(&config);
    let mut core = CoreHealth::new(20);
    let mut ledger = Treasury::new(0);
    let mut events = EventBus::new();
    let mut rng = ChaCha8Rng::seed_from_u64(1);
    let path = Waypoints(vec![Position::ZERO, Position::new(0.0, 0.0, 100.0)]);

    let mut world = World::new();
    let stats = AgentStats {
        health: 10,
        reward_gold: 1,
        core_damage: 1,
    };
    let stunned = world_setup::spawn_agent(
        &mut world,
        AgentSpawn {
            id: AgentId(0),
            position: Position::ZERO,
            speed: 4.0,
            stats,
            planned: BehaviorKind::Steady,
        },
    );
    let free = world_setup::spawn_agent(
        &mut world,
        AgentSpawn {
            id: AgentId(1),
            position: Position::ZERO,
            speed: 4.0,
            stats,
            planned: BehaviorKind::Steady,
        },
    );
    world
        .get::<&mut ActiveEffects>(stunned)
        .unwrap()
        .apply_stun(1.0, 0.0);

    let mut services = Services {
        director: &mut director,
        core: &mut core,
        ledger: &mut ledger,
        events: &mut events,
    };
    for step in 0..4 {
        systems::movement::run(&mut world, &path, &mut services, &mut rng, step as f64 * 0.25, 0.25);
    }

    let held = *world.get::<&Position>(stunned).unwrap();
    let moved = *world.get::<&Position>(free).unwrap();
    assert_eq!(held, Position::ZERO);
    assert!(moved.z > 0.0);
}

#[test]
fn test_stun_freezes_juggernaut_windup() {
    let config = arena(Vec::new());
    let mut director = WaveDirector::new(&config);
    let mut core = CoreHealth::new(20);
    let mut ledger = Treasury::new(0);
    let mut events = EventBus::new();
    let mut rng = ChaCha8Rng::seed_from_u64(1);
    let path = Waypoints(vec![Position::ZERO, Position::new(0.0, 0.0, 4.0)]);

    let mut world = World::new();
    let agent = world_setup::spawn_agent(
        &mut world,
        AgentSpawn {
            id: AgentId(0),
            position: Position::ZERO,
            speed: 4.0,
            stats: AgentStats {
                health: 10,
                reward_gold: 1,
                core_damage: 1,
            },
            planned: BehaviorKind::Juggernaut,
        },
    );
    world.get::<&mut Mover>(agent).unwrap().behavior =
        Some(MovementBehavior::new(BehaviorKind::Juggernaut));

    let mut services = Services {
        director: &mut director,
        core: &mut core,
        ledger: &mut ledger,
        events: &mut events,
    };
    for now in [0.0, 0.25] {
        systems::movement::run(&mut world, &path, &mut services, &mut rng, now, 0.25);
    }

    let phase_of = |mover: &Mover| match mover.behavior {
        Some(MovementBehavior::Juggernaut(state)) => state.phase,
        other => panic!("expected a juggernaut, got {other:?}"),
    };
    let mover_before = (*world.get::<&Mover>(agent).unwrap()).clone();
    let position_before = *world.get::<&Position>(agent).unwrap();
    let ChargePhase::WindUp { elapsed } = phase_of(&mover_before) else {
        panic!("juggernaut should be winding up");
    };

    world
        .get::<&mut ActiveEffects>(agent)
        .unwrap()
        .apply_stun(1.0, 0.5);
    for now in [0.5, 0.75, 1.0, 1.25] {
        systems::movement::run(&mut world, &path, &mut services, &mut rng, now, 0.25);
    }
    assert_eq!(*world.get::<&Mover>(agent).unwrap(), mover_before);
    assert_eq!(*world.get::<&Position>(agent).unwrap(), position_before);

    systems::movement::run(&mut world, &path, &mut services, &mut rng, 1.5, 0.25);
    let mover_after = world.get::<&Mover>(agent).unwrap().clone();
    assert_eq!(
        phase_of(&mover_after),
        ChargePhase::WindUp {
            elapsed: elapsed + 0.25
        }
    );
    assert!(world.get::<&Position>(agent).unwrap().z > position_before.z);
}

#[test]
fn test_stun_from_hit_holds_agent_for_full_duration() {
    let strides = strides_after_hit(status_element(ElementalEffect::Stun, 0.0), 6);
    // One second at 0.25 s per tick, then 4 units/s again.
    for stride in &strides[..4] {
        assert!(stride.abs() < 1e-9, "strides {strides:?}");
    }
    for stride in &strides[4..] {
        assert!((stride - 1.0).abs() < 1e-9, "strides {strides:?}");
    }
}

#[test]
fn test_slow_from_hit_lasts_full_duration() {
    let strides = strides_after_hit(status_element(ElementalEffect::Slow, 0.5), 6);
    for stride in &strides[..4] {
        assert!((stride - 0.5).abs() < 1e-9, "strides {strides:?}");
    }
    for stride in &strides[4..] {
        assert!((stride - 1.0).abs() < 1e-9, "strides {strides:?}");
    }
}

// ---- Event bus ----

#[test]
fn test_subscribers_run_in_registration_order() {
    let log = Rc::new(RefCell::new(Vec::new()));
    let mut bus = EventBus::new();
    for tag in ["first", "second"] {
        let log = Rc::clone(&log);
        bus.subscribe(move |event| {
            if let SimEvent::GoldChanged { gold } = event {
                log.borrow_mut().push((tag, *gold));
            }
        });
    }

    bus.emit(SimEvent::GoldChanged { gold: 7 });
    assert_eq!(*log.borrow(), vec![("first", 7), ("second", 7)]);
    assert_eq!(bus.drain(), vec![SimEvent::GoldChanged { gold: 7 }]);
    assert!(bus.drain().is_empty());
}

#[test]
fn test_engine_subscriber_sees_tick_events() {
    let seen = Rc::new(RefCell::new(0usize));
    let mut engine = SimulationEngine::new(arena(vec![wave(2, 1.0)])).unwrap();
    {
        let seen = Rc::clone(&seen);
        engine.subscribe(move |event| {
            if matches!(event, SimEvent::AgentSpawned { .. }) {
                *seen.borrow_mut() += 1;
            }
        });
    }
    engine.start_round().unwrap();
    for _ in 0..8 {
        engine.tick(0.25);
    }
    assert_eq!(*seen.borrow(), 2);
}

// ---- Session ----

#[test]
fn test_reset_session() {
    let mut engine = SimulationEngine::new(arena(vec![wave(3, 1.0), wave(1, 1.0)])).unwrap();
    engine
        .place_defender("turret", Position::new(30.0, 0.0, 0.0), None)
        .unwrap();
    engine.start_round().unwrap();
    for _ in 0..6 {
        engine.tick(0.25);
    }
    assert!(engine.director().alive() > 0);

    engine.queue_command(PlayerCommand::ResetSession);
    let snap = engine.tick(0.25);

    assert_eq!(snap.phase, SessionPhase::Preparation);
    assert_eq!(snap.gold, 1000);
    assert_eq!(snap.core.current, snap.core.max);
    assert!(snap.agents.is_empty());
    assert!(snap.defenders.is_empty());
    assert_eq!(snap.director.round, 0);
    assert_eq!(snap.director.alive, 0);
    assert_eq!(engine.time().tick, 0);
}

#[test]
fn test_rejected_command_is_skipped() {
    let mut engine = SimulationEngine::new(arena(vec![wave(1, 1.0)])).unwrap();
    engine.queue_commands([
        PlayerCommand::RemoveElement {
            defender: DefenderId(9),
        },
        PlayerCommand::StartRound,
    ]);
    engine.tick(0.25);
    assert_eq!(engine.phase(), SessionPhase::Combat);
}

#[test]
fn test_invalid_config_rejected() {
    let mut config = arena(Vec::new());
    config.spawn_points.clear();
    assert!(SimulationEngine::new(config).is_err());
}
