//! Wave director: spawns each round's agents on a timer, owns the
//! authoritative alive counter and advances the round index.
//!
//! `Idle → Spawning → AwaitingClear → Idle`, with `Complete` once every
//! configured wave has been cleared.

use std::collections::HashSet;

use hecs::{Entity, World};
use log::{debug, info, warn};
use rand::Rng;

use rampart_behavior::assignment;
use rampart_behavior::movement::MovementBehavior;
use rampart_behavior::profiles::{get_profile, AgentStats};
use rampart_core::config::{AgentTemplate, GameConfig, WaveConfig};
use rampart_core::constants::TIMER_EPSILON;
use rampart_core::enums::{BehaviorKind, DirectorPhase};
use rampart_core::events::SimEvent;
use rampart_core::state::DirectorView;
use rampart_core::types::{AgentId, Position};

use crate::components::Mover;
use crate::event_bus::EventBus;
use crate::world_setup::{self, AgentSpawn};

/// Live agent count. Each agent can add at most one and remove at most one.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AliveCounter {
    live: HashSet<AgentId>,
}

impl AliveCounter {
    /// Returns false if the agent was already counted.
    pub fn on_spawn(&mut self, id: AgentId) -> bool {
        self.live.insert(id)
    }

    /// Returns false if the agent was never counted or already removed.
    pub fn on_death(&mut self, id: AgentId) -> bool {
        self.live.remove(&id)
    }

    pub fn count(&self) -> u32 {
        self.live.len() as u32
    }

    pub fn clear(&mut self) {
        self.live.clear();
    }
}

/// Result of a start-round request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RoundStart {
    Started { round: u32 },
    /// No wave is left to run.
    Complete,
    /// A round is already in progress.
    Busy,
}

/// Spawning progress of the current round.
#[derive(Debug, Clone)]
struct Batch {
    wave: WaveConfig,
    /// Template with this round's escalation applied.
    template: AgentTemplate,
    plan: Vec<BehaviorKind>,
    spawned: u32,
    spawn_timer: f64,
    entities: Vec<Entity>,
}

#[derive(Debug, Clone)]
pub struct WaveDirector {
    waves: Vec<WaveConfig>,
    templates: Vec<AgentTemplate>,
    spawn_points: Vec<Position>,
    escalation_step: u32,
    phase: DirectorPhase,
    round: u32,
    counter: AliveCounter,
    batch: Option<Batch>,
    completion_signalled: bool,
}

impl WaveDirector {
    pub fn new(config: &GameConfig) -> Self {
        Self {
            waves: config.waves.clone(),
            templates: config.agent_templates.clone(),
            spawn_points: config.spawn_points.clone(),
            escalation_step: config.escalation_step,
            phase: DirectorPhase::Idle,
            round: 0,
            counter: AliveCounter::default(),
            batch: None,
            completion_signalled: false,
        }
    }

    pub fn phase(&self) -> DirectorPhase {
        self.phase
    }

    /// Index of the current (or next) round.
    pub fn round(&self) -> u32 {
        self.round
    }

    pub fn total_rounds(&self) -> u32 {
        self.waves.len() as u32
    }

    pub fn alive(&self) -> u32 {
        self.counter.count()
    }

    pub fn remaining_to_spawn(&self) -> u32 {
        self.batch
            .as_ref()
            .map_or(0, |b| b.wave.count.saturating_sub(b.spawned))
    }

    pub fn view(&self) -> DirectorView {
        DirectorView {
            phase: self.phase,
            round: self.round,
            total_rounds: self.total_rounds(),
            remaining_to_spawn: self.remaining_to_spawn(),
            alive: self.alive(),
        }
    }

    /// Begin the next round. Past the last wave this only signals completion.
    pub fn start_round<R: Rng + ?Sized>(&mut self, rng: &mut R, events: &mut EventBus) -> RoundStart {
        match self.phase {
            DirectorPhase::Idle => {}
            DirectorPhase::Complete => return RoundStart::Complete,
            DirectorPhase::Spawning | DirectorPhase::AwaitingClear => return RoundStart::Busy,
        }

        let Some(wave) = self.waves.get(self.round as usize).cloned() else {
            self.complete(events);
            return RoundStart::Complete;
        };
        let Some(base) = self
            .templates
            .iter()
            .find(|t| t.id == wave.agent_template_id)
        else {
            warn!(
                "round {} references unknown template {:?}",
                self.round, wave.agent_template_id
            );
            self.complete(events);
            return RoundStart::Complete;
        };

        let mut template = base.clone();
        template.health = template
            .health
            .saturating_add(self.round.saturating_mul(self.escalation_step));

        let plan = assignment::plan(wave.count, wave.behavior_weights(), rng);
        info!(
            "round {} started: {} x {:?} every {}s",
            self.round, wave.count, template.id, wave.interval
        );

        self.batch = Some(Batch {
            wave,
            template,
            plan,
            spawned: 0,
            spawn_timer: 0.0,
            entities: Vec::new(),
        });
        self.phase = DirectorPhase::Spawning;
        RoundStart::Started { round: self.round }
    }

    /// Spawn whatever is due this tick. The first agent of a round spawns on
    /// the first tick after the start signal.
    pub fn tick<R: Rng + ?Sized>(
        &mut self,
        world: &mut World,
        rng: &mut R,
        next_agent_id: &mut u32,
        dt: f64,
        events: &mut EventBus,
    ) {
        if self.phase != DirectorPhase::Spawning {
            return;
        }
        let Some(batch) = self.batch.as_mut() else {
            return;
        };

        if batch.spawned > 0 {
            batch.spawn_timer += dt;
        }

        while batch.spawned < batch.wave.count {
            if batch.spawned > 0 {
                if batch.spawn_timer + TIMER_EPSILON < batch.wave.interval {
                    break;
                }
                batch.spawn_timer -= batch.wave.interval;
            }

            let planned = batch
                .plan
                .get(batch.spawned as usize)
                .copied()
                .unwrap_or_default();
            let stats = get_profile(planned).apply(AgentStats {
                health: batch.template.health,
                reward_gold: batch.template.reward_gold,
                core_damage: batch.template.core_damage,
            });
            let position = if self.spawn_points.is_empty() {
                Position::ZERO
            } else {
                self.spawn_points[rng.gen_range(0..self.spawn_points.len())]
            };

            let id = AgentId(*next_agent_id);
            *next_agent_id += 1;
            let entity = world_setup::spawn_agent(
                world,
                AgentSpawn {
                    id,
                    position,
                    speed: batch.template.speed,
                    stats,
                    planned,
                },
            );
            batch.entities.push(entity);
            batch.spawned += 1;
            self.counter.on_spawn(id);

            events.emit(SimEvent::AgentSpawned {
                agent: id,
                health: stats.health,
                planned_behavior: planned,
            });
            events.emit(SimEvent::RemainingToSpawn {
                remaining: batch.wave.count - batch.spawned,
            });
            events.emit(SimEvent::AliveCount {
                alive: self.counter.count(),
            });
        }

        if batch.spawned < batch.wave.count {
            return;
        }

        for (entity, kind) in batch.entities.iter().zip(batch.plan.iter()) {
            if let Ok(mut mover) = world.get::<&mut Mover>(*entity) {
                mover.behavior = Some(MovementBehavior::new(*kind));
            }
        }
        let counts = assignment::tally(&batch.plan);
        debug!("round {} batch complete, behaviors {:?}", self.round, counts);
        events.emit(SimEvent::BehaviorsAssigned { counts });

        self.phase = DirectorPhase::AwaitingClear;
        if self.counter.count() == 0 {
            self.finish_round(events);
        }
    }

    /// Count a spawned agent. Idempotent per agent.
    pub fn on_spawn(&mut self, id: AgentId) -> bool {
        self.counter.on_spawn(id)
    }

    /// Count a death or core arrival. Idempotent per agent; the last death of
    /// a fully spawned round clears it.
    pub fn on_agent_death(&mut self, id: AgentId, events: &mut EventBus) -> bool {
        if !self.counter.on_death(id) {
            return false;
        }
        if self.phase == DirectorPhase::AwaitingClear && self.counter.count() == 0 {
            self.finish_round(events);
        } else {
            events.emit(SimEvent::AliveCount {
                alive: self.counter.count(),
            });
        }
        true
    }

    /// Back to round zero with nothing alive.
    pub fn reset(&mut self) {
        self.phase = DirectorPhase::Idle;
        self.round = 0;
        self.counter.clear();
        self.batch = None;
        self.completion_signalled = false;
    }

    fn finish_round(&mut self, events: &mut EventBus) {
        self.batch = None;
        self.phase = DirectorPhase::Idle;
        self.round += 1;
        info!("round {} cleared", self.round - 1);
        events.emit(SimEvent::AliveCount { alive: 0 });
        events.emit(SimEvent::RoundChanged { round: self.round });

        if self.round as usize >= self.waves.len() {
            self.complete(events);
        }
    }

    fn complete(&mut self, events: &mut EventBus) {
        self.phase = DirectorPhase::Complete;
        if !self.completion_signalled {
            self.completion_signalled = true;
            info!("all {} waves complete", self.waves.len());
            events.emit(SimEvent::WavesComplete);
        }
    }
}
