//! Simulation engine: the core of the game.
//!
//! `SimulationEngine` owns the hecs ECS world and every service object (wave
//! director, core health, economy ledger, event bus), processes player
//! commands, runs all systems, and produces `SimSnapshot`s. Completely
//! headless, enabling deterministic testing.

use std::collections::{BTreeMap, VecDeque};

use hecs::{Entity, World};
use log::{info, warn};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use rampart_behavior::path::Waypoints;
use rampart_core::commands::PlayerCommand;
use rampart_core::config::GameConfig;
use rampart_core::enums::{DirectorPhase, ElementType, SessionPhase, TargetStrategyKind};
use rampart_core::error::{ConfigError, SimError};
use rampart_core::events::SimEvent;
use rampart_core::state::SimSnapshot;
use rampart_core::types::{DefenderId, Position, SimTime};

use crate::combat::Services;
use crate::components::Defender;
use crate::core_health::CoreHealth;
use crate::director::{RoundStart, WaveDirector};
use crate::economy::{EconomyLedger, Treasury};
use crate::elemental::{self, ElementCatalog, UpgradeOffer};
use crate::event_bus::EventBus;
use crate::placement::PlacementDraft;
use crate::systems;
use crate::world_setup;

/// The simulation engine. Owns the ECS world and all sim state.
pub struct SimulationEngine {
    config: GameConfig,
    world: World,
    time: SimTime,
    phase: SessionPhase,
    rng: ChaCha8Rng,
    path: Waypoints,
    catalog: ElementCatalog,
    director: WaveDirector,
    core: CoreHealth,
    ledger: Box<dyn EconomyLedger>,
    events: EventBus,
    defenders: BTreeMap<DefenderId, Entity>,
    next_agent_id: u32,
    next_defender_id: u32,
    command_queue: VecDeque<PlayerCommand>,
    despawn_buffer: Vec<Entity>,
}

impl SimulationEngine {
    /// Validate the config and build a fresh session.
    pub fn new(config: GameConfig) -> Result<Self, ConfigError> {
        let ledger = Box::new(Treasury::new(config.starting_gold));
        Self::with_ledger(config, ledger)
    }

    /// Like [`SimulationEngine::new`] with a caller-supplied economy.
    pub fn with_ledger(
        config: GameConfig,
        mut ledger: Box<dyn EconomyLedger>,
    ) -> Result<Self, ConfigError> {
        config.validate()?;

        let catalog = if config.elements.is_empty() {
            ElementCatalog::default()
        } else {
            ElementCatalog::new(config.elements.clone())
        };
        ledger.reset(config.starting_gold);
        info!(
            "session ready: {} waves, {} waypoints, seed {}",
            config.waves.len(),
            config.path.len(),
            config.seed
        );

        Ok(Self {
            world: World::new(),
            time: SimTime::default(),
            phase: SessionPhase::Preparation,
            rng: ChaCha8Rng::seed_from_u64(config.seed),
            path: Waypoints(config.path.clone()),
            catalog,
            director: WaveDirector::new(&config),
            core: CoreHealth::new(config.core_max_health),
            ledger,
            events: EventBus::new(),
            defenders: BTreeMap::new(),
            next_agent_id: 0,
            next_defender_id: 0,
            command_queue: VecDeque::new(),
            despawn_buffer: Vec::new(),
            config,
        })
    }

    /// Register an observer. Observers run synchronously in registration order.
    pub fn subscribe(
        &mut self,
        subscriber: impl FnMut(&SimEvent) + 'static,
    ) -> usize {
        self.events.subscribe(subscriber)
    }

    /// Queue a player command for processing at the next tick boundary.
    pub fn queue_command(&mut self, command: PlayerCommand) {
        self.command_queue.push_back(command);
    }

    /// Queue multiple commands.
    pub fn queue_commands(&mut self, commands: impl IntoIterator<Item = PlayerCommand>) {
        self.command_queue.extend(commands);
    }

    /// Advance by the configured time step.
    pub fn step(&mut self) -> SimSnapshot {
        self.tick(self.config.dt)
    }

    /// Advance the simulation by `dt` seconds and return the resulting snapshot.
    pub fn tick(&mut self, dt: f64) -> SimSnapshot {
        self.process_commands();

        if self.phase == SessionPhase::Combat {
            self.run_systems(dt);
            self.time.advance(dt);
            self.update_phase();
        }

        self.snapshot()
    }

    /// Snapshot of the current state, carrying every event emitted since the
    /// previous snapshot.
    pub fn snapshot(&mut self) -> SimSnapshot {
        let events = self.events.drain();
        systems::snapshot::build_snapshot(
            &self.world,
            &self.time,
            self.phase,
            &self.director,
            &self.core,
            self.ledger.balance(),
            events,
        )
    }

    pub fn phase(&self) -> SessionPhase {
        self.phase
    }

    pub fn time(&self) -> SimTime {
        self.time
    }

    pub fn gold(&self) -> u32 {
        self.ledger.balance()
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn catalog(&self) -> &ElementCatalog {
        &self.catalog
    }

    pub fn director(&self) -> &WaveDirector {
        &self.director
    }

    pub fn core(&self) -> &CoreHealth {
        &self.core
    }

    /// Get a read-only reference to the ECS world.
    pub fn world(&self) -> &World {
        &self.world
    }

    /// Copy of a defender's current state.
    pub fn defender(&self, id: DefenderId) -> Option<Defender> {
        let entity = *self.defenders.get(&id)?;
        self.world.get::<&Defender>(entity).ok().map(|d| (*d).clone())
    }

    /// Leave preparation and start the next wave. Past the last wave the
    /// session is won instead.
    pub fn start_round(&mut self) -> Result<(), SimError> {
        if self.phase != SessionPhase::Preparation {
            return Err(SimError::WrongPhase(self.phase));
        }
        match self.director.start_round(&mut self.rng, &mut self.events) {
            RoundStart::Started { .. } => {
                self.phase = SessionPhase::Combat;
                Ok(())
            }
            RoundStart::Complete => {
                self.phase = SessionPhase::Victory;
                Ok(())
            }
            RoundStart::Busy => Err(SimError::WrongPhase(self.phase)),
        }
    }

    /// Open a placement draft for a known template.
    pub fn begin_placement(
        &self,
        template_id: &str,
        position: Position,
    ) -> Result<PlacementDraft, SimError> {
        self.ensure_running()?;
        if self.config.defender_template(template_id).is_none() {
            return Err(SimError::UnknownDefenderTemplate(template_id.to_string()));
        }
        Ok(PlacementDraft::new(template_id, position))
    }

    /// Charge the draft's full cost in one spend, then build it.
    pub fn commit_placement(&mut self, draft: PlacementDraft) -> Result<DefenderId, SimError> {
        self.ensure_running()?;
        let template = self
            .config
            .defender_template(draft.template_id())
            .ok_or_else(|| SimError::UnknownDefenderTemplate(draft.template_id().to_string()))?
            .clone();
        let cost = draft.total_cost(&template, &self.catalog)?;
        self.charge(cost)?;

        let id = DefenderId(self.next_defender_id);
        self.next_defender_id += 1;
        let entity = world_setup::spawn_defender(&mut self.world, id, &template, draft.position());
        self.defenders.insert(id, entity);
        info!("defender {:?} ({}) placed for {}", id, template.id, cost);
        self.events.emit(SimEvent::DefenderPlaced { defender: id });

        if let Some(element) = draft.staged_element() {
            let mut defender = self
                .world
                .get::<&mut Defender>(entity)
                .map_err(|_| SimError::UnknownDefender(id))?;
            elemental::apply_element(&mut defender, element, &self.catalog)?;
            drop(defender);
            self.events.emit(SimEvent::ElementApplied {
                defender: id,
                element,
            });
        }
        self.emit_gold();
        Ok(id)
    }

    /// Build a defender in one step, optionally with an element.
    pub fn place_defender(
        &mut self,
        template_id: &str,
        position: Position,
        element: Option<ElementType>,
    ) -> Result<DefenderId, SimError> {
        let mut draft = self.begin_placement(template_id, position)?;
        if let Some(element) = element {
            draft.stage_element(element);
        }
        self.commit_placement(draft)
    }

    /// Buy tier 1 of `element` for a defender with no element.
    pub fn apply_element(
        &mut self,
        defender: DefenderId,
        element: ElementType,
    ) -> Result<(), SimError> {
        self.ensure_running()?;
        let entity = self.defender_entity(defender)?;
        let mut state = self
            .world
            .get::<&mut Defender>(entity)
            .map_err(|_| SimError::UnknownDefender(defender))?;

        let cost = elemental::check_element(&state, element, &self.catalog)?;
        if !self.ledger.spend(cost) {
            return Err(SimError::InsufficientFunds {
                cost,
                balance: self.ledger.balance(),
            });
        }
        elemental::apply_element(&mut state, element, &self.catalog)?;
        drop(state);

        self.events
            .emit(SimEvent::ElementApplied { defender, element });
        self.emit_gold();
        Ok(())
    }

    /// Validate, charge, then raise the defender's element to `level`.
    pub fn purchase_upgrade(
        &mut self,
        defender: DefenderId,
        element: ElementType,
        level: u8,
    ) -> Result<(), SimError> {
        self.ensure_running()?;
        let entity = self.defender_entity(defender)?;
        let mut state = self
            .world
            .get::<&mut Defender>(entity)
            .map_err(|_| SimError::UnknownDefender(defender))?;

        let cost = elemental::check_upgrade(&state, element, level, &self.catalog)?;
        if !self.ledger.spend(cost) {
            return Err(SimError::InsufficientFunds {
                cost,
                balance: self.ledger.balance(),
            });
        }
        elemental::apply_upgrade(&mut state, element, level, &self.catalog)?;
        drop(state);

        self.events.emit(SimEvent::UpgradeApplied {
            defender,
            element,
            level,
        });
        self.emit_gold();
        Ok(())
    }

    /// Strip a defender's element and restore its base stats.
    pub fn remove_element(&mut self, defender: DefenderId) -> Result<ElementType, SimError> {
        self.ensure_running()?;
        let entity = self.defender_entity(defender)?;
        let mut state = self
            .world
            .get::<&mut Defender>(entity)
            .map_err(|_| SimError::UnknownDefender(defender))?;
        let element = elemental::remove_element(&mut state)?;
        drop(state);

        self.events.emit(SimEvent::ElementRemoved { defender });
        Ok(element)
    }

    /// Tiers the defender could buy next.
    pub fn available_upgrades(&self, defender: DefenderId) -> Result<Vec<UpgradeOffer>, SimError> {
        let entity = self.defender_entity(defender)?;
        let state = self
            .world
            .get::<&Defender>(entity)
            .map_err(|_| SimError::UnknownDefender(defender))?;
        Ok(elemental::available_upgrades(&state, &self.catalog))
    }

    /// Switch targeting strategy. The held target is dropped.
    pub fn set_target_strategy(
        &mut self,
        defender: DefenderId,
        strategy: TargetStrategyKind,
    ) -> Result<(), SimError> {
        let entity = self.defender_entity(defender)?;
        let mut state = self
            .world
            .get::<&mut Defender>(entity)
            .map_err(|_| SimError::UnknownDefender(defender))?;
        state.strategy = strategy;
        state.target = None;
        Ok(())
    }

    /// Restore core health, gold, the world and the wave director.
    pub fn reset_session(&mut self) {
        self.world.clear();
        self.defenders.clear();
        self.command_queue.clear();
        self.despawn_buffer.clear();
        self.events.clear();
        self.director.reset();
        self.core.reset();
        self.ledger.reset(self.config.starting_gold);
        self.rng = ChaCha8Rng::seed_from_u64(self.config.seed);
        self.time = SimTime::default();
        self.phase = SessionPhase::Preparation;
        self.next_agent_id = 0;
        self.next_defender_id = 0;
        info!("session reset");
        self.emit_gold();
    }

    /// Process all queued commands.
    fn process_commands(&mut self) {
        while let Some(command) = self.command_queue.pop_front() {
            if let Err(err) = self.handle_command(&command) {
                warn!("command {:?} rejected: {}", command, err);
            }
        }
    }

    /// Handle a single player command.
    fn handle_command(&mut self, command: &PlayerCommand) -> Result<(), SimError> {
        match command {
            PlayerCommand::StartRound => self.start_round(),
            PlayerCommand::PlaceDefender {
                template_id,
                position,
                element,
            } => self
                .place_defender(template_id, *position, *element)
                .map(|_| ()),
            PlayerCommand::ApplyElement { defender, element } => {
                self.apply_element(*defender, *element)
            }
            PlayerCommand::PurchaseUpgrade {
                defender,
                element,
                level,
            } => self.purchase_upgrade(*defender, *element, *level),
            PlayerCommand::RemoveElement { defender } => {
                self.remove_element(*defender).map(|_| ())
            }
            PlayerCommand::SetTargetStrategy { defender, strategy } => {
                self.set_target_strategy(*defender, *strategy)
            }
            PlayerCommand::ResetSession => {
                self.reset_session();
                Ok(())
            }
        }
    }

    /// Run all systems in order.
    fn run_systems(&mut self, dt: f64) {
        let now = self.time.elapsed_secs;

        // 1. Wave director
        self.director.tick(
            &mut self.world,
            &mut self.rng,
            &mut self.next_agent_id,
            dt,
            &mut self.events,
        );

        let mut services = Services {
            director: &mut self.director,
            core: &mut self.core,
            ledger: self.ledger.as_mut(),
            events: &mut self.events,
        };
        // 2. Agent movement
        systems::movement::run(
            &mut self.world,
            &self.path,
            &mut services,
            &mut self.rng,
            now,
            dt,
        );
        // 3. Defender fire control
        systems::fire_control::run(&mut self.world, &mut services, &mut self.rng, now, dt);
        // 4. Timed effects
        systems::effects::run(&mut self.world, &mut services, now + dt);
        // 5. Cleanup
        systems::cleanup::run(&mut self.world, &mut self.despawn_buffer);
    }

    /// Move between session phases after a combat tick.
    fn update_phase(&mut self) {
        if self.core.is_depleted() {
            self.phase = SessionPhase::Lost;
            info!("session lost in round {}", self.director.round());
        } else if self.director.phase() == DirectorPhase::Complete {
            self.phase = SessionPhase::Victory;
            info!("session won");
        } else if self.director.phase() == DirectorPhase::Idle {
            self.phase = SessionPhase::Preparation;
            self.events.emit(SimEvent::PreparationStarted {
                round: self.director.round(),
            });
        }
    }

    fn ensure_running(&self) -> Result<(), SimError> {
        if self.phase.is_over() {
            return Err(SimError::WrongPhase(self.phase));
        }
        Ok(())
    }

    fn defender_entity(&self, id: DefenderId) -> Result<Entity, SimError> {
        self.defenders
            .get(&id)
            .copied()
            .ok_or(SimError::UnknownDefender(id))
    }

    fn charge(&mut self, cost: u32) -> Result<(), SimError> {
        if self.ledger.spend(cost) {
            Ok(())
        } else {
            Err(SimError::InsufficientFunds {
                cost,
                balance: self.ledger.balance(),
            })
        }
    }

    fn emit_gold(&mut self) {
        self.events.emit(SimEvent::GoldChanged {
            gold: self.ledger.balance(),
        });
    }
}
