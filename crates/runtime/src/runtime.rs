//! Frame-driven match orchestrator.
//!
//! [`MatchRuntime`] owns the authority manager and one [`PlayerController`]
//! per entity. Each frame runs, in order: fixed physics steps, the player
//! state machines, player commands, the turn timer, then routing of the
//! manager's events back into the controllers.

use game_core::{
    AuthorityManager, EntityAllocator, EntityHandle, EventBus, EventMailbox, GameError, GameEvent,
    GroundSensor, InputIntent, PlayerCommand, SubscriptionId, Topic,
};
use glam::Vec3;

use crate::api::{DebugEntry, FrameReport, MatchOutcome, Result, RuntimeError, Shot};
use crate::config::{RuntimeConfig, TimeoutPolicy};
use crate::controller::PlayerController;

/// One turn-based match: roster, turn rotation and per-entity state graphs.
pub struct MatchRuntime {
    config: RuntimeConfig,
    allocator: EntityAllocator,
    authority: AuthorityManager,
    mailbox: EventMailbox,
    players: Vec<PlayerController>,
    accumulator: f32,
    started: bool,
    outcome: MatchOutcome,
}

impl MatchRuntime {
    pub fn builder() -> MatchBuilder {
        MatchBuilder::new()
    }

    pub fn config(&self) -> &RuntimeConfig {
        &self.config
    }

    /// Adds a player standing at `position`. Only allowed before [`start`](Self::start).
    pub fn spawn_player(
        &mut self,
        position: Vec3,
        sensor: impl GroundSensor + 'static,
    ) -> Result<EntityHandle> {
        if self.started {
            return Err(RuntimeError::AlreadyStarted);
        }

        let entity = self.allocator.allocate();
        let controller =
            PlayerController::new(entity, self.config.game.movement.clone(), position, sensor);
        self.players.push(controller);

        tracing::debug!(%entity, ?position, "player spawned");
        Ok(entity)
    }

    /// Binds the spawned players as the roster and hands the first turn to
    /// the player at `start_index`.
    pub fn start(&mut self, start_index: usize) -> Result<EntityHandle> {
        if self.started {
            return Err(RuntimeError::AlreadyStarted);
        }
        if self.players.is_empty() {
            return Err(RuntimeError::NoPlayers);
        }

        let roster: Vec<EntityHandle> = self.players.iter().map(PlayerController::entity).collect();
        let first = self
            .authority
            .initialize(roster, start_index)
            .inspect_err(|err| log_rejected("start", err))?;
        self.started = true;
        self.route_events();

        tracing::info!(
            players = self.players.len(),
            %first,
            turn_secs = self.config.game.turn.duration_secs,
            "match started"
        );
        Ok(first)
    }

    /// Advances the match by `dt` seconds of wall time.
    pub fn frame(&mut self, dt: f32) -> Result<FrameReport> {
        if !self.started {
            return Err(RuntimeError::NotStarted);
        }
        let dt = dt.max(0.0);
        let mut report = FrameReport::default();

        let step = self.config.fixed_timestep;
        self.accumulator += dt;
        while self.accumulator >= step {
            if report.steps == self.config.max_substeps {
                tracing::warn!(
                    dropped = self.accumulator,
                    "frame exceeded physics substep limit"
                );
                self.accumulator = 0.0;
                break;
            }
            for player in &mut self.players {
                player.fixed_tick(step);
            }
            self.accumulator -= step;
            report.steps += 1;
        }

        for player in &mut self.players {
            player.tick(dt);
        }

        self.process_commands(&mut report);

        if !self.outcome.is_over() {
            report.timer = Some(self.authority.tick(dt));
        }
        self.route_events();

        Ok(report)
    }

    /// Ends `entity`'s turn and passes authority to the next player.
    pub fn end_turn(&mut self, entity: EntityHandle) -> Result<()> {
        let result = self.finish_turn(entity);
        self.route_events();
        result
    }

    /// Removes `entity` from the match, e.g. after it was hit.
    pub fn kill(&mut self, entity: EntityHandle) -> Result<()> {
        if !self.started {
            return Err(RuntimeError::NotStarted);
        }
        let index = self
            .players
            .iter()
            .position(|player| player.entity() == entity)
            .ok_or(RuntimeError::UnknownEntity(entity))?;

        let removal = self
            .authority
            .unregister_entity(entity)
            .inspect_err(|err| log_rejected("kill", err))?;
        self.players.remove(index);
        self.allocator.free(entity);

        tracing::info!(
            %entity,
            was_holder = removal.was_holder,
            game_over = removal.game_over,
            remaining = self.players.len(),
            "entity removed"
        );
        self.route_events();
        Ok(())
    }

    pub fn set_input(&mut self, entity: EntityHandle, input: InputIntent) -> Result<()> {
        self.player_mut(entity)?.set_input(input);
        Ok(())
    }

    pub fn subscribe(&mut self, handler: impl FnMut(&GameEvent) + 'static) -> SubscriptionId {
        self.authority.subscribe(handler)
    }

    pub fn subscribe_topic(
        &mut self,
        topic: Topic,
        handler: impl FnMut(&GameEvent) + 'static,
    ) -> SubscriptionId {
        self.authority.events_mut().subscribe_topic(topic, handler)
    }

    pub fn outcome(&self) -> MatchOutcome {
        self.outcome
    }

    pub fn is_started(&self) -> bool {
        self.started
    }

    pub fn current_holder(&self) -> Option<EntityHandle> {
        self.authority.current_holder()
    }

    pub fn authority(&self) -> &AuthorityManager {
        &self.authority
    }

    pub fn players(&self) -> impl Iterator<Item = &PlayerController> {
        self.players.iter()
    }

    pub fn player(&self, entity: EntityHandle) -> Option<&PlayerController> {
        self.players.iter().find(|player| player.entity() == entity)
    }

    /// State path, colour and turn info for every live player.
    pub fn debug_view(&self) -> Vec<DebugEntry> {
        self.players
            .iter()
            .map(|player| {
                let context = player.context();
                DebugEntry {
                    entity: player.entity(),
                    path: player.active_path(),
                    color: player.debug_color(),
                    has_authority: self.authority.has_authority(player.entity()),
                    budget_fraction: context.budget.fraction(),
                    position: context.position,
                }
            })
            .collect()
    }

    fn player_mut(&mut self, entity: EntityHandle) -> Result<&mut PlayerController> {
        self.players
            .iter_mut()
            .find(|player| player.entity() == entity)
            .ok_or(RuntimeError::UnknownEntity(entity))
    }

    fn finish_turn(&mut self, entity: EntityHandle) -> Result<()> {
        if !self.started {
            return Err(RuntimeError::NotStarted);
        }
        self.authority
            .reset_authority(entity)
            .inspect_err(|err| log_rejected("end turn", err))?;

        if !self.authority.is_rotation_frozen() {
            let next = self
                .authority
                .give_next_entity_authority()
                .inspect_err(|err| log_rejected("pass turn", err))?;
            tracing::debug!(from = %entity, to = %next, "turn passed");
        }
        Ok(())
    }

    fn process_commands(&mut self, report: &mut FrameReport) {
        let mut end_turns = Vec::new();

        for player in &mut self.players {
            let shooter = player.entity();
            for command in player.take_commands() {
                match command {
                    PlayerCommand::Fire { origin, direction } => {
                        tracing::info!(%shooter, ?origin, ?direction, "fired");
                        report.shots.push(Shot {
                            shooter,
                            origin,
                            direction,
                        });
                        if self.config.end_turn_on_fire {
                            end_turns.push(shooter);
                        }
                    }
                    PlayerCommand::EndTurn => end_turns.push(shooter),
                }
            }
        }

        for entity in end_turns {
            if self.authority.has_authority(entity) {
                // Errors are logged by finish_turn.
                let _ = self.finish_turn(entity);
            }
        }
    }

    /// Applies queued manager events to the controllers until the queue is empty.
    fn route_events(&mut self) {
        while let Some(event) = self.mailbox.pop() {
            tracing::trace!(?event, "routing event");
            match event {
                GameEvent::AuthorityGained(entity) => {
                    if let Ok(player) = self.player_mut(entity) {
                        player.set_authority(true);
                    }
                    tracing::info!(%entity, "authority gained");
                }
                GameEvent::AuthorityRevoked(entity) => {
                    if let Ok(player) = self.player_mut(entity) {
                        player.set_authority(false);
                    }
                }
                GameEvent::LastEntityRemaining { survivor } => {
                    self.outcome = match survivor {
                        Some(winner) => MatchOutcome::Winner(winner),
                        None => MatchOutcome::NoWinner,
                    };
                    tracing::info!(outcome = ?self.outcome, "match over");
                }
                GameEvent::TurnTimerExpired(entity) => {
                    tracing::info!(%entity, policy = ?self.config.timeout_policy, "turn timer expired");
                    if self.config.timeout_policy == TimeoutPolicy::AutoEndTurn {
                        let _ = self.finish_turn(entity);
                    }
                }
                GameEvent::EntitySpawned(_)
                | GameEvent::EntityDied(_)
                | GameEvent::TurnTimerUpdated { .. } => {}
            }
        }
    }
}

impl std::fmt::Debug for MatchRuntime {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MatchRuntime")
            .field("players", &self.players)
            .field("holder", &self.authority.current_holder())
            .field("outcome", &self.outcome)
            .finish_non_exhaustive()
    }
}

fn log_rejected(operation: &str, err: &impl GameError) {
    tracing::warn!(
        operation,
        code = err.error_code(),
        severity = err.severity().as_str(),
        "{err}"
    );
}

/// Builder for [`MatchRuntime`].
pub struct MatchBuilder {
    config: RuntimeConfig,
    events: EventBus,
}

impl MatchBuilder {
    fn new() -> Self {
        Self {
            config: RuntimeConfig::default(),
            events: EventBus::new(),
        }
    }

    /// Override runtime configuration
    pub fn config(mut self, config: RuntimeConfig) -> Self {
        self.config = config;
        self
    }

    /// Use an event bus with subscribers already attached.
    pub fn events(mut self, events: EventBus) -> Self {
        self.events = events;
        self
    }

    pub fn subscribe(mut self, handler: impl FnMut(&GameEvent) + 'static) -> Self {
        self.events.subscribe(handler);
        self
    }

    pub fn build(self) -> Result<MatchRuntime> {
        self.config.validate()?;

        let mut events = self.events;
        let mailbox = EventMailbox::new();
        events.subscribe(mailbox.sink());
        let authority = AuthorityManager::new(&self.config.game.turn, events);

        Ok(MatchRuntime {
            config: self.config,
            allocator: EntityAllocator::new(),
            authority,
            mailbox,
            players: Vec::new(),
            accumulator: 0.0,
            started: false,
            outcome: MatchOutcome::InProgress,
        })
    }
}
