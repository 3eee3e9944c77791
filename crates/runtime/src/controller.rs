//! Per-entity driver for the player state graph.

use game_core::{
    EntityHandle, GroundSensor, InputIntent, MovementConfig, PlayerCommand, PlayerContext,
    PlayerMachine, PlayerState, spawn_player_machine,
};
use glam::Vec3;
use state_machine::DebugColor;

/// Owns one player's state machine, its context and its ground sensor.
///
/// Physics runs in [`fixed_tick`](Self::fixed_tick), state logic in
/// [`tick`](Self::tick); the match runtime calls both every frame.
pub struct PlayerController {
    machine: PlayerMachine,
    context: PlayerContext,
    sensor: Box<dyn GroundSensor>,
}

impl PlayerController {
    pub fn new(
        entity: EntityHandle,
        config: MovementConfig,
        position: Vec3,
        sensor: impl GroundSensor + 'static,
    ) -> Self {
        let mut sensor: Box<dyn GroundSensor> = Box::new(sensor);
        let mut context = PlayerContext::new(entity, config).at(position);
        context.ground = sensor.sense(position);
        let machine = spawn_player_machine(&mut context);

        Self {
            machine,
            context,
            sensor,
        }
    }

    pub fn entity(&self) -> EntityHandle {
        self.context.entity
    }

    /// Ground check followed by momentum integration.
    pub fn fixed_tick(&mut self, dt: f32) {
        self.context.ground = self.sensor.sense(self.context.position);
        self.context.integrate(dt);
    }

    /// Runs the state machine for one frame.
    pub fn tick(&mut self, dt: f32) {
        let before = self.machine.resolve_leaf();
        self.machine.tick(&mut self.context, dt);
        let after = self.machine.resolve_leaf();

        if before != after {
            tracing::debug!(
                entity = %self.context.entity,
                from = ?before,
                to = ?after,
                "player state changed"
            );
        }
    }

    pub fn set_input(&mut self, input: InputIntent) {
        self.context.input = input;
    }

    pub fn set_authority(&mut self, granted: bool) {
        if granted {
            self.context.grant_authority();
        } else {
            self.context.revoke_authority();
        }
    }

    pub fn take_commands(&mut self) -> Vec<PlayerCommand> {
        self.context.take_commands()
    }

    pub fn state(&self) -> Option<PlayerState> {
        self.machine.current()
    }

    pub fn leaf_state(&self) -> Option<PlayerState> {
        self.machine.resolve_leaf()
    }

    pub fn active_path(&self) -> Vec<PlayerState> {
        self.machine.active_path()
    }

    pub fn debug_color(&self) -> DebugColor {
        self.machine.debug_color()
    }

    pub fn context(&self) -> &PlayerContext {
        &self.context
    }

    pub fn context_mut(&mut self) -> &mut PlayerContext {
        &mut self.context
    }
}

impl std::fmt::Debug for PlayerController {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PlayerController")
            .field("entity", &self.context.entity)
            .field("state", &self.machine.active_path())
            .finish_non_exhaustive()
    }
}
