//! Data the player states read and write.

use bitflags::bitflags;
use glam::{Quat, Vec2, Vec3};

use crate::EntityHandle;
use crate::config::MovementConfig;
use crate::movement::{FrameOfReference, GroundContact, Momentum, MovementBudget};

bitflags! {
    /// Discrete intents from the input collaborator.
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
    #[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
    pub struct Buttons: u8 {
        /// Held while the player wants to be in combat stance.
        const COMBAT = 1 << 0;
        /// Pressed for one frame to fire.
        const FIRE = 1 << 1;
        /// Pressed for one frame to hand the turn over.
        const END_TURN = 1 << 2;
    }
}

/// Input for one frame.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct InputIntent {
    /// x = strafe right, y = forward; length clamped to 1 when applied.
    pub move_direction: Vec2,
    pub frame: FrameOfReference,
    pub buttons: Buttons,
}

impl InputIntent {
    pub fn idle() -> Self {
        Self::default()
    }

    pub fn moving(direction: Vec2) -> Self {
        Self {
            move_direction: direction,
            ..Self::default()
        }
    }

    pub fn with_buttons(mut self, buttons: Buttons) -> Self {
        self.buttons |= buttons;
        self
    }

    pub fn is_moving(&self) -> bool {
        self.move_direction.length_squared() > 1e-6
    }

    pub fn wants_combat(&self) -> bool {
        self.buttons.contains(Buttons::COMBAT)
    }
}

/// Requests raised by player states for the owner of the turn to act on.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum PlayerCommand {
    Fire { origin: Vec3, direction: Vec3 },
    EndTurn,
}

/// Per-entity blackboard shared by every state of the player machine.
#[derive(Clone, Debug)]
pub struct PlayerContext {
    pub entity: EntityHandle,
    pub config: MovementConfig,
    pub position: Vec3,
    pub facing: Quat,
    pub ground: GroundContact,
    pub momentum: Momentum,
    pub budget: MovementBudget,
    pub input: InputIntent,
    pub has_authority: bool,
    /// Seconds airborne since entering `Falling`.
    pub fall_time: f32,
    /// Seconds since entering `Landing`.
    pub landing_time: f32,
    /// Set when authority is gained, consumed when the budget is refilled.
    pub(crate) turn_pending: bool,
    commands: Vec<PlayerCommand>,
}

impl PlayerContext {
    pub fn new(entity: EntityHandle, config: MovementConfig) -> Self {
        let budget = MovementBudget::new(config.budget_secs);
        Self {
            entity,
            config,
            position: Vec3::ZERO,
            facing: Quat::IDENTITY,
            ground: GroundContact::AIRBORNE,
            momentum: Momentum::default(),
            budget,
            input: InputIntent::idle(),
            has_authority: false,
            fall_time: 0.0,
            landing_time: 0.0,
            turn_pending: false,
            commands: Vec::new(),
        }
    }

    pub fn at(mut self, position: Vec3) -> Self {
        self.position = position;
        self
    }

    /// Marks the start of this entity's turn.
    pub fn grant_authority(&mut self) {
        self.has_authority = true;
        self.turn_pending = true;
    }

    pub fn revoke_authority(&mut self) {
        self.has_authority = false;
    }

    pub fn is_grounded(&self) -> bool {
        self.ground.grounded
    }

    pub fn slope_ok(&self) -> bool {
        self.ground.is_walkable(self.config.slope_limit_degrees)
    }

    pub fn slope_too_steep(&self) -> bool {
        self.ground.grounded && !self.slope_ok()
    }

    pub fn fell_long_enough(&self) -> bool {
        self.fall_time >= self.config.min_fall_secs
    }

    pub fn landing_finished(&self) -> bool {
        self.landing_time >= self.config.landing_secs
    }

    /// Refills the movement budget if a new turn has started.
    pub(crate) fn begin_turn_if_pending(&mut self) {
        if self.turn_pending {
            self.turn_pending = false;
            self.budget.reset();
        }
    }

    pub(crate) fn push_command(&mut self, command: PlayerCommand) {
        self.commands.push(command);
    }

    pub fn take_commands(&mut self) -> Vec<PlayerCommand> {
        std::mem::take(&mut self.commands)
    }

    /// Fixed-step integration after the ground check.
    pub fn integrate(&mut self, dt: f32) {
        if self.ground.grounded {
            self.momentum.settle_on(self.ground.normal);
        } else {
            self.momentum.apply_gravity(self.config.gravity, dt);
        }
        self.position += self.momentum.displacement(dt);
    }
}
