/// Game configuration constants and tunable parameters.
#[derive(Clone, Debug, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct GameConfig {
    pub turn: TurnConfig,
    pub movement: MovementConfig,
}

impl GameConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_turn_duration(mut self, seconds: f32) -> Self {
        self.turn.duration_secs = seconds;
        self
    }

    pub fn with_movement_budget(mut self, seconds: f32) -> Self {
        self.movement.budget_secs = seconds;
        self
    }
}

/// Turn timer tunables.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct TurnConfig {
    /// Seconds on the turn clock when an entity gains authority.
    pub duration_secs: f32,
}

impl TurnConfig {
    pub const DEFAULT_DURATION_SECS: f32 = 30.0;
}

impl Default for TurnConfig {
    fn default() -> Self {
        Self {
            duration_secs: Self::DEFAULT_DURATION_SECS,
        }
    }
}

/// Locomotion tunables consumed by the player state graph.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct MovementConfig {
    /// Seconds of active movement allowed per turn.
    pub budget_secs: f32,
    /// Steepest walkable ground, in degrees from vertical-up.
    pub slope_limit_degrees: f32,
    /// Airborne time below which touching ground skips the landing state.
    pub min_fall_secs: f32,
    /// Length of the landing recovery.
    pub landing_secs: f32,
    pub walk_speed: f32,
    /// Walk speed multiplier while aiming.
    pub combat_speed_factor: f32,
    pub gravity: f32,
    pub slide_acceleration: f32,
    /// Horizontal velocity retained per second while grounded and not driven.
    pub ground_friction: f32,
}

impl MovementConfig {
    pub const DEFAULT_BUDGET_SECS: f32 = 5.0;
    pub const DEFAULT_SLOPE_LIMIT_DEGREES: f32 = 45.0;
    pub const DEFAULT_MIN_FALL_SECS: f32 = 0.3;
    pub const DEFAULT_LANDING_SECS: f32 = 0.25;
}

impl Default for MovementConfig {
    fn default() -> Self {
        Self {
            budget_secs: Self::DEFAULT_BUDGET_SECS,
            slope_limit_degrees: Self::DEFAULT_SLOPE_LIMIT_DEGREES,
            min_fall_secs: Self::DEFAULT_MIN_FALL_SECS,
            landing_secs: Self::DEFAULT_LANDING_SECS,
            walk_speed: 4.0,
            combat_speed_factor: 0.5,
            gravity: 9.81,
            slide_acceleration: 6.0,
            ground_friction: 0.1,
        }
    }
}
