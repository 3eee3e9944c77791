//! Scripted input for the player holding the turn.

use game_core::{Buttons, InputIntent};
use glam::Vec2;
use rand::Rng;

/// Seconds spent walking at the start of a turn.
const WALK_SECS: f32 = 1.0;
/// Seconds spent aiming before firing.
const AIM_SECS: f32 = 0.5;

/// Drives the current holder through walk, aim, fire, end turn.
#[derive(Debug, Default)]
pub struct TurnScript {
    elapsed: f32,
    heading: Vec2,
    fired: bool,
    ended: bool,
}

impl TurnScript {
    /// Starts a new turn with a random walking direction.
    pub fn restart(&mut self, rng: &mut impl Rng) {
        let angle = rng.gen_range(0.0..std::f32::consts::TAU);
        self.elapsed = 0.0;
        self.heading = Vec2::from_angle(angle);
        self.fired = false;
        self.ended = false;
    }

    pub fn next_input(&mut self, dt: f32) -> InputIntent {
        self.elapsed += dt;

        if self.elapsed < WALK_SECS {
            return InputIntent::moving(self.heading);
        }

        let aim = InputIntent::idle().with_buttons(Buttons::COMBAT);
        if self.elapsed < WALK_SECS + AIM_SECS {
            return aim;
        }
        if !self.fired {
            self.fired = true;
            return aim.with_buttons(Buttons::FIRE);
        }
        // Only reached when firing does not end the turn.
        if !self.ended {
            self.ended = true;
            return aim.with_buttons(Buttons::END_TURN);
        }
        aim
    }
}
