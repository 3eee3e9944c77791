//! Leaf states of the player graph.

use glam::Vec3;
use state_machine::{DebugColor, State};

use super::{Buttons, PlayerCommand, PlayerContext, PlayerState};

pub struct Falling;

impl State<PlayerState, PlayerContext> for Falling {
    fn on_enter(&mut self, ctx: &mut PlayerContext) {
        ctx.fall_time = 0.0;
    }

    fn tick(&mut self, ctx: &mut PlayerContext, dt: f32) {
        ctx.fall_time += dt;
    }

    fn debug_color(&self) -> DebugColor {
        DebugColor::RED
    }
}

pub struct Sliding;

impl State<PlayerState, PlayerContext> for Sliding {
    fn tick(&mut self, ctx: &mut PlayerContext, dt: f32) {
        let downhill = ctx.ground.downhill();
        ctx.momentum
            .accelerate(downhill * ctx.config.slide_acceleration, dt);
    }

    fn debug_color(&self) -> DebugColor {
        DebugColor::YELLOW
    }
}

pub struct Landing;

impl State<PlayerState, PlayerContext> for Landing {
    fn on_enter(&mut self, ctx: &mut PlayerContext) {
        ctx.landing_time = 0.0;
        ctx.momentum.stop_horizontal();
    }

    fn tick(&mut self, ctx: &mut PlayerContext, dt: f32) {
        ctx.landing_time += dt;
    }

    fn debug_color(&self) -> DebugColor {
        DebugColor::CYAN
    }
}

/// Grounded, waiting for this entity's turn.
pub struct AwaitingAuthority;

impl State<PlayerState, PlayerContext> for AwaitingAuthority {
    fn tick(&mut self, ctx: &mut PlayerContext, dt: f32) {
        ctx.momentum.apply_friction(ctx.config.ground_friction, dt);
    }

    fn debug_color(&self) -> DebugColor {
        DebugColor::GRAY
    }
}

pub struct Locomotion;

impl State<PlayerState, PlayerContext> for Locomotion {
    fn on_enter(&mut self, ctx: &mut PlayerContext) {
        ctx.begin_turn_if_pending();
    }

    fn tick(&mut self, ctx: &mut PlayerContext, dt: f32) {
        let speed = ctx.config.walk_speed;
        walk(ctx, speed, dt);
        request_end_turn(ctx);
    }

    fn on_exit(&mut self, ctx: &mut PlayerContext) {
        ctx.momentum.stop_horizontal();
    }

    fn debug_color(&self) -> DebugColor {
        DebugColor::GREEN
    }
}

/// Aiming: slower movement, may fire.
pub struct CombatStance;

impl State<PlayerState, PlayerContext> for CombatStance {
    fn tick(&mut self, ctx: &mut PlayerContext, dt: f32) {
        let speed = ctx.config.walk_speed * ctx.config.combat_speed_factor;
        walk(ctx, speed, dt);

        if ctx.input.buttons.contains(Buttons::FIRE) {
            ctx.input.buttons.remove(Buttons::FIRE);
            let direction = ctx.facing * Vec3::Z;
            let origin = ctx.position;
            ctx.push_command(PlayerCommand::Fire { origin, direction });
        }
        request_end_turn(ctx);
    }

    fn on_exit(&mut self, ctx: &mut PlayerContext) {
        ctx.momentum.stop_horizontal();
    }

    fn debug_color(&self) -> DebugColor {
        DebugColor::MAGENTA
    }
}

/// Drives horizontal velocity from input while budget remains.
///
/// Budget is only spent on ticks with movement input.
fn walk(ctx: &mut PlayerContext, speed: f32, dt: f32) {
    if ctx.input.is_moving() && ctx.budget.can_move() {
        ctx.budget.consume(dt);
        let input = ctx.input;
        ctx.momentum
            .drive(input.move_direction, speed, input.frame, ctx.facing);
    } else {
        ctx.momentum.stop_horizontal();
    }
}

fn request_end_turn(ctx: &mut PlayerContext) {
    if ctx.input.buttons.contains(Buttons::END_TURN) {
        ctx.input.buttons.remove(Buttons::END_TURN);
        ctx.push_command(PlayerCommand::EndTurn);
    }
}
