//! Wiring of the player movement/combat state graph.
//!
//! Top level:
//!
//! | From     | To       | Guard                                    |
//! |----------|----------|------------------------------------------|
//! | Grounded | Sliding  | grounded and slope too steep             |
//! | Grounded | Falling  | not grounded                             |
//! | Falling  | Landing  | grounded, slope ok, fell long enough     |
//! | Falling  | Grounded | grounded, slope ok, short fall           |
//! | Falling  | Sliding  | grounded and slope too steep             |
//! | Sliding  | Falling  | not grounded                             |
//! | Sliding  | Grounded | grounded and slope ok                    |
//! | Landing  | Grounded | landing finished                         |
//! | Landing  | Falling  | not grounded                             |
//!
//! `Grounded` nests `AwaitingAuthority`, `Locomotion` and `CombatStance`, with
//! an any-transition back to `AwaitingAuthority` whenever authority is lost.

use state_machine::{StateId, StateMachine, SubStateMachine};

use super::{PlayerContext, states};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, strum::IntoStaticStr, strum::EnumIter)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum PlayerState {
    Falling,
    Grounded,
    Sliding,
    Landing,
    AwaitingAuthority,
    Locomotion,
    CombatStance,
}

impl PlayerState {
    /// Entities start airborne until the first ground check resolves.
    pub const INITIAL: Self = Self::Falling;

    /// Entry state of the `Grounded` sub-machine.
    pub const GROUNDED_ENTRY: Self = Self::AwaitingAuthority;

    /// True for states that only exist inside `Grounded`.
    pub fn is_grounded_substate(self) -> bool {
        matches!(
            self,
            Self::AwaitingAuthority | Self::Locomotion | Self::CombatStance
        )
    }
}

impl StateId for PlayerState {
    fn name(&self) -> &'static str {
        (*self).into()
    }
}

pub type PlayerMachine = StateMachine<PlayerState, PlayerContext>;

/// Builds the full graph without entering any state.
pub fn build_player_machine() -> PlayerMachine {
    use PlayerState::*;

    let mut grounded = PlayerMachine::new();
    grounded
        .add_state(AwaitingAuthority, states::AwaitingAuthority)
        .add_state(Locomotion, states::Locomotion)
        .add_state(CombatStance, states::CombatStance)
        .add_any_transition(AwaitingAuthority, |ctx| !ctx.has_authority)
        .add_transition(AwaitingAuthority, Locomotion, |ctx| ctx.has_authority)
        .add_transition(Locomotion, CombatStance, |ctx| ctx.input.wants_combat())
        .add_transition(CombatStance, Locomotion, |ctx| !ctx.input.wants_combat());

    let mut machine = PlayerMachine::new();
    machine
        .add_state(Falling, states::Falling)
        .add_state(
            Grounded,
            SubStateMachine::new(grounded, PlayerState::GROUNDED_ENTRY)
                .with_color(state_machine::DebugColor::GREEN),
        )
        .add_state(Sliding, states::Sliding)
        .add_state(Landing, states::Landing);

    machine
        .add_transition(Grounded, Sliding, |ctx| ctx.slope_too_steep())
        .add_transition(Grounded, Falling, |ctx| !ctx.is_grounded())
        .add_transition(Falling, Landing, |ctx| {
            ctx.is_grounded() && ctx.slope_ok() && ctx.fell_long_enough()
        })
        .add_transition(Falling, Grounded, |ctx| {
            ctx.is_grounded() && ctx.slope_ok() && !ctx.fell_long_enough()
        })
        .add_transition(Falling, Sliding, |ctx| ctx.slope_too_steep())
        .add_transition(Sliding, Falling, |ctx| !ctx.is_grounded())
        .add_transition(Sliding, Grounded, |ctx| ctx.is_grounded() && ctx.slope_ok())
        .add_transition(Landing, Grounded, |ctx| ctx.landing_finished())
        .add_transition(Landing, Falling, |ctx| !ctx.is_grounded());

    machine
}

/// Builds the graph and enters [`PlayerState::INITIAL`].
pub fn spawn_player_machine(ctx: &mut PlayerContext) -> PlayerMachine {
    let mut machine = build_player_machine();
    machine.set_state(PlayerState::INITIAL, ctx);
    machine
}
