//! Player movement and combat state graph.
//!
//! The graph is a [`StateMachine`](state_machine::StateMachine) over
//! [`PlayerState`] driven by a [`PlayerContext`]. Ground checks and input are
//! written into the context by the caller before each tick; states raise
//! [`PlayerCommand`]s for the turn owner to act on.

mod context;
mod graph;
mod states;

pub use context::{Buttons, InputIntent, PlayerCommand, PlayerContext};
pub use graph::{PlayerMachine, PlayerState, build_player_machine, spawn_player_machine};
