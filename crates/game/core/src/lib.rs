//! Turn-based game rules built on the `state-machine` crate.
//!
//! `game-core` owns the rules that do not depend on a frame loop or a
//! physics engine: entity identity, the turn-authority rotation with its
//! timer, the per-turn movement budget and the player movement/combat graph.
//! Everything here is synchronous and single-threaded; the runtime crate
//! drives it frame by frame.
pub mod authority;
pub mod config;
pub mod entity;
pub mod error;
pub mod events;
pub mod movement;
pub mod player;

pub use authority::{
    AuthorityError, AuthorityManager, AuthorityPhase, Removal, TimerTick, TurnTimer,
};
pub use config::{GameConfig, MovementConfig, TurnConfig};
pub use entity::{EntityAllocator, EntityHandle};
pub use error::{ErrorSeverity, GameError};
pub use events::{EventBus, EventMailbox, GameEvent, SubscriptionId, Topic};
pub use movement::{FrameOfReference, GroundContact, GroundSensor, Momentum, MovementBudget};
pub use player::{
    Buttons, InputIntent, PlayerCommand, PlayerContext, PlayerMachine, PlayerState,
    build_player_machine, spawn_player_machine,
};
