//! Turn authority: who may act right now.
//!
//! Authority is the exclusive right of one entity to act, i.e. whose turn it
//! is. [`AuthorityManager`] rotates it round-robin over the roster and runs an
//! advisory [`TurnTimer`] for the holder.

mod error;
mod manager;
mod timer;

pub use error::AuthorityError;
pub use manager::{AuthorityManager, AuthorityPhase, Removal};
pub use timer::{TimerTick, TurnTimer};
