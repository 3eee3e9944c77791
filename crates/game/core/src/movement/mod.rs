//! Movement primitives shared by the player state graph.
//!
//! Physics proper (collision, ray casts) lives outside this crate and is
//! reached through [`GroundSensor`].

mod budget;
mod ground;
mod momentum;

pub use budget::MovementBudget;
pub use ground::{GroundContact, GroundSensor};
pub use momentum::{FrameOfReference, Momentum};
