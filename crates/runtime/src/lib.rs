//! Runtime orchestration for turn-based matches.
//!
//! This crate drives the pure rules in `game-core` frame by frame. Consumers
//! build a [`MatchRuntime`], spawn players with a ground sensor each, start
//! the match and call [`MatchRuntime::frame`] once per rendered frame.
//!
//! Modules are organized by responsibility:
//! - [`runtime`] hosts the orchestrator and builder
//! - [`controller`] wraps one player's state machine and sensor
//! - [`config`] loads runtime tunables from RON
//! - [`api`] exposes the errors and views downstream clients interact with
pub mod api;
pub mod config;
pub mod controller;
pub mod runtime;

pub use api::{
    ConfigError, DebugEntry, FrameReport, MatchOutcome, Result, RuntimeError, Shot,
};
pub use config::{RuntimeConfig, TimeoutPolicy};
pub use controller::PlayerController;
pub use runtime::{MatchBuilder, MatchRuntime};
