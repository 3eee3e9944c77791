//! Lightweight finite state machine optimized for frame-driven games.
//!
//! This library provides a small, deterministic state machine with ordered
//! guard evaluation and hierarchical nesting:
//!
//! - **Ordered guards**: transitions are evaluated in insertion order, first match wins
//! - **Global interrupts**: any-transitions are checked before state-local ones
//! - **Transition before tick**: the state that ends up current is the one ticked
//! - **Zero dependencies**: Pure Rust with no external crates
//!
//! # Architecture
//!
//! - [`State`]: Lifecycle hooks for a single state
//! - [`StateMachine`]: Owns states, transitions and the current state
//! - [`SubStateMachine`]: A state that is itself a machine
//! - [`Node`]: Tagged view over the current state (leaf or composite)

pub mod color;
pub mod machine;
pub mod state;
pub mod sub_machine;
pub mod transition;

// Re-export core types for ergonomic API
pub use color::DebugColor;
pub use machine::{Node, StateMachine};
pub use state::{State, StateId};
pub use sub_machine::SubStateMachine;
pub use transition::{Predicate, Transition};
