//! Public runtime API surface.
//!
//! Gathers the types exposed to consumers of the runtime crate so the
//! orchestrator can stay focused on driving the match.

pub mod errors;
pub mod view;

pub use errors::{ConfigError, Result, RuntimeError};
pub use view::{DebugEntry, FrameReport, MatchOutcome, Shot};
