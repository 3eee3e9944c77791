//! Read-only values handed back to clients.

use game_core::{EntityHandle, PlayerState, TimerTick};
use glam::Vec3;
use state_machine::{DebugColor, StateId};

/// How the match stands.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum MatchOutcome {
    #[default]
    InProgress,
    /// Rotation froze with one entity left.
    ///
    /// Recorded once when the match is decided. The handle keeps naming the
    /// winner even if that entity is removed afterwards, so it may no longer
    /// resolve to a live player.
    Winner(EntityHandle),
    /// Rotation froze with nobody left.
    NoWinner,
}

impl MatchOutcome {
    pub fn is_over(&self) -> bool {
        !matches!(self, MatchOutcome::InProgress)
    }
}

/// A `Fire` command raised during a frame.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Shot {
    pub shooter: EntityHandle,
    pub origin: Vec3,
    pub direction: Vec3,
}

/// Summary of one [`MatchRuntime::frame`](crate::MatchRuntime::frame) call.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct FrameReport {
    /// Fixed physics steps run this frame.
    pub steps: u32,
    pub shots: Vec<Shot>,
    /// Turn timer result for the holder at the end of the frame.
    pub timer: Option<TimerTick>,
}

/// Per-entity snapshot for debug overlays.
#[derive(Clone, Debug, PartialEq)]
pub struct DebugEntry {
    pub entity: EntityHandle,
    /// Outermost state first.
    pub path: Vec<PlayerState>,
    pub color: DebugColor,
    pub has_authority: bool,
    pub budget_fraction: f32,
    pub position: Vec3,
}

impl DebugEntry {
    /// `Grounded/Locomotion` style label.
    pub fn label(&self) -> String {
        self.path
            .iter()
            .map(StateId::name)
            .collect::<Vec<_>>()
            .join("/")
    }
}
