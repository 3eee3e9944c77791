//! Event payloads published by the authority manager.

use crate::EntityHandle;

/// Topics for event routing.
#[derive(Debug, Clone, Copy, Hash, Eq, PartialEq, strum::EnumIter, strum::IntoStaticStr)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Topic {
    /// Authority gained/revoked
    Authority,
    /// Entities joining and leaving the roster, match end
    Lifecycle,
    /// Turn timer countdown
    Timer,
}

/// Notification pushed to subscribers, in the order the manager emits them.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum GameEvent {
    AuthorityGained(EntityHandle),
    AuthorityRevoked(EntityHandle),
    EntitySpawned(EntityHandle),
    EntityDied(EntityHandle),
    /// Rotation froze because the roster shrank to one or zero entities.
    ///
    /// `survivor` is `None` when nobody is left.
    LastEntityRemaining { survivor: Option<EntityHandle> },
    TurnTimerUpdated { entity: EntityHandle, remaining: f32 },
    TurnTimerExpired(EntityHandle),
}

impl GameEvent {
    pub fn topic(&self) -> Topic {
        match self {
            GameEvent::AuthorityGained(_) | GameEvent::AuthorityRevoked(_) => Topic::Authority,
            GameEvent::EntitySpawned(_)
            | GameEvent::EntityDied(_)
            | GameEvent::LastEntityRemaining { .. } => Topic::Lifecycle,
            GameEvent::TurnTimerUpdated { .. } | GameEvent::TurnTimerExpired(_) => Topic::Timer,
        }
    }

    /// Entity the event is about, if any.
    pub fn entity(&self) -> Option<EntityHandle> {
        match self {
            GameEvent::AuthorityGained(entity)
            | GameEvent::AuthorityRevoked(entity)
            | GameEvent::EntitySpawned(entity)
            | GameEvent::EntityDied(entity)
            | GameEvent::TurnTimerExpired(entity)
            | GameEvent::TurnTimerUpdated { entity, .. } => Some(*entity),
            GameEvent::LastEntityRemaining { survivor } => *survivor,
        }
    }
}
