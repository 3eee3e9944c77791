//! Errors returned by the authority manager.

use crate::EntityHandle;
use crate::error::{ErrorSeverity, GameError};

#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum AuthorityError {
    #[error("cannot start a match with an empty roster")]
    EmptyRoster,

    #[error("start index {index} is out of range for a roster of {len}")]
    InvalidStartIndex { index: usize, len: usize },

    #[error("entity {0} appears more than once in the roster")]
    DuplicateEntity(EntityHandle),

    #[error("authority manager has not been initialized")]
    NotInitialized,

    #[error("entity {0} is not registered in the roster")]
    NotRegistered(EntityHandle),

    #[error("entity {entity} tried to end a turn it does not hold")]
    NotHolder {
        entity: EntityHandle,
        holder: Option<EntityHandle>,
    },

    #[error("turn rotation is frozen; the match is over")]
    RotationFrozen,

    #[error("next index {index} is out of range for a roster of {len}")]
    StaleNextIndex { index: usize, len: usize },
}

impl GameError for AuthorityError {
    fn severity(&self) -> ErrorSeverity {
        match self {
            Self::EmptyRoster
            | Self::InvalidStartIndex { .. }
            | Self::DuplicateEntity(_)
            | Self::NotInitialized => ErrorSeverity::Configuration,
            Self::NotRegistered(_) | Self::NotHolder { .. } | Self::RotationFrozen => {
                ErrorSeverity::Protocol
            }
            Self::StaleNextIndex { .. } => ErrorSeverity::Internal,
        }
    }

    fn error_code(&self) -> &'static str {
        match self {
            Self::EmptyRoster => "AUTHORITY_EMPTY_ROSTER",
            Self::InvalidStartIndex { .. } => "AUTHORITY_INVALID_START_INDEX",
            Self::DuplicateEntity(_) => "AUTHORITY_DUPLICATE_ENTITY",
            Self::NotInitialized => "AUTHORITY_NOT_INITIALIZED",
            Self::NotRegistered(_) => "AUTHORITY_NOT_REGISTERED",
            Self::NotHolder { .. } => "AUTHORITY_NOT_HOLDER",
            Self::RotationFrozen => "AUTHORITY_ROTATION_FROZEN",
            Self::StaleNextIndex { .. } => "AUTHORITY_STALE_NEXT_INDEX",
        }
    }
}
