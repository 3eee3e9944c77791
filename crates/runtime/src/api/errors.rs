//! Unified error types surfaced by the runtime API.
//!
//! Wraps authority protocol violations and configuration failures so clients
//! can bubble them up with consistent context.
use std::path::PathBuf;

use game_core::{AuthorityError, EntityHandle, ErrorSeverity, GameError};
use thiserror::Error;

pub type Result<T> = std::result::Result<T, RuntimeError>;

#[derive(Debug, Error)]
pub enum RuntimeError {
    #[error(transparent)]
    Authority(#[from] AuthorityError),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("entity {0} is not controlled by this match")]
    UnknownEntity(EntityHandle),

    #[error("match has not been started")]
    NotStarted,

    #[error("match already started; the roster is fixed")]
    AlreadyStarted,

    #[error("match needs at least one player")]
    NoPlayers,
}

impl GameError for RuntimeError {
    fn severity(&self) -> ErrorSeverity {
        match self {
            RuntimeError::Authority(err) => err.severity(),
            RuntimeError::Config(_) | RuntimeError::NoPlayers => ErrorSeverity::Configuration,
            RuntimeError::UnknownEntity(_)
            | RuntimeError::NotStarted
            | RuntimeError::AlreadyStarted => ErrorSeverity::Protocol,
        }
    }

    fn error_code(&self) -> &'static str {
        match self {
            RuntimeError::Authority(err) => err.error_code(),
            RuntimeError::Config(ConfigError::Io { .. }) => "RUNTIME_CONFIG_IO",
            RuntimeError::Config(ConfigError::Parse { .. }) => "RUNTIME_CONFIG_PARSE",
            RuntimeError::Config(ConfigError::Invalid { .. }) => "RUNTIME_CONFIG_INVALID",
            RuntimeError::UnknownEntity(_) => "RUNTIME_UNKNOWN_ENTITY",
            RuntimeError::NotStarted => "RUNTIME_NOT_STARTED",
            RuntimeError::AlreadyStarted => "RUNTIME_ALREADY_STARTED",
            RuntimeError::NoPlayers => "RUNTIME_NO_PLAYERS",
        }
    }
}

/// Failures while loading a [`RuntimeConfig`](crate::RuntimeConfig).
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {path}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config {path}")]
    Parse {
        path: PathBuf,
        #[source]
        source: ron::error::SpannedError,
    },

    #[error("invalid config value `{field}`: {reason}")]
    Invalid {
        field: &'static str,
        reason: &'static str,
    },
}
