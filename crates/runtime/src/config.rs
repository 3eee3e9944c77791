//! Runtime configuration loaded from RON.

use std::path::Path;

use game_core::GameConfig;
use serde::{Deserialize, Serialize};

use crate::api::ConfigError;

/// What happens when the turn timer runs out.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize, strum::IntoStaticStr)]
pub enum TimeoutPolicy {
    /// Expiry is only reported; the holder keeps authority until it ends its turn.
    #[default]
    Advisory,
    /// The runtime ends the holder's turn and rotates.
    AutoEndTurn,
}

/// Runtime configuration shared by the match orchestrator and its controllers.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RuntimeConfig {
    pub game: GameConfig,
    /// Seconds per physics step.
    pub fixed_timestep: f32,
    /// Upper bound on physics steps per frame; leftover time is dropped.
    pub max_substeps: u32,
    pub timeout_policy: TimeoutPolicy,
    /// Firing ends the shooter's turn.
    pub end_turn_on_fire: bool,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            game: GameConfig::default(),
            fixed_timestep: 1.0 / 60.0,
            max_substeps: 8,
            timeout_policy: TimeoutPolicy::default(),
            end_turn_on_fire: true,
        }
    }
}

impl RuntimeConfig {
    /// Loads and validates a RON file. Missing fields take their defaults.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config: Self = ron::from_str(&content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let invalid = |field, reason| Err(ConfigError::Invalid { field, reason });

        if !is_positive(self.fixed_timestep) {
            return invalid("fixed_timestep", "must be positive");
        }
        if self.max_substeps == 0 {
            return invalid("max_substeps", "must be at least 1");
        }
        if !is_positive(self.game.turn.duration_secs) {
            return invalid("game.turn.duration_secs", "must be positive");
        }
        if self.game.movement.budget_secs < 0.0 {
            return invalid("game.movement.budget_secs", "must not be negative");
        }
        Ok(())
    }

    pub fn with_timeout_policy(mut self, policy: TimeoutPolicy) -> Self {
        self.timeout_policy = policy;
        self
    }

    pub fn with_game(mut self, game: GameConfig) -> Self {
        self.game = game;
        self
    }
}

fn is_positive(value: f32) -> bool {
    value.is_finite() && value > 0.0
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    fn write(content: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().expect("temp file");
        file.write_all(content.as_bytes()).expect("write config");
        file
    }

    #[test]
    fn partial_file_keeps_defaults() {
        let file = write("(timeout_policy: AutoEndTurn, game: (turn: (duration_secs: 10.0)))");

        let config = RuntimeConfig::load(file.path()).expect("valid config");

        assert_eq!(config.timeout_policy, TimeoutPolicy::AutoEndTurn);
        assert_eq!(config.game.turn.duration_secs, 10.0);
        assert_eq!(config.game.movement, game_core::MovementConfig::default());
        assert!(config.end_turn_on_fire);
    }

    #[test]
    fn missing_file_is_io_error() {
        let dir = tempfile::tempdir().expect("temp dir");

        let err = RuntimeConfig::load(dir.path().join("absent.ron")).unwrap_err();

        assert!(matches!(err, ConfigError::Io { .. }));
    }

    #[test]
    fn malformed_file_is_parse_error() {
        let file = write("(fixed_timestep: \"fast\")");

        let err = RuntimeConfig::load(file.path()).unwrap_err();

        assert!(matches!(err, ConfigError::Parse { .. }));
    }

    #[test]
    fn zero_timestep_is_rejected() {
        let file = write("(fixed_timestep: 0.0)");

        let err = RuntimeConfig::load(file.path()).unwrap_err();

        assert!(matches!(
            err,
            ConfigError::Invalid {
                field: "fixed_timestep",
                ..
            }
        ));
    }
}
