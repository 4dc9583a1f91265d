//=========================================================================
// Core Errors
//=========================================================================
//
// Errors surfaced at load time. The tick path itself never fails.
//
//=========================================================================

//=== External Dependencies ===============================================

use std::path::PathBuf;

use thiserror::Error;

//=== ConfigError =========================================================

/// Failure to load or validate a [`SessionConfig`](crate::core::session::SessionConfig).
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error(transparent)]
    Parse(#[from] ron::error::SpannedError),

    #[error("default_lives must be between 1 and 10, got {0}")]
    LivesOutOfRange(u8),

    #[error("can_beat_level is set but beat_level_score is 0")]
    BeatScoreNotPositive,

    #[error("{0} must name a level")]
    EmptyLevelId(&'static str),
}

//=========================================================================
// Unit Tests
//=========================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error as _;

    #[test]
    fn io_error_names_the_path_and_keeps_the_source() {
        let err = ConfigError::Io {
            path: PathBuf::from("demos/missing.ron"),
            source: std::io::Error::new(std::io::ErrorKind::NotFound, "not found"),
        };

        assert_eq!(err.to_string(), "failed to read config demos/missing.ron: not found");
        assert!(err.source().is_some());
    }

    #[test]
    fn validation_messages() {
        assert_eq!(
            ConfigError::LivesOutOfRange(12).to_string(),
            "default_lives must be between 1 and 10, got 12"
        );
        assert_eq!(ConfigError::EmptyLevelId("menu_level").to_string(), "menu_level must name a level");
    }
}
