//=========================================================================
// Session Configuration
//=========================================================================
//
// Immutable per-session settings. Loaded from RON or built in code; any
// field left out of a RON file takes its default.
//
// Example:
//   (
//       title: "Space Dodge",
//       can_beat_level: true,
//       beat_level_score: 50,
//       play_level: "Arena",
//       sounds: (lose: Some("lose.ogg")),
//   )
//
//=========================================================================

//=== External Dependencies ===============================================

use std::fs;
use std::path::Path;

use log::info;
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

//=== Internal Dependencies ===============================================

use crate::core::error::ConfigError;
use crate::core::level::LevelId;

//=== Constants ===========================================================

/// Allowed range for `default_lives`.
pub const LIVES_RANGE: std::ops::RangeInclusive<u8> = 1..=10;

//=== SoundBank ===========================================================

/// One-shot cue clips. A missing clip silently skips the cue.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SoundBank {
    pub lose: Option<String>,
    pub beat_level: Option<String>,
}

//=== SessionConfig =======================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    //--- Display Strings --------------------------------------------------
    pub title: String,
    pub copyright: String,
    pub credits: String,
    pub win_message: String,
    pub lose_message: String,

    //--- Rules ------------------------------------------------------------
    /// Reaching `beat_level_score` ends the level.
    pub can_beat_level: bool,
    pub beat_level_score: u32,

    /// Shows a running timer while playing.
    pub timed_level: bool,

    pub default_score: u32,
    pub default_lives: u8,

    //--- Levels -----------------------------------------------------------
    pub menu_level: LevelId,
    pub play_level: LevelId,

    //--- Audio ------------------------------------------------------------
    pub sounds: SoundBank,

    /// Enables the diagnostic key actions (force game over, lose a life,
    /// dump state).
    pub debug_keys: bool,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            title: "Game Title".to_owned(),
            copyright: format!("Copyright {}", OffsetDateTime::now_utc().year()),
            credits: "Made by me".to_owned(),
            win_message: "You Win!".to_owned(),
            lose_message: "Game Over".to_owned(),
            can_beat_level: false,
            beat_level_score: 20,
            timed_level: false,
            default_score: 0,
            default_lives: 3,
            menu_level: LevelId::from("Menu"),
            play_level: LevelId::from("Level1"),
            sounds: SoundBank::default(),
            debug_keys: false,
        }
    }
}

impl SessionConfig {
    //--- Loading ----------------------------------------------------------

    /// Parses and validates a RON document.
    pub fn from_ron_str(source: &str) -> Result<Self, ConfigError> {
        let config: Self = ron::from_str(source)?;
        config.validate()?;
        Ok(config)
    }

    /// Reads, parses and validates a RON file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let source = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;

        let config = Self::from_ron_str(&source)?;
        info!(target: "session", "Loaded session config '{}' from {}", config.title, path.display());
        Ok(config)
    }

    //--- Validation -------------------------------------------------------

    /// Checks the preconditions the session relies on.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !LIVES_RANGE.contains(&self.default_lives) {
            return Err(ConfigError::LivesOutOfRange(self.default_lives));
        }
        if self.can_beat_level && self.beat_level_score == 0 {
            return Err(ConfigError::BeatScoreNotPositive);
        }
        if self.menu_level.is_empty() {
            return Err(ConfigError::EmptyLevelId("menu_level"));
        }
        if self.play_level.is_empty() {
            return Err(ConfigError::EmptyLevelId("play_level"));
        }
        Ok(())
    }
}

//=========================================================================
// Unit Tests
//=========================================================================

#[cfg(test)]
mod tests {
    use super::*;

    //--- Defaults ---------------------------------------------------------

    #[test]
    fn defaults_are_valid() {
        let config = SessionConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.default_lives, 3);
        assert_eq!(config.beat_level_score, 20);
        assert_eq!(config.menu_level, LevelId::from("Menu"));
    }

    #[test]
    fn default_copyright_carries_the_current_year() {
        let config = SessionConfig::default();
        let year = config.copyright.strip_prefix("Copyright ").unwrap();
        assert_eq!(year.parse::<i32>().unwrap(), OffsetDateTime::now_utc().year());
    }

    //--- Parsing ----------------------------------------------------------

    #[test]
    fn partial_ron_fills_in_defaults() {
        let config = SessionConfig::from_ron_str(
            r#"(
                title: "Space Dodge",
                can_beat_level: true,
                beat_level_score: 50,
                play_level: "Arena",
                sounds: (lose: Some("lose.ogg")),
            )"#,
        )
        .unwrap();

        assert_eq!(config.title, "Space Dodge");
        assert!(config.can_beat_level);
        assert_eq!(config.beat_level_score, 50);
        assert_eq!(config.play_level, LevelId::from("Arena"));
        assert_eq!(config.sounds.lose.as_deref(), Some("lose.ogg"));
        assert_eq!(config.sounds.beat_level, None);
        assert_eq!(config.lose_message, "Game Over");
    }

    #[test]
    fn malformed_ron_is_a_parse_error() {
        let err = SessionConfig::from_ron_str("(title: )").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn bundled_demo_config_loads() {
        let config = SessionConfig::load(concat!(env!("CARGO_MANIFEST_DIR"), "/demos/session.ron")).unwrap();

        assert_eq!(config.title, "Aetheric Dodge");
        assert_eq!(config.play_level, LevelId::from("Arena"));
        assert!(config.timed_level);
        assert!(config.debug_keys);
    }

    #[test]
    fn missing_file_is_an_io_error() {
        let err = SessionConfig::load("does/not/exist.ron").unwrap_err();
        assert!(matches!(err, ConfigError::Io { .. }));
    }

    //--- Validation -------------------------------------------------------

    #[test]
    fn lives_must_be_in_range() {
        let zero = SessionConfig { default_lives: 0, ..Default::default() };
        let eleven = SessionConfig { default_lives: 11, ..Default::default() };

        assert!(matches!(zero.validate(), Err(ConfigError::LivesOutOfRange(0))));
        assert!(matches!(eleven.validate(), Err(ConfigError::LivesOutOfRange(11))));
    }

    #[test]
    fn beat_level_needs_positive_score() {
        let config = SessionConfig {
            can_beat_level: true,
            beat_level_score: 0,
            ..Default::default()
        };
        assert!(matches!(config.validate(), Err(ConfigError::BeatScoreNotPositive)));

        let unused = SessionConfig { beat_level_score: 0, ..Default::default() };
        assert!(unused.validate().is_ok());
    }

    #[test]
    fn level_ids_must_not_be_empty() {
        let config = SessionConfig { play_level: LevelId::from(""), ..Default::default() };
        assert!(matches!(config.validate(), Err(ConfigError::EmptyLevelId("play_level"))));
    }
}
