//=========================================================================
// Session State
//=========================================================================
//
// Mutable state of one play-through, owned by the session controller.
//
//=========================================================================

//=== External Dependencies ===============================================

use std::fmt;

//=== Internal Dependencies ===============================================

use super::SessionConfig;
use crate::core::level::LevelId;
use crate::core::services::Position;

//=== Phase ===============================================================

/// Current node of the session state machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Phase {
    #[default]
    Playing,
    Death,
    GameOver,
    BeatLevel,
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Phase::Playing => "Playing",
            Phase::Death => "Death",
            Phase::GameOver => "GameOver",
            Phase::BeatLevel => "BeatLevel",
        };
        f.write_str(name)
    }
}

//=== SessionState ========================================================

#[derive(Debug, Clone, PartialEq)]
pub struct SessionState {
    pub score: u32,

    /// Score carried into the current level. The beat-level target counts
    /// only points earned on top of it.
    pub level_start_score: u32,

    /// Remaining lives. Only the debug action can push this below zero.
    pub lives: i32,

    pub phase: Phase,

    /// Seconds into the current attempt. Negative means the timer expired.
    pub elapsed_time: f32,

    /// Tick timestamp at which the current attempt began.
    pub start_time: f32,

    pub player_dead: bool,

    /// Background-track volume as last driven by a fade.
    pub music_volume: f32,

    /// The beat-level fade ran to completion.
    pub music_faded: bool,

    pub current_level: LevelId,
    pub level_to_load: LevelId,

    /// A play-through is running. False while parked in the menu.
    pub started: bool,

    pub player_active: bool,
    pub player_position: Position,
    pub end_message: Option<String>,
}

impl SessionState {
    /// Fresh state for `config`, parked in the menu.
    pub fn new(config: &SessionConfig) -> Self {
        Self {
            score: config.default_score,
            level_start_score: config.default_score,
            lives: i32::from(config.default_lives),
            phase: Phase::Playing,
            elapsed_time: 0.0,
            start_time: 0.0,
            player_dead: false,
            music_volume: 1.0,
            music_faded: false,
            current_level: config.menu_level.clone(),
            level_to_load: config.menu_level.clone(),
            started: false,
            player_active: false,
            player_position: Position::ORIGIN,
            end_message: None,
        }
    }

    /// Restores score and lives to the configured defaults.
    pub fn restore_defaults(&mut self, config: &SessionConfig) {
        self.score = config.default_score;
        self.level_start_score = config.default_score;
        self.lives = i32::from(config.default_lives);
    }

    /// Points earned since the current level was entered.
    pub fn level_score(&self) -> u32 {
        self.score.saturating_sub(self.level_start_score)
    }

    /// Starts a new attempt at `now` without touching score or lives.
    pub fn restart_attempt(&mut self, now: f32) {
        self.player_dead = false;
        self.start_time = now;
        self.elapsed_time = 0.0;
        self.phase = Phase::Playing;
        self.music_faded = false;
    }

    /// Timer text as shown on the HUD.
    pub fn timer_text(&self) -> String {
        format!("{:.2}", self.elapsed_time.max(0.0))
    }
}

//=========================================================================
// Unit Tests
//=========================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_state_uses_config_defaults() {
        let config = SessionConfig { default_score: 5, default_lives: 7, ..Default::default() };
        let state = SessionState::new(&config);

        assert_eq!(state.score, 5);
        assert_eq!(state.lives, 7);
        assert_eq!(state.phase, Phase::Playing);
        assert!(!state.started);
        assert_eq!(state.current_level, config.menu_level);
    }

    #[test]
    fn restart_attempt_keeps_score_and_lives() {
        let config = SessionConfig::default();
        let mut state = SessionState::new(&config);
        state.score = 12;
        state.lives = 1;
        state.player_dead = true;
        state.elapsed_time = 4.5;
        state.phase = Phase::Death;

        state.restart_attempt(9.0);

        assert_eq!(state.score, 12);
        assert_eq!(state.lives, 1);
        assert!(!state.player_dead);
        assert_eq!(state.start_time, 9.0);
        assert_eq!(state.elapsed_time, 0.0);
        assert_eq!(state.phase, Phase::Playing);
    }

    #[test]
    fn level_score_counts_points_since_level_entry() {
        let config = SessionConfig { default_score: 2, ..Default::default() };
        let mut state = SessionState::new(&config);
        state.score = 30;
        state.level_start_score = 25;
        assert_eq!(state.level_score(), 5);

        state.restore_defaults(&config);
        assert_eq!(state.level_start_score, 2);
        assert_eq!(state.level_score(), 0);
    }

    #[test]
    fn timer_text_has_two_decimals() {
        let mut state = SessionState::new(&SessionConfig::default());
        state.elapsed_time = 3.14159;
        assert_eq!(state.timer_text(), "3.14");
        state.elapsed_time = -1.0;
        assert_eq!(state.timer_text(), "0.00");
    }
}
