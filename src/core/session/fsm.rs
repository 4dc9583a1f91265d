//=========================================================================
// Session State Machine
//=========================================================================
//
// Pure per-tick advance of the session state machine.
//
// `advance()` reads the config and a sampled `TickInput`, mutates only the
// `SessionState` it is given, and returns the side effects it wants
// performed. The controller samples collaborators into the input and
// executes the effects, so this file never touches audio, display or
// levels.
//
// Per tick:
//   1. Sampled actions (quit, diagnostics)
//   2. Stop if no play-through is running
//   3. Push score and lives
//   4. Phase logic
//
//   Playing ──dead, lives > 0──► Playing (lives - 1, attempt restarted)
//      │ ──dead, lives <= 0────► Death ──fade done──► GameOver
//      │ ──level target met────► BeatLevel ──fade done──┬─► Playing (next level)
//      └ ──timer expired───────► GameOver               └─► GameOver (win)
//
//=========================================================================

//=== External Dependencies ===============================================

use log::{debug, info};

//=== Internal Dependencies ===============================================

use super::{Phase, SessionConfig, SessionState, SoundBank};
use crate::core::input::SessionAction;
use crate::core::services::{Panel, Position, TextSlot};

//=== Constants ===========================================================

/// Volume removed per tick while dying. Not scaled by delta time.
pub const DEATH_FADE_STEP: f32 = 0.01;

/// Volume removed per second after beating a level.
pub const BEAT_LEVEL_FADE_RATE: f32 = 1.0;

/// Volumes at or below this snap to silence.
pub const FADE_FLOOR: f32 = 1e-4;

/// Longest tick the controller accepts, in seconds.
pub const MAX_TICK_DELTA: f32 = 0.25;

//=== SoundCue ============================================================

/// One-shot cues the session can ask for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SoundCue {
    Lose,
    BeatLevel,
}

impl SoundCue {
    /// Clip configured for this cue, if any.
    pub fn clip<'a>(&self, sounds: &'a SoundBank) -> Option<&'a str> {
        match self {
            SoundCue::Lose => sounds.lose.as_deref(),
            SoundCue::BeatLevel => sounds.beat_level.as_deref(),
        }
    }
}

//=== SessionEffect =======================================================

/// Side effect requested by [`advance`].
#[derive(Debug, Clone, PartialEq)]
pub enum SessionEffect {
    SetText { slot: TextSlot, value: String },
    ShowPanel(Panel),
    HidePanel(Panel),
    SetMusicVolume(f32),
    PlayCue { cue: SoundCue, position: Position },
    StartNextLevel,
    Quit,
    DumpState,
}

impl SessionEffect {
    fn text(slot: TextSlot, value: impl Into<String>) -> Self {
        SessionEffect::SetText { slot, value: value.into() }
    }
}

//=== TickInput ===========================================================

/// Everything `advance()` samples from outside the session state.
#[derive(Debug, Clone, Copy)]
pub struct TickInput<'a> {
    /// Seconds since the previous tick, already clamped.
    pub delta_time: f32,

    /// Monotonic timestamp of this tick.
    pub current_time: f32,

    /// Actions triggered this tick.
    pub actions: &'a [SessionAction],

    /// Background-track volume, or `None` when no clip is assigned.
    pub music: Option<f32>,

    /// The loader knows a level after the current one.
    pub has_next_level: bool,
}

impl<'a> TickInput<'a> {
    pub fn new(delta_time: f32, current_time: f32) -> Self {
        Self {
            delta_time,
            current_time,
            actions: &[],
            music: None,
            has_next_level: false,
        }
    }

    pub fn with_actions(mut self, actions: &'a [SessionAction]) -> Self {
        self.actions = actions;
        self
    }

    pub fn with_music(mut self, volume: f32) -> Self {
        self.music = Some(volume);
        self
    }

    pub fn with_next_level(mut self, has_next_level: bool) -> Self {
        self.has_next_level = has_next_level;
        self
    }
}

//=== Advance =============================================================

/// Advances the state machine by one tick.
pub fn advance(config: &SessionConfig, state: &mut SessionState, input: &TickInput<'_>) -> Vec<SessionEffect> {
    let mut effects = Vec::new();

    apply_actions(config, state, input.actions, &mut effects);

    if !state.started {
        return effects;
    }

    effects.push(SessionEffect::text(TextSlot::Score, state.score.to_string()));
    effects.push(SessionEffect::text(TextSlot::Lives, state.lives.to_string()));

    match state.phase {
        Phase::Playing => playing(config, state, input, &mut effects),
        Phase::Death => death(config, state, input, &mut effects),
        Phase::BeatLevel => beat_level(config, state, input, &mut effects),
        Phase::GameOver => game_over(state, &mut effects),
    }

    effects
}

//=== Actions =============================================================

fn apply_actions(
    config: &SessionConfig,
    state: &mut SessionState,
    actions: &[SessionAction],
    effects: &mut Vec<SessionEffect>,
) {
    for action in actions {
        match action {
            SessionAction::Quit => effects.push(SessionEffect::Quit),
            action if action.is_diagnostic() && !config.debug_keys => {
                debug!(target: "session", "Ignoring {:?}, debug keys are disabled", action);
            }
            SessionAction::ForceGameOver => {
                info!(target: "session", "Forcing game over");
                state.phase = Phase::GameOver;
            }
            SessionAction::DebugLoseLife => {
                state.lives -= 1;
                info!(target: "session", "Debug life lost, {} left", state.lives);
            }
            SessionAction::DebugPrint => effects.push(SessionEffect::DumpState),
            // Menu actions are handled by the controller before advancing.
            SessionAction::Play | SessionAction::Menu | SessionAction::Restart => {}
        }
    }
}

//=== Phases ==============================================================

fn playing(config: &SessionConfig, state: &mut SessionState, input: &TickInput<'_>, effects: &mut Vec<SessionEffect>) {
    //--- Life Loss --------------------------------------------------------
    if state.player_dead {
        if state.lives > 0 {
            state.lives -= 1;
            state.restart_attempt(input.current_time);
            info!(target: "session", "Player died, {} lives left", state.lives);
            effects.push(SessionEffect::text(TextSlot::Lives, state.lives.to_string()));
        } else {
            info!(target: "session", "Player died with no lives left");
            state.phase = Phase::Death;
            return;
        }
    }

    //--- Beat Level -------------------------------------------------------
    if config.can_beat_level && state.level_score() >= config.beat_level_score {
        info!(target: "session", "Level beaten with score {}", state.score);
        state.phase = Phase::BeatLevel;
        return;
    }

    //--- Timer ------------------------------------------------------------
    if config.timed_level {
        if state.elapsed_time < 0.0 {
            info!(target: "session", "Timer expired");
            state.phase = Phase::GameOver;
            return;
        }

        state.elapsed_time = (input.current_time - state.start_time).max(0.0);
        effects.push(SessionEffect::text(TextSlot::Timer, state.timer_text()));
    }
}

fn death(config: &SessionConfig, state: &mut SessionState, input: &TickInput<'_>, effects: &mut Vec<SessionEffect>) {
    if let Some(volume) = input.music {
        let volume = fade(volume, DEATH_FADE_STEP);
        state.music_volume = volume;
        effects.push(SessionEffect::SetMusicVolume(volume));
        if volume > 0.0 {
            return;
        }
    }

    effects.push(SessionEffect::PlayCue { cue: SoundCue::Lose, position: state.player_position });
    end_game(state, &config.lose_message, effects);
}

fn beat_level(config: &SessionConfig, state: &mut SessionState, input: &TickInput<'_>, effects: &mut Vec<SessionEffect>) {
    if let Some(volume) = input.music {
        let volume = fade(volume, BEAT_LEVEL_FADE_RATE * input.delta_time);
        state.music_volume = volume;
        effects.push(SessionEffect::SetMusicVolume(volume));
        if volume <= 0.0 {
            state.music_faded = true;
        }
    }

    if !state.music_faded && input.music.is_some() {
        return;
    }

    effects.push(SessionEffect::PlayCue { cue: SoundCue::BeatLevel, position: state.player_position });
    if input.has_next_level {
        info!(target: "session", "Advancing past {}", state.current_level);
        effects.push(SessionEffect::StartNextLevel);
    } else {
        end_game(state, &config.win_message, effects);
    }
}

fn game_over(state: &mut SessionState, effects: &mut Vec<SessionEffect>) {
    state.player_active = false;
    effects.push(SessionEffect::HidePanel(Panel::Menu));
    effects.push(SessionEffect::HidePanel(Panel::Hud));
    effects.push(SessionEffect::ShowPanel(Panel::EndScreen));
    effects.push(SessionEffect::ShowPanel(Panel::Footer));
}

//=== Helpers =============================================================

fn fade(volume: f32, step: f32) -> f32 {
    let next = volume - step;
    if next <= FADE_FLOOR {
        0.0
    } else {
        next
    }
}

fn end_game(state: &mut SessionState, message: &str, effects: &mut Vec<SessionEffect>) {
    info!(target: "session", "Game over: {}", message);
    state.end_message = Some(message.to_owned());
    state.phase = Phase::GameOver;
    effects.push(SessionEffect::text(TextSlot::EndMessage, message));
}

//=========================================================================
// Unit Tests
//=========================================================================

#[cfg(test)]
mod tests {
    use super::*;

    //--- Test Helpers -----------------------------------------------------

    fn config() -> SessionConfig {
        SessionConfig {
            can_beat_level: true,
            beat_level_score: 20,
            default_lives: 3,
            sounds: SoundBank { lose: Some("lose".into()), beat_level: Some("win".into()) },
            ..Default::default()
        }
    }

    fn started(config: &SessionConfig) -> SessionState {
        let mut state = SessionState::new(config);
        state.started = true;
        state.player_active = true;
        state.current_level = config.play_level.clone();
        state
    }

    fn text(effects: &[SessionEffect], slot: TextSlot) -> Option<&str> {
        effects.iter().rev().find_map(|effect| match effect {
            SessionEffect::SetText { slot: s, value } if *s == slot => Some(value.as_str()),
            _ => None,
        })
    }

    fn cues(effects: &[SessionEffect]) -> Vec<SoundCue> {
        effects
            .iter()
            .filter_map(|effect| match effect {
                SessionEffect::PlayCue { cue, .. } => Some(*cue),
                _ => None,
            })
            .collect()
    }

    //--- Gating -----------------------------------------------------------

    #[test]
    fn nothing_advances_in_the_menu() {
        let config = config();
        let mut state = SessionState::new(&config);
        state.player_dead = true;

        let effects = advance(&config, &mut state, &TickInput::new(0.016, 1.0));

        assert!(effects.is_empty());
        assert_eq!(state.lives, 3);
    }

    #[test]
    fn score_and_lives_are_pushed_every_tick() {
        let config = config();
        let mut state = started(&config);
        state.score = 7;

        let effects = advance(&config, &mut state, &TickInput::new(0.016, 1.0));

        assert_eq!(text(&effects, TextSlot::Score), Some("7"));
        assert_eq!(text(&effects, TextSlot::Lives), Some("3"));
    }

    //--- Actions ----------------------------------------------------------

    #[test]
    fn quit_is_always_honoured() {
        let config = config();
        let mut state = SessionState::new(&config);

        let effects = advance(&config, &mut state, &TickInput::new(0.016, 1.0).with_actions(&[SessionAction::Quit]));

        assert_eq!(effects, vec![SessionEffect::Quit]);
    }

    #[test]
    fn diagnostics_need_debug_keys() {
        let config = config();
        let mut state = started(&config);
        let actions = [SessionAction::ForceGameOver, SessionAction::DebugLoseLife, SessionAction::DebugPrint];

        let effects = advance(&config, &mut state, &TickInput::new(0.016, 1.0).with_actions(&actions));

        assert_eq!(state.phase, Phase::Playing);
        assert_eq!(state.lives, 3);
        assert!(!effects.contains(&SessionEffect::DumpState));
    }

    #[test]
    fn diagnostics_apply_with_debug_keys() {
        let config = SessionConfig { debug_keys: true, ..config() };
        let mut state = started(&config);
        let actions = [SessionAction::DebugLoseLife, SessionAction::DebugPrint, SessionAction::ForceGameOver];

        let effects = advance(&config, &mut state, &TickInput::new(0.016, 1.0).with_actions(&actions));

        assert_eq!(state.lives, 2);
        assert_eq!(state.phase, Phase::GameOver);
        assert!(effects.contains(&SessionEffect::DumpState));
        assert!(effects.contains(&SessionEffect::ShowPanel(Panel::EndScreen)));
    }

    //--- Playing ----------------------------------------------------------

    #[test]
    fn death_with_lives_left_costs_one_life() {
        let config = config();
        for lives in 2..=5 {
            let mut state = started(&config);
            state.lives = lives;
            state.player_dead = true;
            state.start_time = 1.0;

            let effects = advance(&config, &mut state, &TickInput::new(0.016, 4.0));

            assert_eq!(state.lives, lives - 1);
            assert_eq!(state.phase, Phase::Playing);
            assert!(!state.player_dead);
            assert_eq!(state.start_time, 4.0);
            assert_eq!(text(&effects, TextSlot::Lives), Some((lives - 1).to_string().as_str()));
        }
    }

    #[test]
    fn death_without_lives_enters_death_once() {
        let config = config();
        let mut state = started(&config);
        state.lives = 0;
        state.player_dead = true;

        advance(&config, &mut state, &TickInput::new(0.016, 1.0));
        assert_eq!(state.phase, Phase::Death);
        assert_eq!(state.lives, 0);

        advance(&config, &mut state, &TickInput::new(0.016, 1.1).with_music(1.0));
        assert_eq!(state.phase, Phase::Death);
        assert_eq!(state.lives, 0);
    }

    #[test]
    fn reaching_target_score_beats_the_level_regardless_of_lives() {
        let config = config();
        for lives in [0, 1, 3] {
            let mut state = started(&config);
            state.lives = lives;
            state.score = 20;

            advance(&config, &mut state, &TickInput::new(0.016, 1.0));

            assert_eq!(state.phase, Phase::BeatLevel);
        }
    }

    #[test]
    fn carried_score_does_not_count_toward_the_next_target() {
        let config = config();
        let mut state = started(&config);
        state.score = 25;
        state.level_start_score = 25;

        advance(&config, &mut state, &TickInput::new(0.016, 1.0));
        assert_eq!(state.phase, Phase::Playing);

        state.score = 44;
        advance(&config, &mut state, &TickInput::new(0.016, 1.1));
        assert_eq!(state.phase, Phase::Playing);

        state.score = 45;
        advance(&config, &mut state, &TickInput::new(0.016, 1.2));
        assert_eq!(state.phase, Phase::BeatLevel);
    }

    #[test]
    fn death_wins_over_beat_level_and_timer() {
        let config = SessionConfig { timed_level: true, ..config() };
        let mut state = started(&config);
        state.lives = 0;
        state.player_dead = true;
        state.score = 99;
        state.elapsed_time = -1.0;

        advance(&config, &mut state, &TickInput::new(0.016, 1.0));

        assert_eq!(state.phase, Phase::Death);
    }

    #[test]
    fn beat_level_wins_over_timer_expiry() {
        let config = SessionConfig { timed_level: true, ..config() };
        let mut state = started(&config);
        state.score = 20;
        state.elapsed_time = -1.0;

        advance(&config, &mut state, &TickInput::new(0.016, 1.0));

        assert_eq!(state.phase, Phase::BeatLevel);
    }

    #[test]
    fn beat_level_disabled_ignores_score() {
        let config = SessionConfig { can_beat_level: false, ..config() };
        let mut state = started(&config);
        state.score = 1000;

        advance(&config, &mut state, &TickInput::new(0.016, 1.0));

        assert_eq!(state.phase, Phase::Playing);
    }

    //--- Timer ------------------------------------------------------------

    #[test]
    fn timer_tracks_time_since_start() {
        let config = SessionConfig { timed_level: true, ..config() };
        let mut state = started(&config);
        state.start_time = 2.0;

        let mut last = 0.0;
        for step in 1..=20 {
            let now = 2.0 + step as f32 * 0.05;
            let effects = advance(&config, &mut state, &TickInput::new(0.05, now));

            assert!(state.elapsed_time >= last);
            assert!((state.elapsed_time - (now - 2.0)).abs() < 1e-5);
            assert_eq!(text(&effects, TextSlot::Timer), Some(state.timer_text().as_str()));
            last = state.elapsed_time;
        }
    }

    #[test]
    fn expired_timer_ends_the_game() {
        let config = SessionConfig { timed_level: true, ..config() };
        let mut state = started(&config);
        state.elapsed_time = -1.0;

        advance(&config, &mut state, &TickInput::new(0.016, 1.0));

        assert_eq!(state.phase, Phase::GameOver);
    }

    #[test]
    fn untimed_level_leaves_timer_alone() {
        let config = config();
        let mut state = started(&config);

        let effects = advance(&config, &mut state, &TickInput::new(0.016, 5.0));

        assert_eq!(state.elapsed_time, 0.0);
        assert_eq!(text(&effects, TextSlot::Timer), None);
    }

    //--- Death ------------------------------------------------------------

    #[test]
    fn death_fade_takes_exactly_three_ticks_from_three_percent() {
        let config = config();
        let mut state = started(&config);
        state.phase = Phase::Death;
        state.player_position = Position::new(4.0, 0.0, 2.0);

        let mut volume = 0.03;
        for tick in 1..=3 {
            let effects = advance(&config, &mut state, &TickInput::new(0.016, tick as f32).with_music(volume));
            volume = state.music_volume;

            if tick < 3 {
                assert!(volume > 0.0);
                assert_eq!(state.phase, Phase::Death);
                assert!(cues(&effects).is_empty());
            } else {
                assert_eq!(volume, 0.0);
                assert_eq!(state.phase, Phase::GameOver);
                assert_eq!(state.end_message.as_deref(), Some("Game Over"));
                assert_eq!(text(&effects, TextSlot::EndMessage), Some("Game Over"));
                assert!(effects.contains(&SessionEffect::PlayCue {
                    cue: SoundCue::Lose,
                    position: Position::new(4.0, 0.0, 2.0),
                }));
            }
        }
    }

    #[test]
    fn death_fade_ignores_delta_time() {
        let config = config();
        let mut state = started(&config);
        state.phase = Phase::Death;

        advance(&config, &mut state, &TickInput::new(0.2, 1.0).with_music(0.5));

        assert!((state.music_volume - 0.49).abs() < 1e-6);
    }

    #[test]
    fn death_without_music_ends_immediately() {
        let config = config();
        let mut state = started(&config);
        state.phase = Phase::Death;

        advance(&config, &mut state, &TickInput::new(0.016, 1.0));

        assert_eq!(state.phase, Phase::GameOver);
        assert_eq!(state.end_message.as_deref(), Some("Game Over"));
    }

    //--- Beat Level -------------------------------------------------------

    #[test]
    fn beat_level_fade_scales_with_delta_time() {
        let config = config();
        let mut state = started(&config);
        state.phase = Phase::BeatLevel;

        let effects = advance(&config, &mut state, &TickInput::new(0.25, 1.0).with_music(1.0));

        assert_eq!(effects.last(), Some(&SessionEffect::SetMusicVolume(0.75)));
        assert_eq!(state.phase, Phase::BeatLevel);
        assert!(!state.music_faded);
    }

    #[test]
    fn beat_level_without_music_completes_immediately() {
        let config = config();
        let mut state = started(&config);
        state.phase = Phase::BeatLevel;

        let effects = advance(&config, &mut state, &TickInput::new(0.016, 1.0).with_next_level(true));

        assert_eq!(cues(&effects), vec![SoundCue::BeatLevel]);
        assert!(effects.contains(&SessionEffect::StartNextLevel));
    }

    #[test]
    fn beat_level_without_next_level_is_a_win() {
        let config = config();
        for (lives, score) in [(0, 0), (3, 20), (-2, 500)] {
            let mut state = started(&config);
            state.phase = Phase::BeatLevel;
            state.lives = lives;
            state.score = score;

            let effects = advance(&config, &mut state, &TickInput::new(0.5, 1.0).with_music(0.4));

            assert_eq!(state.phase, Phase::GameOver);
            assert!(state.music_faded);
            assert_eq!(state.end_message.as_deref(), Some("You Win!"));
            assert!(!effects.contains(&SessionEffect::StartNextLevel));
        }
    }

    #[test]
    fn faded_music_with_next_level_requests_next_level() {
        let config = config();
        let mut state = started(&config);
        state.phase = Phase::BeatLevel;

        let effects = advance(&config, &mut state, &TickInput::new(0.1, 1.0).with_music(0.05).with_next_level(true));

        assert!(effects.contains(&SessionEffect::StartNextLevel));
        assert_eq!(state.end_message, None);
    }

    //--- Game Over --------------------------------------------------------

    #[test]
    fn game_over_shows_end_screen_and_stays_put() {
        let config = config();
        let mut state = started(&config);
        state.phase = Phase::GameOver;
        state.score = 500;
        state.player_dead = true;

        for tick in 0..3 {
            let effects = advance(&config, &mut state, &TickInput::new(0.016, tick as f32));

            assert_eq!(state.phase, Phase::GameOver);
            assert!(!state.player_active);
            assert!(effects.contains(&SessionEffect::HidePanel(Panel::Hud)));
            assert!(effects.contains(&SessionEffect::ShowPanel(Panel::EndScreen)));
            assert!(effects.contains(&SessionEffect::ShowPanel(Panel::Footer)));
        }
    }

    //--- Helpers ----------------------------------------------------------

    #[test]
    fn fade_snaps_near_zero_to_silence() {
        assert_eq!(fade(0.01, 0.01), 0.0);
        assert_eq!(fade(0.00005, 0.0), 0.0);
        assert_eq!(fade(0.2, 0.5), 0.0);
        assert!((fade(0.5, 0.1) - 0.4).abs() < 1e-6);
    }

    #[test]
    fn cues_resolve_configured_clips() {
        let sounds = SoundBank { lose: Some("lose".into()), beat_level: None };
        assert_eq!(SoundCue::Lose.clip(&sounds), Some("lose"));
        assert_eq!(SoundCue::BeatLevel.clip(&sounds), None);
    }
}
