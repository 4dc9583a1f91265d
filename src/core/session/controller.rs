//=========================================================================
// Session Controller
//=========================================================================
//
// Owns the session config and state, exposes the menu/flow operations, and
// runs the per-tick state machine against its collaborators.
//
// Architecture:
//   SessionController<L, D, A, H>
//     ├─ config: SessionConfig         (immutable)
//     ├─ state: SessionState           (score, lives, phase, timer, ...)
//     ├─ loader: L: LevelLoader        (fire-and-forget level requests)
//     ├─ display: D: DisplaySink       (texts, panels)
//     ├─ audio: A: AudioDevice         (background track, cues)
//     └─ host: H: HostControl          (quit)
//
// Tick flow:
//   tick(dt, now, actions)
//     → sanitize dt/now
//     → menu actions (play, menu, restart)
//     → fsm::advance(config, state, TickInput) → Vec<SessionEffect>
//     → apply effects to collaborators
//
//=========================================================================

//=== External Dependencies ===============================================

use log::{debug, info, trace, warn};

//=== Internal Dependencies ===============================================

use super::fsm::{self, SessionEffect, TickInput, MAX_TICK_DELTA};
use super::{Phase, SessionConfig, SessionState};
use crate::core::input::SessionAction;
use crate::core::level::{GameplayReport, LevelId, LevelLoader, LoadMode};
use crate::core::services::{AudioDevice, DisplaySink, HostControl, Panel, Position, TextSlot};

//=== SessionController ===================================================

/// Per-session game-flow controller.
///
/// Constructed once by the host and kept for the whole run. Call
/// [`start`](Self::start) once, then [`tick`](Self::tick) every frame; the
/// flow operations may be called at any time in between.
pub struct SessionController<L, D, A, H> {
    config: SessionConfig,
    state: SessionState,

    loader: L,
    display: D,
    audio: A,
    host: H,

    /// Timestamp of the latest tick.
    clock: f32,

    /// Background volume recorded at start, restored on every play.
    initial_volume: f32,
}

impl<L, D, A, H> SessionController<L, D, A, H>
where
    L: LevelLoader,
    D: DisplaySink,
    A: AudioDevice,
    H: HostControl,
{
    //--- Construction -----------------------------------------------------

    pub fn new(config: SessionConfig, loader: L, display: D, audio: A, host: H) -> Self {
        let state = SessionState::new(&config);
        let initial_volume = audio.volume();
        Self {
            config,
            state,
            loader,
            display,
            audio,
            host,
            clock: 0.0,
            initial_volume,
        }
    }

    //=== Flow Operations =================================================

    /// Writes the config strings, resets the state and shows the menu.
    pub fn start(&mut self) {
        info!(target: "session", "Starting session '{}'", self.config.title);

        self.display.set_text(TextSlot::Title, &self.config.title);
        self.display.set_text(TextSlot::Credits, &self.config.credits);
        self.display.set_text(TextSlot::Copyright, &self.config.copyright);

        self.state = SessionState::new(&self.config);
        self.initial_volume = self.audio.volume();
        self.state.music_volume = self.initial_volume;

        self.hide_menus();
        self.display.set_panel_visible(Panel::Menu, true);
    }

    /// Starts (or restarts) play on the configured play level.
    ///
    /// Score and lives are reset only when leaving the menu, so a level
    /// advance keeps the running score. Each call requests another load.
    pub fn play_game(&mut self) {
        let level = self.config.play_level.clone();
        self.enter_level(level);
    }

    /// Abandons the play-through and returns to the menu.
    pub fn back_to_menu(&mut self) {
        info!(target: "session", "Back to menu");

        self.state.player_dead = false;
        self.state.phase = Phase::Playing;
        self.state.started = false;
        self.state.player_active = false;

        self.hide_menus();
        self.display.set_panel_visible(Panel::Menu, true);

        if self.state.current_level != self.config.menu_level {
            self.loader.unload(&self.state.current_level);
        }
        self.state.current_level = self.config.menu_level.clone();
        self.state.level_to_load = self.config.menu_level.clone();
    }

    /// Restarts the attempt with default score and lives. Idempotent.
    pub fn reset_level(&mut self) {
        debug!(target: "session", "Resetting level");
        self.state.restart_attempt(self.clock);
        self.hide_menus();
        self.state.restore_defaults(&self.config);
    }

    /// Moves on to the level after the one just beaten.
    ///
    /// Score carries over and lives are restored. Without a successor the
    /// play level is replayed.
    pub fn start_next_level(&mut self) {
        self.state.music_faded = false;
        self.state.lives = i32::from(self.config.default_lives);

        let finished = self.state.current_level.clone();
        let next = self
            .loader
            .next_level(&finished)
            .unwrap_or_else(|| self.config.play_level.clone());
        info!(target: "session", "Starting {} after {}", next, finished);

        self.state.level_to_load = next.clone();
        self.enter_level(next);
        self.loader.unload(&finished);
    }

    /// Restarts the play-through with default score and lives.
    pub fn restart_game(&mut self) {
        info!(target: "session", "Restarting game");

        self.state.restore_defaults(&self.config);
        self.state.level_to_load = self.config.menu_level.clone();

        let finished = self.state.current_level.clone();
        self.play_game();
        self.loader.unload(&finished);
    }

    /// Asks the host to terminate, leaving play mode first in an editor.
    pub fn quit(&mut self) {
        info!(target: "session", "Quit requested");
        if self.host.is_editor_session() {
            self.host.stop_play_mode();
        }
        self.host.request_exit();
    }

    //=== Tick ============================================================

    /// Advances the session by one frame.
    ///
    /// `delta_time` is clamped to `[0, MAX_TICK_DELTA]`; a `current_time`
    /// earlier than the previous tick is replaced by the previous tick's.
    pub fn tick(&mut self, delta_time: f32, current_time: f32, actions: &[SessionAction]) {
        let delta_time = self.sanitize_delta(delta_time);
        let current_time = self.sanitize_time(current_time);
        self.clock = current_time;

        self.apply_menu_actions(actions);

        let music = self.audio.background_clip().map(|_| self.audio.volume());
        let has_next_level = self.state.phase == Phase::BeatLevel
            && self.loader.has_next_level(&self.state.current_level);

        let input = TickInput {
            delta_time,
            current_time,
            actions,
            music,
            has_next_level,
        };

        let previous = self.state.phase;
        let effects = fsm::advance(&self.config, &mut self.state, &input);
        if self.state.phase != previous {
            info!(target: "session", "Phase {} -> {}", previous, self.state.phase);
        }

        for effect in effects {
            self.apply(effect);
        }
    }

    //=== Gameplay Hooks ==================================================

    /// Adds points to the running score.
    pub fn add_score(&mut self, points: u32) {
        self.state.score = self.state.score.saturating_add(points);
        trace!(target: "session", "Score {} (+{})", self.state.score, points);
    }

    /// Flags the player as dead; consumed on the next tick.
    pub fn mark_player_dead(&mut self) {
        debug!(target: "session", "Player marked dead");
        self.state.player_dead = true;
    }

    /// Records where cues should play.
    pub fn report_player_position(&mut self, position: Position) {
        self.state.player_position = position;
    }

    /// Expires the level timer; a timed level ends on the next tick.
    pub fn expire_timer(&mut self) {
        if !self.config.timed_level {
            debug!(target: "session", "Ignoring timer expiry on an untimed level");
            return;
        }
        self.state.elapsed_time = -1.0;
    }

    /// Applies what the levels observed during a tick.
    pub fn apply_report(&mut self, report: &GameplayReport) {
        if report.score > 0 {
            self.add_score(report.score);
        }
        if report.player_died {
            self.mark_player_dead();
        }
        if let Some(position) = report.player_position {
            self.report_player_position(position);
        }
    }

    //=== Accessors =======================================================

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    pub fn phase(&self) -> Phase {
        self.state.phase
    }

    pub fn score(&self) -> u32 {
        self.state.score
    }

    pub fn lives(&self) -> i32 {
        self.state.lives
    }

    /// `true` while a play-through is running.
    pub fn is_started(&self) -> bool {
        self.state.started
    }

    /// Timestamp of the latest tick.
    pub fn clock(&self) -> f32 {
        self.clock
    }

    pub fn loader(&self) -> &L {
        &self.loader
    }

    pub fn loader_mut(&mut self) -> &mut L {
        &mut self.loader
    }

    pub fn display(&self) -> &D {
        &self.display
    }

    pub fn audio(&self) -> &A {
        &self.audio
    }

    pub fn host(&self) -> &H {
        &self.host
    }

    //=== Internal Helpers ================================================

    fn enter_level(&mut self, level: LevelId) {
        let from_menu = !self.state.started;

        self.state.restart_attempt(self.clock);
        self.state.end_message = None;
        self.hide_menus();
        if from_menu {
            self.state.restore_defaults(&self.config);
        }
        self.state.level_start_score = self.state.score;

        self.audio.set_volume(self.initial_volume);
        self.state.music_volume = self.initial_volume;

        info!(target: "session", "Playing {}", level);
        self.loader.load(&level, LoadMode::Additive);
        self.state.current_level = level;

        self.display.set_panel_visible(Panel::Hud, true);
        self.push_hud();

        self.state.started = true;
        self.state.player_active = true;
    }

    fn sanitize_delta(&self, delta_time: f32) -> f32 {
        if !delta_time.is_finite() || delta_time < 0.0 {
            warn!(target: "session", "Invalid tick delta {}, using 0", delta_time);
            return 0.0;
        }
        if delta_time > MAX_TICK_DELTA {
            warn!(target: "session", "Tick delta {} clamped to {}", delta_time, MAX_TICK_DELTA);
            return MAX_TICK_DELTA;
        }
        delta_time
    }

    fn sanitize_time(&self, current_time: f32) -> f32 {
        if !current_time.is_finite() || current_time < self.clock {
            warn!(target: "session", "Tick time went from {} to {}, holding", self.clock, current_time);
            return self.clock;
        }
        current_time
    }

    fn apply_menu_actions(&mut self, actions: &[SessionAction]) {
        for action in actions {
            match action {
                SessionAction::Play if !self.state.started => self.play_game(),
                SessionAction::Menu if self.state.started => self.back_to_menu(),
                SessionAction::Restart if self.state.started => self.restart_game(),
                _ => {}
            }
        }
    }

    fn apply(&mut self, effect: SessionEffect) {
        match effect {
            SessionEffect::SetText { slot, value } => self.display.set_text(slot, &value),
            SessionEffect::ShowPanel(panel) => self.display.set_panel_visible(panel, true),
            SessionEffect::HidePanel(panel) => self.display.set_panel_visible(panel, false),
            SessionEffect::SetMusicVolume(volume) => self.audio.set_volume(volume),
            SessionEffect::PlayCue { cue, position } => match cue.clip(&self.config.sounds) {
                Some(clip) => self.audio.play_clip_at(clip, position),
                None => debug!(target: "session", "No clip configured for {:?}", cue),
            },
            SessionEffect::StartNextLevel => self.start_next_level(),
            SessionEffect::Quit => self.quit(),
            SessionEffect::DumpState => self.dump_state(),
        }
    }

    fn hide_menus(&mut self) {
        for panel in Panel::ALL {
            self.display.set_panel_visible(panel, false);
        }
    }

    fn push_hud(&mut self) {
        self.display.set_text(TextSlot::Score, &self.state.score.to_string());
        self.display.set_text(TextSlot::Lives, &self.state.lives.to_string());
        self.display.set_text(TextSlot::Timer, &self.state.timer_text());
    }

    fn dump_state(&self) {
        let state = &self.state;
        info!(target: "session", "Phase: {}", state.phase);
        info!(target: "session", "Player is dead: {}", state.player_dead);
        info!(target: "session", "Score: {} / {}", state.score, self.config.beat_level_score);
        info!(target: "session", "Lives: {}", state.lives);
        info!(target: "session", "Elapsed: {:.2}s", state.elapsed_time);
        info!(target: "session", "Music: {:.2} (faded: {})", state.music_volume, state.music_faded);
        info!(target: "session", "Level: {}", state.current_level);
    }
}

//=========================================================================
// Unit Tests
//=========================================================================
