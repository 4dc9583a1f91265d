//=========================================================================
// Session
//=========================================================================
//
// Per-session game flow: score, lives, timer and the phase state machine
// (Playing, Death, BeatLevel, GameOver), plus the menu operations that
// start, restart and abandon a play-through.
//
// Architecture:
//   SessionConfig     - immutable settings, loaded from RON
//   SessionState      - mutable play-through state
//   fsm::advance()    - pure per-tick transition, returns SessionEffects
//   SessionController - owns both, runs advance() and executes effects
//
//=========================================================================

//=== Module Declarations =================================================

mod config;
mod controller;
pub mod fsm;
mod state;

//=== Public API ==========================================================

pub use config::{SessionConfig, SoundBank, LIVES_RANGE};
pub use controller::SessionController;
pub use fsm::{SessionEffect, SoundCue, TickInput};
pub use state::{Phase, SessionState};

//=== Internal Dependencies ===============================================

use crate::core::level::LevelRegistry;
use crate::core::services::{AudioDevice, DisplaySink, ExitSignal};

//=== Type Aliases ========================================================

/// Session controller as wired by the engine runtime.
pub type EngineSession = SessionController<LevelRegistry, Box<dyn DisplaySink>, Box<dyn AudioDevice>, ExitSignal>;
