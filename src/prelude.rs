//=========================================================================
// Prelude
//=========================================================================
//
// Convenience module that re-exports commonly used types and traits.
//
// Usage:
//   use aetheric_session::prelude::*;
//
//=========================================================================

//=== Public API ==========================================================

// Engine runtime
pub use crate::engine::{Engine, EngineBuilder};
pub use crate::core::globals::GlobalSystems;
pub use crate::core::{ConfigError, PlatformError};

// Session
pub use crate::core::session::{Phase, SessionConfig, SessionController, SessionState, SoundBank};

// Levels
pub use crate::core::level::{GameplayReport, Level, LevelContext, LevelId, LevelLoader, LevelRegistry, LoadMode};

// Collaborators
pub use crate::core::services::{
    AudioDevice, DisplaySink, ExitSignal, HostControl, MusicTrack, Panel, Position, TextBoard, TextSlot,
};

// Input
pub use crate::core::input::{KeyCode, Modifiers, SessionAction};
