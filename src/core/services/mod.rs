//=========================================================================
// Session Services
//=========================================================================
//
// Capabilities the session controller consumes but does not implement:
// on-screen text, audio playback and host/application control. The level
// loader lives next to the level registry in `core::level`.
//
// Each capability is a trait so hosts can plug in their own backend. The
// crate ships an in-memory implementation of each, used by the engine
// runtime and by tests.
//
//=========================================================================

//=== Module Declarations =================================================

mod audio;
mod display;
mod host;

//=== Public API ==========================================================

pub use audio::MusicTrack;
pub use display::TextBoard;
pub use host::ExitSignal;

//=== External Dependencies ===============================================

use serde::{Deserialize, Serialize};

//=== Shared Types ========================================================

/// World-space position used to place one-shot sounds.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Position {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

impl Position {
    pub const ORIGIN: Self = Self { x: 0.0, y: 0.0, z: 0.0 };

    pub const fn new(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z }
    }
}

/// Text widgets the session writes to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TextSlot {
    Title,
    Credits,
    Copyright,
    EndMessage,
    Score,
    Lives,
    Timer,
}

/// Overlay panels the session shows and hides.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Panel {
    Menu,
    Hud,
    EndScreen,
    Footer,
}

impl Panel {
    /// Every panel, in draw order.
    pub const ALL: [Panel; 4] = [Panel::Menu, Panel::Hud, Panel::EndScreen, Panel::Footer];
}

//=== DisplaySink =========================================================

/// Receives text values and panel visibility from the session.
///
/// Implementations must tolerate slots or panels they don't render.
pub trait DisplaySink: Send {
    fn set_text(&mut self, slot: TextSlot, value: &str);

    fn set_panel_visible(&mut self, panel: Panel, visible: bool);
}

impl<T: DisplaySink + ?Sized> DisplaySink for Box<T> {
    fn set_text(&mut self, slot: TextSlot, value: &str) {
        (**self).set_text(slot, value)
    }

    fn set_panel_visible(&mut self, panel: Panel, visible: bool) {
        (**self).set_panel_visible(panel, visible)
    }
}

//=== AudioDevice =========================================================

/// Background music track plus one-shot clip playback.
pub trait AudioDevice: Send {
    /// Plays a one-shot clip at a world position.
    fn play_clip_at(&mut self, clip: &str, position: Position);

    /// Name of the clip assigned to the background track, if any.
    fn background_clip(&self) -> Option<&str>;

    /// Current background-track volume in [0, 1].
    fn volume(&self) -> f32;

    /// Sets the background-track volume; values are clamped to [0, 1].
    fn set_volume(&mut self, volume: f32);
}

impl<T: AudioDevice + ?Sized> AudioDevice for Box<T> {
    fn play_clip_at(&mut self, clip: &str, position: Position) {
        (**self).play_clip_at(clip, position)
    }

    fn background_clip(&self) -> Option<&str> {
        (**self).background_clip()
    }

    fn volume(&self) -> f32 {
        (**self).volume()
    }

    fn set_volume(&mut self, volume: f32) {
        (**self).set_volume(volume)
    }
}

//=== HostControl =========================================================

/// Application-level control handed to the session for `quit()`.
pub trait HostControl: Send {
    /// Asks the application to terminate.
    fn request_exit(&mut self);

    /// `true` when running inside an interactive editor/debug host.
    fn is_editor_session(&self) -> bool {
        false
    }

    /// Asks an editor host to leave play mode. No-op elsewhere.
    fn stop_play_mode(&mut self) {}
}
