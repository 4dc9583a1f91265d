//=========================================================================
// Exit Signal
//=========================================================================
//
// Host control shared between the logic thread (writer) and the platform
// thread (reader). Cloning yields a handle to the same flag.
//
//=========================================================================

//=== External Dependencies ===============================================

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use log::info;

//=== Internal Dependencies ===============================================

use super::HostControl;

//=== ExitSignal ==========================================================

/// Cross-thread "please exit" flag implementing [`HostControl`].
#[derive(Debug, Clone, Default)]
pub struct ExitSignal {
    exit: Arc<AtomicBool>,
    play_mode: Arc<AtomicBool>,
    editor: bool,
}

impl ExitSignal {
    /// Signal for a standalone application.
    pub fn new() -> Self {
        Self::default()
    }

    /// Signal for an interactive editor host, starting in play mode.
    pub fn editor() -> Self {
        Self {
            exit: Arc::new(AtomicBool::new(false)),
            play_mode: Arc::new(AtomicBool::new(true)),
            editor: true,
        }
    }

    pub fn is_exit_requested(&self) -> bool {
        self.exit.load(Ordering::Acquire)
    }

    /// `true` while an editor host is in play mode.
    pub fn is_playing(&self) -> bool {
        self.play_mode.load(Ordering::Acquire)
    }
}

impl HostControl for ExitSignal {
    fn request_exit(&mut self) {
        info!(target: "engine", "Exit requested");
        self.exit.store(true, Ordering::Release);
    }

    fn is_editor_session(&self) -> bool {
        self.editor
    }

    fn stop_play_mode(&mut self) {
        info!(target: "engine", "Leaving play mode");
        self.play_mode.store(false, Ordering::Release);
    }
}

//=========================================================================
// Unit Tests
//=========================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clones_share_the_flag() {
        let mut writer = ExitSignal::new();
        let reader = writer.clone();

        assert!(!reader.is_exit_requested());
        writer.request_exit();
        assert!(reader.is_exit_requested());
    }

    #[test]
    fn editor_signal_tracks_play_mode() {
        let mut signal = ExitSignal::editor();
        assert!(signal.is_editor_session());
        assert!(signal.is_playing());

        signal.stop_play_mode();
        assert!(!signal.is_playing());
    }

    #[test]
    fn standalone_signal_is_not_editor() {
        assert!(!ExitSignal::new().is_editor_session());
    }
}
