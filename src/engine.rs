//=========================================================================
// Aetheric Session Engine
//
// Main entry point: wires the session controller, the level registry and
// the platform layer together and runs them.
//
// Architecture:
// ```text
//     EngineBuilder  ──build()──>  Engine  ──init()──>  Engine  ──run()──>  [Runtime]
//         │                          │                                       │
//         ├─ with_tps()              └─ GlobalSystems                        ├─ spawns logic thread
//         ├─ with_channel_capacity()    (input, session)                     ├─ runs platform
//         ├─ with_display()                                                  └─ blocks until exit
//         ├─ with_audio()
//         └─ with_editor_session()
// ```
//
//=========================================================================

//=== External Dependencies ===============================================

use crossbeam_channel::{bounded, Receiver, Sender};
use log::{error, info};

//=== Internal Dependencies ===============================================

use crate::core::level::LevelRegistry;
use crate::core::platform_bridge::{PlatformError, PlatformEvent};
use crate::core::services::{AudioDevice, DisplaySink, ExitSignal, MusicTrack, TextBoard};
use crate::core::session::{SessionConfig, SessionController};
use crate::core::{CoreSystemsOrchestrator, GlobalSystems};
use crate::platform::Platform;

//=== EngineBuilder =======================================================

/// Builder for an [`Engine`] running one session.
///
/// # Default Values
///
/// - **TPS**: 60.0 (logic updates per second)
/// - **Channel capacity**: 128 events
/// - **Display**: in-memory [`TextBoard`]
/// - **Audio**: silent [`MusicTrack`]
/// - **Host**: standalone application
///
/// # Examples
///
/// ```no_run
/// use aetheric_session::prelude::*;
///
/// struct Arena;
/// impl Level for Arena {}
///
/// let config = SessionConfig { play_level: LevelId::from("Arena"), ..Default::default() };
///
/// EngineBuilder::new(config)
///     .with_tps(120.0)
///     .with_audio(MusicTrack::new("theme.ogg"))
///     .build()
///     .init(|systems| {
///         systems.session.loader_mut().register("Arena", Arena);
///     })
///     .run()
///     .unwrap();
/// ```
pub struct EngineBuilder {
    config: SessionConfig,
    tps: f64,
    channel_capacity: usize,
    display: Option<Box<dyn DisplaySink>>,
    audio: Option<Box<dyn AudioDevice>>,
    editor_session: bool,
}

impl EngineBuilder {
    /// Creates a builder for `config` with default settings.
    pub fn new(config: SessionConfig) -> Self {
        Self {
            config,
            tps: 60.0,
            channel_capacity: 128,
            display: None,
            audio: None,
            editor_session: false,
        }
    }

    /// Sets the target ticks per second for the logic thread.
    ///
    /// # Panics
    ///
    /// Panics if `tps <= 0.0`.
    pub fn with_tps(mut self, tps: f64) -> Self {
        assert!(tps > 0.0, "TPS must be positive, got {}", tps);
        self.tps = tps;
        self
    }

    /// Sets the channel capacity for platform → core communication.
    ///
    /// # Panics
    ///
    /// Panics if `capacity == 0`.
    pub fn with_channel_capacity(mut self, capacity: usize) -> Self {
        assert!(capacity > 0, "Channel capacity must be positive");
        self.channel_capacity = capacity;
        self
    }

    /// Sets where the session writes its texts and panels.
    pub fn with_display<D: DisplaySink + 'static>(mut self, display: D) -> Self {
        self.display = Some(Box::new(display));
        self
    }

    /// Sets the background track and cue player.
    pub fn with_audio<A: AudioDevice + 'static>(mut self, audio: A) -> Self {
        self.audio = Some(Box::new(audio));
        self
    }

    /// Marks the host as an interactive editor, so quitting leaves play
    /// mode before exiting.
    pub fn with_editor_session(mut self, editor_session: bool) -> Self {
        self.editor_session = editor_session;
        self
    }

    /// Builds the engine. Levels are registered afterwards through
    /// [`Engine::init`].
    pub fn build(self) -> Engine {
        info!(
            target: "engine",
            "Building engine for '{}' (TPS: {}, channel: {})",
            self.config.title, self.tps, self.channel_capacity
        );

        let exit = if self.editor_session { ExitSignal::editor() } else { ExitSignal::new() };
        let display = self.display.unwrap_or_else(|| Box::new(TextBoard::new()));
        let audio = self.audio.unwrap_or_else(|| Box::new(MusicTrack::silent()));
        let title = self.config.title.clone();

        let session = SessionController::new(self.config, LevelRegistry::new(), display, audio, exit.clone());

        Engine {
            orchestrator: CoreSystemsOrchestrator::new(session),
            exit,
            title,
            tps: self.tps,
            channel_capacity: self.channel_capacity,
        }
    }
}

//=== Engine ==============================================================

/// Session engine runtime.
///
/// ```text
/// Engine (Main Thread)
///   ├─► CoreSystemsOrchestrator (Logic Thread @ TPS)
///   │     └─► InputSystem → LevelRegistry → SessionController
///   │
///   └─► Platform (Event Loop)
///         └─► Window, Keyboard
///
/// Communication: crossbeam channel (PlatformEvent), ExitSignal
/// ```
pub struct Engine {
    orchestrator: CoreSystemsOrchestrator,
    exit: ExitSignal,
    title: String,
    tps: f64,
    channel_capacity: usize,
}

impl Engine {
    //--- Initialization ---------------------------------------------------

    /// Configures the systems before the run: register levels, rebind keys.
    pub fn init<F>(mut self, init_fn: F) -> Self
    where
        F: FnOnce(&mut GlobalSystems),
    {
        info!(target: "engine", "Initializing engine systems");
        self.orchestrator.init_systems(init_fn);
        self
    }

    /// Handle to the exit flag shared with the session.
    pub fn exit_signal(&self) -> ExitSignal {
        self.exit.clone()
    }

    //--- Execution --------------------------------------------------------

    /// Runs until the window closes or the session quits.
    ///
    /// 1. Creates the platform → core channel
    /// 2. Spawns the logic thread at the configured TPS
    /// 3. Runs the platform event loop on this thread
    /// 4. Joins the logic thread
    ///
    /// # Errors
    ///
    /// Returns [`PlatformError`] if the event loop cannot be created or
    /// fails while running. The logic thread is still joined.
    pub fn run(self) -> Result<(), PlatformError> {
        info!(target: "engine", "Starting engine runtime (TPS: {})", self.tps);

        let (tx, rx): (Sender<PlatformEvent>, Receiver<PlatformEvent>) = bounded(self.channel_capacity);

        let core_handle = self.orchestrator.spawn_core_thread(rx, self.tps);

        let platform = Platform::new(tx, self.exit, self.title);
        let result = platform.run();
        if let Err(e) = &result {
            error!(target: "engine", "Platform error: {}", e);
        }
        info!(target: "engine", "Platform event loop exited");

        match core_handle.join() {
            Ok(()) => info!(target: "engine", "Core thread terminated cleanly"),
            Err(e) => error!(target: "engine", "Core thread panicked: {:?}", e),
        }

        info!(target: "engine", "Engine shutdown complete");
        result
    }
}

//=========================================================================
// Unit Tests
//=========================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::input::KeyCode;
    use crate::core::input::SessionAction;
    use crate::core::services::HostControl;

    //=====================================================================
    // EngineBuilder Tests
    //=====================================================================

    #[test]
    fn builder_defaults() {
        let builder = EngineBuilder::new(SessionConfig::default());
        assert_eq!(builder.tps, 60.0);
        assert_eq!(builder.channel_capacity, 128);
        assert!(!builder.editor_session);
    }

    #[test]
    #[should_panic(expected = "TPS must be positive")]
    fn builder_with_tps_panics_on_zero() {
        EngineBuilder::new(SessionConfig::default()).with_tps(0.0);
    }

    #[test]
    #[should_panic(expected = "Channel capacity must be positive")]
    fn builder_with_channel_capacity_panics_on_zero() {
        EngineBuilder::new(SessionConfig::default()).with_channel_capacity(0);
    }

    #[test]
    fn builder_fluent_api_chaining() {
        let engine = EngineBuilder::new(SessionConfig::default())
            .with_tps(120.0)
            .with_channel_capacity(256)
            .build();

        assert_eq!(engine.tps, 120.0);
        assert_eq!(engine.channel_capacity, 256);
        assert_eq!(engine.title, "Game Title");
    }

    #[test]
    fn editor_session_reaches_the_exit_signal() {
        let engine = EngineBuilder::new(SessionConfig::default()).with_editor_session(true).build();
        assert!(engine.exit_signal().is_editor_session());
    }

    //=====================================================================
    // Engine Tests
    //=====================================================================

    #[test]
    fn init_exposes_systems() {
        let mut bound = false;
        let _engine = EngineBuilder::new(SessionConfig::default()).build().init(|systems| {
            systems.input.bind_key(KeyCode::KeyQ, SessionAction::Quit);
            assert!(!systems.session.is_started());
            bound = true;
        });
        assert!(bound);
    }
}
