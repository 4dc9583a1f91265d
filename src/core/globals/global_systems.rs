//=========================================================================
// Global Systems
//=========================================================================
//
// Container for the systems the logic thread updates every tick.
//
// Update pipeline:
//   1. InputSystem   - batches → key state + SessionActions
//   2. Levels        - LevelRegistry::update() → GameplayReport
//   3. Session       - apply report, tick the state machine
//   4. Level queue   - apply load/unload requests made this tick
//
//=========================================================================

//=== External Dependencies ===============================================

use log::info;

//=== Internal Dependencies ===============================================

use crate::core::input::{InputEvent, InputSystem};
use crate::core::level::LevelContext;
use crate::core::platform_bridge::TickControl;
use crate::core::session::EngineSession;

//=== GlobalSystems =======================================================

/// Engine-level systems owned by the logic thread.
///
/// Reach them through [`crate::Engine::init`] to bind keys and register
/// levels before the engine runs.
pub struct GlobalSystems {
    /// Key bindings and per-frame actions.
    pub input: InputSystem,

    /// The session controller and, through its loader, the level registry.
    pub session: EngineSession,
}

impl GlobalSystems {
    pub(crate) fn new(session: EngineSession) -> Self {
        Self {
            input: InputSystem::new(),
            session,
        }
    }

    //--- Lifecycle --------------------------------------------------------

    /// Boots the session into its menu. Called once before the first tick.
    pub(crate) fn start(&mut self) {
        self.session.start();
        self.session.loader_mut().process_requests();
    }

    //--- Update Loop ------------------------------------------------------

    /// Runs one tick of every system.
    pub(crate) fn update(
        &mut self,
        batches: &[Vec<InputEvent>],
        delta_time: f32,
        current_time: f32,
    ) -> TickControl {
        // 1. Input
        self.input.process_frame(batches);

        // 2. Levels report what happened
        let mut context = LevelContext::new(self.input.state(), delta_time);
        self.session.loader_mut().update(&mut context);
        let report = context.into_report();
        if !report.is_empty() {
            self.session.apply_report(&report);
        }

        // 3. Session state machine
        self.session.tick(delta_time, current_time, self.input.actions());

        // 4. Level transitions
        self.session.loader_mut().process_requests();

        if self.session.host().is_exit_requested() {
            info!(target: "engine", "Session requested exit");
            return TickControl::Exit;
        }
        TickControl::Continue
    }
}

//=========================================================================
// Unit Tests
//=========================================================================
