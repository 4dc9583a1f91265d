//=========================================================================
// Platform Bridge Interface
//=========================================================================
//
// Messages and errors shared by the platform thread and the logic thread.
//
//=========================================================================

//=== External Dependencies ===============================================

use thiserror::Error;
use winit::error::EventLoopError;

//=== Internal Dependencies ===============================================

use crate::core::input::InputEvent;

//=== PlatformEvent =======================================================

/// Events sent from the platform thread to the logic thread.
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum PlatformEvent {
    /// Keyboard events buffered since the previous frame boundary.
    /// Never sent empty.
    Inputs(Vec<InputEvent>),

    /// The window was closed by the user or the OS.
    WindowClosed,
}

//=== PlatformError =======================================================

/// Failures of the windowing layer. Both are fatal for the run.
#[derive(Debug, Error)]
pub enum PlatformError {
    #[error("event loop creation failed: {0}")]
    EventLoopCreation(#[source] EventLoopError),

    #[error("event loop error: {0}")]
    EventLoopExecution(#[source] EventLoopError),
}
