//=========================================================================
// Event Collector
//=========================================================================
//
// Logic-thread side of the platform channel.
//
// Architecture:
//   Receiver<PlatformEvent> → collect_frame() → input batches → TickControl
//
// Draining is bounded so a flooded channel cannot starve the tick. Pacing
// is left to the orchestrator.
//
//=========================================================================

//=== External Dependencies ===============================================

use crossbeam_channel::{Receiver, TryRecvError};
use log::{debug, warn};

//=== Internal Dependencies ===============================================

use super::PlatformEvent;
use crate::core::input::InputEvent;

//=== Constants ===========================================================

const MAX_EVENTS_PER_FRAME: usize = 100;

//=== TickControl =========================================================

/// Whether the logic loop keeps running after this tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum TickControl {
    Continue,
    Exit,
}

//=== EventCollector ======================================================

/// Drains platform events once per tick.
pub(crate) struct EventCollector {
    receiver: Receiver<PlatformEvent>,
    input_batches: Vec<Vec<InputEvent>>,
}

impl EventCollector {
    pub(crate) fn new(receiver: Receiver<PlatformEvent>) -> Self {
        Self {
            receiver,
            input_batches: Vec::with_capacity(4),
        }
    }

    /// Collects everything the platform sent since the last tick.
    ///
    /// Returns `Exit` when the window closed or the platform hung up.
    pub(crate) fn collect_frame(&mut self) -> TickControl {
        self.input_batches.clear();

        for _ in 0..MAX_EVENTS_PER_FRAME {
            match self.receiver.try_recv() {
                Ok(PlatformEvent::Inputs(batch)) => self.input_batches.push(batch),
                Ok(PlatformEvent::WindowClosed) => {
                    debug!(target: "engine", "Window closed, stopping logic loop");
                    return TickControl::Exit;
                }
                Err(TryRecvError::Disconnected) => {
                    debug!(target: "engine", "Platform channel disconnected");
                    return TickControl::Exit;
                }
                Err(TryRecvError::Empty) => return TickControl::Continue,
            }
        }

        warn!(target: "engine", "Event queue backlog: drained {} events this frame", MAX_EVENTS_PER_FRAME);
        TickControl::Continue
    }

    /// Input batches collected by the last `collect_frame()`.
    pub(crate) fn batches(&self) -> &[Vec<InputEvent>] {
        &self.input_batches
    }
}

//=========================================================================
// Unit Tests
//=========================================================================
