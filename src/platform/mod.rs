//=========================================================================
// Platform Subsystem
//
// Bridges Winit (OS-level events) with the logic thread.
//
// Architecture:
// ```text
//  Main Thread:                     Logic Thread:
//  ┌──────────────────────────┐    ┌──────────────────┐
//  │  Winit Event Loop        │    │  InputSystem     │
//  │   ↓                      │    │  ↓               │
//  │  InputProcessor          │    │  LevelRegistry   │
//  │   ├─ Converts keys       │    │  ↓               │
//  │   └─ Drops repeats       │    │  Session         │
//  │   ↓                      │    └──────────────────┘
//  │  InputBuffer             │        ↑          │
//  │   ↓                      │        │          │ ExitSignal
//  │  RedrawRequested (flush) │        │          │
//  │   ↓                      │        │          │
//  │  crossbeam channel ──────┼────────┘          │
//  │  about_to_wait ◄─────────┼───────────────────┘
//  └──────────────────────────┘
// ```
//
// Key Design Decisions:
// - RedrawRequested is the frame boundary: all keys buffered since the
//   previous one go out as a single batch
// - A dead core thread only costs dropped events; the window stays
//   closable
// - Winit needs the main thread on macOS/iOS, so this runs on the thread
//   that called `Engine::run()`
//
//=========================================================================

//=== Submodules ==========================================================

mod input_buffer;
mod input_processor;

//=== External Crates =====================================================

use crossbeam_channel::Sender;
use log::*;
use winit::{
    application::ApplicationHandler,
    dpi::LogicalSize,
    event::WindowEvent,
    event_loop::{ActiveEventLoop, EventLoop},
    window::{Window, WindowAttributes, WindowId},
};

//=== Internal Imports ====================================================

use crate::core::platform_bridge::{PlatformError, PlatformEvent};
use crate::core::services::ExitSignal;
use input_buffer::InputBuffer;
use input_processor::InputProcessor;

//=== Platform ============================================================

/// Window owner and keyboard event forwarder.
///
/// Not `Send`: it lives on the main thread and talks to the logic thread
/// only through the channel and the [`ExitSignal`].
pub(crate) struct Platform {
    /// Created lazily in `resumed()`.
    window: Option<Window>,
    title: String,

    buffer: InputBuffer,
    input_processor: InputProcessor,

    event_sender: Sender<PlatformEvent>,
    exit: ExitSignal,
}

impl Platform {
    //--- Construction -----------------------------------------------------

    pub(crate) fn new(event_sender: Sender<PlatformEvent>, exit: ExitSignal, title: impl Into<String>) -> Self {
        info!(target: "platform", "Platform subsystem initialized");
        Self {
            window: None,
            title: title.into(),
            buffer: InputBuffer::new(),
            input_processor: InputProcessor::new(),
            event_sender,
            exit,
        }
    }

    //--- Execution --------------------------------------------------------

    /// Runs the Winit event loop until the window closes or the session
    /// asks to exit.
    pub(crate) fn run(mut self) -> Result<(), PlatformError> {
        debug!(target: "platform", "Starting Winit event loop");

        let event_loop = EventLoop::new().map_err(PlatformError::EventLoopCreation)?;
        event_loop.run_app(&mut self).map_err(PlatformError::EventLoopExecution)
    }

    //--- Internal Helpers -------------------------------------------------

    /// Sends buffered input to the core thread. Empty frames send nothing.
    fn flush_input_buffer(&mut self) {
        let Some(events) = self.buffer.drain() else {
            return;
        };

        let count = events.len();
        trace!(target: "platform", "Flushing {} input events", count);

        if self.event_sender.send(PlatformEvent::Inputs(events)).is_err() {
            warn!(target: "platform", "Channel disconnected, dropping {} input events", count);
        }
    }

    fn close(&mut self, event_loop: &ActiveEventLoop) {
        let _ = self.event_sender.send(PlatformEvent::WindowClosed);
        event_loop.exit();
    }

    //--- Test Accessors ---------------------------------------------------

    #[cfg(test)]
    pub(crate) fn window(&self) -> Option<&Window> {
        self.window.as_ref()
    }
}

//=== Winit Integration ===================================================

impl ApplicationHandler for Platform {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            debug!(target: "platform", "Window already exists (mobile resume?)");
            return;
        }

        let attrs = WindowAttributes::default()
            .with_title(self.title.clone())
            .with_inner_size(LogicalSize::new(800, 600));

        match event_loop.create_window(attrs) {
            Ok(window) => {
                info!(
                    target: "platform",
                    "Window created: {}x{} @ {}x DPI",
                    window.inner_size().width,
                    window.inner_size().height,
                    window.scale_factor()
                );
                window.request_redraw();
                self.window = Some(window);
            }
            Err(e) => {
                error!(target: "platform", "Window creation failed: {}", e);
                self.close(event_loop);
            }
        }
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, _window_id: WindowId, event: WindowEvent) {
        match &event {
            WindowEvent::CloseRequested => {
                info!(target: "platform", "Window close requested");
                self.close(event_loop);
            }

            WindowEvent::ModifiersChanged(modifiers) => {
                trace!(target: "platform", "Modifiers changed: {:?}", modifiers);
                self.input_processor.update_modifiers(modifiers.state());
            }

            WindowEvent::KeyboardInput { event: key_event, .. } => {
                if let Some(event) = self.input_processor.process_key_event(key_event) {
                    self.buffer.push(event);
                }
            }

            WindowEvent::RedrawRequested => {
                self.flush_input_buffer();
                if let Some(window) = &self.window {
                    window.request_redraw();
                }
            }

            _ => {}
        }
    }

    fn about_to_wait(&mut self, event_loop: &ActiveEventLoop) {
        if self.exit.is_exit_requested() {
            info!(target: "platform", "Session requested exit, closing window");
            event_loop.exit();
        }
    }
}

//=========================================================================
// Unit Tests
//=========================================================================
