//=========================================================================
// Core Systems Orchestrator
//
// Central coordinator for the systems running on the logic (non-platform)
// thread.
//
// Responsibilities:
// - Own the GlobalSystems (input, levels, session) for the whole run
// - Receive platform events through the crossbeam channel
// - Tick at a fixed rate (TPS) with a monotonic session clock
// - Stop when the window closes or the session asks to quit
//
// Notes:
// The orchestrator runs independently from the platform layer and talks
// to it only through the channel (platform → core) and the ExitSignal
// (core → platform).
//
//=========================================================================

//=== Module Declarations =================================================

pub mod error;
pub mod globals;
pub mod input;
pub mod level;
pub(crate) mod platform_bridge;
pub mod services;
pub mod session;

//=== Public API ==========================================================

pub use error::ConfigError;
pub use globals::GlobalSystems;
pub use platform_bridge::PlatformError;

//=== External Dependencies ===============================================

use std::thread;
use std::time::{Duration, Instant};

use crossbeam_channel::Receiver;
use log::{debug, info};

//=== Internal Dependencies ===============================================

use platform_bridge::{EventCollector, PlatformEvent, TickControl};
use session::EngineSession;

//=== CoreSystemsOrchestrator =============================================

/// Owns the logic-thread systems until the thread is spawned.
pub(crate) struct CoreSystemsOrchestrator {
    systems: GlobalSystems,
}

impl CoreSystemsOrchestrator {
    //--- Construction -----------------------------------------------------

    pub(crate) fn new(session: EngineSession) -> Self {
        Self {
            systems: GlobalSystems::new(session),
        }
    }

    /// Gives the caller mutable access to the systems before the run.
    pub(crate) fn init_systems<F>(&mut self, init_fn: F)
    where
        F: FnOnce(&mut GlobalSystems),
    {
        init_fn(&mut self.systems);
    }

    //--- spawn_core_thread() ---------------------------------------------
    //
    // Each tick:
    //  1. Drains platform events
    //  2. Advances the session clock
    //  3. Updates every system
    //  4. Sleeps out the rest of the frame
    //
    pub(crate) fn spawn_core_thread(
        self,
        receiver: Receiver<PlatformEvent>,
        tps: f64,
    ) -> thread::JoinHandle<()> {
        let frame_duration = Duration::from_secs_f64(1.0 / tps);

        thread::spawn(move || {
            let mut systems = self.systems;
            let mut collector = EventCollector::new(receiver);

            systems.start();
            info!(target: "engine", "Core thread running at {} TPS", tps);

            let epoch = Instant::now();
            let mut last_time = 0.0_f32;
            let mut ticks: u64 = 0;

            loop {
                let frame_start = Instant::now();

                //--- Step 1: Gather platform events ------------------------
                if collector.collect_frame() == TickControl::Exit {
                    break;
                }

                //--- Step 2: Advance the clock -----------------------------
                let current_time = epoch.elapsed().as_secs_f32();
                let delta_time = current_time - last_time;
                last_time = current_time;

                //--- Step 3: Update systems --------------------------------
                if systems.update(collector.batches(), delta_time, current_time) == TickControl::Exit {
                    break;
                }
                ticks += 1;

                //--- Step 4: Maintain pacing -------------------------------
                let elapsed = frame_start.elapsed();
                if elapsed < frame_duration {
                    thread::sleep(frame_duration - elapsed);
                }
            }

            debug!(target: "engine", "Core thread ran {} ticks", ticks);
            info!(target: "engine", "Core thread exiting");
        })
    }
}
